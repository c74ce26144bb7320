/// Benchmarks for report generation.
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scan_reports::filter::ReportFilter;
use scan_reports::format::format_value;
use scan_reports::models::{Algorithm, ParamConfig, ScanRecord, ScanResult, Widget};
use scan_reports::service::ReportService;
use scan_reports::store::Database;
use std::collections::HashMap;

const PARAMETERS: [(&str, &str); 4] = [
    ("moisture", "%"),
    ("protein", "float_2_dig"),
    ("starch", "float_1_dig"),
    ("oil", ""),
];

fn get_test_database(num_scans: u64) -> Database {
    let mut db = Database::new();
    db.add_algorithm(Algorithm {
        id: 1,
        name: "Grain Algo".to_string(),
        version: 1,
    });
    db.add_widget(Widget {
        id: 1,
        name: "Grain Widget".to_string(),
        algo_id: 1,
        param_config: PARAMETERS
            .iter()
            .map(|(name, unit)| {
                (
                    name.to_string(),
                    ParamConfig {
                        name: name.to_string(),
                        display_name: Some(name.to_uppercase()),
                        unit: Some(unit.to_string()),
                    },
                )
            })
            .collect::<HashMap<_, _>>(),
        param_order: Some(vec!["protein".to_string(), "moisture".to_string()]),
    });
    let start = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap();
    for id in 0..num_scans {
        db.add_scan(ScanRecord {
            id,
            user_id: format!("user{}", id % 10),
            device_id: format!("device{}", id % 7),
            widget_id: 1,
            algo_id: 1,
            sampled_at: start + chrono::Duration::minutes(id as i64),
            results: PARAMETERS
                .iter()
                .map(|(name, _)| ScanResult::new(name, id as f64 / 7.0))
                .collect(),
        });
    }
    db
}

fn criterion_benchmark(c: &mut Criterion) {
    for (value, unit) in [(10.512, "%"), (8.234, "float_2_dig"), (42.0, "")] {
        let name = format!("format_value({}, {:?})", value, unit);
        c.bench_function(&name, |b| {
            b.iter(|| format_value(black_box(value), black_box(unit)))
        });
    }

    for num_scans in [100, 1000, 10000] {
        let db = get_test_database(num_scans);
        let filters = [
            ("all", ReportFilter::new()),
            ("user", ReportFilter::new().user("user3")),
            ("user+device", ReportFilter::new().user("user3").device("device2")),
        ];
        for (filter_name, filter) in filters {
            let name = format!("scan_report({}, {})", num_scans, filter_name);
            c.bench_function(&name, |b| {
                b.iter(|| ReportService::new(&db).scan_report(black_box(&filter)))
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
