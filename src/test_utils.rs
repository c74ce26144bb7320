use crate::cli::CommandLineArgs;
use crate::models::*;
use crate::store::Database;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use std::collections::HashMap;

/// API key accepted by the test configuration.
pub(crate) const TEST_API_KEY: &str = "test-key";

/// Build a NaiveDateTime from its components.
pub(crate) fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .unwrap()
}

fn param(name: &str, display_name: &str, unit: &str) -> (String, ParamConfig) {
    (
        name.to_string(),
        ParamConfig {
            name: name.to_string(),
            display_name: Some(display_name.to_string()),
            unit: Some(unit.to_string()),
        },
    )
}

/// Corn algorithm, used by [get_test_widget].
pub(crate) fn get_test_algorithm() -> Algorithm {
    Algorithm {
        id: 1,
        name: "Corn Algo".to_string(),
        version: 1,
    }
}

/// Corn widget showing moisture as a percentage then protein with two digits.
pub(crate) fn get_test_widget() -> Widget {
    Widget {
        id: 1,
        name: "Corn Widget".to_string(),
        algo_id: 1,
        param_config: HashMap::from([
            param("moisture", "Moisture", "%"),
            param("protein", "Protein", "float_2_dig"),
        ]),
        param_order: Some(vec!["moisture".to_string(), "protein".to_string()]),
    }
}

fn get_test_soybean_widget() -> Widget {
    Widget {
        id: 2,
        name: "Soybean Widget".to_string(),
        algo_id: 2,
        param_config: HashMap::from([
            param("oil", "Oil", "float_2_dig"),
            param("protein", "Protein", "float_2_dig"),
        ]),
        param_order: Some(vec!["oil".to_string(), "protein".to_string()]),
    }
}

/// Three scans: two for `ariel` on devices `d1` and `d2`, one for `dan` on `d1`.
pub(crate) fn get_test_scans() -> Vec<ScanRecord> {
    vec![
        ScanRecord {
            id: 1,
            user_id: "ariel".to_string(),
            device_id: "d1".to_string(),
            widget_id: 1,
            algo_id: 1,
            sampled_at: datetime(2025, 11, 20, 13, 2, 5),
            results: vec![ScanResult::new("moisture", 16.5)],
        },
        ScanRecord {
            id: 2,
            user_id: "ariel".to_string(),
            device_id: "d2".to_string(),
            widget_id: 2,
            algo_id: 2,
            sampled_at: datetime(2025, 11, 30, 10, 27, 33),
            results: vec![ScanResult::new("oil", 14.5), ScanResult::new("protein", 22.0)],
        },
        ScanRecord {
            id: 3,
            user_id: "dan".to_string(),
            device_id: "d1".to_string(),
            widget_id: 2,
            algo_id: 2,
            sampled_at: datetime(2025, 11, 13, 11, 59, 4),
            results: vec![ScanResult::new("oil", 12.3), ScanResult::new("protein", 12.5)],
        },
    ]
}

/// Database holding both widgets, both algorithms and [get_test_scans].
pub(crate) fn get_test_database() -> Database {
    let mut db = Database::new();
    db.add_algorithm(get_test_algorithm());
    db.add_algorithm(Algorithm {
        id: 2,
        name: "Soybean Algo".to_string(),
        version: 1,
    });
    db.add_widget(get_test_widget());
    db.add_widget(get_test_soybean_widget());
    for scan in get_test_scans() {
        db.add_scan(scan);
    }
    db
}

/// Create a NewScan object with only required fields set.
pub(crate) fn get_test_new_scan() -> NewScan {
    NewScan {
        user_id: "ariel".to_string(),
        device_id: "d3".to_string(),
        widget_id: 1,
        algo_id: 1,
        sampled_at: None,
        results: vec![],
    }
}

/// Command line arguments with defaults and [TEST_API_KEY].
pub(crate) fn get_test_args() -> CommandLineArgs {
    let mut args = CommandLineArgs::parse_from(["scan-reports"]);
    args.api_key = TEST_API_KEY.to_string();
    args
}

// Jump through the hoops to get the body as a string.
pub(crate) async fn body_string(response: Response) -> String {
    String::from_utf8(
        hyper::body::to_bytes(response.into_body())
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap()
}
