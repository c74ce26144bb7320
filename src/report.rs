//! Report formatting
//!
//! Joins scan records with their widget and algorithm and renders the results of each scan as a
//! single display string.

use crate::format::format_value;
use crate::models::{Algorithm, ReportRow, ScanRecord, ScanResult, Widget};

use std::collections::{HashMap, HashSet};

/// Determine the order in which parameters are displayed.
///
/// The widget's explicit order comes first. Parameters present in `results` but missing from that
/// order follow in the order they first appear. Names are never repeated.
pub fn display_order<'a>(widget: &'a Widget, results: &'a [ScanResult]) -> Vec<&'a str> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();

    if let Some(param_order) = &widget.param_order {
        for name in param_order {
            if seen.insert(name.as_str()) {
                order.push(name.as_str());
            }
        }
    }
    for result in results {
        if seen.insert(result.parameter_name.as_str()) {
            order.push(result.parameter_name.as_str());
        }
    }
    order
}

/// Render the results of a scan using the display metadata of `widget`.
///
/// Returns e.g. `{Moisture: 14.5 %, Protein: 8.23}`, or `{}` when there are no results.
/// Ordered names without a result are skipped. When a parameter is reported more than once the
/// last value wins.
pub fn format_results(widget: &Widget, results: &[ScanResult]) -> String {
    let values: HashMap<&str, f64> = results
        .iter()
        .map(|result| (result.parameter_name.as_str(), result.predicted_value))
        .collect();

    let entries: Vec<String> = display_order(widget, results)
        .into_iter()
        .filter_map(|name| {
            let value = values.get(name)?;
            let config = widget.param_config.get(name);
            let display_name = config
                .and_then(|config| config.display_name.as_deref())
                .unwrap_or(name);
            let unit = config
                .and_then(|config| config.unit.as_deref())
                .unwrap_or_default();
            Some(format!("{}: {}", display_name, format_value(*value, unit)))
        })
        .collect();

    format!("{{{}}}", entries.join(", "))
}

/// Project a scan and its resolved widget and algorithm into a [ReportRow].
pub fn build_row(scan: &ScanRecord, widget: &Widget, algorithm: &Algorithm) -> ReportRow {
    ReportRow {
        sampled_at: scan.sampled_at,
        user_id: scan.user_id.clone(),
        device_id: scan.device_id.clone(),
        widget_name: widget.name.clone(),
        algo_name: algorithm.name.clone(),
        results: format_results(widget, &scan.results),
    }
}
