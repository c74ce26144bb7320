//! Data types and associated functions and methods

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Scan identifier
pub type ScanId = u64;
/// Widget identifier
pub type WidgetId = u64;
/// Algorithm identifier
pub type AlgorithmId = u64;

/// The named, versioned model that produced a scan's predictions.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Algorithm {
    pub id: AlgorithmId,
    /// Display name
    pub name: String,
    pub version: u32,
}

/// Display metadata for a single parameter of a widget.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ParamConfig {
    /// Raw parameter name
    #[serde(default)]
    pub name: String,
    /// Name shown in reports. Falls back to the raw parameter name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Unit specifier controlling value rendering, e.g. `%` or `float_2_dig`.
    #[serde(default)]
    pub unit: Option<String>,
}

/// Presentation configuration for scans
///
/// Controls which parameters are shown, in what order and how each value is rendered.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Widget {
    pub id: WidgetId,
    /// Display name
    pub name: String,
    pub algo_id: AlgorithmId,
    /// Per-parameter display metadata, keyed by raw parameter name
    #[serde(default)]
    pub param_config: HashMap<String, ParamConfig>,
    /// Explicit parameter display order. Parameters not listed here are shown after the listed
    /// ones, in the order they appear in the scan.
    #[serde(default)]
    pub param_order: Option<Vec<String>>,
}

/// A single named prediction of a scan
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_scan_result"))]
pub struct ScanResult {
    #[validate(length(min = 1, message = "parameter_name must not be empty"))]
    pub parameter_name: String,
    pub predicted_value: f64,
}

impl ScanResult {
    /// Return a new ScanResult object.
    pub fn new(parameter_name: &str, predicted_value: f64) -> Self {
        ScanResult {
            parameter_name: parameter_name.to_string(),
            predicted_value,
        }
    }
}

/// One measurement event, as held by the store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScanRecord {
    pub id: ScanId,
    pub user_id: String,
    pub device_id: String,
    pub widget_id: WidgetId,
    pub algo_id: AlgorithmId,
    pub sampled_at: NaiveDateTime,
    /// Results in the order they were produced
    #[serde(default)]
    pub results: Vec<ScanResult>,
}

/// Request data for scan creation
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_new_scan"))]
pub struct NewScan {
    #[validate(length(min = 1, max = 256, message = "user_id must be 1-256 characters"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 256, message = "device_id must be 1-256 characters"))]
    pub device_id: String,
    pub widget_id: WidgetId,
    pub algo_id: AlgorithmId,
    /// Sample time. Defaults to the current UTC time when absent.
    pub sampled_at: Option<NaiveDateTime>,
    #[validate]
    #[serde(default)]
    pub results: Vec<ScanResult>,
}

/// Validate a single scan result
fn validate_scan_result(result: &ScanResult) -> Result<(), ValidationError> {
    if !result.predicted_value.is_finite() {
        let mut error = ValidationError::new("predicted_value must be a finite number");
        error.add_param("parameter_name".into(), &result.parameter_name);
        return Err(error);
    }
    Ok(())
}

/// Validate scan creation data
fn validate_new_scan(new_scan: &NewScan) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for result in &new_scan.results {
        if !seen.insert(result.parameter_name.as_str()) {
            let mut error = ValidationError::new("results must not repeat a parameter_name");
            error.add_param("parameter_name".into(), &result.parameter_name);
            return Err(error);
        }
    }
    Ok(())
}

/// One flattened, display-ready projection of a scan
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReportRow {
    pub sampled_at: NaiveDateTime,
    pub user_id: String,
    pub device_id: String,
    pub widget_name: String,
    pub algo_name: String,
    /// Formatted results, e.g. `{Moisture: 14.5 %, Protein: 8.23}`
    pub results: String,
}

/// Treat an absent or empty query parameter as `None`.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => T::from_str(s).map(Some).map_err(de::Error::custom),
    }
}

/// Parse a sample time bound given in a query string.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.f]]` with either `T` or a space as separator, the same with a
/// `Z` or UTC offset suffix (converted to UTC), and a bare `YYYY-MM-DD` (midnight).
pub fn parse_query_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let value = match value.as_bytes().get(10) {
        Some(b' ') => format!("{}T{}", &value[..10], &value[11..]),
        _ => value.to_string(),
    };
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M"))
        .or_else(|_| DateTime::parse_from_rfc3339(&value).map(|time| time.naive_utc()))
        .or_else(|error| {
            NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .ok_or(error)
        })
}

/// Treat an absent or empty query parameter as `None`, otherwise parse a sample time bound.
fn optional_query_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => parse_query_datetime(s)
            .map(Some)
            .map_err(|error| de::Error::custom(format!("invalid date `{}`: {}", s, error))),
    }
}

/// Query string of the general report endpoint. Every criterion is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Validate)]
pub struct ReportQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 256, message = "user_id must be at most 256 characters"))]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 256, message = "device_id must be at most 256 characters"))]
    pub device_id: Option<String>,
    /// Inclusive lower bound on the sample time
    #[serde(default, deserialize_with = "optional_query_datetime")]
    pub from_date: Option<NaiveDateTime>,
    /// Inclusive upper bound on the sample time
    #[serde(default, deserialize_with = "optional_query_datetime")]
    pub to_date: Option<NaiveDateTime>,
}

/// Query string of the date range endpoint
#[derive(Debug, Default, Deserialize, PartialEq, Validate)]
pub struct DateRangeQuery {
    #[serde(default, deserialize_with = "optional_query_datetime")]
    pub from_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "optional_query_datetime")]
    pub to_date: Option<NaiveDateTime>,
}

/// Query string of the user and device endpoint.
///
/// Both keys must be present, but an empty value places no restriction on that criterion.
#[derive(Debug, Deserialize, PartialEq, Validate)]
pub struct UserDeviceQuery {
    #[serde(deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 256, message = "user_id must be at most 256 characters"))]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 256, message = "device_id must be at most 256 characters"))]
    pub device_id: Option<String>,
}

fn default_limit() -> usize {
    50
}

/// Paging parameters for listing raw scans
#[derive(Debug, Deserialize, PartialEq, Validate)]
pub struct ScanListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: usize,
}

impl Default for ScanListQuery {
    fn default() -> Self {
        ScanListQuery {
            skip: 0,
            limit: default_limit(),
        }
    }
}
