//! HTTP routes and request handlers

use crate::app_state::{AppState, SharedAppState};
use crate::cli::CommandLineArgs;
use crate::error::ReportError;
use crate::filter::ReportFilter;
use crate::metrics;
use crate::models::{
    DateRangeQuery, NewScan, ReportQuery, ReportRow, ScanId, ScanListQuery, ScanRecord,
    UserDeviceQuery,
};
use crate::service::ReportService;
use crate::store::Database;
use crate::validated::{ValidatedJson, ValidatedQuery};

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::header,
    http::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use expanduser::expanduser;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tower_http::validate_request::ValidateRequestHeaderLayer;

static HEADER_API_KEY: header::HeaderName = header::HeaderName::from_static("x-api-key");

/// Service returned by [service], ready to be served.
pub type Service = NormalizePath<Router>;

/// Load the scan store, from the bootstrap file if one is configured.
///
/// # Arguments
///
/// * `args`: Command line arguments
pub fn load_database(args: &CommandLineArgs) -> Result<Database, ReportError> {
    match &args.data_file {
        Some(data_file) => {
            let path = expanduser(data_file).map_err(|source| ReportError::SeedRead {
                path: data_file.clone(),
                source,
            })?;
            Database::bootstrap(&path)
        }
        None => Ok(Database::new()),
    }
}

/// Return the application router.
///
/// API routes under `/api/v1` require an `X-API-KEY` header matching `args.api_key`.
///
/// # Arguments
///
/// * `args`: Command line arguments
pub fn router(args: &CommandLineArgs) -> Router<SharedAppState> {
    fn v1(api_key: String) -> Router<SharedAppState> {
        Router::new()
            .route("/reports", get(reports))
            .route("/reports/by-user/:user_id", get(reports_by_user))
            .route("/reports/by-device/:device_id", get(reports_by_device))
            .route("/reports/by-date-range", get(reports_by_date_range))
            .route("/reports/by-user-and-device", get(reports_by_user_and_device))
            .route("/scans", get(list_scans).post(create_scan))
            .route("/scans/:scan_id", delete(delete_scan))
            .layer(ValidateRequestHeaderLayer::custom(
                // Validate that the API key header has been provided and is correct.
                move |request: &mut Request<Body>| {
                    let authorised = request
                        .headers()
                        .get(&HEADER_API_KEY)
                        .is_some_and(|value| value.as_bytes() == api_key.as_bytes());
                    if authorised {
                        Ok(())
                    } else {
                        Err(ReportError::Unauthorised.into_response())
                    }
                },
            ))
    }

    Router::new()
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/api/v1", v1(args.api_key.clone()))
        .layer(
            TraceLayer::new_for_http()
                .on_request(metrics::request_counter)
                .on_response(metrics::record_response_metrics),
        )
}

/// Return a [Service] serving [router] over `db`.
///
/// # Arguments
///
/// * `args`: Command line arguments
/// * `db`: Scan store
pub fn service(args: &CommandLineArgs, db: Database) -> Service {
    let state = Arc::new(AppState::new(db));
    let router = router(args).with_state(state);
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Run the report service over the shared store.
async fn scan_report(state: &AppState, filter: ReportFilter) -> Json<Vec<ReportRow>> {
    let db = state.db.read().await;
    Json(ReportService::new(&*db).scan_report(&filter))
}

async fn reports(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<ReportQuery>,
) -> Json<Vec<ReportRow>> {
    scan_report(&state, query.into()).await
}

async fn reports_by_user(
    State(state): State<SharedAppState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ReportRow>>, ReportError> {
    let Path(user_id) = user_id?;
    Ok(scan_report(&state, ReportFilter::new().user(&user_id)).await)
}

async fn reports_by_device(
    State(state): State<SharedAppState>,
    device_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ReportRow>>, ReportError> {
    let Path(device_id) = device_id?;
    Ok(scan_report(&state, ReportFilter::new().device(&device_id)).await)
}

async fn reports_by_date_range(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<DateRangeQuery>,
) -> Json<Vec<ReportRow>> {
    scan_report(&state, query.into()).await
}

async fn reports_by_user_and_device(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<UserDeviceQuery>,
) -> Json<Vec<ReportRow>> {
    scan_report(&state, query.into()).await
}

async fn list_scans(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<ScanListQuery>,
) -> Json<Vec<ScanRecord>> {
    let db = state.db.read().await;
    Json(
        db.list_scans(query.skip, query.limit)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn create_scan(
    State(state): State<SharedAppState>,
    ValidatedJson(new_scan): ValidatedJson<NewScan>,
) -> Result<(StatusCode, Json<ScanRecord>), ReportError> {
    let mut db = state.db.write().await;
    let scan = db.create_scan(new_scan)?.clone();
    tracing::debug!("created scan {} for user {}", scan.id, scan.user_id);
    Ok((StatusCode::CREATED, Json(scan)))
}

/// Delete a scan. Deleting an unknown scan is not an error.
async fn delete_scan(
    State(state): State<SharedAppState>,
    scan_id: Result<Path<ScanId>, PathRejection>,
) -> Result<StatusCode, ReportError> {
    let Path(scan_id) = scan_id?;
    let mut db = state.db.write().await;
    if db.delete_scan(scan_id).is_some() {
        tracing::debug!("deleted scan {}", scan_id);
    }
    Ok(StatusCode::NO_CONTENT)
}
