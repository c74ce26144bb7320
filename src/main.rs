//! This file defines the scan-reports binary entry point.

use scan_reports::app;
use scan_reports::cli;
use scan_reports::metrics;
use scan_reports::server;
use scan_reports::tracing;

use std::process::exit;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing(&args);
    metrics::register_metrics();
    let db = match app::load_database(&args) {
        Ok(db) => db,
        Err(error) => {
            ::tracing::error!("{}", error);
            exit(1)
        }
    };
    let service = app::service(&args, db);
    if let Err(error) = server::serve(&args, service).await {
        ::tracing::error!("server error: {}", error);
        tracing::shutdown_tracing();
        exit(1)
    }
    tracing::shutdown_tracing();
}
