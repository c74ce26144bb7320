//! Report generation: filter, join and format.

use crate::filter::ReportFilter;
use crate::metrics::{REPORT_ROWS, SKIPPED_SCANS};
use crate::models::ReportRow;
use crate::report;
use crate::store::ScanRepository;

use tracing::{event, Level};

/// Produces report rows from a [ScanRepository].
pub struct ReportService<'a, R> {
    repository: &'a R,
}

impl<'a, R: ScanRepository> ReportService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Return one [ReportRow] per scan matching `filter`, in store order.
    ///
    /// Scans whose widget or algorithm cannot be resolved are left out.
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub fn scan_report(&self, filter: &ReportFilter) -> Vec<ReportRow> {
        let mut rows = Vec::new();
        for scan in self.repository.find_scans(filter) {
            let Some(widget) = self.repository.widget(scan.widget_id) else {
                event!(
                    Level::DEBUG,
                    "skipping scan {}: unknown widget {}",
                    scan.id,
                    scan.widget_id
                );
                SKIPPED_SCANS.with_label_values(&["widget"]).inc();
                continue;
            };
            let Some(algorithm) = self.repository.algorithm(scan.algo_id) else {
                event!(
                    Level::DEBUG,
                    "skipping scan {}: unknown algorithm {}",
                    scan.id,
                    scan.algo_id
                );
                SKIPPED_SCANS.with_label_values(&["algorithm"]).inc();
                continue;
            };
            rows.push(report::build_row(scan, widget, algorithm));
        }
        REPORT_ROWS.inc_by(rows.len() as u64);
        rows
    }
}
