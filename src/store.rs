//! In-memory store of scans, widgets and algorithms, optionally bootstrapped from a JSON file.

use crate::error::ReportError;
use crate::filter::ReportFilter;
use crate::models::{Algorithm, AlgorithmId, NewScan, ScanId, ScanRecord, Widget, WidgetId};

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{event, Level};

/// Read access to scan records and their display metadata.
///
/// Point lookups return `None` when the identifier is unknown.
pub trait ScanRepository {
    /// Return the scans matching `filter`, in store order.
    fn find_scans(&self, filter: &ReportFilter) -> Vec<&ScanRecord>;

    /// Look up a widget by identifier.
    fn widget(&self, id: WidgetId) -> Option<&Widget>;

    /// Look up an algorithm by identifier.
    fn algorithm(&self, id: AlgorithmId) -> Option<&Algorithm>;
}

/// Layout of the bootstrap file. Entries are kept as raw JSON so that a malformed entry can be
/// skipped without rejecting the whole document.
#[derive(Debug, Default, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    algorithms: Vec<serde_json::Value>,
    #[serde(default)]
    widgets: Vec<serde_json::Value>,
    #[serde(default)]
    scans: Vec<serde_json::Value>,
}

/// Deserialise each entry, skipping and logging those that are malformed.
fn parse_entries<T: DeserializeOwned>(
    kind: &'static str,
    entries: Vec<serde_json::Value>,
) -> impl Iterator<Item = T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(move |(index, entry)| match serde_json::from_value(entry) {
            Ok(value) => Some(value),
            Err(error) => {
                event!(
                    Level::WARN,
                    "skipping malformed {} entry {}: {}",
                    kind,
                    index,
                    error
                );
                None
            }
        })
}

/// In-memory database
///
/// Scans are kept in insertion order, which is the order reports are produced in.
#[derive(Debug)]
pub struct Database {
    scans: Vec<ScanRecord>,
    widgets: HashMap<WidgetId, Widget>,
    algorithms: HashMap<AlgorithmId, Algorithm>,
    /// `None` once the largest identifier has been used.
    next_scan_id: Option<ScanId>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Return an empty database.
    pub fn new() -> Self {
        Database {
            scans: Vec::new(),
            widgets: HashMap::new(),
            algorithms: HashMap::new(),
            next_scan_id: Some(1),
        }
    }

    /// Load a database from a JSON bootstrap file.
    ///
    /// A missing file yields an empty database. Malformed entries are skipped.
    ///
    /// # Arguments
    ///
    /// * `path`: Path to the bootstrap file
    #[tracing::instrument(level = "DEBUG")]
    pub fn bootstrap(path: &Path) -> Result<Self, ReportError> {
        if !path.exists() {
            event!(
                Level::WARN,
                "bootstrap file {} not found, starting with an empty store",
                path.display()
            );
            return Ok(Self::new());
        }
        let file = File::open(path).map_err(|source| ReportError::SeedRead {
            path: path.display().to_string(),
            source,
        })?;
        let document: SeedDocument = serde_json::from_reader(BufReader::new(file))?;
        let db = Self::from_seed(document);
        event!(
            Level::INFO,
            "loaded {} scans, {} widgets and {} algorithms from {}",
            db.scan_count(),
            db.widgets.len(),
            db.algorithms.len(),
            path.display()
        );
        Ok(db)
    }

    /// Load a database from a JSON bootstrap document held in memory.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let document: SeedDocument = serde_json::from_str(json)?;
        Ok(Self::from_seed(document))
    }

    fn from_seed(document: SeedDocument) -> Self {
        let mut db = Self::new();
        for algorithm in parse_entries("algorithm", document.algorithms) {
            db.add_algorithm(algorithm);
        }
        for widget in parse_entries("widget", document.widgets) {
            db.add_widget(widget);
        }
        for scan in parse_entries("scan", document.scans) {
            db.add_scan(scan);
        }
        db
    }

    /// Insert or replace an algorithm.
    pub fn add_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithms.insert(algorithm.id, algorithm);
    }

    /// Insert or replace a widget.
    pub fn add_widget(&mut self, widget: Widget) {
        self.widgets.insert(widget.id, widget);
    }

    /// Insert a scan with a caller-chosen identifier.
    ///
    /// A scan with the same identifier is replaced in place, keeping its position.
    pub fn add_scan(&mut self, scan: ScanRecord) {
        self.next_scan_id = match (self.next_scan_id, scan.id.checked_add(1)) {
            (Some(next), Some(successor)) => Some(next.max(successor)),
            _ => None,
        };
        match self.scans.iter_mut().find(|existing| existing.id == scan.id) {
            Some(existing) => *existing = scan,
            None => self.scans.push(scan),
        }
    }

    /// Create a scan, assigning the next free identifier.
    ///
    /// The sample time defaults to the current UTC time. Fails once the largest identifier has
    /// been assigned.
    pub fn create_scan(&mut self, new_scan: NewScan) -> Result<&ScanRecord, ReportError> {
        let id = self.next_scan_id.ok_or(ReportError::ScanIdsExhausted)?;
        let scan = ScanRecord {
            id,
            user_id: new_scan.user_id,
            device_id: new_scan.device_id,
            widget_id: new_scan.widget_id,
            algo_id: new_scan.algo_id,
            sampled_at: new_scan
                .sampled_at
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
            results: new_scan.results,
        };
        self.next_scan_id = id.checked_add(1);
        self.scans.push(scan);
        Ok(&self.scans[self.scans.len() - 1])
    }

    /// Return a page of scans in store order.
    pub fn list_scans(&self, skip: usize, limit: usize) -> Vec<&ScanRecord> {
        self.scans.iter().skip(skip).take(limit).collect()
    }

    /// Delete a scan, returning it if it existed.
    pub fn delete_scan(&mut self, id: ScanId) -> Option<ScanRecord> {
        let position = self.scans.iter().position(|scan| scan.id == id)?;
        Some(self.scans.remove(position))
    }

    /// Number of scans held.
    pub fn scan_count(&self) -> usize {
        self.scans.len()
    }
}

impl ScanRepository for Database {
    fn find_scans(&self, filter: &ReportFilter) -> Vec<&ScanRecord> {
        filter.apply(&self.scans)
    }

    fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    fn algorithm(&self, id: AlgorithmId) -> Option<&Algorithm> {
        self.algorithms.get(&id)
    }
}
