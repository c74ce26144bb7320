use crate::store::Database;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state passed to each request handler.
#[derive(Debug, Default)]
pub struct AppState {
    /// Scan store. Reports take a read lock, scan creation and deletion a write lock.
    pub db: RwLock<Database>,
}

impl AppState {
    /// Create and return an [AppState].
    pub fn new(db: Database) -> Self {
        Self {
            db: RwLock::new(db),
        }
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
