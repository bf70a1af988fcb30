//! Implements a struct that holds the state of the web server.

use std::path::PathBuf;

use crate::transaction::TransactionSource;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The transaction log the pages report on.
    pub transactions: TransactionSource,
}

impl AppState {
    /// Create a new [AppState] that reads transactions from the CSV file at `data_path`.
    ///
    /// The file is read lazily on the first request and re-read whenever it
    /// changes.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            transactions: TransactionSource::new(data_path),
        }
    }
}
