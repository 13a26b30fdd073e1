//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use lookbook_core::Catalog;

use crate::validation::DEFAULT_MAX_FILE_SIZE;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Catalog used for recommendations, symbol lookup and item serving
    pub catalog: Arc<Catalog>,
    /// Maximum accepted upload size in bytes
    pub max_file_size: usize,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}
