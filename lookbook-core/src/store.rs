//! Persistent barcode-to-item mapping.
//!
//! The mapping is a single pretty-printed JSON object keyed by the 12-digit
//! barcode identifier:
//!
//! ```json
//! {
//!   "004512339876": {
//!     "clothing_path": "clothing/shirt.jpg",
//!     "barcode_path": "barcodes/symbol_shirt.png",
//!     "feature_path": "features/shirt.json"
//!   }
//! }
//! ```
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so readers never observe a half-written document. There
//! is no cross-process locking; within one process, [`MappingStore::update`]
//! serializes load-modify-save sequences.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::Result;

/// One catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Item image
    pub clothing_path: PathBuf,
    /// Rendered symbol image
    pub barcode_path: PathBuf,
    /// Descriptor file; older documents may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_path: Option<PathBuf>,
}

/// Full identifier -> entry table.
pub type CatalogMapping = BTreeMap<String, CatalogEntry>;

/// File-backed [`CatalogMapping`].
#[derive(Debug)]
pub struct MappingStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the mapping; a missing file is an empty mapping.
    pub fn load(&self) -> Result<CatalogMapping> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CatalogMapping::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Replace the persisted mapping.
    pub fn save(&self, mapping: &CatalogMapping) -> Result<()> {
        let _lock = self.lock();
        self.write(mapping)
    }

    /// Load, modify and save as one critical section.
    pub fn update<T>(&self, f: impl FnOnce(&mut CatalogMapping) -> T) -> Result<T> {
        let _lock = self.lock();
        let mut mapping = self.load()?;
        let out = f(&mut mapping);
        self.write(&mapping)?;
        Ok(out)
    }

    /// Persist an empty mapping.
    pub fn reset(&self) -> Result<()> {
        self.save(&CatalogMapping::new())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state
        self.guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, mapping: &CatalogMapping) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, mapping)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
