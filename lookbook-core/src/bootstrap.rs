//! Startup rebuild of symbols, descriptors and the mapping.
//!
//! The symbol and descriptor directories are wiped and recreated, then every
//! item image is encoded and described in directory-listing order. The
//! mapping is saved after each item so an interrupted run still leaves a
//! valid mapping of everything processed so far. A failing item is logged
//! and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::barcode::BarcodeCodec;
use crate::error::{CatalogError, Result};
use crate::features::FeatureExtractor;
use crate::layout::{is_item_image, CatalogLayout};
use crate::store::{CatalogEntry, CatalogMapping, MappingStore};

/// An item the bootstrapper could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapFailure {
    pub item_path: PathBuf,
    pub error: String,
}

/// Summary of a bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Item images found in the items directory
    pub scanned: usize,
    /// Entries written to the mapping
    pub entries: usize,
    pub failures: Vec<BootstrapFailure>,
}

/// Rebuilds a catalog from its item images.
pub struct Bootstrapper<'a> {
    layout: &'a CatalogLayout,
    store: &'a MappingStore,
    codec: &'a BarcodeCodec,
    extractor: &'a FeatureExtractor,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        layout: &'a CatalogLayout,
        store: &'a MappingStore,
        codec: &'a BarcodeCodec,
        extractor: &'a FeatureExtractor,
    ) -> Self {
        Self {
            layout,
            store,
            codec,
            extractor,
        }
    }

    /// Wipe generated artifacts and rebuild them for every item.
    ///
    /// Errors are only returned for storage failures that affect the whole
    /// run (directories that cannot be recreated, an unlistable items
    /// directory, an unwritable mapping).
    pub fn run(&self) -> Result<BootstrapReport> {
        for dir in [&self.layout.symbols_dir, &self.layout.descriptors_dir] {
            recreate_dir(dir)?;
            tracing::info!(dir = %dir.display(), "Cleaned up directory");
        }
        if !self.layout.items_dir.exists() {
            fs::create_dir_all(&self.layout.items_dir)?;
            tracing::info!(dir = %self.layout.items_dir.display(), "Created items directory");
        }

        let mut mapping = CatalogMapping::new();
        self.store.save(&mapping)?;

        let mut report = BootstrapReport::default();
        for item_path in self.list_items()? {
            report.scanned += 1;
            match self.process_item(&item_path) {
                Ok((id, entry)) => {
                    tracing::info!(item = %item_path.display(), id = %id, "Processed clothing item");
                    mapping.insert(id, entry);
                    self.store.save(&mapping)?;
                }
                Err(e) => {
                    tracing::warn!(item = %item_path.display(), error = %e, "Failed to process item");
                    report.failures.push(BootstrapFailure {
                        item_path,
                        error: e.to_string(),
                    });
                }
            }
        }

        report.entries = mapping.len();
        tracing::info!(
            entries = report.entries,
            failed = report.failures.len(),
            "Generated barcodes and features for {} clothing items",
            report.entries
        );
        Ok(report)
    }

    fn list_items(&self) -> Result<Vec<PathBuf>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(&self.layout.items_dir)? {
            let path = entry?.path();
            if path.is_file() && is_item_image(&path) {
                items.push(path);
            }
        }
        Ok(items)
    }

    fn process_item(&self, item_path: &Path) -> Result<(String, CatalogEntry)> {
        let encoded = self.codec.encode(item_path, &self.layout.symbols_dir)?;

        let descriptor = self.extractor.extract_path(item_path)?;
        let stem = item_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let feature_path = self.layout.descriptor_path(&stem);
        descriptor.write_to(&feature_path)?;

        if !encoded.path.exists() {
            return Err(CatalogError::SymbolRender(format!(
                "symbol image missing after render: {}",
                encoded.path.display()
            )));
        }

        Ok((
            encoded.id.to_string(),
            CatalogEntry {
                clothing_path: item_path.to_path_buf(),
                barcode_path: encoded.path,
                feature_path: Some(feature_path),
            },
        ))
    }
}

fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}
