//! On-disk layout of a catalog.

use std::path::{Path, PathBuf};

use crate::barcode::BarcodeCodec;

/// Extensions accepted for item images (compared case-insensitively).
pub const ITEM_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Extension of descriptor files.
pub const DESCRIPTOR_EXTENSION: &str = "json";

/// Whether a file name carries an accepted item image extension.
pub fn is_item_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ITEM_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

/// Where items, symbols, descriptors and the mapping live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    /// Item images
    pub items_dir: PathBuf,
    /// Rendered symbol images
    pub symbols_dir: PathBuf,
    /// Descriptor files
    pub descriptors_dir: PathBuf,
    /// Mapping document
    pub mapping_file: PathBuf,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            items_dir: PathBuf::from("clothing"),
            symbols_dir: PathBuf::from("barcodes"),
            descriptors_dir: PathBuf::from("features"),
            mapping_file: PathBuf::from("mapping.json"),
        }
    }
}

impl CatalogLayout {
    /// Default layout under `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let defaults = Self::default();
        Self {
            items_dir: root.join(defaults.items_dir),
            symbols_dir: root.join(defaults.symbols_dir),
            descriptors_dir: root.join(defaults.descriptors_dir),
            mapping_file: root.join(defaults.mapping_file),
        }
    }

    pub fn item_path(&self, name: &str) -> PathBuf {
        self.items_dir.join(name)
    }

    pub fn symbol_path(&self, stem: &str) -> PathBuf {
        self.symbols_dir.join(BarcodeCodec::symbol_file_name(stem))
    }

    pub fn descriptor_path(&self, stem: &str) -> PathBuf {
        self.descriptors_dir
            .join(format!("{}.{}", stem, DESCRIPTOR_EXTENSION))
    }
}
