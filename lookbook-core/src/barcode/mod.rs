//! Barcode codec for catalog items.
//!
//! Every item gets a stable 12-digit identifier derived from its file name,
//! rendered as an EAN-13 symbol (which appends a check digit). Uploaded
//! photographs of such symbols are decoded back into the 13-digit payload.

pub mod reader;
pub mod render;
pub mod symbol;

use std::path::{Path, PathBuf};

pub use reader::{Preprocessing, SymbolReader, MAX_DECODE_DIMENSION};
pub use render::SymbolRenderer;
pub use symbol::{ean13_check_digit, SymbolId};

use crate::error::{CatalogError, Result};

/// File name prefix for rendered symbols.
pub const SYMBOL_FILE_PREFIX: &str = "symbol_";

/// Outcome of encoding one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymbol {
    pub id: SymbolId,
    /// Where the rendered PNG was written
    pub path: PathBuf,
}

/// Encodes items into symbol images and decodes symbol photographs.
#[derive(Debug, Clone, Default)]
pub struct BarcodeCodec {
    renderer: SymbolRenderer,
    reader: SymbolReader,
}

impl BarcodeCodec {
    pub fn new(renderer: SymbolRenderer) -> Self {
        Self {
            renderer,
            reader: SymbolReader::new(),
        }
    }

    /// File name of the symbol rendered for an item stem.
    pub fn symbol_file_name(stem: &str) -> String {
        format!("{}{}.png", SYMBOL_FILE_PREFIX, stem)
    }

    /// Derive the identifier for `item_path` and render its symbol into
    /// `symbols_dir` as `symbol_<stem>.png`.
    pub fn encode(&self, item_path: &Path, symbols_dir: &Path) -> Result<EncodedSymbol> {
        let name = item_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CatalogError::InvalidSymbolId(format!(
                    "item path has no UTF-8 file name: {}",
                    item_path.display()
                ))
            })?;
        let stem = item_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);

        let id = SymbolId::from_item_name(name);
        let path = symbols_dir.join(Self::symbol_file_name(stem));
        self.renderer.render_to(&id, &path)?;

        tracing::debug!(item = %item_path.display(), id = %id, "Rendered symbol");
        Ok(EncodedSymbol { id, path })
    }

    /// Decode a symbol photograph from encoded bytes.
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Option<String>> {
        self.reader.decode_bytes(data)
    }

    /// Decode a symbol photograph from a file.
    pub fn decode_path(&self, path: &Path) -> Result<Option<String>> {
        self.reader.decode_path(path)
    }

    pub fn is_symbol_image(&self, data: &[u8]) -> bool {
        self.reader.is_symbol_image(data)
    }
}
