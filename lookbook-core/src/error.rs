use thiserror::Error;

/// Number of color clusters in a descriptor.
pub const DESCRIPTOR_LEN: usize = 5;

/// Number of digits supplied to the EAN-13 encoder (the check digit is appended).
pub const SYMBOL_ID_DIGITS: usize = 12;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unreadable image: {0}")]
    UnreadableImage(String),

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid symbol identifier: {0}")]
    InvalidSymbolId(String),

    #[error("Symbol rendering failed: {0}")]
    SymbolRender(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
