//! Lookbook Core - visual clothing recommendations and barcode lookup
//!
//! This crate turns a directory of clothing photographs into a searchable
//! catalog:
//!
//! - **Descriptors**: a normalized 5-cluster color histogram per image
//! - **Symbols**: a stable EAN-13 barcode per item, rendered to PNG
//! - **Mapping**: a JSON document linking barcode identifiers to items,
//!   symbols and descriptor files
//! - **Recommendations**: brute-force squared-Euclidean ranking over the
//!   catalog, always returning a fixed number of slots
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use lookbook_core::{Catalog, CatalogLayout, DEFAULT_RECOMMENDATIONS};
//!
//! # fn example() -> lookbook_core::Result<()> {
//! let catalog = Catalog::open(CatalogLayout::default());
//! catalog.bootstrap()?;
//!
//! let upload = std::fs::read("photo.jpg")?;
//! let slots = catalog.recommend_for_image(
//!     &upload,
//!     Path::new("clothing/photo.jpg"),
//!     DEFAULT_RECOMMENDATIONS,
//! )?;
//! assert_eq!(slots.len(), DEFAULT_RECOMMENDATIONS);
//! # Ok(())
//! # }
//! ```

pub mod barcode;
pub mod bootstrap;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod features;
pub mod kmeans;
pub mod layout;
pub mod recommend;
pub mod store;

// Re-export main types for convenience
pub use barcode::{ean13_check_digit, BarcodeCodec, EncodedSymbol, SymbolId, SymbolReader};
pub use bootstrap::{BootstrapFailure, BootstrapReport, Bootstrapper};
pub use catalog::{Catalog, SymbolMatch};
pub use descriptor::Descriptor;
pub use error::{CatalogError, Result, DESCRIPTOR_LEN, SYMBOL_ID_DIGITS};
pub use features::{FeatureExtractor, FeatureParams};
pub use layout::{is_item_image, CatalogLayout, ITEM_EXTENSIONS};
pub use recommend::{item_url, recommend, Recommendation, Slot, DEFAULT_RECOMMENDATIONS};
pub use store::{CatalogEntry, CatalogMapping, MappingStore};
