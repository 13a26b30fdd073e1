//! Catalog facade tying storage, codec, extractor and ranking together.

use std::path::{Component, Path, PathBuf};

use crate::barcode::BarcodeCodec;
use crate::bootstrap::{BootstrapReport, Bootstrapper};
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::layout::CatalogLayout;
use crate::recommend::{recommend, Recommendation, Slot};
use crate::store::{CatalogEntry, CatalogMapping, MappingStore};

/// Result of looking up a scanned symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolMatch {
    /// Mapping key the payload resolved to
    pub id: String,
    pub entry: CatalogEntry,
    /// Non-empty recommendations for the matched item, closest first
    pub recommendations: Vec<Recommendation>,
}

/// A catalog rooted at a [`CatalogLayout`].
#[derive(Debug)]
pub struct Catalog {
    layout: CatalogLayout,
    store: MappingStore,
    codec: BarcodeCodec,
    extractor: FeatureExtractor,
}

impl Catalog {
    /// Open a catalog; nothing is read until an operation needs it.
    pub fn open(layout: CatalogLayout) -> Self {
        let store = MappingStore::new(layout.mapping_file.clone());
        Self {
            layout,
            store,
            codec: BarcodeCodec::default(),
            extractor: FeatureExtractor::default(),
        }
    }

    /// Replace the feature extractor (e.g. a seeded one for tests).
    pub fn with_extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_codec(mut self, codec: BarcodeCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Rebuild symbols, descriptors and the mapping from the items directory.
    pub fn bootstrap(&self) -> Result<BootstrapReport> {
        Bootstrapper::new(&self.layout, &self.store, &self.codec, &self.extractor).run()
    }

    /// Current mapping.
    pub fn entries(&self) -> Result<CatalogMapping> {
        self.store.load()
    }

    /// Descriptor for encoded image bytes.
    pub fn describe(&self, data: &[u8]) -> Result<Descriptor> {
        self.extractor.extract_bytes(data)
    }

    /// Rank the catalog against an uploaded item image.
    ///
    /// `exclude` is the uploaded item's own reference, never returned.
    pub fn recommend_for_image(&self, data: &[u8], exclude: &Path, n: usize) -> Result<Vec<Slot>> {
        let query = self.describe(data)?;
        self.recommend_for_descriptor(&query, exclude, n)
    }

    /// Rank the catalog against an item image stored on disk.
    pub fn recommend_for_item_file(
        &self,
        path: &Path,
        exclude: &Path,
        n: usize,
    ) -> Result<Vec<Slot>> {
        let query = self.extractor.extract_path(path)?;
        self.recommend_for_descriptor(&query, exclude, n)
    }

    /// Rank the catalog against a descriptor.
    pub fn recommend_for_descriptor(
        &self,
        query: &Descriptor,
        exclude: &Path,
        n: usize,
    ) -> Result<Vec<Slot>> {
        let mapping = self.store.load()?;
        Ok(recommend(query, exclude, &mapping, n))
    }

    /// Decode a symbol photograph.
    pub fn decode_symbol(&self, data: &[u8]) -> Result<Option<String>> {
        self.codec.decode_bytes(data)
    }

    /// Decode a symbol photograph stored on disk.
    pub fn decode_symbol_file(&self, path: &Path) -> Result<Option<String>> {
        self.codec.decode_path(path)
    }

    /// Whether an upload is a symbol rather than an item photograph.
    pub fn is_symbol_image(&self, data: &[u8]) -> bool {
        self.codec.is_symbol_image(data)
    }

    /// Like [`Catalog::is_symbol_image`], for a file. Unreadable files are
    /// not symbols.
    pub fn is_symbol_file(&self, path: &Path) -> bool {
        matches!(self.codec.decode_path(path), Ok(Some(_)))
    }

    /// Find the entry for a decoded payload.
    ///
    /// An exact key match wins. Otherwise the first key (in key order) that
    /// contains the payload, or is contained in it, is used; this is what
    /// lets a 13-digit scan (with check digit) find its 12-digit key.
    pub fn resolve_symbol(&self, payload: &str) -> Result<Option<(String, CatalogEntry)>> {
        let mapping = self.store.load()?;
        tracing::info!(payload, known = mapping.len(), "Looking up barcode");
        Ok(resolve_in(&mapping, payload))
    }

    /// Resolve a payload and recommend items similar to the matched one.
    ///
    /// The matched item's descriptor is recomputed from its image. Returns
    /// `None` when the payload matches nothing or no recommendation exists.
    pub fn recommend_for_symbol(&self, payload: &str, n: usize) -> Result<Option<SymbolMatch>> {
        let mapping = self.store.load()?;
        let Some((id, entry)) = resolve_in(&mapping, payload) else {
            tracing::warn!(payload, "No catalog entry for barcode");
            return Ok(None);
        };
        tracing::info!(item = %entry.clothing_path.display(), "Found matching item");

        let query = self.extractor.extract_path(&entry.clothing_path)?;
        let recommendations: Vec<Recommendation> =
            recommend(&query, &entry.clothing_path, &mapping, n)
                .into_iter()
                .flatten()
                .collect();

        if recommendations.is_empty() {
            tracing::warn!(payload, "No recommendations found for barcode");
            return Ok(None);
        }
        Ok(Some(SymbolMatch {
            id,
            entry,
            recommendations,
        }))
    }

    /// Path of a served item image, if `name` is a plain file name that exists.
    pub fn item_file(&self, name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return None,
        }
        let path = self.layout.item_path(name);
        path.is_file().then_some(path)
    }
}

fn resolve_in(mapping: &CatalogMapping, payload: &str) -> Option<(String, CatalogEntry)> {
    if payload.is_empty() {
        return None;
    }
    if let Some(entry) = mapping.get(payload) {
        return Some((payload.to_string(), entry.clone()));
    }
    mapping
        .iter()
        .find(|(key, _)| payload.contains(key.as_str()) || key.contains(payload))
        .map(|(key, entry)| (key.clone(), entry.clone()))
}
