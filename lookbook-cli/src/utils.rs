//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use lookbook_core::{Catalog, CatalogLayout, CatalogMapping, Slot};
use tracing::debug;

pub fn open_catalog(root: &Path) -> Catalog {
    debug!(root = %root.display(), "Opening catalog");
    Catalog::open(CatalogLayout::rooted_at(root))
}

/// Load the mapping, failing when the catalog was never bootstrapped.
pub fn load_mapping(catalog: &Catalog) -> Result<CatalogMapping> {
    let path = &catalog.layout().mapping_file;
    if !path.is_file() {
        bail!(
            "No catalog mapping at {} (run `lookbook bootstrap` first)",
            path.display()
        );
    }
    catalog
        .entries()
        .with_context(|| format!("Failed to load mapping: {}", path.display()))
}

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Where `file` would sit in the catalog, used to keep an item out of its
/// own recommendations.
pub fn catalog_reference(catalog: &Catalog, file: &Path) -> PathBuf {
    match file.file_name() {
        Some(name) => catalog.layout().items_dir.join(name),
        None => file.to_path_buf(),
    }
}

/// Print ranked slots as a numbered list; empty slots print as dashes.
pub fn print_slots(slots: &[Slot]) {
    for (rank, slot) in slots.iter().enumerate() {
        match slot {
            Some(rec) => println!(
                "   {:>2}. {}  {}",
                rank + 1,
                rec.url().green(),
                format!("(distance {:.4})", rec.distance).dimmed()
            ),
            None => println!("   {:>2}. {}", rank + 1, "-".dimmed()),
        }
    }
}

/// JSON value of a slot list: `[{"url": ...|null}, ...]`.
pub fn slots_json(slots: &[Slot]) -> serde_json::Value {
    slots
        .iter()
        .map(|slot| serde_json::json!({ "url": slot.as_ref().map(|r| r.url()) }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookbook_core::Recommendation;

    #[test]
    fn test_catalog_reference() {
        let catalog = open_catalog(Path::new("/srv/shop"));
        assert_eq!(
            catalog_reference(&catalog, Path::new("/tmp/uploads/red_shirt.png")),
            PathBuf::from("/srv/shop/clothing/red_shirt.png")
        );
    }

    #[test]
    fn test_slots_json() {
        let slots = vec![
            Some(Recommendation {
                item_path: PathBuf::from("clothing/a.png"),
                distance: 0.5,
            }),
            None,
        ];
        assert_eq!(
            slots_json(&slots),
            serde_json::json!([{ "url": "/clothing/a.png" }, { "url": null }])
        );
    }

    #[test]
    fn test_load_mapping_requires_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = open_catalog(dir.path());
        let err = load_mapping(&catalog).unwrap_err();
        assert!(err.to_string().contains("No catalog mapping"));
    }
}
