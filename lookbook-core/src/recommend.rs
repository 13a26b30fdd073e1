//! Brute-force nearest-neighbour recommendations.
//!
//! Every catalog entry is scanned, its descriptor loaded from disk and its
//! squared Euclidean distance to the query computed. The catalog is expected
//! to stay small, so no index is kept.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::descriptor::Descriptor;
use crate::store::CatalogMapping;

/// Number of recommendations every caller asks for.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// URL prefix under which item images are served.
pub const ITEM_URL_PREFIX: &str = "/clothing/";

/// A recommended catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_path: PathBuf,
    /// Squared Euclidean distance from the query descriptor
    pub distance: f64,
}

impl Recommendation {
    /// Public URL of the item image.
    pub fn url(&self) -> String {
        item_url(&self.item_path)
    }
}

/// A result position; `None` is an empty placeholder.
pub type Slot = Option<Recommendation>;

/// Public URL for an item image path.
pub fn item_url(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", ITEM_URL_PREFIX, name)
}

/// Rank catalog entries by distance to `query`.
///
/// Entries whose item is `exclude`, or whose descriptor file is missing or
/// invalid, are skipped. The result always has exactly `n` slots, padded with
/// `None` when fewer candidates qualify. Ties keep catalog order.
pub fn recommend(
    query: &Descriptor,
    exclude: &Path,
    mapping: &CatalogMapping,
    n: usize,
) -> Vec<Slot> {
    let mut scored: Vec<Recommendation> = mapping
        .values()
        .filter(|entry| entry.clothing_path != exclude)
        .filter_map(|entry| {
            let feature_path = entry.feature_path.as_ref()?;
            match Descriptor::read_from(feature_path) {
                Ok(candidate) => Some(Recommendation {
                    item_path: entry.clothing_path.clone(),
                    distance: query.squared_distance(&candidate),
                }),
                Err(e) => {
                    tracing::debug!(
                        path = %feature_path.display(),
                        error = %e,
                        "Skipping entry without a usable descriptor"
                    );
                    None
                }
            }
        })
        .collect();

    // `sort_by` is stable
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut slots: Vec<Slot> = scored.into_iter().take(n).map(Some).collect();
    slots.resize(n, None);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CatalogEntry;
    use tempfile::TempDir;

    fn descriptor(values: [f64; 5]) -> Descriptor {
        Descriptor::new(values.to_vec()).unwrap()
    }

    /// Write one descriptor file per item and map them under sequential keys.
    fn catalog(dir: &TempDir, items: &[(&str, Option<[f64; 5]>)]) -> CatalogMapping {
        let mut mapping = CatalogMapping::new();
        for (i, (name, values)) in items.iter().enumerate() {
            let feature_path = dir.path().join(format!("{}.json", name));
            if let Some(values) = values {
                descriptor(*values).write_to(&feature_path).unwrap();
            }
            mapping.insert(
                format!("{:012}", i),
                CatalogEntry {
                    clothing_path: PathBuf::from(format!("clothing/{}.jpg", name)),
                    barcode_path: PathBuf::from(format!("barcodes/symbol_{}.png", name)),
                    feature_path: Some(feature_path),
                },
            );
        }
        mapping
    }

    fn names(slots: &[Slot]) -> Vec<Option<String>> {
        slots
            .iter()
            .map(|s| {
                s.as_ref()
                    .map(|r| r.item_path.file_stem().unwrap().to_string_lossy().into_owned())
            })
            .collect()
    }

    #[test]
    fn test_orders_by_distance_and_pads() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = catalog(
            &dir,
            &[
                ("item1", Some([1.0, 0.0, 0.0, 0.0, 0.0])),
                ("item2", Some([0.0, 0.0, 0.0, 0.0, 1.0])),
                ("item3", Some([0.6, 0.4, 0.0, 0.0, 0.0])),
            ],
        );
        let query = descriptor([0.9, 0.1, 0.0, 0.0, 0.0]);

        let slots = recommend(&query, Path::new("uploads/query.jpg"), &mapping, 5);

        assert_eq!(
            names(&slots),
            vec![
                Some("item1".to_string()),
                Some("item3".to_string()),
                Some("item2".to_string()),
                None,
                None
            ]
        );
        let distances: Vec<f64> = slots.iter().flatten().map(|r| r.distance).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_excludes_query_item() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = catalog(
            &dir,
            &[
                ("self", Some([0.2; 5])),
                ("other", Some([0.3, 0.3, 0.2, 0.1, 0.1])),
            ],
        );

        let slots = recommend(&descriptor([0.2; 5]), Path::new("clothing/self.jpg"), &mapping, 5);

        assert!(slots
            .iter()
            .flatten()
            .all(|r| r.item_path != Path::new("clothing/self.jpg")));
        assert_eq!(slots.iter().flatten().count(), 1);
    }

    #[test]
    fn test_skips_missing_and_invalid_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let mut mapping = catalog(
            &dir,
            &[("good", Some([0.2; 5])), ("missing", None), ("broken", Some([0.2; 5]))],
        );
        std::fs::write(dir.path().join("broken.json"), "[0.5, 0.5]").unwrap();
        mapping.insert(
            "999999999999".into(),
            CatalogEntry {
                clothing_path: PathBuf::from("clothing/nofeatures.jpg"),
                barcode_path: PathBuf::from("barcodes/symbol_nofeatures.png"),
                feature_path: None,
            },
        );

        let slots = recommend(&descriptor([0.2; 5]), Path::new("q.jpg"), &mapping, 5);
        assert_eq!(names(&slots)[0], Some("good".to_string()));
        assert_eq!(slots.iter().flatten().count(), 1);
    }

    #[test]
    fn test_count_invariant() {
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<(String, Option<[f64; 5]>)> = (0..7)
            .map(|i| (format!("i{}", i), Some([0.2, 0.2, 0.2, 0.2, 0.2])))
            .collect();
        let borrowed: Vec<(&str, Option<[f64; 5]>)> =
            items.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let full = catalog(&dir, &borrowed);
        let empty = CatalogMapping::new();
        let query = descriptor([0.2; 5]);

        for n in 0..10 {
            assert_eq!(recommend(&query, Path::new("q.jpg"), &full, n).len(), n);
            assert_eq!(recommend(&query, Path::new("q.jpg"), &empty, n).len(), n);
        }
        assert!(recommend(&query, Path::new("q.jpg"), &empty, 5)
            .iter()
            .all(Option::is_none));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = catalog(&dir, &[("a", Some([0.2; 5])), ("b", Some([0.2; 5]))]);
        let slots = recommend(&descriptor([0.2; 5]), Path::new("q.jpg"), &mapping, 2);
        assert_eq!(
            names(&slots),
            vec![Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn test_item_url() {
        assert_eq!(item_url(Path::new("clothing/red shirt.jpg")), "/clothing/red shirt.jpg");
        let rec = Recommendation {
            item_path: PathBuf::from("x/y/coat.png"),
            distance: 0.0,
        };
        assert_eq!(rec.url(), "/clothing/coat.png");
    }
}
