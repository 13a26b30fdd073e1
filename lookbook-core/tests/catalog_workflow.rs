//! End-to-end catalog tests: bootstrap, recommend, and symbol lookup over a
//! scratch directory of synthesized item images.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use image::{ImageBuffer, Rgb, RgbImage};
use lookbook_core::barcode::SymbolRenderer;
use lookbook_core::{
    Catalog, CatalogLayout, FeatureExtractor, SymbolId, DEFAULT_RECOMMENDATIONS,
};
use tempfile::TempDir;

/// Two-tone test garment: `main` fills most of the frame, `accent` a band.
fn garment(main: [u8; 3], accent: [u8; 3]) -> RgbImage {
    ImageBuffer::from_fn(96, 128, |_, y| {
        if y < 96 {
            Rgb(main)
        } else {
            Rgb(accent)
        }
    })
}

fn write_png(path: &Path, img: &RgbImage) {
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut buf = io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// A catalog with three valid items and, optionally, one corrupt file.
fn scratch_catalog(with_corrupt: bool) -> (TempDir, Catalog) {
    let dir = tempfile::tempdir().unwrap();
    let layout = CatalogLayout::rooted_at(dir.path());
    std::fs::create_dir_all(&layout.items_dir).unwrap();

    write_png(&layout.item_path("red_shirt.png"), &garment([220, 20, 20], [250, 250, 250]));
    write_png(&layout.item_path("red_dress.png"), &garment([200, 30, 30], [20, 20, 20]));
    write_png(&layout.item_path("blue_jeans.png"), &garment([20, 40, 200], [240, 240, 240]));
    if with_corrupt {
        std::fs::write(layout.item_path("broken.jpg"), b"definitely not a jpeg").unwrap();
    }
    // Ignored: not an accepted extension
    std::fs::write(layout.items_dir.join("notes.txt"), b"inventory").unwrap();

    let catalog = Catalog::open(layout).with_extractor(FeatureExtractor::default().with_seed(5));
    (dir, catalog)
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_bootstrap_skips_corrupt_item_and_logs_it() {
    let (_dir, catalog) = scratch_catalog(true);
    std::fs::remove_file(catalog.layout().item_path("blue_jeans.png")).unwrap();

    let logs = Captured::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let report =
        tracing::subscriber::with_default(subscriber, || catalog.bootstrap().expect("bootstrap"));

    assert_eq!(report.scanned, 3);
    assert_eq!(report.entries, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].item_path.ends_with("broken.jpg"));
    assert_eq!(catalog.entries().unwrap().len(), 2);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("WARN"), "missing warning in: {}", output);
    assert!(output.contains("broken.jpg"));
}

#[test]
fn test_bootstrap_writes_symbols_descriptors_and_mapping() {
    let (_dir, catalog) = scratch_catalog(false);
    let report = catalog.bootstrap().unwrap();
    assert_eq!(report.entries, 3);
    assert!(report.failures.is_empty());

    let layout = catalog.layout();
    for stem in ["red_shirt", "red_dress", "blue_jeans"] {
        assert!(layout.symbol_path(stem).is_file(), "symbol for {}", stem);
        assert!(layout.descriptor_path(stem).is_file(), "descriptor for {}", stem);
    }

    let mapping = catalog.entries().unwrap();
    let id = SymbolId::from_item_name("red_shirt.png");
    let entry = &mapping[id.as_str()];
    assert!(entry.clothing_path.ends_with("red_shirt.png"));
    assert_eq!(entry.barcode_path, layout.symbol_path("red_shirt"));
    assert_eq!(entry.feature_path.as_deref(), Some(layout.descriptor_path("red_shirt").as_path()));
}

#[test]
fn test_bootstrap_wipes_stale_artifacts() {
    let (_dir, catalog) = scratch_catalog(false);
    let layout = catalog.layout().clone();
    std::fs::create_dir_all(&layout.symbols_dir).unwrap();
    std::fs::write(layout.symbol_path("ghost"), b"stale").unwrap();
    std::fs::create_dir_all(&layout.descriptors_dir).unwrap();
    std::fs::write(layout.descriptor_path("ghost"), b"[0.2,0.2,0.2,0.2,0.2]").unwrap();

    catalog.bootstrap().unwrap();

    assert!(!layout.symbol_path("ghost").exists());
    assert!(!layout.descriptor_path("ghost").exists());
}

#[test]
fn test_bootstrap_creates_missing_items_dir() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(CatalogLayout::rooted_at(dir.path()));

    let report = catalog.bootstrap().unwrap();

    assert_eq!(report.entries, 0);
    assert!(catalog.layout().items_dir.is_dir());
    assert!(catalog.layout().mapping_file.is_file());
    assert!(catalog.entries().unwrap().is_empty());
}

#[test]
fn test_recommend_for_uploaded_image() {
    let (_dir, catalog) = scratch_catalog(false);
    catalog.bootstrap().unwrap();

    let upload = png_bytes(&garment([215, 25, 25], [245, 245, 245]));
    let exclude = catalog.layout().item_path("upload.png");
    let slots = catalog
        .recommend_for_image(&upload, &exclude, DEFAULT_RECOMMENDATIONS)
        .unwrap();

    assert_eq!(slots.len(), 5);
    assert_eq!(slots.iter().flatten().count(), 3);
    assert!(slots[3].is_none() && slots[4].is_none());
    let distances: Vec<f64> = slots.iter().flatten().map(|r| r.distance).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_recommend_excludes_catalog_item_itself() {
    let (_dir, catalog) = scratch_catalog(false);
    catalog.bootstrap().unwrap();

    let own = catalog.layout().item_path("red_dress.png");
    let upload = std::fs::read(&own).unwrap();
    let slots = catalog.recommend_for_image(&upload, &own, 5).unwrap();

    assert!(slots.iter().flatten().all(|r| r.item_path != own));
    assert_eq!(slots.iter().flatten().count(), 2);
}

#[test]
fn test_scan_symbol_of_catalog_item() {
    let (_dir, catalog) = scratch_catalog(false);
    catalog.bootstrap().unwrap();

    let symbol = std::fs::read(catalog.layout().symbol_path("red_shirt")).unwrap();
    let payload = catalog.decode_symbol(&symbol).unwrap().expect("decodable symbol");
    assert_eq!(payload, SymbolId::from_item_name("red_shirt.png").payload());

    let found = catalog
        .recommend_for_symbol(&payload, DEFAULT_RECOMMENDATIONS)
        .unwrap()
        .expect("symbol resolves");
    assert!(found.entry.clothing_path.ends_with("red_shirt.png"));
    assert_eq!(found.recommendations.len(), 2);
    assert!(found
        .recommendations
        .iter()
        .all(|r| !r.item_path.ends_with("red_shirt.png")));
}

#[test]
fn test_scan_unknown_symbol() {
    let (dir, catalog) = scratch_catalog(false);
    catalog.bootstrap().unwrap();

    let stranger = SymbolId::from_item_name("not_in_catalog.png");
    let path = dir.path().join("stranger.png");
    SymbolRenderer::default().render_to(&stranger, &path).unwrap();
    let payload = catalog
        .decode_symbol(&std::fs::read(&path).unwrap())
        .unwrap()
        .expect("decodable symbol");

    assert!(catalog.recommend_for_symbol(&payload, 5).unwrap().is_none());
}

#[test]
fn test_item_photo_is_not_a_symbol() {
    let (_dir, catalog) = scratch_catalog(false);
    let photo = std::fs::read(catalog.layout().item_path("blue_jeans.png")).unwrap();
    assert!(!catalog.is_symbol_image(&photo));
}
