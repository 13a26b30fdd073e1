//! Color-cluster feature extraction.
//!
//! # Algorithm
//!
//! 1. Decode and resize the image to a canonical 200x200 raster so every
//!    item contributes the same number of pixels regardless of resolution.
//! 2. Flatten the RGB pixels and cluster them with k-means (k = 5).
//! 3. Count members per cluster and normalize the counts to sum to 1.
//!
//! Initialization is random, so two extractions of the same image may order
//! or shape clusters differently. Use [`FeatureExtractor::with_seed`] when
//! reproducible output is needed.
//!
//! # Usage
//!
//! ```no_run
//! use lookbook_core::FeatureExtractor;
//!
//! let data = std::fs::read("clothing/shirt.jpg").unwrap();
//! let descriptor = FeatureExtractor::default().extract_bytes(&data).unwrap();
//! assert_eq!(descriptor.as_slice().len(), 5);
//! ```

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::descriptor::Descriptor;
use crate::error::{CatalogError, Result, DESCRIPTOR_LEN};
use crate::kmeans::{kmeans, KMeansParams, Point};

/// Side length of the canonical raster used for clustering.
pub const CANONICAL_SIZE: u32 = 200;

/// Open an image file, detecting the format from its content rather than
/// its extension.
pub(crate) fn open_image(path: &Path) -> Result<DynamicImage> {
    let unreadable = |e: &dyn std::fmt::Display| {
        CatalogError::UnreadableImage(format!("{}: {}", path.display(), e))
    };
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| unreadable(&e))?
        .decode()
        .map_err(|e| unreadable(&e))
}

/// Extraction settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureParams {
    /// Width and height images are resized to before clustering
    pub canonical_size: u32,
    /// Clustering settings; `k` must equal the descriptor length
    pub kmeans: KMeansParams,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            canonical_size: CANONICAL_SIZE,
            kmeans: KMeansParams {
                k: DESCRIPTOR_LEN,
                max_iter: 100,
                epsilon: 0.2,
                attempts: 10,
            },
        }
    }
}

/// Turns images into [`Descriptor`]s.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    params: FeatureParams,
    seed: Option<u64>,
}

impl FeatureExtractor {
    pub fn new(params: FeatureParams) -> Self {
        Self { params, seed: None }
    }

    /// Use a fixed RNG seed for every extraction.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn params(&self) -> &FeatureParams {
        &self.params
    }

    /// Extract a descriptor from encoded image bytes (PNG, JPEG, ...).
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Descriptor> {
        let image = image::load_from_memory(data)
            .map_err(|e| CatalogError::UnreadableImage(format!("Failed to decode image: {}", e)))?;
        self.extract_image(&image)
    }

    /// Extract a descriptor from an image file.
    pub fn extract_path(&self, path: &Path) -> Result<Descriptor> {
        let image = open_image(path)?;
        self.extract_image(&image)
    }

    /// Extract a descriptor from a decoded image.
    pub fn extract_image(&self, image: &DynamicImage) -> Result<Descriptor> {
        let size = self.params.canonical_size.max(1);
        let raster = image
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8();

        let points: Vec<Point> = raster
            .pixels()
            .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
            .collect();

        let clustering = match self.seed {
            Some(seed) => kmeans(&points, &self.params.kmeans, &mut StdRng::seed_from_u64(seed)),
            None => kmeans(&points, &self.params.kmeans, &mut rand::rng()),
        };

        tracing::trace!(
            compactness = clustering.compactness,
            "Clustered {} pixels",
            points.len()
        );

        Descriptor::from_counts(&clustering.histogram())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};
    use std::io::Cursor;

    fn striped(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, _| match x * 4 / width {
            0 => Rgb([200, 30, 30]),
            1 => Rgb([30, 200, 30]),
            2 => Rgb([30, 30, 200]),
            _ => Rgb([240, 240, 240]),
        })
    }

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn assert_distribution(d: &Descriptor) {
        assert_eq!(d.as_slice().len(), DESCRIPTOR_LEN);
        assert!(d.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        let sum: f64 = d.as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
    }

    #[test]
    fn test_default_params() {
        let params = FeatureParams::default();
        assert_eq!(params.canonical_size, 200);
        assert_eq!(params.kmeans.k, 5);
        assert_eq!(params.kmeans.max_iter, 100);
        assert_eq!(params.kmeans.attempts, 10);
        assert!((params.kmeans.epsilon - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_descriptor_shape_for_various_sizes() {
        let extractor = FeatureExtractor::default().with_seed(3);
        for (w, h) in [(1, 1), (37, 411), (640, 480)] {
            let img = DynamicImage::ImageRgb8(striped(w, h));
            let d = extractor.extract_image(&img).unwrap();
            assert_distribution(&d);
        }
    }

    #[test]
    fn test_extract_bytes_png() {
        let bytes = encode_png(&striped(120, 80));
        let d = FeatureExtractor::default()
            .with_seed(9)
            .extract_bytes(&bytes)
            .unwrap();
        assert_distribution(&d);
    }

    #[test]
    fn test_seeded_extraction_is_reproducible() {
        let img = DynamicImage::ImageRgb8(striped(64, 64));
        let a = FeatureExtractor::default().with_seed(11).extract_image(&img).unwrap();
        let b = FeatureExtractor::default().with_seed(11).extract_image(&img).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unreadable_bytes() {
        let err = FeatureExtractor::default()
            .extract_bytes(b"this is a text file, not a png")
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnreadableImage(_)));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = FeatureExtractor::default()
            .extract_path(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnreadableImage(_)));
    }
}
