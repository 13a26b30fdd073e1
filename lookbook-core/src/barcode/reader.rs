//! Reading EAN-13 symbols from photographs.
//!
//! Camera images are tried against several preprocessing variants, in a
//! fixed order, until one decodes:
//!
//! 1. raw color (luminance as a color reader computes it)
//! 2. grayscale
//! 3. fixed binary threshold at 128
//! 4. adaptive local-mean threshold (11x11 block, constant 2)

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbImage};
use rxing::BarcodeFormat;

use crate::error::{CatalogError, Result};
use crate::features::open_image;

/// Images whose larger side exceeds this are downscaled before decoding.
pub const MAX_DECODE_DIMENSION: u32 = 1000;

/// Threshold for the fixed binary variant.
pub const BINARY_THRESHOLD: u8 = 128;

/// Side of the neighbourhood used by the adaptive variant.
pub const ADAPTIVE_BLOCK_SIZE: u32 = 11;

/// Constant subtracted from the neighbourhood mean.
pub const ADAPTIVE_C: i32 = 2;

/// Preprocessing applied before handing pixels to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessing {
    Color,
    Gray,
    Binary,
    Adaptive,
}

impl Preprocessing {
    /// Order in which variants are attempted.
    pub const ORDER: [Preprocessing; 4] = [
        Preprocessing::Color,
        Preprocessing::Gray,
        Preprocessing::Binary,
        Preprocessing::Adaptive,
    ];

    pub fn apply(&self, image: &DynamicImage) -> GrayImage {
        match self {
            Self::Color => color_luminance(&image.to_rgb8()),
            Self::Gray => image.to_luma8(),
            Self::Binary => binary_threshold(&image.to_luma8(), BINARY_THRESHOLD),
            Self::Adaptive => {
                adaptive_mean_threshold(&image.to_luma8(), ADAPTIVE_BLOCK_SIZE, ADAPTIVE_C)
            }
        }
    }
}

/// Luminance the way color barcode readers derive it: `(r + 2g + b) / 4`.
fn color_luminance(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let p = rgb.get_pixel(x, y);
        let l = (p[0] as u32 + 2 * p[1] as u32 + p[2] as u32) / 4;
        Luma([l as u8])
    })
}

/// Pixels strictly above `threshold` become white, the rest black.
pub fn binary_threshold(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// A pixel becomes white when it is brighter than the mean of its
/// `block_size` x `block_size` neighbourhood minus `c`.
///
/// The window is clipped at the image borders.
pub fn adaptive_mean_threshold(gray: &GrayImage, block_size: u32, c: i32) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }

    // Summed-area table with a zero row and column
    let stride = (w + 1) as usize;
    let mut integral = vec![0u64; stride * (h + 1) as usize];
    for y in 0..h as usize {
        let mut row_sum = 0u64;
        for x in 0..w as usize {
            row_sum += gray.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let radius = block_size / 2;
    GrayImage::from_fn(w, h, |x, y| {
        let x0 = x.saturating_sub(radius) as usize;
        let y0 = y.saturating_sub(radius) as usize;
        let x1 = (x + radius + 1).min(w) as usize;
        let y1 = (y + radius + 1).min(h) as usize;
        let area = ((x1 - x0) * (y1 - y0)) as f64;
        let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
            - integral[y0 * stride + x1]
            - integral[y1 * stride + x0];
        let mean = sum as f64 / area;
        if gray.get_pixel(x, y)[0] as f64 > mean - c as f64 {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Shrink so the larger side is at most `max_dim`, keeping the aspect ratio.
pub fn limit_dimensions(image: DynamicImage, max_dim: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    if longest <= max_dim {
        return image;
    }
    let scale = max_dim as f64 / longest as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    image.resize_exact(nw, nh, FilterType::Triangle)
}

/// Decodes EAN-13 payloads from images.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolReader;

impl SymbolReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode from encoded image bytes.
    ///
    /// Returns `Ok(None)` when the image decodes but contains no readable
    /// symbol, and `UnreadableImage` when the bytes are not an image.
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Option<String>> {
        let image = image::load_from_memory(data)
            .map_err(|e| CatalogError::UnreadableImage(format!("Failed to decode image: {}", e)))?;
        Ok(self.decode_image(image))
    }

    /// Decode from an image file.
    pub fn decode_path(&self, path: &Path) -> Result<Option<String>> {
        let image = open_image(path)?;
        Ok(self.decode_image(image))
    }

    /// Try each preprocessing variant and return the first decoded payload.
    pub fn decode_image(&self, image: DynamicImage) -> Option<String> {
        let image = limit_dimensions(image, MAX_DECODE_DIMENSION);
        for variant in Preprocessing::ORDER {
            let processed = variant.apply(&image);
            if let Some(payload) = decode_luma(processed) {
                tracing::info!(payload = %payload, variant = ?variant, "Decoded barcode");
                return Some(payload);
            }
            tracing::debug!(variant = ?variant, "No barcode found");
        }
        None
    }

    /// Whether the bytes are an image that contains a readable symbol.
    pub fn is_symbol_image(&self, data: &[u8]) -> bool {
        match self.decode_bytes(data) {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::debug!(error = %e, "Barcode check skipped unreadable image");
                false
            }
        }
    }
}

fn decode_luma(gray: GrayImage) -> Option<String> {
    let (width, height) = gray.dimensions();
    rxing::helpers::detect_in_luma_with_hints(
        gray.into_raw(),
        width,
        height,
        Some(BarcodeFormat::EAN_13),
        &mut rxing::DecodeHints::default(),
    )
    .ok()
    .map(|result| result.getText().to_string())
}
