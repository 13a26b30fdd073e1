//! Color-cluster descriptors and their on-disk form.
//!
//! A descriptor is a normalized histogram over [`DESCRIPTOR_LEN`] dominant
//! color clusters. Descriptor files are plain JSON arrays of numbers, e.g.
//! `[0.41, 0.22, 0.19, 0.1, 0.08]`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result, DESCRIPTOR_LEN};

/// Fixed-length visual signature of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Descriptor(Vec<f64>);

impl Descriptor {
    /// Build a descriptor from raw components, checking the length.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() != DESCRIPTOR_LEN {
            return Err(CatalogError::InvalidDescriptor(format!(
                "expected {} components, got {}",
                DESCRIPTOR_LEN,
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CatalogError::InvalidDescriptor(
                "components must be finite".into(),
            ));
        }
        Ok(Self(values))
    }

    /// Normalize cluster membership counts into a descriptor.
    pub fn from_counts(counts: &[usize]) -> Result<Self> {
        let total: usize = counts.iter().sum();
        if total == 0 {
            return Err(CatalogError::InvalidDescriptor(
                "histogram has no members".into(),
            ));
        }
        Self::new(
            counts
                .iter()
                .map(|&c| c as f64 / total as f64)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Squared Euclidean distance to another descriptor.
    pub fn squared_distance(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Read a descriptor file.
    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = fs::read(path)?;
        let descriptor = serde_json::from_slice(&raw)?;
        Ok(descriptor)
    }

    /// Write this descriptor as a JSON array.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_vec(self)?)?;
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for Descriptor {
    type Error = CatalogError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<Descriptor> for Vec<f64> {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.0
    }
}
