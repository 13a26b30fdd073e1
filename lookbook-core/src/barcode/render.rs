//! Rasterizing EAN-13 symbols.

use std::path::Path;

use barcoders::sym::ean13::EAN13;
use image::{GrayImage, Luma};

use super::symbol::SymbolId;
use crate::error::{CatalogError, Result};

/// Modules on each side of the bars; EAN-13 asks for at least 11 on the left.
pub const QUIET_ZONE_MODULES: u32 = 11;

/// Raster geometry for rendered symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRenderer {
    /// Width of one module in pixels
    pub module_px: u32,
    /// Height of the bars in pixels
    pub bar_height: u32,
    /// Blank rows above and below the bars
    pub margin_px: u32,
}

impl Default for SymbolRenderer {
    fn default() -> Self {
        Self {
            module_px: 3,
            bar_height: 120,
            margin_px: 20,
        }
    }
}

impl SymbolRenderer {
    /// Module pattern (1 = bar, 0 = space) including guard patterns.
    pub fn modules(id: &SymbolId) -> Result<Vec<u8>> {
        let ean = EAN13::new(id.as_str())
            .map_err(|e| CatalogError::SymbolRender(format!("{}: {}", id, e)))?;
        Ok(ean.encode())
    }

    /// Render black bars on white with quiet zones.
    pub fn render(&self, id: &SymbolId) -> Result<GrayImage> {
        let modules = Self::modules(id)?;
        let module_px = self.module_px.max(1);
        let total_modules = modules.len() as u32 + 2 * QUIET_ZONE_MODULES;
        let width = total_modules * module_px;
        let height = self.bar_height + 2 * self.margin_px;

        let mut img = GrayImage::from_pixel(width, height, Luma([255]));
        for (i, &module) in modules.iter().enumerate() {
            if module == 0 {
                continue;
            }
            let x0 = (QUIET_ZONE_MODULES + i as u32) * module_px;
            for x in x0..x0 + module_px {
                for y in self.margin_px..self.margin_px + self.bar_height {
                    img.put_pixel(x, y, Luma([0]));
                }
            }
        }
        Ok(img)
    }

    /// Render and write a PNG to `path`.
    pub fn render_to(&self, id: &SymbolId, path: &Path) -> Result<()> {
        let img = self.render(id)?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| CatalogError::SymbolRender(format!("{}: {}", path.display(), e)))
    }
}
