//! Scan command implementation.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use lookbook_core::Catalog;
use tracing::info;

use crate::utils::{load_mapping, print_slots, read_input, slots_json};
use crate::OutputFormat;

/// Execute the scan command.
pub fn execute(catalog: &Catalog, file: &Path, count: usize, format: OutputFormat) -> Result<()> {
    let content = read_input(file)?;
    load_mapping(catalog)?;

    let payload = catalog
        .decode_symbol(&content)
        .with_context(|| format!("No barcode found in {}", file.display()))?;
    let Some(payload) = payload else {
        bail!("No barcode found in {}", file.display());
    };
    info!(payload = %payload, "Decoded barcode");

    let found = catalog
        .recommend_for_symbol(&payload, count)?
        .ok_or_else(|| anyhow!("Unrecognized barcode: {}", payload))?;

    let slots: Vec<_> = found.recommendations.iter().cloned().map(Some).collect();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "barcode": payload,
                "id": found.id,
                "item": found.entry.clothing_path.display().to_string(),
                "items": slots_json(&slots),
            })
        ),
        OutputFormat::Text => {
            println!("{} {}", "Barcode:".bold(), payload);
            println!(
                "{} {}",
                "Item:".bold(),
                found.entry.clothing_path.display().to_string().cyan()
            );
            print_slots(&slots);
        }
    }
    Ok(())
}
