//! Recommend command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use lookbook_core::Catalog;
use tracing::{debug, info};

use crate::utils::{catalog_reference, load_mapping, print_slots, read_input, slots_json};
use crate::OutputFormat;

/// Execute the recommend command.
pub fn execute(catalog: &Catalog, file: &Path, count: usize, format: OutputFormat) -> Result<()> {
    let content = read_input(file)?;
    info!(path = %file.display(), bytes = content.len(), "Read file");

    let mapping = load_mapping(catalog)?;
    debug!(entries = mapping.len(), "Loaded mapping");

    let query = catalog
        .describe(&content)
        .with_context(|| format!("Failed to extract features from {}", file.display()))?;
    let exclude = catalog_reference(catalog, file);
    let slots = catalog.recommend_for_descriptor(&query, &exclude, count)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "items": slots_json(&slots) })),
        OutputFormat::Text => {
            println!(
                "{} {}",
                "Similar to".bold(),
                file.display().to_string().cyan()
            );
            print_slots(&slots);
        }
    }
    Ok(())
}
