//! List command implementation.

use anyhow::Result;
use colored::Colorize;
use lookbook_core::Catalog;

use crate::utils::load_mapping;
use crate::OutputFormat;

/// Execute the list command.
pub fn execute(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let mapping = load_mapping(catalog)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mapping)?),
        OutputFormat::Text => {
            for (id, entry) in &mapping {
                println!(
                    "{}  {}  {}",
                    id.green(),
                    entry.clothing_path.display(),
                    entry.barcode_path.display().to_string().dimmed()
                );
            }
            println!("{} {} entries", "Total:".bold(), mapping.len());
        }
    }
    Ok(())
}
