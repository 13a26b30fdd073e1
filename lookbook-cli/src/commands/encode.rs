//! Encode command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use lookbook_core::barcode::SymbolRenderer;
use lookbook_core::SymbolId;

use crate::OutputFormat;

/// Execute the encode command.
///
/// Only the file name component of `name` is hashed, matching how the
/// bootstrapper identifies items.
pub fn execute(name: &str, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    let id = SymbolId::from_item_name(file_name);

    if let Some(path) = output {
        SymbolRenderer::default()
            .render_to(&id, path)
            .with_context(|| format!("Failed to write barcode: {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "name": file_name,
                "id": id.as_str(),
                "payload": id.payload(),
                "output": output.map(|p| p.display().to_string()),
            })
        ),
        OutputFormat::Text => {
            println!("{} {}", "Item:".bold(), file_name);
            println!("{} {}", "Id:".bold(), id);
            println!("{} {}", "EAN-13:".bold(), id.payload().green());
            if let Some(path) = output {
                println!("{} {}", "Written:".bold(), path.display());
            }
        }
    }
    Ok(())
}
