//! Bootstrap command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use lookbook_core::Catalog;
use tracing::info;

use crate::OutputFormat;

/// Execute the bootstrap command.
pub fn execute(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let layout = catalog.layout();
    info!(items = %layout.items_dir.display(), "Bootstrapping catalog");

    let report = catalog
        .bootstrap()
        .with_context(|| format!("Failed to write catalog under {}", layout.items_dir.display()))?;

    match format {
        OutputFormat::Json => {
            let failures: Vec<_> = report
                .failures
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "item": f.item_path.display().to_string(),
                        "error": f.error,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "scanned": report.scanned,
                    "entries": report.entries,
                    "failures": failures,
                })
            );
        }
        OutputFormat::Text => {
            println!(
                "{} {} items cataloged ({} scanned)",
                "Bootstrapped:".green().bold(),
                report.entries,
                report.scanned
            );
            println!("   {} {}", "Mapping:".dimmed(), layout.mapping_file.display());
            for failure in &report.failures {
                println!(
                    "   {} {}: {}",
                    "Skipped".yellow(),
                    failure.item_path.display(),
                    failure.error
                );
            }
        }
    }
    Ok(())
}
