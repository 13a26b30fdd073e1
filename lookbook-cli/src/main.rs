//! Lookbook CLI - build and query a clothing catalog from the terminal.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lookbook_core::DEFAULT_RECOMMENDATIONS;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  65  Barcode not decoded or not in the catalog
  66  Input file or catalog mapping missing
  74  Failed to write output";

#[derive(Parser)]
#[command(name = "lookbook")]
#[command(author, version, about = "Visual clothing recommendations and barcode lookup", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Catalog root containing clothing/, barcodes/, features/ and mapping.json
    #[arg(long, global = true, default_value = ".", env = "CATALOG_ROOT")]
    root: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How command results are printed
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate barcodes, descriptors and the mapping from clothing/
    Bootstrap,

    /// Recommend catalog items similar to a clothing photo
    Recommend {
        /// Path to the clothing photo
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of recommendation slots
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        count: usize,
    },

    /// Decode a barcode photo and recommend items similar to its item
    Scan {
        /// Path to the barcode photo
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum number of recommendations
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        count: usize,
    },

    /// Print (and optionally render) the barcode of an item name
    Encode {
        /// Item file name, e.g. red_shirt.jpg
        #[arg(value_name = "NAME")]
        name: String,

        /// Write the rendered barcode PNG here
        #[arg(short, long, value_name = "PNG")]
        output: Option<PathBuf>,
    },

    /// List catalog entries
    List,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        let exit = ExitCode::from_anyhow(&err);
        eprintln!("{} {}", "error:".red().bold(), exit.message);
        std::process::exit(exit.code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let catalog = utils::open_catalog(&cli.root);

    match cli.command {
        Commands::Bootstrap => commands::bootstrap::execute(&catalog, cli.format),
        Commands::Recommend { file, count } => {
            commands::recommend::execute(&catalog, &file, count, cli.format)
        }
        Commands::Scan { file, count } => {
            commands::scan::execute(&catalog, &file, count, cli.format)
        }
        Commands::Encode { name, output } => {
            commands::encode::execute(&name, output.as_deref(), cli.format)
        }
        Commands::List => commands::list::execute(&catalog, cli.format),
    }
}
