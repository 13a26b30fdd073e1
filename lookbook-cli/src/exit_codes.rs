//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts to tell a bad scan from a missing file.

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Data format error (no barcode decoded, barcode not in the catalog).
/// Maps to EX_DATAERR from sysexits.h.
pub const UNRECOGNIZED: i32 = 65;

/// Cannot open input file or catalog mapping.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// I/O error (cannot write output file).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Represents an exit code with its error message.
#[derive(Debug)]
pub struct ExitCode {
    pub code: i32,
    pub message: String,
}

impl ExitCode {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Classify error by inspecting the chain
        let code = if message.contains("Failed to read file")
            || message.contains("No catalog mapping")
        {
            INPUT_ERROR
        } else if message.contains("No barcode found") || message.contains("Unrecognized barcode")
        {
            UNRECOGNIZED
        } else if message.contains("Failed to write") {
            IO_ERROR
        } else {
            GENERAL_ERROR
        };

        Self { code, message }
    }
}
