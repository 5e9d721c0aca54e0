//! Import framework for taxlot
//!
//! This crate reads the transaction log kept alongside the ledger: a CSV
//! export with a buy section, a trade section, a transfer section and a sale
//! section, one operation per row. Each row becomes an [`Operation`] tagged
//! with its line number so ledger errors can point back at the source.
//!
//! # Example
//!
//! ```rust,no_run
//! use taxlot_importer::{extract_from_file, ImporterConfig};
//! use std::path::Path;
//!
//! let result = extract_from_file(Path::new("trades.csv"), &ImporterConfig::default())?;
//! for imported in &result.operations {
//!     println!("line {}: {}", imported.line, imported.operation);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod csv_importer;

use anyhow::Result;
use std::io::Read;
use std::path::Path;
use taxlot_core::Operation;

pub use config::ImporterConfig;
pub use csv_importer::{clean_amount, TradeLogImporter, COLUMN_HEADER, SECTION_HEADER};

/// An operation and the 1-based line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedOperation {
    /// Source line.
    pub line: u64,
    /// The operation on that line.
    pub operation: Operation,
}

/// Result of an import operation.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// The extracted operations, in file order.
    pub operations: Vec<ImportedOperation>,
    /// Warnings encountered during import.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Create an empty import result.
    pub const fn empty() -> Self {
        Self {
            operations: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Extract operations from a file using the given configuration.
pub fn extract_from_file(path: &Path, config: &ImporterConfig) -> Result<ImportResult> {
    TradeLogImporter::new(config.clone()).extract_file(path)
}

/// Extract operations from any reader.
pub fn extract_from_reader<R: Read>(reader: R, config: &ImporterConfig) -> Result<ImportResult> {
    TradeLogImporter::new(config.clone()).extract_reader(reader)
}

/// Extract operations from file contents (useful for testing).
pub fn extract_from_string(content: &str, config: &ImporterConfig) -> Result<ImportResult> {
    TradeLogImporter::new(config.clone()).extract_string(content)
}
