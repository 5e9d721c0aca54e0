//! Configuration for the transaction-log importer.

/// Configuration for reading a transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterConfig {
    /// The field delimiter.
    pub delimiter: char,
    /// Whether the two header rows must match the expected layout exactly.
    pub check_header: bool,
    /// Whether rows that only record a transfer produce a warning.
    pub warn_on_transfers: bool,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            check_header: true,
            warn_on_transfers: true,
        }
    }
}

impl ImporterConfig {
    /// Set the field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Accept any two header rows without comparing them.
    #[must_use]
    pub const fn skip_header_check(mut self) -> Self {
        self.check_header = false;
        self
    }

    /// Do not warn about transfer rows.
    #[must_use]
    pub const fn quiet_transfers(mut self) -> Self {
        self.warn_on_transfers = false;
        self
    }
}
