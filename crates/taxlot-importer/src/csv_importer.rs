//! Transaction-log CSV importer.
//!
//! The log is a spreadsheet export with two header rows and one operation per
//! data row. Column 0 holds the date; the remaining columns are split into
//! fixed sections, and at most one section may be filled in per row.

use crate::config::ImporterConfig;
use crate::{ImportResult, ImportedOperation};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::RangeInclusive;
use std::path::Path;
use taxlot_core::Operation;
use tracing::{debug, warn};

/// First header row: section titles.
pub const SECTION_HEADER: &str = ",Buy,,,,,Trades,,,,,,,Transfers,,,,,,,Sales,,,,,,";

/// Second header row: column titles.
pub const COLUMN_HEADER: &str = ",Amount,Currency,Unit basis,USD Value,,Amount,Source currency,Amount,Target currency,Unit price,Target amount after fees,,Amount,Currency,Source,Target,Fees (in addition to Amount),,,Amount,Currency,Unit price,Fees (in addition to Amount),USD Net,,URL";

const DATE: usize = 0;

const BUY: RangeInclusive<usize> = 1..=3;
const BUY_AMOUNT: usize = 1;
const BUY_CURRENCY: usize = 2;
const BUY_UNIT_BASIS: usize = 3;

const TRADE: RangeInclusive<usize> = 6..=11;
const TRADE_SOURCE_AMOUNT: usize = 6;
const TRADE_SOURCE_CURRENCY: usize = 7;
const TRADE_TARGET_AMOUNT: usize = 8;
const TRADE_TARGET_CURRENCY: usize = 9;
const TRADE_SOURCE_PRICE: usize = 10;

const TRANSFER: RangeInclusive<usize> = 13..=17;

const SALE: RangeInclusive<usize> = 20..=23;
const SALE_AMOUNT: usize = 20;
const SALE_CURRENCY: usize = 21;
const SALE_UNIT_PRICE: usize = 22;

/// The sections of a data row that describe an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Buy,
    Trade,
    Sale,
}

impl Section {
    const ALL: [Self; 3] = [Self::Buy, Self::Trade, Self::Sale];

    const fn columns(self) -> RangeInclusive<usize> {
        match self {
            Self::Buy => BUY,
            Self::Trade => TRADE,
            Self::Sale => SALE,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Trade => "trade",
            Self::Sale => "sale",
        }
    }
}

/// Transaction-log importer.
#[derive(Debug, Clone, Default)]
pub struct TradeLogImporter {
    config: ImporterConfig,
}

impl TradeLogImporter {
    /// Create a new importer with the given configuration.
    pub const fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    /// Extract operations from a file.
    pub fn extract_file(&self, path: &Path) -> Result<ImportResult> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        self.extract_reader(BufReader::new(file))
            .with_context(|| format!("Failed to import {}", path.display()))
    }

    /// Extract operations from string content.
    pub fn extract_string(&self, content: &str) -> Result<ImportResult> {
        self.extract_reader(content.as_bytes())
    }

    /// Extract operations from any reader.
    pub fn extract_reader<R: Read>(&self, reader: R) -> Result<ImportResult> {
        let delimiter = u8::try_from(self.config.delimiter)
            .ok()
            .filter(u8::is_ascii);
        let Some(delimiter) = delimiter else {
            bail!("delimiter must be a single ASCII character, got '{}'", self.config.delimiter);
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);
        let mut records = reader.records();

        let headers = [(1, SECTION_HEADER, "section"), (2, COLUMN_HEADER, "column")];
        for (fallback, expected, name) in headers {
            let record = records
                .next()
                .with_context(|| format!("malformed header: missing {name} header row"))?
                .context("malformed header")?;
            if self.config.check_header && !record.iter().eq(expected.split(',')) {
                bail!(
                    "malformed header: {name} header row on line {} does not match the expected layout",
                    line_of(&record, fallback)
                );
            }
        }

        let mut result = ImportResult::empty();
        for (index, record) in records.enumerate() {
            // two header rows precede the data
            let fallback = index + 3;
            let record =
                record.with_context(|| format!("line {fallback}: malformed CSV record"))?;
            let line = line_of(&record, fallback);

            if let Some(operation) = self.parse_row(&record, line, &mut result)? {
                debug!(
                    line,
                    kind = operation.kind(),
                    date = operation.date(),
                    "imported operation"
                );
                result.operations.push(ImportedOperation { line, operation });
            }
        }

        debug!(
            operations = result.operations.len(),
            warnings = result.warnings.len(),
            "import finished"
        );
        Ok(result)
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        line: u64,
        result: &mut ImportResult,
    ) -> Result<Option<Operation>> {
        let date = cell(record, DATE).trim();
        if date.is_empty() {
            bail!("line {line}: missing date");
        }

        let present: Vec<Section> = Section::ALL
            .into_iter()
            .filter(|section| section_present(record, section.columns()))
            .collect();

        if present.len() > 1 {
            let names: Vec<&str> = present.iter().map(|s| s.name()).collect();
            bail!(
                "line {line}: row has more than one operation ({})",
                names.join(", ")
            );
        }

        let date = date.to_string();
        let operation = match present.first() {
            Some(Section::Buy) => Operation::Acquire {
                currency: currency(record, BUY_CURRENCY),
                amount: amount(record, BUY_AMOUNT),
                unit_cost_basis: amount(record, BUY_UNIT_BASIS),
                date,
                tag: String::new(),
            },
            Some(Section::Trade) => Operation::Exchange {
                from_currency: currency(record, TRADE_SOURCE_CURRENCY),
                to_currency: currency(record, TRADE_TARGET_CURRENCY),
                from_amount: amount(record, TRADE_SOURCE_AMOUNT),
                to_amount: amount(record, TRADE_TARGET_AMOUNT),
                from_price: amount(record, TRADE_SOURCE_PRICE),
                to_price: String::new(),
                date,
            },
            Some(Section::Sale) => Operation::Dispose {
                currency: currency(record, SALE_CURRENCY),
                amount: amount(record, SALE_AMOUNT),
                unit_sale_price: amount(record, SALE_UNIT_PRICE),
                date,
                tag: String::new(),
            },
            None => {
                if self.config.warn_on_transfers && section_present(record, TRANSFER) {
                    warn!(line, "transfer ignored");
                    result.warnings.push(format!("line {line}: transfer ignored"));
                }
                return Ok(None);
            }
        };
        Ok(Some(operation))
    }
}

/// Remove `$` and `,` from a numeric cell.
///
/// ```
/// use taxlot_importer::clean_amount;
///
/// assert_eq!(clean_amount("$1,234.50"), "1234.50");
/// assert_eq!(clean_amount(" 0.5 "), "0.5");
/// ```
#[must_use]
pub fn clean_amount(text: &str) -> String {
    text.trim().chars().filter(|c| !matches!(c, '$' | ',')).collect()
}

fn cell(record: &csv::StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}

fn amount(record: &csv::StringRecord, index: usize) -> String {
    clean_amount(cell(record, index))
}

fn currency(record: &csv::StringRecord, index: usize) -> String {
    cell(record, index).trim().to_string()
}

fn section_present(record: &csv::StringRecord, columns: RangeInclusive<usize>) -> bool {
    columns.map(|i| cell(record, i)).any(|c| !c.trim().is_empty())
}

fn line_of(record: &csv::StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map_or(fallback as u64, csv::Position::line)
}
