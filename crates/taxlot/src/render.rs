//! Gain report rendering.
//!
//! The text report is tab-separated, one line per disposal date, currency
//! and term, followed by the balance of every configured currency. The JSON
//! report carries the same data with quantities as decimal strings.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use taxlot_booking::{DisposalSummary, Ledger};

/// Column titles of the text report.
pub const TEXT_HEADER: &str = "Description\tDate acquired\tDate sold\tProceeds\tCost Basis\tUnit price\tUnit basis\tGain (or loss)\tTerm";

/// Fractional digits shown for asset amounts.
pub const AMOUNT_PLACES: u32 = 8;

/// Fractional digits shown for USD values and balances.
pub const MONEY_PLACES: u32 = 2;

/// Write the tab-separated gain report and balances.
pub fn write_text<W: Write>(ledger: &Ledger, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{TEXT_HEADER}")?;
    writeln!(writer)?;

    let summaries = ledger.summarize();
    let mut rows = summaries.iter().peekable();
    while let Some(summary) = rows.next() {
        write_row(summary, writer)?;
        // blank line closes each disposal date
        if rows.peek().map_or(true, |next| next.date_sold != summary.date_sold) {
            writeln!(writer)?;
        }
    }

    writeln!(writer, "Balances:")?;
    for (currency, balance) in ledger.balances() {
        writeln!(writer, "  {currency} {}", balance.to_fixed(MONEY_PLACES))?;
    }
    Ok(())
}

fn write_row<W: Write>(summary: &DisposalSummary, writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "{} {}\t{}\t{}\t${}\t${}\t${}\t${}\t${}\t{}",
        summary.amount.to_trimmed(AMOUNT_PLACES),
        summary.currency,
        summary.acquisition_date_range(),
        summary.date_sold,
        summary.proceeds.to_fixed(MONEY_PLACES),
        summary.cost_basis.to_fixed(MONEY_PLACES),
        summary.unit_price().to_fixed(MONEY_PLACES),
        summary.unit_basis().to_fixed(MONEY_PLACES),
        summary.gain().to_fixed(MONEY_PLACES),
        summary.term,
    )
}

/// JSON form of one report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonDisposal {
    /// Disposal date.
    pub date_sold: String,
    /// Asset symbol.
    pub currency: String,
    /// `short` or `long`.
    pub term: String,
    /// Units disposed.
    pub amount: String,
    /// Acquisition dates as shown in the text report.
    pub date_acquired: String,
    /// Every acquisition date.
    pub acquisition_dates: Vec<String>,
    /// Total USD received.
    pub proceeds: String,
    /// Total USD cost basis.
    pub cost_basis: String,
    /// USD received per unit.
    pub unit_price: String,
    /// USD cost basis per unit.
    pub unit_basis: String,
    /// Realized gain.
    pub gain: String,
}

impl From<&DisposalSummary> for JsonDisposal {
    fn from(summary: &DisposalSummary) -> Self {
        Self {
            date_sold: summary.date_sold.to_string(),
            currency: summary.currency.to_string(),
            term: summary.term.to_string(),
            amount: summary.amount.to_trimmed(AMOUNT_PLACES),
            date_acquired: summary.acquisition_date_range(),
            acquisition_dates: summary
                .acquisition_dates
                .iter()
                .map(ToString::to_string)
                .collect(),
            proceeds: summary.proceeds.to_fixed(MONEY_PLACES),
            cost_basis: summary.cost_basis.to_fixed(MONEY_PLACES),
            unit_price: summary.unit_price().to_fixed(MONEY_PLACES),
            unit_basis: summary.unit_basis().to_fixed(MONEY_PLACES),
            gain: summary.gain().to_fixed(MONEY_PLACES),
        }
    }
}

/// JSON form of the whole report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonReport {
    /// Report lines in text-report order.
    pub disposals: Vec<JsonDisposal>,
    /// Final balance per configured currency.
    pub balances: BTreeMap<String, String>,
}

impl JsonReport {
    /// Build the report from a ledger.
    #[must_use]
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            disposals: ledger.summarize().iter().map(JsonDisposal::from).collect(),
            balances: ledger
                .balances()
                .iter()
                .map(|(currency, balance)| {
                    (currency.to_string(), balance.to_trimmed(AMOUNT_PLACES))
                })
                .collect(),
        }
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(ledger: &Ledger, writer: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &JsonReport::from_ledger(ledger))?;
    writeln!(writer).map_err(serde_json::Error::io)
}
