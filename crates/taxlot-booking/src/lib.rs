//! Lot-accounting ledger for taxlot.
//!
//! This crate provides:
//! - The [`Ledger`], which books acquisitions, disposals and trades
//! - Short-term / long-term splitting of every disposal into tax events
//! - Grouping of tax events for reporting ([`summarize`])
//!
//! # Disposals
//!
//! A disposal consumes the most recently acquired lots first. Lots held for
//! more than 366 days produce a long-term event, the rest a short-term one.
//!
//! ```
//! use taxlot_booking::{Ledger, LedgerConfig};
//! use taxlot_core::{Quantity, Term};
//!
//! let mut ledger = Ledger::new(LedgerConfig::default());
//! ledger.acquire("BTC", "0.5", "100", "2020-01-01", "").unwrap();
//! ledger.acquire("BTC", "0.5", "200", "2020-06-01", "").unwrap();
//!
//! let events = ledger.dispose("BTC", "0.6", "300", "2020-07-01", "").unwrap();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].term, Term::Short);
//! assert_eq!(events[0].cost_basis(), Quantity::from_integer(110));
//! assert_eq!(ledger.balance("BTC"), Some(&"0.4".parse().unwrap()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod exchange;
mod ledger;
mod summary;

pub use error::LedgerError;
pub use exchange::implied_price;
pub use ledger::{Ledger, LedgerConfig};
pub use summary::{format_date_range, summarize, DisposalSummary, MAX_LISTED_DATES};
