//! Core types for taxlot
//!
//! This crate provides the fundamental types used by the taxlot workspace:
//!
//! - [`Quantity`] - An exact rational number for amounts, prices and cost bases
//! - [`Currency`] / [`CurrencySet`] - Asset symbols and the recognized set
//! - [`Lot`] - Units of an asset acquired at one date and unit cost
//! - [`LotStore`] - Live lots per currency in consumption order
//! - [`TaxEvent`] / [`Term`] - Classified results of a disposal
//! - [`Operation`] - A buy, sell or trade read from a transaction log
//!
//! # Example
//!
//! ```
//! use taxlot_core::{Currency, Lot, LotStore, Quantity, Term};
//! use chrono::NaiveDate;
//!
//! let btc = Currency::new("BTC");
//! let bought = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let sold = NaiveDate::from_ymd_opt(2021, 1, 3).unwrap();
//!
//! let mut store = LotStore::new();
//! store.insert(Lot::new(btc, Quantity::from_integer(1), Quantity::from_integer(10000), bought, ""));
//!
//! let taken = store.take_latest("BTC", &Quantity::from_integer(1)).unwrap();
//! assert_eq!(taken.cost(), Quantity::from_integer(10000));
//! assert_eq!(Term::classify(taken.acquisition_date, sold), Term::Long);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod currency;
pub mod date;
pub mod inventory;
pub mod lot;
pub mod operation;
pub mod quantity;
pub mod tax_event;

pub use currency::{Currency, CurrencySet, DEFAULT_CURRENCIES};
pub use date::{days_between, parse_date, DateError};
pub use inventory::{Consumption, LotStore};
pub use lot::Lot;
pub use operation::Operation;
pub use quantity::{Quantity, QuantityError};
pub use tax_event::{TaxEvent, Term, LONG_TERM_DAYS};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use num_rational::BigRational;
