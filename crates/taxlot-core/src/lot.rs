//! Lot type representing one acquisition of an asset.
//!
//! A [`Lot`] records how many units were acquired, at what USD cost per unit,
//! and on which date. Its amount only ever shrinks (through partial
//! consumption by a disposal); the unit cost basis and date never change.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::{Currency, Quantity};

/// A discrete quantity of an asset acquired at one time and price.
///
/// # Examples
///
/// ```
/// use taxlot_core::{Currency, Lot, Quantity};
/// use chrono::NaiveDate;
///
/// let lot = Lot::new(
///     Currency::new("BTC"),
///     "0.5".parse().unwrap(),
///     "200".parse().unwrap(),
///     NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
///     "",
/// );
/// assert_eq!(lot.amount(), &"0.5".parse::<Quantity>().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lot {
    currency: Currency,
    amount: Quantity,
    unit_cost_basis: Quantity,
    acquisition_date: NaiveDate,
    tag: String,
}

impl Lot {
    /// Create a new lot.
    #[must_use]
    pub fn new(
        currency: Currency,
        amount: Quantity,
        unit_cost_basis: Quantity,
        acquisition_date: NaiveDate,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            currency,
            amount,
            unit_cost_basis,
            acquisition_date,
            tag: tag.into(),
        }
    }

    /// The asset held.
    #[must_use]
    pub const fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Units still held in this lot.
    #[must_use]
    pub const fn amount(&self) -> &Quantity {
        &self.amount
    }

    /// USD cost per unit at acquisition.
    #[must_use]
    pub const fn unit_cost_basis(&self) -> &Quantity {
        &self.unit_cost_basis
    }

    /// Date the lot was acquired.
    #[must_use]
    pub const fn acquisition_date(&self) -> NaiveDate {
        self.acquisition_date
    }

    /// Provenance label, e.g. `trade-from-ETH`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Check if the lot has been fully consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }

    /// Remove `units` from the lot. Callers guarantee `units <= amount`.
    pub(crate) fn reduce(&mut self, units: &Quantity) {
        debug_assert!(units <= &self.amount, "lot reduced below zero");
        self.amount -= units;
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {{{} USD, {}",
            self.amount.to_trimmed(8),
            self.currency,
            self.unit_cost_basis.to_trimmed(8),
            self.acquisition_date
        )?;
        if !self.tag.is_empty() {
            write!(f, ", \"{}\"", self.tag)?;
        }
        write!(f, "}}")
    }
}
