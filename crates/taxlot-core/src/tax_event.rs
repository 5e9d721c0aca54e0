//! Tax events emitted by disposals, and their short/long-term classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::date::days_between;
use crate::{Currency, Quantity};

/// A lot must be held strictly longer than this many days to be long-term.
/// A lot held exactly 366 days is short-term.
pub const LONG_TERM_DAYS: i64 = 366;

/// Holding-period classification of a gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// Held for at most [`LONG_TERM_DAYS`] days.
    Short,
    /// Held for more than [`LONG_TERM_DAYS`] days.
    Long,
}

impl Term {
    /// Classify a lot acquired on `acquired` and disposed of on `disposed`.
    ///
    /// ```
    /// use taxlot_core::Term;
    /// use chrono::NaiveDate;
    ///
    /// let bought = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    /// let sold = NaiveDate::from_ymd_opt(2021, 1, 3).unwrap();
    /// assert_eq!(Term::classify(bought, sold), Term::Long);
    /// ```
    #[must_use]
    pub fn classify(acquired: NaiveDate, disposed: NaiveDate) -> Self {
        if days_between(acquired, disposed) > LONG_TERM_DAYS {
            Self::Long
        } else {
            Self::Short
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// The classified result of one disposal bucket.
///
/// A disposal that consumed both short-term and long-term lots produces two
/// events. Events are never modified after they are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxEvent {
    /// Disposal date.
    pub date: NaiveDate,
    /// Units disposed in this bucket.
    pub amount: Quantity,
    /// The asset disposed.
    pub currency: Currency,
    /// USD received per unit.
    pub unit_sale_price: Quantity,
    /// Weighted average USD cost per unit of the lots consumed.
    pub avg_unit_cost_basis: Quantity,
    /// Holding-period classification.
    pub term: Term,
    /// Distinct acquisition dates of the lots consumed.
    pub acquisition_dates: BTreeSet<NaiveDate>,
}

impl TaxEvent {
    /// Total USD received.
    #[must_use]
    pub fn proceeds(&self) -> Quantity {
        &self.amount * &self.unit_sale_price
    }

    /// Total USD cost basis of the units disposed.
    #[must_use]
    pub fn cost_basis(&self) -> Quantity {
        &self.amount * &self.avg_unit_cost_basis
    }

    /// Realized gain (negative for a loss).
    #[must_use]
    pub fn gain(&self) -> Quantity {
        self.proceeds() - self.cost_basis()
    }
}
