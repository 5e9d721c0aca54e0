//! Lot store holding every live acquisition lot, grouped by currency.
//!
//! Each currency keeps its lots in a [`VecDeque`] sorted by ascending
//! acquisition date. Lots with the same date keep insertion order. Disposals
//! consume from the back of the queue: the most recently acquired lot first,
//! walking backwards towards the earliest.

use chrono::NaiveDate;
use std::collections::{BTreeMap, VecDeque};

use crate::{Currency, Lot, Quantity};

/// The part of a lot taken by one consumption step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumption {
    /// Units taken from the lot.
    pub amount: Quantity,
    /// The lot's USD cost per unit.
    pub unit_cost_basis: Quantity,
    /// The lot's acquisition date.
    pub acquisition_date: NaiveDate,
    /// Whether the lot was used up and removed from the store.
    pub closed: bool,
}

impl Consumption {
    /// USD cost of the units taken.
    #[must_use]
    pub fn cost(&self) -> Quantity {
        &self.amount * &self.unit_cost_basis
    }
}

/// An ordered collection of lots per currency.
///
/// # Examples
///
/// ```
/// use taxlot_core::{Currency, Lot, LotStore, Quantity};
/// use chrono::NaiveDate;
///
/// let btc = Currency::new("BTC");
/// let day = |m| NaiveDate::from_ymd_opt(2020, m, 1).unwrap();
///
/// let mut store = LotStore::new();
/// store.insert(Lot::new(btc.clone(), "0.5".parse().unwrap(), "100".parse().unwrap(), day(1), ""));
/// store.insert(Lot::new(btc.clone(), "0.5".parse().unwrap(), "200".parse().unwrap(), day(6), ""));
///
/// // The June lot is consumed first.
/// let taken = store.take_latest("BTC", &"0.6".parse().unwrap()).unwrap();
/// assert_eq!(taken.acquisition_date, day(6));
/// assert!(taken.closed);
/// assert_eq!(store.units("BTC"), "0.5".parse::<Quantity>().unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotStore {
    lots: BTreeMap<Currency, VecDeque<Lot>>,
}

impl LotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no live lots remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lots.values().all(VecDeque::is_empty)
    }

    /// Live lots of `currency`, earliest acquisition first.
    pub fn lots(&self, currency: &str) -> impl Iterator<Item = &Lot> {
        self.lots.get(currency).into_iter().flatten()
    }

    /// Total units of `currency` across its live lots.
    #[must_use]
    pub fn units(&self, currency: &str) -> Quantity {
        self.lots(currency).map(Lot::amount).sum()
    }

    /// Insert a lot in acquisition-date order.
    ///
    /// Empty lots are not stored.
    pub fn insert(&mut self, lot: Lot) {
        if lot.is_empty() {
            return;
        }
        let queue = self.lots.entry(lot.currency().clone()).or_default();
        let date = lot.acquisition_date();
        let idx = queue.partition_point(|l| l.acquisition_date() <= date);
        queue.insert(idx, lot);
    }

    /// Take up to `wanted` units from the most recently acquired lot of
    /// `currency`.
    ///
    /// A lot holding no more than `wanted` is consumed entirely and removed.
    /// A larger lot is reduced by `wanted` and stays in the store. Returns
    /// `None` if `currency` has no live lots.
    pub fn take_latest(&mut self, currency: &str, wanted: &Quantity) -> Option<Consumption> {
        let queue = self.lots.get_mut(currency)?;
        let lot = queue.back_mut()?;

        if wanted < lot.amount() {
            lot.reduce(wanted);
            return Some(Consumption {
                amount: wanted.clone(),
                unit_cost_basis: lot.unit_cost_basis().clone(),
                acquisition_date: lot.acquisition_date(),
                closed: false,
            });
        }

        let lot = queue.pop_back()?;
        Some(Consumption {
            amount: lot.amount().clone(),
            unit_cost_basis: lot.unit_cost_basis().clone(),
            acquisition_date: lot.acquisition_date(),
            closed: true,
        })
    }
}
