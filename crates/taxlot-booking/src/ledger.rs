//! The lot-accounting ledger.
//!
//! A [`Ledger`] owns every live lot and the running balance of each
//! configured currency. Acquisitions add lots; disposals consume lots from
//! the most recently acquired backwards and emit [`TaxEvent`]s split into a
//! long-term and a short-term bucket.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use taxlot_core::{
    parse_date, Consumption, Currency, CurrencySet, Lot, LotStore, Operation, Quantity, TaxEvent,
    Term,
};
use tracing::{debug, trace};

use crate::summary::{summarize, DisposalSummary};
use crate::LedgerError;

/// Configuration for a [`Ledger`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Currencies the ledger accepts. A zero balance is tracked for each.
    pub currencies: CurrencySet,
}

impl LedgerConfig {
    /// Configure the ledger to accept exactly `currencies`.
    #[must_use]
    pub fn with_currencies<I, C>(currencies: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Currency>,
    {
        Self {
            currencies: currencies.into_iter().collect(),
        }
    }
}

/// Per-term accumulator for one disposal.
#[derive(Debug, Default)]
struct Bucket {
    amount: Quantity,
    cost: Quantity,
    dates: BTreeSet<NaiveDate>,
}

impl Bucket {
    fn add(&mut self, taken: &Consumption) {
        self.amount += &taken.amount;
        self.cost += &taken.cost();
        self.dates.insert(taken.acquisition_date);
    }

    fn into_event(
        self,
        term: Term,
        date: NaiveDate,
        currency: &Currency,
        unit_sale_price: &Quantity,
    ) -> Option<TaxEvent> {
        if !self.amount.is_positive() {
            return None;
        }
        let avg_unit_cost_basis = self.cost.checked_div(&self.amount)?;
        Some(TaxEvent {
            date,
            amount: self.amount,
            currency: currency.clone(),
            unit_sale_price: unit_sale_price.clone(),
            avg_unit_cost_basis,
            term,
            acquisition_dates: self.dates,
        })
    }
}

/// Tracks lots, balances and realized-gain tax events.
///
/// Operations must be applied in input order: which lots a disposal consumes
/// depends on the lots present at that moment.
///
/// # Examples
///
/// ```
/// use taxlot_booking::{Ledger, LedgerConfig};
/// use taxlot_core::{Quantity, Term};
///
/// let mut ledger = Ledger::new(LedgerConfig::default());
/// ledger.acquire("BTC", "1", "10000", "2020-01-01", "").unwrap();
///
/// let events = ledger.dispose("BTC", "1", "15000", "2021-01-03", "").unwrap();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].term, Term::Long);
/// assert_eq!(events[0].gain(), Quantity::from_integer(5000));
/// assert_eq!(ledger.balance("BTC"), Some(&Quantity::zero()));
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    currencies: CurrencySet,
    lots: LotStore,
    balances: BTreeMap<Currency, Quantity>,
    tax_events: BTreeMap<NaiveDate, Vec<TaxEvent>>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Ledger {
    /// Create an empty ledger with a zero balance for every configured currency.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        let balances = config
            .currencies
            .iter()
            .map(|c| (c.clone(), Quantity::zero()))
            .collect();
        Self {
            currencies: config.currencies,
            lots: LotStore::new(),
            balances,
            tax_events: BTreeMap::new(),
        }
    }

    /// The accepted currencies.
    #[must_use]
    pub const fn currencies(&self) -> &CurrencySet {
        &self.currencies
    }

    /// Running balance of every configured currency.
    #[must_use]
    pub const fn balances(&self) -> &BTreeMap<Currency, Quantity> {
        &self.balances
    }

    /// Running balance of `currency`, `None` if it is not configured.
    #[must_use]
    pub fn balance(&self, currency: &str) -> Option<&Quantity> {
        self.balances.get(currency)
    }

    /// Emitted tax events keyed by disposal date.
    #[must_use]
    pub const fn tax_events(&self) -> &BTreeMap<NaiveDate, Vec<TaxEvent>> {
        &self.tax_events
    }

    /// Live lots of `currency`, earliest acquisition first.
    pub fn lots(&self, currency: &str) -> impl Iterator<Item = &Lot> {
        self.lots.lots(currency)
    }

    /// The underlying lot store.
    #[must_use]
    pub const fn lot_store(&self) -> &LotStore {
        &self.lots
    }

    /// Group the emitted tax events for reporting.
    #[must_use]
    pub fn summarize(&self) -> Vec<DisposalSummary> {
        summarize(&self.tax_events)
    }

    /// Apply one imported operation.
    pub fn apply(&mut self, operation: &Operation) -> Result<(), LedgerError> {
        match operation {
            Operation::Acquire {
                currency,
                amount,
                unit_cost_basis,
                date,
                tag,
            } => self.acquire(currency, amount, unit_cost_basis, date, tag),
            Operation::Dispose {
                currency,
                amount,
                unit_sale_price,
                date,
                tag,
            } => self
                .dispose(currency, amount, unit_sale_price, date, tag)
                .map(drop),
            Operation::Exchange {
                from_currency,
                to_currency,
                from_amount,
                to_amount,
                from_price,
                to_price,
                date,
            } => self
                .exchange(
                    from_currency,
                    to_currency,
                    from_amount,
                    to_amount,
                    from_price,
                    to_price,
                    date,
                )
                .map(drop),
        }
    }

    /// Acquire `amount` units of `currency` at `unit_cost_basis` USD each.
    ///
    /// All fields are validated before the ledger is touched.
    pub fn acquire(
        &mut self,
        currency: &str,
        amount: &str,
        unit_cost_basis: &str,
        date: &str,
        tag: &str,
    ) -> Result<(), LedgerError> {
        let currency = self.resolve_currency(currency)?;
        let amount = parse_quantity("amount", amount)?;
        let unit_cost_basis = parse_quantity("unit cost basis", unit_cost_basis)?;
        let date = parse_date(date)?;
        self.acquire_lot(Lot::new(currency, amount, unit_cost_basis, date, tag))
    }

    /// Add a lot built by the caller.
    pub fn acquire_lot(&mut self, lot: Lot) -> Result<(), LedgerError> {
        self.resolve_currency(lot.currency().as_str())?;
        check_non_negative("amount", lot.amount())?;
        check_non_negative("unit cost basis", lot.unit_cost_basis())?;

        debug!(
            currency = %lot.currency(),
            amount = %lot.amount().to_trimmed(8),
            unit_cost_basis = %lot.unit_cost_basis().to_trimmed(8),
            date = %lot.acquisition_date(),
            tag = lot.tag(),
            "acquire"
        );

        *self.balances.entry(lot.currency().clone()).or_default() += lot.amount();
        self.lots.insert(lot);
        Ok(())
    }

    /// Dispose of `amount` units of `currency` at `unit_sale_price` USD each.
    ///
    /// Returns the tax events emitted (long-term first, then short-term).
    pub fn dispose(
        &mut self,
        currency: &str,
        amount: &str,
        unit_sale_price: &str,
        date: &str,
        tag: &str,
    ) -> Result<Vec<TaxEvent>, LedgerError> {
        let currency = self.resolve_currency(currency)?;
        let amount = parse_quantity("amount", amount)?;
        let unit_sale_price = parse_quantity("unit sale price", unit_sale_price)?;
        let date = parse_date(date)?;
        self.dispose_units(&currency, &amount, &unit_sale_price, date, tag)
    }

    /// Dispose of already-parsed quantities.
    ///
    /// The balance check happens before any lot is touched, so an
    /// [`LedgerError::InsufficientBalance`] leaves the ledger unchanged.
    pub fn dispose_units(
        &mut self,
        currency: &Currency,
        amount: &Quantity,
        unit_sale_price: &Quantity,
        date: NaiveDate,
        tag: &str,
    ) -> Result<Vec<TaxEvent>, LedgerError> {
        self.resolve_currency(currency.as_str())?;
        check_non_negative("amount", amount)?;
        check_non_negative("unit sale price", unit_sale_price)?;

        let balance = self.balances.entry(currency.clone()).or_default();
        if amount > &*balance {
            return Err(LedgerError::InsufficientBalance {
                currency: currency.clone(),
                requested: amount.clone(),
                available: balance.clone(),
            });
        }
        *balance -= amount;

        let mut long = Bucket::default();
        let mut short = Bucket::default();
        let mut remaining = amount.clone();

        while remaining.is_positive() {
            let Some(taken) = self.lots.take_latest(currency.as_str(), &remaining) else {
                return Err(LedgerError::NoRemainingLots {
                    currency: currency.clone(),
                    remaining,
                });
            };
            let term = Term::classify(taken.acquisition_date, date);
            trace!(
                currency = %currency,
                taken = %taken.amount.to_trimmed(8),
                acquired = %taken.acquisition_date,
                closed = taken.closed,
                %term,
                "consume lot"
            );
            remaining -= &taken.amount;
            match term {
                Term::Long => long.add(&taken),
                Term::Short => short.add(&taken),
            }
        }

        debug_assert_eq!(
            self.balances.get(currency),
            Some(&self.lots.units(currency.as_str())),
            "balance of {currency} disagrees with its lots"
        );

        let events: Vec<TaxEvent> = [(Term::Long, long), (Term::Short, short)]
            .into_iter()
            .filter_map(|(term, bucket)| bucket.into_event(term, date, currency, unit_sale_price))
            .collect();

        debug!(
            currency = %currency,
            amount = %amount.to_trimmed(8),
            unit_sale_price = %unit_sale_price.to_trimmed(8),
            %date,
            tag,
            events = events.len(),
            "dispose"
        );

        if !events.is_empty() {
            self.tax_events
                .entry(date)
                .or_default()
                .extend(events.iter().cloned());
        }
        Ok(events)
    }

    pub(crate) fn resolve_currency(&self, symbol: &str) -> Result<Currency, LedgerError> {
        self.currencies
            .get(symbol)
            .cloned()
            .ok_or_else(|| LedgerError::InvalidCurrency(symbol.to_string()))
    }
}

/// Parse a field that must be a non-negative exact quantity.
pub(crate) fn parse_quantity(field: &'static str, text: &str) -> Result<Quantity, LedgerError> {
    Quantity::parse_non_negative(text).map_err(|e| LedgerError::quantity(field, e))
}

fn check_non_negative(field: &'static str, value: &Quantity) -> Result<(), LedgerError> {
    if value.is_negative() {
        return Err(LedgerError::quantity(
            field,
            taxlot_core::QuantityError::Negative(value.to_string()),
        ));
    }
    Ok(())
}
