//! Currency symbols and the configured set of recognized currencies.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Currencies recognized when no explicit set is configured.
pub const DEFAULT_CURRENCIES: &[&str] = &["ADA", "BTC", "ETC", "ETH", "STORJ", "XLM", "XMR", "ZEC"];

/// An asset symbol such as `BTC` or `ETH`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a currency symbol. No validation is applied here; membership is
    /// checked against a [`CurrencySet`].
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Currency {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Currency {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for Currency {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of currencies a ledger will accept.
///
/// # Examples
///
/// ```
/// use taxlot_core::CurrencySet;
///
/// let set = CurrencySet::default();
/// assert!(set.contains("BTC"));
/// assert!(!set.contains("DOGE"));
///
/// let custom: CurrencySet = ["DOGE", "BTC"].into_iter().collect();
/// assert_eq!(custom.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySet {
    currencies: BTreeSet<Currency>,
}

impl CurrencySet {
    /// Check if `symbol` is a recognized currency.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.currencies.contains(symbol)
    }

    /// Look up the canonical [`Currency`] for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Currency> {
        self.currencies.get(symbol)
    }

    /// Iterate over the currencies in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

    /// Number of currencies in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl Default for CurrencySet {
    fn default() -> Self {
        DEFAULT_CURRENCIES.iter().copied().collect()
    }
}

impl<C: Into<Currency>> FromIterator<C> for CurrencySet {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            currencies: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CurrencySet {
    type Item = &'a Currency;
    type IntoIter = std::collections::btree_set::Iter<'a, Currency>;

    fn into_iter(self) -> Self::IntoIter {
        self.currencies.iter()
    }
}
