//! Ledger errors.

use taxlot_core::{Currency, DateError, Quantity, QuantityError};
use thiserror::Error;

/// Errors that can occur while applying an operation to a ledger.
///
/// Every variant except [`LedgerError::NoRemainingLots`] describes bad input
/// and leaves the ledger unchanged. `NoRemainingLots` is raised part way
/// through a disposal, after the balance was reduced and some lots consumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The currency is not in the configured set.
    #[error("unknown currency '{0}'")]
    InvalidCurrency(String),

    /// A numeric field is not an acceptable exact quantity.
    #[error("invalid {field}: {source}")]
    InvalidQuantity {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        source: QuantityError,
    },

    /// A date field is in neither accepted format.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// The disposal exceeds the tracked balance.
    #[error(
        "insufficient {currency} balance: disposing {}, holding {}",
        .requested.to_trimmed(8),
        .available.to_trimmed(8)
    )]
    InsufficientBalance {
        /// The currency being disposed.
        currency: Currency,
        /// Units requested.
        requested: Quantity,
        /// Units held.
        available: Quantity,
    },

    /// Lots ran out before the disposal was covered although the balance
    /// allowed it. The ledger state is corrupt.
    #[error(
        "no remaining {currency} lots to cover {}: balance and lots disagree",
        .remaining.to_trimmed(8)
    )]
    NoRemainingLots {
        /// The currency being disposed.
        currency: Currency,
        /// Units left uncovered.
        remaining: Quantity,
    },

    /// An exchange gave a USD price for both legs.
    #[error("exchange {from} -> {to} has prices for both legs, expected exactly one")]
    AmbiguousPrice {
        /// Currency given up.
        from: String,
        /// Currency received.
        to: String,
    },

    /// An exchange gave a USD price for neither leg.
    #[error("exchange {from} -> {to} has no price, expected exactly one")]
    MissingPrice {
        /// Currency given up.
        from: String,
        /// Currency received.
        to: String,
    },
}

impl LedgerError {
    /// Check if the error signals corrupted ledger state rather than bad
    /// input.
    ///
    /// A fatal error leaves the ledger partially mutated: the balance has
    /// already been reduced by the full amount and the lots that were found
    /// have been consumed, but no tax event was recorded. Callers must not
    /// continue using the ledger after a fatal error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::NoRemainingLots { .. })
    }

    pub(crate) const fn quantity(field: &'static str, source: QuantityError) -> Self {
        Self::InvalidQuantity { field, source }
    }
}
