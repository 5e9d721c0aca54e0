//! Typed ledger operations produced by importers.
//!
//! Every numeric and date field is raw text exactly as read from the source
//! (after `$` and `,` have been stripped). Validation happens when the
//! operation is applied to a ledger, so a malformed field is reported by the
//! same error taxonomy whatever the input format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One buy, sell or trade, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    /// Acquire units of an asset at a USD cost per unit.
    Acquire {
        /// Asset symbol.
        currency: String,
        /// Units acquired.
        amount: String,
        /// USD cost per unit.
        unit_cost_basis: String,
        /// Acquisition date.
        date: String,
        /// Provenance label.
        tag: String,
    },
    /// Dispose of units of an asset at a USD sale price per unit.
    Dispose {
        /// Asset symbol.
        currency: String,
        /// Units disposed.
        amount: String,
        /// USD received per unit.
        unit_sale_price: String,
        /// Disposal date.
        date: String,
        /// Provenance label.
        tag: String,
    },
    /// Trade one asset for another. Exactly one price should be non-empty.
    Exchange {
        /// Asset given up.
        from_currency: String,
        /// Asset received.
        to_currency: String,
        /// Units given up.
        from_amount: String,
        /// Units received.
        to_amount: String,
        /// USD price per unit of the asset given up, or empty.
        from_price: String,
        /// USD price per unit of the asset received, or empty.
        to_price: String,
        /// Trade date.
        date: String,
    },
}

impl Operation {
    /// Short name of the operation kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Acquire { .. } => "acquire",
            Self::Dispose { .. } => "dispose",
            Self::Exchange { .. } => "exchange",
        }
    }

    /// The date text of the operation.
    #[must_use]
    pub fn date(&self) -> &str {
        match self {
            Self::Acquire { date, .. } | Self::Dispose { date, .. } | Self::Exchange { date, .. } => {
                date
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquire {
                currency,
                amount,
                unit_cost_basis,
                date,
                ..
            } => write!(f, "{date} acquire {amount} {currency} @ {unit_cost_basis} USD"),
            Self::Dispose {
                currency,
                amount,
                unit_sale_price,
                date,
                ..
            } => write!(f, "{date} dispose {amount} {currency} @ {unit_sale_price} USD"),
            Self::Exchange {
                from_currency,
                to_currency,
                from_amount,
                to_amount,
                date,
                ..
            } => write!(
                f,
                "{date} exchange {from_amount} {from_currency} -> {to_amount} {to_currency}"
            ),
        }
    }
}
