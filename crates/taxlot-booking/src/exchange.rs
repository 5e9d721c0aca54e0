//! Two-asset trades.
//!
//! A trade of currency A for currency B is booked as a disposal of A
//! followed by an acquisition of B. Only one leg carries a USD price; the
//! other leg's price is implied so that both legs have the same USD value.

use taxlot_core::{parse_date, Lot, Quantity, QuantityError, TaxEvent};
use tracing::debug;

use crate::ledger::parse_quantity;
use crate::{Ledger, LedgerError};

/// The leg whose USD price was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PricedLeg {
    From,
    To,
}

/// USD price per unit of the unpriced leg.
///
/// Returns `None` when `unpriced_amount` is zero.
///
/// ```
/// use taxlot_booking::implied_price;
/// use taxlot_core::Quantity;
///
/// let q = |s: &str| s.parse::<Quantity>().unwrap();
/// // 2 ETH at $150 buys 0.03 BTC, so each BTC cost $10000.
/// assert_eq!(implied_price(&q("2"), &q("150"), &q("0.03")), Some(q("10000")));
/// ```
#[must_use]
pub fn implied_price(
    priced_amount: &Quantity,
    unit_price: &Quantity,
    unpriced_amount: &Quantity,
) -> Option<Quantity> {
    (priced_amount * unit_price).checked_div(unpriced_amount)
}

impl Ledger {
    /// Trade `from_amount` of `from_currency` for `to_amount` of `to_currency`.
    ///
    /// Exactly one of `from_price` and `to_price` must be non-empty. Every
    /// input is validated before the disposal leg runs, so an error leaves
    /// the ledger unchanged. Returns the tax events of the disposal leg.
    #[allow(clippy::too_many_arguments)]
    pub fn exchange(
        &mut self,
        from_currency: &str,
        to_currency: &str,
        from_amount: &str,
        to_amount: &str,
        from_price: &str,
        to_price: &str,
        date: &str,
    ) -> Result<Vec<TaxEvent>, LedgerError> {
        let priced = match (from_price.trim().is_empty(), to_price.trim().is_empty()) {
            (false, false) => {
                return Err(LedgerError::AmbiguousPrice {
                    from: from_currency.to_string(),
                    to: to_currency.to_string(),
                })
            }
            (true, true) => {
                return Err(LedgerError::MissingPrice {
                    from: from_currency.to_string(),
                    to: to_currency.to_string(),
                })
            }
            (false, true) => PricedLeg::From,
            (true, false) => PricedLeg::To,
        };

        let from = self.resolve_currency(from_currency)?;
        let to = self.resolve_currency(to_currency)?;
        let from_amount = parse_quantity("source amount", from_amount)?;
        let to_amount = parse_quantity("target amount", to_amount)?;
        let date = parse_date(date)?;

        let (from_price, to_price) = match priced {
            PricedLeg::From => {
                let from_price = parse_quantity("source price", from_price)?;
                let to_price = implied_price(&from_amount, &from_price, &to_amount)
                    .ok_or_else(|| zero_amount("target amount", &to_amount))?;
                (from_price, to_price)
            }
            PricedLeg::To => {
                let to_price = parse_quantity("target price", to_price)?;
                let from_price = implied_price(&to_amount, &to_price, &from_amount)
                    .ok_or_else(|| zero_amount("source amount", &from_amount))?;
                (from_price, to_price)
            }
        };

        debug!(
            from = %from,
            to = %to,
            from_amount = %from_amount.to_trimmed(8),
            to_amount = %to_amount.to_trimmed(8),
            from_price = %from_price.to_trimmed(8),
            to_price = %to_price.to_trimmed(8),
            %date,
            "exchange"
        );

        let events = self.dispose_units(
            &from,
            &from_amount,
            &from_price,
            date,
            &format!("trade-to-{to}"),
        )?;
        let tag = format!("trade-from-{from}");
        self.acquire_lot(Lot::new(to, to_amount, to_price, date, tag))?;
        Ok(events)
    }
}

fn zero_amount(field: &'static str, amount: &Quantity) -> LedgerError {
    LedgerError::quantity(field, QuantityError::Zero(amount.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use taxlot_core::Term;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    fn funded() -> Ledger {
        let mut ledger = Ledger::default();
        ledger.acquire("ETH", "10", "100", "2020-01-01", "").unwrap();
        ledger
    }

    #[test]
    fn test_exchange_with_source_price() {
        let mut ledger = funded();
        let events = ledger
            .exchange("ETH", "BTC", "2", "0.03", "150", "", "2020-03-01")
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].term, Term::Short);
        assert_eq!(events[0].unit_sale_price, q("150"));
        assert_eq!(events[0].gain(), q("100"));

        assert_eq!(ledger.balance("ETH"), Some(&q("8")));
        assert_eq!(ledger.balance("BTC"), Some(&q("0.03")));

        let lots: Vec<&Lot> = ledger.lots("BTC").collect();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].unit_cost_basis(), &q("10000"));
        assert_eq!(lots[0].tag(), "trade-from-ETH");
        assert_eq!(
            lots[0].acquisition_date(),
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_exchange_with_target_price() {
        let mut ledger = funded();
        let events = ledger
            .exchange("ETH", "BTC", "3", "0.1", "", "9000", "2020-03-01")
            .unwrap();

        // 0.1 BTC at $9000 is $900, so each ETH went for $300
        assert_eq!(events[0].unit_sale_price, q("300"));
        assert_eq!(events[0].proceeds(), q("900"));
        assert_eq!(ledger.lots("BTC").next().unwrap().unit_cost_basis(), &q("9000"));
    }

    #[test]
    fn test_exchange_conserves_usd_value() {
        let mut ledger = funded();
        ledger
            .exchange("ETH", "BTC", "1", "0.03", "100", "", "2020-03-01")
            .unwrap();

        let event = &ledger.tax_events().values().next().unwrap()[0];
        let lot = ledger.lots("BTC").next().unwrap();
        assert_eq!(event.proceeds(), lot.amount() * lot.unit_cost_basis());
        // 100 / 0.03 does not terminate; it must stay exact
        assert_eq!(lot.unit_cost_basis(), &Quantity::from_fraction(10000, 3).unwrap());
    }

    #[test]
    fn test_exchange_price_presence() {
        let mut ledger = funded();
        assert_eq!(
            ledger.exchange("ETH", "BTC", "1", "0.03", "100", "3000", "2020-03-01"),
            Err(LedgerError::AmbiguousPrice {
                from: "ETH".into(),
                to: "BTC".into()
            })
        );
        assert_eq!(
            ledger.exchange("ETH", "BTC", "1", "0.03", "", " ", "2020-03-01"),
            Err(LedgerError::MissingPrice {
                from: "ETH".into(),
                to: "BTC".into()
            })
        );
    }

    #[test]
    fn test_exchange_validates_before_disposing() {
        let mut ledger = funded();
        let before = ledger.clone();

        assert_eq!(
            ledger.exchange("ETH", "DOGE", "1", "100", "100", "", "2020-03-01"),
            Err(LedgerError::InvalidCurrency("DOGE".into()))
        );
        assert!(matches!(
            ledger.exchange("ETH", "BTC", "1", "lots", "100", "", "2020-03-01"),
            Err(LedgerError::InvalidQuantity {
                field: "target amount",
                ..
            })
        ));
        assert!(matches!(
            ledger.exchange("ETH", "BTC", "1", "0", "100", "", "2020-03-01"),
            Err(LedgerError::InvalidQuantity {
                field: "target amount",
                source: QuantityError::Zero(_)
            })
        ));
        assert!(matches!(
            ledger.exchange("ETH", "BTC", "1", "0.03", "100", "", "March"),
            Err(LedgerError::InvalidDate(_))
        ));
        assert!(matches!(
            ledger.exchange("ETH", "BTC", "11", "0.03", "100", "", "2020-03-01"),
            Err(LedgerError::InsufficientBalance { .. })
        ));

        assert_eq!(ledger.balances(), before.balances());
        assert_eq!(ledger.lot_store(), before.lot_store());
        assert!(ledger.tax_events().is_empty());
    }
}
