//! Property-based tests for taxlot-booking.
//!
//! Run with: cargo test -p taxlot-booking --test `property_tests`

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use taxlot_booking::{implied_price, summarize, Ledger, LedgerConfig};
use taxlot_core::{Currency, Lot, Quantity, Term};

// ============================================================================
// Arbitrary generators
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Buy { amount: Quantity, basis: Quantity, day: i64 },
    Sell { amount: Quantity, price: Quantity, day: i64 },
}

fn arb_quantity() -> impl Strategy<Value = Quantity> {
    (1i64..5_000_000i64).prop_map(|n| Quantity::from_fraction(n, 1000).unwrap())
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (arb_quantity(), arb_quantity(), 0i64..1500).prop_map(|(amount, basis, day)| Step::Buy {
            amount,
            basis,
            day
        }),
        (arb_quantity(), arb_quantity(), 0i64..1500).prop_map(|(amount, price, day)| Step::Sell {
            amount,
            price,
            day
        }),
    ]
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap() + Duration::days(offset)
}

fn btc() -> Currency {
    Currency::new("BTC")
}

// ============================================================================
// Ledger Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The balance always equals the units held in lots, and sales never
    /// emit more or fewer units than requested
    #[test]
    fn prop_balance_and_conservation(steps in prop::collection::vec(arb_step(), 1..30)) {
        let mut ledger = Ledger::new(LedgerConfig::default());
        for step in steps {
            match step {
                Step::Buy { amount, basis, day: d } => {
                    ledger.acquire_lot(Lot::new(btc(), amount, basis, day(d), "")).unwrap();
                }
                Step::Sell { amount, price, day: d } => {
                    let before = ledger.balance("BTC").cloned().unwrap();
                    match ledger.dispose_units(&btc(), &amount, &price, day(d), "") {
                        Ok(events) => {
                            let emitted: Quantity = events.iter().map(|e| &e.amount).sum();
                            prop_assert_eq!(emitted, amount.clone());
                            prop_assert!(events.len() <= 2);
                            prop_assert_eq!(ledger.balance("BTC").cloned().unwrap(), &before - &amount);
                        }
                        Err(err) => {
                            prop_assert!(!err.is_fatal());
                            prop_assert!(amount > before);
                            prop_assert_eq!(ledger.balance("BTC").cloned().unwrap(), before);
                        }
                    }
                }
            }
            prop_assert_eq!(
                ledger.balance("BTC").cloned().unwrap(),
                ledger.lot_store().units("BTC")
            );
        }
    }

    /// Every emitted event's term agrees with each of its acquisition dates
    #[test]
    fn prop_event_terms_match_dates(steps in prop::collection::vec(arb_step(), 1..30)) {
        let mut ledger = Ledger::new(LedgerConfig::default());
        for step in steps {
            match step {
                Step::Buy { amount, basis, day: d } => {
                    ledger.acquire_lot(Lot::new(btc(), amount, basis, day(d), "")).unwrap();
                }
                Step::Sell { amount, price, day: d } => {
                    let _ = ledger.dispose_units(&btc(), &amount, &price, day(d), "");
                }
            }
        }
        for event in ledger.tax_events().values().flatten() {
            for acquired in &event.acquisition_dates {
                prop_assert_eq!(Term::classify(*acquired, event.date), event.term);
            }
        }
    }

    /// Summaries carry exactly the units of the events they group
    #[test]
    fn prop_summary_preserves_totals(steps in prop::collection::vec(arb_step(), 1..30)) {
        let mut ledger = Ledger::new(LedgerConfig::default());
        for step in steps {
            match step {
                Step::Buy { amount, basis, day: d } => {
                    ledger.acquire_lot(Lot::new(btc(), amount, basis, day(d), "")).unwrap();
                }
                Step::Sell { amount, price, day: d } => {
                    let _ = ledger.dispose_units(&btc(), &amount, &price, day(d), "");
                }
            }
        }
        let events = ledger.tax_events();
        let summaries = summarize(events);
        let event_units: Quantity = events.values().flatten().map(|e| &e.amount).sum();
        let summary_units: Quantity = summaries.iter().map(|s| &s.amount).sum();
        prop_assert_eq!(event_units, summary_units);

        let event_gain: Quantity = events.values().flatten().map(|e| e.gain()).sum();
        let summary_gain: Quantity = summaries.iter().map(|s| s.gain()).sum();
        prop_assert_eq!(event_gain, summary_gain);
    }

    /// Implied prices make both legs of a trade worth the same
    #[test]
    fn prop_implied_price_conserves_value(
        priced in arb_quantity(),
        price in arb_quantity(),
        unpriced in arb_quantity(),
    ) {
        let implied = implied_price(&priced, &price, &unpriced).unwrap();
        prop_assert_eq!(&priced * &price, &unpriced * &implied);
    }
}
