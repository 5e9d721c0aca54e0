//! Property-based tests for taxlot-core.
//!
//! These tests verify invariants hold for arbitrary inputs using proptest.
//!
//! Run with: cargo test -p taxlot-core --test `property_tests`

use chrono::NaiveDate;
use proptest::prelude::*;
use taxlot_core::{Currency, Lot, LotStore, Quantity};

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_cents() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

fn arb_positive_quantity() -> impl Strategy<Value = Quantity> {
    (1i64..10_000_000i64).prop_map(|n| Quantity::from_fraction(n, 1000).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2015i32..2025i32, 1u32..13u32, 1u32..29u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_lot() -> impl Strategy<Value = Lot> {
    (arb_positive_quantity(), arb_positive_quantity(), arb_date()).prop_map(
        |(amount, cost, date)| Lot::new(Currency::new("BTC"), amount, cost, date, ""),
    )
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

// ============================================================================
// Quantity Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Two-place decimals parse exactly and render back unchanged
    #[test]
    fn prop_cents_render_identity(cents in arb_cents()) {
        let text = format_cents(cents);
        let q: Quantity = text.parse().unwrap();
        let expected = if cents == 0 { "0.00".to_string() } else { text };
        prop_assert_eq!(q.to_fixed(2), expected);
    }

    /// Display output parses back to the same value
    #[test]
    fn prop_display_parse_identity(n in -1_000_000i64..1_000_000, d in 1i64..10_000) {
        let q = Quantity::from_fraction(n, d).unwrap();
        let back: Quantity = q.to_string().parse().unwrap();
        prop_assert_eq!(back, q);
    }

    /// Subtraction undoes addition exactly
    #[test]
    fn prop_add_sub_inverse(a in arb_positive_quantity(), b in arb_positive_quantity()) {
        prop_assert_eq!(&(&a + &b) - &b, a);
    }

    /// Division undoes multiplication exactly
    #[test]
    fn prop_mul_div_inverse(a in arb_positive_quantity(), b in arb_positive_quantity()) {
        prop_assert_eq!((&a * &b).checked_div(&b), Some(a));
    }
}

// ============================================================================
// LotStore Properties
// ============================================================================

proptest! {
    /// Lots are always kept in ascending date order
    #[test]
    fn prop_store_sorted_by_date(lots in prop::collection::vec(arb_lot(), 0..20)) {
        let mut store = LotStore::new();
        for lot in lots {
            store.insert(lot);
        }
        let dates: Vec<NaiveDate> = store.lots("BTC").map(Lot::acquisition_date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        prop_assert_eq!(dates, sorted);
    }

    /// Taking from the store never creates or destroys units
    #[test]
    fn prop_take_conserves_units(
        lots in prop::collection::vec(arb_lot(), 1..10),
        wanted in arb_positive_quantity(),
    ) {
        let mut store = LotStore::new();
        for lot in lots {
            store.insert(lot);
        }
        let before = store.units("BTC");

        let mut taken = Quantity::zero();
        let mut remaining = wanted.clone();
        while remaining.is_positive() {
            match store.take_latest("BTC", &remaining) {
                Some(c) => {
                    remaining -= &c.amount;
                    taken += &c.amount;
                }
                None => break,
            }
        }

        prop_assert_eq!(&taken + &store.units("BTC"), before.clone());
        prop_assert!(taken <= wanted);
        prop_assert!(!remaining.is_negative());
    }
}
