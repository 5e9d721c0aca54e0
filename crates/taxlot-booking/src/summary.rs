//! Read-side grouping of tax events for reporting.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use taxlot_core::{Currency, Quantity, TaxEvent, Term};

/// Number of acquisition dates listed individually before a range is
/// collapsed to `earliest - latest`.
pub const MAX_LISTED_DATES: usize = 4;

/// All tax events sharing a disposal date, currency and term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisposalSummary {
    /// Disposal date.
    pub date_sold: NaiveDate,
    /// The asset disposed.
    pub currency: Currency,
    /// Holding-period classification.
    pub term: Term,
    /// Units disposed.
    pub amount: Quantity,
    /// Total USD received.
    pub proceeds: Quantity,
    /// Total USD cost basis.
    pub cost_basis: Quantity,
    /// Union of the acquisition dates of every lot consumed.
    pub acquisition_dates: BTreeSet<NaiveDate>,
}

impl DisposalSummary {
    fn empty(event: &TaxEvent) -> Self {
        Self {
            date_sold: event.date,
            currency: event.currency.clone(),
            term: event.term,
            amount: Quantity::zero(),
            proceeds: Quantity::zero(),
            cost_basis: Quantity::zero(),
            acquisition_dates: BTreeSet::new(),
        }
    }

    fn absorb(&mut self, event: &TaxEvent) {
        self.amount += &event.amount;
        self.proceeds += &event.proceeds();
        self.cost_basis += &event.cost_basis();
        self.acquisition_dates
            .extend(event.acquisition_dates.iter().copied());
    }

    /// USD received per unit.
    #[must_use]
    pub fn unit_price(&self) -> Quantity {
        self.proceeds.checked_div(&self.amount).unwrap_or_default()
    }

    /// USD cost basis per unit.
    #[must_use]
    pub fn unit_basis(&self) -> Quantity {
        self.cost_basis.checked_div(&self.amount).unwrap_or_default()
    }

    /// Realized gain (negative for a loss).
    #[must_use]
    pub fn gain(&self) -> Quantity {
        &self.proceeds - &self.cost_basis
    }

    /// Human-readable acquisition dates, see [`format_date_range`].
    #[must_use]
    pub fn acquisition_date_range(&self) -> String {
        format_date_range(&self.acquisition_dates)
    }
}

/// Group tax events by disposal date, then currency, then term.
///
/// Within a date and currency, short-term groups come before long-term ones.
#[must_use]
pub fn summarize(events: &BTreeMap<NaiveDate, Vec<TaxEvent>>) -> Vec<DisposalSummary> {
    let mut groups: BTreeMap<(NaiveDate, &Currency, Term), DisposalSummary> = BTreeMap::new();
    for event in events.values().flatten() {
        groups
            .entry((event.date, &event.currency, event.term))
            .or_insert_with(|| DisposalSummary::empty(event))
            .absorb(event);
    }
    groups.into_values().collect()
}

/// Render a set of dates for the report.
///
/// ```
/// use std::collections::BTreeSet;
/// use taxlot_booking::format_date_range;
/// use taxlot_core::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
/// assert_eq!(format_date_range(&BTreeSet::from([day(2), day(1)])), "2020-01-01,2020-01-02");
/// assert_eq!(format_date_range(&(1..=5).map(day).collect()), "2020-01-01 - 2020-01-05");
/// ```
#[must_use]
pub fn format_date_range(dates: &BTreeSet<NaiveDate>) -> String {
    if dates.len() > MAX_LISTED_DATES {
        if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
            return format!("{first} - {last}");
        }
    }
    dates
        .iter()
        .map(NaiveDate::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, month, day).unwrap()
    }

    fn event(
        sold: NaiveDate,
        currency: &str,
        term: Term,
        amount: &str,
        price: &str,
        basis: &str,
        acquired: &[NaiveDate],
    ) -> TaxEvent {
        TaxEvent {
            date: sold,
            amount: q(amount),
            currency: Currency::new(currency),
            unit_sale_price: q(price),
            avg_unit_cost_basis: q(basis),
            term,
            acquisition_dates: acquired.iter().copied().collect(),
        }
    }

    #[test]
    fn test_date_range_forms() {
        assert_eq!(format_date_range(&BTreeSet::new()), "");
        assert_eq!(format_date_range(&BTreeSet::from([date(1, 5)])), "2021-01-05");
        let four: BTreeSet<_> = (1..=4).map(|d| date(2, d)).collect();
        assert_eq!(
            format_date_range(&four),
            "2021-02-01,2021-02-02,2021-02-03,2021-02-04"
        );
        let five: BTreeSet<_> = (1..=5).map(|d| date(2, d)).collect();
        assert_eq!(format_date_range(&five), "2021-02-01 - 2021-02-05");
    }

    #[test]
    fn test_summarize_merges_same_group() {
        let sold = date(6, 1);
        let mut events = BTreeMap::new();
        events.insert(
            sold,
            vec![
                event(sold, "BTC", Term::Short, "1", "300", "100", &[date(1, 1)]),
                event(sold, "BTC", Term::Short, "1", "200", "150", &[date(2, 1)]),
            ],
        );

        let groups = summarize(&events);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.amount, q("2"));
        assert_eq!(group.proceeds, q("500"));
        assert_eq!(group.cost_basis, q("250"));
        assert_eq!(group.unit_price(), q("250"));
        assert_eq!(group.unit_basis(), q("125"));
        assert_eq!(group.gain(), q("250"));
        assert_eq!(group.acquisition_date_range(), "2021-01-01,2021-02-01");
    }

    #[test]
    fn test_summarize_order() {
        let first = date(3, 1);
        let second = date(4, 1);
        let mut events = BTreeMap::new();
        events.insert(
            second,
            vec![event(second, "BTC", Term::Short, "1", "1", "1", &[])],
        );
        events.insert(
            first,
            vec![
                event(first, "ETH", Term::Long, "1", "1", "1", &[]),
                event(first, "ETH", Term::Short, "1", "1", "1", &[]),
                event(first, "BTC", Term::Long, "1", "1", "1", &[]),
            ],
        );

        let groups = summarize(&events);
        let keys: Vec<(NaiveDate, &str, Term)> = groups
            .iter()
            .map(|g| (g.date_sold, g.currency.as_str(), g.term))
            .collect();
        assert_eq!(
            keys,
            vec![
                (first, "BTC", Term::Long),
                (first, "ETH", Term::Short),
                (first, "ETH", Term::Long),
                (second, "BTC", Term::Short),
            ]
        );
    }

    #[test]
    fn test_loss_is_negative() {
        let sold = date(6, 1);
        let events = BTreeMap::from([(
            sold,
            vec![event(sold, "ETH", Term::Long, "2", "50", "80", &[date(1, 1)])],
        )]);
        let groups = summarize(&events);
        assert_eq!(groups[0].gain(), q("-60"));
    }
}
