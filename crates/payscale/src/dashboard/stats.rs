use super::domain::{Currency, NormalizedRow};
use serde::Serialize;

/// Fixed conversion rate between Iraqi dinar and US dollar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub iqd_per_usd: f64,
}

impl ExchangeRate {
    pub const DEFAULT_IQD_PER_USD: f64 = 1310.0;

    pub const fn new(iqd_per_usd: f64) -> Self {
        Self { iqd_per_usd }
    }

    pub fn to_iqd(&self, amount: i64, currency: Currency) -> i64 {
        match currency {
            Currency::Iqd => amount,
            Currency::Usd => (amount as f64 * self.iqd_per_usd).round() as i64,
        }
    }

    pub fn to_usd(&self, amount: i64, currency: Currency) -> i64 {
        match currency {
            Currency::Usd => amount,
            Currency::Iqd => (amount as f64 / self.iqd_per_usd).round() as i64,
        }
    }

    pub fn convert(&self, amount: i64, from: Currency, to: Currency) -> i64 {
        match to {
            Currency::Iqd => self.to_iqd(amount, from),
            Currency::Usd => self.to_usd(amount, from),
        }
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_IQD_PER_USD)
    }
}

/// Order statistics over the positive salaries of a row set, in one currency.
/// `None` is the "no data" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalarySummary {
    pub currency: Currency,
    pub median: Option<i64>,
    pub p25: Option<i64>,
    pub p75: Option<i64>,
    pub count: usize,
}

impl SalarySummary {
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

pub fn summarize(rows: &[NormalizedRow], currency: Currency, rate: ExchangeRate) -> SalarySummary {
    let values = amounts_in(rows, currency, rate);

    SalarySummary {
        currency,
        median: median(&values),
        p25: percentile(&values, 25.0),
        p75: percentile(&values, 75.0),
        count: values.len(),
    }
}

/// `amount_min` of every row converted to `currency`, keeping only positive
/// results.
pub fn amounts_in(rows: &[NormalizedRow], currency: Currency, rate: ExchangeRate) -> Vec<i64> {
    rows.iter()
        .map(|row| rate.convert(row.amount_min, row.currency, currency))
        .filter(|amount| *amount > 0)
        .collect()
}

pub fn median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let sum = i128::from(sorted[mid - 1]) + i128::from(sorted[mid]);
        Some((sum as f64 / 2.0).round() as i64)
    }
}

/// Linear interpolation between closest ranks, `p` in `0..=100`.
pub fn percentile(values: &[i64], p: f64) -> Option<i64> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted(values);
    let index = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        return Some(sorted[lower]);
    }

    let (low, high) = (sorted[lower] as f64, sorted[upper] as f64);
    Some((low + (high - low) * (index - lower as f64)).round() as i64)
}

fn sorted(values: &[i64]) -> Vec<i64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::domain::SalaryPeriod;

    fn row(currency: Currency, amount: i64) -> NormalizedRow {
        NormalizedRow {
            id: "id".to_string(),
            title: "Title".to_string(),
            category: "IT".to_string(),
            employment_type: "Full-Time".to_string(),
            period: SalaryPeriod::Monthly,
            city: "Baghdad".to_string(),
            currency,
            amount_min: amount,
            amount_max: amount,
            portal_name: "Portal".to_string(),
            portal_link: String::new(),
        }
    }

    #[test]
    fn empty_input_has_no_data() {
        assert_eq!(median(&[]), None);
        assert_eq!(percentile(&[], 25.0), None);
        assert_eq!(percentile(&[], 100.0), None);
    }

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&[1, 2, 3]), Some(2));
        assert_eq!(median(&[4, 1, 3, 2]), Some(3));
        assert_eq!(median(&[7]), Some(7));
        assert_eq!(median(&[10, 11]), Some(11));
    }

    #[test]
    fn percentile_interpolates_and_rounds() {
        assert_eq!(percentile(&[10, 20, 30, 40], 25.0), Some(18));
        assert_eq!(percentile(&[40, 30, 20, 10], 75.0), Some(33));
        assert_eq!(percentile(&[10, 20, 30, 40, 50], 25.0), Some(20));
        assert_eq!(percentile(&[10, 20, 30, 40], 0.0), Some(10));
        assert_eq!(percentile(&[10, 20, 30, 40], 100.0), Some(40));
        assert_eq!(percentile(&[5], 50.0), Some(5));
    }

    #[test]
    fn exchange_rate_rounds_both_directions() {
        let rate = ExchangeRate::default();
        assert_eq!(rate.to_iqd(1000, Currency::Usd), 1_310_000);
        assert_eq!(rate.to_iqd(1000, Currency::Iqd), 1000);
        assert_eq!(rate.to_usd(1_000_000, Currency::Iqd), 763);
        assert_eq!(rate.to_usd(1000, Currency::Usd), 1000);
        assert_eq!(rate.convert(800, Currency::Usd, Currency::Usd), 800);
    }

    #[test]
    fn summarize_converts_and_skips_missing_salaries() {
        let rows = vec![
            row(Currency::Iqd, 1_000_000),
            row(Currency::Usd, 1000),
            row(Currency::Iqd, 0),
        ];

        let summary = summarize(&rows, Currency::Iqd, ExchangeRate::default());
        assert_eq!(summary.count, 2);
        assert_eq!(summary.median, Some(1_155_000));
        assert_eq!(summary.p25, Some(1_077_500));
        assert_eq!(summary.p75, Some(1_232_500));

        let summary = summarize(&rows, Currency::Usd, ExchangeRate::default());
        assert_eq!(summary.currency, Currency::Usd);
        assert_eq!(summary.median, Some(882));
    }

    #[test]
    fn saturated_amounts_do_not_overflow() {
        let rows = vec![row(Currency::Iqd, i64::MAX), row(Currency::Iqd, i64::MAX)];

        let summary = summarize(&rows, Currency::Iqd, ExchangeRate::default());
        assert_eq!(summary.count, 2);
        assert_eq!(summary.median, Some(i64::MAX));
        assert_eq!(summary.p75, Some(i64::MAX));
        assert_eq!(median(&[i64::MAX - 1, i64::MAX]), Some(i64::MAX));

        let summary = summarize(&rows, Currency::Usd, ExchangeRate::default());
        assert!(summary.median.is_some_and(|median| median > 0));
    }

    #[test]
    fn summarize_empty_set_reports_no_data() {
        let summary = summarize(&[], Currency::Usd, ExchangeRate::default());
        assert!(!summary.has_data());
        assert_eq!(summary.median, None);
        assert_eq!(summary.p25, None);
        assert_eq!(summary.p75, None);
    }
}
