//! Glucose Statistics
//!
//! Descriptive statistics over raw Nightscout entries.

use serde::Serialize;

use super::thresholds::Thresholds;
use crate::nightscout::{sgv, Record};

/// Summary of a batch of glucose entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsSummary {
    /// Mean glucose (mg/dL, one decimal); `None` when no entry has a value
    pub average_glucose: Option<f64>,
    /// Percentage of readings in the target range (one decimal)
    pub time_in_range: f64,
    /// Number of entries that carried a glucose value
    pub entry_count: usize,
}

impl StatisticsSummary {
    /// Summary for a batch with no usable readings
    pub fn empty() -> Self {
        Self {
            average_glucose: None,
            time_in_range: 0.0,
            entry_count: 0,
        }
    }
}

/// Calculate statistics with the default [70, 180] mg/dL target range
pub fn calculate_statistics(entries: &[Record]) -> StatisticsSummary {
    calculate_statistics_with(entries, &Thresholds::default())
}

/// Calculate statistics using the target range from `thresholds`
///
/// Entries without a numeric `sgv` are skipped.
pub fn calculate_statistics_with(entries: &[Record], thresholds: &Thresholds) -> StatisticsSummary {
    let values: Vec<f64> = entries.iter().filter_map(sgv).collect();

    if values.is_empty() {
        return StatisticsSummary::empty();
    }

    let count = values.len() as f64;
    let average = values.iter().sum::<f64>() / count;
    let in_range = values.iter().filter(|&&v| thresholds.in_range(v)).count();
    let tir = in_range as f64 / count * 100.0;

    StatisticsSummary {
        average_glucose: Some(round1(average)),
        time_in_range: round1(tir),
        entry_count: values.len(),
    }
}

/// Round to one decimal place
///
/// Rounds the exact binary value with ties to even, so `100.25` becomes
/// `100.2` while `0.15` (stored just below the tie) becomes `0.1`.
pub(crate) fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(values: &[serde_json::Value]) -> Vec<Record> {
        values.to_vec()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(calculate_statistics(&[]), StatisticsSummary::empty());
    }

    #[test]
    fn test_no_glucose_field() {
        let data = entries(&[json!({"mbg": 100}), json!({"type": "cal"})]);
        let stats = calculate_statistics(&data);

        assert_eq!(stats.average_glucose, None);
        assert_eq!(stats.time_in_range, 0.0);
        assert_eq!(stats.entry_count, 0);
    }

    #[test]
    fn test_range_boundaries_and_rounding() {
        let data = entries(&[json!({"sgv": 70}), json!({"sgv": 180}), json!({"sgv": 280})]);
        let stats = calculate_statistics(&data);

        assert_eq!(stats.average_glucose, Some(176.7));
        assert_eq!(stats.time_in_range, 66.7);
        assert_eq!(stats.entry_count, 3);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        let data = entries(&[
            json!({"sgv": 100}),
            json!({"sgv": 100}),
            json!({"sgv": 100}),
            json!({"sgv": 101}),
        ]);
        assert_eq!(calculate_statistics(&data).average_glucose, Some(100.2));

        let mut data: Vec<Record> = (0..15).map(|_| json!({"sgv": 250})).collect();
        data.push(json!({"sgv": 120}));
        let stats = calculate_statistics(&data);
        assert_eq!(stats.entry_count, 16);
        assert_eq!(stats.time_in_range, 6.2);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(100.25), 100.2);
        assert_eq!(round1(100.35), 100.3);
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(176.666_666), 176.7);
        assert_eq!(round1(-2.25), -2.2);
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let data = entries(&[json!({"sgv": 90}), json!("calibration"), json!(null)]);
        let stats = calculate_statistics(&data);

        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.average_glucose, Some(90.0));
    }

    #[test]
    fn test_entries_without_value_are_skipped() {
        let data = entries(&[json!({"sgv": 100}), json!({"type": "mbg"}), json!({"sgv": 200})]);
        let stats = calculate_statistics(&data);

        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.average_glucose, Some(150.0));
        assert_eq!(stats.time_in_range, 50.0);
    }

    #[test]
    fn test_custom_range() {
        let data = entries(&[json!({"sgv": 65}), json!({"sgv": 150})]);
        let thresholds = Thresholds {
            range_low: 60.0,
            range_high: 160.0,
            ..Thresholds::default()
        };

        assert_eq!(calculate_statistics_with(&data, &thresholds).time_in_range, 100.0);
        assert_eq!(calculate_statistics(&data).time_in_range, 50.0);
    }

    #[test]
    fn test_summary_serializes_null_average() {
        let json = serde_json::to_value(StatisticsSummary::empty()).unwrap();
        assert_eq!(json["average_glucose"], serde_json::Value::Null);
        assert_eq!(json["entry_count"], 0);
    }
}
