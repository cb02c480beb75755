//! Settings Advisor
//!
//! Rule-based therapy-setting suggestions from glucose statistics and
//! closed-loop telemetry. Output order is fixed: informational lines first,
//! then loop analysis, then heuristic warnings.

use serde::Serialize;

use super::statistics::{calculate_statistics_with, StatisticsSummary};
use super::thresholds::Thresholds;
use crate::nightscout::{LoopSnapshot, ProfilePayload, Record};

/// Nominal CGM sampling interval used to estimate the covered duration
pub const SAMPLE_INTERVAL_MINUTES: f64 = 5.0;

/// Message returned when there are no usable glucose readings
pub const INSUFFICIENT_DATA: &str = "Not enough data to make suggestions.";

/// Suggestions together with the statistics they were derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsReport {
    pub statistics: StatisticsSummary,
    pub suggestions: Vec<String>,
}

/// Averaged closed-loop telemetry over the device statuses that carry it
#[derive(Debug, Clone, Copy, PartialEq)]
struct LoopSummary {
    records: usize,
    avg_iob: f64,
    avg_cob: f64,
}

impl LoopSummary {
    fn from_device_statuses(device_statuses: &[Record]) -> Option<Self> {
        let snapshots: Vec<LoopSnapshot> = device_statuses
            .iter()
            .filter_map(LoopSnapshot::from_device_status)
            .collect();

        if snapshots.is_empty() {
            return None;
        }

        let n = snapshots.len() as f64;
        Some(Self {
            records: snapshots.len(),
            avg_iob: snapshots.iter().map(|s| s.iob).sum::<f64>() / n,
            avg_cob: snapshots.iter().map(|s| s.cob).sum::<f64>() / n,
        })
    }
}

/// Generates setting suggestions using a fixed set of thresholds
#[derive(Debug, Clone, Default)]
pub struct Advisor {
    thresholds: Thresholds,
}

impl Advisor {
    /// Create an advisor with custom thresholds
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Produce the ordered suggestion list
    pub fn analyze(
        &self,
        profile: &ProfilePayload,
        entries: &[Record],
        treatments: &[Record],
        device_statuses: &[Record],
    ) -> Vec<String> {
        self.report(profile, entries, treatments, device_statuses)
            .suggestions
    }

    /// Produce suggestions along with the underlying statistics
    ///
    /// `profile` and `treatments` are not inspected yet.
    pub fn report(
        &self,
        _profile: &ProfilePayload,
        entries: &[Record],
        _treatments: &[Record],
        device_statuses: &[Record],
    ) -> SettingsReport {
        let t = &self.thresholds;
        let statistics = calculate_statistics_with(entries, t);

        let Some(avg_glucose) = statistics.average_glucose else {
            return SettingsReport {
                statistics,
                suggestions: vec![INSUFFICIENT_DATA.to_string()],
            };
        };

        let tir = statistics.time_in_range;
        let hours = statistics.entry_count as f64 * SAMPLE_INTERVAL_MINUTES / 60.0;

        let mut suggestions = vec![
            format!(
                "Analysis based on {} entries covering approximately {:.1} hours.",
                statistics.entry_count, hours
            ),
            format!(
                "Current Statistics: Average Glucose {:.1} mg/dL, Time in Range {:.1}%.",
                avg_glucose, tir
            ),
        ];

        if let Some(summary) = LoopSummary::from_device_statuses(device_statuses) {
            suggestions.push(format!(
                "Loop Data Analysis ({} records): Avg IOB {:.2} U, Avg COB {:.1} g.",
                summary.records, summary.avg_iob, summary.avg_cob
            ));

            if avg_glucose > t.high_average && summary.avg_iob > t.high_iob {
                suggestions.push(
                    "High average glucose with active insulin (IOB) present. Consider checking \
                     specifically for post-prandial spikes or checking your ISF if highs persist \
                     with IOB."
                        .to_string(),
                );
            }
        }

        if avg_glucose > t.high_average {
            suggestions.push(format!(
                "High average glucose detected (> {} mg/dL). Consider increasing basal rates or \
                 Aggressive Factor (ISF).",
                t.high_average
            ));
        } else if avg_glucose < t.low_average {
            suggestions.push(format!(
                "Low average glucose detected (< {} mg/dL). Consider decreasing basal rates or \
                 making ISF less aggressive.",
                t.low_average
            ));
        }

        if tir < t.time_in_range_target {
            suggestions.push(format!(
                "Time in Range is below {}%. clearer identification of patterns (high/low) is \
                 needed to adjust specific settings.",
                t.time_in_range_target
            ));
        }

        SettingsReport {
            statistics,
            suggestions,
        }
    }
}

/// Analyze data with the default thresholds and suggest setting changes
pub fn analyze_settings(
    profile: &ProfilePayload,
    entries: &[Record],
    treatments: &[Record],
    device_statuses: &[Record],
) -> Vec<String> {
    Advisor::default().analyze(profile, entries, treatments, device_statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
    }

    fn glucose(values: &[f64]) -> Vec<Record> {
        records(values.iter().map(|v| json!({ "sgv": v })).collect())
    }

    fn has(suggestions: &[String], prefix: &str) -> bool {
        suggestions.iter().any(|s| s.starts_with(prefix))
    }

    fn suggest(entries: &[Record], device_statuses: &[Record]) -> Vec<String> {
        analyze_settings(&ProfilePayload::default(), entries, &[], device_statuses)
    }

    #[test]
    fn test_insufficient_data() {
        let suggestions = suggest(&records(vec![json!({"type": "mbg"})]), &[]);
        assert_eq!(suggestions, vec![INSUFFICIENT_DATA.to_string()]);
    }

    #[test]
    fn test_high_average() {
        let suggestions = suggest(&glucose(&[250.0; 10]), &[]);

        assert_eq!(
            suggestions[0],
            "Analysis based on 10 entries covering approximately 0.8 hours."
        );
        assert_eq!(
            suggestions[1],
            "Current Statistics: Average Glucose 250.0 mg/dL, Time in Range 0.0%."
        );
        assert!(has(&suggestions, "High average glucose detected (> 160 mg/dL)"));
        assert!(!has(&suggestions, "Low average glucose"));
        assert!(has(&suggestions, "Time in Range is below 70%"));
        assert!(!has(&suggestions, "Loop Data Analysis"));
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn test_time_in_range_wording() {
        let suggestions = suggest(&glucose(&[250.0; 10]), &[]);

        assert_eq!(
            suggestions[3],
            "Time in Range is below 70%. clearer identification of patterns (high/low) is \
             needed to adjust specific settings."
        );
    }

    #[test]
    fn test_low_average() {
        let suggestions = suggest(&glucose(&[90.0; 12]), &[]);

        assert!(has(&suggestions, "Low average glucose detected (< 100 mg/dL)"));
        assert!(!has(&suggestions, "High average glucose"));
        assert!(!has(&suggestions, "Time in Range is below"));
    }

    #[test]
    fn test_boundaries_are_strict() {
        for value in [160.0, 100.0] {
            let suggestions = suggest(&glucose(&[value; 6]), &[]);
            assert!(!has(&suggestions, "High average glucose"));
            assert!(!has(&suggestions, "Low average glucose"));
            assert_eq!(suggestions.len(), 2);
        }
    }

    #[test]
    fn test_loop_analysis_with_high_iob() {
        let statuses = records(vec![
            json!({"loop": {"iob": {"iob": 1.5}, "cob": {"cob": 10}}}),
            json!({"pump": {"battery": {"percent": 80}}}),
        ]);
        let suggestions = suggest(&glucose(&[170.0; 4]), &statuses);

        assert_eq!(
            suggestions[2],
            "Loop Data Analysis (1 records): Avg IOB 1.50 U, Avg COB 10.0 g."
        );
        assert!(suggestions[3].starts_with("High average glucose with active insulin (IOB)"));
        assert!(suggestions[4].starts_with("High average glucose detected"));
    }

    #[test]
    fn test_loop_analysis_defaults_missing_values() {
        let statuses = records(vec![
            json!({"loop": {"iob": {"iob": 3.0}}}),
            json!({"loop": {"cob": {"cob": 20}}}),
        ]);
        let suggestions = suggest(&glucose(&[170.0; 4]), &statuses);

        assert_eq!(
            suggestions[2],
            "Loop Data Analysis (2 records): Avg IOB 1.50 U, Avg COB 10.0 g."
        );
        assert!(has(&suggestions, "High average glucose with active insulin"));
    }

    #[test]
    fn test_low_iob_skips_combined_warning() {
        let statuses = records(vec![json!({"loop": {"iob": {"iob": 0.5}}})]);
        let suggestions = suggest(&glucose(&[170.0; 4]), &statuses);

        assert!(has(&suggestions, "Loop Data Analysis"));
        assert!(!has(&suggestions, "High average glucose with active insulin"));
        assert!(has(&suggestions, "High average glucose detected"));
    }

    #[test]
    fn test_custom_thresholds() {
        let advisor = Advisor::new(Thresholds {
            high_average: 140.0,
            ..Thresholds::default()
        });
        let suggestions = advisor.analyze(&ProfilePayload::default(), &glucose(&[150.0; 3]), &[], &[]);

        assert!(has(&suggestions, "High average glucose detected (> 140 mg/dL)"));
    }

    #[test]
    fn test_report_carries_statistics() {
        let report = Advisor::default().report(
            &ProfilePayload::default(),
            &glucose(&[70.0, 180.0, 280.0]),
            &[],
            &[],
        );

        assert_eq!(report.statistics.average_glucose, Some(176.7));
        assert_eq!(report.statistics.entry_count, 3);
        assert!(has(&report.suggestions, "High average glucose detected"));
    }
}
