//! Heuristic Thresholds
//!
//! Cut-off values used by the statistics and suggestion rules. The defaults
//! are illustrative, not clinically validated; override them through the
//! `[thresholds]` config section.

use serde::Deserialize;

/// Thresholds for time-in-range and suggestion heuristics
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Lower bound of the target range, inclusive (mg/dL)
    pub range_low: f64,
    /// Upper bound of the target range, inclusive (mg/dL)
    pub range_high: f64,
    /// Average glucose above this is flagged as high (mg/dL)
    pub high_average: f64,
    /// Average glucose below this is flagged as low (mg/dL)
    pub low_average: f64,
    /// Time-in-range percentage below this is flagged
    pub time_in_range_target: f64,
    /// Average insulin on board above this counts as high (U)
    pub high_iob: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            range_low: 70.0,
            range_high: 180.0,
            high_average: 160.0,
            low_average: 100.0,
            time_in_range_target: 70.0,
            high_iob: 1.0,
        }
    }
}

impl Thresholds {
    /// True if a glucose value lies in the closed target range
    pub fn in_range(&self, value: f64) -> bool {
        (self.range_low..=self.range_high).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_closed() {
        let t = Thresholds::default();
        assert!(t.in_range(70.0));
        assert!(t.in_range(180.0));
        assert!(!t.in_range(69.9));
        assert!(!t.in_range(180.1));
    }

    #[test]
    fn test_partial_override() {
        let t: Thresholds = toml::from_str("high_average = 150.0").unwrap();
        assert_eq!(t.high_average, 150.0);
        assert_eq!(t.low_average, 100.0);
        assert_eq!(t.range_high, 180.0);
    }
}
