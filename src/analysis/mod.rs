//! Statistics & Heuristics
//!
//! Pure functions over Nightscout records: glucose statistics and
//! rule-based therapy-setting suggestions. Nothing in here performs I/O.

mod advisor;
mod statistics;
mod thresholds;

pub use advisor::{
    analyze_settings, Advisor, SettingsReport, INSUFFICIENT_DATA, SAMPLE_INTERVAL_MINUTES,
};
pub use statistics::{calculate_statistics, calculate_statistics_with, StatisticsSummary};
pub use thresholds::Thresholds;
