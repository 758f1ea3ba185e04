//! Fixed-threshold classification of counts and period-over-period change.

use crate::models::Status;

/// Young-bracket counts strictly below this are critical.
pub const CRITICAL_COUNT_BELOW: i64 = 20;

/// Young-bracket counts strictly below this (and not critical) are warning.
pub const WARNING_COUNT_BELOW: i64 = 50;

/// Percentage changes strictly below this are critical.
pub const CRITICAL_CHANGE_BELOW: f64 = -10.0;

/// Percentage changes strictly below this (and not critical) are warning.
pub const WARNING_CHANGE_BELOW: f64 = -5.0;

/// Decimal places kept in reported change percentages.
pub const CHANGE_DECIMALS: u32 = 2;

/// Classify a single observation by its young-bracket count.
///
/// Each tier includes its lower bound: `20` is warning, `50` is stable.
pub fn classify_count(value: i64) -> Status {
    if value < CRITICAL_COUNT_BELOW {
        Status::Critical
    } else if value < WARNING_COUNT_BELOW {
        Status::Warning
    } else {
        Status::Stable
    }
}

/// Classify a percentage change. Growth of any size is stable.
pub fn classify_change(change_percent: f64) -> Status {
    if change_percent < CRITICAL_CHANGE_BELOW {
        Status::Critical
    } else if change_percent < WARNING_CHANGE_BELOW {
        Status::Warning
    } else {
        Status::Stable
    }
}

/// Unrounded `(last - prev) / prev * 100`.
///
/// Returns `None` when `prev` is zero.
pub fn percent_change(prev: i64, last: i64) -> Option<f64> {
    if prev == 0 {
        return None;
    }
    // Difference in f64 so extreme counts cannot overflow; multiply before
    // dividing so whole-number percentages stay exact.
    Some((last as f64 - prev as f64) * 100.0 / prev as f64)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
