//! Human-readable rendering of counts and percentages for the dashboard and
//! the console report.

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use alert_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(-9876), "-9,876");
/// ```
pub fn format_count(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a percentage change with an explicit sign and two decimals.
///
/// # Examples
///
/// ```
/// use alert_core::formatting::format_change;
///
/// assert_eq!(format_change(50.0), "+50.00%");
/// assert_eq!(format_change(-15.0), "-15.00%");
/// assert_eq!(format_change(0.0), "0.00%");
/// ```
pub fn format_change(change_percent: f64) -> String {
    if change_percent > 0.0 {
        format!("+{:.2}%", change_percent)
    } else if change_percent == 0.0 {
        // Avoid printing "-0.00%".
        "0.00%".to_string()
    } else {
        format!("{:.2}%", change_percent)
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use alert_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
