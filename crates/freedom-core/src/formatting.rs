/// Round to one decimal place, the precision of every displayed ratio.
///
/// ```
/// use freedom_core::formatting::round1;
///
/// assert_eq!(round1(33.333), 33.3);
/// assert_eq!(round1(66.66), 66.7);
/// ```
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// ```
/// use freedom_core::formatting::percentage;
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

/// Mean of an integer sum over `count` items, unrounded. `0.0` when empty.
pub fn average(sum: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// Render a ratio the way the dashboard displays it: one decimal, no grouping.
///
/// ```
/// use freedom_core::formatting::format_ratio;
///
/// assert_eq!(format_ratio(40.0), "40.0");
/// assert_eq!(format_ratio(33.349), "33.3");
/// ```
pub fn format_ratio(value: f64) -> String {
    format!("{:.1}", round1(value))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── round1 / format_ratio ────────────────────────────────────────────────

    #[test]
    fn test_round1() {
        assert_eq!(round1(40.0), 40.0);
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(12.35000001), 12.4);
    }

    #[test]
    fn test_format_ratio_keeps_trailing_zero() {
        assert_eq!(format_ratio(30.0), "30.0");
        assert_eq!(format_ratio(0.0), "0.0");
        assert_eq!(format_ratio(100.0), "100.0");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(4.0, 10.0, 1);
        assert!((p - 40.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10.0, 0.0, 1), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1.0, 3.0, 1);
        assert!((p - 33.3).abs() < 1e-9, "percentage = {p}");
    }

    // ── average ──────────────────────────────────────────────────────────────

    #[test]
    fn test_average() {
        assert_eq!(average(10, 4), 2.5);
        assert_eq!(average(0, 0), 0.0);
        assert_eq!(average(-6, 3), -2.0);
    }
}
