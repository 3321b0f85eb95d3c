//! Circular skill meter geometry
//!
//! A progress ring is an SVG circle whose dash is as long as its circumference.
//! Shifting the dash by `circumference - percent% * circumference` leaves
//! exactly `percent`% of the outline drawn.

use std::f64::consts::PI;

/// Circumference of a ring with the given radius
pub fn circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Parse a `data-percent` value, clamped to 0-100. Non-numeric yields `None`.
pub fn parse_percent(raw: Option<&str>) -> Option<f64> {
    let value: f64 = raw?.trim().parse().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// `stroke-dashoffset` that reveals `percent`% of the ring
pub fn dash_offset(percent: f64, circumference: f64) -> f64 {
    circumference - (percent / 100.0) * circumference
}

/// Style value for an offset
pub fn format_offset(offset: f64) -> String {
    format!("{:.2}", offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_seventy_five_percent() {
        let c = circumference(45.0);
        let offset = dash_offset(75.0, c);
        assert!((offset - (2.0 * PI * 45.0 - 0.75 * 2.0 * PI * 45.0)).abs() < 1e-9);
        assert!((offset - 70.69).abs() < 0.01);
        assert_eq!(format_offset(offset), "70.69");
    }

    #[test]
    fn test_offset_bounds() {
        let c = circumference(45.0);
        assert_eq!(dash_offset(0.0, c), c);
        assert_eq!(dash_offset(100.0, c), 0.0);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent(Some("75")), Some(75.0));
        assert_eq!(parse_percent(Some(" 92.5 ")), Some(92.5));
        assert_eq!(parse_percent(Some("140")), Some(100.0));
        assert_eq!(parse_percent(Some("-3")), Some(0.0));
        assert_eq!(parse_percent(Some("NaN")), None);
        assert_eq!(parse_percent(Some("lots")), None);
        assert_eq!(parse_percent(None), None);
    }
}
