//! Unit handling for numeric property values.
//!
//! Lengths travel through the generator either as typed doubles
//! (`8.5` + [`Unit::Inch`]) or as already-formatted strings (`"2.54cm"`).
//! Both forms end up as ODF attribute strings; a few layout computations
//! (polygon bounding boxes, column widths) need them in inches.

use std::fmt;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const CM_PER_INCH: f64 = 2.54;
pub const MM_PER_INCH: f64 = 25.4;
pub const PICAS_PER_INCH: f64 = 6.0;

/// Unit attached to a double property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Inch
    Inch,
    /// Point (1/72 inch)
    Point,
    /// Twip (1/1440 inch); written out as inches
    Twip,
    /// Fraction rendered as a percentage (`0.5` becomes `50%`)
    Percent,
    /// Plain number
    Generic,
}

impl Unit {
    /// Render `value` in this unit the way ODF attributes expect it.
    pub fn render(self, value: f64) -> String {
        match self {
            Self::Inch => format!("{}in", format_number(value)),
            Self::Point => format!("{}pt", format_number(value)),
            Self::Twip => format!("{}in", format_number(value / TWIPS_PER_INCH)),
            Self::Percent => format!("{}%", format_number(value * 100.0)),
            Self::Generic => format_number(value),
        }
    }

    /// Convert `value` to inches, if this unit is a length.
    #[inline]
    pub fn to_inches(self, value: f64) -> Option<f64> {
        match self {
            Self::Inch => Some(value),
            Self::Point => Some(value / POINTS_PER_INCH),
            Self::Twip => Some(value / TWIPS_PER_INCH),
            Self::Percent | Self::Generic => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inch => "in",
            Self::Point => "pt",
            Self::Twip => "twip",
            Self::Percent => "%",
            Self::Generic => "",
        };
        f.write_str(s)
    }
}

/// Format a double with at most four decimals, trailing zeros trimmed.
///
/// # Examples
///
/// ```
/// use odfgen::common::format_number;
/// assert_eq!(format_number(8.5), "8.5");
/// assert_eq!(format_number(11.0), "11");
/// assert_eq!(format_number(0.123456), "0.1235");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.4}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Parse a length string such as `"2.5cm"` or `"10pt"` into inches.
///
/// A bare number is taken to be inches. Returns `None` for percentages and
/// unknown units.
pub fn parse_length_inches(s: &str) -> Option<f64> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    let value: f64 = digits.parse().ok()?;
    let inches = match unit.trim() {
        "" | "in" | "inch" => value,
        "pt" => value / POINTS_PER_INCH,
        "pc" => value / PICAS_PER_INCH,
        "cm" => value / CM_PER_INCH,
        "mm" => value / MM_PER_INCH,
        "twip" => value / TWIPS_PER_INCH,
        _ => return None,
    };
    Some(inches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_units() {
        assert_eq!(Unit::Inch.render(8.5), "8.5in");
        assert_eq!(Unit::Point.render(12.0), "12pt");
        assert_eq!(Unit::Twip.render(1440.0), "1in");
        assert_eq!(Unit::Percent.render(0.5), "50%");
        assert_eq!(Unit::Generic.render(3.25), "3.25");
    }

    #[test]
    fn test_format_number_trims() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(1.10), "1.1");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_parse_length_inches() {
        assert_eq!(parse_length_inches("1in"), Some(1.0));
        assert_eq!(parse_length_inches("72pt"), Some(1.0));
        assert!((parse_length_inches("2.54cm").unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(parse_length_inches("0.5"), Some(0.5));
        assert_eq!(parse_length_inches("50%"), None);
        assert_eq!(parse_length_inches("abc"), None);
    }

    #[test]
    fn test_to_inches() {
        assert_eq!(Unit::Point.to_inches(36.0), Some(0.5));
        assert_eq!(Unit::Percent.to_inches(0.5), None);
    }
}
