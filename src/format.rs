//! Unit-driven rendering of predicted values.

use strum_macros::Display;
use tracing::{event, Level};

/// How a predicted value is rendered, selected by a widget's unit specifier.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
pub enum ValueFormat {
    /// Two fixed decimal places
    #[strum(serialize = "float_2_dig")]
    TwoDigits,
    /// One fixed decimal place
    #[strum(serialize = "float_1_dig")]
    OneDigit,
    /// Up to three decimal places followed by ` %`
    #[strum(serialize = "%")]
    Percent,
    /// The default numeric representation
    #[strum(serialize = "default")]
    Plain,
}

impl ValueFormat {
    /// Maximum number of decimal places shown for percentages.
    const PERCENT_PRECISION: usize = 3;

    /// Select a format from a unit specifier.
    ///
    /// Matching is exact. Unknown or empty specifiers select [ValueFormat::Plain].
    pub fn from_unit(unit: &str) -> Self {
        match unit {
            "float_2_dig" => Self::TwoDigits,
            "float_1_dig" => Self::OneDigit,
            "%" => Self::Percent,
            _ => Self::Plain,
        }
    }

    /// Render a value in this format.
    pub fn render(self, value: f64) -> String {
        match self {
            Self::TwoDigits => format!("{:.2}", value),
            Self::OneDigit => format!("{:.1}", value),
            Self::Percent => {
                let fixed = format!("{:.*}", Self::PERCENT_PRECISION, value);
                format!("{} %", trim_fraction(&fixed))
            }
            // Debug keeps the fractional part of integral values, e.g. `42.0`.
            Self::Plain => format!("{:?}", value),
        }
    }
}

/// Strip insignificant trailing zeros and a dangling decimal point.
fn trim_fraction(fixed: &str) -> &str {
    if !fixed.contains('.') {
        return fixed;
    }
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0"
    } else {
        trimmed
    }
}

/// Render `value` according to the unit specifier `unit`.
pub fn format_value(value: f64, unit: &str) -> String {
    let format = ValueFormat::from_unit(unit);
    if format == ValueFormat::Plain && !unit.is_empty() {
        event!(
            Level::TRACE,
            "unrecognised unit {:?}, rendering with {} format",
            unit,
            format
        );
    }
    format.render(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_keeps_three_digits() {
        assert_eq!(format_value(10.512, "%"), "10.512 %");
    }

    #[test]
    fn percent_strips_trailing_zeros() {
        assert_eq!(format_value(10.5, "%"), "10.5 %");
        assert_eq!(format_value(14.5, "%"), "14.5 %");
    }

    #[test]
    fn percent_strips_decimal_point() {
        assert_eq!(format_value(10.0, "%"), "10 %");
        assert_eq!(format_value(0.0, "%"), "0 %");
    }

    #[test]
    fn percent_rounds_to_three_digits() {
        assert_eq!(format_value(10.51249, "%"), "10.512 %");
        assert_eq!(format_value(99.9999, "%"), "100 %");
    }

    #[test]
    fn percent_negative_zero() {
        assert_eq!(format_value(-0.0001, "%"), "0 %");
        assert_eq!(format_value(-1.25, "%"), "-1.25 %");
    }

    #[test]
    fn two_digits() {
        assert_eq!(format_value(8.234, "float_2_dig"), "8.23");
        assert_eq!(format_value(22.0, "float_2_dig"), "22.00");
    }

    #[test]
    fn one_digit() {
        assert_eq!(format_value(68.73, "float_1_dig"), "68.7");
        assert_eq!(format_value(12.0, "float_1_dig"), "12.0");
    }

    #[test]
    fn no_unit() {
        assert_eq!(format_value(42.0, ""), "42.0");
        assert_eq!(format_value(16.5, ""), "16.5");
    }

    #[test]
    fn unknown_unit() {
        assert_eq!(format_value(123.456, "unknown"), "123.456");
    }

    #[test]
    fn unit_matching_is_exact() {
        assert_eq!(ValueFormat::from_unit("FLOAT_2_DIG"), ValueFormat::Plain);
        assert_eq!(ValueFormat::from_unit(" %"), ValueFormat::Plain);
        assert_eq!(ValueFormat::from_unit("%"), ValueFormat::Percent);
    }

    #[test]
    fn display_names_unit() {
        assert_eq!(ValueFormat::TwoDigits.to_string(), "float_2_dig");
        assert_eq!(ValueFormat::Percent.to_string(), "%");
        assert_eq!(ValueFormat::Plain.to_string(), "default");
    }

    #[test]
    fn display_names_round_trip_through_units() {
        for format in [
            ValueFormat::TwoDigits,
            ValueFormat::OneDigit,
            ValueFormat::Percent,
        ] {
            assert_eq!(ValueFormat::from_unit(&format.to_string()), format);
        }
    }
}
