//! # Number Formatting
//!
//! Presentation of decimal values with grouping and decimal separators, and
//! the inverse parse. Separators are explicit configuration rather than a
//! platform locale lookup, so formatting is a pure function of its inputs.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::format::NumberFormat;
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let format = NumberFormat::default();
//! let value = Decimal::from_str("1234.5").unwrap();
//! assert_eq!(format.format_value(value), "1,234.5");
//! assert_eq!(format.parse("1,234.5").unwrap(), value);
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::arithmetic::to_display_text;
use crate::errors::{CalcError, CalcResult};

/// Separators and fraction limit used to present numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Inserted between groups of three integer digits
    pub grouping_separator: char,
    /// Separates the integer and fractional parts
    pub decimal_separator: char,
    /// Fraction digits kept when formatting a value (not typed input)
    pub max_fraction_digits: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            grouping_separator: ',',
            decimal_separator: '.',
            max_fraction_digits: 10,
        }
    }
}

impl NumberFormat {
    /// Create a format with the given separators and the default fraction limit.
    ///
    /// The two separators must differ and must not be digits or `-`,
    /// otherwise formatted text no longer parses back to the same value.
    /// [`NumberFormat::validate`] checks this; settings files are validated
    /// on load.
    pub fn new(grouping_separator: char, decimal_separator: char) -> Self {
        NumberFormat {
            grouping_separator,
            decimal_separator,
            ..NumberFormat::default()
        }
    }

    /// Check that the separators can be told apart from each other and from
    /// the characters of a number literal.
    pub fn validate(&self) -> CalcResult<()> {
        let separators = format!(
            "grouping {:?}, decimal {:?}",
            self.grouping_separator, self.decimal_separator
        );
        if self.grouping_separator == self.decimal_separator {
            return Err(CalcError::invalid_input(
                separators,
                "grouping and decimal separators must differ",
            ));
        }
        for separator in [self.grouping_separator, self.decimal_separator] {
            if separator.is_ascii_digit() || separator == '-' {
                return Err(CalcError::invalid_input(
                    separators,
                    "separators cannot be digits or '-'",
                ));
            }
        }
        if self.decimal_separator.is_whitespace() {
            return Err(CalcError::invalid_input(
                separators,
                "decimal separator cannot be whitespace",
            ));
        }
        Ok(())
    }

    /// Format a value for presentation: rounded to `max_fraction_digits`
    /// (half-to-even), trailing zeros stripped, integer part grouped.
    pub fn format_value(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(
            self.max_fraction_digits,
            RoundingStrategy::MidpointNearestEven,
        );
        self.format_text(&to_display_text(rounded))
    }

    /// Group a plain display literal as typed, keeping a trailing decimal
    /// point and fractional zeros. Text that is not a number literal
    /// (e.g. the error marker) is returned unchanged.
    ///
    /// ```rust
    /// use calc_core::format::NumberFormat;
    ///
    /// let format = NumberFormat::new('.', ',');
    /// assert_eq!(format.format_text("-1234567.50"), "-1.234.567,50");
    /// assert_eq!(format.format_text("1000."), "1.000,");
    /// assert_eq!(format.format_text("Error"), "Error");
    /// ```
    pub fn format_text(&self, text: &str) -> String {
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };

        let is_literal = !integer.is_empty()
            && integer.chars().all(|c| c.is_ascii_digit())
            && fraction.map_or(true, |f| f.chars().all(|c| c.is_ascii_digit()));
        if !is_literal {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + integer.len() / 3);
        out.push_str(sign);
        out.push_str(&group_digits(integer, self.grouping_separator));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    /// Parse presented text back into a value.
    ///
    /// Grouping separators and spaces are removed and the decimal separator
    /// is mapped to `.`. A dangling decimal point (`"12."`), an empty string,
    /// or a lone sign parse as typed input would (`12`, `0`, `0`).
    pub fn parse(&self, text: &str) -> CalcResult<Decimal> {
        let mut plain: String = text
            .chars()
            .filter(|&c| c != self.grouping_separator && !c.is_whitespace())
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        if plain.ends_with('.') {
            plain.pop();
        }
        if plain.is_empty() || plain == "-" {
            return Ok(Decimal::ZERO);
        }

        Decimal::from_str(&plain).map_err(|e| CalcError::invalid_input(text, e.to_string()))
    }
}

/// Parse an engine display literal, treating anything unparseable as zero.
///
/// Group separators are stripped first, so grouped text round-trips.
pub fn parse_display(text: &str) -> Decimal {
    NumberFormat::default().parse(text).unwrap_or(Decimal::ZERO)
}

/// Count the digits of a display literal, ignoring sign and separators.
pub fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
