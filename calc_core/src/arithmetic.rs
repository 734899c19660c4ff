//! # Decimal Arithmetic
//!
//! All calculator arithmetic runs through a fixed [`DecimalContext`]:
//! 16 significant digits, half-to-even rounding. Results are rounded after
//! every operation, the way a `MathContext`-style decimal library would do it.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::arithmetic::{DecimalContext, to_display_text};
//! use rust_decimal::Decimal;
//!
//! let ctx = DecimalContext::STANDARD;
//! let third = ctx.divide(Decimal::ONE, Decimal::from(3)).unwrap();
//! assert_eq!(to_display_text(third), "0.3333333333333333");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{CalcError, CalcResult};

/// Significant digits kept by every arithmetic result
pub const PRECISION: u32 = 16;

/// Precision and rounding rule applied to arithmetic results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalContext {
    /// Significant digits kept after rounding
    pub precision: u32,
    /// Tie-breaking rule
    pub strategy: RoundingStrategy,
}

impl DecimalContext {
    /// The calculator's context: 16 digits, half-to-even.
    pub const STANDARD: DecimalContext = DecimalContext {
        precision: PRECISION,
        strategy: RoundingStrategy::MidpointNearestEven,
    };

    /// Round a value to this context's precision.
    pub fn round(&self, value: Decimal) -> CalcResult<Decimal> {
        if value.is_zero() {
            return Ok(Decimal::ZERO);
        }
        value
            .round_sf_with_strategy(self.precision, self.strategy)
            .ok_or_else(|| CalcError::overflow("round"))
    }

    pub fn add(&self, left: Decimal, right: Decimal) -> CalcResult<Decimal> {
        let sum = left
            .checked_add(right)
            .ok_or_else(|| CalcError::overflow("add"))?;
        self.round(sum)
    }

    pub fn subtract(&self, left: Decimal, right: Decimal) -> CalcResult<Decimal> {
        let difference = left
            .checked_sub(right)
            .ok_or_else(|| CalcError::overflow("subtract"))?;
        self.round(difference)
    }

    /// Multiply, failing with [`CalcError::Underflow`] when the product is
    /// too small for `Decimal` to hold `precision` significant digits.
    pub fn multiply(&self, left: Decimal, right: Decimal) -> CalcResult<Decimal> {
        let product = left.checked_mul(right).ok_or_else(|| {
            if left.abs() < Decimal::ONE && right.abs() < Decimal::ONE {
                CalcError::underflow("multiply")
            } else {
                CalcError::overflow("multiply")
            }
        })?;
        if !is_exact_product(left, right) && self.lost_digits(product) {
            return Err(CalcError::underflow("multiply"));
        }
        self.round(product)
    }

    /// Divide, failing with [`CalcError::DivisionByZero`] on a zero divisor
    /// and [`CalcError::Underflow`] when the quotient lost significant digits.
    pub fn divide(&self, left: Decimal, right: Decimal) -> CalcResult<Decimal> {
        if right.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        let quotient = left.checked_div(right).ok_or_else(|| {
            if left.abs() < right.abs() {
                CalcError::underflow("divide")
            } else {
                CalcError::overflow("divide")
            }
        })?;
        if !left.is_zero()
            && self.lost_digits(quotient)
            && quotient.checked_mul(right) != Some(left)
        {
            return Err(CalcError::underflow("divide"));
        }
        self.round(quotient)
    }

    /// `reference × value / 100`, rounding after each step.
    pub fn percent_of(&self, reference: Decimal, value: Decimal) -> CalcResult<Decimal> {
        let scaled = self.multiply(reference, value)?;
        self.divide(scaled, Decimal::ONE_HUNDRED)
    }

    /// Whether a nonzero-operand result can no longer carry `precision` digits
    fn lost_digits(&self, result: Decimal) -> bool {
        result.is_zero() || representable_digits(result) < i64::from(self.precision)
    }
}

/// Largest fractional scale a `Decimal` can hold
const MAX_SCALE: u32 = 28;

/// Significant digits available to a nonzero value at the maximum scale.
fn representable_digits(value: Decimal) -> i64 {
    let normalized = value.normalize();
    let digits = normalized.mantissa().unsigned_abs().ilog10() + 1;
    i64::from(MAX_SCALE) + i64::from(digits) - i64::from(normalized.scale())
}

/// Whether `left × right` fits within [`MAX_SCALE`] without rounding.
fn is_exact_product(left: Decimal, right: Decimal) -> bool {
    if left.is_zero() || right.is_zero() {
        return true;
    }
    let (left, right) = (left.normalize(), right.normalize());
    let scale = left.scale() + right.scale();
    if scale <= MAX_SCALE {
        return true;
    }
    match (
        left.mantissa().checked_mul(right.mantissa()),
        10i128.checked_pow(scale - MAX_SCALE),
    ) {
        (Some(product), Some(unit)) => product % unit == 0,
        _ => false,
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        DecimalContext::STANDARD
    }
}

/// Render a value as plain display text.
///
/// Trailing fractional zeros are stripped and negative zero prints as `"0"`.
pub fn to_display_text(value: Decimal) -> String {
    let normalized = value.normalize();
    if normalized.is_zero() {
        return "0".to_string();
    }
    normalized.to_string()
}
