//! # Calculator State
//!
//! [`CalculatorState`] is the immutable snapshot a host renders. The engine
//! never mutates a snapshot in place; every action produces a new one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::{parse_display, NumberFormat};
use crate::operation::Operation;

/// Text shown while the calculator is in the error state
pub const ERROR_MARKER: &str = "Error";

/// Snapshot of the calculator after the most recent action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    /// Plain decimal literal being shown, or [`ERROR_MARKER`]
    pub display: String,

    /// Trace of the last committed or pending operation, e.g. `"12 + 3 ="`
    pub expression: String,

    /// Operator chosen but not yet applied
    pub pending_operation: Option<Operation>,

    /// Left operand of a pending operation, or the last result
    pub stored_value: Option<Decimal>,

    /// Memory register
    pub memory: Option<Decimal>,

    /// Right operand replayed by repeated Equals
    pub last_operand: Option<Decimal>,

    /// Operator replayed by repeated Equals
    pub last_operation: Option<Operation>,

    /// The next digit starts a new number
    pub just_evaluated: bool,

    /// Division by zero (or overflow) happened; only reset actions recover
    pub is_error: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            display: "0".to_string(),
            expression: String::new(),
            pending_operation: None,
            stored_value: None,
            memory: None,
            last_operand: None,
            last_operation: None,
            just_evaluated: false,
            is_error: false,
        }
    }
}

impl CalculatorState {
    /// The identity state with the given memory register.
    pub fn with_memory(memory: Option<Decimal>) -> Self {
        CalculatorState {
            memory,
            ..CalculatorState::default()
        }
    }

    /// The error state with the given memory register.
    pub fn error(memory: Option<Decimal>) -> Self {
        CalculatorState {
            display: ERROR_MARKER.to_string(),
            is_error: true,
            memory,
            ..CalculatorState::default()
        }
    }

    /// Whether the memory register holds a value
    pub fn has_memory(&self) -> bool {
        self.memory.is_some()
    }

    /// Numeric value of the display (zero in the error state)
    pub fn value(&self) -> Decimal {
        if self.is_error {
            return Decimal::ZERO;
        }
        parse_display(&self.display)
    }

    /// Display text with grouping applied for presentation.
    ///
    /// ```rust
    /// use calc_core::format::NumberFormat;
    /// use calc_core::state::CalculatorState;
    ///
    /// let state = CalculatorState {
    ///     display: "1234567.50".to_string(),
    ///     ..CalculatorState::default()
    /// };
    /// assert_eq!(state.formatted_display(&NumberFormat::default()), "1,234,567.50");
    /// ```
    pub fn formatted_display(&self, format: &NumberFormat) -> String {
        format.format_text(&self.display)
    }

    /// Whether this is the zero state with nothing pending
    pub fn is_identity(&self) -> bool {
        *self == CalculatorState::with_memory(self.memory)
    }
}
