//! # Operations and Actions
//!
//! [`Operation`] is one of the four binary operators; [`Action`] is the closed
//! set of inputs a host can dispatch into the engine.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::arithmetic::DecimalContext;
use crate::errors::CalcResult;

/// Binary operator awaiting or applied to two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// All operators, in keypad order
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Symbol used in the expression trace
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "−",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    /// Look up an operator by its trace symbol or the ASCII key for it.
    ///
    /// ```rust
    /// use calc_core::operation::Operation;
    ///
    /// assert_eq!(Operation::from_symbol("*"), Some(Operation::Multiply));
    /// assert_eq!(Operation::from_symbol("÷"), Some(Operation::Divide));
    /// assert_eq!(Operation::from_symbol("^"), None);
    /// ```
    pub fn from_symbol(symbol: &str) -> Option<Operation> {
        match symbol {
            "+" => Some(Operation::Add),
            "-" | "−" => Some(Operation::Subtract),
            "*" | "x" | "×" => Some(Operation::Multiply),
            "/" | "÷" => Some(Operation::Divide),
            _ => None,
        }
    }

    /// Apply the operator in the standard decimal context.
    pub fn apply(self, left: Decimal, right: Decimal) -> CalcResult<Decimal> {
        self.apply_in(&DecimalContext::STANDARD, left, right)
    }

    /// Apply the operator in an explicit decimal context.
    pub fn apply_in(
        self,
        ctx: &DecimalContext,
        left: Decimal,
        right: Decimal,
    ) -> CalcResult<Decimal> {
        match self {
            Operation::Add => ctx.add(left, right),
            Operation::Subtract => ctx.subtract(left, right),
            Operation::Multiply => ctx.multiply(left, right),
            Operation::Divide => ctx.divide(left, right),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A discrete user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value")]
pub enum Action {
    /// A digit key, 0 through 9. Other values are ignored.
    Digit(u8),
    Decimal,
    Operation(Operation),
    Equals,
    Clear,
    /// Backspace
    Delete,
    ToggleSign,
    Percent,
    MemoryClear,
    MemoryRecall,
    MemoryAdd,
    MemorySubtract,
}
