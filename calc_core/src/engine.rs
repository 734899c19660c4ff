//! # Calculator Engine
//!
//! The key-press state machine. [`Engine::dispatch`] is a total, pure
//! function of `(previous state, action)`: it never panics, never performs
//! I/O, and encodes every arithmetic failure in the returned state's
//! `is_error` flag.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::engine::dispatch;
//! use calc_core::operation::{Action, Operation};
//! use calc_core::state::CalculatorState;
//!
//! let state = [
//!     Action::Digit(1),
//!     Action::Digit(2),
//!     Action::Operation(Operation::Add),
//!     Action::Digit(3),
//!     Action::Equals,
//! ]
//! .into_iter()
//! .fold(CalculatorState::default(), |state, action| dispatch(&state, action));
//!
//! assert_eq!(state.display, "15");
//! assert_eq!(state.expression, "12 + 3 =");
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::arithmetic::{to_display_text, DecimalContext};
use crate::errors::{CalcError, CalcResult};
use crate::format::digit_count;
use crate::operation::{Action, Operation};
use crate::settings::CalculatorSettings;
use crate::state::CalculatorState;

/// Apply one action to a state using default settings.
pub fn dispatch(state: &CalculatorState, action: Action) -> CalculatorState {
    Engine::default().dispatch(state, action)
}

/// Stateless reducer parameterized by [`CalculatorSettings`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: CalculatorSettings,
    ctx: DecimalContext,
}

impl Engine {
    pub fn new(settings: CalculatorSettings) -> Self {
        Engine {
            settings,
            ctx: DecimalContext::STANDARD,
        }
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    /// Produce the state that follows `state` after `action`.
    pub fn dispatch(&self, state: &CalculatorState, action: Action) -> CalculatorState {
        debug!(?action, display = %state.display, "dispatch");
        match action {
            Action::Digit(digit) => self.append_digit(state, digit),
            Action::Decimal => self.append_decimal(state),
            Action::Operation(op) => self.apply_operation(state, op),
            Action::Equals => self.evaluate(state),
            Action::Clear => self.reset(state),
            Action::Delete => self.backspace(state),
            Action::ToggleSign => self.toggle_sign(state),
            Action::Percent => self.apply_percent(state),
            Action::MemoryClear => CalculatorState {
                memory: None,
                ..state.clone()
            },
            Action::MemoryRecall => self.recall_memory(state),
            Action::MemoryAdd => self.adjust_memory(state, Operation::Add),
            Action::MemorySubtract => self.adjust_memory(state, Operation::Subtract),
        }
    }

    /// Memory register carried into a fresh state, per the reset policy
    fn kept_memory(&self, state: &CalculatorState) -> Option<Decimal> {
        if self.settings.clear_preserves_memory {
            state.memory
        } else {
            None
        }
    }

    fn reset(&self, state: &CalculatorState) -> CalculatorState {
        CalculatorState::with_memory(self.kept_memory(state))
    }

    fn fail(&self, state: &CalculatorState, error: CalcError) -> CalculatorState {
        warn!(%error, "arithmetic error, entering error state");
        CalculatorState::error(self.kept_memory(state))
    }

    fn expression_for(&self, value: Decimal, op: Operation) -> String {
        format!("{} {}", self.settings.format.format_value(value), op.symbol())
    }

    fn append_digit(&self, state: &CalculatorState, digit: u8) -> CalculatorState {
        if digit > 9 {
            return state.clone();
        }
        if state.is_error {
            return CalculatorState {
                display: digit.to_string(),
                ..self.reset(state)
            };
        }

        let base = if state.just_evaluated {
            ""
        } else if state.display == "0" && digit == 0 {
            return state.clone();
        } else if state.display == "0" {
            ""
        } else if state.display == "-0" {
            "-"
        } else {
            state.display.as_str()
        };

        let candidate = format!("{base}{digit}");
        if digit_count(&candidate) > self.settings.max_digits {
            trace!(max_digits = self.settings.max_digits, "digit dropped at cap");
            return state.clone();
        }

        let fresh_chain = state.just_evaluated && state.pending_operation.is_none();
        let keep_repeat = state.pending_operation.is_some();
        CalculatorState {
            display: candidate,
            stored_value: state.stored_value.filter(|_| !fresh_chain),
            expression: if fresh_chain {
                String::new()
            } else {
                state.expression.clone()
            },
            last_operand: state.last_operand.filter(|_| keep_repeat),
            last_operation: state.last_operation.filter(|_| keep_repeat),
            just_evaluated: false,
            is_error: false,
            ..state.clone()
        }
    }

    fn append_decimal(&self, state: &CalculatorState) -> CalculatorState {
        if state.is_error {
            return CalculatorState {
                display: "0.".to_string(),
                ..self.reset(state)
            };
        }

        let target = if state.just_evaluated || state.display.is_empty() {
            "0"
        } else {
            state.display.as_str()
        };
        if target.contains('.') {
            return CalculatorState {
                just_evaluated: false,
                ..state.clone()
            };
        }

        let fresh_chain = state.just_evaluated && state.pending_operation.is_none();
        let keep_repeat = state.pending_operation.is_some();
        CalculatorState {
            display: format!("{target}."),
            stored_value: state.stored_value.filter(|_| !fresh_chain),
            expression: if fresh_chain {
                String::new()
            } else {
                state.expression.clone()
            },
            last_operand: state.last_operand.filter(|_| keep_repeat),
            last_operation: state.last_operation.filter(|_| keep_repeat),
            just_evaluated: false,
            is_error: false,
            ..state.clone()
        }
    }

    fn apply_operation(&self, state: &CalculatorState, op: Operation) -> CalculatorState {
        if state.is_error {
            return CalculatorState {
                pending_operation: Some(op),
                stored_value: Some(Decimal::ZERO),
                expression: self.expression_for(Decimal::ZERO, op),
                just_evaluated: true,
                ..self.reset(state)
            };
        }

        let input = state.value();
        let Some(pending) = state.pending_operation else {
            return CalculatorState {
                stored_value: Some(input),
                pending_operation: Some(op),
                expression: self.expression_for(input, op),
                just_evaluated: true,
                last_operand: None,
                last_operation: None,
                ..state.clone()
            };
        };

        if state.just_evaluated {
            // Operand not typed yet: swap the operator.
            let left = state.stored_value.unwrap_or(input);
            return CalculatorState {
                pending_operation: Some(op),
                expression: self.expression_for(left, op),
                ..state.clone()
            };
        }

        match self.perform(state.stored_value, input, pending) {
            Ok(result) => CalculatorState {
                stored_value: Some(result),
                display: to_display_text(result),
                pending_operation: Some(op),
                expression: self.expression_for(result, op),
                just_evaluated: true,
                last_operand: None,
                last_operation: None,
                ..state.clone()
            },
            Err(error) => self.fail(state, error),
        }
    }

    fn evaluate(&self, state: &CalculatorState) -> CalculatorState {
        if state.is_error {
            return self.reset(state);
        }

        if let (Some(op), Some(left)) = (state.pending_operation, state.stored_value) {
            return self.commit(state, left, op, state.value());
        }
        if let (Some(op), Some(operand)) = (state.last_operation, state.last_operand) {
            return self.commit(state, state.value(), op, operand);
        }
        state.clone()
    }

    fn commit(
        &self,
        state: &CalculatorState,
        left: Decimal,
        op: Operation,
        operand: Decimal,
    ) -> CalculatorState {
        match op.apply_in(&self.ctx, left, operand) {
            Ok(result) => {
                let format = &self.settings.format;
                CalculatorState {
                    display: to_display_text(result),
                    expression: format!(
                        "{} {} {} =",
                        format.format_value(left),
                        op.symbol(),
                        format.format_value(operand)
                    ),
                    stored_value: Some(result),
                    pending_operation: None,
                    last_operand: Some(operand),
                    last_operation: Some(op),
                    just_evaluated: true,
                    is_error: false,
                    ..state.clone()
                }
            }
            Err(error) => self.fail(state, error),
        }
    }

    fn perform(&self, left: Option<Decimal>, right: Decimal, op: Operation) -> CalcResult<Decimal> {
        match left {
            Some(left) => op.apply_in(&self.ctx, left, right),
            None => Ok(right),
        }
    }

    fn backspace(&self, state: &CalculatorState) -> CalculatorState {
        if state.is_error {
            return self.reset(state);
        }
        if state.just_evaluated {
            return CalculatorState {
                display: "0".to_string(),
                just_evaluated: false,
                ..state.clone()
            };
        }

        let mut trimmed = state.display.clone();
        trimmed.pop();
        let display = match trimmed.as_str() {
            "" | "-" | "-0" => "0".to_string(),
            _ => trimmed,
        };
        CalculatorState {
            display,
            ..state.clone()
        }
    }

    fn toggle_sign(&self, state: &CalculatorState) -> CalculatorState {
        if state.is_error {
            return state.clone();
        }

        let toggled = match state.display.strip_prefix('-') {
            Some(unsigned) => unsigned.to_string(),
            None => format!("-{}", state.display),
        };
        let display = match toggled.as_str() {
            "-" | "-0" => "0".to_string(),
            _ => toggled,
        };
        CalculatorState {
            display,
            just_evaluated: false,
            ..state.clone()
        }
    }

    fn apply_percent(&self, state: &CalculatorState) -> CalculatorState {
        if state.is_error {
            return state.clone();
        }

        let reference = match (state.pending_operation, state.stored_value) {
            (Some(_), Some(stored)) => stored,
            _ => Decimal::ONE,
        };
        match self.ctx.percent_of(reference, state.value()) {
            Ok(percent) => CalculatorState {
                display: to_display_text(percent),
                just_evaluated: false,
                ..state.clone()
            },
            Err(error) => self.fail(state, error),
        }
    }

    fn recall_memory(&self, state: &CalculatorState) -> CalculatorState {
        match state.memory {
            Some(memory) if !state.is_error => CalculatorState {
                display: to_display_text(memory),
                just_evaluated: false,
                ..state.clone()
            },
            _ => state.clone(),
        }
    }

    fn adjust_memory(&self, state: &CalculatorState, op: Operation) -> CalculatorState {
        if state.is_error {
            return state.clone();
        }

        let base = state.memory.unwrap_or(Decimal::ZERO);
        match op.apply_in(&self.ctx, base, state.value()) {
            Ok(memory) => CalculatorState {
                memory: Some(memory),
                ..state.clone()
            },
            Err(error) => {
                warn!(%error, "memory register unchanged");
                state.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn run(actions: &[Action]) -> CalculatorState {
        run_with(&Engine::default(), actions)
    }

    fn run_with(engine: &Engine, actions: &[Action]) -> CalculatorState {
        actions
            .iter()
            .fold(CalculatorState::default(), |state, &action| engine.dispatch(&state, action))
    }

    fn digits(text: &str) -> Vec<Action> {
        text.chars()
            .map(|c| match c {
                '.' => Action::Decimal,
                d => Action::Digit(d.to_digit(10).unwrap() as u8),
            })
            .collect()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_leading_zero_is_replaced() {
        assert_eq!(run(&digits("05")).display, "5");
        assert_eq!(run(&digits("000")).display, "0");
        assert_eq!(run(&digits("0.05")).display, "0.05");
    }

    #[test]
    fn test_digit_cap() {
        let state = run(&digits("1234567890123456789"));
        assert_eq!(state.display, "123456789012345");

        let engine = Engine::new(CalculatorSettings::default().with_max_digits(3));
        assert_eq!(run_with(&engine, &digits("1.2345")).display, "1.23");
    }

    #[test]
    fn test_invalid_digit_ignored() {
        assert_eq!(run(&[Action::Digit(7), Action::Digit(10)]).display, "7");
    }

    #[test]
    fn test_decimal_is_idempotent() {
        let state = run(&digits("1..2."));
        assert_eq!(state.display, "1.2");
        assert_eq!(run(&[Action::Decimal]).display, "0.");
    }

    #[test]
    fn test_negative_zero_keeps_sign_while_typing() {
        let mut state = CalculatorState {
            display: "-0".to_string(),
            ..CalculatorState::default()
        };
        state = dispatch(&state, Action::Digit(5));
        assert_eq!(state.display, "-5");

        let state = dispatch(
            &CalculatorState {
                display: "-0".to_string(),
                ..CalculatorState::default()
            },
            Action::Decimal,
        );
        assert_eq!(state.display, "-0.");
    }

    #[test]
    fn test_simple_addition() {
        let mut actions = digits("12");
        actions.push(Action::Operation(Operation::Add));
        actions.push(Action::Digit(3));
        actions.push(Action::Equals);
        let state = run(&actions);
        assert_eq!(state.display, "15");
        assert_eq!(state.expression, "12 + 3 =");
        assert_eq!(state.stored_value, Some(dec("15")));
        assert!(state.pending_operation.is_none());
        assert!(state.just_evaluated);
    }

    #[test]
    fn test_pending_expression_trace() {
        let state = run(&[
            Action::Digit(1),
            Action::Digit(2),
            Action::Operation(Operation::Multiply),
        ]);
        assert_eq!(state.expression, "12 ×");
        assert_eq!(state.stored_value, Some(dec("12")));
        assert!(state.just_evaluated);
        assert_eq!(state.display, "12");
    }

    #[test]
    fn test_operator_swap_without_operand() {
        let state = run(&[
            Action::Digit(8),
            Action::Operation(Operation::Add),
            Action::Operation(Operation::Subtract),
            Action::Digit(3),
            Action::Equals,
        ]);
        assert_eq!(state.display, "5");
        assert_eq!(state.expression, "8 − 3 =");
    }

    #[test]
    fn test_chained_operations_evaluate_left_to_right() {
        let state = run(&[
            Action::Digit(2),
            Action::Operation(Operation::Add),
            Action::Digit(3),
            Action::Operation(Operation::Multiply),
        ]);
        assert_eq!(state.display, "5");
        assert_eq!(state.expression, "5 ×");
        assert_eq!(state.pending_operation, Some(Operation::Multiply));
    }

    #[test]
    fn test_chained_division_by_zero() {
        let state = run(&[
            Action::Digit(4),
            Action::Operation(Operation::Divide),
            Action::Digit(0),
            Action::Operation(Operation::Add),
        ]);
        assert!(state.is_error);
        assert_eq!(state.display, "Error");
    }

    #[test]
    fn test_repeat_equals() {
        let state = run(&[
            Action::Digit(5),
            Action::Operation(Operation::Add),
            Action::Digit(3),
            Action::Equals,
        ]);
        assert_eq!(state.display, "8");
        let state = dispatch(&state, Action::Equals);
        assert_eq!(state.display, "11");
        assert_eq!(state.expression, "8 + 3 =");
        let state = dispatch(&state, Action::Equals);
        assert_eq!(state.display, "14");
    }

    #[test]
    fn test_repeat_equals_on_new_number() {
        let state = run(&[
            Action::Digit(2),
            Action::Operation(Operation::Multiply),
            Action::Digit(3),
            Action::Equals,
        ]);
        // A new number typed after the result breaks the repeat chain
        let state = dispatch(&state, Action::Digit(4));
        assert_eq!(state.display, "4");
        assert!(state.last_operation.is_none());
        assert!(state.stored_value.is_none());
        assert!(state.expression.is_empty());
        assert_eq!(dispatch(&state, Action::Equals).display, "4");
    }

    #[test]
    fn test_equals_without_operation_is_noop() {
        let state = run(&[Action::Digit(7), Action::Equals]);
        assert_eq!(state.display, "7");
        assert!(state.expression.is_empty());
    }

    #[test]
    fn test_division_rounds_to_context() {
        let state = run(&[
            Action::Digit(1),
            Action::Operation(Operation::Divide),
            Action::Digit(3),
            Action::Equals,
        ]);
        assert_eq!(state.display, "0.3333333333333333");
        assert_eq!(state.expression, "1 ÷ 3 =");
    }

    #[test]
    fn test_subtraction_to_negative_zero_renders_zero() {
        let state = run(&[
            Action::Digit(0),
            Action::Decimal,
            Action::Digit(5),
            Action::Operation(Operation::Subtract),
            Action::Digit(0),
            Action::Decimal,
            Action::Digit(5),
            Action::Equals,
        ]);
        assert_eq!(state.display, "0");
    }

    #[test]
    fn test_divide_by_zero_and_recovery() {
        let state = run(&[
            Action::Digit(9),
            Action::Operation(Operation::Divide),
            Action::Digit(0),
            Action::Equals,
        ]);
        assert!(state.is_error);
        assert_eq!(state.display, "Error");

        assert_eq!(dispatch(&state, Action::ToggleSign), state);
        assert_eq!(dispatch(&state, Action::Percent), state);
        assert_eq!(dispatch(&state, Action::MemoryAdd), state);
        assert_eq!(dispatch(&state, Action::MemoryRecall), state);

        assert!(dispatch(&state, Action::Clear).is_identity());
        assert!(dispatch(&state, Action::Equals).is_identity());
        assert!(dispatch(&state, Action::Delete).is_identity());
    }

    #[test]
    fn test_input_after_error_starts_fresh() {
        let error = CalculatorState::error(None);
        assert_eq!(dispatch(&error, Action::Digit(4)).display, "4");
        assert_eq!(dispatch(&error, Action::Decimal).display, "0.");

        let state = dispatch(&error, Action::Operation(Operation::Subtract));
        assert!(!state.is_error);
        assert_eq!(state.stored_value, Some(Decimal::ZERO));
        assert_eq!(state.pending_operation, Some(Operation::Subtract));
        assert_eq!(state.expression, "0 −");
    }

    #[test]
    fn test_backspace() {
        assert_eq!(run(&[Action::Digit(1), Action::Digit(2), Action::Delete]).display, "1");
        assert_eq!(run(&[Action::Digit(1), Action::Delete]).display, "0");
        assert_eq!(run(&[Action::Digit(5), Action::ToggleSign, Action::Delete]).display, "0");
        assert_eq!(run(&[Action::Digit(1), Action::Decimal, Action::Delete]).display, "1");

        let evaluated = run(&[
            Action::Digit(2),
            Action::Operation(Operation::Add),
            Action::Digit(2),
            Action::Equals,
            Action::Delete,
        ]);
        assert_eq!(evaluated.display, "0");
        assert!(!evaluated.just_evaluated);
    }

    #[test]
    fn test_toggle_sign() {
        assert_eq!(run(&[Action::ToggleSign]).display, "0");
        assert_eq!(run(&[Action::Digit(4), Action::ToggleSign]).display, "-4");
        assert_eq!(run(&[Action::Digit(4), Action::ToggleSign, Action::ToggleSign]).display, "4");
        assert_eq!(run(&[Action::Decimal, Action::ToggleSign]).display, "-0.");
    }

    #[test]
    fn test_percent_without_pending() {
        let state = run(&[Action::Digit(5), Action::Digit(0), Action::Percent]);
        assert_eq!(state.display, "0.5");
        assert!(!state.just_evaluated);
    }

    #[test]
    fn test_percent_of_stored_operand() {
        let state = run(&[
            Action::Digit(2),
            Action::Digit(0),
            Action::Digit(0),
            Action::Operation(Operation::Add),
            Action::Digit(1),
            Action::Digit(0),
            Action::Percent,
        ]);
        assert_eq!(state.display, "20");
        assert_eq!(dispatch(&state, Action::Equals).display, "220");
    }

    #[test]
    fn test_memory_operations() {
        let state = run(&[Action::Digit(5), Action::MemoryAdd]);
        assert_eq!(state.memory, Some(dec("5")));

        let state = run(&[
            Action::Digit(5),
            Action::MemoryAdd,
            Action::Clear,
            Action::Digit(2),
            Action::MemorySubtract,
            Action::MemoryRecall,
        ]);
        assert_eq!(state.display, "3");

        let state = dispatch(&state, Action::MemoryClear);
        assert!(!state.has_memory());
        assert_eq!(dispatch(&state, Action::MemoryRecall), state);
    }

    #[test]
    fn test_memory_subtract_from_empty() {
        let state = run(&[Action::Digit(4), Action::MemorySubtract]);
        assert_eq!(state.memory, Some(dec("-4")));
    }

    #[test]
    fn test_clear_policy() {
        let actions = [Action::Digit(5), Action::MemoryAdd, Action::Clear, Action::MemoryRecall];
        assert_eq!(run(&actions).display, "5");

        let engine = Engine::new(CalculatorSettings::default().with_clear_preserves_memory(false));
        let state = run_with(&engine, &actions);
        assert_eq!(state.display, "0");
        assert!(!state.has_memory());
    }

    #[test]
    fn test_recalled_value_is_second_operand() {
        let state = run(&[
            Action::Digit(6),
            Action::MemoryAdd,
            Action::Clear,
            Action::Digit(4),
            Action::Operation(Operation::Multiply),
            Action::MemoryRecall,
            Action::Equals,
        ]);
        assert_eq!(state.display, "24");
        assert_eq!(state.expression, "4 × 6 =");
    }

    #[test]
    fn test_expression_uses_format() {
        let format = crate::format::NumberFormat::new('.', ',');
        let engine = Engine::new(CalculatorSettings::default().with_format(format));
        let mut actions = digits("1234");
        actions.push(Action::Operation(Operation::Add));
        actions.push(Action::Digit(1));
        actions.push(Action::Equals);
        let state = run_with(&engine, &actions);
        assert_eq!(state.display, "1235");
        assert_eq!(state.expression, "1.234 + 1 =");
    }

    #[test]
    fn test_shrinking_repeat_division_errors_instead_of_zero() {
        let mut state = run(&[
            Action::Digit(1),
            Action::Operation(Operation::Divide),
            Action::Digit(7),
            Action::Equals,
        ]);
        for _ in 0..36 {
            state = dispatch(&state, Action::Equals);
            if state.is_error {
                break;
            }
            assert_ne!(state.display, "0");
        }
        assert!(state.is_error);
        assert_eq!(state.display, "Error");
    }

    #[test]
    fn test_overflow_enters_error_state() {
        let mut actions = digits("999999999999999");
        actions.push(Action::Operation(Operation::Multiply));
        actions.extend(digits("999999999999"));
        actions.push(Action::Equals);
        let state = run(&actions);
        assert!(!state.is_error);

        // Around 1e27 fits; multiplying by 1e12 again does not
        let state = dispatch(&state, Action::Equals);
        assert!(state.is_error);
        assert_eq!(state.display, "Error");
    }
}
