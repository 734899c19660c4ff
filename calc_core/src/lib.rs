//! # calc_core - Calculator Engine
//!
//! `calc_core` is the computational heart of the calculator: a small,
//! deterministic state machine that turns key presses (digits, decimal point,
//! operators, equals, sign toggle, percent, memory keys, clear, backspace) into
//! a display value and an expression trace, using decimal arithmetic with a
//! fixed 16-digit, half-to-even context.
//!
//! ## Design Philosophy
//!
//! - **Pure**: `dispatch(state, action) -> state`, no I/O, never panics
//! - **Immutable snapshots**: every action yields a new [`CalculatorState`]
//! - **Explicit formatting**: separators are settings, not a platform locale
//! - **JSON-First**: states, actions and settings implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::{Action, Calculator, Operation};
//!
//! let mut calculator = Calculator::default();
//! calculator.dispatch_all([
//!     Action::Digit(9),
//!     Action::Operation(Operation::Divide),
//!     Action::Digit(0),
//!     Action::Equals,
//! ]);
//! assert!(calculator.state().is_error);
//!
//! calculator.dispatch(Action::Clear);
//! assert_eq!(calculator.state().display, "0");
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The key-press reducer
//! - [`session`] - Current-state owner with change notifications
//! - [`state`] - The snapshot type
//! - [`operation`] - Operators and actions
//! - [`arithmetic`] - Decimal context and display normalization
//! - [`format`] - Grouped formatting and parsing
//! - [`settings`] - Engine and presentation settings
//! - [`file_io`] - Settings persistence with atomic saves
//! - [`errors`] - Structured error types

pub mod arithmetic;
pub mod engine;
pub mod errors;
pub mod file_io;
pub mod format;
pub mod operation;
pub mod session;
pub mod settings;
pub mod state;

// Re-export commonly used types at crate root for convenience
pub use engine::{dispatch, Engine};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_settings, load_settings_or_default, save_settings};
pub use format::NumberFormat;
pub use operation::{Action, Operation};
pub use session::{Calculator, SubscriptionId};
pub use settings::CalculatorSettings;
pub use state::{CalculatorState, ERROR_MARKER};
