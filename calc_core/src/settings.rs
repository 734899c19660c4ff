//! # Calculator Settings
//!
//! Explicit configuration for the engine and its presentation. Settings are
//! plain JSON-serializable values; see [`crate::file_io`] for persistence.
//!
//! ```text
//! CalculatorSettings
//! ├── version: schema version of the settings file
//! ├── format: NumberFormat (grouping/decimal separators, fraction digits)
//! ├── max_digits: digits accepted while typing a number
//! └── clear_preserves_memory: memory register survives resets
//! ```

use serde::{Deserialize, Serialize};

use crate::format::NumberFormat;

/// Current schema version for settings files
pub const SETTINGS_VERSION: &str = "0.1.0";

/// Default cap on typed digits (sign and separators excluded)
pub const DEFAULT_MAX_DIGITS: usize = 15;

/// Engine and presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// How values are presented and parsed
    pub format: NumberFormat,

    /// Digits accepted while typing; further digit keys are dropped
    pub max_digits: usize,

    /// Keep the memory register on Clear and on entering/leaving the error state
    pub clear_preserves_memory: bool,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            version: SETTINGS_VERSION.to_string(),
            format: NumberFormat::default(),
            max_digits: DEFAULT_MAX_DIGITS,
            clear_preserves_memory: true,
        }
    }
}

impl CalculatorSettings {
    /// Builder-style override of the number format
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder-style override of the digit cap
    pub fn with_max_digits(mut self, max_digits: usize) -> Self {
        self.max_digits = max_digits;
        self
    }

    /// Builder-style override of the memory policy
    pub fn with_clear_preserves_memory(mut self, preserve: bool) -> Self {
        self.clear_preserves_memory = preserve;
        self
    }
}
