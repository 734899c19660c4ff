//! # Calculator CLI
//!
//! Terminal host for the calculator engine. Key tokens come from the command
//! line or, when none are given, from stdin (one or more tokens per line).
//! After each line the display, expression and memory indicator are printed.
//!
//! ## Keys
//!
//! | Token                 | Action          |
//! |-----------------------|-----------------|
//! | `0`-`9`, `.`, `12.5`  | digits/decimal  |
//! | `+ - * /` (or `− × ÷`)| operators       |
//! | `=`                   | equals          |
//! | `c`, `ac`, `clear`    | clear           |
//! | `del`, `back`         | backspace       |
//! | `neg`, `±`, `+/-`     | toggle sign     |
//! | `%`                   | percent         |
//! | `mc mr m+ m-`         | memory keys     |

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use calc_core::{
    load_settings_or_default, save_settings, Action, Calculator, CalculatorSettings,
    CalculatorState, Operation,
};

/// Calculator driven by key tokens
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Keys to press, e.g. `12 + 3 =`. Reads stdin when omitted.
    keys: Vec<String>,

    /// Settings file (JSON); defaults are used if it does not exist
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Print each snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Write the default settings to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    initialize_tracing();
    let args = Args::parse();

    if let Some(path) = &args.write_default_settings {
        save_settings(&CalculatorSettings::default(), path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = match &args.settings {
        Some(path) => load_settings_or_default(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => CalculatorSettings::default(),
    };
    let mut calculator = Calculator::new(settings);

    if !args.keys.is_empty() {
        for token in &args.keys {
            let actions = parse_token(token).with_context(|| format!("invalid key '{token}'"))?;
            calculator.dispatch_all(actions);
        }
        return print_state(&calculator, args.json);
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        for token in line.split_whitespace() {
            match parse_token(token) {
                Ok(actions) => {
                    calculator.dispatch_all(actions);
                }
                Err(e) => warn!("skipping key '{}': {}", token, e),
            }
        }
        print_state(&calculator, args.json)?;
    }

    Ok(())
}

/// Initialize the tracing system; `RUST_LOG` overrides the `warn` default.
fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Map one token to the key presses it stands for.
fn parse_token(token: &str) -> Result<Vec<Action>> {
    let action = match token.to_lowercase().as_str() {
        "=" => Some(Action::Equals),
        "c" | "ac" | "clear" => Some(Action::Clear),
        "del" | "back" | "⌫" => Some(Action::Delete),
        "neg" | "±" | "+/-" => Some(Action::ToggleSign),
        "%" => Some(Action::Percent),
        "mc" => Some(Action::MemoryClear),
        "mr" => Some(Action::MemoryRecall),
        "m+" => Some(Action::MemoryAdd),
        "m-" => Some(Action::MemorySubtract),
        other => Operation::from_symbol(other).map(Action::Operation),
    };
    if let Some(action) = action {
        return Ok(vec![action]);
    }

    // A run of digits and decimal points is typed key by key
    token
        .chars()
        .map(|c| match c {
            '.' => Ok(Action::Decimal),
            c => match c.to_digit(10) {
                Some(d) => Ok(Action::Digit(d as u8)),
                None => bail!("unknown key '{c}'"),
            },
        })
        .collect()
}

fn print_state(calculator: &Calculator, json: bool) -> Result<()> {
    let state = calculator.state();
    debug!(?state, "render");

    let mut out = io::stdout().lock();
    if json {
        let rendered = serde_json::to_string(state).context("serializing state")?;
        writeln!(out, "{}", rendered)?;
    } else {
        writeln!(out, "{}", render(state, &calculator.formatted_display()))?;
    }
    Ok(())
}

/// Two-line view: expression above, display below with a memory marker
fn render(state: &CalculatorState, display: &str) -> String {
    let memory = if state.has_memory() { "M " } else { "  " };
    format!("{:>24}\n{}{:>22}", state.expression, memory, display)
}
