//! # Calculator Session
//!
//! [`Calculator`] owns the current snapshot and an [`Engine`]. Hosts pull the
//! snapshot with [`Calculator::state`] or register listeners that are called
//! whenever a dispatched action changes it.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use calc_core::operation::Action;
//! use calc_core::session::Calculator;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let mut calculator = Calculator::default();
//! calculator.subscribe(move |state| sink.borrow_mut().push(state.display.clone()));
//!
//! calculator.dispatch(Action::Digit(4));
//! calculator.dispatch(Action::Digit(2));
//! assert_eq!(*seen.borrow(), vec!["4", "42"]);
//! ```

use tracing::debug;

use crate::engine::Engine;
use crate::operation::Action;
use crate::settings::CalculatorSettings;
use crate::state::CalculatorState;

/// Handle returned by [`Calculator::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CalculatorState)>;

/// Owner of the current calculator state.
pub struct Calculator {
    engine: Engine,
    state: CalculatorState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Calculator {
    /// Create a calculator in the identity state.
    pub fn new(settings: CalculatorSettings) -> Self {
        Calculator {
            engine: Engine::new(settings),
            state: CalculatorState::default(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn settings(&self) -> &CalculatorSettings {
        self.engine.settings()
    }

    /// Display text formatted with the configured separators
    pub fn formatted_display(&self) -> String {
        self.state.formatted_display(&self.settings().format)
    }

    /// Apply an action, notifying listeners if the snapshot changed.
    pub fn dispatch(&mut self, action: Action) -> &CalculatorState {
        let next = self.engine.dispatch(&self.state, action);
        if next != self.state {
            self.state = next;
            self.notify();
        }
        &self.state
    }

    /// Apply a sequence of actions in order.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> &CalculatorState {
        for action in actions {
            self.dispatch(action);
        }
        &self.state
    }

    /// Register a change listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CalculatorState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(?id, listeners = self.listeners.len(), "listener subscribed");
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new(CalculatorSettings::default())
    }
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("engine", &self.engine)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
