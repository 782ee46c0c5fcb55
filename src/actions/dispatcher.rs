//! Action dispatch entry point
//!
//! Hot corners, keyboard shortcuts and the one-shot CLI mode are just three
//! different populators of [`RunActionData`] feeding [`Dispatcher::dispatch`].

use tracing::{debug, error};

use crate::backend::ShellOps;

use super::registry::ActionRegistry;

/// Invocation context of one dispatch
///
/// Constructed fresh by the trigger source immediately before dispatch and
/// passed by value, so at most one logical invocation exists at a time and no
/// stale context can leak across event-loop turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunActionData {
    /// Action id to invoke
    pub action: String,
    /// Slot index of the monitor the trigger fired on
    pub monitor_index: usize,
    /// Target workspace for the workspace actions
    pub workspace_index: u32,
    /// Shell command line for the run-command action
    pub command: String,
    /// True when the firing source was a keyboard shortcut
    pub keyboard_origin: bool,
}

impl RunActionData {
    /// Context with defaults for everything but the action id
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            monitor_index: 0,
            workspace_index: 0,
            command: String::new(),
            keyboard_origin: false,
        }
    }
}

/// Routes populated contexts through the registry to a handler
pub struct Dispatcher {
    registry: ActionRegistry,
}

impl Dispatcher {
    /// Build the dispatcher with the full catalog registered
    pub fn new() -> Self {
        Self { registry: ActionRegistry::from_catalog() }
    }

    /// The underlying registry
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Invoke the handler registered for `data.action`
    ///
    /// Returns false for unknown or stale action ids (e.g. a config entry
    /// referring to an action this build does not carry); an unknown action
    /// degrades to a no-op, never a crash. Handler failures are contained
    /// here: one misbehaving handler must not break the shared event loop.
    pub fn dispatch(&self, shell: &mut dyn ShellOps, data: RunActionData) -> bool {
        let Some(handler) = self.registry.lookup(&data.action) else {
            debug!(action = %data.action, "No handler registered, ignoring");
            return false;
        };

        debug!(
            action = %data.action,
            monitor = data.monitor_index,
            keyboard = data.keyboard_origin,
            "Dispatching action"
        );
        if let Err(err) = handler(shell, &data) {
            error!(action = %data.action, error = %err, "Action handler failed");
        }
        true
    }
}
