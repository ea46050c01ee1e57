//! Host extension points.
//!
//! Instead of rewriting host behavior, plugins register callbacks on named
//! hook points and the host (or the runtime itself) fires them at the
//! matching moments.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::warn;

use crate::context::CommandContext;
use crate::error::PluginResult;

/// Events announced to registered callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    /// The host finished wiring and is about to start its control loop.
    Startup,

    /// A host object is about to refresh derived state; metadata re-reads
    /// belong here.
    BeforeRefresh {
        /// Identity of the refreshing object.
        object: String,
    },

    /// A plugin was registered with the runtime.
    PluginRegistered { name: String },

    /// A plugin finished handling a dispatched command.
    CommandDispatched { plugin: String, command: String },

    /// The host is shutting down.
    Shutdown,
}

impl HookEvent {
    /// The hook name callbacks are registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::BeforeRefresh { .. } => "before_refresh",
            Self::PluginRegistered { .. } => "plugin_registered",
            Self::CommandDispatched { .. } => "command_dispatched",
            Self::Shutdown => "shutdown",
        }
    }
}

/// A hook callback.
pub type HookFn = Rc<dyn Fn(&HookEvent, &mut CommandContext) -> PluginResult<()>>;

/// Named callback lists the host drives.
#[derive(Default)]
pub struct Hooks {
    callbacks: RefCell<IndexMap<String, Vec<HookFn>>>,
}

impl Hooks {
    /// Create an empty hook table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback under a hook name.
    pub fn register<F>(&self, hook: &str, callback: F)
    where
        F: Fn(&HookEvent, &mut CommandContext) -> PluginResult<()> + 'static,
    {
        self.callbacks
            .borrow_mut()
            .entry(hook.to_string())
            .or_default()
            .push(Rc::new(callback));
    }

    /// Number of callbacks registered under a hook name.
    pub fn registered(&self, hook: &str) -> usize {
        self.callbacks.borrow().get(hook).map_or(0, Vec::len)
    }

    /// Invoke every callback registered for the event, in registration
    /// order. A failing callback is logged and does not stop the rest.
    pub fn fire(&self, event: &HookEvent, ctx: &mut CommandContext) {
        // Callbacks may register further hooks or dispatch commands, so the
        // table must not stay borrowed while they run.
        let callbacks: Vec<HookFn> = self
            .callbacks
            .borrow()
            .get(event.name())
            .map(|list| list.to_vec())
            .unwrap_or_default();
        for callback in callbacks {
            if let Err(err) = callback(event, ctx) {
                warn!(hook = event.name(), %err, "hook callback failed");
            }
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(String, usize)> = self
            .callbacks
            .borrow()
            .iter()
            .map(|(name, list)| (name.clone(), list.len()))
            .collect();
        f.debug_struct("Hooks").field("callbacks", &counts).finish()
    }
}
