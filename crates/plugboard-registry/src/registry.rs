//! The runtime context object.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use plugboard_core::{Metadata, ParserFn, TypeRegistry, TypeSpec, Value, extract};

use crate::context::CommandContext;
use crate::error::{PluginError, PluginResult};
use crate::hooks::{HookEvent, Hooks};
use crate::plugin::Plugin;
use crate::source::{EmptySource, ParamSource};

/// The single context object a host constructs at startup.
///
/// A runtime owns the plugin table, the command alias table, the shared
/// type registry (the one metadata extraction uses), the host's parameter
/// source, and the hook table. All state is per-runtime: tests build a
/// fresh runtime per case instead of sharing process globals.
///
/// Plugins must be registered before the host starts issuing commands;
/// there is no teardown; a runtime lives as long as its host.
pub struct Runtime {
    plugins: RefCell<IndexMap<String, Rc<Plugin>>>,
    aliases: RefCell<IndexMap<String, String>>,
    types: RefCell<TypeRegistry>,
    source: Rc<dyn ParamSource>,
    hooks: Hooks,
}

impl Runtime {
    /// A runtime with no host parameters.
    pub fn new() -> Self {
        Self::with_source(EmptySource)
    }

    /// A runtime reading parameters from the given source.
    pub fn with_source(source: impl ParamSource + 'static) -> Self {
        Self {
            plugins: RefCell::new(IndexMap::new()),
            aliases: RefCell::new(IndexMap::new()),
            types: RefCell::new(TypeRegistry::with_builtins()),
            source: Rc::new(source),
            hooks: Hooks::new(),
        }
    }

    pub(crate) fn source(&self) -> Rc<dyn ParamSource> {
        Rc::clone(&self.source)
    }

    /// The hook table.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Register an additional type on the shared registry.
    pub fn extend_type(&self, name: impl Into<String>, parser: ParserFn) -> PluginResult<()> {
        Ok(self.types.borrow_mut().register(name, parser)?)
    }

    /// Parse a raw value through the shared type registry.
    pub fn parse<'a>(&self, raw: &Value, spec: impl Into<TypeSpec<'a>>) -> PluginResult<Value> {
        Ok(self.types.borrow().parse(raw, spec)?)
    }

    /// Typed metadata lookup through the shared registry.
    ///
    /// See [`plugboard_core::extract`]: absent metadata is never an error,
    /// and parse failures propagate without default substitution.
    pub fn extract<'a>(
        &self,
        meta: Option<&Metadata>,
        name: &str,
        spec: Option<TypeSpec<'a>>,
        default: Option<Value>,
    ) -> PluginResult<Option<Value>> {
        Ok(extract(meta, &self.types.borrow(), name, spec, default)?)
    }

    pub(crate) fn register(&self, plugin: Rc<Plugin>) -> PluginResult<()> {
        let name = plugin.name().to_string();
        {
            let mut plugins = self.plugins.borrow_mut();
            if plugins.contains_key(&name) {
                return Err(PluginError::DuplicatePlugin { name });
            }
            plugins.insert(name.clone(), plugin);
        }
        debug!(plugin = %name, "registered plugin");
        self.hooks.fire(
            &HookEvent::PluginRegistered { name },
            &mut CommandContext::new(),
        );
        Ok(())
    }

    pub(crate) fn register_alias(&self, alias: &str, target: &str) {
        debug!(alias, target, "registered alias");
        self.aliases
            .borrow_mut()
            .insert(alias.to_string(), target.to_string());
    }

    /// Look up a plugin by its registered name.
    pub fn get(&self, name: &str) -> Option<Rc<Plugin>> {
        self.plugins.borrow().get(name).cloned()
    }

    /// The plugin name an alias routes to, if any.
    pub fn alias_target(&self, alias: &str) -> Option<String> {
        self.aliases.borrow().get(alias).cloned()
    }

    /// Registered plugin names, in registration order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.borrow().keys().cloned().collect()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("plugins", &self.plugin_names())
            .field("aliases", &self.aliases.borrow())
            .finish()
    }
}
