//! The plugin type and its construction.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use plugboard_core::{ParserFn, TypeRegistry, TypeSpec, Value};

use crate::context::CommandContext;
use crate::error::{PluginError, PluginResult};
use crate::registry::Runtime;
use crate::source::{ParamBag, ParamSource};
use crate::traits::{HasCommands, HasParameters};

/// A dispatched invocation as seen by a command handler.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// The name the plugin was invoked under: its own name, or an alias.
    pub invoked_as: &'a str,

    /// The command name that selected this handler.
    pub command: &'a str,

    /// Remaining argument tokens.
    pub args: &'a [String],
}

/// A bound command handler.
pub type CommandFn = Rc<dyn Fn(&Plugin, &Invocation<'_>, &mut CommandContext) -> PluginResult<()>>;

/// A singleton unit of functionality with a unique identity.
///
/// A plugin owns its command table (closed at construction), the list of
/// add-on plugin names whose parameter bags merge into its own, a lazily
/// materialized merged bag, an append-only cache of parsed parameter
/// values, and a personal type view seeded with the built-in types.
///
/// Plugins are built, and thereby registered, through [`Plugin::builder`];
/// a runtime never hands out an unregistered plugin.
pub struct Plugin {
    name: String,
    commands: IndexMap<String, CommandFn>,
    source: Rc<dyn ParamSource>,
    add_ons: RefCell<Vec<String>>,
    types: RefCell<TypeRegistry>,
    raw: RefCell<Option<ParamBag>>,
    parsed: RefCell<IndexMap<String, Value>>,
}

impl Plugin {
    /// Start building a plugin with the given identity.
    pub fn builder(name: impl Into<String>) -> PluginBuilder {
        PluginBuilder {
            name: name.into(),
            commands: IndexMap::new(),
        }
    }

    /// The plugin's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the registered add-ons, in registration order.
    pub fn add_ons(&self) -> Vec<String> {
        self.add_ons.borrow().clone()
    }

    /// Register an additional type on this plugin's view.
    ///
    /// The new type is immediately usable through [`Plugin::parse_as`] and
    /// [`Plugin::typed_parameter`]. Fails if the name is already taken on
    /// this plugin.
    pub fn extend_type(&self, name: impl Into<String>, parser: ParserFn) -> PluginResult<()> {
        Ok(self.types.borrow_mut().register(name, parser)?)
    }

    /// Parse a raw value as one of this plugin's types.
    pub fn parse_as(&self, type_name: &str, raw: &Value) -> PluginResult<Value> {
        Ok(self.types.borrow().parse(raw, type_name)?)
    }

    /// Parameter lookup bound to a type name on this plugin's view.
    pub fn typed_parameter(
        &self,
        type_name: &str,
        name: &str,
        default: Option<Value>,
    ) -> PluginResult<Value> {
        self.parameter(name, Some(TypeSpec::Name(type_name)), default)
    }

    /// Raw (untyped) required parameter.
    pub fn param(&self, name: &str) -> PluginResult<Value> {
        self.parameter(name, None, None)
    }

    /// Raw (untyped) parameter with a default.
    pub fn param_or(&self, name: &str, default: impl Into<Value>) -> PluginResult<Value> {
        self.parameter(name, None, Some(default.into()))
    }

    /// Typed required parameter.
    pub fn param_as<'a>(&self, name: &str, spec: impl Into<TypeSpec<'a>>) -> PluginResult<Value> {
        self.parameter(name, Some(spec.into()), None)
    }

    /// Typed parameter with a default.
    pub fn param_as_or<'a>(
        &self,
        name: &str,
        spec: impl Into<TypeSpec<'a>>,
        default: impl Into<Value>,
    ) -> PluginResult<Value> {
        self.parameter(name, Some(spec.into()), Some(default.into()))
    }

    /// Merge another plugin name's parameter bag into this plugin's.
    ///
    /// With `alias` set, commands issued under `name` route to this plugin
    /// as well.
    pub fn register_add_on(
        &self,
        runtime: &Runtime,
        name: impl Into<String>,
        alias: bool,
    ) -> PluginResult<()> {
        let name = name.into();
        // If the merged bag was already read, fold the add-on in now; the
        // lazy path will pick it up from the add-on list otherwise.
        if let Some(bag) = self.raw.borrow_mut().as_mut() {
            if let Some(extra) = self.source.parameters(&name) {
                bag.extend(extra);
            }
        }
        self.add_ons.borrow_mut().push(name.clone());
        if alias {
            runtime.register_alias(&name, &self.name);
        }
        Ok(())
    }

    /// Materialize the merged bag on first access.
    fn ensure_raw(&self) {
        let mut raw = self.raw.borrow_mut();
        if raw.is_none() {
            let mut bag = self.source.parameters(&self.name).unwrap_or_default();
            for add_on in self.add_ons.borrow().iter() {
                if let Some(extra) = self.source.parameters(add_on) {
                    bag.extend(extra);
                }
            }
            *raw = Some(bag);
        }
    }

    fn remember(&self, name: &str, value: Value) -> Value {
        self.parsed.borrow_mut().insert(name.to_string(), value.clone());
        value
    }

    pub(crate) fn new_registered(
        runtime: &Runtime,
        name: String,
        commands: IndexMap<String, CommandFn>,
    ) -> PluginResult<Rc<Self>> {
        if name.is_empty() {
            return Err(PluginError::EmptyName);
        }
        let plugin = Rc::new(Self {
            name,
            commands,
            source: runtime.source(),
            add_ons: RefCell::new(Vec::new()),
            types: RefCell::new(TypeRegistry::with_builtins()),
            raw: RefCell::new(None),
            parsed: RefCell::new(IndexMap::new()),
        });
        runtime.register(Rc::clone(&plugin))?;
        Ok(plugin)
    }
}

impl HasParameters for Plugin {
    fn raw_parameters(&self) -> ParamBag {
        self.ensure_raw();
        self.raw.borrow().clone().unwrap_or_default()
    }

    fn parameter(
        &self,
        name: &str,
        spec: Option<TypeSpec<'_>>,
        default: Option<Value>,
    ) -> PluginResult<Value> {
        if let Some(cached) = self.parsed.borrow().get(name) {
            return Ok(cached.clone());
        }

        self.ensure_raw();
        let raw = self
            .raw
            .borrow()
            .as_ref()
            .and_then(|bag| bag.get(name).cloned());

        let Some(raw) = raw else {
            let Some(default) = default else {
                return Err(PluginError::MissingParameter {
                    plugin: self.name.clone(),
                    name: name.to_string(),
                });
            };
            return Ok(self.remember(name, default));
        };

        let raw = Value::String(raw);
        let Some(spec) = spec else {
            return Ok(self.remember(name, raw));
        };

        match self.types.borrow().parse(&raw, spec) {
            Ok(parsed) => Ok(self.remember(name, parsed)),
            Err(err) => match default {
                Some(default) => {
                    warn!(
                        plugin = %self.name,
                        parameter = name,
                        %err,
                        "parameter failed to parse, using default"
                    );
                    Ok(self.remember(name, default))
                }
                None => Err(err.into()),
            },
        }
    }
}

impl HasCommands for Plugin {
    fn valid_commands(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    fn handle_command(
        &self,
        invoked_as: &str,
        ctx: &mut CommandContext,
        args: &[String],
    ) -> PluginResult<()> {
        let Some((command, rest)) = args.split_first() else {
            return Err(PluginError::UnknownCommand {
                plugin: self.name.clone(),
                command: String::new(),
            });
        };
        let Some(handler) = self.commands.get(command.as_str()) else {
            return Err(PluginError::UnknownCommand {
                plugin: self.name.clone(),
                command: command.clone(),
            });
        };
        debug!(plugin = %self.name, command = %command, invoked_as, "handling command");
        let invocation = Invocation {
            invoked_as,
            command,
            args: rest,
        };
        handler(self, &invocation, ctx)
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("add_ons", &self.add_ons.borrow())
            .finish()
    }
}

/// Builder for a [`Plugin`].
///
/// Command handlers are bound here, before registration, so the command
/// table is closed once the plugin exists.
pub struct PluginBuilder {
    name: String,
    commands: IndexMap<String, CommandFn>,
}

impl PluginBuilder {
    /// Bind a command handler.
    pub fn command<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Plugin, &Invocation<'_>, &mut CommandContext) -> PluginResult<()> + 'static,
    {
        self.commands.insert(name.into(), Rc::new(handler));
        self
    }

    /// Register the plugin with the runtime.
    ///
    /// Fails if the name is empty or already registered; registration-time
    /// failures indicate a configuration defect and are never recovered
    /// internally.
    pub fn build(self, runtime: &Runtime) -> PluginResult<Rc<Plugin>> {
        Plugin::new_registered(runtime, self.name, self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn test_handle_command_requires_a_known_command() {
        let runtime = Runtime::new();
        let plugin = Plugin::builder("Lone")
            .command("ping", |_plugin, _invocation, ctx| {
                ctx.set("pinged", true);
                Ok(())
            })
            .build(&runtime)
            .unwrap();

        let mut ctx = CommandContext::new();
        let err = plugin
            .handle_command("Lone", &mut ctx, &["pong".to_string()])
            .unwrap_err();
        assert!(matches!(err, PluginError::UnknownCommand { command, .. } if command == "pong"));

        let err = plugin.handle_command("Lone", &mut ctx, &[]).unwrap_err();
        assert!(matches!(err, PluginError::UnknownCommand { .. }));

        plugin
            .handle_command("Lone", &mut ctx, &["ping".to_string()])
            .unwrap();
        assert_eq!(ctx.get("pinged"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_command_table_is_closed_at_construction() {
        let runtime = Runtime::new();
        let plugin = Plugin::builder("Fixed")
            .command("a", |_p, _i, _c| Ok(()))
            .command("b", |_p, _i, _c| Ok(()))
            .build(&runtime)
            .unwrap();
        assert_eq!(plugin.valid_commands(), ["a", "b"]);
    }

    #[test]
    fn test_raw_parameters_merge_add_ons() {
        let source = Rc::new(MemorySource::new());
        source.set("Main", "A", "1");
        source.set("Main", "B", "main");
        source.set("Ext", "B", "ext");
        source.set("Ext", "C", "3");

        let runtime = Runtime::with_source(Rc::clone(&source));
        let plugin = Plugin::builder("Main").build(&runtime).unwrap();
        plugin.register_add_on(&runtime, "Ext", false).unwrap();

        let bag = plugin.raw_parameters();
        assert_eq!(bag.get("A").map(String::as_str), Some("1"));
        assert_eq!(bag.get("B").map(String::as_str), Some("ext"));
        assert_eq!(bag.get("C").map(String::as_str), Some("3"));
        assert_eq!(plugin.add_ons(), ["Ext"]);
    }
}
