//! Capability traits composed by the plugin type.
//!
//! The plugin surface is split into narrow capabilities so hosts can depend
//! on just the piece they drive: configuration readers take
//! [`HasParameters`], the dispatcher takes [`HasCommands`].

use plugboard_core::{TypeSpec, Value};

use crate::context::CommandContext;
use crate::error::PluginResult;
use crate::source::ParamBag;

/// Access to typed, cached plugin parameters.
pub trait HasParameters {
    /// The merged raw parameter bag: the plugin's own bag overlaid with the
    /// bags of its registered add-ons.
    fn raw_parameters(&self) -> ParamBag;

    /// Typed parameter lookup.
    ///
    /// The first successful lookup of a name is cached for the plugin's
    /// lifetime and wins every later call, whatever type is then requested;
    /// a parameter is assumed to have exactly one type. An absent parameter
    /// without a default fails; a failed parse falls back to the default
    /// when one is supplied (logged as a warning) and fails otherwise.
    fn parameter(
        &self,
        name: &str,
        spec: Option<TypeSpec<'_>>,
        default: Option<Value>,
    ) -> PluginResult<Value>;
}

/// Command surface of a plugin.
pub trait HasCommands {
    /// Command names this plugin answers to.
    fn valid_commands(&self) -> Vec<String>;

    /// Route a dispatched invocation to the matching command handler.
    ///
    /// `invoked_as` is the identity token the plugin was reached under:
    /// its own name, or an alias. The first argument token selects the
    /// command; the rest become the handler's arguments.
    fn handle_command(
        &self,
        invoked_as: &str,
        ctx: &mut CommandContext,
        args: &[String],
    ) -> PluginResult<()>;
}
