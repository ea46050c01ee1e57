//! Command routing.

use crate::context::CommandContext;
use crate::error::{PluginError, PluginResult};
use crate::hooks::HookEvent;
use crate::registry::Runtime;
use crate::traits::HasCommands;

/// Outcome of routing a command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A plugin handled the command.
    Handled,

    /// No plugin or alias matched; the host applies its default handling.
    Unhandled,
}

impl Runtime {
    /// Route a command to the plugin registered under its name.
    ///
    /// Resolution order: exact plugin name, then the alias table, then
    /// [`Dispatch::Unhandled`] so the host's default handling runs exactly
    /// once. A failure inside a handler propagates to the caller, which
    /// decides how to surface it.
    pub fn dispatch(
        &self,
        name: &str,
        ctx: &mut CommandContext,
        args: &[String],
    ) -> PluginResult<Dispatch> {
        let plugin = if let Some(plugin) = self.get(name) {
            plugin
        } else if let Some(target) = self.alias_target(name) {
            self.get(&target).ok_or_else(|| PluginError::Inconsistent {
                message: format!("alias '{name}' points at unregistered plugin '{target}'"),
            })?
        } else {
            return Ok(Dispatch::Unhandled);
        };

        plugin.handle_command(name, ctx, args)?;
        self.hooks().fire(
            &HookEvent::CommandDispatched {
                plugin: plugin.name().to_string(),
                command: args.first().cloned().unwrap_or_default(),
            },
            ctx,
        );
        Ok(Dispatch::Handled)
    }

    /// Like [`Runtime::dispatch`], invoking `fallback` when nothing
    /// matched.
    pub fn dispatch_or<F>(
        &self,
        name: &str,
        ctx: &mut CommandContext,
        args: &[String],
        fallback: F,
    ) -> PluginResult<()>
    where
        F: FnOnce(&str, &mut CommandContext, &[String]),
    {
        match self.dispatch(name, ctx, args)? {
            Dispatch::Handled => Ok(()),
            Dispatch::Unhandled => {
                fallback(name, ctx, args);
                Ok(())
            }
        }
    }
}
