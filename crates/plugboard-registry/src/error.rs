//! Error types for the plugin registry.

use plugboard_core::{ParseError, TypeError};
use thiserror::Error;

/// Result type for registry operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur in the plugin registry.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugins must be constructed with a non-empty name.
    #[error("plugin name must not be empty")]
    EmptyName,

    /// A plugin is already registered under the name.
    #[error("duplicate plugin: {name}")]
    DuplicatePlugin { name: String },

    /// A parameter without a default was absent from the merged bag.
    #[error("plugin '{plugin}' requires parameter '{name}'")]
    MissingParameter { plugin: String, name: String },

    /// A dispatched command is not in the plugin's command table.
    #[error("plugin '{plugin}' has no command '{command}'")]
    UnknownCommand { plugin: String, command: String },

    /// A registry invariant was violated.
    #[error("registry inconsistency: {message}")]
    Inconsistent { message: String },

    /// A command handler failed.
    #[error("plugin '{plugin}' command '{command}' failed: {message}")]
    Execution {
        plugin: String,
        command: String,
        message: String,
    },

    /// The plugin manifest could not be parsed.
    #[error("invalid plugin manifest: {message}")]
    Manifest { message: String },

    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Type registration or parsing error.
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl PluginError {
    /// Create a handler execution error.
    pub fn execution(
        plugin: impl Into<String>,
        command: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Execution {
            plugin: plugin.into(),
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<ParseError> for PluginError {
    fn from(err: ParseError) -> Self {
        Self::Type(TypeError::Parse(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts_through_type_error() {
        let err: PluginError = ParseError::new("Int", "abc", "not a number").into();
        assert!(matches!(err, PluginError::Type(TypeError::Parse(_))));
    }

    #[test]
    fn test_execution_helper() {
        let err = PluginError::execution("Shadows", "refresh", "boom");
        assert_eq!(
            err.to_string(),
            "plugin 'Shadows' command 'refresh' failed: boom"
        );
    }
}
