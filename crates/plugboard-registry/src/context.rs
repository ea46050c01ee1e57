//! Host command context.

use indexmap::IndexMap;
use plugboard_core::Value;

/// Context the host passes along with a dispatched command.
///
/// The host's object model stays opaque to the registry: what crosses the
/// boundary is an identity for the invoking object plus a bag of values the
/// host and the handlers exchange.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Identity of the host object that issued the command, if known.
    pub invoker: Option<String>,

    /// Additional data passed between the host and handlers.
    pub data: IndexMap<String, Value>,
}

impl CommandContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the invoker identity.
    pub fn with_invoker(mut self, invoker: impl Into<String>) -> Self {
        self.invoker = Some(invoker.into());
        self
    }

    /// Set a value in the context.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Get a value from the context.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_data() {
        let mut ctx = CommandContext::new().with_invoker("event:12");
        ctx.set("x", 4i64).set("label", "north gate");

        assert_eq!(ctx.invoker.as_deref(), Some("event:12"));
        assert_eq!(ctx.get("x"), Some(&Value::Int(4)));
        assert_eq!(ctx.get("label"), Some(&Value::from("north gate")));
        assert!(ctx.get("missing").is_none());
    }
}
