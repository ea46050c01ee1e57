//! Annotation-driven plugin registry.
//!
//! A [`Runtime`] is the single context object a host constructs at startup:
//! it owns the plugin table, the command alias table, the shared type
//! registry, and the host [hook points](Hooks). Plugins are built with
//! [`Plugin::builder`], which binds command handlers at construction and
//! registers the result under a unique name.
//!
//! # Example
//!
//! ```
//! use plugboard_registry::{CommandContext, MemorySource, Plugin, Runtime};
//! use plugboard_core::Value;
//!
//! let source = MemorySource::new();
//! source.set("Shadows", "Opacity", "0.5");
//! let runtime = Runtime::with_source(source);
//!
//! let shadows = Plugin::builder("Shadows")
//!     .command("refresh", |plugin, _invocation, ctx| {
//!         let opacity = plugin.param_as("Opacity", "Float")?;
//!         ctx.set("opacity", opacity);
//!         Ok(())
//!     })
//!     .build(&runtime)
//!     .unwrap();
//!
//! let mut ctx = CommandContext::new();
//! runtime
//!     .dispatch("Shadows", &mut ctx, &["refresh".to_string()])
//!     .unwrap();
//! assert_eq!(ctx.get("opacity"), Some(&Value::Float(0.5)));
//! assert_eq!(shadows.name(), "Shadows");
//! ```

mod context;
mod dispatch;
mod error;
mod hooks;
mod manifest;
mod plugin;
mod registry;
mod source;
mod traits;

pub use context::CommandContext;
pub use dispatch::Dispatch;
pub use error::{PluginError, PluginResult};
pub use hooks::{HookEvent, HookFn, Hooks};
pub use manifest::{Manifest, ManifestEntry};
pub use plugin::{CommandFn, Invocation, Plugin, PluginBuilder};
pub use registry::Runtime;
pub use source::{EmptySource, MemorySource, ParamBag, ParamSource};
pub use traits::{HasCommands, HasParameters};
