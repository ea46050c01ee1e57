//! Core primitives for the plugboard plugin framework.
//!
//! This crate provides the pieces that do not depend on any registry:
//! the dynamic [`Value`] model, the [`TypeRegistry`] mapping type names to
//! parser functions (seeded with the built-in types), and [`Metadata`]
//! extraction from note-style `<Key: value>` annotations.

mod error;
mod meta;
mod types;
mod value;

pub use error::{ParseError, TypeError, TypeResult};
pub use meta::{Metadata, ScriptEntry, extract, intro_comments};
pub use types::{BuiltinType, ParserFn, TypeRegistry, TypeSpec};
pub use value::Value;
