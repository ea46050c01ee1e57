//! Metadata extraction from note-style annotations.
//!
//! Hosts attach free-text "notes" to their data objects. Tags embedded in a
//! note use the `<Key: value>` grammar (`<Key>` alone records a boolean
//! flag). [`Metadata`] is the flat tag map derived from such a note, with
//! typed lookup through a [`TypeRegistry`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TypeResult;
use crate::types::{TypeRegistry, TypeSpec};
use crate::value::Value;

/// A flat mapping of tag name to raw string value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    tags: IndexMap<String, String>,
}

impl Metadata {
    /// Create an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive metadata from a free-text note.
    ///
    /// Tags use `<Key: value>`; a bare `<Key>` records the flag value
    /// `"true"`. Keys and values are trimmed, text outside tags is ignored,
    /// and a later occurrence of a tag overwrites an earlier one.
    pub fn parse_note(note: &str) -> Self {
        let mut tags = IndexMap::new();
        let mut rest = note;
        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else { break };
            let body = &after[..end];
            let (key, value) = match body.split_once(':') {
                Some((key, value)) => (key, Some(value)),
                None => (body, None),
            };
            let key = key.trim();
            if key.is_empty() || key.contains('<') {
                // Not a tag opener; rescan from the next character.
                rest = after;
                continue;
            }
            let value = value.map_or_else(|| "true".to_string(), |v| v.trim().to_string());
            tags.insert(key.to_string(), value);
            rest = &after[end + 1..];
        }
        Self { tags }
    }

    /// Derive metadata from a note plus a page's leading comments.
    ///
    /// Tags found in the intro comments take precedence over tags from the
    /// permanent note.
    pub fn from_page(note: &str, entries: &[ScriptEntry]) -> Self {
        let mut meta = Self::parse_note(note);
        if let Some(intro) = intro_comments(entries) {
            meta.merge(&Self::parse_note(&intro));
        }
        meta
    }

    /// Whether no tags are present.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Raw value of a tag, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// Whether a tag is present.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Set a tag's raw value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    /// Overlay another metadata map onto this one; the other map wins.
    pub fn merge(&mut self, other: &Metadata) {
        for (name, value) in &other.tags {
            self.tags.insert(name.clone(), value.clone());
        }
    }

    /// All tags in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Typed lookup of a tag.
    ///
    /// A missing tag yields `default` (which may itself be `None`). A
    /// present tag without a type yields the raw string. A present tag with
    /// a type is parsed through the given registry (the shared one, not a
    /// plugin's view), and a parse failure propagates: unlike plugin
    /// parameters, defaults apply only on absence, never on a failed parse.
    pub fn extract<'a>(
        &self,
        types: &TypeRegistry,
        name: &str,
        spec: Option<TypeSpec<'a>>,
        default: Option<Value>,
    ) -> TypeResult<Option<Value>> {
        let Some(raw) = self.get(name) else {
            return Ok(default);
        };
        let raw = Value::String(raw.to_string());
        match spec {
            Some(spec) => Ok(Some(types.parse(&raw, spec)?)),
            None => Ok(Some(raw)),
        }
    }
}

/// Typed lookup on possibly-absent metadata.
///
/// Absent metadata is "no data available", never an error: the result is
/// unset regardless of the other arguments, default included.
pub fn extract<'a>(
    meta: Option<&Metadata>,
    types: &TypeRegistry,
    name: &str,
    spec: Option<TypeSpec<'a>>,
    default: Option<Value>,
) -> TypeResult<Option<Value>> {
    match meta {
        Some(meta) => meta.extract(types, name, spec, default),
        None => Ok(None),
    }
}

/// One entry of a host script listing, as far as metadata is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptEntry {
    /// A comment line.
    Comment(String),
    /// Anything else; terminates the leading comment run.
    Other,
}

/// Concatenate the leading run of comment lines from a script listing.
///
/// Collection stops at the first non-comment entry. Returns `None` when the
/// listing does not start with a comment.
pub fn intro_comments(entries: &[ScriptEntry]) -> Option<String> {
    let mut lines = Vec::new();
    for entry in entries {
        match entry {
            ScriptEntry::Comment(text) => lines.push(text.as_str()),
            ScriptEntry::Other => break,
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
