//! Host-supplied parameter sources.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

/// Raw string configuration for one plugin.
pub type ParamBag = IndexMap<String, String>;

/// Read-only provider of per-plugin parameter bags.
///
/// The host owns plugin configuration; the registry only reads it. A plugin
/// materializes its merged bag lazily on first access and never re-reads,
/// so later changes to a source are invisible to an already-read plugin.
pub trait ParamSource {
    /// The declared parameters for the named plugin, if any.
    fn parameters(&self, plugin: &str) -> Option<ParamBag>;
}

impl<S: ParamSource + ?Sized> ParamSource for Rc<S> {
    fn parameters(&self, plugin: &str) -> Option<ParamBag> {
        (**self).parameters(plugin)
    }
}

/// A source with no parameters at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl ParamSource for EmptySource {
    fn parameters(&self, _plugin: &str) -> Option<ParamBag> {
        None
    }
}

/// A mutable in-memory parameter source.
#[derive(Debug, Default)]
pub struct MemorySource {
    bags: RefCell<HashMap<String, ParamBag>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one parameter for a plugin.
    pub fn set(&self, plugin: &str, name: &str, value: &str) {
        self.bags
            .borrow_mut()
            .entry(plugin.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
    }

    /// Replace a plugin's whole bag.
    pub fn set_bag(&self, plugin: &str, bag: ParamBag) {
        self.bags.borrow_mut().insert(plugin.to_string(), bag);
    }
}

impl ParamSource for MemorySource {
    fn parameters(&self, plugin: &str) -> Option<ParamBag> {
        self.bags.borrow().get(plugin).cloned()
    }
}
