//! Registry of behavior constructors by name.
//!
//! Snapshots can only store text, so a [`NativeScript`] binding is written as
//! its name and looked up here when the snapshot is loaded again. Bindings
//! added through a scene entity are registered automatically.

use log::debug;
use rustc_hash::FxHashMap;

use crate::components::nativescript::{Behavior, NativeScript, ScriptConstructor};

#[derive(Clone, Debug, Default)]
pub struct ScriptRegistry {
    constructors: FxHashMap<String, ScriptConstructor>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `std::any::type_name::<T>()`, the same name
    /// [`NativeScript::bind`] uses.
    pub fn register<T: Behavior + Default>(&mut self) {
        let script = NativeScript::bind::<T>();
        self.register_named(script.name(), script.constructor());
    }

    pub fn register_named(&mut self, name: impl Into<String>, constructor: ScriptConstructor) {
        let name = name.into();
        if self.constructors.insert(name.clone(), constructor).is_none() {
            debug!("Registered native script '{}'", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build an uninstantiated binding for a registered name.
    pub fn resolve(&self, name: &str) -> Option<NativeScript> {
        self.constructors
            .get(name)
            .map(|constructor| NativeScript::from_constructor(name, *constructor))
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
