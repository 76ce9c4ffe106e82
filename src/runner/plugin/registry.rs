//! Native registry: the names class declarations use to reach Rust functions.

use std::collections::HashMap;

use tracing::debug;

use super::types::{LibraryInfo, Native, NativeKind, NativeLibrary};
use crate::runner::ds::hooks::{FallbackFn, InterceptFn};
use crate::runner::ds::slot::{ComputeFn, DeleterFn, GetterFn, SetterFn, ValidatorFn};
use crate::runner::std_lib::register_core_natives;

/// Registry of native functions.
/// Later registrations of an existing name replace it; replacements are tracked.
pub struct NativeRegistry {
    natives: HashMap<String, Native>,

    libraries: Vec<LibraryInfo>,

    /// Native name -> libraries that replaced it, in order.
    overrides: HashMap<String, Vec<String>>,
}

impl NativeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        NativeRegistry {
            natives: HashMap::new(),
            libraries: Vec::new(),
            overrides: HashMap::new(),
        }
    }

    /// Create a registry with the core natives (validators, demo accessors, demo hooks).
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        register_core_natives(&mut registry);
        registry
    }

    pub fn register_library(&mut self, library: NativeLibrary) {
        let info = LibraryInfo {
            name: library.name.clone(),
            provides: library.provides(),
        };
        for (name, native) in library.natives {
            if self.natives.insert(name.clone(), native).is_some() {
                self.overrides
                    .entry(name)
                    .or_insert_with(Vec::new)
                    .push(library.name.clone());
            }
        }
        debug!(library = %info.name, natives = info.provides.len(), "registered native library");
        self.libraries.push(info);
    }

    pub fn get(&self, name: &str) -> Option<&Native> {
        self.natives.get(name)
    }

    pub fn has_native(&self, name: &str) -> bool {
        self.natives.contains_key(name)
    }

    /// Kind of the native registered under `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<NativeKind> {
        self.natives.get(name).map(Native::kind)
    }

    pub fn getter(&self, name: &str) -> Option<GetterFn> {
        match self.natives.get(name) {
            Some(Native::Getter(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn setter(&self, name: &str) -> Option<SetterFn> {
        match self.natives.get(name) {
            Some(Native::Setter(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn deleter(&self, name: &str) -> Option<DeleterFn> {
        match self.natives.get(name) {
            Some(Native::Deleter(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn validator(&self, name: &str) -> Option<ValidatorFn> {
        match self.natives.get(name) {
            Some(Native::Validator(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn compute(&self, name: &str) -> Option<ComputeFn> {
        match self.natives.get(name) {
            Some(Native::Compute(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn intercept(&self, name: &str) -> Option<InterceptFn> {
        match self.natives.get(name) {
            Some(Native::Intercept(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn fallback(&self, name: &str) -> Option<FallbackFn> {
        match self.natives.get(name) {
            Some(Native::Fallback(f)) => Some(f.clone()),
            _ => None,
        }
    }

    /// Libraries that replaced `name` after it was first registered.
    pub fn overrides_of(&self, name: &str) -> &[String] {
        self.overrides
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All native names, sorted.
    pub fn native_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.natives.keys().map(|n| n.as_str()).collect();
        names.sort();
        names
    }

    pub fn loaded_libraries(&self) -> &[LibraryInfo] {
        &self.libraries
    }
}

impl Default for NativeRegistry {
    fn default() -> Self {
        Self::with_core()
    }
}
