//! Core types for native function libraries.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::hooks::{Access, FallbackFn, HookOutcome, InterceptFn};
use crate::runner::ds::instance::Instance;
use crate::runner::ds::slot::{ComputeFn, DeleterFn, GetterFn, SetterFn, ValidatorFn};
use crate::runner::ds::value::Value;
use crate::runner::engine::ResolutionEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Getter,
    Setter,
    Deleter,
    Validator,
    Compute,
    Intercept,
    Fallback,
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeKind::Getter => "getter",
            NativeKind::Setter => "setter",
            NativeKind::Deleter => "deleter",
            NativeKind::Validator => "validator",
            NativeKind::Compute => "compute function",
            NativeKind::Intercept => "intercept hook",
            NativeKind::Fallback => "fallback hook",
        };
        write!(f, "{}", name)
    }
}

/// A Rust function that class declarations can refer to by name.
#[derive(Clone)]
pub enum Native {
    Getter(GetterFn),
    Setter(SetterFn),
    Deleter(DeleterFn),
    Validator(ValidatorFn),
    Compute(ComputeFn),
    Intercept(InterceptFn),
    Fallback(FallbackFn),
}

impl Native {
    pub fn kind(&self) -> NativeKind {
        match self {
            Native::Getter(_) => NativeKind::Getter,
            Native::Setter(_) => NativeKind::Setter,
            Native::Deleter(_) => NativeKind::Deleter,
            Native::Validator(_) => NativeKind::Validator,
            Native::Compute(_) => NativeKind::Compute,
            Native::Intercept(_) => NativeKind::Intercept,
            Native::Fallback(_) => NativeKind::Fallback,
        }
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Native({})", self.kind())
    }
}

/// A named group of natives, registered as a unit.
pub struct NativeLibrary {
    /// Name of the library (e.g., "digits", "hooks").
    pub name: String,

    pub natives: HashMap<String, Native>,
}

impl NativeLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        NativeLibrary {
            name: name.into(),
            natives: HashMap::new(),
        }
    }

    pub fn add_getter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<Value, AttrErrorType> + 'static,
    {
        self.natives.insert(name.into(), Native::Getter(Rc::new(f)));
        self
    }

    pub fn add_setter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Instance, Value) -> Result<(), AttrErrorType> + 'static,
    {
        self.natives.insert(name.into(), Native::Setter(Rc::new(f)));
        self
    }

    pub fn add_deleter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), AttrErrorType> + 'static,
    {
        self.natives.insert(name.into(), Native::Deleter(Rc::new(f)));
        self
    }

    pub fn add_validator<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + 'static,
    {
        self.natives.insert(name.into(), Native::Validator(Rc::new(f)));
        self
    }

    pub fn add_compute<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, AttrErrorType> + 'static,
    {
        self.natives.insert(name.into(), Native::Compute(Rc::new(f)));
        self
    }

    pub fn add_intercept<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ResolutionEngine, &mut Instance, &str, Access) -> Result<HookOutcome, AttrErrorType>
            + 'static,
    {
        self.natives.insert(name.into(), Native::Intercept(Rc::new(f)));
        self
    }

    pub fn add_fallback<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ResolutionEngine, &mut Instance, &str) -> Result<HookOutcome, AttrErrorType>
            + 'static,
    {
        self.natives.insert(name.into(), Native::Fallback(Rc::new(f)));
        self
    }

    /// Names this library provides, sorted.
    pub fn provides(&self) -> Vec<String> {
        let mut names: Vec<String> = self.natives.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Library metadata kept by the registry after loading.
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub provides: Vec<String>,
}
