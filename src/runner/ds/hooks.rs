//! Class-level interception hooks.
//!
//! `intercept` replaces the whole resolution chain for every get, set and delete on
//! instances of the class (and its subclasses). `fallback` runs only when a get found
//! nothing. Hooks receive the engine so they can delegate to the generic algorithm through
//! [`ResolutionEngine::raw_get`] and friends.

use std::fmt;
use std::rc::Rc;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::instance::Instance;
use crate::runner::ds::value::Value;
use crate::runner::engine::ResolutionEngine;

/// The operation being intercepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Get,
    Set(Value),
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// The hook produced the result. For set and delete the value is ignored.
    Handled(Value),
    /// Resolution continues with the fallback hook, if any.
    NotHandled,
}

pub type InterceptFn = Rc<
    dyn Fn(&ResolutionEngine, &mut Instance, &str, Access) -> Result<HookOutcome, AttrErrorType>,
>;

pub type FallbackFn =
    Rc<dyn Fn(&ResolutionEngine, &mut Instance, &str) -> Result<HookOutcome, AttrErrorType>>;

#[derive(Clone, Default)]
pub struct InterceptionHooks {
    pub intercept: Option<InterceptFn>,
    pub fallback: Option<FallbackFn>,
}

impl InterceptionHooks {
    pub fn new() -> Self {
        InterceptionHooks {
            intercept: None,
            fallback: None,
        }
    }

    pub fn with_intercept(mut self, intercept: InterceptFn) -> Self {
        self.intercept = Some(intercept);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackFn) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.intercept.is_none() && self.fallback.is_none()
    }
}

impl fmt::Debug for InterceptionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionHooks")
            .field("intercept", &self.intercept.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
