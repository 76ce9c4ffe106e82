//! Demonstration interception and fallback hooks.
//!
//! `intercept_dd_nd` answers reads of `dd` and `nd` itself and refuses every other read;
//! writes and deletes go through the generic algorithm. `reject_reads` refuses every read,
//! leaving the fallback hook to answer. `fallback_dd_nd` answers any name.

use std::collections::HashMap;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::hooks::{Access, HookOutcome};
use crate::runner::ds::instance::Instance;
use crate::runner::ds::value::Value;
use crate::runner::engine::ResolutionEngine;
use crate::runner::plugin::registry::NativeRegistry;
use crate::runner::plugin::types::NativeLibrary;

lazy_static! {
    static ref INTERCEPTED: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("dd", "intercepted dd");
        m.insert("nd", "intercepted nd");
        m
    };
    static ref FALLBACK_ANSWERS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("dd", "__getattr__ on dd");
        m.insert("nd", "__getattr__ on nd");
        m
    };
}

/// Register the demonstration hooks with the registry.
pub fn register(registry: &mut NativeRegistry) {
    let hooks = NativeLibrary::new("hooks")
        .add_intercept("intercept_dd_nd", intercept_dd_nd)
        .add_intercept("reject_reads", reject_reads)
        .add_fallback("fallback_dd_nd", fallback_dd_nd);

    registry.register_library(hooks);
}

/// Writes and deletes take the generic path.
fn pass_through(
    engine: &ResolutionEngine,
    instance: &mut Instance,
    name: &str,
    access: Access,
) -> Result<HookOutcome, AttrErrorType> {
    match access {
        Access::Get => engine.raw_get(instance, name).map(HookOutcome::Handled),
        Access::Set(value) => {
            engine.raw_set(instance, name, value)?;
            Ok(HookOutcome::Handled(Value::None))
        }
        Access::Delete => {
            engine.raw_delete(instance, name)?;
            Ok(HookOutcome::Handled(Value::None))
        }
    }
}

pub fn intercept_dd_nd(
    engine: &ResolutionEngine,
    instance: &mut Instance,
    name: &str,
    access: Access,
) -> Result<HookOutcome, AttrErrorType> {
    match access {
        Access::Get => match INTERCEPTED.get(name) {
            Some(answer) => Ok(HookOutcome::Handled(Value::str(*answer))),
            None => Err(AttrErrorType::NotFound(name.to_string())),
        },
        other => pass_through(engine, instance, name, other),
    }
}

pub fn reject_reads(
    engine: &ResolutionEngine,
    instance: &mut Instance,
    name: &str,
    access: Access,
) -> Result<HookOutcome, AttrErrorType> {
    match access {
        Access::Get => Err(AttrErrorType::NotFound(name.to_string())),
        other => pass_through(engine, instance, name, other),
    }
}

pub fn fallback_dd_nd(
    _engine: &ResolutionEngine,
    _instance: &mut Instance,
    name: &str,
) -> Result<HookOutcome, AttrErrorType> {
    Ok(HookOutcome::Handled(match FALLBACK_ANSWERS.get(name) {
        Some(answer) => Value::str(*answer),
        None => Value::Str(format!("attribute {} does not exist", name)),
    }))
}
