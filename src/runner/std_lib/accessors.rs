//! Demonstration accessors and compute functions.

use tracing::info;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::instance::Instance;
use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::NativeRegistry;
use crate::runner::plugin::types::NativeLibrary;

/// Register the demonstration accessors with the registry.
pub fn register(registry: &mut NativeRegistry) {
    let accessors = NativeLibrary::new("accessors")
        .add_getter("verbose_eighty", verbose_eighty)
        .add_getter("non_data_greeting", non_data_greeting)
        .add_getter("instance_id", instance_id)
        .add_compute("slow_greeting", slow_greeting);

    registry.register_library(accessors);
}

/// Announces every read and always answers 80.
pub fn verbose_eighty(instance: &mut Instance) -> Result<Value, AttrErrorType> {
    info!(instance = %instance.id(), "getting attribute");
    Ok(Value::Integer(80))
}

pub fn non_data_greeting(_instance: &mut Instance) -> Result<Value, AttrErrorType> {
    Ok(Value::str("getting from non-data desc"))
}

pub fn instance_id(instance: &mut Instance) -> Result<Value, AttrErrorType> {
    Ok(Value::Str(instance.id().to_hyphenated().to_string()))
}

/// Stand-in for an expensive computation; meant to back a lazy attribute.
pub fn slow_greeting(instance: &Instance) -> Result<Value, AttrErrorType> {
    info!(instance = %instance.id(), "running slow computation");
    Ok(Value::str("Urgh!!"))
}
