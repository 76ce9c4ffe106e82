//! Core natives registration.
//!
//! This module provides the function to register all core native libraries
//! with the NativeRegistry.

use crate::runner::plugin::registry::NativeRegistry;

use super::accessors;
use super::digits;
use super::hooks;

/// Register all core native libraries with the registry.
pub fn register_core_natives(registry: &mut NativeRegistry) {
    digits::register(registry);
    accessors::register(registry);
    hooks::register(registry);
}
