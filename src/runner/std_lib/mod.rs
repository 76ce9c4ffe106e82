//! Core native libraries.
//!
//! The natives the descriptor demonstrations are written against: a one-digit
//! validator, a verbose read-only getter, a slow computation for lazy attributes and a
//! set of interception and fallback hooks.

pub mod accessors;
pub mod core;
pub mod digits;
pub mod hooks;

pub use self::core::register_core_natives;
