//! Native function libraries.
//!
//! Class declarations written in the declaration language cannot contain Rust code, so
//! every accessor, validator, lazy computation and hook they use is referenced by name.
//! Names are resolved against a [`NativeRegistry`] when the declaration is lowered into
//! an engine registration:
//!
//! ```text
//! class NumericalC { number = field(check: one_digit, default: 0); }
//!                                         ^^^^^^^^^
//!                                         NativeRegistry::validator("one_digit")
//! ```
//!
//! Natives come in groups ([`NativeLibrary`]). The core libraries from `std_lib` are
//! installed by [`NativeRegistry::with_core`]; embedders add their own with
//! [`NativeRegistry::register_library`]. A later library may replace a name registered
//! by an earlier one.
//!
//! ## Example: Custom Library
//!
//! ```
//! use attr_resolve::runner::ds::value::Value;
//! use attr_resolve::runner::plugin::{NativeLibrary, NativeRegistry};
//!
//! let mut registry = NativeRegistry::with_core();
//! registry.register_library(
//!     NativeLibrary::new("colors")
//!         .add_validator("primary", |value: &Value| match value.as_str() {
//!             Some("red") | Some("green") | Some("blue") => Ok(()),
//!             _ => Err(format!("{} is not a primary color", value)),
//!         }),
//! );
//! assert!(registry.validator("primary").is_some());
//! ```

pub mod registry;
pub mod types;

pub use registry::NativeRegistry;
pub use types::{LibraryInfo, Native, NativeKind, NativeLibrary};
