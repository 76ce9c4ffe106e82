//! # attr-resolve - Attribute Resolution Engine
//!
//! A class/attribute model with descriptor-based attribute resolution:
//! - Classes with multiple inheritance and a precomputed method resolution order (MRO)
//! - Data descriptors, non-data descriptors and plain class values
//! - Per-instance storage, lazily materialized attributes
//! - Interception and fallback hooks
//! - Private-name mangling and next-in-chain (cooperative) lookups
//! - A small declaration language with a PEG parser, interpreter and CLI
//!
//! ## Quick Start
//!
//! ### Registering classes from Rust
//!
//! ```
//! use std::rc::Rc;
//! use attr_resolve::runner::ds::error::AttrErrorType;
//! use attr_resolve::runner::ds::instance::Instance;
//! use attr_resolve::runner::ds::slot::SlotDecl;
//! use attr_resolve::runner::ds::value::Value;
//! use attr_resolve::runner::engine::ResolutionEngine;
//!
//! let mut engine = ResolutionEngine::new();
//! let base = engine
//!     .register_class(
//!         "Base",
//!         &[],
//!         vec![SlotDecl::non_data(
//!             "greeting",
//!             Rc::new(|_: &mut Instance| -> Result<Value, AttrErrorType> {
//!                 Ok(Value::str("hello"))
//!             }),
//!         )],
//!     )
//!     .unwrap();
//! let child = engine.register_class("Child", &[base], vec![]).unwrap();
//!
//! let mut instance = engine.create_instance(child).unwrap();
//! assert_eq!(engine.get(&mut instance, "greeting"), Ok(Value::str("hello")));
//!
//! // Instance storage shadows a non-data descriptor.
//! engine.set(&mut instance, "greeting", Value::str("hi")).unwrap();
//! assert_eq!(engine.get(&mut instance, "greeting"), Ok(Value::str("hi")));
//! ```
//!
//! ### Running a declaration script
//!
//! ```
//! use attr_resolve::runner::eval::Interpreter;
//!
//! let mut interpreter = Interpreter::new();
//! interpreter
//!     .run_source(
//!         "class NumericalC { number = field(check: one_digit, default: 0, store: _number); }
//!          let c = new NumericalC;
//!          c.number = 4;
//!          try c.number = 15;
//!          print c.number;",
//!     )
//!     .unwrap();
//! assert_eq!(
//!     interpreter.output(),
//!     &["error: invalid value for 'number': 15 is not a single digit", "4"]
//! );
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG parser and AST for the declaration language
//! - **[`runner`]** - The object model and everything that runs on it
//!   - **[`runner::ds`]** - Data structures (values, slots, classes, instances, hooks)
//!   - **[`runner::engine`]** - Get/set/delete resolution
//!   - **[`runner::next_in_chain`]** - Cooperative lookups after a given class
//!   - **[`runner::plugin`]** - Native function libraries referenced by declarations
//!   - **[`runner::std_lib`]** - Core natives (validators, demo accessors and hooks)
//!   - **[`runner::eval`]** - Lowering and script interpreter

#[macro_use]
extern crate lazy_static;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod parser;
pub mod runner;

static INIT: Once = Once::new();

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and only ever installs once.
pub fn init_tracing() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
