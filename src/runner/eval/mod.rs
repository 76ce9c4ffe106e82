//! Evaluation of declaration scripts.
//!
//! Class declarations are lowered into engine registrations ([`lower`]); statements are
//! executed against the engine by the [`Interpreter`].

pub mod interpreter;
pub mod lower;
pub mod types;

pub use interpreter::Interpreter;
pub use types::EvalError;
