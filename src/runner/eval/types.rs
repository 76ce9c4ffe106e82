//! Core types for the evaluation layer.

use pest::error::Error;
use thiserror::Error;

use crate::parser::Rule;
use crate::runner::ds::error::AttrErrorType;
use crate::runner::plugin::types::NativeKind;

/// Anything that can stop a script.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("{0}")]
    Parse(#[from] Error<Rule>),

    #[error("no {kind} named '{name}'")]
    UnknownNative { kind: NativeKind, name: String },

    #[error("invalid declaration of '{class}.{slot}': {reason}")]
    InvalidDeclaration {
        class: String,
        slot: String,
        reason: String,
    },

    #[error("variable '{0}' is not defined")]
    UnknownVariable(String),

    #[error(transparent)]
    Attr(#[from] AttrErrorType),
}

impl EvalError {
    /// The attribute error behind this failure, if it is one.
    pub fn as_attr_error(&self) -> Option<&AttrErrorType> {
        match self {
            EvalError::Attr(error) => Some(error),
            _ => None,
        }
    }
}
