use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttrErrorType {
    #[error("class '{0}' is already registered")]
    DuplicateClass(String),
    #[error("cannot create a consistent method resolution order for class '{0}'")]
    InconsistentHierarchy(String),
    #[error("class '{0}' is not registered")]
    UnknownClass(String),
    #[error("class limit of {0} reached")]
    ClassLimitReached(usize),
    #[error("object has no attribute '{0}'")]
    NotFound(String),
    #[error("attribute '{0}' is read-only")]
    ImmutableAttribute(String),
    #[error("invalid value for '{name}': {reason}")]
    Validation { name: String, reason: String },
    #[error("class '{class}' is not in the hierarchy of '{instance_class}'")]
    UnrelatedClass {
        class: String,
        instance_class: String,
    },
}

impl AttrErrorType {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AttrErrorType::NotFound(_))
    }
}
