//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent caller mistakes and broken tree invariants.
/// These are independent of the data source and transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Query violates a precondition of the resolved operation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced node does not exist in the data source.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn node_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "node",
            id: id.to_string(),
        }
    }
}
