use std::fmt;

use thiserror::Error;

/// The kind of mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            WriteOperation::Create => "create",
            WriteOperation::Update => "update",
            WriteOperation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Outcome of a failed catalog service operation.
///
/// Callers branch on the variant; none of them is retried by the services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested ID has no matching row.
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: i64 },

    /// Reading from the cache or the store failed for a reason other than absence.
    #[error("Failed to get {entity_type}{}: {cause}", describe_target(.id))]
    RetrievalFailure {
        entity_type: &'static str,
        id: Option<i64>,
        cause: String,
    },

    /// A store mutation, or the cache invalidation following it, failed.
    #[error("Failed to {operation} {entity_type}{}: {cause}", describe_target(.id))]
    WriteFailure {
        entity_type: &'static str,
        operation: WriteOperation,
        id: Option<i64>,
        cause: String,
    },
}

impl CatalogError {
    /// Returns the entity family the failure refers to.
    pub fn entity_type(&self) -> &'static str {
        match self {
            CatalogError::NotFound { entity_type, .. }
            | CatalogError::RetrievalFailure { entity_type, .. }
            | CatalogError::WriteFailure { entity_type, .. } => entity_type,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

fn describe_target(id: &Option<i64>) -> String {
    match id {
        Some(id) => format!(" {id}"),
        None => " collection".to_string(),
    }
}

/// Result type for catalog service operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
