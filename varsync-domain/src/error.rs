//! Error module for the VarSync domain layer.

use thiserror::Error;
use varsync_core::CoreError;

use crate::model::{CollectionId, ModeId, VariableId, VariableType};

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Structural problems with a token path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("Token path is empty")]
    EmptyPath,

    #[error("Token path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("Token path '{path}' must not start or end with a separator")]
    DanglingSeparator { path: String },
}

/// Failures reported by a [`crate::store::VariableStore`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Collection '{id}' not found")]
    CollectionNotFound { id: CollectionId },

    #[error("Mode '{mode_id}' not found in collection '{collection_id}'")]
    ModeNotFound { collection_id: CollectionId, mode_id: ModeId },

    #[error("Variable '{id}' not found")]
    VariableNotFound { id: VariableId },

    #[error("Collection '{collection}' already has the maximum of {limit} modes")]
    ModeLimitReached { collection: String, limit: usize },

    #[error("A variable named '{name}' already exists in collection '{collection}'")]
    DuplicateName { collection: String, name: String },

    #[error("Variable '{variable}' holds {expected} values, got {actual}")]
    TypeMismatch {
        variable: VariableId,
        expected: VariableType,
        actual: VariableType,
    },

    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Why an alias chain could not be resolved to a literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Alias chain starting at '{start}' exceeds the maximum depth of {max_depth}")]
    DepthExceeded { start: VariableId, max_depth: u8 },

    #[error("Alias cycle detected: {}", format_path(.path))]
    CycleDetected { path: Vec<VariableId> },

    #[error("Variable '{id}' not found")]
    VariableNotFound { id: VariableId },

    #[error("Collection '{id}' not found")]
    CollectionNotFound { id: CollectionId },

    #[error("Variable '{variable}' has no value for mode '{mode}'")]
    MissingValue { variable: VariableId, mode: ModeId },

    #[error("Variable '{variable}' is declared {expected} but holds a {actual} literal")]
    TypeMismatch {
        variable: VariableId,
        expected: VariableType,
        actual: VariableType,
    },
}

fn format_path(path: &[VariableId]) -> String {
    path.iter().map(VariableId::as_str).collect::<Vec<_>>().join(" -> ")
}

/// Per-token failures inside a synchronization pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("Invalid token name: {0}")]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Token '{token}' mode '{mode}': {reason}")]
    InvalidLiteral { token: String, mode: String, reason: String },

    #[error("Token '{token}' already exists as {existing}, cannot sync it as {desired}")]
    TypeConflict {
        token: String,
        existing: VariableType,
        desired: VariableType,
    },

    #[error("Required collection(s) missing: {}", .names.join(", "))]
    MissingCollections { names: Vec<String> },

    #[error("No variable named '{name}' in collection '{collection}'")]
    UnknownVariable { collection: String, name: String },
}
