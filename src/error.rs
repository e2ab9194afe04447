//! Error types for the registry.

use crate::id::ServiceId;
use std::fmt;
use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Boxed error produced by a fallible factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The registry operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Bind,
    Unbind,
    Rebind,
    Resolve,
    Snapshot,
    Restore,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Bind => "bind",
            Operation::Unbind => "unbind",
            Operation::Rebind => "rebind",
            Operation::Resolve => "resolve",
            Operation::Snapshot => "snapshot",
            Operation::Restore => "restore",
        }
    }

    fn locked_outcome(&self) -> &'static str {
        match self {
            Operation::Unbind => "unbound",
            Operation::Rebind => "rebound",
            _ => "overridden",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during registry operations.
///
/// Every failing operation leaves the registry untouched.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("[{operation}] Identifier must not be empty.")]
    InvalidIdentifier { operation: Operation },

    #[error(
        "[{operation}] Service \"{id}\" is locked and cannot be {outcome}.",
        outcome = .operation.locked_outcome()
    )]
    Locked { operation: Operation, id: ServiceId },

    #[error("[resolve] Service \"{id}\" is not bound.")]
    Unbound { id: ServiceId },

    #[error("[restore] No snapshots available to restore.")]
    EmptySnapshotStack,

    #[error("[snapshot] Snapshot limit of {limit} reached.")]
    SnapshotLimit { limit: usize },

    #[error("[resolve] Factory for service \"{id}\" failed: {source}")]
    Factory {
        id: ServiceId,
        #[source]
        source: BoxError,
    },

    #[error("[resolve] Service \"{id}\" is not of type {expected}.")]
    TypeMismatch { id: ServiceId, expected: &'static str },
}

impl RegistryError {
    /// The operation that raised this error.
    pub fn operation(&self) -> Operation {
        match self {
            RegistryError::InvalidIdentifier { operation }
            | RegistryError::Locked { operation, .. } => *operation,
            RegistryError::Unbound { .. }
            | RegistryError::Factory { .. }
            | RegistryError::TypeMismatch { .. } => Operation::Resolve,
            RegistryError::EmptySnapshotStack => Operation::Restore,
            RegistryError::SnapshotLimit { .. } => Operation::Snapshot,
        }
    }
}
