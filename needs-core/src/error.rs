//! Error types for user needs operations

use std::fmt;
use thiserror::Error;

/// The collection a record lives in, used to build error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    UserGroup,
    UserSuperGroup,
    Entity,
    WorkflowPhase,
    UserNeed,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::UserGroup => write!(f, "User group"),
            RecordKind::UserSuperGroup => write!(f, "User super group"),
            RecordKind::Entity => write!(f, "Entity"),
            RecordKind::WorkflowPhase => write!(f, "Workflow phase"),
            RecordKind::UserNeed => write!(f, "User need"),
        }
    }
}

/// Errors that can occur during user needs operations
#[derive(Error, Debug)]
pub enum NeedsError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    InvalidField(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl NeedsError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        NeedsError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Duplicate id inside a collection
    pub fn duplicate_id(kind: RecordKind, id: &str) -> Self {
        NeedsError::Conflict(format!("{} with ID '{}' already exists", kind, id))
    }
}

pub type Result<T> = std::result::Result<T, NeedsError>;
