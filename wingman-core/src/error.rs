//! Error types for Wingman operations

use crate::EntityType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`Link`](crate::Link) or its [`Shape`](crate::Shape).
///
/// Unresolved identifiers are never reported through this type; a resolution
/// gap is surfaced per entry by [`Link::resolved_contents`](crate::Link::resolved_contents).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid relation type: {role} is not a role of the {relation} relation")]
    UnknownRole { relation: &'static str, role: String },

    #[error("{relation} role {role} is full: capacity {capacity}, attempted {attempted}")]
    CapacityExceeded {
        relation: &'static str,
        role: String,
        capacity: usize,
        attempted: usize,
    },

    #[error("Association not found: {id} does not occupy {role} in the {relation} relation")]
    AssociationNotFound {
        relation: &'static str,
        role: String,
        id: String,
    },

    #[error("Duplicate entry: {id} appears more than once under {role} in the {relation} relation")]
    DuplicateEntry {
        relation: &'static str,
        role: String,
        id: String,
    },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: String },

    #[error("Insert failed for {entity_type:?} with id {id}: {reason}")]
    InsertFailed {
        entity_type: EntityType,
        id: String,
        reason: String,
    },

    #[error("IO error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Serialization failed for {entity_type:?}: {reason}")]
    Serialization {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Corrupt {entity_type:?} record {id}: {reason}")]
    CorruptRecord {
        entity_type: EntityType,
        id: String,
        reason: String,
    },

    #[error("Model has not been installed yet")]
    ModelNotReady,

    #[error("Model has already been installed")]
    ModelAlreadyInstalled,
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to parse config TOML: {reason}")]
    Parse { reason: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Wingman errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WingmanError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Wingman operations.
pub type WingmanResult<T> = Result<T, WingmanError>;

// =============================================================================
// TESTS
// =============================================================================
