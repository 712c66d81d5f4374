//! Command errors with user-facing messages.

use thiserror::Error;
use wingman_core::{EntityType, LinkError, StorageError};

/// Why a command failed. `Display` is the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid relation type: {role} cannot be used for {relation}.")]
    InvalidRelationType { relation: &'static str, role: String },

    #[error("That association doesn't exist: {id} is not linked as {role}.")]
    AssociationNotFound { role: String, id: String },

    #[error("{role} is full (capacity {capacity}).")]
    RoleFull { role: String, capacity: usize },

    #[error("{entity_type} with id {id} is not found.")]
    NotFound { entity_type: EntityType, id: String },

    #[error("No {what} given.")]
    NothingToDo { what: &'static str },

    /// The link changed but the availability update that follows it did not.
    #[error("{linked}, but availability was not updated: {reason}")]
    PartiallyApplied { linked: String, reason: String },

    #[error(transparent)]
    Link(LinkError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<LinkError> for CommandError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::UnknownRole { relation, role } => {
                CommandError::InvalidRelationType { relation, role }
            }
            LinkError::AssociationNotFound { role, id, .. } => {
                CommandError::AssociationNotFound { role, id }
            }
            LinkError::CapacityExceeded { role, capacity, .. } => {
                CommandError::RoleFull { role, capacity }
            }
            other => CommandError::Link(other),
        }
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity_type, id } => CommandError::NotFound { entity_type, id },
            other => CommandError::Storage(other),
        }
    }
}

/// Result type alias for command execution.
pub type LogicResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_maps_to_invalid_relation_type() {
        let err: CommandError = LinkError::UnknownRole {
            relation: "flight-crew",
            role: "Trainee".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Invalid relation type"));
    }

    #[test]
    fn test_missing_association_message() {
        let err: CommandError = LinkError::AssociationNotFound {
            relation: "flight-pilot",
            role: "Pilot Flying".to_string(),
            id: "p1".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "That association doesn't exist: p1 is not linked as Pilot Flying."
        );
    }

    #[test]
    fn test_capacity_maps_to_role_full() {
        let err: CommandError = LinkError::CapacityExceeded {
            relation: "flight-crew",
            role: "Trainee".to_string(),
            capacity: 4,
            attempted: 5,
        }
        .into();
        assert_eq!(err.to_string(), "Trainee is full (capacity 4).");
    }

    #[test]
    fn test_storage_not_found_is_lifted() {
        let err: CommandError = StorageError::NotFound {
            entity_type: EntityType::Flight,
            id: "f9".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Flight with id f9 is not found.");
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err: CommandError = StorageError::ModelNotReady.into();
        assert_eq!(err, CommandError::Storage(StorageError::ModelNotReady));
        assert_eq!(err.to_string(), "Model has not been installed yet");
    }
}
