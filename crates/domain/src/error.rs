//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! at port boundaries.

/// Top-level error shared by the domain, the application layer and the ports.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An outbound collaborator (broker, hub) failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("payload for command `{0}` must not be empty")]
    EmptyPayload(&'static str),

    #[error("payload `{0}` is mapped to more than one command")]
    DuplicatePayload(String),

    #[error("base topic must not be empty or contain wildcards")]
    InvalidBaseTopic,

    #[error("position `{0}` is not a number between 0 and 100")]
    InvalidPosition(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Device",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Device 42 not found");
    }

    #[test]
    fn should_convert_validation_error_into_bridge_error() {
        let err: BridgeError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            BridgeError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_display_duplicate_payload() {
        let err = ValidationError::DuplicatePayload("1".to_string());
        assert_eq!(
            err.to_string(),
            "payload `1` is mapped to more than one command"
        );
    }
}
