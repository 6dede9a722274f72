//! Member domain errors
//!
//! Every failure of a member operation ends up as one of these variants, which
//! the API layer maps onto a JSON error response.

use thiserror::Error;

use core_kernel::PortError;

use crate::validation::ValidationResult;

/// Errors that can occur in the member domain
#[derive(Debug, Error)]
pub enum MemberError {
    /// The addressed list or member does not exist
    #[error("{entity}[{id}] not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// One or more validation rules failed
    #[error("Invalid data given")]
    ValidationFailed {
        errors: ValidationResult,
    },

    /// The remote directory refused or failed the call
    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: Option<PortError>,
    },

    /// The local mirror could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl MemberError {
    /// Creates a NotFound error for an entity and identifier
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        MemberError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a ValidationFailed error
    pub fn validation(errors: ValidationResult) -> Self {
        MemberError::ValidationFailed { errors }
    }

    /// Wraps a remote directory failure, keeping the provider's wording
    pub fn remote(source: PortError) -> Self {
        MemberError::Remote {
            message: source.detail(),
            source: Some(source),
        }
    }

    /// A remote failure detected before any call was made
    pub fn remote_message(message: impl Into<String>) -> Self {
        MemberError::Remote {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MemberError::NotFound { .. })
    }
}

impl From<PortError> for MemberError {
    fn from(error: PortError) -> Self {
        MemberError::Storage(error)
    }
}
