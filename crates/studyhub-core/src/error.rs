//! Error types for the StudyHub session registry.

use crate::session::SessionStatus;
use serde::Serialize;
use thiserror::Error;

/// A shared error type for the whole registry.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The variant set is part of
/// the public contract: UI consumers dispatch on [`RegistryError::kind`],
/// which is stable across releases.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum RegistryError {
    /// Malformed input (non-positive capacity, blank title, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Lifecycle violation: session status only ever moves forward
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    /// Join attempt against a completed session
    #[error("Session '{session_id}' is no longer joinable")]
    SessionNotJoinable { session_id: String },

    /// Join attempt against a session at capacity
    #[error("Session '{session_id}' is full ({max_participants} participants)")]
    CapacityExceeded {
        session_id: String,
        max_participants: u32,
    },

    /// Join attempt by an actor who already holds an active membership
    #[error("Actor '{actor_id}' has already joined session '{session_id}'")]
    AlreadyJoined {
        session_id: String,
        actor_id: String,
    },

    /// Non-host attempting a host-only action
    #[error("Actor '{actor_id}' is not authorized to {action} session '{session_id}'")]
    NotAuthorized {
        session_id: String,
        actor_id: String,
        action: &'static str,
    },

    /// Backing store failure (the only kind a caller might retry)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a lifecycle violation
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Check if this is a capacity rejection
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Check if this error came from the backing store and may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Stable machine-readable kind string, the cross-boundary contract.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::SessionNotJoinable { .. } => "session_not_joinable",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::AlreadyJoined { .. } => "already_joined",
            Self::NotAuthorized { .. } => "not_authorized",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Validation(format!("TOML: {}", err))
    }
}

/// Conversion from anyhow::Error (transitional, for adapter code)
impl From<anyhow::Error> for RegistryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, RegistryError>`.
pub type Result<T> = std::result::Result<T, RegistryError>;
