//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the registry's core logic from the specific storage mechanism
/// (in-memory tables, a database, a remote API).
///
/// # Implementation Notes
///
/// Implementations should:
/// - Preserve stable insertion order in `list_all`
/// - Surface infrastructure failures as `RegistryError::StoreUnavailable`
/// - Never delete session records (retention is handled elsewhere)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts a newly created session.
    ///
    /// # Errors
    ///
    /// - `Internal` if a session with the same id already exists
    /// - `StoreUnavailable` if the store cannot be reached
    async fn insert(&self, session: &Session) -> Result<()>;

    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: session found
    /// - `Ok(None)`: session not found
    /// - `Err(_)`: error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Lists all stored sessions in stable insertion order.
    async fn list_all(&self) -> Result<Vec<Session>>;

    /// Saves an updated session record back to the store.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session was never inserted
    /// - `StoreUnavailable` if the store cannot be reached
    async fn update(&self, session: &Session) -> Result<()>;
}
