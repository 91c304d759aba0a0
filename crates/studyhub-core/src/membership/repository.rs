//! Membership repository trait.
//!
//! Defines the interface for membership persistence operations.

use super::model::Membership;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An abstract repository for membership records.
///
/// Implementations keep full join/leave history: `mark_left` flips state
/// in place and nothing is deleted. Uniqueness of the active record per
/// `(session_id, actor_id)` pair is the manager's responsibility; the
/// repository only answers queries about what is stored.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Appends a new membership record.
    async fn insert(&self, membership: &Membership) -> Result<()>;

    /// Finds the active (`Joined`) record for a `(session, actor)` pair.
    async fn find_joined(&self, session_id: &str, actor_id: &str)
    -> Result<Option<Membership>>;

    /// Counts `Joined` records for a session — the derived participant
    /// count.
    async fn count_joined(&self, session_id: &str) -> Result<u32>;

    /// Lists every record (joined and left) for a session, oldest first.
    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Membership>>;

    /// Marks the active record for a `(session, actor)` pair as `Left`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the pair has no active record.
    async fn mark_left(
        &self,
        session_id: &str,
        actor_id: &str,
        left_at: DateTime<Utc>,
    ) -> Result<Membership>;

    /// Marks every active record for a session as `Left`, returning how
    /// many were flipped. Used by the completion cascade.
    async fn mark_all_left(&self, session_id: &str, left_at: DateTime<Utc>) -> Result<u32>;
}
