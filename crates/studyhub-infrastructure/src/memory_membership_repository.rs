//! In-memory MembershipRepository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studyhub_core::error::{RegistryError, Result};
use studyhub_core::membership::{Membership, MembershipRepository, MembershipState};
use tokio::sync::RwLock;

/// A repository implementation keeping membership history in process
/// memory.
///
/// Records are append-only: leaving flips state in place, nothing is ever
/// removed, so the full join/leave history of every session stays
/// queryable.
#[derive(Default)]
pub struct InMemoryMembershipRepository {
    records: RwLock<Vec<Membership>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn insert(&self, membership: &Membership) -> Result<()> {
        self.records.write().await.push(membership.clone());
        tracing::trace!(
            session_id = %membership.session_id,
            actor_id = %membership.actor_id,
            "membership record appended"
        );
        Ok(())
    }

    async fn find_joined(
        &self,
        session_id: &str,
        actor_id: &str,
    ) -> Result<Option<Membership>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|m| m.session_id == session_id && m.actor_id == actor_id && m.is_joined())
            .cloned())
    }

    async fn count_joined(&self, session_id: &str) -> Result<u32> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|m| m.session_id == session_id && m.is_joined())
            .count() as u32)
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Membership>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn mark_left(
        &self,
        session_id: &str,
        actor_id: &str,
        left_at: DateTime<Utc>,
    ) -> Result<Membership> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|m| m.session_id == session_id && m.actor_id == actor_id && m.is_joined())
            .ok_or_else(|| RegistryError::not_found("membership", actor_id))?;
        record.state = MembershipState::Left;
        record.left_at = Some(left_at);
        Ok(record.clone())
    }

    async fn mark_all_left(&self, session_id: &str, left_at: DateTime<Utc>) -> Result<u32> {
        let mut records = self.records.write().await;
        let mut flipped = 0;
        for record in records
            .iter_mut()
            .filter(|m| m.session_id == session_id && m.is_joined())
        {
            record.state = MembershipState::Left;
            record.left_at = Some(left_at);
            flipped += 1;
        }
        Ok(flipped)
    }
}
