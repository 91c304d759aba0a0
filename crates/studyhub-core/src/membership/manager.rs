//! Membership manager: join/leave semantics and capacity enforcement.

use super::model::Membership;
use super::repository::MembershipRepository;
use crate::error::{RegistryError, Result};
use crate::events::EventBus;
use crate::session::{RegistryEvent, SessionLocks, SessionStore};
use chrono::Utc;
use std::sync::Arc;

/// Single source of truth for the join/leave relation and the derived
/// participant count.
///
/// Every public mutation acquires the target session's guard before the
/// check-then-act sequence (read count, compare to capacity, write), so
/// two concurrent joins against one remaining slot cannot both succeed.
pub struct MembershipManager {
    /// Session records, for status and capacity checks
    sessions: Arc<SessionStore>,
    /// Persistent membership history
    repository: Arc<dyn MembershipRepository>,
    /// Per-session guards shared with the lifecycle manager
    locks: SessionLocks,
    /// Bus notified after successful mutations
    events: EventBus,
}

impl MembershipManager {
    /// Creates a new `MembershipManager`.
    ///
    /// `locks` must be the same instance the lifecycle manager uses, so
    /// joins serialize against lifecycle transitions too.
    pub fn new(
        sessions: Arc<SessionStore>,
        repository: Arc<dyn MembershipRepository>,
        locks: SessionLocks,
        events: EventBus,
    ) -> Self {
        Self {
            sessions,
            repository,
            locks,
            events,
        }
    }

    /// Joins `actor_id` to `session_id`.
    ///
    /// Rejoining after an earlier leave is allowed while the session has
    /// not completed; it appends a fresh record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `SessionNotJoinable` if the session has completed
    /// - `AlreadyJoined` if the actor already holds an active membership
    ///   (checked before capacity, so an already-joined actor at a full
    ///   session gets the more specific error)
    /// - `CapacityExceeded` if the session is at `max_participants`
    pub async fn join(&self, session_id: &str, actor_id: &str) -> Result<Membership> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self.sessions.get_session(session_id).await?;
        if session.status.is_terminal() {
            return Err(RegistryError::SessionNotJoinable {
                session_id: session_id.to_string(),
            });
        }
        if self
            .repository
            .find_joined(session_id, actor_id)
            .await?
            .is_some()
        {
            return Err(RegistryError::AlreadyJoined {
                session_id: session_id.to_string(),
                actor_id: actor_id.to_string(),
            });
        }
        let count = self.repository.count_joined(session_id).await?;
        if count >= session.max_participants {
            return Err(RegistryError::CapacityExceeded {
                session_id: session_id.to_string(),
                max_participants: session.max_participants,
            });
        }

        let membership = Membership::joined(session_id, actor_id, Utc::now());
        self.repository.insert(&membership).await?;

        tracing::debug!(
            session_id,
            actor_id,
            current_participants = count + 1,
            "actor joined session"
        );
        self.events.publish(RegistryEvent::ParticipantJoined {
            session_id: session_id.to_string(),
            actor_id: actor_id.to_string(),
            current_participants: count + 1,
        });

        Ok(membership)
    }

    /// Leaves `session_id`, flipping the actor's active record to `Left`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the actor has no active membership.
    pub async fn leave(&self, session_id: &str, actor_id: &str) -> Result<Membership> {
        let _guard = self.locks.acquire(session_id).await;

        let membership = self
            .repository
            .mark_left(session_id, actor_id, Utc::now())
            .await?;
        let count = self.repository.count_joined(session_id).await?;

        tracing::debug!(
            session_id,
            actor_id,
            current_participants = count,
            "actor left session"
        );
        self.events.publish(RegistryEvent::ParticipantLeft {
            session_id: session_id.to_string(),
            actor_id: actor_id.to_string(),
            current_participants: count,
        });

        Ok(membership)
    }

    /// Flips every active membership of a completing session to `Left`.
    ///
    /// Called exactly once per session by the lifecycle manager, which
    /// already holds the session's guard — this method therefore does not
    /// acquire it.
    pub(crate) async fn cascade_complete(&self, session_id: &str) -> Result<u32> {
        let now = Utc::now();
        let flipped = self.repository.mark_all_left(session_id, now).await?;
        if flipped > 0 {
            tracing::debug!(session_id, flipped, "cascaded leave on completion");
        }
        for record in self.repository.list_for_session(session_id).await? {
            if record.left_at == Some(now) {
                self.events.publish(RegistryEvent::ParticipantLeft {
                    session_id: session_id.to_string(),
                    actor_id: record.actor_id,
                    current_participants: 0,
                });
            }
        }
        Ok(flipped)
    }

    /// Derived participant count: `Joined` records for the session.
    pub async fn current_participants(&self, session_id: &str) -> Result<u32> {
        self.repository.count_joined(session_id).await
    }

    /// Full join/leave history for a session, oldest first.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Membership>> {
        self.repository.list_for_session(session_id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::membership::MembershipState;
    use crate::session::store::tests::{
        MockChannelProvider, MockSessionRepository, future_request,
    };
    use crate::session::{NewSession, Session, SessionStatus};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use std::sync::Mutex;

    /// In-module mock keeping append-only membership history.
    pub(crate) struct MockMembershipRepository {
        records: Mutex<Vec<Membership>>,
    }

    impl MockMembershipRepository {
        pub(crate) fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MembershipRepository for MockMembershipRepository {
        async fn insert(&self, membership: &Membership) -> Result<()> {
            self.records.lock().unwrap().push(membership.clone());
            Ok(())
        }

        async fn find_joined(
            &self,
            session_id: &str,
            actor_id: &str,
        ) -> Result<Option<Membership>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|m| {
                    m.session_id == session_id && m.actor_id == actor_id && m.is_joined()
                })
                .cloned())
        }

        async fn count_joined(&self, session_id: &str) -> Result<u32> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.session_id == session_id && m.is_joined())
                .count() as u32)
        }

        async fn list_for_session(&self, session_id: &str) -> Result<Vec<Membership>> {
            Ok(self
                .records
                .lock()
                .unwrap()
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
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|m| {
                    m.session_id == session_id && m.actor_id == actor_id && m.is_joined()
                })
                .ok_or_else(|| RegistryError::not_found("membership", actor_id))?;
            record.state = MembershipState::Left;
            record.left_at = Some(left_at);
            Ok(record.clone())
        }

        async fn mark_all_left(
            &self,
            session_id: &str,
            left_at: DateTime<Utc>,
        ) -> Result<u32> {
            let mut records = self.records.lock().unwrap();
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

    pub(crate) struct Fixture {
        pub(crate) store: Arc<SessionStore>,
        pub(crate) manager: MembershipManager,
    }

    pub(crate) fn fixture() -> Fixture {
        let events = EventBus::default();
        let locks = SessionLocks::new();
        let store = Arc::new(SessionStore::new(
            Arc::new(MockSessionRepository::new()),
            Arc::new(MockChannelProvider::new()),
            events.clone(),
        ));
        let manager = MembershipManager::new(
            store.clone(),
            Arc::new(MockMembershipRepository::new()),
            locks,
            events,
        );
        Fixture { store, manager }
    }

    async fn create_active(store: &SessionStore, max_participants: u32) -> Session {
        let request = NewSession {
            start_time: Utc::now() - Duration::minutes(5),
            max_participants,
            ..future_request("Study Group")
        };
        store.create_session(request).await.unwrap()
    }

    #[tokio::test]
    async fn join_counts_up_to_capacity_then_rejects() {
        let Fixture { store, manager } = fixture();
        let session = create_active(&store, 2).await;

        manager.join(&session.id, "actor-a").await.unwrap();
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 1);

        manager.join(&session.id, "actor-b").await.unwrap();
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 2);

        let err = manager.join(&session.id, "actor-c").await.unwrap_err();
        assert!(err.is_capacity_exceeded());
        // A failed join changes nothing.
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn scheduled_sessions_accept_joins() {
        let Fixture { store, manager } = fixture();
        let session = store.create_session(future_request("Future Group")).await.unwrap();
        assert_eq!(session.status, SessionStatus::Scheduled);

        let membership = manager.join(&session.id, "actor-a").await.unwrap();
        assert!(membership.is_joined());
    }

    #[tokio::test]
    async fn join_unknown_session_is_not_found() {
        let Fixture { manager, .. } = fixture();
        let err = manager.join("missing", "actor-a").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn double_join_is_rejected_explicitly() {
        let Fixture { store, manager } = fixture();
        let session = create_active(&store, 5).await;

        manager.join(&session.id, "actor-a").await.unwrap();
        let err = manager.join(&session.id, "actor-a").await.unwrap_err();
        assert_eq!(err.kind(), "already_joined");
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn already_joined_wins_over_capacity_at_full_session() {
        let Fixture { store, manager } = fixture();
        let session = create_active(&store, 1).await;

        manager.join(&session.id, "actor-a").await.unwrap();
        let err = manager.join(&session.id, "actor-a").await.unwrap_err();
        assert_eq!(err.kind(), "already_joined");
    }

    #[tokio::test]
    async fn leave_then_rejoin_appends_history() {
        let Fixture { store, manager } = fixture();
        let session = create_active(&store, 3).await;

        manager.join(&session.id, "actor-a").await.unwrap();
        let left = manager.leave(&session.id, "actor-a").await.unwrap();
        assert_eq!(left.state, MembershipState::Left);
        assert!(left.left_at.is_some());
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 0);

        manager.join(&session.id, "actor-a").await.unwrap();
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 1);

        // Two records now exist for the pair: one left, one joined.
        let history = manager.history(&session.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].state, MembershipState::Left);
        assert_eq!(history[1].state, MembershipState::Joined);
    }

    #[tokio::test]
    async fn leave_without_membership_is_not_found() {
        let Fixture { store, manager } = fixture();
        let session = create_active(&store, 3).await;
        let err = manager.leave(&session.id, "actor-a").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn cascade_complete_flips_all_joined() {
        let Fixture { store, manager } = fixture();
        let session = create_active(&store, 5).await;
        manager.join(&session.id, "actor-a").await.unwrap();
        manager.join(&session.id, "actor-b").await.unwrap();

        let flipped = manager.cascade_complete(&session.id).await.unwrap();
        assert_eq!(flipped, 2);
        assert_eq!(manager.current_participants(&session.id).await.unwrap(), 0);
        assert!(
            manager
                .history(&session.id)
                .await
                .unwrap()
                .iter()
                .all(|m| !m.is_joined())
        );
    }
}
