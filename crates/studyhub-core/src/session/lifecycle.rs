//! Lifecycle manager: forward-only session state machine.
//!
//! `Scheduled --(start_time reached | host starts early)--> Active
//! --(host completes)--> Completed`. Completion is strictly
//! host-initiated; the recurring sweep only ever activates due sessions.

use super::locks::SessionLocks;
use super::model::{SessionFilter, SessionStatus};
use super::store::SessionStore;
use crate::error::{RegistryError, Result};
use crate::events::EventBus;
use crate::membership::MembershipManager;
use crate::session::RegistryEvent;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Drives session status transitions and the completion cascade.
pub struct LifecycleManager {
    store: Arc<SessionStore>,
    memberships: Arc<MembershipManager>,
    /// Per-session guards shared with the membership manager
    locks: SessionLocks,
    events: EventBus,
}

impl LifecycleManager {
    /// Creates a new `LifecycleManager`.
    ///
    /// `locks` must be the same instance the membership manager uses, so
    /// transitions serialize against joins and leaves.
    pub fn new(
        store: Arc<SessionStore>,
        memberships: Arc<MembershipManager>,
        locks: SessionLocks,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            memberships,
            locks,
            events,
        }
    }

    /// Host-initiated early start of a `Scheduled` session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `NotAuthorized` if `actor_id` is not the host
    /// - `InvalidTransition` unless the session is `Scheduled`
    pub async fn start_early(&self, session_id: &str, actor_id: &str) -> Result<()> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self.store.get_session(session_id).await?;
        if session.host_id != actor_id {
            return Err(RegistryError::NotAuthorized {
                session_id: session_id.to_string(),
                actor_id: actor_id.to_string(),
                action: "start",
            });
        }
        // update_status re-checks, but failing here keeps the error
        // ahead of any store write
        if session.status != SessionStatus::Scheduled {
            return Err(RegistryError::InvalidTransition {
                from: session.status,
                to: SessionStatus::Active,
            });
        }

        self.store
            .update_status(session_id, SessionStatus::Active, None)
            .await?;
        self.events.publish(RegistryEvent::SessionActivated {
            session_id: session_id.to_string(),
        });
        Ok(())
    }

    /// Host-initiated completion of an `Active` session.
    ///
    /// On success: status becomes `Completed`, `end_time` is set, every
    /// joined membership is cascaded to `Left`, and the media channel is
    /// retired.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `NotAuthorized` if `actor_id` is not the host
    /// - `InvalidTransition` unless the session is `Active`
    pub async fn complete(&self, session_id: &str, actor_id: &str) -> Result<()> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self.store.get_session(session_id).await?;
        if session.host_id != actor_id {
            return Err(RegistryError::NotAuthorized {
                session_id: session_id.to_string(),
                actor_id: actor_id.to_string(),
                action: "complete",
            });
        }
        if session.status != SessionStatus::Active {
            return Err(RegistryError::InvalidTransition {
                from: session.status,
                to: SessionStatus::Completed,
            });
        }

        let completed = self
            .store
            .update_status(session_id, SessionStatus::Completed, Some(Utc::now()))
            .await?;
        self.memberships.cascade_complete(session_id).await?;
        self.store.retire_channel(&completed.channel_id).await?;

        tracing::info!(session_id, "session completed by host");
        self.events.publish(RegistryEvent::SessionCompleted {
            session_id: session_id.to_string(),
        });
        Ok(())
    }

    /// One sweep pass: activates every `Scheduled` session whose
    /// `start_time` has been reached.
    ///
    /// Each transition takes only that session's guard, so a sweep never
    /// blocks client operations for longer than a single transition.
    /// Returns the number of sessions activated.
    pub async fn sweep_due(&self, now: DateTime<Utc>) -> Result<u32> {
        let due = self
            .store
            .list_sessions(&SessionFilter::all().with_status(SessionStatus::Scheduled))
            .await?;

        let mut activated = 0;
        for session in due {
            if session.start_time > now {
                continue;
            }
            let _guard = self.locks.acquire(&session.id).await;
            // Re-read under the guard; the host may have started it early
            // between the listing and here.
            let current = self.store.get_session(&session.id).await?;
            if current.status != SessionStatus::Scheduled {
                continue;
            }
            self.store
                .update_status(&session.id, SessionStatus::Active, None)
                .await?;
            self.events.publish(RegistryEvent::SessionActivated {
                session_id: session.id.clone(),
            });
            tracing::info!(session_id = %session.id, "sweep activated due session");
            activated += 1;
        }
        Ok(activated)
    }
}
