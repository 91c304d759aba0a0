//! Session store: authoritative storage and retrieval of session records.

use super::model::{NewSession, Session, SessionFilter, SessionStatus};
use super::repository::SessionRepository;
use crate::channel::ChannelProvider;
use crate::error::{RegistryError, Result};
use crate::events::EventBus;
use crate::session::RegistryEvent;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Authoritative store for [`Session`] records.
///
/// `SessionStore` validates creation input, decides the initial lifecycle
/// status, issues the media channel handle, and answers point and list
/// reads. Status mutation is crate-private: only the lifecycle manager may
/// advance a session, which keeps the forward-only state machine in one
/// place.
pub struct SessionStore {
    /// Persistent storage backend for session records
    repository: Arc<dyn SessionRepository>,
    /// External media-conferencing boundary (channel issue/retire)
    channels: Arc<dyn ChannelProvider>,
    /// Bus notified after successful mutations
    events: EventBus,
}

impl SessionStore {
    /// Creates a new `SessionStore` over the given backends.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        channels: Arc<dyn ChannelProvider>,
        events: EventBus,
    ) -> Self {
        Self {
            repository,
            channels,
            events,
        }
    }

    /// Creates a session from `request`.
    ///
    /// The initial status is `Scheduled` when `start_time` lies in the
    /// future, otherwise `Active`. A media channel handle is issued before
    /// the record is persisted.
    ///
    /// # Errors
    ///
    /// - `Validation` if `max_participants` is zero or the title is blank
    /// - `StoreUnavailable` if the backing store cannot be reached
    pub async fn create_session(&self, request: NewSession) -> Result<Session> {
        if request.max_participants == 0 {
            return Err(RegistryError::validation(
                "max_participants must be positive",
            ));
        }
        if request.title.trim().is_empty() {
            return Err(RegistryError::validation("title must not be blank"));
        }

        let now = Utc::now();
        let status = if request.start_time > now {
            SessionStatus::Scheduled
        } else {
            SessionStatus::Active
        };
        let channel_id = self.channels.issue(&request.title).await?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            subject_id: request.subject_id,
            host_id: request.host_id,
            status,
            start_time: request.start_time,
            end_time: None,
            max_participants: request.max_participants,
            channel_id,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&session).await?;

        tracing::info!(
            session_id = %session.id,
            status = %session.status,
            "session created"
        );
        self.events.publish(RegistryEvent::SessionCreated {
            session_id: session.id.clone(),
            status: session.status,
        });

        Ok(session)
    }

    /// Fetches a session by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no session with `session_id` exists.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| RegistryError::not_found("session", session_id))
    }

    /// Lists sessions satisfying `filter`, in stable insertion order.
    pub async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>> {
        let sessions = self.repository.list_all().await?;
        Ok(sessions
            .into_iter()
            .filter(|session| filter.matches(session))
            .collect())
    }

    /// Advances a session's lifecycle status.
    ///
    /// Crate-private: the lifecycle manager is the only caller, and it
    /// holds the session's guard while calling. `end_time` must be `Some`
    /// exactly when transitioning to `Completed`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `InvalidTransition` unless the move is forward-only
    pub(crate) async fn update_status(
        &self,
        session_id: &str,
        new_status: SessionStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Session> {
        let mut session = self.get_session(session_id).await?;

        if !session.status.can_transition_to(new_status) {
            return Err(RegistryError::InvalidTransition {
                from: session.status,
                to: new_status,
            });
        }
        // end_time is set iff the session completes
        match (new_status, end_time) {
            (SessionStatus::Completed, None) => {
                return Err(RegistryError::internal(
                    "completion requires an end_time",
                ));
            }
            (SessionStatus::Completed, Some(_)) => {}
            (_, Some(_)) => {
                return Err(RegistryError::internal(
                    "end_time is only set on completion",
                ));
            }
            (_, None) => {}
        }

        let from = session.status;
        session.status = new_status;
        session.end_time = end_time;
        session.updated_at = Utc::now();
        self.repository.update(&session).await?;

        tracing::info!(
            session_id = %session.id,
            from = %from,
            to = %new_status,
            "session status advanced"
        );
        Ok(session)
    }

    /// Retires the media channel of a completed session.
    pub(crate) async fn retire_channel(&self, channel_id: &str) -> Result<()> {
        self.channels.retire(channel_id).await
    }
}
