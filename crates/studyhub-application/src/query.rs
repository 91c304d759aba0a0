//! Read-side query facade.
//!
//! Pure composition over the session store and membership manager for the
//! listing use cases (status tabs, free-text search, per-subject lists).
//! No side effects; every query may be re-issued safely.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use studyhub_core::error::Result;
use studyhub_core::membership::MembershipManager;
use studyhub_core::session::{Session, SessionFilter, SessionStatus, SessionStore};

/// A session as consumers see it: the stored record plus the derived
/// participant count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: String,
    pub title: String,
    pub subject_id: String,
    pub host_id: String,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_participants: u32,
    /// Live count of joined memberships; never stored, always derived
    pub current_participants: u32,
    pub channel_id: String,
}

impl SessionView {
    fn from_parts(session: Session, current_participants: u32) -> Self {
        Self {
            id: session.id,
            title: session.title,
            subject_id: session.subject_id,
            host_id: session.host_id,
            status: session.status,
            start_time: session.start_time,
            end_time: session.end_time,
            max_participants: session.max_participants,
            current_participants,
            channel_id: session.channel_id,
        }
    }

    /// Whether another actor could still join (capacity-wise).
    pub fn has_free_slot(&self) -> bool {
        self.current_participants < self.max_participants
    }
}

/// Read-only facade over sessions and their participant counts.
pub struct SessionQueryService {
    store: Arc<SessionStore>,
    memberships: Arc<MembershipManager>,
}

impl SessionQueryService {
    pub fn new(store: Arc<SessionStore>, memberships: Arc<MembershipManager>) -> Self {
        Self { store, memberships }
    }

    /// Fetches one session with its derived participant count.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, session_id: &str) -> Result<SessionView> {
        let session = self.store.get_session(session_id).await?;
        let count = self.memberships.current_participants(session_id).await?;
        Ok(SessionView::from_parts(session, count))
    }

    /// Lists sessions matching `filter`, in stable insertion order.
    pub async fn list(&self, filter: &SessionFilter) -> Result<Vec<SessionView>> {
        let sessions = self.store.list_sessions(filter).await?;
        let mut views = Vec::with_capacity(sessions.len());
        for session in sessions {
            let count = self.memberships.current_participants(&session.id).await?;
            views.push(SessionView::from_parts(session, count));
        }
        Ok(views)
    }

    /// Sessions for one subject's detail page.
    pub async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<SessionView>> {
        self.list(&SessionFilter::all().with_subject(subject_id)).await
    }

    /// Sessions for one status tab.
    pub async fn list_by_status(&self, status: SessionStatus) -> Result<Vec<SessionView>> {
        self.list(&SessionFilter::all().with_status(status)).await
    }

    /// Free-text title search (case-insensitive substring).
    pub async fn search(&self, query: &str) -> Result<Vec<SessionView>> {
        self.list(&SessionFilter::all().with_text(query)).await
    }
}
