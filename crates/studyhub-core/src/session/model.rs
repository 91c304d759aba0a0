//! Session domain model.
//!
//! This module contains the core Session entity that represents
//! a collaborative study meeting in the registry's domain layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a study session.
///
/// Transitions are forward-only: `Scheduled -> Active -> Completed`.
/// The lowercase serialized form is the stable wire contract shared with
/// UI consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created with a future start time, not yet underway
    Scheduled,
    /// Underway; participants can join and leave
    Active,
    /// Ended by the host; terminal
    Completed,
}

impl SessionStatus {
    /// Stable lowercase name used across the API boundary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Active) | (Self::Active, Self::Completed)
        )
    }

    /// Completed sessions accept no further mutations.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a collaborative study meeting in the domain layer.
///
/// A session carries:
/// - Identity and display title
/// - A non-owning reference to its subject (opaque foreign key)
/// - The host actor who controls its lifecycle
/// - The lifecycle status and start/end instants
/// - A participant capacity bound
/// - The opaque channel handle addressing the media-conferencing service
///
/// The live participant count is deliberately *not* a field here: it is
/// derived from membership records and exposed on the read-side view, so
/// it can never drift from the memberships that define it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Subject this session studies (owned by the external catalog service)
    pub subject_id: String,
    /// Actor who created the session and controls its lifecycle
    pub host_id: String,
    /// Current lifecycle status
    pub status: SessionStatus,
    /// Scheduled start instant
    pub start_time: DateTime<Utc>,
    /// Set exactly when the session completes
    pub end_time: Option<DateTime<Utc>>,
    /// Participant capacity bound (positive)
    pub max_participants: u32,
    /// Opaque handle addressing the external media-conferencing service
    pub channel_id: String,
    /// Timestamp when the session record was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the session record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a session; the store assigns id, status and channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    pub subject_id: String,
    pub host_id: String,
    pub start_time: DateTime<Utc>,
    pub max_participants: u32,
}

/// Read-side filter for session listings.
///
/// All options are optional and combine conjunctively. `text_query` is a
/// case-insensitive substring match on the title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFilter {
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub text_query: Option<String>,
}

impl SessionFilter {
    /// Matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// Restricts to one lifecycle status.
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to titles containing `query` (case-insensitive).
    pub fn with_text(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    /// Whether `session` satisfies every configured restriction.
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(subject_id) = &self.subject_id {
            if &session.subject_id != subject_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if session.status != status {
                return false;
            }
        }
        if let Some(query) = &self.text_query {
            let title = session.title.to_lowercase();
            if !title.contains(&query.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_session() -> Session {
        let t = Utc.with_ymd_and_hms(2024, 5, 10, 14, 0, 0).unwrap();
        Session {
            id: "s-1".to_string(),
            title: "Java Basics Study Group".to_string(),
            subject_id: "subj-java".to_string(),
            host_id: "host-1".to_string(),
            status: SessionStatus::Active,
            start_time: t,
            end_time: None,
            max_participants: 10,
            channel_id: "java-basics-abc123".to_string(),
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn transitions_are_forward_only() {
        use SessionStatus::*;
        assert!(Scheduled.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));

        assert!(!Scheduled.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Scheduled));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn status_serializes_to_stable_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(SessionStatus::Active.to_string(), "active");
    }

    #[test]
    fn filter_matches_subject_status_and_text() {
        let session = sample_session();

        assert!(SessionFilter::all().matches(&session));
        assert!(SessionFilter::all().with_subject("subj-java").matches(&session));
        assert!(!SessionFilter::all().with_subject("subj-web").matches(&session));
        assert!(
            SessionFilter::all()
                .with_status(SessionStatus::Active)
                .matches(&session)
        );
        assert!(
            !SessionFilter::all()
                .with_status(SessionStatus::Completed)
                .matches(&session)
        );
        // Case-insensitive substring on title
        assert!(SessionFilter::all().with_text("java basics").matches(&session));
        assert!(SessionFilter::all().with_text("STUDY").matches(&session));
        assert!(!SessionFilter::all().with_text("rust").matches(&session));
    }

    #[test]
    fn filter_options_combine_conjunctively() {
        let session = sample_session();
        let filter = SessionFilter::all()
            .with_subject("subj-java")
            .with_status(SessionStatus::Active)
            .with_text("basics");
        assert!(filter.matches(&session));

        let mismatch = filter.clone().with_status(SessionStatus::Scheduled);
        assert!(!mismatch.matches(&session));
    }
}
