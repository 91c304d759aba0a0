//! Membership domain model.
//!
//! A membership is the join/leave relation between an actor and a
//! session. Records are append-only history: leaving flips the state to
//! `Left`, a later rejoin inserts a fresh record, and nothing is ever
//! physically deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    /// Actor currently counts toward the session's participants
    Joined,
    /// Actor left, or the session completed underneath them
    Left,
}

impl MembershipState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joined => "joined",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for MembershipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The relation between an actor and a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Session this record belongs to
    pub session_id: String,
    /// Actor this record belongs to
    pub actor_id: String,
    /// Whether the actor currently counts as a participant
    pub state: MembershipState,
    /// Instant the actor joined
    pub joined_at: DateTime<Utc>,
    /// Instant the actor left; `None` while joined
    pub left_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Creates a fresh `Joined` record.
    pub fn joined(
        session_id: impl Into<String>,
        actor_id: impl Into<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            actor_id: actor_id.into(),
            state: MembershipState::Joined,
            joined_at,
            left_at: None,
        }
    }

    /// Whether this record counts toward the participant total.
    pub fn is_joined(&self) -> bool {
        self.state == MembershipState::Joined
    }
}
