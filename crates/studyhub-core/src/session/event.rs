use serde::Serialize;

use super::SessionStatus;

/// High-level events published after successful registry mutations.
///
/// UI consumers subscribe to these for live listings and participant
/// counts instead of polling the query facade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A session was created (`scheduled` or immediately `active`).
    SessionCreated {
        session_id: String,
        status: SessionStatus,
    },
    /// A scheduled session became active (sweep or host action).
    SessionActivated { session_id: String },
    /// A session was completed by its host.
    SessionCompleted { session_id: String },
    /// An actor joined a session.
    ParticipantJoined {
        session_id: String,
        actor_id: String,
        current_participants: u32,
    },
    /// An actor left a session (explicitly or via completion cascade).
    ParticipantLeft {
        session_id: String,
        actor_id: String,
        current_participants: u32,
    },
}
