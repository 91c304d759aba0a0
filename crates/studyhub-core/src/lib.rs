//! StudyHub session registry — domain layer.
//!
//! Models, storage interfaces and managers for study sessions and their
//! participants: the authoritative [`session::SessionStore`], the
//! [`membership::MembershipManager`] that derives participant counts, and
//! the [`session::LifecycleManager`] driving the forward-only
//! `scheduled -> active -> completed` state machine.

pub mod channel;
pub mod config;
pub mod error;
pub mod events;
pub mod membership;
pub mod session;

// Re-export common error type
pub use error::{RegistryError, Result};
