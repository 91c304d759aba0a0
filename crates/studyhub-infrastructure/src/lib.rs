//! StudyHub session registry — infrastructure layer.
//!
//! Concrete backends for the core's storage and channel traits: in-memory
//! session and membership tables, and a local media channel provider.

pub mod local_channel_provider;
pub mod memory_membership_repository;
pub mod memory_session_repository;

pub use local_channel_provider::LocalChannelProvider;
pub use memory_membership_repository::InMemoryMembershipRepository;
pub use memory_session_repository::InMemorySessionRepository;
