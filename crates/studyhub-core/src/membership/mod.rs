//! Membership domain module.
//!
//! The join/leave relation between actors and sessions: the model, the
//! repository interface, and the manager that enforces capacity and
//! joinability.

pub(crate) mod manager;
pub(crate) mod model;
pub(crate) mod repository;

// Re-export public API
pub use manager::MembershipManager;
pub use model::{Membership, MembershipState};
pub use repository::MembershipRepository;
