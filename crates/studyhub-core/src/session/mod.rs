//! Session domain module.
//!
//! This module contains the session domain model, lifecycle state
//! machine, repository interface, and the authoritative store.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionStatus`, `SessionFilter`)
//! - `event`: Registry events published after mutations (`RegistryEvent`)
//! - `locks`: Per-session mutual exclusion (`SessionLocks`)
//! - `repository`: Repository trait for session persistence
//! - `store`: Authoritative session storage (`SessionStore`)
//! - `lifecycle`: Forward-only state machine (`LifecycleManager`)

pub(crate) mod event;
pub(crate) mod lifecycle;
pub(crate) mod locks;
pub(crate) mod model;
pub(crate) mod repository;
pub(crate) mod store;

// Re-export public API
pub use event::RegistryEvent;
pub use lifecycle::LifecycleManager;
pub use locks::SessionLocks;
pub use model::{NewSession, Session, SessionFilter, SessionStatus};
pub use repository::SessionRepository;
pub use store::SessionStore;
