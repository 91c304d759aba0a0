//! StudyHub session registry — application layer.
//!
//! Composes the domain managers into a [`RegistryService`] facade, runs
//! the recurring lifecycle sweep, and provides the read-side
//! [`SessionQueryService`] with derived participant counts.

pub mod query;
pub mod registry;

pub use query::{SessionQueryService, SessionView};
pub use registry::RegistryService;
