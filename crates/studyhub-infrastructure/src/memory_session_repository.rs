//! In-memory SessionRepository implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use studyhub_core::error::{RegistryError, Result};
use studyhub_core::session::{Session, SessionRepository};
use tokio::sync::RwLock;

#[derive(Default)]
struct SessionTable {
    /// Insertion order of session ids, the listing order contract
    order: Vec<String>,
    sessions: HashMap<String, Session>,
}

/// A repository implementation keeping session records in process memory.
///
/// Backs a single registry instance: listings preserve insertion order,
/// records are never removed, and all access goes through one `RwLock` so
/// point reads and listings stay consistent with writes. Durability is a
/// backend swap away behind the `SessionRepository` trait.
#[derive(Default)]
pub struct InMemorySessionRepository {
    inner: RwLock<SessionTable>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: &Session) -> Result<()> {
        let mut table = self.inner.write().await;
        if table.sessions.contains_key(&session.id) {
            return Err(RegistryError::internal(format!(
                "duplicate session id: {}",
                session.id
            )));
        }
        table.order.push(session.id.clone());
        table.sessions.insert(session.id.clone(), session.clone());
        tracing::trace!(session_id = %session.id, "session record inserted");
        Ok(())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let table = self.inner.read().await;
        Ok(table.sessions.get(session_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let table = self.inner.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.sessions.get(id).cloned())
            .collect())
    }

    async fn update(&self, session: &Session) -> Result<()> {
        let mut table = self.inner.write().await;
        if !table.sessions.contains_key(&session.id) {
            return Err(RegistryError::not_found("session", session.id.clone()));
        }
        table.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}
