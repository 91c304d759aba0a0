//! Per-session mutual exclusion.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A keyed lock map serializing mutations per session.
///
/// Every mutation of one session and its memberships (join, leave,
/// lifecycle transition) acquires that session's guard first, so the
/// join-time capacity check can never race with a concurrent join or with
/// completion. Operations on different sessions proceed in parallel.
///
/// Guards are never removed from the map; sessions are never deleted, and
/// one idle mutex per session is a negligible footprint.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the guard for `session_id`, creating it on first use.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().await;
            map.entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}
