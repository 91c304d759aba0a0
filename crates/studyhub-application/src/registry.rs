//! Registry service: the composition root for the session registry.
//!
//! Wires the session store, membership manager and lifecycle manager over
//! pluggable backends, runs the recurring lifecycle sweep, and exposes the
//! operations UI consumers call.

use crate::query::{SessionQueryService, SessionView};
use chrono::Utc;
use std::sync::Arc;
use studyhub_core::channel::ChannelProvider;
use studyhub_core::config::RegistryConfig;
use studyhub_core::error::Result;
use studyhub_core::events::EventBus;
use studyhub_core::membership::{Membership, MembershipManager, MembershipRepository};
use studyhub_core::session::{
    LifecycleManager, NewSession, RegistryEvent, SessionFilter, SessionLocks,
    SessionRepository, SessionStore,
};
use studyhub_infrastructure::{
    InMemoryMembershipRepository, InMemorySessionRepository, LocalChannelProvider,
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Facade over the whole session registry.
///
/// One instance owns the wiring for a registry: shared per-session locks,
/// the event bus, and the three managers. There is no process-wide
/// singleton; embedders construct and inject an instance.
pub struct RegistryService {
    config: RegistryConfig,
    store: Arc<SessionStore>,
    memberships: Arc<MembershipManager>,
    lifecycle: Arc<LifecycleManager>,
    query: SessionQueryService,
    events: EventBus,
}

impl RegistryService {
    /// Creates a registry over the given backends.
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        membership_repository: Arc<dyn MembershipRepository>,
        channels: Arc<dyn ChannelProvider>,
        config: RegistryConfig,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        let locks = SessionLocks::new();

        let store = Arc::new(SessionStore::new(
            session_repository,
            channels,
            events.clone(),
        ));
        let memberships = Arc::new(MembershipManager::new(
            store.clone(),
            membership_repository,
            locks.clone(),
            events.clone(),
        ));
        let lifecycle = Arc::new(LifecycleManager::new(
            store.clone(),
            memberships.clone(),
            locks,
            events.clone(),
        ));
        let query = SessionQueryService::new(store.clone(), memberships.clone());

        Self {
            config,
            store,
            memberships,
            lifecycle,
            query,
            events,
        }
    }

    /// Creates a registry backed by the in-memory infrastructure.
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self::new(
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(InMemoryMembershipRepository::new()),
            Arc::new(LocalChannelProvider::new()),
            config,
        )
    }

    // ============================================================================
    // Commands
    // ============================================================================

    /// Creates a session; see `SessionStore::create_session`.
    pub async fn create_session(&self, request: NewSession) -> Result<SessionView> {
        let session = self.store.create_session(request).await?;
        self.query.get(&session.id).await
    }

    /// Joins an actor to a session.
    pub async fn join(&self, session_id: &str, actor_id: &str) -> Result<Membership> {
        self.memberships.join(session_id, actor_id).await
    }

    /// Removes an actor's active membership.
    pub async fn leave(&self, session_id: &str, actor_id: &str) -> Result<Membership> {
        self.memberships.leave(session_id, actor_id).await
    }

    /// Host-only: starts a scheduled session ahead of its start time.
    pub async fn start_early(&self, session_id: &str, actor_id: &str) -> Result<()> {
        self.lifecycle.start_early(session_id, actor_id).await
    }

    /// Host-only: completes an active session, cascading membership
    /// leave and retiring the media channel.
    pub async fn complete(&self, session_id: &str, actor_id: &str) -> Result<()> {
        self.lifecycle.complete(session_id, actor_id).await
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// Fetches one session with its derived participant count.
    pub async fn get_session(&self, session_id: &str) -> Result<SessionView> {
        self.query.get(session_id).await
    }

    /// Lists sessions matching `filter`.
    pub async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionView>> {
        self.query.list(filter).await
    }

    /// The read facade, for consumers that only query.
    pub fn query(&self) -> &SessionQueryService {
        &self.query
    }

    /// Subscribes to registry events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    // ============================================================================
    // Lifecycle sweep
    // ============================================================================

    /// Runs one sweep pass immediately; returns how many sessions were
    /// activated.
    pub async fn sweep_now(&self) -> Result<u32> {
        self.lifecycle.sweep_due(Utc::now()).await
    }

    /// Starts the recurring lifecycle sweep in a background task.
    ///
    /// The sweep activates scheduled sessions whose start time has been
    /// reached, at the cadence of `RegistryConfig::sweep_interval`. The
    /// returned token stops the task; dropping it does not.
    pub fn spawn_sweeper(self: &Arc<Self>) -> CancellationToken {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let registry = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(registry.config.sweep_interval());
            tracing::info!(
                interval_secs = registry.config.sweep_interval_secs,
                "lifecycle sweeper started"
            );
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        tracing::info!("lifecycle sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match registry.sweep_now().await {
                            Ok(0) => {}
                            Ok(activated) => {
                                tracing::debug!(activated, "sweep pass activated sessions");
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "sweep pass failed");
                            }
                        }
                    }
                }
            }
        });

        token
    }
}
