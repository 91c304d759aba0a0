//! Local channel provider.
//!
//! Issues media channel handles without talking to a real conferencing
//! backend: a slug of the session title plus a short random suffix, e.g.
//! `java-basics-3f2a91c4`. Suitable for development and for deployments
//! where the conferencing service derives rooms from the handle alone.

use async_trait::async_trait;
use std::collections::HashSet;
use studyhub_core::channel::ChannelProvider;
use studyhub_core::error::Result;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Maximum slug length taken from the title.
const SLUG_MAX_LEN: usize = 24;

#[derive(Default)]
pub struct LocalChannelProvider {
    /// Handles issued and not yet retired (diagnostics only)
    active: Mutex<HashSet<String>>,
}

impl LocalChannelProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently outstanding.
    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }

    fn slugify(title: &str) -> String {
        let mut slug = String::new();
        let mut last_dash = true;
        for ch in title.chars().flat_map(|c| c.to_lowercase()) {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch);
                last_dash = false;
            } else if !last_dash {
                slug.push('-');
                last_dash = true;
            }
            if slug.len() >= SLUG_MAX_LEN {
                break;
            }
        }
        let slug = slug.trim_matches('-').to_string();
        if slug.is_empty() { "session".to_string() } else { slug }
    }
}

#[async_trait]
impl ChannelProvider for LocalChannelProvider {
    async fn issue(&self, title: &str) -> Result<String> {
        let suffix = Uuid::new_v4().simple().to_string();
        let channel_id = format!("{}-{}", Self::slugify(title), &suffix[..8]);
        self.active.lock().await.insert(channel_id.clone());
        tracing::debug!(%channel_id, "issued media channel");
        Ok(channel_id)
    }

    async fn retire(&self, channel_id: &str) -> Result<()> {
        // Unknown handles are a no-op by contract.
        self.active.lock().await.remove(channel_id);
        tracing::debug!(%channel_id, "retired media channel");
        Ok(())
    }
}
