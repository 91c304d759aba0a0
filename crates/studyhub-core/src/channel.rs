//! Media channel provider boundary.
//!
//! The registry's only contract with the external media-conferencing
//! service: issue an opaque channel handle when a session is created and
//! retire it when the session completes. Media negotiation itself happens
//! entirely on the other side of this trait.

use crate::error::Result;
use async_trait::async_trait;

/// Issues and retires opaque media channel handles.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Issues a fresh channel handle for the session being created.
    ///
    /// `title` is a display hint only; providers may ignore it.
    async fn issue(&self, title: &str) -> Result<String>;

    /// Retires a channel handle once its session has completed.
    ///
    /// Retiring an unknown handle is a no-op.
    async fn retire(&self, channel_id: &str) -> Result<()>;
}
