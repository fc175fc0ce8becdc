//! Collaborator contracts for external channels and text generation.
//!
//! The scheduler never talks to a chat service or a language model directly;
//! it goes through these traits so runs can be driven by in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use townsim_types::{ChannelId, MessageId, MessageOrigin};

/// Failures reported by collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The channel service rejected or failed an operation.
    #[error("Channel operation failed: {0}")]
    Channel(String),

    /// The text generator failed to produce a response.
    #[error("Text generation failed: {0}")]
    Generation(String),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    #[error("Unknown channel {0}")]
    UnknownChannel(ChannelId),

    #[error("Unknown message {message} in {channel}")]
    UnknownMessage {
        channel: ChannelId,
        message: MessageId,
    },
}

/// Options for a newly created channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOptions {
    /// Visible to everyone in the parent channel.
    pub public: bool,

    /// Inactivity period after which the provider may archive the channel.
    pub auto_archive_after: Duration,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            public: true,
            auto_archive_after: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// A message as returned by [`ChannelProvider::fetch_recent_messages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: MessageId,
    pub text: String,
    pub origin: MessageOrigin,
}

/// External discussion channels, one per location plus a parent.
///
/// Name length and rate limits are the provider's concern; callers cap names
/// and pace their requests.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Create a channel under `parent`.
    async fn create_channel(
        &self,
        parent: &ChannelId,
        name: &str,
        options: ChannelOptions,
    ) -> Result<ChannelId, ProviderError>;

    /// Post a message tagged with its origin.
    async fn post_message(
        &self,
        channel: &ChannelId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<MessageId, ProviderError>;

    /// Fetch up to `limit` messages, newest first.
    async fn fetch_recent_messages(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, ProviderError>;

    /// Replace the text of an existing message.
    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        text: &str,
    ) -> Result<(), ProviderError>;
}

/// Persona-conditioned text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response to `prompt` in the voice described by `persona`.
    async fn generate(&self, prompt: &str, persona: &str) -> Result<String, ProviderError>;
}
