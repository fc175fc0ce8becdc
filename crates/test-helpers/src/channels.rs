//! Channel provider with injectable failures.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use townsim_simulation::{
    ChannelMessage, ChannelOptions, ChannelProvider, MemoryChannels, ProviderError,
};
use townsim_types::{ChannelId, MessageId, MessageOrigin};

#[derive(Debug, Default)]
struct Faults {
    /// Channel creations allowed before every further one fails.
    creations_left: Option<usize>,
    /// Channels whose names contain one of these reject posts and fetches.
    broken_names: Vec<String>,
    broken: HashSet<ChannelId>,
    /// Summary edits fail.
    edits: bool,
}

/// [`MemoryChannels`] wrapper that fails selected operations.
#[derive(Debug, Default)]
pub struct FlakyChannels {
    inner: MemoryChannels,
    faults: Mutex<Faults>,
}

impl FlakyChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `count` channel creations, then fail the rest.
    pub fn fail_creation_after(self, count: usize) -> Self {
        self.faults.lock().creations_left = Some(count);
        self
    }

    /// Break posting and fetching in channels whose name contains `fragment`.
    pub fn break_channels_named(self, fragment: &str) -> Self {
        self.faults.lock().broken_names.push(fragment.to_string());
        self
    }

    /// Make every message edit fail.
    pub fn fail_edits(self) -> Self {
        self.faults.lock().edits = true;
        self
    }

    pub fn inner(&self) -> &MemoryChannels {
        &self.inner
    }

    fn check_broken(&self, channel: &ChannelId) -> Result<(), ProviderError> {
        if self.faults.lock().broken.contains(channel) {
            return Err(ProviderError::Channel(format!("{} unavailable", channel)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelProvider for FlakyChannels {
    async fn create_channel(
        &self,
        parent: &ChannelId,
        name: &str,
        options: ChannelOptions,
    ) -> Result<ChannelId, ProviderError> {
        {
            let mut faults = self.faults.lock();
            if let Some(left) = faults.creations_left.as_mut() {
                if *left == 0 {
                    return Err(ProviderError::Channel(format!(
                        "cannot create channel {}",
                        name
                    )));
                }
                *left -= 1;
            }
        }

        let id = self.inner.create_channel(parent, name, options).await?;
        let mut faults = self.faults.lock();
        if faults.broken_names.iter().any(|f| name.contains(f.as_str())) {
            faults.broken.insert(id.clone());
        }
        Ok(id)
    }

    async fn post_message(
        &self,
        channel: &ChannelId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<MessageId, ProviderError> {
        self.check_broken(channel)?;
        self.inner.post_message(channel, text, origin).await
    }

    async fn fetch_recent_messages(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, ProviderError> {
        self.check_broken(channel)?;
        self.inner.fetch_recent_messages(channel, limit).await
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        text: &str,
    ) -> Result<(), ProviderError> {
        if self.faults.lock().edits {
            return Err(ProviderError::Timeout);
        }
        self.inner.edit_message(channel, message, text).await
    }
}
