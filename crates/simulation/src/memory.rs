//! In-process channel provider.

use crate::provider::{ChannelMessage, ChannelOptions, ChannelProvider, ProviderError};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt::Write as _;
use townsim_types::{ChannelId, MessageId, MessageOrigin};

#[derive(Debug)]
struct MemoryChannel {
    name: String,
    parent: Option<ChannelId>,
    messages: Vec<ChannelMessage>,
}

#[derive(Debug, Default)]
struct State {
    channels: IndexMap<ChannelId, MemoryChannel>,
    next_channel: u64,
    next_message: u64,
}

impl State {
    fn channel_mut(&mut self, id: &ChannelId) -> Result<&mut MemoryChannel, ProviderError> {
        self.channels
            .get_mut(id)
            .ok_or_else(|| ProviderError::UnknownChannel(id.clone()))
    }

    fn open(&mut self, name: &str, parent: Option<ChannelId>) -> ChannelId {
        self.next_channel += 1;
        let id = ChannelId::new(format!("ch-{}", self.next_channel));
        self.channels.insert(
            id.clone(),
            MemoryChannel {
                name: name.to_string(),
                parent,
                messages: Vec::new(),
            },
        );
        id
    }
}

/// Channels held in memory, keeping every message with its origin.
///
/// Channels and messages are numbered in creation order.
#[derive(Debug, Default)]
pub struct MemoryChannels {
    state: Mutex<State>,
}

impl MemoryChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a top-level channel to parent the run's channels.
    pub fn open_root(&self, name: &str) -> ChannelId {
        self.state.lock().open(name, None)
    }

    /// Channel name, if the channel exists.
    pub fn channel_name(&self, channel: &ChannelId) -> Option<String> {
        self.state
            .lock()
            .channels
            .get(channel)
            .map(|c| c.name.clone())
    }

    /// Children of `parent`, in creation order.
    pub fn children(&self, parent: &ChannelId) -> Vec<ChannelId> {
        self.state
            .lock()
            .channels
            .iter()
            .filter(|(_, c)| c.parent.as_ref() == Some(parent))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// All messages of a channel, oldest first.
    pub fn messages(&self, channel: &ChannelId) -> Vec<ChannelMessage> {
        self.state
            .lock()
            .channels
            .get(channel)
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    /// Every channel and its messages as plain text, in creation order.
    pub fn transcript(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();
        for channel in state.channels.values() {
            let _ = writeln!(out, "══ {} ══", channel.name);
            for message in &channel.messages {
                let _ = writeln!(out, "{}\n", message.text);
            }
        }
        out
    }
}

#[async_trait]
impl ChannelProvider for MemoryChannels {
    async fn create_channel(
        &self,
        parent: &ChannelId,
        name: &str,
        _options: ChannelOptions,
    ) -> Result<ChannelId, ProviderError> {
        let mut state = self.state.lock();
        if !state.channels.contains_key(parent) {
            return Err(ProviderError::UnknownChannel(parent.clone()));
        }
        Ok(state.open(name, Some(parent.clone())))
    }

    async fn post_message(
        &self,
        channel: &ChannelId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<MessageId, ProviderError> {
        let mut state = self.state.lock();
        state.next_message += 1;
        let id = MessageId::new(format!("msg-{}", state.next_message));
        state.channel_mut(channel)?.messages.push(ChannelMessage {
            id: id.clone(),
            text: text.to_string(),
            origin,
        });
        Ok(id)
    }

    async fn fetch_recent_messages(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, ProviderError> {
        let mut state = self.state.lock();
        let messages = &state.channel_mut(channel)?.messages;
        Ok(messages.iter().rev().take(limit).cloned().collect())
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        text: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.lock();
        let stored = state
            .channel_mut(channel)?
            .messages
            .iter_mut()
            .find(|m| &m.id == message)
            .ok_or_else(|| ProviderError::UnknownMessage {
                channel: channel.clone(),
                message: message.clone(),
            })?;
        stored.text = text.to_string();
        Ok(())
    }
}
