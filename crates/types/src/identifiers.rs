//! Domain-specific identifier types.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Simulation run identifier.
///
/// Formatted as `sim_<unix millis>_<7 base36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationId(String);

impl SimulationId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier from a creation time and a random source.
    pub fn generate<R: Rng + ?Sized>(now: SystemTime, rng: &mut R) -> Self {
        let millis = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("sim_{}_{}", millis, suffix))
    }

    /// Get the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of an external discussion channel (one per location, plus the parent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.0)
    }
}

/// Handle of a message posted to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({})", self.0)
    }
}

/// Who authored a channel message.
///
/// Conversation context is built from bot messages only, so every post carries
/// its origin rather than relying on the text's formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageOrigin {
    /// The emergency alert that opens a location's channel.
    Alert,
    /// A response posted on behalf of a bot.
    Bot { name: String },
    /// Status or summary text written by the runner.
    System,
}

impl MessageOrigin {
    /// Origin for a bot post.
    pub fn bot(name: impl Into<String>) -> Self {
        MessageOrigin::Bot { name: name.into() }
    }

    /// Check if this message was authored by a bot.
    pub fn is_bot(&self) -> bool {
        matches!(self, MessageOrigin::Bot { .. })
    }
}
