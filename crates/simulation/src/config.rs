//! Configuration types for simulation runs.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of locations drawn from the catalog.
    pub location_count: usize,

    /// Number of conversation rounds after the alert phase.
    pub round_count: u32,

    /// Maximum bot messages included in a round's conversation context.
    pub context_window: usize,

    /// Messages fetched from a channel when building context.
    pub history_limit: usize,

    /// Provider-imposed cap on channel names, in characters.
    pub channel_name_limit: usize,

    /// Timeout for a single text-generation request.
    #[serde(with = "millis")]
    pub generation_timeout: Duration,

    /// Texts posted in place of a missing response.
    pub placeholders: Placeholders,

    /// Delays between external steps.
    pub pace: PacePolicy,

    /// Random seed for location selection and allocation. Unset means a
    /// fresh seed per run, see [`SimulationConfig::resolve_seed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Create a configuration for `location_count` locations and `round_count` rounds.
    pub fn new(location_count: usize, round_count: u32) -> Self {
        Self {
            location_count,
            round_count,
            context_window: 10,
            history_limit: 20,
            channel_name_limit: 100,
            generation_timeout: Duration::from_secs(120),
            placeholders: Placeholders::default(),
            pace: PacePolicy::default(),
            seed: None,
        }
    }

    /// Set the conversation context window.
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    /// Set how many messages are fetched per context build.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the channel name cap.
    pub fn with_channel_name_limit(mut self, limit: usize) -> Self {
        self.channel_name_limit = limit;
        self
    }

    /// Set the per-request generation timeout.
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set the pacing policy.
    pub fn with_pace(mut self, pace: PacePolicy) -> Self {
        self.pace = pace;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured seed, or a freshly drawn one that is stored and logged
    /// so the run can be replayed with `with_seed`.
    pub fn resolve_seed(&mut self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::thread_rng().gen();
                info!(seed, "Drew random seed");
                self.seed = Some(seed);
                seed
            }
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

/// Texts posted when a bot has nothing usable to say.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    /// Generation succeeded but returned blank text.
    pub empty_response: String,

    /// Generation or posting failed.
    pub failed_response: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            empty_response: "No response".to_string(),
            failed_response: "_[Unable to respond]_".to_string(),
        }
    }
}

/// Minimum delays between external steps, used to respect provider rate limits.
///
/// Serialized as milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacePolicy {
    /// After posting a location's alert, before its bots respond.
    #[serde(with = "millis")]
    pub after_alert: Duration,

    /// After each bot post.
    #[serde(with = "millis")]
    pub between_bots: Duration,

    /// After building a round's context, before its bots respond.
    #[serde(with = "millis")]
    pub before_responses: Duration,

    /// Between consecutive rounds.
    #[serde(with = "millis")]
    pub between_rounds: Duration,

    /// After posting the run summary, before creating channels.
    #[serde(with = "millis")]
    pub settle: Duration,
}

impl PacePolicy {
    /// No delays at all.
    pub const fn none() -> Self {
        Self {
            after_alert: Duration::ZERO,
            between_bots: Duration::ZERO,
            before_responses: Duration::ZERO,
            between_rounds: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }

    /// Sleep for `delay`, skipping the timer entirely when it is zero.
    pub async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for PacePolicy {
    fn default() -> Self {
        Self {
            after_alert: Duration::from_millis(500),
            between_bots: Duration::from_millis(300),
            before_responses: Duration::from_millis(500),
            between_rounds: Duration::from_millis(1000),
            settle: Duration::from_millis(500),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.context_window, 10);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.channel_name_limit, 100);
        assert_eq!(config.pace.between_bots, Duration::from_millis(300));
        assert_eq!(config.pace.between_rounds, Duration::from_secs(1));
        assert_eq!(config.seed, None);
    }

    #[test]
    #[traced_test]
    fn test_unset_seed_resolves_once_and_is_logged() {
        let mut config = SimulationConfig::default();

        let seed = config.resolve_seed();
        assert_eq!(config.seed, Some(seed));
        assert_eq!(config.resolve_seed(), seed);
        assert!(logs_contain("Drew random seed"));
        assert!(logs_contain(&format!("seed={}", seed)));
    }

    #[test]
    #[traced_test]
    fn test_explicit_seed_is_kept() {
        let mut config = SimulationConfig::default().with_seed(42);
        assert_eq!(config.resolve_seed(), 42);
        assert!(!logs_contain("Drew random seed"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            round_count = 5
            seed = 7

            [pace]
            between_bots = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.round_count, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.location_count, 4);
        assert_eq!(config.pace.between_bots, Duration::ZERO);
        assert_eq!(config.pace.after_alert, Duration::from_millis(500));
        assert_eq!(config.placeholders, Placeholders::default());
    }

    #[test]
    fn test_none_has_no_delays() {
        let pace = PacePolicy::none();
        assert!(pace.after_alert.is_zero());
        assert!(pace.settle.is_zero());
        assert_eq!(SimulationConfig::new(4, 1).with_pace(pace).pace, pace);
    }
}
