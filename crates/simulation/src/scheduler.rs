//! Alert and conversation-round scheduling.
//!
//! # Order
//!
//! ```text
//! alert phase:  for location in record order
//!                   post alert
//!                   for bot in roster order: generate, post
//! round r:      for location in record order
//!                   fetch history -> context (bot posts only)
//!                   for bot in roster order: generate, post
//!                   set_location_round(location, r)
//!               complete_round()
//! ```
//!
//! Everything runs sequentially; round `r` is fully processed before round
//! `r + 1` starts, so its context reflects the previous round's final state.
//!
//! # Containment
//!
//! - A bot whose generation fails, times out, or returns blank text gets a
//!   placeholder post, which is counted like any other message.
//! - A location whose channel operations fail is logged and skipped; its
//!   round is not recorded, and other locations carry on.
//! - Only `complete_round` failures escape to the caller.

use crate::config::{PacePolicy, SimulationConfig};
use crate::context::build_context;
use crate::error::RunError;
use crate::prompt;
use crate::provider::{ChannelProvider, ProviderError, TextGenerator};
use townsim_core::{SimulationObserver, SimulationRecord};
use townsim_types::{Bot, ChannelId, Location, MessageOrigin};
use tracing::{debug, info, warn};

/// Drives the alert phase and conversation rounds of one record.
pub struct RoundScheduler<'a> {
    channels: &'a dyn ChannelProvider,
    generator: &'a dyn TextGenerator,
    observer: &'a dyn SimulationObserver,
    config: &'a SimulationConfig,
}

/// Snapshot of what a location step needs, taken so the record can be
/// mutated while the step runs.
struct LocationStep {
    location: Location,
    bots: Vec<Bot>,
    channel: ChannelId,
}

impl<'a> RoundScheduler<'a> {
    pub fn new(
        channels: &'a dyn ChannelProvider,
        generator: &'a dyn TextGenerator,
        observer: &'a dyn SimulationObserver,
        config: &'a SimulationConfig,
    ) -> Self {
        Self {
            channels,
            generator,
            observer,
            config,
        }
    }

    /// Post the alert in every location and collect each bot's first reaction.
    pub async fn run_alert_phase(&self, record: &mut SimulationRecord) {
        for index in 0..record.locations().len() {
            let name = record.locations()[index].name().to_string();
            match self.alert_location(record, index).await {
                Ok(()) => info!(
                    simulation = %record.id(),
                    location = %name,
                    "Initial responses complete"
                ),
                Err(err) => warn!(
                    simulation = %record.id(),
                    location = %name,
                    error = %err,
                    "Alert phase failed for location"
                ),
            }
            self.flush(record);
        }
    }

    /// Run conversation round `round` across every location, then count it.
    pub async fn run_round(
        &self,
        record: &mut SimulationRecord,
        round: u32,
    ) -> Result<(), RunError> {
        info!(
            simulation = %record.id(),
            round,
            round_count = record.round_count(),
            "Starting round"
        );

        for index in 0..record.locations().len() {
            let name = record.locations()[index].name().to_string();
            match self.round_location(record, index, round).await {
                Ok(()) => debug!(
                    simulation = %record.id(),
                    location = %name,
                    round,
                    "Location round complete"
                ),
                Err(err) => warn!(
                    simulation = %record.id(),
                    location = %name,
                    round,
                    error = %err,
                    "Round failed for location"
                ),
            }
            self.flush(record);
        }

        let result = record.complete_round();
        self.flush(record);
        result.map(|_| ()).map_err(RunError::from)
    }

    async fn alert_location(
        &self,
        record: &mut SimulationRecord,
        index: usize,
    ) -> Result<(), RunError> {
        let step = Self::step(record, index)?;
        let emergency = record.emergency_message().to_string();

        let alert = prompt::alert_text(&emergency, &step.location);
        self.channels
            .post_message(&step.channel, &alert, MessageOrigin::Alert)
            .await?;
        record.increment_message_count(&step.location.name, 1)?;
        PacePolicy::pause(self.config.pace.after_alert).await;

        let request = prompt::alert_prompt(&emergency, &step.location);
        for bot in &step.bots {
            self.respond(record, &step, bot, &request).await?;
        }
        Ok(())
    }

    async fn round_location(
        &self,
        record: &mut SimulationRecord,
        index: usize,
        round: u32,
    ) -> Result<(), RunError> {
        let step = Self::step(record, index)?;

        let history = self
            .channels
            .fetch_recent_messages(&step.channel, self.config.history_limit)
            .await?;
        let context = build_context(&history, self.config.context_window);
        PacePolicy::pause(self.config.pace.before_responses).await;

        let request = prompt::round_prompt(&step.location, &context);
        for bot in &step.bots {
            self.respond(record, &step, bot, &request).await?;
        }

        record.set_location_round(&step.location.name, round)?;
        Ok(())
    }

    /// Generate and post one bot's message, falling back to a placeholder.
    ///
    /// Only record mutation errors are returned.
    async fn respond(
        &self,
        record: &mut SimulationRecord,
        step: &LocationStep,
        bot: &Bot,
        request: &str,
    ) -> Result<(), RunError> {
        let placeholders = &self.config.placeholders;
        let text = match self.generate(request, &bot.persona).await {
            Ok(text) if text.trim().is_empty() => placeholders.empty_response.clone(),
            Ok(text) => text,
            Err(err) => {
                warn!(
                    simulation = %record.id(),
                    location = %step.location.name,
                    bot = %bot.name,
                    error = %err,
                    "Generation failed"
                );
                placeholders.failed_response.clone()
            }
        };

        let origin = MessageOrigin::bot(&bot.name);
        let post = prompt::format_post(bot, &text);
        let posted = match self
            .channels
            .post_message(&step.channel, &post, origin.clone())
            .await
        {
            Ok(id) => Ok(id),
            Err(err) => {
                warn!(
                    simulation = %record.id(),
                    location = %step.location.name,
                    bot = %bot.name,
                    error = %err,
                    "Post failed, posting placeholder"
                );
                let fallback = prompt::format_post(bot, &placeholders.failed_response);
                self.channels
                    .post_message(&step.channel, &fallback, origin)
                    .await
            }
        };

        match posted {
            Ok(_) => {
                record.increment_message_count(&step.location.name, 1)?;
                debug!(location = %step.location.name, bot = %bot.name, "Bot responded");
            }
            Err(err) => warn!(
                simulation = %record.id(),
                location = %step.location.name,
                bot = %bot.name,
                error = %err,
                "Placeholder post failed"
            ),
        }

        PacePolicy::pause(self.config.pace.between_bots).await;
        Ok(())
    }

    async fn generate(&self, prompt: &str, persona: &str) -> Result<String, ProviderError> {
        tokio::time::timeout(
            self.config.generation_timeout,
            self.generator.generate(prompt, persona),
        )
        .await
        .map_err(|_| ProviderError::Timeout)?
    }

    fn step(record: &SimulationRecord, index: usize) -> Result<LocationStep, RunError> {
        let state = &record.locations()[index];
        let channel = state
            .channel
            .clone()
            .ok_or_else(|| RunError::MissingChannel {
                location: state.name().to_string(),
            })?;
        Ok(LocationStep {
            location: state.location.clone(),
            bots: state.bots.clone(),
            channel,
        })
    }

    /// Forward queued lifecycle events to the observer.
    pub(crate) fn flush(&self, record: &mut SimulationRecord) {
        let events = record.drain_events();
        for event in &events {
            self.observer.on_event(record.id(), event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryChannels;
    use crate::provider::ChannelOptions;
    use async_trait::async_trait;
    use std::time::{Duration, UNIX_EPOCH};
    use townsim_core::NoopObserver;
    use townsim_types::{CapacityRange, LocationKind, SimulationId};
    use tracing_test::traced_test;

    /// Replies with the bot's persona, or fails for the named persona.
    struct PersonaEcho {
        fail_for: Option<&'static str>,
    }

    #[async_trait]
    impl TextGenerator for PersonaEcho {
        async fn generate(&self, _prompt: &str, persona: &str) -> Result<String, ProviderError> {
            if Some(persona) == self.fail_for {
                return Err(ProviderError::Generation("model offline".to_string()));
            }
            Ok(format!("{} speaking", persona))
        }
    }

    struct Silent;

    #[async_trait]
    impl TextGenerator for Silent {
        async fn generate(&self, _prompt: &str, _persona: &str) -> Result<String, ProviderError> {
            Ok("   ".to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl TextGenerator for Stalled {
        async fn generate(&self, _prompt: &str, _persona: &str) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(2, 2).with_pace(PacePolicy::none())
    }

    async fn setup(channels: &MemoryChannels, round_count: u32) -> SimulationRecord {
        let mut record = SimulationRecord::new(
            SimulationId::new("sim_sched"),
            "Wildfire nearby",
            round_count,
            vec![
                (
                    Location::new("Diner", LocationKind::Commercial, CapacityRange::new(1, 3)),
                    vec![
                        Bot::new("Ann", 1.0).with_persona("ann"),
                        Bot::new("Bob", 1.0).with_persona("bob"),
                    ],
                ),
                (
                    Location::new("Pier", LocationKind::Public, CapacityRange::new(1, 3)),
                    vec![Bot::new("Cat", 1.0).with_persona("cat")],
                ),
            ],
            UNIX_EPOCH,
        );
        let root = channels.open_root("root");
        for name in ["Diner", "Pier"] {
            let channel = channels
                .create_channel(&root, name, ChannelOptions::default())
                .await
                .unwrap();
            record.set_location_channel(name, channel).unwrap();
        }
        record
    }

    #[tokio::test]
    async fn test_alert_phase_posts_alert_then_bots() {
        let channels = MemoryChannels::new();
        let mut record = setup(&channels, 1).await;
        let config = config();
        let generator = PersonaEcho { fail_for: None };
        let scheduler = RoundScheduler::new(&channels, &generator, &NoopObserver, &config);

        scheduler.run_alert_phase(&mut record).await;

        let diner = channels.messages(record.location_channel("Diner").unwrap());
        assert_eq!(diner.len(), 3);
        assert_eq!(diner[0].origin, MessageOrigin::Alert);
        assert!(diner[0].text.contains("Wildfire nearby"));
        assert_eq!(diner[1].text, "**Ann**\nann speaking");
        assert_eq!(diner[2].origin, MessageOrigin::bot("Bob"));

        assert_eq!(record.location("Diner").unwrap().message_count, 3);
        assert_eq!(record.location("Pier").unwrap().message_count, 2);
        assert_eq!(record.stats().messages_posted, 5);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_failed_generation_posts_counted_placeholder() {
        let channels = MemoryChannels::new();
        let mut record = setup(&channels, 1).await;
        let config = config();
        let generator = PersonaEcho { fail_for: Some("bob") };
        let scheduler = RoundScheduler::new(&channels, &generator, &NoopObserver, &config);

        scheduler.run_alert_phase(&mut record).await;
        scheduler.run_round(&mut record, 1).await.unwrap();

        let diner = channels.messages(record.location_channel("Diner").unwrap());
        assert_eq!(diner[2].text, "**Bob**\n_[Unable to respond]_");
        assert_eq!(record.location("Diner").unwrap().message_count, 5);
        assert_eq!(record.location("Diner").unwrap().current_round, 1);
        assert!(logs_contain("Generation failed"));
    }

    #[tokio::test]
    async fn test_blank_response_uses_empty_placeholder() {
        let channels = MemoryChannels::new();
        let mut record = setup(&channels, 1).await;
        let config = config();
        let scheduler = RoundScheduler::new(&channels, &Silent, &NoopObserver, &config);

        scheduler.run_alert_phase(&mut record).await;

        let pier = channels.messages(record.location_channel("Pier").unwrap());
        assert_eq!(pier[1].text, "**Cat**\nNo response");
        assert_eq!(record.location("Pier").unwrap().message_count, 2);
    }

    #[tokio::test]
    async fn test_generation_timeout_degrades_to_placeholder() {
        let channels = MemoryChannels::new();
        let mut record = setup(&channels, 1).await;
        let config = config().with_generation_timeout(Duration::from_millis(20));
        let scheduler = RoundScheduler::new(&channels, &Stalled, &NoopObserver, &config);

        scheduler.run_alert_phase(&mut record).await;

        let pier = channels.messages(record.location_channel("Pier").unwrap());
        assert_eq!(pier[1].text, "**Cat**\n_[Unable to respond]_");
    }

    #[tokio::test]
    async fn test_round_context_excludes_alert() {
        struct PromptCapture(parking_lot::Mutex<Vec<String>>);

        #[async_trait]
        impl TextGenerator for PromptCapture {
            async fn generate(&self, prompt: &str, persona: &str) -> Result<String, ProviderError> {
                self.0.lock().push(prompt.to_string());
                Ok(format!("{} here", persona))
            }
        }

        let channels = MemoryChannels::new();
        let mut record = setup(&channels, 1).await;
        let config = config();
        let generator = PromptCapture(parking_lot::Mutex::new(Vec::new()));
        let scheduler = RoundScheduler::new(&channels, &generator, &NoopObserver, &config);

        scheduler.run_alert_phase(&mut record).await;
        scheduler.run_round(&mut record, 1).await.unwrap();

        let prompts = generator.0.lock();
        // 3 alert prompts, then Diner's two round prompts and Pier's one.
        let diner_round = &prompts[3];
        assert!(diner_round.contains("**Ann**\nann here\n\n**Bob**\nbob here"));
        assert!(!diner_round.contains("EMERGENCY ALERT"));
        assert!(!diner_round.contains("cat here"));
    }

    #[tokio::test]
    async fn test_missing_channel_contained_per_location() {
        let channels = MemoryChannels::new();
        let root = channels.open_root("root");
        let mut record = SimulationRecord::new(
            SimulationId::new("sim_partial"),
            "Flood",
            1,
            vec![
                (
                    Location::new("A", LocationKind::Public, CapacityRange::new(1, 2)),
                    vec![Bot::new("x", 1.0)],
                ),
                (
                    Location::new("B", LocationKind::Public, CapacityRange::new(1, 2)),
                    vec![Bot::new("y", 1.0)],
                ),
            ],
            UNIX_EPOCH,
        );
        let b = channels
            .create_channel(&root, "B", ChannelOptions::default())
            .await
            .unwrap();
        record.set_location_channel("B", b).unwrap();

        let config = config();
        let generator = PersonaEcho { fail_for: None };
        let scheduler = RoundScheduler::new(&channels, &generator, &NoopObserver, &config);

        scheduler.run_alert_phase(&mut record).await;
        scheduler.run_round(&mut record, 1).await.unwrap();

        assert_eq!(record.location("A").unwrap().message_count, 0);
        assert_eq!(record.location("A").unwrap().current_round, 0);
        assert_eq!(record.location("B").unwrap().message_count, 3);
        assert_eq!(record.location("B").unwrap().current_round, 1);
        assert_eq!(record.stats().rounds_completed, 1);
    }

    #[tokio::test]
    async fn test_round_beyond_count_is_fatal() {
        let channels = MemoryChannels::new();
        let mut record = setup(&channels, 1).await;
        let config = config();
        let generator = PersonaEcho { fail_for: None };
        let scheduler = RoundScheduler::new(&channels, &generator, &NoopObserver, &config);

        scheduler.run_round(&mut record, 1).await.unwrap();
        let err = scheduler.run_round(&mut record, 2).await.unwrap_err();
        assert!(matches!(
            err,
            RunError::Simulation(townsim_core::SimulationError::RoundsExhausted { round_count: 1 })
        ));
        assert_eq!(record.stats().rounds_completed, 1);
    }
}
