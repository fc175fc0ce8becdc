//! End-to-end orchestration of a simulation run.
//!
//! # Phases
//!
//! ```text
//! setup       post summary in parent, create one channel per location
//!             created -> ready
//! alert       ready -> running, alert phase
//! rounds      round 1..=round_count, summary edited after each
//! completion  running -> complete
//! ```
//!
//! Only a `created` record is run; any other record is rejected untouched.
//! A failure outside the scheduler's per-step containment (summary post,
//! channel creation, record mutation) is run-fatal: the record moves to
//! `error`, the summary is edited best-effort, and the error is returned.

use crate::board;
use crate::config::{PacePolicy, SimulationConfig};
use crate::error::RunError;
use crate::prompt;
use crate::provider::{ChannelOptions, ChannelProvider, TextGenerator};
use crate::report::SimulationReport;
use crate::scheduler::RoundScheduler;
use std::sync::Arc;
use std::time::SystemTime;
use townsim_core::{
    SimulationObserver, SimulationRecord, SimulationStatus, SimulationStore, TracingObserver,
};
use townsim_types::{ChannelId, MessageId, MessageOrigin, SimulationId};
use tracing::{error, info, warn};

/// Runs simulations against a channel provider and a text generator.
pub struct SimulationRunner {
    channels: Arc<dyn ChannelProvider>,
    generator: Arc<dyn TextGenerator>,
    observer: Arc<dyn SimulationObserver>,
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Create a runner that reports lifecycle events through [`TracingObserver`].
    pub fn new(
        channels: Arc<dyn ChannelProvider>,
        generator: Arc<dyn TextGenerator>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            channels,
            generator,
            observer: Arc::new(TracingObserver),
            config,
        }
    }

    /// Replace the lifecycle observer.
    pub fn with_observer(mut self, observer: Arc<dyn SimulationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run a `created` record to completion, with channels under `parent`.
    pub async fn run(
        &self,
        record: &mut SimulationRecord,
        parent: &ChannelId,
    ) -> Result<SimulationReport, RunError> {
        if record.status() != SimulationStatus::Created {
            warn!(
                simulation = %record.id(),
                status = %record.status(),
                "Refusing to run simulation"
            );
            return Err(RunError::NotCreated {
                simulation: record.id().clone(),
                status: record.status(),
            });
        }

        let scheduler = self.scheduler();
        let mut summary = None;

        match self.drive(&scheduler, record, parent, &mut summary).await {
            Ok(()) => {
                let report = SimulationReport::from_record(record);
                info!(
                    simulation = %record.id(),
                    messages = report.messages_posted,
                    responses = report.responses,
                    rounds = report.rounds_completed,
                    "Simulation complete"
                );
                Ok(report)
            }
            Err(err) => {
                error!(simulation = %record.id(), error = %err, "Simulation failed");
                record.fail(SystemTime::now());
                scheduler.flush(record);
                if let Some(message) = &summary {
                    self.edit_summary(record.id(), parent, message, &board::error_text(&err))
                        .await;
                }
                Err(err)
            }
        }
    }

    /// Check a record out of `store`, run it, and check it back in.
    ///
    /// The record is returned to the store whether or not the run succeeds.
    /// A run error takes precedence over a failed checkin, which is logged.
    pub async fn run_stored(
        &self,
        store: &SimulationStore,
        id: &SimulationId,
        parent: &ChannelId,
    ) -> Result<SimulationReport, RunError> {
        let mut record = store.checkout(id)?;
        let result = self.run(&mut record, parent).await;
        match (result, store.checkin(record)) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), checkin) => {
                if let Err(checkin_err) = checkin {
                    warn!(
                        simulation = %id,
                        error = %checkin_err,
                        "Failed to check simulation back in"
                    );
                }
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        scheduler: &RoundScheduler<'_>,
        record: &mut SimulationRecord,
        parent: &ChannelId,
        summary: &mut Option<MessageId>,
    ) -> Result<(), RunError> {
        scheduler.flush(record);

        // Setup
        let message = self
            .channels
            .post_message(parent, &board::setup_text(record), MessageOrigin::System)
            .await?;
        *summary = Some(message.clone());
        PacePolicy::pause(self.config.pace.settle).await;

        self.create_channels(record, parent).await?;
        scheduler.flush(record);

        self.transition(scheduler, record, SimulationStatus::Ready)?;
        self.edit_summary(record.id(), parent, &message, &board::ready_text(record))
            .await;

        // Alert
        self.transition(scheduler, record, SimulationStatus::Running)?;
        scheduler.run_alert_phase(record).await;
        self.edit_summary(
            record.id(),
            parent,
            &message,
            &board::alert_complete_text(record),
        )
        .await;

        // Rounds
        let round_count = record.round_count();
        for round in 1..=round_count {
            scheduler.run_round(record, round).await?;
            self.edit_summary(
                record.id(),
                parent,
                &message,
                &board::round_progress_text(record, round),
            )
            .await;
            if round < round_count {
                PacePolicy::pause(self.config.pace.between_rounds).await;
            }
        }

        // Completion
        self.transition(scheduler, record, SimulationStatus::Complete)?;
        self.edit_summary(record.id(), parent, &message, &board::completion_text(record))
            .await;
        Ok(())
    }

    async fn create_channels(
        &self,
        record: &mut SimulationRecord,
        parent: &ChannelId,
    ) -> Result<(), RunError> {
        let names: Vec<(String, String)> = record
            .locations()
            .iter()
            .map(|l| {
                let channel_name =
                    prompt::channel_name(&l.location, l.bots.len(), self.config.channel_name_limit);
                (l.name().to_string(), channel_name)
            })
            .collect();

        for (location, channel_name) in names {
            let channel = self
                .channels
                .create_channel(parent, &channel_name, ChannelOptions::default())
                .await?;
            record.set_location_channel(&location, channel)?;
        }
        Ok(())
    }

    fn transition(
        &self,
        scheduler: &RoundScheduler<'_>,
        record: &mut SimulationRecord,
        status: SimulationStatus,
    ) -> Result<(), RunError> {
        let result = record.update_status(status, SystemTime::now());
        scheduler.flush(record);
        result.map_err(RunError::from)
    }

    /// Edit the summary message, logging failures.
    async fn edit_summary(
        &self,
        simulation: &SimulationId,
        parent: &ChannelId,
        message: &MessageId,
        text: &str,
    ) {
        if let Err(err) = self.channels.edit_message(parent, message, text).await {
            warn!(%simulation, error = %err, "Failed to update summary");
        }
    }

    fn scheduler(&self) -> RoundScheduler<'_> {
        RoundScheduler::new(
            self.channels.as_ref(),
            self.generator.as_ref(),
            self.observer.as_ref(),
            &self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryChannels;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use std::time::UNIX_EPOCH;
    use townsim_core::StoreError;
    use townsim_types::{Bot, CapacityRange, Location, LocationKind};

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str, persona: &str) -> Result<String, ProviderError> {
            Ok(format!("{} checking in", persona))
        }
    }

    fn record(round_count: u32) -> SimulationRecord {
        SimulationRecord::new(
            SimulationId::new("sim_runner"),
            "Ice storm",
            round_count,
            vec![
                (
                    Location::new("Library", LocationKind::Public, CapacityRange::new(1, 3))
                        .with_glyph("📚"),
                    vec![Bot::new("Maya", 1.0).with_persona("maya")],
                ),
                (
                    Location::new("Church", LocationKind::Community, CapacityRange::new(1, 3))
                        .with_glyph("⛪"),
                    vec![
                        Bot::new("Carlos", 1.0).with_persona("carlos"),
                        Bot::new("Maria", 1.0).with_persona("maria"),
                    ],
                ),
            ],
            UNIX_EPOCH,
        )
    }

    fn runner(channels: Arc<MemoryChannels>) -> SimulationRunner {
        SimulationRunner::new(
            channels,
            Arc::new(Echo),
            SimulationConfig::new(2, 2).with_pace(PacePolicy::none()),
        )
    }

    #[tokio::test]
    async fn test_run_completes_and_edits_summary() {
        let channels = Arc::new(MemoryChannels::new());
        let parent = channels.open_root("emergency-sim");
        let mut record = record(2);

        let report = runner(channels.clone())
            .run(&mut record, &parent)
            .await
            .unwrap();

        assert_eq!(record.status(), SimulationStatus::Complete);
        assert!(record.completed_at().is_some());
        assert_eq!(report.rounds_completed, 2);
        // Library: alert + 1 bot x 3 passes; Church: alert + 2 bots x 3 passes.
        assert_eq!(report.messages_posted, 4 + 7);
        assert_eq!(report.responses, 9);

        let children = channels.children(&parent);
        assert_eq!(children.len(), 2);
        assert_eq!(
            channels.channel_name(&children[0]).as_deref(),
            Some("📚 Library (1 residents)")
        );

        let summary = channels.messages(&parent);
        assert_eq!(summary.len(), 1);
        assert!(summary[0].text.contains("SIMULATION COMPLETE"));
    }

    #[tokio::test]
    async fn test_missing_parent_is_fatal() {
        let channels = Arc::new(MemoryChannels::new());
        let missing_parent = ChannelId::new("nowhere");
        let mut record = record(1);

        let err = runner(channels)
            .run(&mut record, &missing_parent)
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Provider(ProviderError::UnknownChannel(_))));
        assert_eq!(record.status(), SimulationStatus::Error);
        assert_eq!(record.stats().messages_posted, 0);
    }

    #[tokio::test]
    async fn test_run_rejects_failed_record_untouched() {
        let channels = Arc::new(MemoryChannels::new());
        let parent = channels.open_root("root");
        let mut record = record(1);
        record.fail(UNIX_EPOCH);

        let err = runner(channels.clone())
            .run(&mut record, &parent)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunError::NotCreated {
                status: SimulationStatus::Error,
                ..
            }
        ));
        assert_eq!(record.status(), SimulationStatus::Error);
        assert!(channels.messages(&parent).is_empty());
    }

    #[tokio::test]
    async fn test_run_leaves_ready_record_ready() {
        let channels = Arc::new(MemoryChannels::new());
        let parent = channels.open_root("root");
        let mut record = record(1);
        record
            .update_status(SimulationStatus::Ready, UNIX_EPOCH)
            .unwrap();

        let err = runner(channels.clone())
            .run(&mut record, &parent)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunError::NotCreated {
                status: SimulationStatus::Ready,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Simulation sim_runner is ready, only created simulations can run"
        );
        assert_eq!(record.status(), SimulationStatus::Ready);
        assert!(channels.messages(&parent).is_empty());
        assert!(channels.children(&parent).is_empty());
    }

    /// Discards the simulation from the store on the first post, then
    /// either fails that post or forwards it.
    struct DiscardingChannels {
        inner: MemoryChannels,
        store: Arc<SimulationStore>,
        id: SimulationId,
        fail_posts: bool,
    }

    #[async_trait]
    impl ChannelProvider for DiscardingChannels {
        async fn create_channel(
            &self,
            parent: &ChannelId,
            name: &str,
            options: ChannelOptions,
        ) -> Result<ChannelId, ProviderError> {
            self.inner.create_channel(parent, name, options).await
        }

        async fn post_message(
            &self,
            channel: &ChannelId,
            text: &str,
            origin: MessageOrigin,
        ) -> Result<MessageId, ProviderError> {
            let _ = self.store.discard(&self.id);
            if self.fail_posts {
                return Err(ProviderError::Channel("service unavailable".into()));
            }
            self.inner.post_message(channel, text, origin).await
        }

        async fn fetch_recent_messages(
            &self,
            channel: &ChannelId,
            limit: usize,
        ) -> Result<Vec<crate::provider::ChannelMessage>, ProviderError> {
            self.inner.fetch_recent_messages(channel, limit).await
        }

        async fn edit_message(
            &self,
            channel: &ChannelId,
            message: &MessageId,
            text: &str,
        ) -> Result<(), ProviderError> {
            self.inner.edit_message(channel, message, text).await
        }
    }

    fn discarding_runner(
        fail_posts: bool,
    ) -> (SimulationRunner, Arc<SimulationStore>, ChannelId) {
        let store = Arc::new(SimulationStore::new());
        store.insert(record(1)).unwrap();
        let inner = MemoryChannels::new();
        let parent = inner.open_root("root");
        let channels = DiscardingChannels {
            inner,
            store: store.clone(),
            id: SimulationId::new("sim_runner"),
            fail_posts,
        };
        let runner = SimulationRunner::new(
            Arc::new(channels),
            Arc::new(Echo),
            SimulationConfig::new(2, 1).with_pace(PacePolicy::none()),
        );
        (runner, store, parent)
    }

    #[tokio::test]
    async fn test_run_stored_prefers_run_error_over_checkin_error() {
        let (runner, store, parent) = discarding_runner(true);
        let id = SimulationId::new("sim_runner");

        let err = runner.run_stored(&store, &id, &parent).await.unwrap_err();

        assert!(matches!(err, RunError::Provider(ProviderError::Channel(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_run_stored_reports_checkin_error_after_success() {
        let (runner, store, parent) = discarding_runner(false);
        let id = SimulationId::new("sim_runner");

        let err = runner.run_stored(&store, &id, &parent).await.unwrap_err();

        assert!(matches!(err, RunError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_run_stored_checks_record_back_in() {
        let channels = Arc::new(MemoryChannels::new());
        let parent = channels.open_root("root");
        let store = SimulationStore::new();
        store.insert(record(1)).unwrap();
        let id = SimulationId::new("sim_runner");

        runner(channels).run_stored(&store, &id, &parent).await.unwrap();

        assert_eq!(store.status(&id).unwrap(), SimulationStatus::Complete);
        assert_eq!(store.snapshot(&id).unwrap().stats.rounds_completed, 1);
    }
}
