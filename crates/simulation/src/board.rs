//! Text of the run summary message in the parent channel.
//!
//! The runner posts [`setup_text`] once and then edits the same message as
//! the run progresses.

use townsim_core::SimulationRecord;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

/// Header: emergency, locations, rounds, and residents.
pub fn header(record: &SimulationRecord) -> String {
    let locations: Vec<String> = record
        .locations()
        .iter()
        .map(|l| {
            format!(
                "• {} **{}** ({} residents)",
                l.location.glyph,
                l.name(),
                l.bots.len()
            )
        })
        .collect();

    format!(
        "🚨 **EMERGENCY SIMULATION**\n\n\
         **Emergency:** {}\n\n\
         **Locations ({}):**\n{}\n\n\
         **Conversation Rounds:** {}\n\
         **Total Residents:** {}",
        record.emergency_message(),
        record.locations().len(),
        locations.join("\n"),
        record.round_count(),
        record.stats().total_bots
    )
}

/// Posted before any channel exists.
pub fn setup_text(record: &SimulationRecord) -> String {
    format!("{}\n\n⏳ Simulation starting...", header(record))
}

fn channel_list(record: &SimulationRecord) -> String {
    let lines: Vec<String> = record
        .locations()
        .iter()
        .map(|l| {
            let channel = l.channel.as_ref().map(|c| c.as_str()).unwrap_or("-");
            format!("• <#{}> - {} residents", channel, l.bots.len())
        })
        .collect();
    format!("**Location Channels:**\n{}", lines.join("\n"))
}

fn message_counts(record: &SimulationRecord, with_rounds: bool) -> String {
    record
        .locations()
        .iter()
        .map(|l| {
            let mut line = format!(
                "• {} **{}**: {} messages",
                l.location.glyph,
                l.name(),
                l.message_count
            );
            if with_rounds {
                line.push_str(&format!(
                    " (Round {}/{})",
                    l.current_round,
                    record.round_count()
                ));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// All channels created.
pub fn ready_text(record: &SimulationRecord) -> String {
    format!(
        "{}\n\n{}\n\n✅ Setup complete! Posting the emergency alert...",
        header(record),
        channel_list(record)
    )
}

/// Alert phase finished.
pub fn alert_complete_text(record: &SimulationRecord) -> String {
    format!(
        "{}\n\n{}\n\n\
         ✅ Emergency alert posted to all locations!\n\
         ✅ All {} residents have responded!\n\n\
         **Current Status:**\n{}\n\n\
         ⏳ Starting conversation rounds...",
        header(record),
        channel_list(record),
        record.stats().total_bots,
        message_counts(record, false)
    )
}

/// Round `round` finished.
pub fn round_progress_text(record: &SimulationRecord, round: u32) -> String {
    let round_count = record.round_count();
    let next = if round < round_count {
        format!("⏳ Starting round {}...", round + 1)
    } else {
        "⏳ Finalizing simulation...".to_string()
    };

    format!(
        "{}\n\n{}\n\n\
         ✅ Emergency alert posted!\n\
         ✅ Initial responses complete!\n\
         🔄 **Conversation Round {}/{} complete!**\n\n\
         **Current Status:**\n{}\n\n\
         **Total Messages:** {}\n\n{}",
        header(record),
        channel_list(record),
        round,
        round_count,
        message_counts(record, true),
        record.stats().messages_posted,
        next
    )
}

/// Run complete.
pub fn completion_text(record: &SimulationRecord) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n\
         🏁 **SIMULATION COMPLETE!** 🏁\n\n\
         **Final Statistics:**\n{}\n\n\
         **Total Messages:** {}\n\
         **Rounds Completed:** {}/{}\n\
         **Total Residents:** {}\n\n\
         ✅ All conversations archived in the location channels above.",
        header(record),
        channel_list(record),
        DIVIDER,
        message_counts(record, false),
        record.stats().messages_posted,
        record.stats().rounds_completed,
        record.round_count(),
        record.stats().total_bots
    )
}

/// Run aborted.
pub fn error_text(error: &dyn std::error::Error) -> String {
    format!("❌ **Simulation Error**\n\n{}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;
    use townsim_types::{Bot, CapacityRange, ChannelId, Location, LocationKind, SimulationId};

    fn record() -> SimulationRecord {
        let mut record = SimulationRecord::new(
            SimulationId::new("sim_board"),
            "Tornado warning",
            2,
            vec![(
                Location::new("Harbor Marina", LocationKind::Commercial, CapacityRange::new(1, 4))
                    .with_glyph("⚓"),
                vec![Bot::new("Richard", 0.25), Bot::new("William", 0.25)],
            )],
            UNIX_EPOCH,
        );
        record
            .set_location_channel("Harbor Marina", ChannelId::new("ch-2"))
            .unwrap();
        record
    }

    #[test]
    fn test_setup_text() {
        let text = setup_text(&record());
        assert!(text.starts_with("🚨 **EMERGENCY SIMULATION**"));
        assert!(text.contains("**Emergency:** Tornado warning"));
        assert!(text.contains("• ⚓ **Harbor Marina** (2 residents)"));
        assert!(text.contains("**Conversation Rounds:** 2"));
    }

    #[test]
    fn test_round_progress_text() {
        let mut record = record();
        record.increment_message_count("Harbor Marina", 3).unwrap();
        record.set_location_round("Harbor Marina", 1).unwrap();

        let text = round_progress_text(&record, 1);
        assert!(text.contains("• <#ch-2> - 2 residents"));
        assert!(text.contains("**Harbor Marina**: 3 messages (Round 1/2)"));
        assert!(text.ends_with("⏳ Starting round 2..."));
        assert!(round_progress_text(&record, 2).ends_with("⏳ Finalizing simulation..."));
    }

    #[test]
    fn test_completion_text() {
        let text = completion_text(&record());
        assert!(text.contains("🏁 **SIMULATION COMPLETE!** 🏁"));
        assert!(text.contains("**Rounds Completed:** 0/2"));
    }
}
