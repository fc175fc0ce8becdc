//! Final report of a simulation run.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use townsim_core::{SimulationRecord, SimulationStatus};
use townsim_types::SimulationId;

/// Outcome of a single location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationReport {
    pub name: String,
    pub glyph: String,
    pub residents: usize,
    pub messages: u64,
    pub rounds_completed: u32,
}

/// Summary of a finished (or failed) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub id: SimulationId,
    pub status: SimulationStatus,
    pub emergency_message: String,
    pub locations: Vec<LocationReport>,
    /// Every counted message, alerts included.
    pub messages_posted: u64,
    /// Bot messages: total minus one alert per location.
    pub responses: u64,
    pub rounds_completed: u32,
    pub round_count: u32,
    pub duration: Option<Duration>,
}

impl SimulationReport {
    pub fn from_record(record: &SimulationRecord) -> Self {
        let stats = record.stats();
        let locations: Vec<LocationReport> = record
            .locations()
            .iter()
            .map(|l| LocationReport {
                name: l.name().to_string(),
                glyph: l.location.glyph.clone(),
                residents: l.bots.len(),
                messages: l.message_count,
                rounds_completed: l.current_round,
            })
            .collect();

        Self {
            id: record.id().clone(),
            status: record.status(),
            emergency_message: record.emergency_message().to_string(),
            responses: stats
                .messages_posted
                .saturating_sub(locations.len() as u64),
            locations,
            messages_posted: stats.messages_posted,
            rounds_completed: stats.rounds_completed,
            round_count: record.round_count(),
            duration: record.duration(),
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🏁 SIMULATION {}", self.status.as_str().to_uppercase())?;
        writeln!(f)?;
        writeln!(f, "Emergency: {}", self.emergency_message)?;
        writeln!(f)?;
        writeln!(f, "Final Statistics:")?;
        for location in &self.locations {
            writeln!(
                f,
                "  • {} {}: {} messages ({} residents, round {}/{})",
                location.glyph,
                location.name,
                location.messages,
                location.residents,
                location.rounds_completed,
                self.round_count
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total Messages: {}", self.responses)?;
        writeln!(
            f,
            "Rounds Completed: {}/{}",
            self.rounds_completed, self.round_count
        )?;
        write!(
            f,
            "Duration: {} seconds",
            self.duration.map(|d| d.as_secs_f64().round() as u64).unwrap_or(0)
        )
    }
}
