//! Allocation results and their post-condition checks.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use townsim_types::{Bot, Location};

/// Bots placed at one location.
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    pub location: Location,
    pub bots: Vec<Bot>,
}

impl Roster {
    fn is_full(&self) -> bool {
        self.location.capacity.is_full(self.bots.len())
    }
}

/// Location name -> roster, in the order locations were chosen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Assignment {
    rosters: IndexMap<String, Roster>,
}

impl Assignment {
    /// Empty rosters for each location.
    pub fn empty(locations: &[Location]) -> Self {
        let rosters = locations
            .iter()
            .map(|l| {
                (
                    l.name.clone(),
                    Roster {
                        location: l.clone(),
                        bots: Vec::new(),
                    },
                )
            })
            .collect();
        Self { rosters }
    }

    /// Append `bot` to the named roster. Returns whether the roster is now full,
    /// or `None` if the location is not part of this assignment.
    pub(crate) fn place(&mut self, location: &str, bot: Bot) -> Option<bool> {
        let roster = self.rosters.get_mut(location)?;
        roster.bots.push(bot);
        Some(roster.is_full())
    }

    /// Bots assigned to a location.
    pub fn bots_at(&self, location: &str) -> Option<&[Bot]> {
        self.rosters.get(location).map(|r| r.bots.as_slice())
    }

    pub fn rosters(&self) -> impl Iterator<Item = &Roster> {
        self.rosters.values()
    }

    /// Number of locations (including empty ones).
    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    /// Total bots placed across all locations.
    pub fn total_bots(&self) -> usize {
        self.rosters.values().map(|r| r.bots.len()).sum()
    }

    /// Consume into `(location, bots)` pairs in location order.
    pub fn into_rosters(self) -> impl Iterator<Item = (Location, Vec<Bot>)> {
        self.rosters.into_values().map(|r| (r.location, r.bots))
    }

    /// Check the allocation post-conditions against the inputs it was built from.
    ///
    /// Over-capacity, duplicates, omissions and missing locations are errors;
    /// a location below its minimum is only a warning.
    pub fn validate(&self, bots: &[Bot], locations: &[Location]) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut assigned: HashSet<&str> = HashSet::new();
        for roster in self.rosters.values() {
            for bot in &roster.bots {
                if !assigned.insert(bot.name.as_str()) {
                    report
                        .errors
                        .push(format!("Bot {} assigned to multiple locations", bot.name));
                }
            }
        }

        let total = self.total_bots();
        if total != bots.len() {
            report
                .errors
                .push(format!("Not all bots assigned: {}/{}", total, bots.len()));
        }
        for bot in bots {
            if !assigned.contains(bot.name.as_str()) {
                report.errors.push(format!("Bot {} not assigned", bot.name));
            }
        }

        for (name, roster) in &self.rosters {
            let count = roster.bots.len();
            let capacity = roster.location.capacity;
            if count > capacity.max {
                report
                    .errors
                    .push(format!("{} over capacity: {}/{}", name, count, capacity.max));
            }
            if count < capacity.min {
                report
                    .warnings
                    .push(format!("{} under minimum: {}/{}", name, count, capacity.min));
            }
        }

        for location in locations {
            if !self.rosters.contains_key(&location.name) {
                report.errors.push(format!(
                    "Location {} missing from assignments",
                    location.name
                ));
            }
        }

        report
    }

    /// Summary statistics over the rosters.
    pub fn stats(&self) -> AssignmentStats {
        let location_counts: IndexMap<String, usize> = self
            .rosters
            .iter()
            .map(|(name, r)| (name.clone(), r.bots.len()))
            .collect();
        let total_bots: usize = location_counts.values().sum();
        let average_per_location = if location_counts.is_empty() {
            0.0
        } else {
            total_bots as f64 / location_counts.len() as f64
        };

        AssignmentStats {
            total_bots,
            min_bots: location_counts.values().copied().min().unwrap_or(0),
            max_bots: location_counts.values().copied().max().unwrap_or(0),
            average_per_location,
            location_counts,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for roster in self.rosters.values() {
            let capacity = roster.location.capacity;
            let count = roster.bots.len();
            let marker = if capacity.contains(count) { "✓" } else { "⚠" };

            writeln!(f, "{} {} {}", marker, roster.location.glyph, roster.location.name)?;
            writeln!(f, "   Capacity: {}/{}", count, capacity)?;
            writeln!(f, "   Residents:")?;
            for bot in &roster.bots {
                writeln!(f, "     {} ({})", bot.display_name(), bot.role)?;
            }
            writeln!(f)?;
        }
        write!(f, "Total bots assigned: {}", self.total_bots())
    }
}

/// Outcome of [`Assignment::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Hard failures; any entry invalidates the allocation.
    pub errors: Vec<String>,
    /// Non-fatal observations.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Distribution of bots across locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStats {
    pub total_bots: usize,
    pub location_counts: IndexMap<String, usize>,
    pub average_per_location: f64,
    pub min_bots: usize,
    pub max_bots: usize,
}
