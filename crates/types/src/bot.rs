//! Persona-bearing simulated participants.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A simulated resident.
///
/// Bots are defined once and never mutated. The persona is opaque to the
/// allocator and scheduler; it is handed to the text generator verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    /// Unique display name.
    pub name: String,

    /// Display glyph shown beside the name.
    #[serde(default)]
    pub glyph: String,

    /// Free-form role tag (e.g. `elderly`, `student`).
    #[serde(default)]
    pub role: String,

    /// Sparse location name -> affinity weight.
    #[serde(default)]
    pub affinities: HashMap<String, f64>,

    /// Weight for locations absent from `affinities`.
    pub default_weight: f64,

    /// Persona descriptor passed through to text generation.
    #[serde(default)]
    pub persona: String,
}

impl Bot {
    pub fn new(name: impl Into<String>, default_weight: f64) -> Self {
        Self {
            name: name.into(),
            glyph: String::new(),
            role: String::new(),
            affinities: HashMap::new(),
            default_weight,
            persona: String::new(),
        }
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_affinity(mut self, location: impl Into<String>, weight: f64) -> Self {
        self.affinities.insert(location.into(), weight);
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Weight of `location` for this bot, falling back to the default weight.
    pub fn weight_for(&self, location: &str) -> f64 {
        self.affinities
            .get(location)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Name with the glyph prefixed, as shown in channel posts.
    pub fn display_name(&self) -> String {
        if self.glyph.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.glyph, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_falls_back_to_default() {
        let bot = Bot::new("Harold", 0.25).with_affinity("Beachside Library", 0.5);
        assert_eq!(bot.weight_for("Beachside Library"), 0.5);
        assert_eq!(bot.weight_for("Harbor Marina"), 0.25);
    }

    #[test]
    fn test_explicit_zero_affinity_is_not_replaced() {
        let bot = Bot::new("Frank", 0.25).with_affinity("Beachside Library", 0.0);
        assert_eq!(bot.weight_for("Beachside Library"), 0.0);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Bot::new("Wei", 0.25).display_name(), "Wei");
        assert_eq!(
            Bot::new("Wei", 0.25).with_glyph("🇨🇳").display_name(),
            "🇨🇳 Wei"
        );
    }
}
