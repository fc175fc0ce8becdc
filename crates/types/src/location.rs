//! Locations and their capacity bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Inclusive bounds on how many bots a location may host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapacityRange {
    pub min: usize,
    pub max: usize,
}

impl CapacityRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check if `count` bots fit within the bounds.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }

    /// Check if `count` bots fill the location.
    pub fn is_full(&self, count: usize) -> bool {
        count >= self.max
    }
}

impl Add for CapacityRange {
    type Output = CapacityRange;

    fn add(self, rhs: Self) -> Self::Output {
        CapacityRange {
            min: self.min.saturating_add(rhs.min),
            max: self.max.saturating_add(rhs.max),
        }
    }
}

impl Sum for CapacityRange {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(CapacityRange::default(), Add::add)
    }
}

impl fmt::Display for CapacityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Category of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Commercial,
    Public,
    Community,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocationKind::Commercial => "commercial",
            LocationKind::Public => "public",
            LocationKind::Community => "community",
        };
        f.write_str(name)
    }
}

/// A capacity-bounded venue. Catalog entries are immutable; `name` is the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub kind: LocationKind,
    pub capacity: CapacityRange,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub glyph: String,
}

impl Location {
    pub fn new(name: impl Into<String>, kind: LocationKind, capacity: CapacityRange) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity,
            description: String::new(),
            glyph: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_sum() {
        let total: CapacityRange = [
            CapacityRange::new(6, 10),
            CapacityRange::new(8, 14),
            CapacityRange::new(4, 7),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, CapacityRange::new(18, 31));
    }

    #[test]
    fn test_capacity_sum_saturates() {
        let total: CapacityRange = [
            CapacityRange::new(usize::MAX - 1, usize::MAX),
            CapacityRange::new(5, 5),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, CapacityRange::new(usize::MAX, usize::MAX));
    }

    #[test]
    fn test_capacity_bounds_are_inclusive() {
        let range = CapacityRange::new(4, 8);
        assert!(!range.contains(3));
        assert!(range.contains(4));
        assert!(range.contains(8));
        assert!(!range.contains(9));
        assert!(!range.is_full(7));
        assert!(range.is_full(8));
    }
}
