//! Course section model.
//!
//! A section is immutable reference data: identity, the scheduled
//! day/time slot, and the minimum number of TAs it requires.
//! Sections sharing the same `daytime` label meet at the same time,
//! which is what the time-conflict objective keys on.

use serde::{Deserialize, Serialize};

/// A course section needing TA support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Day/time slot label (e.g. `"R 9:50-11:30"`). Exact-match equality
    /// defines a shared slot.
    pub daytime: String,
    /// Minimum required TA count.
    pub min_ta: u32,
}

impl Section {
    /// Creates a new section.
    pub fn new(id: impl Into<String>, daytime: impl Into<String>, min_ta: u32) -> Self {
        Self {
            id: id.into(),
            daytime: daytime.into(),
            min_ta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_fields() {
        let s = Section::new("sec-0", "R 9:50-11:30", 2);
        assert_eq!(s.id, "sec-0");
        assert_eq!(s.daytime, "R 9:50-11:30");
        assert_eq!(s.min_ta, 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let s = Section::new("sec-1", "M 2:50-4:30", 1);
        let json = serde_json::to_string(&s).unwrap();
        let back: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "sec-1");
        assert_eq!(back.daytime, "M 2:50-4:30");
        assert_eq!(back.min_ta, 1);
    }
}
