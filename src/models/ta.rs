//! Teaching assistant model.
//!
//! A TA is immutable reference data: identity, the maximum number of
//! sections they may be assigned, and one preference label per section
//! column of the assignment matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A TA's stated preference for one section.
///
/// CSV labels: `P` (preferred), `W` (willing), `U` (unwilling),
/// empty or `0` (unspecified).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    /// The TA asked for this section.
    Preferred,
    /// The TA will take this section if needed.
    Willing,
    /// The TA does not want this section.
    Unwilling,
    /// No preference recorded.
    #[default]
    Unspecified,
}

impl Preference {
    /// Single-letter dataset label (empty string for unspecified).
    pub fn label(&self) -> &'static str {
        match self {
            Preference::Preferred => "P",
            Preference::Willing => "W",
            Preference::Unwilling => "U",
            Preference::Unspecified => "",
        }
    }
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "P" => Ok(Preference::Preferred),
            "W" => Ok(Preference::Willing),
            "U" => Ok(Preference::Unwilling),
            "" | "0" => Ok(Preference::Unspecified),
            other => Err(format!("unknown preference label: {other:?}")),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A teaching assistant available for section assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ta {
    /// Unique TA identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Maximum number of sections this TA may be assigned.
    pub max_assigned: u32,
    /// Preference label per section, in section-column order.
    pub preferences: Vec<Preference>,
}

impl Ta {
    /// Creates a new TA with the given ID and assignment limit.
    pub fn new(id: impl Into<String>, max_assigned: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            max_assigned,
            preferences: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the full per-section preference vector.
    pub fn with_preferences(mut self, preferences: Vec<Preference>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Appends one section preference.
    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preferences.push(preference);
        self
    }

    /// Preference for a section column (`Unspecified` if out of range).
    pub fn preference_for(&self, section: usize) -> Preference {
        self.preferences
            .get(section)
            .copied()
            .unwrap_or(Preference::Unspecified)
    }
}
