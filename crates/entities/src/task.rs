//! Task entity definitions.

use serde::{Deserialize, Serialize};

/// Status of a task.
///
/// Serializes as the fixed display label; the integer codes are what the
/// database store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    /// Not started.
    #[default]
    #[serde(rename = "À faire")]
    Todo,
    /// Being worked on.
    #[serde(rename = "En cours")]
    InProgress,
    /// Finished.
    #[serde(rename = "Terminé")]
    Done,
}

impl TaskStatus {
    /// The three recognized display labels, in code order.
    pub const LABELS: [&'static str; 3] = ["À faire", "En cours", "Terminé"];

    /// Parses a display label. Anything outside [`Self::LABELS`] is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "À faire" => Some(Self::Todo),
            "En cours" => Some(Self::InProgress),
            "Terminé" => Some(Self::Done),
            _ => None,
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "À faire",
            Self::InProgress => "En cours",
            Self::Done => "Terminé",
        }
    }

    /// Returns the integer code used in the persisted representation.
    pub fn code(&self) -> i32 {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Parses a persisted integer code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Todo),
            1 => Some(Self::InProgress),
            2 => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store on creation and immutable
    /// afterwards.
    pub id: i64,
    /// Human-readable name, never empty.
    pub name: String,
    /// Current status.
    pub status: TaskStatus,
    /// Optional free-form description.
    pub description: Option<String>,
}
