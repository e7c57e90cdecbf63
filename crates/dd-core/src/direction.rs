//! Migration direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of a migration to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply pending migrations, oldest first
    Up,
    /// Revert applied migrations, newest first
    Down,
}

impl Direction {
    /// Label used in completion output ("Upgrade complete: ...").
    pub fn completion_label(self) -> &'static str {
        match self {
            Direction::Up => "Upgrade",
            Direction::Down => "Downgrade",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}
