//! Hub identifiers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RadialError;

/// One of the two radial input zones, each driven by its own stick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hub {
    Left,
    Right,
}

impl Hub {
    /// Both hubs, left first
    pub const ALL: [Hub; 2] = [Hub::Left, Hub::Right];

    /// Position of this hub in per-hub arrays
    pub fn index(self) -> usize {
        match self {
            Hub::Left => 0,
            Hub::Right => 1,
        }
    }
}

impl std::fmt::Display for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hub::Left => write!(f, "left"),
            Hub::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Hub {
    type Err = RadialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Hub::Left),
            "right" | "r" => Ok(Hub::Right),
            _ => Err(RadialError::UnknownHub(s.to_string())),
        }
    }
}
