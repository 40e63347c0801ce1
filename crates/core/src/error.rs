//! Engine Error Types
//!
//! Two families: configuration faults found once at startup, and runtime
//! faults caught at the executor boundary. Both end in the terminal
//! `Broken` state; they differ only in when they are detected.

use core::fmt;

use heapless::String;

use crate::ports::{BlockGroup, PortError};

/// Maximum stored length of a block name in an error
pub const MAX_BLOCK_NAME_LEN: usize = 48;

/// Faults in the static ship setup or configuration text
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required named block is not on the grid
    MissingBlock {
        /// Configured block name (truncated to [`MAX_BLOCK_NAME_LEN`])
        name: String<MAX_BLOCK_NAME_LEN>,
    },
    /// A required block group has no members
    EmptyGroup { group: BlockGroup },
    /// Configuration text does not hold exactly two GPS entries
    WaypointCount { found: usize },
    /// GPS entry at `index` has a missing or non-numeric coordinate
    MalformedWaypoint { index: usize },
    /// Waypoint label does not fit
    LabelTooLong { len: usize },
}

impl ConfigError {
    /// Missing-block error for `name`, truncated to fit
    pub fn missing_block(name: &str) -> Self {
        let mut stored = String::new();
        for c in name.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        ConfigError::MissingBlock { name: stored }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBlock { name } => {
                write!(f, "can't find block: '{}'", name)
            }
            ConfigError::EmptyGroup { group } => {
                write!(f, "no {} blocks on this grid", group)
            }
            ConfigError::WaypointCount { found } => write!(
                f,
                "custom data needs exactly 2 GPS waypoints (home, then mine), found {}",
                found
            ),
            ConfigError::MalformedWaypoint { index } => {
                write!(f, "GPS waypoint #{} is malformed", index + 1)
            }
            ConfigError::LabelTooLong { len } => {
                write!(f, "waypoint label is {} bytes, too long", len)
            }
        }
    }
}

/// Any fault that breaks the drone
#[derive(Debug, Clone, PartialEq)]
pub enum DroneError {
    /// Static setup is wrong
    Config(ConfigError),
    /// A port call failed mid-mission
    Port(PortError),
    /// Follow-ups did not fit in the plan
    PlanFull { capacity: usize },
    /// A block group reported zero total capacity
    NoCapacity { group: BlockGroup },
    /// Restarted with nothing to do and not docked
    NotDocked,
    /// Operator requested a manual stop
    Aborted,
}

impl fmt::Display for DroneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DroneError::Config(e) => write!(f, "configuration error: {}", e),
            DroneError::Port(e) => write!(f, "hardware fault: {}", e),
            DroneError::PlanFull { capacity } => {
                write!(f, "plan overflow (capacity {})", capacity)
            }
            DroneError::NoCapacity { group } => {
                write!(f, "{} report zero capacity", group)
            }
            DroneError::NotDocked => f.write_str(
                "not docked and no plan: please fly me to a docking port, then restart me",
            ),
            DroneError::Aborted => f.write_str("user requested abort"),
        }
    }
}

impl From<ConfigError> for DroneError {
    fn from(e: ConfigError) -> Self {
        DroneError::Config(e)
    }
}

impl From<PortError> for DroneError {
    fn from(e: PortError) -> Self {
        DroneError::Port(e)
    }
}
