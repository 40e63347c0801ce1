//! Waypoints and Mission Sites
//!
//! Pure data types for the two fixed mission sites and the configuration
//! text they are read from.
//!
//! # Waypoint Format
//!
//! Waypoints use the game's GPS clipboard format:
//!
//! ```text
//! GPS:<label>:<x>:<y>:<z>:
//! ```
//!
//! Anything between entries (newlines, notes, a trailing colour field such
//! as `#FF75C9F1:`) is ignored. The mission needs exactly two entries: the
//! first is home, the second is the mine.

mod parse;

use core::fmt;

use heapless::String;
use nalgebra::Vector3;

pub use parse::{parse_gps, MAX_PARSED_WAYPOINTS};

use crate::error::ConfigError;

/// World-space position (metres)
pub type Position = Vector3<f64>;

/// Maximum waypoint label length in bytes
pub const MAX_LABEL_LEN: usize = 32;

/// One of the two ends of the mining route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Site {
    Home,
    Mine,
}

impl Site {
    /// Site for an `at_mine` / `toward_mine` flag
    pub fn from_at_mine(at_mine: bool) -> Self {
        if at_mine {
            Site::Mine
        } else {
            Site::Home
        }
    }

    /// The other end of the route
    pub fn opposite(self) -> Self {
        match self {
            Site::Home => Site::Mine,
            Site::Mine => Site::Home,
        }
    }

    pub fn is_mine(self) -> bool {
        self == Site::Mine
    }

    pub fn name(self) -> &'static str {
        match self {
            Site::Home => "home",
            Site::Mine => "mine",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named world coordinate
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
    /// Target coordinates
    pub coords: Position,
}

impl Waypoint {
    /// Create a waypoint.
    ///
    /// Returns `Err` if the label is longer than [`MAX_LABEL_LEN`].
    pub fn new(label: &str, coords: Position) -> Result<Self, ConfigError> {
        let mut owned = String::new();
        owned
            .push_str(label)
            .map_err(|_| ConfigError::LabelTooLong { len: label.len() })?;
        Ok(Self {
            label: owned,
            coords,
        })
    }

    /// Straight-line distance from `position` to this waypoint
    pub fn distance_to(&self, position: &Position) -> f64 {
        (self.coords - position).norm()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GPS:{}:{}:{}:{}:",
            self.label, self.coords.x, self.coords.y, self.coords.z
        )
    }
}

/// The two fixed mission sites
///
/// Read once at startup and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct MissionWaypoints {
    pub home: Waypoint,
    pub mine: Waypoint,
}

impl MissionWaypoints {
    pub fn new(home: Waypoint, mine: Waypoint) -> Self {
        Self { home, mine }
    }

    /// Read the mission from configuration text.
    ///
    /// Requires exactly two GPS entries: home first, then the mine.
    pub fn from_custom_data(text: &str) -> Result<Self, ConfigError> {
        let mut waypoints = parse_gps(text)?;
        if waypoints.len() != 2 {
            return Err(ConfigError::WaypointCount {
                found: waypoints.len(),
            });
        }

        let mine = waypoints.pop();
        let home = waypoints.pop();
        match (home, mine) {
            (Some(home), Some(mine)) => Ok(Self { home, mine }),
            _ => Err(ConfigError::WaypointCount { found: 0 }),
        }
    }

    /// Waypoint for a site
    pub fn get(&self, site: Site) -> &Waypoint {
        match site {
            Site::Home => &self.home,
            Site::Mine => &self.mine,
        }
    }
}
