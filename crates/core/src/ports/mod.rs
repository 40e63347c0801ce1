//! Capability Ports
//!
//! Narrow interfaces the plan engine needs from the host environment.
//! Platform implementations (the game bridge, the SITL world, test mocks)
//! live outside this crate.
//!
//! # Contents
//!
//! - [`MovementControl`]: autopilot block (speed cap, waypoints, modes)
//! - [`DockingPort`]: connector hardware with tri-state status
//! - [`ShipSystems`]: gyros, thrusters, batteries, drills, cargo
//! - [`StatusSink`]: single overwritable status line
//! - [`TickControl`]: requested polling cadence
//!
//! Every mutating call returns `Result<(), PortError>` so that a block that
//! stops responding surfaces as a runtime fault at the executor boundary.

mod error;
mod tick;

use heapless::Vec;

pub use error::PortError;
pub use tick::TickRate;

use crate::fullness::Fill;
use crate::waypoint::{Position, Waypoint};

/// Maximum number of drills resolved in one lookup
pub const MAX_DRILLS: usize = 16;

/// Connector state as reported by the docking port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorStatus {
    /// Nothing in range
    Unconnected,
    /// Another connector is in range and can be locked
    Connectable,
    /// Physically locked to another connector
    Connected,
}

/// Autopilot flight completion behaviour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightMode {
    /// Cycle through the waypoint list forever
    Patrol,
    /// Return to the first waypoint after the last one
    Circle,
    /// Stop at the destination
    OneWay,
}

/// Ship-relative direction the autopilot treats as "forward"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Battery charge management
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeMode {
    /// Charge and discharge as the grid needs
    Auto,
    /// Only take charge, never supply
    Recharge,
}

/// Block groups the program depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockGroup {
    Cargo,
    Thrusters,
    Batteries,
    Gyros,
    Drills,
}

impl BlockGroup {
    /// Group name for logging and status lines
    pub fn name(&self) -> &'static str {
        match self {
            BlockGroup::Cargo => "cargo",
            BlockGroup::Thrusters => "thrusters",
            BlockGroup::Batteries => "batteries",
            BlockGroup::Gyros => "gyros",
            BlockGroup::Drills => "drills",
        }
    }
}

impl core::fmt::Display for BlockGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-assigned identity of a single terminal block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

/// Drills captured by one lookup
pub type DrillGroup = Vec<BlockId, MAX_DRILLS>;

/// Gyro override rates in RPM
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GyroRates {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl GyroRates {
    /// Hold attitude: all rates zero
    pub const ZERO: Self = Self {
        pitch: 0.0,
        roll: 0.0,
        yaw: 0.0,
    };
}

/// Autopilot (remote control) block
pub trait MovementControl {
    /// Cap autopilot speed (m/s)
    fn set_speed_limit(&mut self, speed: f32) -> Result<(), PortError>;

    /// Append a waypoint to the autopilot route
    fn add_waypoint(&mut self, waypoint: &Waypoint) -> Result<(), PortError>;

    /// Drop every queued waypoint
    fn clear_waypoints(&mut self) -> Result<(), PortError>;

    /// Precision docking approach on/off
    fn set_docking_mode(&mut self, enabled: bool) -> Result<(), PortError>;

    fn set_collision_avoidance(&mut self, enabled: bool) -> Result<(), PortError>;

    fn set_autopilot_enabled(&mut self, enabled: bool) -> Result<(), PortError>;

    fn set_flight_mode(&mut self, mode: FlightMode) -> Result<(), PortError>;

    /// When `true` the autopilot holds position while its path is obstructed
    fn set_wait_for_free_way(&mut self, wait: bool) -> Result<(), PortError>;

    fn set_direction(&mut self, direction: Direction) -> Result<(), PortError>;

    fn set_handbrake(&mut self, engaged: bool) -> Result<(), PortError>;

    /// Current world position of the controller
    fn position(&self) -> Result<Position, PortError>;
}

/// Connector block used to latch onto home and mine pads
pub trait DockingPort {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PortError>;

    /// Lock onto a connector in range
    fn connect(&mut self) -> Result<(), PortError>;

    fn disconnect(&mut self) -> Result<(), PortError>;

    fn status(&self) -> Result<ConnectorStatus, PortError>;

    /// Current world position of the connector
    fn position(&self) -> Result<Position, PortError>;

    /// `true` only when physically locked
    fn is_connected(&self) -> Result<bool, PortError> {
        Ok(self.status()? == ConnectorStatus::Connected)
    }
}

/// Ship-wide actuator groups and storage
///
/// Groups belong to the ship and outlive any single action; actions only
/// borrow them for the duration of a call.
pub trait ShipSystems {
    /// `None` releases the override, `Some(rates)` overrides every gyro
    fn set_gyro_override(&mut self, rates: Option<GyroRates>) -> Result<(), PortError>;

    fn set_thrusters_enabled(&mut self, enabled: bool) -> Result<(), PortError>;

    fn set_charge_mode(&mut self, mode: ChargeMode) -> Result<(), PortError>;

    /// Fresh drill lookup; drills are never assumed stable across calls
    fn find_drills(&mut self) -> Result<DrillGroup, PortError>;

    fn set_drill_enabled(&mut self, drill: BlockId, enabled: bool) -> Result<(), PortError>;

    /// Summed cargo volume over all containers
    fn cargo_fill(&self) -> Result<Fill, PortError>;

    /// Summed stored energy over all batteries
    fn power_fill(&self) -> Result<Fill, PortError>;
}

/// Destination of the per-tick status line
pub trait StatusSink {
    /// Replace the status line. No history is kept by the engine.
    fn report(&mut self, line: &str);
}

/// Host scheduler cadence
pub trait TickControl {
    fn rate(&self) -> TickRate;

    /// Request a new cadence; an empty rate stops ticking
    fn set_rate(&mut self, rate: TickRate);
}
