//! Autopilot flight to a single waypoint

use crate::context::ShipContext;
use crate::error::DroneError;
use crate::ports::FlightMode;
use crate::waypoint::Waypoint;

use super::FollowUps;

/// Autopilot speed cap while cruising (m/s)
pub const CRUISE_SPEED_LIMIT: f32 = 20.0;

/// Arrival radius for the fast leg (m)
pub const FAST_CLOSENESS: f64 = 50.0;

/// Arrival radius for the precise leg (m); only an exact arrival counts
pub const PRECISE_CLOSENESS: f64 = 0.0;

/// How a flight leg trades speed for accuracy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedProfile {
    /// Collision avoidance on, done within [`FAST_CLOSENESS`]
    Fast,
    /// Docking-mode approach, done only on arrival
    Precise,
}

impl SpeedProfile {
    pub fn is_fast(self) -> bool {
        self == SpeedProfile::Fast
    }

    /// Arrival radius for this profile
    pub fn closeness(self) -> f64 {
        match self {
            SpeedProfile::Fast => FAST_CLOSENESS,
            SpeedProfile::Precise => PRECISE_CLOSENESS,
        }
    }
}

/// Fly the connector to `target`
#[derive(Debug, PartialEq)]
pub struct FlyToWaypoint {
    pub target: Waypoint,
    pub profile: SpeedProfile,
}

impl FlyToWaypoint {
    pub fn new(target: Waypoint, profile: SpeedProfile) -> Self {
        Self { target, profile }
    }

    pub fn fast(target: Waypoint) -> Self {
        Self::new(target, SpeedProfile::Fast)
    }

    pub fn precise(target: Waypoint) -> Self {
        Self::new(target, SpeedProfile::Precise)
    }

    pub(super) fn begin(&mut self, ship: &mut ShipContext<'_>) -> Result<(), DroneError> {
        let fast = self.profile.is_fast();
        let movement = &mut *ship.movement;
        movement.set_speed_limit(CRUISE_SPEED_LIMIT)?;
        movement.add_waypoint(&self.target)?;
        movement.set_docking_mode(!fast)?;
        movement.set_collision_avoidance(fast)?;
        movement.set_autopilot_enabled(true)?;
        movement.set_flight_mode(FlightMode::OneWay)?;
        movement.set_wait_for_free_way(false)?;
        Ok(())
    }

    pub(super) fn step(&mut self, ship: &mut ShipContext<'_>) -> Result<bool, DroneError> {
        let distance = self.target.distance_to(&ship.docking_port.position()?);
        ship.report(format_args!(
            "flying to {} ({}), {:.1} m left",
            self.target.label,
            if self.profile.is_fast() { "fast" } else { "precise" },
            distance
        ));
        Ok(distance > self.profile.closeness())
    }

    pub(super) fn end(self, ship: &mut ShipContext<'_>) -> Result<FollowUps, DroneError> {
        ship.movement.clear_waypoints()?;
        Ok(FollowUps::new())
    }
}
