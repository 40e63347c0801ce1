//! Final docking approach

use crate::context::ShipContext;
use crate::error::DroneError;
use crate::ports::{ConnectorStatus, Direction, FlightMode, TickRate};

use super::{follow_ups, Action, FollowUps, SitAtDockingPort};

/// Autopilot speed cap during the approach (m/s)
pub const DOCKING_SPEED_LIMIT: f32 = 1.0;

/// Creep down onto the pad below until the connector finds a partner
///
/// Runs on the fast tick cadence so the lock happens soon after contact.
#[derive(Debug, PartialEq)]
pub struct Dock {
    /// Pad belongs to the mine station (otherwise home)
    pub toward_mine: bool,
}

impl Dock {
    pub fn new(toward_mine: bool) -> Self {
        Self { toward_mine }
    }

    pub(super) fn begin(&mut self, ship: &mut ShipContext<'_>) -> Result<(), DroneError> {
        let rate = ship.ticks.rate();
        ship.ticks.set_rate(rate | TickRate::DOCKING);

        ship.movement.set_flight_mode(FlightMode::OneWay)?;
        ship.docking_port.set_enabled(true)?;
        ship.movement.set_direction(Direction::Down)?;
        ship.movement.set_speed_limit(DOCKING_SPEED_LIMIT)?;
        ship.movement.set_docking_mode(true)?;
        ship.movement.set_collision_avoidance(false)?;
        ship.movement.set_autopilot_enabled(true)?;
        Ok(())
    }

    pub(super) fn step(&mut self, ship: &mut ShipContext<'_>) -> Result<bool, DroneError> {
        let status = ship.docking_port.status()?;
        ship.report(format_args!(
            "docking at {}: connector {:?}",
            if self.toward_mine { "mine" } else { "home" },
            status
        ));
        // Connectable and Connected both count as arrival
        Ok(status == ConnectorStatus::Unconnected)
    }

    pub(super) fn end(self, ship: &mut ShipContext<'_>) -> Result<FollowUps, DroneError> {
        let rate = ship.ticks.rate();
        ship.ticks.set_rate(rate - TickRate::DOCKING);

        ship.docking_port.connect()?;
        ship.movement.set_autopilot_enabled(false)?;

        follow_ups([Action::Sit(SitAtDockingPort::new(self.toward_mine))])
    }
}
