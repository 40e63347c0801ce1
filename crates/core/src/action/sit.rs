//! Parked at a pad: mine until full, or unload and recharge

use crate::context::ShipContext;
use crate::error::DroneError;
use crate::ports::{ChargeMode, DrillGroup, GyroRates};
use crate::waypoint::Site;

use super::{follow_ups, Action, Dock, FlyToWaypoint, FollowUps};

/// Cargo ratio at which mining stops
pub const MINE_CARGO_FULL: f32 = 0.9;

/// Cargo ratio at or below which the hold counts as unloaded
pub const HOME_CARGO_EMPTY: f32 = 0.01;

/// Power ratio at or above which the batteries count as charged
pub const HOME_POWER_TOPPED: f32 = 0.9;

/// Sit on the connector until the site's work is done
///
/// At the mine the station drills run until the hold is full. At home the
/// batteries recharge while the base pulls cargo off the ship; the sit ends
/// once the hold is empty or the batteries are charged, whichever is first.
#[derive(Debug, PartialEq)]
pub struct SitAtDockingPort {
    pub at_mine: bool,
    /// Drills switched on at `begin`; empty at home
    pub drills: DrillGroup,
}

impl SitAtDockingPort {
    pub fn new(at_mine: bool) -> Self {
        Self {
            at_mine,
            drills: DrillGroup::new(),
        }
    }

    pub fn site(&self) -> Site {
        Site::from_at_mine(self.at_mine)
    }

    pub(super) fn begin(&mut self, ship: &mut ShipContext<'_>) -> Result<(), DroneError> {
        ship.systems.set_gyro_override(None)?;
        ship.systems.set_thrusters_enabled(false)?;

        if self.at_mine {
            self.drills = ship.systems.find_drills()?;
            for drill in self.drills.iter() {
                ship.systems.set_drill_enabled(*drill, true)?;
            }
        } else {
            ship.systems.set_charge_mode(ChargeMode::Recharge)?;
        }
        Ok(())
    }

    pub(super) fn step(&mut self, ship: &mut ShipContext<'_>) -> Result<bool, DroneError> {
        let cargo = ship.cargo_fullness()?;

        if self.at_mine {
            ship.report(format_args!(
                "mining with {} drills: cargo {:.0}%",
                self.drills.len(),
                cargo * 100.0
            ));
            Ok(cargo < MINE_CARGO_FULL)
        } else {
            let power = ship.power_fullness()?;
            ship.report(format_args!(
                "unloading: cargo {:.0}%, power {:.0}%",
                cargo * 100.0,
                power * 100.0
            ));
            Ok(cargo > HOME_CARGO_EMPTY && power < HOME_POWER_TOPPED)
        }
    }

    pub(super) fn end(mut self, ship: &mut ShipContext<'_>) -> Result<FollowUps, DroneError> {
        ship.systems.set_gyro_override(Some(GyroRates::ZERO))?;
        ship.systems.set_thrusters_enabled(true)?;
        for drill in self.drills.iter() {
            ship.systems.set_drill_enabled(*drill, false)?;
        }
        self.drills.clear();
        ship.systems.set_charge_mode(ChargeMode::Auto)?;
        ship.movement.set_handbrake(false)?;
        ship.docking_port.disconnect()?;
        ship.docking_port.set_enabled(false)?;

        let next = self.site().opposite();
        let target = ship.waypoints.get(next);
        follow_ups([
            Action::Fly(FlyToWaypoint::fast(target.clone())),
            Action::Fly(FlyToWaypoint::precise(target.clone())),
            Action::Dock(Dock::new(next.is_mine())),
        ])
    }
}
