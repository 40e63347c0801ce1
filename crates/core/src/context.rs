//! Ship context handed to every action call

use core::fmt::{self, Write};

use heapless::String;

use crate::error::DroneError;
use crate::ports::{BlockGroup, DockingPort, MovementControl, ShipSystems, StatusSink, TickControl};
use crate::waypoint::MissionWaypoints;

/// Capacity of one status line, header included
pub const STATUS_LINE_LEN: usize = 384;

/// Borrowed capability ports for the duration of one call
///
/// Actions never hold on to hardware; the host builds a fresh context for
/// every tick and the executor passes it down.
pub struct ShipContext<'a> {
    pub movement: &'a mut dyn MovementControl,
    pub docking_port: &'a mut dyn DockingPort,
    pub systems: &'a mut dyn ShipSystems,
    pub status: &'a mut dyn StatusSink,
    pub ticks: &'a mut dyn TickControl,
    pub waypoints: &'a MissionWaypoints,
}

impl<'a> ShipContext<'a> {
    /// Replace the status line with the mission header followed by `message`.
    ///
    /// Overlong lines are cut on a character boundary at [`STATUS_LINE_LEN`].
    pub fn report(&mut self, message: fmt::Arguments<'_>) {
        let mut line: String<STATUS_LINE_LEN> = String::new();
        let mut out = Truncating {
            line: &mut line,
            full: false,
        };
        // Truncating never fails
        let _ = write!(
            out,
            "home: {}\nmine: {}\n",
            self.waypoints.home, self.waypoints.mine
        );
        let _ = out.write_fmt(message);
        self.status.report(&line);
    }

    /// Cargo fill ratio over all containers
    pub fn cargo_fullness(&self) -> Result<f32, DroneError> {
        self.systems
            .cargo_fill()?
            .ratio()
            .ok_or(DroneError::NoCapacity {
                group: BlockGroup::Cargo,
            })
    }

    /// Stored energy ratio over all batteries
    pub fn power_fullness(&self) -> Result<f32, DroneError> {
        self.systems
            .power_fill()?
            .ratio()
            .ok_or(DroneError::NoCapacity {
                group: BlockGroup::Batteries,
            })
    }
}

/// Writer that keeps whole characters up to the line capacity and drops
/// the rest
struct Truncating<'b> {
    line: &'b mut String<STATUS_LINE_LEN>,
    full: bool,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full {
                break;
            }
            self.full = self.line.push(c).is_err();
        }
        Ok(())
    }
}
