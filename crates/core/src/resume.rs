//! Cold-restart recovery
//!
//! The plan lives only in memory, so after a restart the executor starts
//! with nothing to do. The one fact that survives is physical: whether the
//! connector is locked to a pad. A docked drone resumes by sitting where it
//! is; the site is identified by whether station drills are reachable
//! through the connector. An undocked drone has no safe way to continue
//! and refuses.

use crate::action::{Action, SitAtDockingPort};
use crate::context::ShipContext;
use crate::error::DroneError;
use crate::snapshot::{Phase, Snapshot};
use crate::waypoint::Site;

/// Outcome of inspecting the ship with an empty plan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeDecision {
    /// Docked: seed the plan with a sit at this site
    Seed(Site),
    /// Not docked: ask for a human
    Refuse,
}

impl ResumeDecision {
    /// Seed action for this decision, or the refusal fault
    pub fn into_action(self) -> Result<Action, DroneError> {
        match self {
            ResumeDecision::Seed(site) => {
                Ok(Action::Sit(SitAtDockingPort::new(site.is_mine())))
            }
            ResumeDecision::Refuse => Err(DroneError::NotDocked),
        }
    }
}

/// Read the dock fact and decide how to resume
pub fn decide(ship: &mut ShipContext<'_>) -> Result<ResumeDecision, DroneError> {
    if !ship.docking_port.is_connected()? {
        return Ok(ResumeDecision::Refuse);
    }

    let drills = ship.systems.find_drills()?;
    Ok(ResumeDecision::Seed(Site::from_at_mine(!drills.is_empty())))
}

/// Phase from a stored snapshot that cannot be resumed and was dropped
pub fn discarded_phase(snapshot: &Snapshot) -> Option<Phase> {
    snapshot.phase.is_in_flight().then_some(snapshot.phase)
}
