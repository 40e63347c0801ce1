//! Plan Actions
//!
//! An [`Action`] is one step of the mining loop. Every action follows the
//! same three-phase contract:
//!
//! 1. `begin` once, applying its hardware setup
//! 2. `step` every tick, reporting a status line and returning `true` while
//!    the action should keep running
//! 3. `end` once after the first `step` that returned `false`, undoing its
//!    setup and returning the follow-up actions to run next
//!
//! `end` consumes the action, so a finished action cannot be stepped again.
//! Hardware side effects happen only in `begin` and `end`; `step` only reads
//! sensors and writes the status line.

mod dock;
mod fly;
mod sit;

use heapless::Vec;

pub use dock::{Dock, DOCKING_SPEED_LIMIT};
pub use fly::{FlyToWaypoint, SpeedProfile, CRUISE_SPEED_LIMIT, FAST_CLOSENESS, PRECISE_CLOSENESS};
pub use sit::{SitAtDockingPort, HOME_CARGO_EMPTY, HOME_POWER_TOPPED, MINE_CARGO_FULL};

use crate::context::ShipContext;
use crate::error::DroneError;
use crate::waypoint::Site;

/// Maximum number of follow-ups one action may produce
pub const MAX_FOLLOW_UPS: usize = 4;

/// Ordered actions to run after a finished one
pub type FollowUps = Vec<Action, MAX_FOLLOW_UPS>;

/// Discriminant of an [`Action`], for events and snapshots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    FlyToWaypoint,
    Dock,
    SitAtDockingPort,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::FlyToWaypoint => "fly",
            ActionKind::Dock => "dock",
            ActionKind::SitAtDockingPort => "sit",
        }
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle call of an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Begin,
    Step,
    End,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Begin => "begin",
            Stage::Step => "step",
            Stage::End => "end",
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One unit of work in the plan
#[derive(Debug, PartialEq)]
pub enum Action {
    Fly(FlyToWaypoint),
    Dock(Dock),
    Sit(SitAtDockingPort),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Fly(_) => ActionKind::FlyToWaypoint,
            Action::Dock(_) => ActionKind::Dock,
            Action::Sit(_) => ActionKind::SitAtDockingPort,
        }
    }

    /// Site this action is docking at or sitting at, if any
    pub fn site(&self) -> Option<Site> {
        match self {
            Action::Fly(_) => None,
            Action::Dock(dock) => Some(Site::from_at_mine(dock.toward_mine)),
            Action::Sit(sit) => Some(Site::from_at_mine(sit.at_mine)),
        }
    }

    /// Apply this action's hardware setup
    pub fn begin(&mut self, ship: &mut ShipContext<'_>) -> Result<(), DroneError> {
        match self {
            Action::Fly(fly) => fly.begin(ship),
            Action::Dock(dock) => dock.begin(ship),
            Action::Sit(sit) => sit.begin(ship),
        }
    }

    /// Observe progress; `Ok(true)` means keep running
    pub fn step(&mut self, ship: &mut ShipContext<'_>) -> Result<bool, DroneError> {
        match self {
            Action::Fly(fly) => fly.step(ship),
            Action::Dock(dock) => dock.step(ship),
            Action::Sit(sit) => sit.step(ship),
        }
    }

    /// Tear down and produce the follow-ups
    pub fn end(self, ship: &mut ShipContext<'_>) -> Result<FollowUps, DroneError> {
        match self {
            Action::Fly(fly) => fly.end(ship),
            Action::Dock(dock) => dock.end(ship),
            Action::Sit(sit) => sit.end(ship),
        }
    }
}

impl From<FlyToWaypoint> for Action {
    fn from(fly: FlyToWaypoint) -> Self {
        Action::Fly(fly)
    }
}

impl From<Dock> for Action {
    fn from(dock: Dock) -> Self {
        Action::Dock(dock)
    }
}

impl From<SitAtDockingPort> for Action {
    fn from(sit: SitAtDockingPort) -> Self {
        Action::Sit(sit)
    }
}

/// Collect follow-ups, failing instead of dropping any that do not fit
pub(crate) fn follow_ups<I>(actions: I) -> Result<FollowUps, DroneError>
where
    I: IntoIterator<Item = Action>,
{
    let mut out = FollowUps::new();
    for action in actions {
        out.push(action).map_err(|_| DroneError::PlanFull {
            capacity: MAX_FOLLOW_UPS,
        })?;
    }
    Ok(out)
}
