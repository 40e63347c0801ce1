//! Plan Executor
//!
//! Tick-driven control loop over the [`Plan`]. Each tick the executor
//! either recovers from an empty plan or steps the head action; when the
//! head reports completion it is ended, its follow-ups are spliced in at
//! the head, and the new head is begun in the same tick.
//!
//! # State Machine
//!
//! ```text
//! Idle --tick--> Running --fault--> Broken
//!                   ^  |
//!                   +--+ tick
//! ```
//!
//! `Broken` is terminal. Entering it writes the fault as the final status
//! line, prefixed with where it was raised (`sit begin: ...`,
//! `resume: ...`), and stops the host from ticking; later ticks do nothing.
//!
//! The executor does no logging of its own. Every tick returns the
//! [`ExecutorEvent`]s that happened so the caller can log them.

use core::fmt;

use heapless::Vec;

use crate::action::{Action, ActionKind, Stage};
use crate::context::ShipContext;
use crate::error::DroneError;
use crate::plan::Plan;
use crate::ports::TickRate;
use crate::resume;
use crate::snapshot::{Phase, Snapshot};
use crate::waypoint::Site;

/// Maximum events emitted per tick
pub const MAX_EXECUTOR_EVENTS: usize = 4;

pub type ExecutorEvents = Vec<ExecutorEvent, MAX_EXECUTOR_EVENTS>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutorState {
    /// Constructed, not yet ticked
    #[default]
    Idle,
    Running,
    /// Terminal
    Broken,
}

/// Something that happened during a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorEvent {
    /// Empty plan recovered from the dock fact
    Seeded(Site),
    /// Action became the head and was begun
    Began(ActionKind),
    /// Head action finished and was ended
    Completed(ActionKind),
    /// Executor entered `Broken`
    Broke,
}

/// Part of a tick that raised a runtime fault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultOrigin {
    /// Reading the dock fact to recover an empty plan
    Resume,
    /// A lifecycle call of an action
    Action(ActionKind, Stage),
}

impl fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultOrigin::Resume => f.write_str("resume"),
            FaultOrigin::Action(kind, stage) => write!(f, "{} {}", kind, stage),
        }
    }
}

/// Fault raised inside a tick, with where it happened
struct TickFault {
    origin: Option<FaultOrigin>,
    error: DroneError,
}

impl From<DroneError> for TickFault {
    fn from(error: DroneError) -> Self {
        Self {
            origin: None,
            error,
        }
    }
}

fn at(origin: FaultOrigin) -> impl FnOnce(DroneError) -> TickFault {
    move |error| TickFault {
        origin: Some(origin),
        error,
    }
}

#[derive(Debug, Default)]
pub struct Executor {
    state: ExecutorState,
    plan: Plan,
    fault: Option<DroneError>,
    fault_origin: Option<FaultOrigin>,
    /// Completed docks
    cycles: u32,
    /// Steps taken by the current head
    ticks_in_action: u32,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that is broken before its first tick (configuration fault)
    pub fn broken(fault: DroneError) -> Self {
        Self {
            state: ExecutorState::Broken,
            fault: Some(fault),
            ..Self::default()
        }
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn is_broken(&self) -> bool {
        self.state == ExecutorState::Broken
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Fault that broke the executor
    pub fn fault(&self) -> Option<&DroneError> {
        self.fault.as_ref()
    }

    /// Where the fault was raised; `None` for refusals, aborts and
    /// configuration faults
    pub fn fault_origin(&self) -> Option<FaultOrigin> {
        self.fault_origin
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn ticks_in_action(&self) -> u32 {
        self.ticks_in_action
    }

    /// Run one control tick.
    pub fn tick(&mut self, ship: &mut ShipContext<'_>) -> ExecutorEvents {
        let mut events = Vec::new();

        if self.state == ExecutorState::Broken {
            return events;
        }
        self.state = ExecutorState::Running;

        if let Err(fault) = self.advance(ship, &mut events) {
            self.fail(fault, ship, &mut events);
        }

        events
    }

    /// Enter `Broken` on request (operator abort).
    ///
    /// Already-broken executors keep their original fault.
    pub fn break_down(&mut self, fault: DroneError, ship: &mut ShipContext<'_>) -> ExecutorEvents {
        let mut events = Vec::new();
        if self.state != ExecutorState::Broken {
            self.fail(fault.into(), ship, &mut events);
        }
        events
    }

    /// Take the counters from a stored snapshot.
    ///
    /// Returns the phase that was interrupted and cannot be resumed, if
    /// any. Ignored once the executor has ticked.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Option<Phase> {
        if self.state != ExecutorState::Idle {
            return None;
        }
        self.cycles = snapshot.cycles;
        resume::discarded_phase(snapshot)
    }

    /// Checkpoint of current progress
    pub fn snapshot(&self) -> Snapshot {
        let phase = match (self.state, self.plan.head()) {
            (ExecutorState::Broken, _) => Phase::Broken,
            (_, Some(Action::Fly(_))) => Phase::Flying,
            (_, Some(Action::Dock(_))) => Phase::Docking,
            (_, Some(Action::Sit(_))) => Phase::Sitting,
            (_, None) => Phase::Idle,
        };

        Snapshot {
            phase,
            destination: self.plan.destination(),
            ticks_in_action: self.ticks_in_action,
            cycles: self.cycles,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn advance(
        &mut self,
        ship: &mut ShipContext<'_>,
        events: &mut ExecutorEvents,
    ) -> Result<(), TickFault> {
        if self.plan.is_empty() {
            return self.recover(ship, events);
        }

        let keep_going = match self.plan.head_mut() {
            Some(head) => {
                let kind = head.kind();
                head.step(ship).map_err(at(FaultOrigin::Action(kind, Stage::Step)))?
            }
            None => return Ok(()),
        };
        self.ticks_in_action = self.ticks_in_action.saturating_add(1);
        if keep_going {
            return Ok(());
        }

        let Some(finished) = self.plan.take_head() else {
            return Ok(());
        };
        let kind = finished.kind();
        let follow_ups = finished
            .end(ship)
            .map_err(at(FaultOrigin::Action(kind, Stage::End)))?;
        if kind == ActionKind::Dock {
            self.cycles = self.cycles.saturating_add(1);
        }
        let _ = events.push(ExecutorEvent::Completed(kind));

        self.plan
            .splice_head(follow_ups)
            .map_err(at(FaultOrigin::Action(kind, Stage::End)))?;
        self.begin_head(ship, events)
    }

    fn recover(
        &mut self,
        ship: &mut ShipContext<'_>,
        events: &mut ExecutorEvents,
    ) -> Result<(), TickFault> {
        // Refusal is reported bare
        let action = resume::decide(ship)
            .map_err(at(FaultOrigin::Resume))?
            .into_action()?;
        if let Some(site) = action.site() {
            let _ = events.push(ExecutorEvent::Seeded(site));
        }
        self.plan
            .push_back(action)
            .map_err(at(FaultOrigin::Resume))?;
        self.begin_head(ship, events)
    }

    fn begin_head(
        &mut self,
        ship: &mut ShipContext<'_>,
        events: &mut ExecutorEvents,
    ) -> Result<(), TickFault> {
        self.ticks_in_action = 0;
        if let Some(head) = self.plan.head_mut() {
            let kind = head.kind();
            head.begin(ship)
                .map_err(at(FaultOrigin::Action(kind, Stage::Begin)))?;
            let _ = events.push(ExecutorEvent::Began(kind));
        }
        Ok(())
    }

    fn fail(&mut self, fault: TickFault, ship: &mut ShipContext<'_>, events: &mut ExecutorEvents) {
        let TickFault { origin, error } = fault;
        match origin {
            Some(origin) => ship.report(format_args!("{}: {}", origin, error)),
            None => ship.report(format_args!("{}", error)),
        }
        ship.ticks.set_rate(TickRate::empty());
        self.state = ExecutorState::Broken;
        self.fault = Some(error);
        self.fault_origin = origin;
        let _ = events.push(ExecutorEvent::Broke);
    }
}
