//! Bounded FIFO of pending actions
//!
//! The head of the plan is the action currently running. Follow-ups from a
//! finished action are spliced in at the head, in order, so they run before
//! anything already queued.

use heapless::Deque;

use crate::action::{Action, FollowUps};
use crate::error::DroneError;
use crate::waypoint::Site;

/// Maximum number of queued actions
pub const MAX_PLAN_LEN: usize = 8;

#[derive(Debug, Default)]
pub struct Plan {
    actions: Deque<Action, MAX_PLAN_LEN>,
}

impl Plan {
    pub fn new() -> Self {
        Self {
            actions: Deque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Action currently running
    pub fn head(&self) -> Option<&Action> {
        self.actions.front()
    }

    pub fn head_mut(&mut self) -> Option<&mut Action> {
        self.actions.front_mut()
    }

    /// Queue `action` behind everything else
    pub fn push_back(&mut self, action: Action) -> Result<(), DroneError> {
        self.actions
            .push_back(action)
            .map_err(|_| DroneError::PlanFull {
                capacity: MAX_PLAN_LEN,
            })
    }

    /// Remove the head
    pub fn take_head(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    /// Insert `follow_ups` at the head, keeping their order.
    ///
    /// Either all of them fit or the plan is left untouched.
    pub fn splice_head(&mut self, mut follow_ups: FollowUps) -> Result<(), DroneError> {
        if self.actions.len() + follow_ups.len() > MAX_PLAN_LEN {
            return Err(DroneError::PlanFull {
                capacity: MAX_PLAN_LEN,
            });
        }
        while let Some(action) = follow_ups.pop() {
            self.actions
                .push_front(action)
                .map_err(|_| DroneError::PlanFull {
                    capacity: MAX_PLAN_LEN,
                })?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Site the plan is currently working toward, if any action names one
    pub fn destination(&self) -> Option<Site> {
        self.actions.iter().find_map(Action::site)
    }
}
