//! turbine_core - Pure no_std plan engine for the mining drone
//!
//! This crate contains the platform-agnostic task-plan engine that drives
//! the "go mine, come home, unload, recharge, repeat" loop. It can be tested
//! on host without a game, a simulator, or any allocator.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies, heapless containers only
//! - **Trait abstractions**: Hardware is reached through capability ports
//!   passed in explicitly on every call
//! - **No logging**: The executor reports what happened through returned
//!   events; the program crate decides what to log
//!
//! # Modules
//!
//! - [`ports`]: Capability port traits (movement, docking port, ship systems,
//!   status sink, tick control)
//! - [`context`]: `ShipContext`, the bundle of ports handed to actions
//! - [`waypoint`]: Waypoints, mission sites, and configuration text parsing
//! - [`fullness`]: Cargo and power fill ratios
//! - [`action`]: The `Action` sum type and its three variants
//! - [`plan`]: Bounded FIFO of pending actions
//! - [`executor`]: Tick-driven control loop with terminal breakdown
//! - [`resume`]: Cold-restart recovery from the physical dock fact
//! - [`snapshot`]: Versioned binary checkpoint of mission progress
//! - [`error`]: Engine error types

#![no_std]

pub mod action;
pub mod context;
pub mod error;
pub mod executor;
pub mod fullness;
pub mod plan;
pub mod ports;
pub mod resume;
pub mod snapshot;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod mock;

pub use action::{
    Action, ActionKind, Dock, FlyToWaypoint, FollowUps, SitAtDockingPort, SpeedProfile, Stage,
};
pub use context::ShipContext;
pub use error::{ConfigError, DroneError};
pub use executor::{Executor, ExecutorEvent, ExecutorEvents, ExecutorState, FaultOrigin};
pub use plan::Plan;
pub use snapshot::{Phase, Snapshot, SnapshotError};
pub use waypoint::{MissionWaypoints, Position, Site, Waypoint};
