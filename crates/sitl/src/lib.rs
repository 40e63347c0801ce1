//! turbine_sitl - Software-in-the-loop host for the mining drone
//!
//! Runs the unmodified `turbine_drone` program against a simulated ship:
//! an autopilot that flies straight at its waypoints, a connector that
//! locks onto pads, drills at the mine station, unloading and charging at
//! home, and per-block fault injection.
//!
//! # Modules
//!
//! - [`config`]: TOML world and drone configuration
//! - [`world`]: `SimShip`, implementing every capability port and `Grid`
//! - [`runner`]: Frame loop that ticks the program at its requested cadence
//! - [`status_log`]: Ring of recent status lines
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod status_log;
pub mod world;

pub use config::{SimConfig, StartSite, WorldConfig};
pub use error::SimulatorError;
pub use runner::{SitlRunner, TimeMode};
pub use status_log::StatusLog;
pub use world::{Autopilot, SimBlock, SimShip};
