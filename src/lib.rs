//! turbine_drone - Mining drone program
//!
//! Wraps the `turbine_core` plan engine in the program the ship runs:
//! startup validation, the operator console, status reporting, and
//! saving progress between sessions. The host (the game bridge or the
//! simulator) provides the ship through the [`Grid`] trait and calls
//! [`Program::main`] on every scheduled tick.
//!
//! # Modules
//!
//! - [`program`]: `Program`, the `Grid` host trait, console commands
//! - [`config`]: Block names and mission text
//! - [`logging`]: `log_*!` macros over `tracing`

pub mod config;
pub mod logging;
pub mod program;

pub use config::DroneConfig;
pub use program::{Command, Grid, Program, StorageError};
