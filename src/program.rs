//! The drone program
//!
//! Startup loads the required blocks and the mission waypoints. Any
//! configuration fault leaves the program broken before its first tick,
//! with the fault on the status line and ticking disabled. Otherwise every
//! call to [`Program::main`] handles one console argument: an empty
//! argument is a scheduled tick, `abort` stops the drone for good.
//!
//! Progress is saved as a hex string of a `turbine_core` snapshot. It only
//! restores counters; where the drone resumes is always decided from the
//! connector on the first tick.

use core::fmt;

use turbine_core::ports::{BlockGroup, StatusSink, TickControl, TickRate};
use turbine_core::snapshot::SnapshotError;
use turbine_core::{
    ConfigError, DroneError, Executor, ExecutorEvent, ExecutorEvents, ExecutorState,
    MissionWaypoints, ShipContext, Snapshot,
};

use crate::config::DroneConfig;
use crate::{log_debug, log_error, log_info, log_warn};

/// The ship as seen by the program
///
/// The status line and the tick cadence belong to the programmable block
/// itself and are reachable even when the rest of the ship is misconfigured.
pub trait Grid: StatusSink + TickControl {
    /// `true` if a terminal block with this exact name exists
    fn has_block(&self, name: &str) -> bool;

    /// Number of working blocks in a group
    fn group_len(&self, group: BlockGroup) -> usize;

    /// Borrow every port for one tick
    fn ship<'a>(&'a mut self, waypoints: &'a MissionWaypoints) -> ShipContext<'a>;
}

/// Console argument
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Scheduled tick (empty argument)
    Tick,
    /// Manual stop
    Abort,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(argument: &'a str) -> Self {
        match argument.trim() {
            "" => Command::Tick,
            "abort" => Command::Abort,
            other => Command::Unknown(other),
        }
    }
}

/// Stored progress could not be read
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Not a hex string
    Hex(hex::FromHexError),
    Snapshot(SnapshotError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Hex(e) => write!(f, "stored state is not hex: {}", e),
            StorageError::Snapshot(e) => write!(f, "stored state rejected: {}", e),
        }
    }
}

impl From<hex::FromHexError> for StorageError {
    fn from(e: hex::FromHexError) -> Self {
        StorageError::Hex(e)
    }
}

impl From<SnapshotError> for StorageError {
    fn from(e: SnapshotError) -> Self {
        StorageError::Snapshot(e)
    }
}

/// Decode a storage string written by [`Program::save`]
pub fn decode_storage(storage: &str) -> Result<Snapshot, StorageError> {
    let bytes = hex::decode(storage.trim())?;
    Ok(Snapshot::from_bytes(&bytes)?)
}

/// Encode a snapshot as a storage string
pub fn encode_storage(snapshot: &Snapshot) -> String {
    hex::encode(snapshot.to_bytes())
}

pub struct Program {
    /// `None` when startup failed
    waypoints: Option<MissionWaypoints>,
    executor: Executor,
}

impl Program {
    /// Load the mission and blocks, then restore saved progress.
    ///
    /// Never fails: a configuration fault yields a broken program.
    pub fn new<G: Grid>(config: &DroneConfig, storage: &str, grid: &mut G) -> Self {
        let waypoints = match load(config, grid) {
            Ok(waypoints) => waypoints,
            Err(e) => {
                let fault = DroneError::Config(e);
                log_error!("startup failed: {}", fault);
                grid.report(&fault.to_string());
                grid.set_rate(TickRate::empty());
                return Self {
                    waypoints: None,
                    executor: Executor::broken(fault),
                };
            }
        };

        log_info!(
            "mission loaded: home {} / mine {}",
            waypoints.home,
            waypoints.mine
        );
        grid.set_rate(TickRate::CRUISE);

        let mut executor = Executor::new();
        if !storage.trim().is_empty() {
            match decode_storage(storage) {
                Ok(snapshot) => {
                    if let Some(phase) = executor.restore(&snapshot) {
                        log_warn!(
                            "discarding interrupted {} phase (toward {:?}); resuming from the connector",
                            phase.name(),
                            snapshot.destination
                        );
                    }
                    log_info!("restored progress: {} cycles", snapshot.cycles);
                }
                Err(e) => log_warn!("ignoring stored state: {}", e),
            }
        }

        Self {
            waypoints: Some(waypoints),
            executor,
        }
    }

    /// Handle one invocation from the host
    pub fn main<G: Grid>(&mut self, argument: &str, grid: &mut G) {
        let Some(waypoints) = self.waypoints.as_ref() else {
            return;
        };

        let events = match Command::parse(argument) {
            Command::Tick => self.executor.tick(&mut grid.ship(waypoints)),
            Command::Abort => {
                log_warn!("abort requested");
                self.executor
                    .break_down(DroneError::Aborted, &mut grid.ship(waypoints))
            }
            Command::Unknown(other) => {
                log_warn!("unknown command '{}', ignoring", other);
                return;
            }
        };

        log_events(&events, &self.executor);
    }

    /// Storage string for the current progress
    pub fn save(&self) -> String {
        encode_storage(&self.executor.snapshot())
    }

    pub fn state(&self) -> ExecutorState {
        self.executor.state()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn waypoints(&self) -> Option<&MissionWaypoints> {
        self.waypoints.as_ref()
    }
}

fn load<G: Grid>(config: &DroneConfig, grid: &G) -> Result<MissionWaypoints, ConfigError> {
    let waypoints = MissionWaypoints::from_custom_data(&config.custom_data)?;

    for name in [&config.remote_control, &config.connector] {
        if !grid.has_block(name) {
            return Err(ConfigError::missing_block(name));
        }
    }

    for group in [BlockGroup::Cargo, BlockGroup::Batteries] {
        if grid.group_len(group) == 0 {
            return Err(ConfigError::EmptyGroup { group });
        }
    }

    Ok(waypoints)
}

fn log_events(events: &ExecutorEvents, executor: &Executor) {
    for event in events {
        match event {
            ExecutorEvent::Seeded(site) => {
                log_info!("docked at {} with no plan, resuming there", site)
            }
            ExecutorEvent::Began(kind) => log_info!("began {}", kind),
            ExecutorEvent::Completed(kind) => {
                log_debug!(
                    "completed {} (cycles: {})",
                    kind,
                    executor.cycles()
                )
            }
            ExecutorEvent::Broke => match (executor.fault_origin(), executor.fault()) {
                (Some(origin), Some(fault)) => log_error!("broken in {}: {}", origin, fault),
                (None, Some(fault)) => log_error!("broken: {}", fault),
                _ => log_error!("broken"),
            },
        }
    }
}
