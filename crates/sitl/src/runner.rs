//! Frame loop
//!
//! Advances the world one frame at a time and runs the program whenever
//! its requested cadence comes due, the way the game's scheduler does.
//! Frames can be run as fast as possible (tests, batch runs) or paced
//! against the wall clock with tokio.

use std::time::Duration;

use turbine_drone::{DroneConfig, Program};

use crate::config::SimConfig;
use crate::error::SimulatorError;
use crate::world::SimShip;

/// Slowest accepted pacing factor
pub const MIN_SCALE: f32 = 0.001;

/// Fastest accepted pacing factor
pub const MAX_SCALE: f32 = 1000.0;

/// Time synchronization mode for the frame loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TimeMode {
    /// Frames run back to back with no pacing.
    #[default]
    FreeRunning,
    /// Frames are paced at `factor` times real time.
    Scaled { factor: f32 },
}

impl TimeMode {
    /// Wall-clock time per frame, `None` when unpaced.
    ///
    /// Factors that give no usable period (zero, negative, infinite, or so
    /// small the period overflows) run unpaced.
    pub fn frame_period(&self, frame_dt: f64) -> Option<Duration> {
        match self {
            TimeMode::FreeRunning => None,
            TimeMode::Scaled { factor } if factor.is_finite() && *factor > 0.0 => {
                Duration::try_from_secs_f64(frame_dt / *factor as f64)
                    .ok()
                    .filter(|period| !period.is_zero())
            }
            TimeMode::Scaled { .. } => None,
        }
    }

    /// Paced mode from a command-line factor
    pub fn scaled(factor: f32) -> Result<Self, SimulatorError> {
        if !factor.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&factor) {
            return Err(SimulatorError::InvalidArgument(format!(
                "realtime factor {factor} is outside {MIN_SCALE}..={MAX_SCALE}"
            )));
        }
        Ok(TimeMode::Scaled { factor })
    }
}

pub struct SitlRunner {
    config: SimConfig,
    drone: DroneConfig,
    ship: SimShip,
    program: Program,
    time_mode: TimeMode,
    frame: u64,
    /// Program runs so far
    ticks: u64,
}

impl SitlRunner {
    /// Fresh world and a program with no saved progress
    pub fn new(config: SimConfig) -> Self {
        Self::with_storage(config, "")
    }

    /// Fresh world and a program restored from `storage`
    pub fn with_storage(config: SimConfig, storage: &str) -> Self {
        let drone = config.drone_config();
        let mut ship = SimShip::new(&config);
        let program = Program::new(&drone, storage, &mut ship);
        Self {
            config,
            drone,
            ship,
            program,
            time_mode: TimeMode::default(),
            frame: 0,
            ticks: 0,
        }
    }

    /// Build the world but let the caller prepare the ship before the
    /// program starts (fault injection, removed blocks).
    pub fn with_ship(config: SimConfig, prepare: impl FnOnce(&mut SimShip)) -> Self {
        let drone = config.drone_config();
        let mut ship = SimShip::new(&config);
        prepare(&mut ship);
        let program = Program::new(&drone, "", &mut ship);
        Self {
            config,
            drone,
            ship,
            program,
            time_mode: TimeMode::default(),
            frame: 0,
            ticks: 0,
        }
    }

    pub fn set_time_mode(&mut self, mode: TimeMode) {
        self.time_mode = mode;
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    /// Advance one frame; returns `true` if the program ran
    pub fn step_frame(&mut self) -> bool {
        self.ship.step(self.config.frame_dt());
        self.frame += 1;

        match self.ship.tick_rate().period_frames() {
            Some(period) if self.frame % u64::from(period) == 0 => {
                self.program.main("", &mut self.ship);
                self.ticks += 1;
                true
            }
            _ => false,
        }
    }

    /// Advance `frames` frames; returns how many program runs happened
    pub fn run_frames(&mut self, frames: u64) -> u64 {
        (0..frames).filter(|_| self.step_frame()).count() as u64
    }

    /// Advance until `done` holds or `max_frames` pass.
    ///
    /// `done` is checked after every frame. Returns the frames run when it
    /// held, `None` on timeout.
    pub fn run_until(
        &mut self,
        max_frames: u64,
        mut done: impl FnMut(&SitlRunner) -> bool,
    ) -> Option<u64> {
        for n in 1..=max_frames {
            self.step_frame();
            if done(self) {
                return Some(n);
            }
        }
        None
    }

    /// Advance `frames` frames paced by the time mode
    pub async fn run_realtime(&mut self, frames: u64) {
        let Some(period) = self.time_mode.frame_period(self.config.frame_dt()) else {
            self.run_frames(frames);
            return;
        };

        let mut interval = tokio::time::interval(period);
        for _ in 0..frames {
            interval.tick().await;
            self.step_frame();
        }
    }

    /// Run the program with a console argument outside the schedule
    pub fn command(&mut self, argument: &str) {
        self.program.main(argument, &mut self.ship);
    }

    /// Storage string the program would persist now
    pub fn save(&self) -> String {
        self.program.save()
    }

    /// Reload the program from its own saved state, keeping the world.
    ///
    /// This is what happens when the game reloads a save or the script is
    /// recompiled: the plan is lost, the ship stays where it is.
    pub fn restart(&mut self) {
        let storage = self.program.save();
        self.program = Program::new(&self.drone, &storage, &mut self.ship);
    }

    pub fn ship(&self) -> &SimShip {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut SimShip {
        &mut self.ship
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds elapsed
    pub fn sim_time_s(&self) -> f64 {
        self.frame as f64 * self.config.frame_dt()
    }
}
