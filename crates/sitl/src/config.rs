//! Simulator configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty file
//! gives a working home/mine world 1 km apart.
//!
//! ```toml
//! frame_hz = 60
//! seed = 7
//! start = "home"
//!
//! [world]
//! home_pad = [0.0, 0.0, 0.0]
//! mine_pad = [1000.0, 0.0, -40.0]
//! cargo_capacity = 15625.0
//!
//! [drone]
//! connector = "Drone Connector"
//! ```
//!
//! When `drone.custom_data` is empty the mission text is generated from the
//! pads: one GPS entry hovering `approach_height` above each pad.

use std::fmt::Write;
use std::path::Path;

use serde::Deserialize;
use turbine_core::Position;
use turbine_drone::DroneConfig;

use crate::error::SimulatorError;

/// Where the ship is when the simulation starts
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartSite {
    /// Locked to the home pad
    #[default]
    Home,
    /// Locked to the mine station
    Mine,
    /// Hovering between the sites, not docked
    Flight,
}

/// Physical parameters of the simulated world and ship
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Home connector pad position (m)
    pub home_pad: [f64; 3],
    /// Mine station connector pad position (m)
    pub mine_pad: [f64; 3],
    /// Height of the GPS waypoint above each pad (m)
    pub approach_height: f64,
    /// Distance at which the connector sees a pad as connectable (m)
    pub connector_range: f64,
    /// Number of cargo containers on the ship
    pub cargo_containers: usize,
    /// Capacity per container (L)
    pub cargo_capacity: f64,
    /// Number of batteries on the ship
    pub batteries: usize,
    /// Capacity per battery (MWh)
    pub battery_capacity: f64,
    /// Stored charge at start, as a ratio
    pub initial_charge: f64,
    /// Drills at the mine station
    pub drill_count: u32,
    /// Ore per drill per second (L/s)
    pub drill_rate: f64,
    /// Random variation of the drill rate, as a ratio
    pub drill_jitter: f64,
    /// Cargo pulled off the ship at home (L/s)
    pub unload_rate: f64,
    /// Charging rate at home while recharging (MWh/s)
    pub charge_rate: f64,
    /// Battery drain while thrusters are on and undocked (MWh/s)
    pub thrust_drain: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            home_pad: [0.0, 0.0, 0.0],
            mine_pad: [1000.0, 0.0, 0.0],
            approach_height: 30.0,
            connector_range: 1.5,
            cargo_containers: 2,
            cargo_capacity: 1000.0,
            batteries: 2,
            battery_capacity: 3.0,
            initial_charge: 0.5,
            drill_count: 4,
            drill_rate: 5.0,
            drill_jitter: 0.1,
            unload_rate: 50.0,
            charge_rate: 0.02,
            thrust_drain: 0.0005,
        }
    }
}

impl WorldConfig {
    pub fn home_pad(&self) -> Position {
        Position::from(self.home_pad)
    }

    pub fn mine_pad(&self) -> Position {
        Position::from(self.mine_pad)
    }

    /// Waypoint hovering above a pad
    pub fn approach_point(&self, pad: Position) -> Position {
        pad + Position::new(0.0, 0.0, self.approach_height)
    }

    pub fn total_cargo_capacity(&self) -> f64 {
        self.cargo_containers as f64 * self.cargo_capacity
    }

    pub fn total_battery_capacity(&self) -> f64 {
        self.batteries as f64 * self.battery_capacity
    }

    /// GPS text for the two approach points, home first
    pub fn mission_text(&self) -> String {
        let mut text = String::new();
        for (label, pad) in [("Home", self.home_pad()), ("Mine", self.mine_pad())] {
            let p = self.approach_point(pad);
            let _ = writeln!(text, "GPS:{}:{}:{}:{}:", label, p.x, p.y, p.z);
        }
        text
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Simulation frames per second
    pub frame_hz: u32,
    /// RNG seed for drill jitter; `None` draws one from the OS
    pub seed: Option<u64>,
    pub start: StartSite,
    pub world: WorldConfig,
    pub drone: DroneConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_hz: 60,
            seed: None,
            start: StartSite::default(),
            world: WorldConfig::default(),
            drone: DroneConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, SimulatorError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulatorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        if self.frame_hz == 0 {
            return Err(SimulatorError::InvalidConfig {
                field: "frame_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.world.initial_charge) {
            return Err(SimulatorError::InvalidConfig {
                field: "world.initial_charge",
                reason: format!("{} is not a ratio", self.world.initial_charge),
            });
        }
        if self.world.connector_range <= 0.0 {
            return Err(SimulatorError::InvalidConfig {
                field: "world.connector_range",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Seconds per frame
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.frame_hz as f64
    }

    /// Drone configuration with generated mission text when none is given
    pub fn drone_config(&self) -> DroneConfig {
        let mut drone = self.drone.clone();
        if drone.custom_data.trim().is_empty() {
            drone.custom_data = self.world.mission_text();
        }
        drone
    }
}
