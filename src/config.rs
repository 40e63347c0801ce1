//! Drone program configuration
//!
//! Block names and the mission text. In the game these come from the
//! programmable block's custom data; the simulator embeds them in its TOML
//! file under `[drone]`.

use serde::Deserialize;

/// Default name of the autopilot block
pub const DEFAULT_REMOTE_CONTROL: &str = "Drone Remote Control";

/// Default name of the docking connector
pub const DEFAULT_CONNECTOR: &str = "Drone Connector";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DroneConfig {
    /// Name of the remote control block driving the autopilot
    pub remote_control: String,
    /// Name of the connector used for docking
    pub connector: String,
    /// Mission text holding the home and mine GPS entries
    pub custom_data: String,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            remote_control: DEFAULT_REMOTE_CONTROL.to_string(),
            connector: DEFAULT_CONNECTOR.to_string(),
            custom_data: String::new(),
        }
    }
}

impl DroneConfig {
    /// Default block names with the given mission text
    pub fn with_custom_data(custom_data: impl Into<String>) -> Self {
        Self {
            custom_data: custom_data.into(),
            ..Self::default()
        }
    }
}
