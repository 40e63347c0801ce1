//! Recording port mocks for unit tests

use heapless::{String, Vec};

use crate::context::{ShipContext, STATUS_LINE_LEN};
use crate::fullness::Fill;
use crate::ports::{
    BlockId, ChargeMode, ConnectorStatus, Direction, DockingPort, DrillGroup, FlightMode,
    GyroRates, MovementControl, PortError, ShipSystems, StatusSink, TickControl, TickRate,
};
use crate::waypoint::{MissionWaypoints, Position, Waypoint};

pub fn home() -> Position {
    Position::new(0.0, 0.0, 0.0)
}

pub fn mine() -> Position {
    Position::new(1000.0, 0.0, 0.0)
}

fn fail_if(fail: bool, block: &'static str) -> Result<(), PortError> {
    if fail {
        Err(PortError::Unreachable(block))
    } else {
        Ok(())
    }
}

// ============================================================================
// Movement
// ============================================================================

#[derive(Debug)]
pub struct MockMovement {
    pub speed_limit: f32,
    pub waypoints: Vec<Waypoint, 4>,
    pub docking_mode: bool,
    pub collision_avoidance: bool,
    pub autopilot: bool,
    pub flight_mode: FlightMode,
    pub wait_for_free_way: bool,
    pub direction: Direction,
    pub handbrake: bool,
    pub position: Position,
    pub fail: bool,
    pub mutations: u32,
}

impl MockMovement {
    fn new(position: Position) -> Self {
        Self {
            speed_limit: 100.0,
            waypoints: Vec::new(),
            docking_mode: false,
            collision_avoidance: false,
            autopilot: false,
            flight_mode: FlightMode::Patrol,
            wait_for_free_way: true,
            direction: Direction::Forward,
            handbrake: true,
            position,
            fail: false,
            mutations: 0,
        }
    }

    fn mutate(&mut self) -> Result<(), PortError> {
        self.mutations += 1;
        fail_if(self.fail, "remote control")
    }
}

impl MovementControl for MockMovement {
    fn set_speed_limit(&mut self, speed: f32) -> Result<(), PortError> {
        self.mutate()?;
        self.speed_limit = speed;
        Ok(())
    }

    fn add_waypoint(&mut self, waypoint: &Waypoint) -> Result<(), PortError> {
        self.mutate()?;
        self.waypoints
            .push(waypoint.clone())
            .map_err(|_| PortError::Rejected {
                block: "remote control",
                reason: "route full",
            })
    }

    fn clear_waypoints(&mut self) -> Result<(), PortError> {
        self.mutate()?;
        self.waypoints.clear();
        Ok(())
    }

    fn set_docking_mode(&mut self, enabled: bool) -> Result<(), PortError> {
        self.mutate()?;
        self.docking_mode = enabled;
        Ok(())
    }

    fn set_collision_avoidance(&mut self, enabled: bool) -> Result<(), PortError> {
        self.mutate()?;
        self.collision_avoidance = enabled;
        Ok(())
    }

    fn set_autopilot_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        self.mutate()?;
        self.autopilot = enabled;
        Ok(())
    }

    fn set_flight_mode(&mut self, mode: FlightMode) -> Result<(), PortError> {
        self.mutate()?;
        self.flight_mode = mode;
        Ok(())
    }

    fn set_wait_for_free_way(&mut self, wait: bool) -> Result<(), PortError> {
        self.mutate()?;
        self.wait_for_free_way = wait;
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), PortError> {
        self.mutate()?;
        self.direction = direction;
        Ok(())
    }

    fn set_handbrake(&mut self, engaged: bool) -> Result<(), PortError> {
        self.mutate()?;
        self.handbrake = engaged;
        Ok(())
    }

    fn position(&self) -> Result<Position, PortError> {
        fail_if(self.fail, "remote control")?;
        Ok(self.position)
    }
}

// ============================================================================
// Docking Port
// ============================================================================

#[derive(Debug)]
pub struct MockDockingPort {
    pub enabled: bool,
    pub status: ConnectorStatus,
    pub position: Position,
    pub connects: u32,
    pub disconnects: u32,
    pub fail: bool,
    pub mutations: u32,
}

impl MockDockingPort {
    fn new(status: ConnectorStatus, position: Position) -> Self {
        Self {
            enabled: true,
            status,
            position,
            connects: 0,
            disconnects: 0,
            fail: false,
            mutations: 0,
        }
    }

    fn mutate(&mut self) -> Result<(), PortError> {
        self.mutations += 1;
        fail_if(self.fail, "connector")
    }
}

impl DockingPort for MockDockingPort {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        self.mutate()?;
        self.enabled = enabled;
        Ok(())
    }

    fn connect(&mut self) -> Result<(), PortError> {
        self.mutate()?;
        self.connects += 1;
        if self.status == ConnectorStatus::Connectable {
            self.status = ConnectorStatus::Connected;
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), PortError> {
        self.mutate()?;
        self.disconnects += 1;
        if self.status == ConnectorStatus::Connected {
            self.status = ConnectorStatus::Connectable;
        }
        Ok(())
    }

    fn status(&self) -> Result<ConnectorStatus, PortError> {
        fail_if(self.fail, "connector")?;
        Ok(self.status)
    }

    fn position(&self) -> Result<Position, PortError> {
        fail_if(self.fail, "connector")?;
        Ok(self.position)
    }
}

// ============================================================================
// Ship Systems
// ============================================================================

#[derive(Debug)]
pub struct MockSystems {
    pub gyro_override: Option<GyroRates>,
    pub thrusters: bool,
    pub charge_mode: ChargeMode,
    /// Drills returned by the next lookup
    pub station_drills: DrillGroup,
    pub enabled_drills: DrillGroup,
    pub drill_lookups: u32,
    pub cargo: Fill,
    pub power: Fill,
    pub fail_gyros: bool,
    pub fail_thrusters: bool,
    pub fail_drill_lookup: bool,
    pub mutations: u32,
}

impl MockSystems {
    fn new(station_drills: &[u32]) -> Self {
        let mut drills = DrillGroup::new();
        for id in station_drills {
            let _ = drills.push(BlockId(*id));
        }
        Self {
            gyro_override: Some(GyroRates::ZERO),
            thrusters: true,
            charge_mode: ChargeMode::Auto,
            station_drills: drills,
            enabled_drills: DrillGroup::new(),
            drill_lookups: 0,
            cargo: Fill::new(0.0, 100.0),
            power: Fill::new(50.0, 100.0),
            fail_gyros: false,
            fail_thrusters: false,
            fail_drill_lookup: false,
            mutations: 0,
        }
    }
}

impl ShipSystems for MockSystems {
    fn set_gyro_override(&mut self, rates: Option<GyroRates>) -> Result<(), PortError> {
        self.mutations += 1;
        fail_if(self.fail_gyros, "gyros")?;
        self.gyro_override = rates;
        Ok(())
    }

    fn set_thrusters_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        self.mutations += 1;
        fail_if(self.fail_thrusters, "thrusters")?;
        self.thrusters = enabled;
        Ok(())
    }

    fn set_charge_mode(&mut self, mode: ChargeMode) -> Result<(), PortError> {
        self.mutations += 1;
        self.charge_mode = mode;
        Ok(())
    }

    fn find_drills(&mut self) -> Result<DrillGroup, PortError> {
        self.drill_lookups += 1;
        fail_if(self.fail_drill_lookup, "drills")?;
        Ok(self.station_drills.clone())
    }

    fn set_drill_enabled(&mut self, drill: BlockId, enabled: bool) -> Result<(), PortError> {
        self.mutations += 1;
        if enabled {
            if !self.enabled_drills.contains(&drill) {
                let _ = self.enabled_drills.push(drill);
            }
        } else {
            self.enabled_drills.retain(|d| *d != drill);
        }
        Ok(())
    }

    fn cargo_fill(&self) -> Result<Fill, PortError> {
        Ok(self.cargo)
    }

    fn power_fill(&self) -> Result<Fill, PortError> {
        Ok(self.power)
    }
}

// ============================================================================
// Status and Ticks
// ============================================================================

#[derive(Debug, Default)]
pub struct MockStatus {
    pub line: String<STATUS_LINE_LEN>,
    pub reports: u32,
}

impl MockStatus {
    pub fn last(&self) -> &str {
        self.line.as_str()
    }

    /// Message part of the last line, without the mission header
    pub fn message(&self) -> &str {
        self.line.splitn(3, '\n').nth(2).unwrap_or("")
    }
}

impl StatusSink for MockStatus {
    fn report(&mut self, line: &str) {
        self.line.clear();
        let _ = self.line.push_str(line);
        self.reports += 1;
    }
}

#[derive(Debug)]
pub struct MockTicks {
    pub rate: TickRate,
    pub changes: u32,
}

impl TickControl for MockTicks {
    fn rate(&self) -> TickRate {
        self.rate
    }

    fn set_rate(&mut self, rate: TickRate) {
        self.rate = rate;
        self.changes += 1;
    }
}

// ============================================================================
// Whole Ship
// ============================================================================

pub struct MockShip {
    pub movement: MockMovement,
    pub port: MockDockingPort,
    pub systems: MockSystems,
    pub status: MockStatus,
    pub ticks: MockTicks,
    pub waypoints: MissionWaypoints,
}

impl MockShip {
    fn new(status: ConnectorStatus, position: Position, drills: &[u32]) -> Self {
        Self {
            movement: MockMovement::new(position),
            port: MockDockingPort::new(status, position),
            systems: MockSystems::new(drills),
            status: MockStatus::default(),
            ticks: MockTicks {
                rate: TickRate::CRUISE,
                changes: 0,
            },
            waypoints: MissionWaypoints::new(
                Waypoint::new("Home", home()).unwrap(),
                Waypoint::new("Mine", mine()).unwrap(),
            ),
        }
    }

    /// Locked to the home pad, no drills reachable
    pub fn docked_at_home() -> Self {
        Self::new(ConnectorStatus::Connected, home(), &[])
    }

    /// Locked to the mine station with three drills
    pub fn docked_at_mine() -> Self {
        Self::new(ConnectorStatus::Connected, mine(), &[1, 2, 3])
    }

    /// Mid-route, nothing in connector range
    pub fn in_flight() -> Self {
        Self::new(
            ConnectorStatus::Unconnected,
            Position::new(500.0, 0.0, 0.0),
            &[],
        )
    }

    /// Move the ship (controller and connector together)
    pub fn move_to(&mut self, position: Position) {
        self.movement.position = position;
        self.port.position = position;
    }

    /// Hardware mutations across movement, connector, and ship systems
    pub fn hardware_mutations(&self) -> u32 {
        self.movement.mutations + self.port.mutations + self.systems.mutations
    }

    pub fn ctx(&mut self) -> ShipContext<'_> {
        ShipContext {
            movement: &mut self.movement,
            docking_port: &mut self.port,
            systems: &mut self.systems,
            status: &mut self.status,
            ticks: &mut self.ticks,
            waypoints: &self.waypoints,
        }
    }
}
