//! Simulated ship and world
//!
//! One hull shared by the block handles the program talks to. The handles
//! ([`RemoteControl`], [`Connector`], [`Systems`]) each implement one
//! capability port over the same hull, the way terminal blocks on a real
//! grid all act on one ship.
//!
//! The physics is crude: the autopilot flies in a straight
//! line at its speed cap and snaps onto the waypoint when it is within one
//! frame of it; docking descends straight onto the nearest pad.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use turbine_core::fullness::{Fill, RAW_UNITS_PER_UNIT};
use turbine_core::ports::{
    BlockGroup, BlockId, ChargeMode, ConnectorStatus, Direction, DockingPort, DrillGroup,
    FlightMode, GyroRates, MovementControl, PortError, ShipSystems, StatusSink, TickControl,
    TickRate, MAX_DRILLS,
};
use turbine_core::{MissionWaypoints, Position, ShipContext, Site, Waypoint};
use turbine_drone::Grid;

use crate::config::{SimConfig, StartSite, WorldConfig};
use crate::status_log::StatusLog;

/// First block id handed out to station drills
const DRILL_ID_BASE: u32 = 100;

/// Blocks that can be made to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimBlock {
    RemoteControl,
    Connector,
    Gyros,
    Thrusters,
    Batteries,
    Drills,
    Cargo,
}

impl SimBlock {
    pub fn name(&self) -> &'static str {
        match self {
            SimBlock::RemoteControl => "remote control",
            SimBlock::Connector => "connector",
            SimBlock::Gyros => "gyros",
            SimBlock::Thrusters => "thrusters",
            SimBlock::Batteries => "batteries",
            SimBlock::Drills => "drills",
            SimBlock::Cargo => "cargo",
        }
    }
}

/// Remote control block settings
#[derive(Clone, Debug, PartialEq)]
pub struct Autopilot {
    pub enabled: bool,
    pub speed_limit: f32,
    pub route: Vec<Waypoint>,
    pub docking_mode: bool,
    pub collision_avoidance: bool,
    pub flight_mode: FlightMode,
    pub wait_for_free_way: bool,
    pub direction: Direction,
    pub handbrake: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            enabled: false,
            speed_limit: 100.0,
            route: Vec::new(),
            docking_mode: false,
            collision_avoidance: true,
            flight_mode: FlightMode::OneWay,
            wait_for_free_way: true,
            direction: Direction::Forward,
            handbrake: false,
        }
    }
}

#[derive(Debug)]
struct Hull {
    world: WorldConfig,
    position: Position,
    /// Site of the pad the connector is locked to
    docked: Option<Site>,
    connector_enabled: bool,
    autopilot: Autopilot,
    gyro_override: Option<GyroRates>,
    thrusters: bool,
    charge_mode: ChargeMode,
    drills_on: Vec<BlockId>,
    /// Stored cargo (L)
    cargo: f64,
    /// Stored energy (MWh)
    charge: f64,
    faults: Vec<SimBlock>,
    rng: StdRng,
}

impl Hull {
    fn check(&self, block: SimBlock) -> Result<(), PortError> {
        if self.faults.contains(&block) {
            Err(PortError::Unreachable(block.name()))
        } else {
            Ok(())
        }
    }

    fn pad(&self, site: Site) -> Position {
        match site {
            Site::Home => self.world.home_pad(),
            Site::Mine => self.world.mine_pad(),
        }
    }

    /// Closest pad and the distance to it
    fn nearest_pad(&self) -> (Site, f64) {
        let home = (self.world.home_pad() - self.position).norm();
        let mine = (self.world.mine_pad() - self.position).norm();
        if home <= mine {
            (Site::Home, home)
        } else {
            (Site::Mine, mine)
        }
    }

    fn connector_status(&self) -> ConnectorStatus {
        if self.docked.is_some() {
            ConnectorStatus::Connected
        } else if !self.connector_enabled {
            ConnectorStatus::Unconnected
        } else if self.nearest_pad().1 <= self.world.connector_range {
            ConnectorStatus::Connectable
        } else {
            ConnectorStatus::Unconnected
        }
    }

    fn step(&mut self, dt: f64) {
        match self.docked {
            Some(site) => {
                self.position = self.pad(site);
                self.work(site, dt);
            }
            None => {
                self.fly(dt);
                if self.thrusters {
                    self.charge = (self.charge - self.world.thrust_drain * dt).max(0.0);
                }
            }
        }
    }

    fn fly(&mut self, dt: f64) {
        if !self.autopilot.enabled || !self.thrusters || self.charge <= 0.0 {
            return;
        }

        let target = match self.autopilot.route.first() {
            Some(waypoint) => waypoint.coords,
            None if self.autopilot.docking_mode && self.autopilot.direction == Direction::Down => {
                let (site, _) = self.nearest_pad();
                self.pad(site)
            }
            None => return,
        };

        let offset = target - self.position;
        let distance = offset.norm();
        let max_step = self.autopilot.speed_limit as f64 * dt;
        if distance <= max_step {
            self.position = target;
        } else {
            self.position += offset * (max_step / distance);
        }
    }

    fn work(&mut self, site: Site, dt: f64) {
        match site {
            Site::Mine => {
                if self.drills_on.is_empty() || self.faults.contains(&SimBlock::Drills) {
                    return;
                }
                let jitter = self.world.drill_jitter * self.rng.gen_range(-1.0..=1.0);
                let rate = self.drills_on.len() as f64 * self.world.drill_rate * (1.0 + jitter);
                self.cargo = (self.cargo + rate * dt).min(self.world.total_cargo_capacity());
            }
            Site::Home => {
                self.cargo = (self.cargo - self.world.unload_rate * dt).max(0.0);
                if self.charge_mode == ChargeMode::Recharge {
                    self.charge = (self.charge + self.world.charge_rate * dt)
                        .min(self.world.total_battery_capacity());
                }
            }
        }
    }
}

type SharedHull = Rc<RefCell<Hull>>;

/// Litres to the fixed-point units inventories report in
fn to_raw(litres: f64) -> i64 {
    (litres * RAW_UNITS_PER_UNIT as f64).round() as i64
}

/// Autopilot block
#[derive(Debug)]
pub struct RemoteControl(SharedHull);

impl RemoteControl {
    fn with<T>(&self, apply: impl FnOnce(&mut Autopilot) -> T) -> Result<T, PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::RemoteControl)?;
        Ok(apply(&mut hull.autopilot))
    }
}

impl MovementControl for RemoteControl {
    fn set_speed_limit(&mut self, speed: f32) -> Result<(), PortError> {
        self.with(|ap| ap.speed_limit = speed)
    }

    fn add_waypoint(&mut self, waypoint: &Waypoint) -> Result<(), PortError> {
        self.with(|ap| ap.route.push(waypoint.clone()))
    }

    fn clear_waypoints(&mut self) -> Result<(), PortError> {
        self.with(|ap| ap.route.clear())
    }

    fn set_docking_mode(&mut self, enabled: bool) -> Result<(), PortError> {
        self.with(|ap| ap.docking_mode = enabled)
    }

    fn set_collision_avoidance(&mut self, enabled: bool) -> Result<(), PortError> {
        self.with(|ap| ap.collision_avoidance = enabled)
    }

    fn set_autopilot_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        self.with(|ap| ap.enabled = enabled)
    }

    fn set_flight_mode(&mut self, mode: FlightMode) -> Result<(), PortError> {
        self.with(|ap| ap.flight_mode = mode)
    }

    fn set_wait_for_free_way(&mut self, wait: bool) -> Result<(), PortError> {
        self.with(|ap| ap.wait_for_free_way = wait)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), PortError> {
        self.with(|ap| ap.direction = direction)
    }

    fn set_handbrake(&mut self, engaged: bool) -> Result<(), PortError> {
        self.with(|ap| ap.handbrake = engaged)
    }

    fn position(&self) -> Result<Position, PortError> {
        let hull = self.0.borrow();
        hull.check(SimBlock::RemoteControl)?;
        Ok(hull.position)
    }
}

/// Docking connector
#[derive(Debug)]
pub struct Connector(SharedHull);

impl DockingPort for Connector {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Connector)?;
        hull.connector_enabled = enabled;
        if !enabled {
            hull.docked = None;
        }
        Ok(())
    }

    fn connect(&mut self) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Connector)?;
        if hull.connector_status() == ConnectorStatus::Connectable {
            let (site, _) = hull.nearest_pad();
            hull.docked = Some(site);
            hull.position = hull.pad(site);
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Connector)?;
        hull.docked = None;
        Ok(())
    }

    fn status(&self) -> Result<ConnectorStatus, PortError> {
        let hull = self.0.borrow();
        hull.check(SimBlock::Connector)?;
        Ok(hull.connector_status())
    }

    fn position(&self) -> Result<Position, PortError> {
        let hull = self.0.borrow();
        hull.check(SimBlock::Connector)?;
        Ok(hull.position)
    }
}

/// Gyros, thrusters, batteries, cargo, and the station drills
#[derive(Debug)]
pub struct Systems(SharedHull);

impl ShipSystems for Systems {
    fn set_gyro_override(&mut self, rates: Option<GyroRates>) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Gyros)?;
        hull.gyro_override = rates;
        Ok(())
    }

    fn set_thrusters_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Thrusters)?;
        hull.thrusters = enabled;
        Ok(())
    }

    fn set_charge_mode(&mut self, mode: ChargeMode) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Batteries)?;
        hull.charge_mode = mode;
        Ok(())
    }

    fn find_drills(&mut self) -> Result<DrillGroup, PortError> {
        let hull = self.0.borrow();
        hull.check(SimBlock::Drills)?;
        if hull.docked != Some(Site::Mine) {
            return Ok(DrillGroup::new());
        }
        Ok((0..hull.world.drill_count)
            .take(MAX_DRILLS)
            .map(|i| BlockId(DRILL_ID_BASE + i))
            .collect())
    }

    fn set_drill_enabled(&mut self, drill: BlockId, enabled: bool) -> Result<(), PortError> {
        let mut hull = self.0.borrow_mut();
        hull.check(SimBlock::Drills)?;
        if enabled {
            if !hull.drills_on.contains(&drill) {
                hull.drills_on.push(drill);
            }
        } else {
            hull.drills_on.retain(|d| *d != drill);
        }
        Ok(())
    }

    /// Containers report volume in microlitres, filled one after another
    fn cargo_fill(&self) -> Result<Fill, PortError> {
        let hull = self.0.borrow();
        hull.check(SimBlock::Cargo)?;
        let capacity = hull.world.cargo_capacity;
        let mut left = hull.cargo;
        Ok((0..hull.world.cargo_containers)
            .map(|_| {
                let held = left.min(capacity);
                left -= held;
                Fill::from_raw(to_raw(held), to_raw(capacity))
            })
            .sum())
    }

    /// Batteries share the stored charge evenly
    fn power_fill(&self) -> Result<Fill, PortError> {
        let hull = self.0.borrow();
        hull.check(SimBlock::Batteries)?;
        let count = hull.world.batteries;
        let each = if count > 0 { hull.charge / count as f64 } else { 0.0 };
        Ok((0..count)
            .map(|_| Fill::new(each, hull.world.battery_capacity))
            .sum())
    }
}

/// Programmable block scheduler
#[derive(Debug)]
pub struct Scheduler {
    rate: TickRate,
}

impl TickControl for Scheduler {
    fn rate(&self) -> TickRate {
        self.rate
    }

    fn set_rate(&mut self, rate: TickRate) {
        self.rate = rate;
    }
}

/// The whole simulated ship
pub struct SimShip {
    hull: SharedHull,
    remote_control: RemoteControl,
    connector: Connector,
    systems: Systems,
    console: StatusLog,
    scheduler: Scheduler,
    /// Named terminal blocks on the grid
    block_names: Vec<String>,
}

impl SimShip {
    pub fn new(config: &SimConfig) -> Self {
        let world = config.world.clone();
        let (position, docked) = match config.start {
            StartSite::Home => (world.home_pad(), Some(Site::Home)),
            StartSite::Mine => (world.mine_pad(), Some(Site::Mine)),
            StartSite::Flight => {
                let midpoint = (world.home_pad() + world.mine_pad()) / 2.0;
                (world.approach_point(midpoint), None)
            }
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let hull = Rc::new(RefCell::new(Hull {
            charge: world.total_battery_capacity() * world.initial_charge,
            world,
            position,
            docked,
            connector_enabled: true,
            autopilot: Autopilot::default(),
            gyro_override: Some(GyroRates::ZERO),
            thrusters: docked.is_none(),
            charge_mode: ChargeMode::Auto,
            drills_on: Vec::new(),
            cargo: 0.0,
            faults: Vec::new(),
            rng,
        }));

        Self {
            remote_control: RemoteControl(Rc::clone(&hull)),
            connector: Connector(Rc::clone(&hull)),
            systems: Systems(Rc::clone(&hull)),
            hull,
            console: StatusLog::default(),
            scheduler: Scheduler {
                rate: TickRate::empty(),
            },
            block_names: vec![
                config.drone.remote_control.clone(),
                config.drone.connector.clone(),
            ],
        }
    }

    /// Advance the world by `dt` seconds
    pub fn step(&mut self, dt: f64) {
        self.hull.borrow_mut().step(dt);
    }

    /// Make a block fail every call from now on
    pub fn inject_fault(&mut self, block: SimBlock) {
        let mut hull = self.hull.borrow_mut();
        if !hull.faults.contains(&block) {
            hull.faults.push(block);
        }
    }

    pub fn clear_fault(&mut self, block: SimBlock) {
        self.hull.borrow_mut().faults.retain(|b| *b != block);
    }

    /// Take a named block off the grid
    pub fn remove_block(&mut self, name: &str) {
        self.block_names.retain(|n| n != name);
    }

    /// Undock and move the ship
    pub fn teleport(&mut self, position: Position) {
        let mut hull = self.hull.borrow_mut();
        hull.docked = None;
        hull.position = position;
    }

    pub fn set_cargo_ratio(&mut self, ratio: f64) {
        let mut hull = self.hull.borrow_mut();
        hull.cargo = hull.world.total_cargo_capacity() * ratio;
    }

    pub fn set_charge_ratio(&mut self, ratio: f64) {
        let mut hull = self.hull.borrow_mut();
        hull.charge = hull.world.total_battery_capacity() * ratio;
    }

    pub fn position(&self) -> Position {
        self.hull.borrow().position
    }

    /// Site the connector is locked to
    pub fn docked(&self) -> Option<Site> {
        self.hull.borrow().docked
    }

    pub fn connector_status(&self) -> ConnectorStatus {
        self.hull.borrow().connector_status()
    }

    pub fn cargo_ratio(&self) -> f64 {
        let hull = self.hull.borrow();
        hull.cargo / hull.world.total_cargo_capacity()
    }

    pub fn charge_ratio(&self) -> f64 {
        let hull = self.hull.borrow();
        hull.charge / hull.world.total_battery_capacity()
    }

    /// Current remote control settings
    pub fn autopilot(&self) -> Autopilot {
        self.hull.borrow().autopilot.clone()
    }

    pub fn gyro_override(&self) -> Option<GyroRates> {
        self.hull.borrow().gyro_override
    }

    pub fn thrusters_enabled(&self) -> bool {
        self.hull.borrow().thrusters
    }

    pub fn drills_running(&self) -> usize {
        self.hull.borrow().drills_on.len()
    }

    pub fn charge_mode(&self) -> ChargeMode {
        self.hull.borrow().charge_mode
    }

    pub fn console(&self) -> &StatusLog {
        &self.console
    }

    pub fn tick_rate(&self) -> TickRate {
        self.scheduler.rate
    }
}

impl StatusSink for SimShip {
    fn report(&mut self, line: &str) {
        self.console.report(line);
    }
}

impl TickControl for SimShip {
    fn rate(&self) -> TickRate {
        self.scheduler.rate
    }

    fn set_rate(&mut self, rate: TickRate) {
        self.scheduler.rate = rate;
    }
}

impl Grid for SimShip {
    fn has_block(&self, name: &str) -> bool {
        self.block_names.iter().any(|n| n == name)
    }

    fn group_len(&self, group: BlockGroup) -> usize {
        let hull = self.hull.borrow();
        match group {
            BlockGroup::Cargo => hull.world.cargo_containers,
            BlockGroup::Batteries => hull.world.batteries,
            BlockGroup::Thrusters => 6,
            BlockGroup::Gyros => 1,
            BlockGroup::Drills => match hull.docked {
                Some(Site::Mine) => hull.world.drill_count as usize,
                _ => 0,
            },
        }
    }

    fn ship<'a>(&'a mut self, waypoints: &'a MissionWaypoints) -> ShipContext<'a> {
        ShipContext {
            movement: &mut self.remote_control,
            docking_port: &mut self.connector,
            systems: &mut self.systems,
            status: &mut self.console,
            ticks: &mut self.scheduler,
            waypoints,
        }
    }
}
