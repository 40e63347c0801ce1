use std::time::Duration;

use turbine_core::ports::{BlockGroup, ConnectorStatus, TickRate};
use turbine_core::{ActionKind, ConfigError, DroneError, ExecutorState, FaultOrigin, Site, Stage};
use turbine_sitl::{SimBlock, SimConfig, SitlRunner, StartSite, TimeMode};

/// Ten simulated minutes at 60 Hz
const TEN_MINUTES: u64 = 36_000;

fn config(start: StartSite) -> SimConfig {
    SimConfig {
        seed: Some(42),
        start,
        ..SimConfig::default()
    }
}

fn last_line(runner: &SitlRunner) -> String {
    runner.ship().console().last().unwrap_or_default().to_string()
}

// ============================================================================
// Full cycle
// ============================================================================

#[test]
fn test_home_to_mine_and_back() {
    let mut runner = SitlRunner::new(config(StartSite::Home));

    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked().is_none())
        .expect("never left home");
    assert!(runner.ship().thrusters_enabled());
    assert_eq!(runner.program().state(), ExecutorState::Running);

    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked() == Some(Site::Mine))
        .expect("never docked at the mine");
    assert_eq!(runner.program().executor().cycles(), 1);

    runner
        .run_until(TEN_MINUTES, |r| r.ship().drills_running() == 4)
        .expect("drills never started");

    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked() == Some(Site::Home))
        .expect("never returned home");
    assert!(runner.ship().cargo_ratio() > 0.89);
    assert_eq!(runner.ship().drills_running(), 0);
    assert_eq!(runner.program().executor().cycles(), 2);
    assert_eq!(runner.program().state(), ExecutorState::Running);
}

#[test]
fn test_home_unloads_before_leaving() {
    let mut runner = SitlRunner::new(config(StartSite::Home));
    runner.ship_mut().set_cargo_ratio(0.5);
    runner.ship_mut().set_charge_ratio(0.2);

    runner.run_frames(200);
    assert_eq!(runner.ship().docked(), Some(Site::Home));
    assert!(last_line(&runner).contains("unloading: cargo"));

    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked().is_none())
        .expect("never left home");
    assert!(runner.ship().cargo_ratio() < 0.02);
}

#[test]
fn test_docking_switches_to_fast_cadence() {
    let mut runner = SitlRunner::new(config(StartSite::Home));

    runner
        .run_until(TEN_MINUTES, |r| r.ship().tick_rate().contains(TickRate::DOCKING))
        .expect("never started docking");
    // The dock is begun on this tick and first stepped on the next one
    runner.run_frames(10);
    assert!(last_line(&runner).contains("docking at mine"));

    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked() == Some(Site::Mine))
        .expect("never docked at the mine");
    runner.run_frames(10);
    assert_eq!(runner.ship().tick_rate(), TickRate::CRUISE);
}

// ============================================================================
// Restart and resume
// ============================================================================

#[test]
fn test_restart_while_mining_resumes_at_mine() {
    let mut runner = SitlRunner::new(config(StartSite::Home));
    runner
        .run_until(TEN_MINUTES, |r| r.ship().drills_running() > 0)
        .expect("never started mining");

    runner.restart();
    assert_eq!(runner.program().state(), ExecutorState::Idle);
    assert_eq!(runner.program().executor().cycles(), 1);

    runner.run_frames(200);
    assert_eq!(runner.program().state(), ExecutorState::Running);
    assert!(last_line(&runner).contains("mining with 4 drills"));

    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked() == Some(Site::Home))
        .expect("never returned home");
    assert_eq!(runner.program().executor().cycles(), 2);
}

#[test]
fn test_restart_in_flight_refuses() {
    let mut runner = SitlRunner::new(config(StartSite::Home));
    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked().is_none())
        .expect("never left home");
    runner.run_frames(600);
    assert_eq!(runner.ship().connector_status(), ConnectorStatus::Unconnected);

    runner.restart();
    runner.run_frames(100);

    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert!(matches!(
        runner.program().executor().fault(),
        Some(DroneError::NotDocked)
    ));
    assert!(last_line(&runner).contains("please fly me to a docking port"));
    assert!(runner.ship().tick_rate().is_empty());
}

#[test]
fn test_start_in_flight_refuses() {
    let mut runner = SitlRunner::new(config(StartSite::Flight));
    assert_eq!(runner.program().state(), ExecutorState::Idle);

    runner.run_frames(100);
    assert_eq!(runner.program().state(), ExecutorState::Broken);

    let ticks = runner.ticks();
    runner.run_frames(1_000);
    assert_eq!(runner.ticks(), ticks);
}

#[test]
fn test_resume_from_saved_storage() {
    let mut first = SitlRunner::new(config(StartSite::Home));
    first
        .run_until(TEN_MINUTES, |r| r.ship().docked() == Some(Site::Mine))
        .expect("never docked at the mine");
    let storage = first.save();

    let second = SitlRunner::with_storage(config(StartSite::Mine), &storage);
    assert_eq!(second.program().executor().cycles(), 1);
}

#[test]
fn test_garbage_storage_is_ignored() {
    let mut runner = SitlRunner::with_storage(config(StartSite::Mine), "not hex at all");
    assert_eq!(runner.program().state(), ExecutorState::Idle);

    runner.run_frames(100);
    assert_eq!(runner.program().state(), ExecutorState::Running);
    assert_eq!(runner.ship().drills_running(), 4);
}

// ============================================================================
// Breakdowns
// ============================================================================

#[test]
fn test_abort_command() {
    let mut runner = SitlRunner::new(config(StartSite::Mine));
    runner.run_frames(100);
    assert_eq!(runner.program().state(), ExecutorState::Running);

    runner.command("abort");
    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert!(matches!(
        runner.program().executor().fault(),
        Some(DroneError::Aborted)
    ));
    assert!(last_line(&runner).contains("user requested abort"));

    runner.command("");
    assert_eq!(runner.program().state(), ExecutorState::Broken);
}

#[test]
fn test_unknown_command_is_ignored() {
    let mut runner = SitlRunner::new(config(StartSite::Mine));
    runner.run_frames(100);
    let lines = runner.ship().console().total();

    runner.command("dance");
    assert_eq!(runner.program().state(), ExecutorState::Running);
    assert_eq!(runner.ship().console().total(), lines);
}

#[test]
fn test_hardware_fault_breaks_drone() {
    let mut runner = SitlRunner::new(config(StartSite::Home));
    runner
        .run_until(TEN_MINUTES, |r| r.ship().docked().is_none())
        .expect("never left home");

    runner.ship_mut().inject_fault(SimBlock::Connector);
    runner.run_frames(100);

    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert!(matches!(
        runner.program().executor().fault(),
        Some(DroneError::Port(_))
    ));
    assert!(last_line(&runner).ends_with("fly step: hardware fault: connector is unreachable"));
}

#[test]
fn test_fault_at_startup_seed() {
    let mut runner = SitlRunner::with_ship(config(StartSite::Home), |ship| {
        ship.inject_fault(SimBlock::Thrusters);
    });
    runner.run_frames(100);

    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert_eq!(
        runner.program().executor().fault_origin(),
        Some(FaultOrigin::Action(ActionKind::SitAtDockingPort, Stage::Begin))
    );
    assert!(last_line(&runner).ends_with("\nsit begin: hardware fault: thrusters is unreachable"));
}

// ============================================================================
// Configuration faults
// ============================================================================

#[test]
fn test_missing_connector_block() {
    let runner = SitlRunner::with_ship(config(StartSite::Home), |ship| {
        ship.remove_block("Drone Connector");
    });

    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert!(runner.program().waypoints().is_none());
    assert!(runner.ship().tick_rate().is_empty());
    assert!(last_line(&runner).contains("can't find block: 'Drone Connector'"));
}

#[test]
fn test_empty_battery_group() {
    let mut sim = config(StartSite::Home);
    sim.world.batteries = 0;
    let runner = SitlRunner::new(sim);

    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert!(matches!(
        runner.program().executor().fault(),
        Some(DroneError::Config(ConfigError::EmptyGroup {
            group: BlockGroup::Batteries
        }))
    ));
}

#[test]
fn test_bad_waypoint_text() {
    let mut sim = config(StartSite::Home);
    sim.drone.custom_data = "GPS:Home:0:0:30:".to_string();
    let mut runner = SitlRunner::new(sim);

    assert!(matches!(
        runner.program().executor().fault(),
        Some(DroneError::Config(ConfigError::WaypointCount { found: 1 }))
    ));

    runner.run_frames(1_000);
    assert_eq!(runner.ticks(), 0);
}

#[test]
fn test_non_finite_waypoint_is_a_config_fault() {
    let mut sim = config(StartSite::Home);
    sim.drone.custom_data = "GPS:Home:NaN:0:0:\nGPS:Mine:inf:0:0:\n".to_string();
    let runner = SitlRunner::new(sim);

    assert_eq!(runner.program().state(), ExecutorState::Broken);
    assert!(matches!(
        runner.program().executor().fault(),
        Some(DroneError::Config(ConfigError::MalformedWaypoint { index: 0 }))
    ));
    assert!(last_line(&runner).contains("GPS waypoint #1 is malformed"));
}

// ============================================================================
// Paced frames
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_realtime_pacing() {
    let mut runner = SitlRunner::new(config(StartSite::Mine));
    runner.set_time_mode(TimeMode::Scaled { factor: 1.0 });

    let start = tokio::time::Instant::now();
    runner.run_realtime(200).await;

    assert_eq!(runner.frame(), 200);
    assert_eq!(runner.ticks(), 2);
    // First interval tick completes immediately
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn test_free_running_is_unpaced() {
    let mut runner = SitlRunner::new(config(StartSite::Mine));
    runner.run_realtime(1_000).await;
    assert_eq!(runner.frame(), 1_000);
    assert_eq!(runner.ticks(), 10);
}
