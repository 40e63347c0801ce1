//! Mining drone simulator.
//!
//! Runs the drone program against the simulated world and prints a summary
//! of where the drone got to.
//!
//! Usage:
//!   cargo run -p turbine_sitl --bin drone_sim -- [OPTIONS]
//!
//! Options:
//!   -c, --config <PATH>   TOML world config (default: built-in world)
//!   -f, --frames <N>      Frames to simulate (default: 216000, one hour at 60 Hz)
//!   --storage <HEX>       Saved program state to resume from
//!   --realtime <FACTOR>   Pace frames at FACTOR times real time (0.001 to 1000)
//!   --abort-at <FRAME>    Send the `abort` command at this frame

use std::env;
use std::path::PathBuf;
use std::process;

use turbine_sitl::{logging, SimConfig, SimulatorError, SitlRunner, TimeMode};

struct Args {
    config: Option<PathBuf>,
    frames: u64,
    storage: String,
    realtime: Option<TimeMode>,
    abort_at: Option<u64>,
}

fn parse_args() -> Result<Args, SimulatorError> {
    let mut args = Args {
        config: None,
        frames: 216_000,
        storage: String::new(),
        realtime: None,
        abort_at: None,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                args.config = Some(PathBuf::from(value(&raw, i, "config")?));
            }
            "-f" | "--frames" => {
                i += 1;
                args.frames = parse_value(&raw, i, "frames")?;
            }
            "--storage" => {
                i += 1;
                args.storage = value(&raw, i, "storage")?.to_string();
            }
            "--realtime" => {
                i += 1;
                args.realtime = Some(TimeMode::scaled(parse_value(&raw, i, "realtime")?)?);
            }
            "--abort-at" => {
                i += 1;
                args.abort_at = Some(parse_value(&raw, i, "abort-at")?);
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                return Err(SimulatorError::InvalidArgument(format!(
                    "unknown option: {other}"
                )));
            }
        }
        i += 1;
    }

    Ok(args)
}

fn value<'a>(raw: &'a [String], i: usize, name: &str) -> Result<&'a str, SimulatorError> {
    raw.get(i)
        .map(String::as_str)
        .ok_or_else(|| SimulatorError::InvalidArgument(format!("--{name} needs a value")))
}

fn parse_value<T: std::str::FromStr>(
    raw: &[String],
    i: usize,
    name: &str,
) -> Result<T, SimulatorError> {
    let text = value(raw, i, name)?;
    text.parse()
        .map_err(|_| SimulatorError::InvalidArgument(format!("--{name}: invalid value '{text}'")))
}

fn print_usage() {
    eprintln!("Usage: drone_sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <PATH>   TOML world config (default: built-in world)");
    eprintln!("  -f, --frames <N>      Frames to simulate (default: 216000)");
    eprintln!("  --storage <HEX>       Saved program state to resume from");
    eprintln!("  --realtime <FACTOR>   Pace frames at FACTOR times real time (0.001 to 1000)");
    eprintln!("  --abort-at <FRAME>    Send the `abort` command at this frame");
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        print_usage();
        process::exit(1);
    }
}

async fn run() -> Result<(), SimulatorError> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    tracing::info!(
        "simulating {} frames at {} Hz, start {:?}",
        args.frames,
        config.frame_hz,
        config.start
    );

    let mut runner = SitlRunner::with_storage(config, &args.storage);
    if let Some(mode) = args.realtime {
        runner.set_time_mode(mode);
    }

    match args.abort_at {
        Some(at) if at < args.frames => {
            runner.run_realtime(at).await;
            runner.command("abort");
            runner.run_realtime(args.frames - at).await;
        }
        _ => runner.run_realtime(args.frames).await,
    }

    let ship = runner.ship();
    let executor = runner.program().executor();
    println!("--- after {:.0} s ({} ticks) ---", runner.sim_time_s(), runner.ticks());
    println!("state:   {:?}", runner.program().state());
    println!("cycles:  {}", executor.cycles());
    println!("docked:  {:?}", ship.docked());
    println!("cargo:   {:.0}%", ship.cargo_ratio() * 100.0);
    println!("charge:  {:.0}%", ship.charge_ratio() * 100.0);
    println!("storage: {}", runner.save());
    println!("--- last status lines ---");
    println!("{}", ship.console().render());

    Ok(())
}
