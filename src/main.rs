use verletsim::{ScenarioConfig, Scenario};
use verletsim::run_2d;
use verletsim::{bench_gravity, bench_verlet};
use verletsim::logger::Logger;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Point masses under Newtonian gravity, velocity Verlet steps, merging on contact")]
struct Args {
    /// Scenario file, looked up as given and then under `scenarios/`.
    /// The built-in Lagrange scene is used when omitted.
    #[arg(short, long)]
    file_name: Option<String>,

    /// Run every step without opening a window
    #[arg(long)]
    headless: bool,

    /// Override the number of steps in the scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// Log level for headless and benchmark runs (the viewer reads RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Time the force pass and the full step, then exit
    #[arg(long)]
    bench: bool,
}

fn resolve_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_config(args: &Args) -> Result<ScenarioConfig> {
    let Some(file_name) = &args.file_name else {
        return Ok(ScenarioConfig::lagrange());
    };

    let config_path = resolve_path(file_name);
    ScenarioConfig::load(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Bevy installs its own subscriber for the windowed viewer
    if args.headless || args.bench {
        Logger::init(args.log_level).map_err(|e| anyhow!("failed to set logger: {}", e))?;
    }

    if args.bench {
        bench_gravity();
        bench_verlet();
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_config(&args)?;
    if let Some(ticks) = args.ticks {
        scenario_cfg.parameters.num_dt = ticks;
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;

    if args.headless {
        let summary = scenario.run_headless();
        info!(
            "momentum drift = {:.3e}, energy drift = {:.3e}",
            (summary.final_momentum - summary.initial_momentum).norm(),
            summary.final_energy - summary.initial_energy
        );
        for b in scenario.bodies() {
            info!("body {}: x = ({:.3}, {:.3}), m = {}", b.id.0, b.x.x, b.x.y, b.m);
        }
    } else {
        run_2d(scenario);
    }

    Ok(())
}
