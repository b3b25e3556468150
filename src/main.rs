use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use elevator_sim::simulation::{
    AdaptiveConfig, BuildingConfig, BuildingState, MotionPolicy, MultiCarCoordinator, Scheduler,
    SimStats, Simulation, DEFAULT_MAX_SKIPS, DEFAULT_STARVATION_THRESHOLD,
};

/// Largest queue a random building puts on one floor, exclusive
const RANDOM_MAX_PER_FLOOR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Sweep the whole shaft end to end
    Scan,
    /// Sweep only as far as the outermost request
    Look,
    /// Look with starvation handling
    Adaptive,
    /// Assign floors to cars and let each car sweep its own floors
    Dispatch,
}

#[derive(Parser)]
#[command(name = "elevator_sim")]
#[command(about = "Headless elevator dispatch simulation")]
struct Cli {
    /// Building file to load (`floors,capacity` header, then `floor:dest,dest` lines)
    #[arg(long, conflicts_with = "random")]
    config: Option<PathBuf>,

    /// Generate a random building instead of loading one
    #[arg(long)]
    random: bool,

    /// Seed for the random building
    #[arg(long)]
    seed: Option<u64>,

    /// Floors of a random building
    #[arg(long, default_value = "10")]
    floors: usize,

    /// Capacity per car of a random building
    #[arg(long, default_value = "5")]
    capacity: usize,

    /// Number of cars
    #[arg(long, default_value = "1")]
    cars: usize,

    /// Scheduling strategy
    #[arg(long, value_enum, default_value = "look")]
    strategy: Strategy,

    /// Maximum number of ticks before giving up
    #[arg(long, default_value = "10000")]
    ticks: u64,

    /// Ticks a floor may wait before the adaptive policy overrides its sweep
    #[arg(long, default_value_t = DEFAULT_STARVATION_THRESHOLD)]
    starvation_threshold: u64,

    /// Floors the adaptive policy may pass before reconsidering its direction
    #[arg(long, default_value_t = DEFAULT_MAX_SKIPS)]
    max_skips: u32,

    /// Run Scan, Look and Adaptive on the same building and compare them
    #[arg(long)]
    compare: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = building_config(&cli)?;
    let adaptive = AdaptiveConfig {
        starvation_threshold: cli.starvation_threshold,
        max_skips: cli.max_skips,
    };

    if cli.compare {
        compare_policies(&config, adaptive, cli.ticks)
    } else {
        run_headless(&config, scheduler_for(cli.strategy, &config, adaptive)?, cli.ticks)
    }
}

/// Resolve the building from the command line
fn building_config(cli: &Cli) -> Result<BuildingConfig> {
    let config = if let Some(path) = &cli.config {
        BuildingConfig::load(path, cli.cars)?
    } else if cli.random {
        let seed = cli.seed.unwrap_or_else(rand::random);
        info!("Random building with seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        BuildingConfig::random(
            &mut rng,
            cli.floors,
            cli.cars,
            cli.capacity,
            RANDOM_MAX_PER_FLOOR,
        )
    } else {
        demo_building(cli.cars)
    };
    config
        .validate()
        .context("Building configuration rejected")?;
    Ok(config)
}

/// Small fixed building used when nothing else is given
fn demo_building(car_count: usize) -> BuildingConfig {
    BuildingConfig::new(10, car_count, 5)
        .with_requests(0, vec![5, 9])
        .with_requests(2, vec![7])
        .with_requests(4, vec![1, 8, 0])
        .with_requests(6, vec![3])
        .with_requests(9, vec![0, 2, 5])
}

fn scheduler_for(
    strategy: Strategy,
    config: &BuildingConfig,
    adaptive: AdaptiveConfig,
) -> Result<Scheduler> {
    let scheduler = match strategy {
        Strategy::Scan => Scheduler::Independent(MotionPolicy::scan()),
        Strategy::Look => Scheduler::Independent(MotionPolicy::look()),
        Strategy::Adaptive => Scheduler::Independent(MotionPolicy::adaptive(adaptive)),
        Strategy::Dispatch => {
            let building = BuildingState::new(config).context("Failed to build the building")?;
            Scheduler::Coordinated(MultiCarCoordinator::new(&building))
        }
    };
    Ok(scheduler)
}

/// Run one simulation to completion (or to the tick cap) and report it
fn run_headless(config: &BuildingConfig, scheduler: Scheduler, max_ticks: u64) -> Result<()> {
    let mut simulation = Simulation::from_config(config, scheduler)
        .context("Failed to create simulation")?;

    println!("Initial state:");
    println!("{}", simulation.building().render());

    let settled = simulation.run(max_ticks).context("Simulation failed")?;

    println!("=== Final State ===");
    println!("{}", simulation.building().render());
    simulation.stats().log_summary(simulation.building());

    if !settled {
        warn!("Tick cap of {} reached before every passenger arrived", max_ticks);
    }
    Ok(())
}

/// Run every motion policy on the same building and name the cheapest
fn compare_policies(config: &BuildingConfig, adaptive: AdaptiveConfig, max_ticks: u64) -> Result<()> {
    let policies = [
        MotionPolicy::scan(),
        MotionPolicy::look(),
        MotionPolicy::adaptive(adaptive),
    ];

    let mut results: Vec<(&'static str, bool, SimStats)> = Vec::with_capacity(policies.len());
    for policy in policies {
        let name = policy.name();
        let mut simulation = Simulation::from_config(config, Scheduler::Independent(policy))
            .with_context(|| format!("Failed to create {} simulation", name))?;
        let settled = simulation
            .run(max_ticks)
            .with_context(|| format!("{} simulation failed", name))?;
        results.push((name, settled, simulation.stats().clone()));
    }

    println!("{:<10} {:>8} {:>8} {:>10}", "Policy", "Steps", "Moves", "Reversals");
    for (name, settled, stats) in &results {
        let marker = if *settled { "" } else { " (cap)" };
        println!(
            "{:<10} {:>8} {:>8} {:>10}{}",
            name, stats.ticks, stats.moves, stats.reversals, marker
        );
    }

    // Fewest ticks wins, fewest moves breaks ties
    let best = results
        .iter()
        .filter(|(_, settled, _)| *settled)
        .min_by_key(|(_, _, stats)| (stats.ticks, stats.moves));
    match best {
        Some((name, _, stats)) => println!(
            "Most efficient: {} ({} steps, {} moves)",
            name, stats.ticks, stats.moves
        ),
        None => println!("No policy finished within {} ticks", max_ticks),
    }
    Ok(())
}
