//! Simulation driver
//!
//! Owns the building and the scheduler, and advances them one tick at a
//! time. Nothing in here blocks or spawns threads; the caller decides when
//! the next tick happens.

use log::{info, warn};

use super::building::BuildingState;
use super::config::BuildingConfig;
use super::coordinator::MultiCarCoordinator;
use super::error::SimResult;
use super::policy::MotionPolicy;
use super::stats::SimStats;
use super::types::CarStep;

/// How cars are driven each tick
#[derive(Debug, Clone)]
pub enum Scheduler {
    /// Every car runs the same policy over the whole building
    Independent(MotionPolicy),
    /// Floors are assigned to cars, each car sweeps its own floors
    Coordinated(MultiCarCoordinator),
}

impl Scheduler {
    pub fn name(&self) -> &'static str {
        match self {
            Scheduler::Independent(policy) => policy.name(),
            Scheduler::Coordinated(_) => "DISPATCH",
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// One entry per car, in the order the cars moved
    pub steps: Vec<CarStep>,
}

pub struct Simulation {
    building: BuildingState,
    scheduler: Scheduler,
    tick: u64,
    stats: SimStats,
}

impl Simulation {
    pub fn new(building: BuildingState, scheduler: Scheduler) -> Self {
        Self {
            building,
            scheduler,
            tick: 0,
            stats: SimStats::default(),
        }
    }

    /// Build the building from a configuration and attach a scheduler
    pub fn from_config(config: &BuildingConfig, scheduler: Scheduler) -> SimResult<Self> {
        Ok(Self::new(BuildingState::new(config)?, scheduler))
    }

    /// Coordinated multi-car simulation over a configured building
    pub fn coordinated(config: &BuildingConfig) -> SimResult<Self> {
        let building = BuildingState::new(config)?;
        let coordinator = MultiCarCoordinator::new(&building);
        Ok(Self::new(building, Scheduler::Coordinated(coordinator)))
    }

    pub fn building(&self) -> &BuildingState {
        &self.building
    }

    /// Mutable access for injecting requests between ticks
    pub fn building_mut(&mut self) -> &mut BuildingState {
        &mut self.building
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// True once no floor has anyone waiting
    pub fn is_complete(&self) -> bool {
        self.building.is_complete()
    }

    /// Advance every car by one tick
    pub fn step(&mut self) -> SimResult<TickReport> {
        let steps = match &mut self.scheduler {
            Scheduler::Independent(policy) => policy.step(&mut self.building)?,
            Scheduler::Coordinated(coordinator) => coordinator.step(&mut self.building)?,
        };
        self.tick += 1;
        self.stats.record(&steps);
        Ok(TickReport {
            tick: self.tick,
            steps,
        })
    }

    /// Step until nobody is waiting or riding, or until `max_ticks` ticks ran
    ///
    /// Returns true if the building settled.
    pub fn run(&mut self, max_ticks: u64) -> SimResult<bool> {
        info!(
            "Running {} with {} floors, {} cars, {} waiting",
            self.scheduler.name(),
            self.building.floor_count(),
            self.building.car_count(),
            self.building.count_pending()
        );
        while !self.building.is_settled() {
            if self.tick >= max_ticks {
                warn!(
                    "{} stopped after {} ticks with {} waiting and {} riding",
                    self.scheduler.name(),
                    self.tick,
                    self.building.count_pending(),
                    self.building.count_onboard()
                );
                return Ok(false);
            }
            self.step()?;
        }
        Ok(true)
    }
}
