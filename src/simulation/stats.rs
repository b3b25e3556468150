//! Run statistics
//!
//! Counters accumulated tick by tick, used by the headless runner to
//! compare policies.

use log::info;

use super::building::BuildingState;
use super::types::{CarStep, StepKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks: u64,
    /// Car steps that changed floor
    pub moves: u64,
    /// Car steps in which someone got on or off
    pub stops: u64,
    pub reversals: u64,
    pub starvation_overrides: u64,
    pub boarded: usize,
    pub delivered: usize,
}

impl SimStats {
    /// Fold one tick's car steps into the counters
    pub fn record(&mut self, steps: &[CarStep]) {
        self.ticks += 1;
        for step in steps {
            if step.moved() {
                self.moves += 1;
            }
            if step.stopped() {
                self.stops += 1;
            }
            if step.reversed {
                self.reversals += 1;
            }
            if step.kind == StepKind::StarvationOverride {
                self.starvation_overrides += 1;
            }
            if let Some(exchange) = &step.exchange {
                self.boarded += exchange.boarded.len();
                self.delivered += exchange.alighted;
            }
        }
    }

    /// Log the end-of-run banner and counters
    pub fn log_summary(&self, building: &BuildingState) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks: {}", self.ticks);
        info!("Moves: {}", self.moves);
        info!("Stops: {}", self.stops);
        info!("Reversals: {}", self.reversals);
        info!("Starvation overrides: {}", self.starvation_overrides);
        info!("Boarded: {}", self.boarded);
        info!("Delivered: {}", self.delivered);
        info!("Still waiting: {}", building.count_pending());
        info!("Still riding: {}", building.count_onboard());
    }
}
