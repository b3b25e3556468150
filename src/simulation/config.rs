//! Building configuration
//!
//! The resolved shape a building is created from, plus the loader for the
//! plain-text building format:
//!
//! ```text
//! # comment
//! 5,4          <- floors,capacity
//! 1:3,4        <- floor:destination,destination,...
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use rand::Rng;

use super::error::{SimError, SimResult};

/// Starvation threshold used by the adaptive policy, in ticks
pub const DEFAULT_STARVATION_THRESHOLD: u64 = 10;
/// Floors an adaptive car may pass without stopping before it reconsiders its direction
pub const DEFAULT_MAX_SKIPS: u32 = 3;

/// Resolved building layout and initial requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingConfig {
    pub floor_count: usize,
    pub car_count: usize,
    pub capacity_per_car: usize,
    /// Waiting passengers per floor, each given by their destination floor
    pub initial_requests: BTreeMap<usize, Vec<usize>>,
}

impl BuildingConfig {
    pub fn new(floor_count: usize, car_count: usize, capacity_per_car: usize) -> Self {
        Self {
            floor_count,
            car_count,
            capacity_per_car,
            initial_requests: BTreeMap::new(),
        }
    }

    /// Set the queue of `floor`, replacing anything set before
    pub fn with_requests(mut self, floor: usize, destinations: Vec<usize>) -> Self {
        self.initial_requests.insert(floor, destinations);
        self
    }

    /// Check every bound the building relies on
    pub fn validate(&self) -> SimResult<()> {
        if self.floor_count < 1 {
            return Err(SimError::invalid("a building needs at least one floor"));
        }
        if self.car_count < 1 {
            return Err(SimError::invalid("a building needs at least one car"));
        }
        if self.capacity_per_car < 1 {
            return Err(SimError::invalid("car capacity must be at least 1"));
        }
        for (&floor, destinations) in &self.initial_requests {
            if floor >= self.floor_count {
                return Err(SimError::invalid(format!(
                    "requests listed for floor {} but the building has {} floors",
                    floor, self.floor_count
                )));
            }
            if let Some(&bad) = destinations.iter().find(|&&d| d >= self.floor_count) {
                return Err(SimError::invalid(format!(
                    "floor {} has a request for floor {} which does not exist",
                    floor, bad
                )));
            }
        }
        Ok(())
    }

    /// Parse the text format; `car_count` is not part of the file
    pub fn parse(text: &str, car_count: usize) -> SimResult<Self> {
        let mut floor_count = 0;
        let mut capacity = 0;
        let mut requests = BTreeMap::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() == 1 && parts[0].contains(',') {
                let values: Vec<&str> = parts[0].split(',').collect();
                floor_count = parse_number(values[0], line_no)?;
                capacity = parse_number(values.get(1).copied().unwrap_or(""), line_no)?;
            } else if parts.len() == 2 {
                let floor = parse_number(parts[0], line_no)?;
                let mut destinations = Vec::new();
                for item in parts[1].split(',') {
                    if item.trim().is_empty() {
                        continue;
                    }
                    destinations.push(parse_number(item, line_no)?);
                }
                requests.insert(floor, destinations);
            } else {
                warn!("Skipping unrecognised configuration line {}: {:?}", line_no, line);
            }
        }

        Ok(Self {
            floor_count,
            car_count,
            capacity_per_car: capacity,
            initial_requests: requests,
        })
    }

    /// Read and parse a building file
    pub fn load(path: impl AsRef<Path>, car_count: usize) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read building file {}", path.display()))?;
        Self::parse(&text, car_count)
            .with_context(|| format!("Failed to parse building file {}", path.display()))
    }

    /// Random building where nobody asks for the floor they are already on
    ///
    /// Each floor gets between zero and `max_requests_per_floor - 1` waiting passengers.
    pub fn random<R: Rng>(
        rng: &mut R,
        floor_count: usize,
        car_count: usize,
        capacity_per_car: usize,
        max_requests_per_floor: usize,
    ) -> Self {
        let mut config = Self::new(floor_count, car_count, capacity_per_car);
        if floor_count < 2 || max_requests_per_floor == 0 {
            return config;
        }

        for floor in 0..floor_count {
            let count = rng.random_range(0..max_requests_per_floor);
            let destinations: Vec<usize> = (0..count)
                .map(|_| {
                    // Draw from the other floors only
                    let pick = rng.random_range(0..floor_count - 1);
                    if pick >= floor {
                        pick + 1
                    } else {
                        pick
                    }
                })
                .collect();
            if !destinations.is_empty() {
                config.initial_requests.insert(floor, destinations);
            }
        }
        config
    }

    /// Total number of waiting passengers
    pub fn request_count(&self) -> usize {
        self.initial_requests.values().map(Vec::len).sum()
    }
}

fn parse_number(item: &str, line_no: usize) -> SimResult<usize> {
    item.trim().parse().map_err(|_| {
        SimError::invalid(format!(
            "line {}: {:?} is not a non-negative integer",
            line_no,
            item.trim()
        ))
    })
}

/// Tuning knobs of the adaptive (starvation-aware) policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveConfig {
    /// A floor waiting longer than this many ticks overrides the sweep
    pub starvation_threshold: u64,
    /// Consecutive ticks without a pickup before the direction is reconsidered
    pub max_skips: u32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            starvation_threshold: DEFAULT_STARVATION_THRESHOLD,
            max_skips: DEFAULT_MAX_SKIPS,
        }
    }
}
