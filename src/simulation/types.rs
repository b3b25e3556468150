//! Core types for the elevator simulation
//!
//! Small value types shared by every component of the engine.

use std::fmt;

/// A wrapper type for car indices
///
/// Cars are numbered `0..car_count` in the order they were created, and
/// that order is also the order in which they move within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub usize);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "car {}", self.0)
    }
}

/// Direction of travel of a car or a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Direction of a trip from `from` to `to`; a same-floor trip counts as Down
    pub fn of_trip(from: usize, to: usize) -> Self {
        if to > from {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Direction that leads from `from` towards `target`, if they differ
    pub fn towards(from: usize, target: usize) -> Option<Self> {
        match target.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// Passengers moved during one stop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    /// Floor where the exchange happened
    pub floor: usize,
    /// Number of occupants that left the car
    pub alighted: usize,
    /// Destinations of the passengers that boarded, in boarding order
    pub boarded: Vec<usize>,
}

impl Exchange {
    pub fn is_empty(&self) -> bool {
        self.alighted == 0 && self.boarded.is_empty()
    }
}

/// The rule that produced a car's behaviour in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// No pending work anywhere for this car
    Idle,
    /// The car stayed on its floor to load passengers
    Dwell,
    /// Regular sweep motion (possibly with a reversal)
    Sweep,
    /// Adaptive policy steered towards a starved floor
    StarvationOverride,
}

/// What a single car did during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarStep {
    pub car: CarId,
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
    pub reversed: bool,
    pub exchange: Option<Exchange>,
    pub kind: StepKind,
}

impl CarStep {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }

    /// True when the car loaded or unloaded anyone this tick
    pub fn stopped(&self) -> bool {
        self.exchange.as_ref().is_some_and(|e| !e.is_empty())
    }
}
