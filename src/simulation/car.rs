//! Elevator car state for the dispatch simulation
//!
//! A car only changes through the move and stop primitives on
//! [`BuildingState`](super::building::BuildingState).

use super::types::{CarId, Direction};

/// One elevator car
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarState {
    id: CarId,
    capacity: usize,
    current_floor: usize,
    direction: Direction,
    /// Destination floor of every passenger on board
    occupants: Vec<usize>,
}

impl CarState {
    pub(super) fn new(id: CarId, capacity: usize, current_floor: usize, direction: Direction) -> Self {
        Self {
            id,
            capacity,
            current_floor,
            direction,
            occupants: Vec::with_capacity(capacity),
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_floor(&self) -> usize {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_going_up(&self) -> bool {
        self.direction == Direction::Up
    }

    pub fn occupants(&self) -> &[usize] {
        &self.occupants
    }

    pub fn occupancy(&self) -> usize {
        self.occupants.len()
    }

    pub fn available_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.occupants.len())
    }

    pub fn is_full(&self) -> bool {
        self.available_capacity() == 0
    }

    /// Whether anyone on board wants to get off at `floor`
    pub fn has_occupant_for(&self, floor: usize) -> bool {
        self.occupants.contains(&floor)
    }

    /// Whether the car is less than half full
    pub fn is_below_half_capacity(&self) -> bool {
        self.occupants.len() * 2 < self.capacity
    }

    pub(super) fn set_floor(&mut self, floor: usize) {
        self.current_floor = floor;
    }

    pub(super) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Let everyone destined for the current floor off; returns how many left
    pub(super) fn alight_here(&mut self) -> usize {
        let floor = self.current_floor;
        let before = self.occupants.len();
        self.occupants.retain(|&destination| destination != floor);
        before - self.occupants.len()
    }

    /// Board passengers; callers must not exceed the available capacity
    pub(super) fn board(&mut self, destinations: &[usize]) {
        debug_assert!(destinations.len() <= self.available_capacity());
        self.occupants.extend_from_slice(destinations);
    }
}
