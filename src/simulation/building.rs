//! Building state for the elevator simulation
//!
//! Floors with their waiting passengers, and the cars serving them.
//! This is the single mutable world of a run; every mutation goes through
//! one of the primitives below, and each primitive validates its inputs
//! before touching anything.

use log::debug;

use super::car::CarState;
use super::config::BuildingConfig;
use super::error::{SimError, SimResult};
use super::request_queue::RequestQueue;
use super::types::{CarId, Direction, Exchange};

/// A floor of the building
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorState {
    requests: RequestQueue,
}

impl FloorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &RequestQueue {
        &self.requests
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    pub fn add_request(&mut self, destination: usize) {
        self.requests.enqueue(destination);
    }
}

/// Floors and cars of one building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingState {
    floors: Vec<FloorState>,
    cars: Vec<CarState>,
    /// Passengers that reached their destination
    delivered: usize,
}

impl BuildingState {
    /// Build the initial state from a resolved configuration
    ///
    /// Car `i` starts on floor `i % floor_count`, going up when `i` is even.
    pub fn new(config: &BuildingConfig) -> SimResult<Self> {
        config.validate()?;

        let mut floors = vec![FloorState::new(); config.floor_count];
        for (&floor, destinations) in &config.initial_requests {
            floors[floor].requests.enqueue_all(destinations.iter().copied());
        }

        let cars = (0..config.car_count)
            .map(|i| {
                let direction = if i % 2 == 0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                CarState::new(
                    CarId(i),
                    config.capacity_per_car,
                    i % config.floor_count,
                    direction,
                )
            })
            .collect();

        Ok(Self {
            floors,
            cars,
            delivered: 0,
        })
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    pub fn top_floor(&self) -> usize {
        self.floors.len() - 1
    }

    pub fn floors(&self) -> &[FloorState] {
        &self.floors
    }

    pub fn cars(&self) -> &[CarState] {
        &self.cars
    }

    pub fn car_ids(&self) -> impl Iterator<Item = CarId> {
        (0..self.cars.len()).map(CarId)
    }

    pub fn floor(&self, floor: usize) -> SimResult<&FloorState> {
        self.floors.get(floor).ok_or_else(|| {
            SimError::invalid(format!(
                "floor {} is out of range (building has {} floors)",
                floor,
                self.floors.len()
            ))
        })
    }

    pub fn car(&self, car: CarId) -> SimResult<&CarState> {
        self.cars.get(car.0).ok_or_else(|| {
            SimError::invalid(format!(
                "{} is out of range (building has {} cars)",
                car,
                self.cars.len()
            ))
        })
    }

    fn car_mut(&mut self, car: CarId) -> SimResult<&mut CarState> {
        let count = self.cars.len();
        self.cars.get_mut(car.0).ok_or_else(|| {
            SimError::invalid(format!(
                "{} is out of range (building has {} cars)",
                car, count
            ))
        })
    }

    /// Queue of the floor the car is currently on
    pub fn current_floor_requests(&self, car: CarId) -> SimResult<&RequestQueue> {
        let floor = self.car(car)?.current_floor();
        Ok(self.floors[floor].requests())
    }

    /// Register a new waiting passenger on `floor`
    pub fn add_request(&mut self, floor: usize, destination: usize) -> SimResult<()> {
        if destination >= self.floors.len() {
            return Err(SimError::invalid(format!(
                "destination floor {} is out of range",
                destination
            )));
        }
        self.floor(floor)?;
        self.floors[floor].add_request(destination);
        Ok(())
    }

    /// Put a car on a given floor and direction, e.g. before a run starts
    pub fn place_car(&mut self, car: CarId, floor: usize, direction: Direction) -> SimResult<()> {
        self.floor(floor)?;
        let state = self.car_mut(car)?;
        state.set_floor(floor);
        state.set_direction(direction);
        Ok(())
    }

    pub fn is_at_top(&self, car: CarId) -> SimResult<bool> {
        Ok(self.car(car)?.current_floor() == self.top_floor())
    }

    pub fn is_at_bottom(&self, car: CarId) -> SimResult<bool> {
        Ok(self.car(car)?.current_floor() == 0)
    }

    /// Move one floor up; no-op on the top floor
    pub fn move_up(&mut self, car: CarId) -> SimResult<()> {
        if self.is_at_top(car)? {
            return Ok(());
        }
        let state = self.car_mut(car)?;
        state.set_floor(state.current_floor() + 1);
        state.set_direction(Direction::Up);
        Ok(())
    }

    /// Move one floor down; no-op on the ground floor
    pub fn move_down(&mut self, car: CarId) -> SimResult<()> {
        if self.is_at_bottom(car)? {
            return Ok(());
        }
        let state = self.car_mut(car)?;
        state.set_floor(state.current_floor() - 1);
        state.set_direction(Direction::Down);
        Ok(())
    }

    /// Move one floor in the given direction
    pub fn move_towards(&mut self, car: CarId, direction: Direction) -> SimResult<()> {
        match direction {
            Direction::Up => self.move_up(car),
            Direction::Down => self.move_down(car),
        }
    }

    pub fn set_direction(&mut self, car: CarId, direction: Direction) -> SimResult<()> {
        self.car_mut(car)?.set_direction(direction);
        Ok(())
    }

    /// Flip the car's direction and return the new one
    pub fn reverse(&mut self, car: CarId) -> SimResult<Direction> {
        let state = self.car_mut(car)?;
        let direction = state.direction().reversed();
        state.set_direction(direction);
        Ok(direction)
    }

    /// Move one floor in the direction of travel, turning around first when
    /// the car is at the end of the shaft it is heading for
    ///
    /// Returns true if the car reversed.
    pub fn continue_in_direction(&mut self, car: CarId) -> SimResult<bool> {
        let direction = self.car(car)?.direction();
        let at_end = match direction {
            Direction::Up => self.is_at_top(car)?,
            Direction::Down => self.is_at_bottom(car)?,
        };
        if at_end {
            self.reverse(car)?;
        }
        let direction = self.car(car)?.direction();
        self.move_towards(car, direction)?;
        Ok(at_end)
    }

    /// Let off everyone destined for the car's floor, then board waiting
    /// passengers from that floor in FIFO order up to the free capacity
    ///
    /// Anyone who does not fit stays queued for a later stop.
    pub fn stop_and_exchange(&mut self, car: CarId) -> SimResult<Exchange> {
        let state = self.car_mut(car)?;
        let floor = state.current_floor();
        let alighted = state.alight_here();
        let space = state.available_capacity();

        let boarded = self.floors[floor].requests.dequeue_up_to(space);
        self.cars[car.0].board(&boarded);
        self.delivered += alighted;

        debug!(
            "{} stopped at floor {}: {} off, {} on, {} still waiting",
            car,
            floor,
            alighted,
            boarded.len(),
            self.floors[floor].requests.len()
        );

        Ok(Exchange {
            floor,
            alighted,
            boarded,
        })
    }

    /// Whether a stop at the car's floor would move anyone
    pub fn can_exchange(&self, car: CarId) -> SimResult<bool> {
        let state = self.car(car)?;
        let floor = state.current_floor();
        let alighting = state.has_occupant_for(floor);
        let boarding = self.floors[floor].has_requests() && (alighting || !state.is_full());
        Ok(alighting || boarding)
    }

    /// Whether the car could pick someone up on its current floor
    pub fn can_pick_up(&self, car: CarId) -> SimResult<bool> {
        let state = self.car(car)?;
        let floor = state.current_floor();
        Ok(self.floors[floor].has_requests()
            && (!state.is_full() || state.has_occupant_for(floor)))
    }

    /// Floors with at least one waiting passenger, ascending
    pub fn pending_floors(&self) -> impl Iterator<Item = usize> + '_ {
        self.floors
            .iter()
            .enumerate()
            .filter(|(_, floor)| floor.has_requests())
            .map(|(index, _)| index)
    }

    /// Lowest and highest floor with waiting passengers
    pub fn pending_bounds(&self) -> Option<(usize, usize)> {
        let lowest = self.pending_floors().next()?;
        let highest = self.pending_floors().last()?;
        Some((lowest, highest))
    }

    pub fn count_pending(&self) -> usize {
        self.floors.iter().map(|floor| floor.requests.len()).sum()
    }

    pub fn count_onboard(&self) -> usize {
        self.cars.iter().map(CarState::occupancy).sum()
    }

    pub fn count_delivered(&self) -> usize {
        self.delivered
    }

    /// True once no floor has anyone waiting
    pub fn is_complete(&self) -> bool {
        self.floors.iter().all(|floor| !floor.has_requests())
    }

    /// True once nobody is waiting and nobody is still riding
    pub fn is_settled(&self) -> bool {
        self.is_complete() && self.count_onboard() == 0
    }

    /// Text picture of the shaft, top floor first
    ///
    /// ```text
    ///   4 |      | [0^ 1/4]
    ///   3 | 2    |
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for floor in (0..self.floors.len()).rev() {
            let waiting: Vec<String> = self.floors[floor]
                .requests
                .iter()
                .map(|d| d.to_string())
                .collect();
            out.push_str(&format!("{:>3} | {:<12} |", floor, waiting.join(",")));
            for car in self.cars.iter().filter(|c| c.current_floor() == floor) {
                let arrow = if car.is_going_up() { '^' } else { 'v' };
                out.push_str(&format!(
                    " [{}{} {}/{}]",
                    car.id().0,
                    arrow,
                    car.occupancy(),
                    car.capacity()
                ));
            }
            out.push('\n');
        }
        out
    }
}
