//! Floor-to-car assignment for multi-car buildings
//!
//! Every floor with waiting passengers is handed to exactly one car. An
//! assignment is sticky: it holds until the coordinator clears it when a car
//! finishes servicing that floor.

use log::info;

use super::building::BuildingState;
use super::error::{SimError, SimResult};
use super::types::{CarId, Direction};

/// Score bonus for a car already travelling the request's way
pub const SAME_DIRECTION_BONUS: i64 = 2;
/// Score bonus for a car that is less than half full
pub const LIGHT_LOAD_BONUS: i64 = 1;

/// Assignment table from floor to car
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDispatcher {
    assignments: Vec<Option<CarId>>,
}

impl RequestDispatcher {
    pub fn new(floor_count: usize) -> Self {
        Self {
            assignments: vec![None; floor_count],
        }
    }

    pub fn for_building(building: &BuildingState) -> Self {
        Self::new(building.floor_count())
    }

    pub fn assignment(&self, floor: usize) -> Option<CarId> {
        self.assignments.get(floor).copied().flatten()
    }

    /// Floors currently assigned to `car`, ascending
    pub fn assigned_floors(&self, car: CarId) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, assigned)| **assigned == Some(car))
            .map(|(floor, _)| floor)
            .collect()
    }

    /// Score of `car` for a trip from `request_floor` to `destination_floor`; lower is better
    pub fn score(
        building: &BuildingState,
        car: CarId,
        request_floor: usize,
        destination_floor: usize,
    ) -> SimResult<i64> {
        let state = building.car(car)?;
        let mut score = state.current_floor().abs_diff(request_floor) as i64;
        if state.direction() == Direction::of_trip(request_floor, destination_floor) {
            score -= SAME_DIRECTION_BONUS;
        }
        if state.is_below_half_capacity() {
            score -= LIGHT_LOAD_BONUS;
        }
        Ok(score)
    }

    /// Car that should serve a pickup on `request_floor`
    ///
    /// An existing assignment wins. Otherwise the lowest score wins, ties
    /// going to the lowest car index, and the choice is recorded.
    pub fn best_car(
        &mut self,
        building: &BuildingState,
        request_floor: usize,
        destination_floor: usize,
    ) -> SimResult<CarId> {
        self.check_floor(request_floor)?;
        building.floor(destination_floor)?;
        if let Some(car) = self.assignments[request_floor] {
            return Ok(car);
        }

        let mut best: Option<(i64, CarId)> = None;
        for car in building.car_ids() {
            let score = Self::score(building, car, request_floor, destination_floor)?;
            if best.map_or(true, |(best_score, _)| score < best_score) {
                best = Some((score, car));
            }
        }
        let (_, car) = best.ok_or_else(|| SimError::invalid("building has no cars"))?;

        self.assignments[request_floor] = Some(car);
        Ok(car)
    }

    /// Assign every waiting floor that has no car yet
    ///
    /// The real destinations are unknown until passengers board, so the
    /// direction guess sends lower-half floors up to the top floor and the
    /// rest down to the ground floor. Returns the new assignments.
    pub fn dispatch_requests(&mut self, building: &BuildingState) -> SimResult<Vec<(usize, CarId)>> {
        let floor_count = building.floor_count();
        let waiting: Vec<usize> = building
            .pending_floors()
            .filter(|&floor| self.assignment(floor).is_none())
            .collect();

        let mut assigned = Vec::with_capacity(waiting.len());
        for floor in waiting {
            let destination = if floor < floor_count / 2 {
                floor_count - 1
            } else {
                0
            };
            let car = self.best_car(building, floor, destination)?;
            info!("Assigned floor {} to {}", floor, car);
            assigned.push((floor, car));
        }
        Ok(assigned)
    }

    /// Forget the assignment of a floor once it has been serviced
    pub fn clear_assignment(&mut self, floor: usize) -> SimResult<Option<CarId>> {
        self.check_floor(floor)?;
        Ok(self.assignments[floor].take())
    }

    fn check_floor(&self, floor: usize) -> SimResult<()> {
        if floor < self.assignments.len() {
            Ok(())
        } else {
            Err(SimError::invalid(format!(
                "floor {} is out of range for the dispatcher ({} floors)",
                floor,
                self.assignments.len()
            )))
        }
    }
}
