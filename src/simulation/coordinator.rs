//! Multi-car coordination
//!
//! Each tick the dispatcher runs once, then the cars move one after
//! another in ascending index order. A car handled later in the tick sees
//! the building and the assignment table as the earlier cars left them;
//! that order is part of the observable behaviour and must not change.

use super::building::BuildingState;
use super::dispatcher::RequestDispatcher;
use super::error::SimResult;
use super::policy::Look;
use super::types::{CarId, CarStep};

/// Drives a [`RequestDispatcher`] and a Look sweep per car
#[derive(Debug, Clone)]
pub struct MultiCarCoordinator {
    dispatcher: RequestDispatcher,
    look: Look,
}

impl MultiCarCoordinator {
    pub fn new(building: &BuildingState) -> Self {
        Self {
            dispatcher: RequestDispatcher::for_building(building),
            look: Look,
        }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut RequestDispatcher {
        &mut self.dispatcher
    }

    /// Run one tick for every car
    pub fn step(&mut self, building: &mut BuildingState) -> SimResult<Vec<CarStep>> {
        self.dispatcher.dispatch_requests(building)?;

        let mut steps = Vec::with_capacity(building.car_count());
        for index in 0..building.car_count() {
            steps.push(self.step_car(building, CarId(index))?);
        }
        Ok(steps)
    }

    /// Look step restricted to the car's assigned floors
    ///
    /// A car that loads passengers on a floor clears that floor's
    /// assignment, whichever car it belonged to; anyone left behind is
    /// reassigned on the next tick.
    pub fn step_car(&mut self, building: &mut BuildingState, car: CarId) -> SimResult<CarStep> {
        let assigned = self.dispatcher.assigned_floors(car);
        let step = self.look.step_car_within(building, car, &assigned)?;

        if let Some(exchange) = &step.exchange {
            if !exchange.boarded.is_empty() {
                self.dispatcher.clear_assignment(exchange.floor)?;
            }
        }
        Ok(step)
    }
}
