//! Motion policies
//!
//! A policy looks at the building and moves one car by at most one floor
//! per tick. Three variants exist:
//!
//! - [`Scan`]: sweeps the whole shaft end to end, stopping wherever
//!   someone can get on or off. Baseline only, it is not request-aware.
//! - [`Look`]: sweeps only as far as the outermost floor that still needs
//!   the car, then turns around.
//! - [`AdaptiveLook`]: Look plus starvation handling. A floor that waited
//!   too long pulls the car towards it, and a car that keeps passing
//!   floors without picking anyone up may turn towards the busier side.

use log::{debug, info};

use super::building::BuildingState;
use super::car::CarState;
use super::config::AdaptiveConfig;
use super::error::SimResult;
use super::priority_store::PriorityRequestStore;
use super::types::{CarId, CarStep, Direction, Exchange, StepKind};

/// The closed set of motion policies
#[derive(Debug, Clone)]
pub enum MotionPolicy {
    Scan(Scan),
    Look(Look),
    AdaptiveLook(AdaptiveLook),
}

impl MotionPolicy {
    pub fn scan() -> Self {
        MotionPolicy::Scan(Scan)
    }

    pub fn look() -> Self {
        MotionPolicy::Look(Look)
    }

    pub fn adaptive(config: AdaptiveConfig) -> Self {
        MotionPolicy::AdaptiveLook(AdaptiveLook::new(config))
    }

    pub fn name(&self) -> &'static str {
        match self {
            MotionPolicy::Scan(_) => "SCAN",
            MotionPolicy::Look(_) => "LOOK",
            MotionPolicy::AdaptiveLook(_) => "ADAPTIVE",
        }
    }

    /// Run one tick: every car takes one step, in ascending index order
    pub fn step(&mut self, building: &mut BuildingState) -> SimResult<Vec<CarStep>> {
        if let MotionPolicy::AdaptiveLook(adaptive) = self {
            adaptive.begin_tick(building);
        }

        let mut steps = Vec::with_capacity(building.car_count());
        for index in 0..building.car_count() {
            steps.push(self.step_car(building, CarId(index))?);
        }
        Ok(steps)
    }

    /// Decide and apply the next action of a single car
    pub fn step_car(&mut self, building: &mut BuildingState, car: CarId) -> SimResult<CarStep> {
        match self {
            MotionPolicy::Scan(scan) => scan.step_car(building, car),
            MotionPolicy::Look(look) => look.step_car(building, car),
            MotionPolicy::AdaptiveLook(adaptive) => adaptive.step_car(building, car),
        }
    }
}

/// Full end-to-end sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct Scan;

impl Scan {
    pub fn step_car(&self, building: &mut BuildingState, car: CarId) -> SimResult<CarStep> {
        let from = building.car(car)?.current_floor();

        let exchange = if building.can_exchange(car)? {
            Some(building.stop_and_exchange(car)?)
        } else {
            None
        };
        let reversed = building.continue_in_direction(car)?;

        finish(building, car, from, reversed, exchange, StepKind::Sweep)
    }
}

/// Sweep bounded by the outermost floor that needs the car
#[derive(Debug, Clone, Copy, Default)]
pub struct Look;

impl Look {
    pub fn step_car(&self, building: &mut BuildingState, car: CarId) -> SimResult<CarStep> {
        let pending: Vec<usize> = building.pending_floors().collect();
        self.step_car_within(building, car, &pending)
    }

    /// Look step that only considers pickups on `pickup_floors` (plus the
    /// destinations of the car's occupants) when choosing where to go
    ///
    /// Loading at the current floor takes the whole tick. Occupants whose
    /// destination is the current floor get off without holding the car.
    pub fn step_car_within(
        &self,
        building: &mut BuildingState,
        car: CarId,
        pickup_floors: &[usize],
    ) -> SimResult<CarStep> {
        let state = building.car(car)?;
        let from = state.current_floor();
        let bounds = target_bounds(state, pickup_floors);

        if building.can_pick_up(car)? {
            let exchange = building.stop_and_exchange(car)?;
            return finish(building, car, from, false, Some(exchange), StepKind::Dwell);
        }

        let exchange = if building.car(car)?.has_occupant_for(from) {
            Some(building.stop_and_exchange(car)?)
        } else {
            None
        };

        let Some((lowest, highest)) = bounds else {
            debug!("{} has no pending requests, staying idle on floor {}", car, from);
            return finish(building, car, from, false, exchange, StepKind::Idle);
        };

        let reversed = sweep_within(building, car, lowest, highest)?;
        finish(building, car, from, reversed, exchange, StepKind::Sweep)
    }
}

/// Starvation-aware Look
///
/// Wait times are counted in ticks since a floor was last serviced. All
/// counters live on this value, so a fresh policy starts a fresh run.
#[derive(Debug, Clone)]
pub struct AdaptiveLook {
    config: AdaptiveConfig,
    tick: u64,
    last_serviced: Vec<u64>,
    skip_counters: Vec<u32>,
    store: PriorityRequestStore,
    /// Direction the store's priorities were last computed against
    store_direction: Option<Direction>,
}

impl AdaptiveLook {
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config,
            tick: 0,
            last_serviced: Vec::new(),
            skip_counters: Vec::new(),
            store: PriorityRequestStore::new(),
            store_direction: None,
        }
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn store(&self) -> &PriorityRequestStore {
        &self.store
    }

    pub fn skip_counter(&self, car: CarId) -> u32 {
        self.skip_counters.get(car.0).copied().unwrap_or(0)
    }

    /// Ticks since `floor` was last serviced
    pub fn wait_time(&self, floor: usize) -> u64 {
        let last = self.last_serviced.get(floor).copied().unwrap_or(0);
        self.tick.saturating_sub(last)
    }

    /// Advance the clock and bring the request store up to date
    ///
    /// [`MotionPolicy::step`] calls this once per tick before any car moves.
    pub fn begin_tick(&mut self, building: &BuildingState) {
        self.tick += 1;
        self.fit_to(building);
        self.sync_store(building);
    }

    fn fit_to(&mut self, building: &BuildingState) {
        if self.last_serviced.len() < building.floor_count() {
            self.last_serviced.resize(building.floor_count(), 0);
        }
        if self.skip_counters.len() < building.car_count() {
            self.skip_counters.resize(building.car_count(), 0);
        }
    }

    /// Track one request per waiting passenger and age every priority
    fn sync_store(&mut self, building: &BuildingState) {
        let now = self.tick;
        let Some(direction) = building.cars().first().map(CarState::direction) else {
            return;
        };

        for (floor, state) in building.floors().iter().enumerate() {
            let queue = state.requests();
            let tracked = self.store.count_at(floor);
            if queue.len() < tracked {
                self.store.remove_oldest_at(floor, tracked - queue.len());
            } else {
                for destination in queue.iter().skip(tracked) {
                    self.store
                        .push(floor, Direction::of_trip(floor, destination), now, direction);
                }
            }
        }

        if self.store_direction == Some(direction) {
            for floor in 0..building.floor_count() {
                self.store.update_priority(floor, direction, now);
            }
        } else {
            self.store.reprioritize_all(direction, now);
            self.store_direction = Some(direction);
        }
    }

    pub fn step_car(&mut self, building: &mut BuildingState, car: CarId) -> SimResult<CarStep> {
        self.fit_to(building);
        let now = self.tick;
        let from = building.car(car)?.current_floor();

        // Longest-waiting floor. Ties go to the nearest floor, then to the one
        // holding the most urgent request, so the target stays put while the
        // car travels towards it
        let mut max_wait = 0;
        let mut priority_floor: Option<usize> = None;
        let pending: Vec<usize> = building.pending_floors().collect();
        for &floor in &pending {
            let wait = self.wait_time(floor);
            let better = match priority_floor {
                _ if wait > max_wait => true,
                Some(current) if wait == max_wait && wait > 0 => {
                    (floor.abs_diff(from), self.urgency(floor))
                        < (current.abs_diff(from), self.urgency(current))
                }
                _ => false,
            };
            if better {
                max_wait = wait;
                priority_floor = Some(floor);
            }
        }

        let had_targets = target_bounds(building.car(car)?, &pending).is_some();
        if !had_targets {
            debug!("{} has no pending requests, staying idle on floor {}", car, from);
            return finish(building, car, from, false, None, StepKind::Idle);
        }

        let mut exchange = None;
        if building.can_pick_up(car)? {
            let served = building.stop_and_exchange(car)?;
            self.store.remove_oldest_at(from, served.boarded.len());
            self.last_serviced[from] = now;
            self.skip_counters[car.0] = 0;
            exchange = Some(served);
        } else {
            self.skip_counters[car.0] += 1;
            if building.car(car)?.has_occupant_for(from) {
                exchange = Some(building.stop_and_exchange(car)?);
            }
        }

        // Servicing may have emptied the last request, or added destinations
        let pending: Vec<usize> = building.pending_floors().collect();
        let Some((lowest, highest)) = target_bounds(building.car(car)?, &pending) else {
            debug!("{} handled every request, now idle on floor {}", car, from);
            return finish(building, car, from, false, exchange, StepKind::Dwell);
        };

        // A full car cannot help a starved floor, so it keeps sweeping to unload
        if let Some(target) = priority_floor.filter(|&floor| floor != from) {
            if max_wait > self.config.starvation_threshold && !building.car(car)?.is_full() {
                return self.steer_to_starved(building, car, from, target, max_wait, exchange);
            }
        }

        // Only a car with room can win anything by turning towards waiting floors
        let mut reversed = false;
        let state = building.car(car)?;
        if self.skip_counters[car.0] >= self.config.max_skips && !state.is_full() {
            let (above, below) = side_counts(from, &pending, state.occupants());
            let (ahead, behind) = if state.is_going_up() {
                (above, below)
            } else {
                (below, above)
            };
            if behind > ahead {
                let direction = building.reverse(car)?;
                self.skip_counters[car.0] = 0;
                reversed = true;
                debug!(
                    "{} skipped {} floors, turning {} towards {} waiting floors",
                    car, self.config.max_skips, direction, behind
                );
            }
        }

        reversed |= sweep_within(building, car, lowest, highest)?;
        finish(building, car, from, reversed, exchange, StepKind::Sweep)
    }

    /// Best priority held by `floor` in the store, lower is more urgent
    fn urgency(&self, floor: usize) -> i64 {
        self.store.best_priority_at(floor).unwrap_or(i64::MAX)
    }

    fn steer_to_starved(
        &mut self,
        building: &mut BuildingState,
        car: CarId,
        from: usize,
        target: usize,
        waited: u64,
        exchange: Option<Exchange>,
    ) -> SimResult<CarStep> {
        let mut reversed = false;
        if let Some(direction) = Direction::towards(from, target) {
            if building.car(car)?.direction() != direction {
                building.set_direction(car, direction)?;
                reversed = true;
            }
            building.move_towards(car, direction)?;
            info!(
                "Floor {} waited {} ticks, {} heads {} to reach it",
                target, waited, car, direction
            );
        }
        finish(
            building,
            car,
            from,
            reversed,
            exchange,
            StepKind::StarvationOverride,
        )
    }
}

/// Waiting floors and onboard destinations above and below `floor`
fn side_counts(floor: usize, pickup_floors: &[usize], destinations: &[usize]) -> (usize, usize) {
    pickup_floors
        .iter()
        .chain(destinations)
        .fold((0, 0), |(above, below), &target| {
            if target > floor {
                (above + 1, below)
            } else if target < floor {
                (above, below + 1)
            } else {
                (above, below)
            }
        })
}

/// Lowest and highest floor among pickups and onboard destinations
fn target_bounds(car: &CarState, pickup_floors: &[usize]) -> Option<(usize, usize)> {
    pickup_floors
        .iter()
        .chain(car.occupants())
        .fold(None, |bounds, &floor| match bounds {
            None => Some((floor, floor)),
            Some((lowest, highest)) => Some((lowest.min(floor), highest.max(floor))),
        })
}

/// Move one floor towards the far bound in the direction of travel; on
/// reaching it, turn around and head for the other bound if there is one
///
/// Returns true if the car reversed.
fn sweep_within(
    building: &mut BuildingState,
    car: CarId,
    lowest: usize,
    highest: usize,
) -> SimResult<bool> {
    let state = building.car(car)?;
    let floor = state.current_floor();

    match state.direction() {
        Direction::Up if floor < highest => {
            building.move_up(car)?;
            Ok(false)
        }
        Direction::Up => {
            building.set_direction(car, Direction::Down)?;
            debug!("{} reached highest request on floor {}, turning DOWN", car, floor);
            if floor > lowest {
                building.move_down(car)?;
            }
            Ok(true)
        }
        Direction::Down if floor > lowest => {
            building.move_down(car)?;
            Ok(false)
        }
        Direction::Down => {
            building.set_direction(car, Direction::Up)?;
            debug!("{} reached lowest request on floor {}, turning UP", car, floor);
            if floor < highest {
                building.move_up(car)?;
            }
            Ok(true)
        }
    }
}

fn finish(
    building: &BuildingState,
    car: CarId,
    from: usize,
    reversed: bool,
    exchange: Option<Exchange>,
    kind: StepKind,
) -> SimResult<CarStep> {
    let state = building.car(car)?;
    if state.current_floor() != from {
        debug!("{} moved {} to floor {}", car, state.direction(), state.current_floor());
    }
    Ok(CarStep {
        car,
        from,
        to: state.current_floor(),
        direction: state.direction(),
        reversed,
        exchange,
        kind,
    })
}
