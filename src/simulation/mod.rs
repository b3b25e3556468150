//! Elevator dispatch engine
//!
//! This module contains the scheduling core: building and car state, the
//! per-tick motion policies, the multi-car dispatcher and the priority
//! store behind the adaptive policy. It runs headless and step-driven, so
//! it can be tested from the console without any front end.

mod building;
mod car;
mod config;
mod coordinator;
mod dispatcher;
mod engine;
mod error;
mod policy;
mod priority_store;
mod request_queue;
mod stats;
mod types;

pub use building::{BuildingState, FloorState};
pub use car::CarState;
pub use config::{
    AdaptiveConfig, BuildingConfig, DEFAULT_MAX_SKIPS, DEFAULT_STARVATION_THRESHOLD,
};
pub use coordinator::MultiCarCoordinator;
pub use dispatcher::{RequestDispatcher, LIGHT_LOAD_BONUS, SAME_DIRECTION_BONUS};
pub use engine::{Scheduler, Simulation, TickReport};
pub use error::{SimError, SimResult};
pub use policy::{AdaptiveLook, Look, MotionPolicy, Scan};
pub use priority_store::{
    priority_for, PriorityRequestStore, Request, RequestId, DIRECTION_MISMATCH_PENALTY,
};
pub use request_queue::RequestQueue;
pub use stats::SimStats;
pub use types::{CarId, CarStep, Direction, Exchange, StepKind};
