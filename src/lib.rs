//! Elevator Simulation Library
//!
//! A step-driven elevator dispatch simulation that can run headless or be
//! driven by an external front end one tick at a time.

pub mod simulation;
