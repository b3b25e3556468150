//! Error type for the dispatch engine

use std::fmt::Display;

/// Errors raised by the elevator engine
///
/// Every variant is raised before any state is mutated, so a failed
/// operation can be retried or abandoned without cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Zero floors, zero cars, zero capacity, or an index out of range
    InvalidConfiguration(String),
    /// A dequeue was attempted on an empty floor queue
    EmptyQueueUnderflow,
}

impl SimError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(reason.into())
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidConfiguration(reason) => {
                write!(f, "Invalid building configuration: {}", reason)
            }
            SimError::EmptyQueueUnderflow => {
                write!(f, "Tried to dequeue from an empty request queue")
            }
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
