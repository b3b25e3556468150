//! FIFO queue of pending destination requests for one floor

use std::collections::VecDeque;

use super::error::{SimError, SimResult};

/// Pending pickups on a floor
///
/// Each entry is one waiting passenger, stored as the floor they want to
/// travel to. Insertion order is preserved and duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQueue {
    requests: VecDeque<usize>,
    /// Number of requests dequeued over the lifetime of the queue
    total_processed: usize,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, destination: usize) {
        self.requests.push_back(destination);
    }

    pub fn enqueue_all<I: IntoIterator<Item = usize>>(&mut self, destinations: I) {
        self.requests.extend(destinations);
    }

    /// Remove and return the oldest request
    ///
    /// Callers are expected to check `is_empty` first; hitting the error
    /// means a guard is missing somewhere.
    pub fn dequeue(&mut self) -> SimResult<usize> {
        let destination = self
            .requests
            .pop_front()
            .ok_or(SimError::EmptyQueueUnderflow)?;
        self.total_processed += 1;
        Ok(destination)
    }

    /// Remove up to `count` requests in FIFO order
    pub fn dequeue_up_to(&mut self, count: usize) -> Vec<usize> {
        let take = count.min(self.requests.len());
        self.total_processed += take;
        self.requests.drain(..take).collect()
    }

    pub fn peek(&self) -> Option<usize> {
        self.requests.front().copied()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.requests.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.requests.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn total_processed(&self) -> usize {
        self.total_processed
    }
}
