//! Dynamic-priority request store
//!
//! An array-backed binary min-heap over every tracked request in the
//! building, with an auxiliary index from floor to the heap slots that
//! currently hold requests for that floor. The index makes it possible to
//! re-prioritise all requests of one floor in place (O(k log n)) instead of
//! rebuilding the heap.
//!
//! ## Invariants (hold whenever a public method returns)
//!
//! - Heap order: `heap[parent(i)].priority <= heap[i].priority`.
//! - Index: for every slot `i`, `positions[heap[i].floor]` contains `i`, and
//!   the index holds no other slots. All slot movement goes through a
//!   single swap routine that updates both affected index entries before
//!   returning.
//!
//! ## Priority
//!
//! `priority = (request.direction == current_direction ? 0 : 1000) - ticks_waited`
//!
//! Lower values are served first. Waiting makes a request more urgent, so a
//! request against the direction of travel overtakes a fresh matching one
//! once it has waited more than 1000 ticks.

use std::collections::HashMap;

use sorted_vec::SortedVec;

use super::types::Direction;

/// Added to the priority of a request that goes against the car
pub const DIRECTION_MISMATCH_PENALTY: i64 = 1000;

/// Identifier of a tracked request, unique within one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// A tracked pickup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub floor: usize,
    pub direction: Direction,
    pub priority: i64,
    pub created_at: u64,
}

impl Request {
    pub fn ticks_waited(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    /// Ordering key; the id breaks ties so equal priorities stay FIFO
    fn key(&self) -> (i64, RequestId) {
        (self.priority, self.id)
    }
}

/// Priority of `request` at tick `now` while the car travels `current_direction`
pub fn priority_for(request: &Request, current_direction: Direction, now: u64) -> i64 {
    let base = if request.direction == current_direction {
        0
    } else {
        DIRECTION_MISMATCH_PENALTY
    };
    base - request.ticks_waited(now) as i64
}

/// Indexed min-heap of requests
#[derive(Debug, Clone, Default)]
pub struct PriorityRequestStore {
    heap: Vec<Request>,
    positions: HashMap<usize, SortedVec<usize>>,
    next_id: u64,
}

impl PriorityRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Most urgent request
    pub fn peek(&self) -> Option<&Request> {
        self.heap.first()
    }

    /// All requests in heap order (not sorted)
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.heap.iter()
    }

    /// Heap slots currently holding requests for `floor`, ascending
    pub fn positions_of(&self, floor: usize) -> &[usize] {
        self.positions
            .get(&floor)
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn count_at(&self, floor: usize) -> usize {
        self.positions_of(floor).len()
    }

    pub fn requests_at(&self, floor: usize) -> impl Iterator<Item = &Request> + '_ {
        self.positions_of(floor).iter().map(move |&slot| &self.heap[slot])
    }

    /// Lowest priority value among the requests of `floor`
    pub fn best_priority_at(&self, floor: usize) -> Option<i64> {
        self.requests_at(floor).map(|r| r.priority).min()
    }

    /// Track a new request created at tick `now`
    pub fn push(
        &mut self,
        floor: usize,
        direction: Direction,
        now: u64,
        current_direction: Direction,
    ) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let mut request = Request {
            id,
            floor,
            direction,
            priority: 0,
            created_at: now,
        };
        request.priority = priority_for(&request, current_direction, now);

        let slot = self.heap.len();
        self.heap.push(request);
        self.positions
            .entry(floor)
            .or_insert_with(SortedVec::new)
            .insert(slot);
        self.sift_up(slot);
        id
    }

    /// Remove and return the most urgent request
    pub fn pop(&mut self) -> Option<Request> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.remove_slot(0))
    }

    /// Remove the `count` oldest requests of `floor`, oldest first
    pub fn remove_oldest_at(&mut self, floor: usize, count: usize) -> Vec<Request> {
        let mut oldest: Vec<RequestId> = self.requests_at(floor).map(|r| r.id).collect();
        oldest.sort();
        oldest.truncate(count);

        let mut removed = Vec::with_capacity(oldest.len());
        for id in oldest {
            if let Some(slot) = self.slot_of(floor, id) {
                removed.push(self.remove_slot(slot));
            }
        }
        removed
    }

    /// Drop every request of `floor`
    pub fn remove_floor(&mut self, floor: usize) -> Vec<Request> {
        let count = self.count_at(floor);
        self.remove_oldest_at(floor, count)
    }

    /// Recompute the priority of every request at `floor` and restore heap
    /// order around each one that changed
    ///
    /// Returns the number of requests whose priority changed.
    pub fn update_priority(&mut self, floor: usize, current_direction: Direction, now: u64) -> usize {
        let ids: Vec<RequestId> = self.requests_at(floor).map(|r| r.id).collect();
        let mut changed = 0;

        // Slots shift while sifting, so each request is looked up again by id
        for id in ids {
            let Some(slot) = self.slot_of(floor, id) else {
                continue;
            };
            let old = self.heap[slot].priority;
            let new = priority_for(&self.heap[slot], current_direction, now);
            if new == old {
                continue;
            }
            self.heap[slot].priority = new;
            changed += 1;
            if new < old {
                self.sift_up(slot);
            } else {
                self.sift_down(slot);
            }
        }
        changed
    }

    /// Recompute every priority, then restore heap order in one pass
    pub fn reprioritize_all(&mut self, current_direction: Direction, now: u64) {
        for request in &mut self.heap {
            request.priority = priority_for(request, current_direction, now);
        }
        self.rebuild_heap();
    }

    /// Bottom-up heapify of the whole array
    pub fn rebuild_heap(&mut self) {
        for slot in (0..self.heap.len() / 2).rev() {
            self.sift_down(slot);
        }
    }

    /// Check both invariants from scratch
    pub fn is_consistent(&self) -> bool {
        let heap_ordered = (1..self.heap.len())
            .all(|i| self.heap[(i - 1) / 2].priority <= self.heap[i].priority);

        // Every slot is listed exactly once, under the floor it holds
        let every_slot_indexed_once = self.heap.iter().enumerate().all(|(slot, request)| {
            self.positions_of(request.floor)
                .iter()
                .filter(|&&listed| listed == slot)
                .count()
                == 1
        });
        // ...and the index lists nothing else
        let indexed_slots: usize = self.positions.values().map(|slots| slots.len()).sum();
        let no_stray_slots = indexed_slots == self.heap.len()
            && self.positions.values().all(|slots| !slots.is_empty());

        heap_ordered && every_slot_indexed_once && no_stray_slots
    }

    fn slot_of(&self, floor: usize, id: RequestId) -> Option<usize> {
        self.positions_of(floor)
            .iter()
            .copied()
            .find(|&slot| self.heap[slot].id == id)
    }

    /// Remove the request at `slot`, keeping both structures in step
    fn remove_slot(&mut self, slot: usize) -> Request {
        let last = self.heap.len() - 1;
        self.swap(slot, last);

        // Unindex before popping so the index never points past the end
        let floor = self.heap[last].floor;
        if let Some(slots) = self.positions.get_mut(&floor) {
            slots.remove_item(&last);
            if slots.is_empty() {
                self.positions.remove(&floor);
            }
        }
        let removed = self.heap.swap_remove(last);

        if slot < self.heap.len() {
            let settled = self.sift_down(slot);
            if settled == slot {
                self.sift_up(slot);
            }
        }
        removed
    }

    /// Swap two heap slots and both of their index entries
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let floor_a = self.heap[a].floor;
        let floor_b = self.heap[b].floor;
        self.heap.swap(a, b);

        // Same floor: the set of slots for that floor is unchanged
        if floor_a == floor_b {
            return;
        }
        if let Some(slots) = self.positions.get_mut(&floor_a) {
            slots.remove_item(&a);
            slots.insert(b);
        }
        if let Some(slots) = self.positions.get_mut(&floor_b) {
            slots.remove_item(&b);
            slots.insert(a);
        }
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].key() >= self.heap[parent].key() {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) -> usize {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.heap[left].key() < self.heap[smallest].key() {
                smallest = left;
            }
            if right < len && self.heap[right].key() < self.heap[smallest].key() {
                smallest = right;
            }
            if smallest == slot {
                return slot;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}
