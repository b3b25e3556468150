//! Priority request store tests
//!
//! The store must keep heap order and its floor index exact after every
//! public operation, including in-place priority changes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use elevator_sim::simulation::{
    priority_for, Direction, PriorityRequestStore, DIRECTION_MISMATCH_PENALTY,
};

#[test]
fn test_empty_store() {
    let mut store = PriorityRequestStore::new();
    assert!(store.is_empty());
    assert!(store.peek().is_none());
    assert!(store.pop().is_none());
    assert!(store.positions_of(3).is_empty());
    assert!(store.is_consistent());
}

#[test]
fn test_matching_direction_is_served_first() {
    let mut store = PriorityRequestStore::new();
    store.push(4, Direction::Down, 0, Direction::Up);
    let up = store.push(2, Direction::Up, 0, Direction::Up);
    store.push(1, Direction::Down, 0, Direction::Up);

    assert_eq!(store.len(), 3);
    let first = store.pop().unwrap();
    assert_eq!(first.id, up);
    assert_eq!(first.priority, 0);

    // The remaining two share a priority, the older one comes out first
    let second = store.pop().unwrap();
    assert_eq!(second.floor, 4);
    assert_eq!(second.priority, DIRECTION_MISMATCH_PENALTY);
    assert_eq!(store.pop().unwrap().floor, 1);
    assert!(store.is_consistent());
}

#[test]
fn test_waiting_lowers_priority() {
    let mut store = PriorityRequestStore::new();
    store.push(3, Direction::Up, 5, Direction::Up);
    let request = store.peek().unwrap().clone();
    assert_eq!(request.ticks_waited(15), 10);
    assert_eq!(priority_for(&request, Direction::Up, 15), -10);
    assert_eq!(
        priority_for(&request, Direction::Down, 15),
        DIRECTION_MISMATCH_PENALTY - 10
    );
}

#[test]
fn test_aged_mismatch_overtakes_fresh_match() {
    let mut store = PriorityRequestStore::new();
    let old = store.push(0, Direction::Down, 0, Direction::Up);

    let now = DIRECTION_MISMATCH_PENALTY as u64 + 1;
    let fresh = store.push(5, Direction::Up, now, Direction::Up);
    assert_eq!(store.peek().unwrap().id, fresh);

    store.update_priority(0, Direction::Up, now);
    assert_eq!(store.peek().unwrap().id, old);
    assert_eq!(store.peek().unwrap().priority, -1);
    assert!(store.is_consistent());
}

#[test]
fn test_update_priority_counts_changes() {
    let mut store = PriorityRequestStore::new();
    store.push(2, Direction::Up, 0, Direction::Up);
    store.push(2, Direction::Down, 0, Direction::Up);
    store.push(3, Direction::Up, 0, Direction::Up);

    assert_eq!(store.update_priority(2, Direction::Up, 0), 0);
    assert_eq!(store.update_priority(2, Direction::Up, 4), 2);
    assert_eq!(store.best_priority_at(2), Some(-4));
    // Floor 3 was not touched
    assert_eq!(store.best_priority_at(3), Some(0));
    assert_eq!(store.update_priority(7, Direction::Up, 4), 0);
    assert!(store.is_consistent());
}

#[test]
fn test_floor_index_follows_every_swap() {
    let mut store = PriorityRequestStore::new();
    for (tick, floor) in [3, 1, 3, 0, 2, 3, 1].into_iter().enumerate() {
        store.push(floor, Direction::Up, tick as u64, Direction::Down);
    }
    assert_eq!(store.count_at(3), 3);
    assert_eq!(store.count_at(1), 2);

    for &slot in store.positions_of(3) {
        assert_eq!(store.iter().nth(slot).unwrap().floor, 3);
    }
    assert!(store.requests_at(1).all(|request| request.floor == 1));
    assert!(store.is_consistent());
}

#[test]
fn test_remove_oldest_at() {
    let mut store = PriorityRequestStore::new();
    let a = store.push(2, Direction::Up, 0, Direction::Up);
    store.push(4, Direction::Down, 0, Direction::Up);
    let b = store.push(2, Direction::Down, 1, Direction::Up);
    let c = store.push(2, Direction::Up, 2, Direction::Up);

    let removed: Vec<_> = store.remove_oldest_at(2, 2).into_iter().map(|r| r.id).collect();
    assert_eq!(removed, vec![a, b]);
    assert_eq!(store.count_at(2), 1);
    assert_eq!(store.requests_at(2).next().unwrap().id, c);
    assert!(store.is_consistent());

    assert_eq!(store.remove_floor(2).len(), 1);
    assert_eq!(store.count_at(2), 0);
    assert!(store.positions_of(2).is_empty());
    assert_eq!(store.len(), 1);
    assert!(store.is_consistent());
}

#[test]
fn test_reprioritize_all_after_direction_flip() {
    let mut store = PriorityRequestStore::new();
    store.push(1, Direction::Up, 0, Direction::Up);
    store.push(6, Direction::Down, 0, Direction::Up);
    assert_eq!(store.peek().unwrap().floor, 1);

    store.reprioritize_all(Direction::Down, 3);
    assert_eq!(store.peek().unwrap().floor, 6);
    assert_eq!(store.peek().unwrap().priority, -3);
    assert!(store.is_consistent());
}

#[test]
fn test_random_operations_keep_store_consistent() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut store = PriorityRequestStore::new();
    let mut now = 0;
    let mut current = Direction::Up;

    for _ in 0..2_000 {
        now += rng.random_range(0..3);
        match rng.random_range(0..10) {
            0..=3 => {
                let floor = rng.random_range(0..12);
                let direction = if rng.random_bool(0.5) {
                    Direction::Up
                } else {
                    Direction::Down
                };
                store.push(floor, direction, now, current);
            }
            4 => {
                let before = store.len();
                let popped = store.pop();
                assert_eq!(popped.is_some(), before > 0);
            }
            5 | 6 => {
                let floor = rng.random_range(0..12);
                store.update_priority(floor, current, now);
            }
            7 => {
                let floor = rng.random_range(0..12);
                let count = rng.random_range(0..3);
                let expected = count.min(store.count_at(floor));
                assert_eq!(store.remove_oldest_at(floor, count).len(), expected);
            }
            8 => {
                current = current.reversed();
                store.reprioritize_all(current, now);
            }
            _ => store.rebuild_heap(),
        }
        assert!(store.is_consistent(), "store lost consistency at tick {}", now);
    }

    // Draining yields priorities in order
    let mut last = i64::MIN;
    while let Some(request) = store.pop() {
        assert!(request.priority >= last);
        last = request.priority;
    }
    assert!(store.is_consistent());
}
