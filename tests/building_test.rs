//! Building state validation tests
//!
//! Covers the floor queues, the car movement and stop primitives, and the
//! building configuration loader.

use elevator_sim::simulation::{
    BuildingConfig, BuildingState, CarId, Direction, RequestQueue, SimError,
};

fn five_floor_building() -> BuildingState {
    let config = BuildingConfig::new(5, 1, 4).with_requests(1, vec![3, 4]);
    BuildingState::new(&config).expect("valid building")
}

#[test]
fn test_request_queue_is_fifo() {
    let mut queue = RequestQueue::new();
    assert!(queue.is_empty());

    queue.enqueue(3);
    queue.enqueue(1);
    queue.enqueue(3);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.peek(), Some(3));
    assert_eq!(queue.get(1), Some(1));

    assert_eq!(queue.dequeue(), Ok(3));
    assert_eq!(queue.dequeue(), Ok(1));
    assert_eq!(queue.dequeue(), Ok(3));
    assert_eq!(queue.total_processed(), 3);
    assert!(queue.is_empty());
}

#[test]
fn test_request_queue_underflow() {
    let mut queue = RequestQueue::new();
    assert_eq!(queue.dequeue(), Err(SimError::EmptyQueueUnderflow));
    assert_eq!(
        SimError::EmptyQueueUnderflow.to_string(),
        "Tried to dequeue from an empty request queue"
    );
    // A failed dequeue is not counted
    assert_eq!(queue.total_processed(), 0);
}

#[test]
fn test_request_queue_dequeue_up_to() {
    let mut queue = RequestQueue::new();
    queue.enqueue_all([4, 2, 0]);

    assert_eq!(queue.dequeue_up_to(2), vec![4, 2]);
    assert_eq!(queue.dequeue_up_to(5), vec![0]);
    assert!(queue.dequeue_up_to(1).is_empty());
    assert_eq!(queue.total_processed(), 3);
}

#[test]
fn test_building_initial_state() {
    let building = five_floor_building();
    assert_eq!(building.floor_count(), 5);
    assert_eq!(building.car_count(), 1);
    assert_eq!(building.top_floor(), 4);
    assert_eq!(building.count_pending(), 2);
    assert_eq!(building.count_onboard(), 0);
    assert_eq!(building.pending_floors().collect::<Vec<_>>(), vec![1]);
    assert_eq!(building.pending_bounds(), Some((1, 1)));

    let car = building.car(CarId(0)).unwrap();
    assert_eq!(car.current_floor(), 0);
    assert_eq!(car.direction(), Direction::Up);
    assert_eq!(car.capacity(), 4);
    assert!(!building.is_complete());
}

#[test]
fn test_default_car_placement() {
    let building = BuildingState::new(&BuildingConfig::new(3, 4, 2)).unwrap();
    let placement: Vec<(usize, Direction)> = building
        .cars()
        .iter()
        .map(|car| (car.current_floor(), car.direction()))
        .collect();
    assert_eq!(
        placement,
        vec![
            (0, Direction::Up),
            (1, Direction::Down),
            (2, Direction::Up),
            (0, Direction::Down),
        ]
    );
}

#[test]
fn test_zero_floors_is_rejected() {
    let result = BuildingState::new(&BuildingConfig::new(0, 1, 4));
    assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
}

#[test]
fn test_zero_cars_and_zero_capacity_are_rejected() {
    assert!(matches!(
        BuildingState::new(&BuildingConfig::new(5, 0, 4)),
        Err(SimError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        BuildingState::new(&BuildingConfig::new(5, 1, 0)),
        Err(SimError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_out_of_range_requests_are_rejected() {
    let bad_floor = BuildingConfig::new(5, 1, 4).with_requests(5, vec![0]);
    assert!(matches!(
        BuildingState::new(&bad_floor),
        Err(SimError::InvalidConfiguration(_))
    ));

    let bad_destination = BuildingConfig::new(5, 1, 4).with_requests(2, vec![7]);
    assert!(matches!(
        BuildingState::new(&bad_destination),
        Err(SimError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_out_of_range_car_is_rejected() {
    let mut building = five_floor_building();
    assert!(matches!(
        building.car(CarId(1)),
        Err(SimError::InvalidConfiguration(_))
    ));
    assert!(building.move_up(CarId(3)).is_err());
    assert!(building.stop_and_exchange(CarId(1)).is_err());
    // Nothing moved
    assert_eq!(building.car(CarId(0)).unwrap().current_floor(), 0);
}

#[test]
fn test_moves_stop_at_the_shaft_ends() {
    let mut building = five_floor_building();
    let car = CarId(0);

    building.move_down(car).unwrap();
    assert_eq!(building.car(car).unwrap().current_floor(), 0);

    for _ in 0..10 {
        building.move_up(car).unwrap();
    }
    assert_eq!(building.car(car).unwrap().current_floor(), 4);
    assert!(building.is_at_top(car).unwrap());

    building.move_down(car).unwrap();
    let state = building.car(car).unwrap();
    assert_eq!(state.current_floor(), 3);
    assert_eq!(state.direction(), Direction::Down);
}

#[test]
fn test_continue_in_direction_reverses_at_the_end() {
    let mut building = five_floor_building();
    let car = CarId(0);
    building.place_car(car, 4, Direction::Up).unwrap();

    let reversed = building.continue_in_direction(car).unwrap();
    assert!(reversed);
    let state = building.car(car).unwrap();
    assert_eq!(state.current_floor(), 3);
    assert_eq!(state.direction(), Direction::Down);

    // Mid-shaft it just keeps going
    let reversed = building.continue_in_direction(car).unwrap();
    assert!(!reversed);
    assert_eq!(building.car(car).unwrap().current_floor(), 2);
}

#[test]
fn test_stop_and_exchange_respects_capacity() {
    let config = BuildingConfig::new(5, 1, 2).with_requests(0, vec![4, 3, 2]);
    let mut building = BuildingState::new(&config).unwrap();
    let car = CarId(0);

    let exchange = building.stop_and_exchange(car).unwrap();
    assert_eq!(exchange.floor, 0);
    assert_eq!(exchange.alighted, 0);
    assert_eq!(exchange.boarded, vec![4, 3]);

    // The overflow passenger is still queued, in order
    assert_eq!(building.floor(0).unwrap().requests().peek(), Some(2));
    assert_eq!(building.count_pending(), 1);
    assert!(building.car(car).unwrap().is_full());
    assert!(!building.can_pick_up(car).unwrap());
    assert!(!building.can_exchange(car).unwrap());
}

#[test]
fn test_stop_and_exchange_unloads_before_loading() {
    let config = BuildingConfig::new(5, 1, 1)
        .with_requests(0, vec![3])
        .with_requests(3, vec![0]);
    let mut building = BuildingState::new(&config).unwrap();
    let car = CarId(0);

    building.stop_and_exchange(car).unwrap();
    for _ in 0..3 {
        building.move_up(car).unwrap();
    }

    // Full car, but the rider leaving frees the seat for the one waiting
    assert!(building.can_pick_up(car).unwrap());
    let exchange = building.stop_and_exchange(car).unwrap();
    assert_eq!(exchange.alighted, 1);
    assert_eq!(exchange.boarded, vec![0]);
    assert_eq!(building.count_delivered(), 1);
    assert!(building.is_complete());
    assert!(!building.is_settled());
}

#[test]
fn test_add_request_mid_run() {
    let mut building = five_floor_building();
    building.add_request(4, 0).unwrap();
    assert_eq!(building.pending_bounds(), Some((1, 4)));
    assert!(building.add_request(4, 9).is_err());
    assert!(building.add_request(9, 0).is_err());
    assert_eq!(building.count_pending(), 3);
}

#[test]
fn test_render_shows_cars_and_queues() {
    let building = five_floor_building();
    let picture = building.render();
    let lines: Vec<&str> = picture.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].trim_start().starts_with('4'));
    assert!(lines[3].contains("3,4"));
    assert!(lines[4].contains("[0^ 0/4]"));
}

#[test]
fn test_parse_building_file() {
    let text = "\
# lobby rush
5,4

1:3,4
3:0,
1:2
bogus line
";
    let config = BuildingConfig::parse(text, 2).unwrap();
    assert_eq!(config.floor_count, 5);
    assert_eq!(config.capacity_per_car, 4);
    assert_eq!(config.car_count, 2);
    // The later line for floor 1 replaces the earlier one
    assert_eq!(config.initial_requests.get(&1), Some(&vec![2]));
    assert_eq!(config.initial_requests.get(&3), Some(&vec![0]));
    assert_eq!(config.request_count(), 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_rejects_bad_numbers() {
    let result = BuildingConfig::parse("5,4\n1:two\n", 1);
    match result {
        Err(SimError::InvalidConfiguration(reason)) => {
            assert!(reason.contains("line 2"), "unexpected reason: {}", reason)
        }
        other => panic!("expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file_fails() {
    let path = std::env::temp_dir().join("elevator_sim_missing_building.txt");
    let _ = std::fs::remove_file(&path);
    assert!(BuildingConfig::load(&path, 1).is_err());
}
