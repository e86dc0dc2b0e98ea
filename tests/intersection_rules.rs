use intersection_sim::config::{Layout, RouteVariant};
use intersection_sim::simulation::{
    build_cars, Car, CarId, Heading, MotionEngine, PendingTurn, SignalPhase, SignalScheduler,
    SimulationState,
};

const DT_MS: f32 = 100.0; // 10 px of travel per tick at the default speed

fn engine(route: RouteVariant) -> MotionEngine {
    MotionEngine::new(Layout::default(), route, 4.0)
}

fn state_with(cars: Vec<Car>, signals_enabled: bool) -> SimulationState {
    let mut state = SimulationState::new(signals_enabled);
    state.cars = cars;
    state
}

fn car(id: usize, x: f32, y: f32, heading: Heading) -> Car {
    Car::new(CarId(id), x, y, heading, 100.0, 8.0)
}

/// With signals enabled the phase advances exactly at multiples of the phase
/// duration and cycles modulo 3.
#[test]
fn phase_cycles_at_fixed_duration() {
    let scheduler = SignalScheduler::new(5500.0);
    let mut state = state_with(Vec::new(), true);

    assert_eq!(state.signal.phase, SignalPhase::SouthboundGreen);

    scheduler.advance(&mut state, 5499.0);
    assert_eq!(state.signal.phase, SignalPhase::SouthboundGreen);

    scheduler.advance(&mut state, 1.0);
    assert_eq!(state.signal.phase, SignalPhase::NorthboundGreen);
    assert_eq!(state.signal.elapsed_ms, 0.0);

    // Accumulate two more full durations in uneven steps.
    for _ in 0..55 {
        scheduler.advance(&mut state, 100.0);
    }
    assert_eq!(state.signal.phase, SignalPhase::WestboundGreen);

    for _ in 0..11 {
        scheduler.advance(&mut state, 500.0);
    }
    assert_eq!(state.signal.phase, SignalPhase::SouthboundGreen);
}

/// With signals disabled the phase timer does not run at all.
#[test]
fn phase_frozen_while_signals_disabled() {
    let scheduler = SignalScheduler::new(5500.0);
    let mut state = state_with(Vec::new(), false);

    for _ in 0..100 {
        scheduler.advance(&mut state, 1000.0);
    }

    assert_eq!(state.signal.phase, SignalPhase::SouthboundGreen);
    assert_eq!(state.signal.elapsed_ms, 0.0);
}

/// A trailing car closer than the minimum safe gap stops; the leader keeps
/// moving.
#[test]
fn trailing_car_holds_minimum_gap() {
    let engine = engine(RouteVariant::Base);
    let trailing = car(0, 375.0, 100.0, Heading::South);
    let leader = car(1, 375.0, 115.0, Heading::South); // gap 15 < 20
    let mut state = state_with(vec![trailing, leader], false);

    engine.update(&mut state, DT_MS);

    assert_eq!(state.cars[0].position.y, 100.0, "trailing car must hold");
    assert_eq!(state.cars[1].position.y, 125.0, "leader must keep moving");
}

/// A gap exactly equal to the minimum is non-blocking (strict less-than).
#[test]
fn exact_minimum_gap_does_not_block() {
    let engine = engine(RouteVariant::Base);
    let trailing = car(0, 375.0, 100.0, Heading::South);
    let leader = car(1, 375.0, 120.0, Heading::South); // gap 20 == 2r + margin
    let mut state = state_with(vec![trailing, leader], false);

    engine.update(&mut state, DT_MS);

    assert_eq!(state.cars[0].position.y, 110.0);
    assert_eq!(state.cars[1].position.y, 130.0);
}

/// Cars in a different lane never trigger the following rule.
#[test]
fn parallel_lane_does_not_block() {
    let engine = engine(RouteVariant::Base);
    let left = car(0, 375.0, 100.0, Heading::South);
    let right = car(1, 425.0, 110.0, Heading::South);
    let mut state = state_with(vec![left, right], false);

    engine.update(&mut state, DT_MS);

    assert_eq!(state.cars[0].position.y, 110.0);
    assert_eq!(state.cars[1].position.y, 120.0);
}

/// A southbound car in the approach zone proceeds on its green and holds on
/// any other phase. Default layout: stop line at y = 150.
#[test]
fn southbound_approach_obeys_phase() {
    let engine = engine(RouteVariant::Base);

    let mut state = state_with(vec![car(0, 375.0, 145.0, Heading::South)], true);
    state.signal.phase = SignalPhase::NorthboundGreen;
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.y, 145.0, "red: must hold at the line");

    state.signal.phase = SignalPhase::SouthboundGreen;
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.y, 155.0, "green: must proceed");
}

/// Northbound approach zone sits below the crossing (y in [150, 258]).
#[test]
fn northbound_approach_obeys_phase() {
    let engine = engine(RouteVariant::Extended);

    let mut state = state_with(vec![car(0, 425.0, 255.0, Heading::North)], true);
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.y, 255.0, "southbound green: hold");

    state.signal.phase = SignalPhase::NorthboundGreen;
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.y, 245.0, "northbound green: proceed");
}

/// Westbound approach zone spans the vertical road (x in [350, 458]).
#[test]
fn westbound_approach_obeys_phase() {
    let engine = engine(RouteVariant::Base);

    let mut state = state_with(vec![car(0, 455.0, 160.0, Heading::West)], true);
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.x, 455.0, "southbound green: hold");

    state.signal.phase = SignalPhase::WestboundGreen;
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.x, 445.0, "westbound green: proceed");
}

/// When signals are disabled the approach zones are ignored entirely.
#[test]
fn disabled_signals_ignore_approach_zones() {
    let engine = engine(RouteVariant::Base);
    let mut state = state_with(vec![car(0, 375.0, 145.0, Heading::South)], false);
    state.signal.phase = SignalPhase::WestboundGreen;

    engine.update(&mut state, DT_MS);

    assert_eq!(state.cars[0].position.y, 155.0);
}

/// An eastbound car with a pending northward turn snaps to the right
/// vertical lane exactly once and continues north.
#[test]
fn eastbound_turn_to_north_is_deterministic() {
    let engine = engine(RouteVariant::Base);
    let turning = car(0, 424.0, 430.0, Heading::East).with_turn(PendingTurn::ToNorth);
    let mut state = state_with(vec![turning], false);

    // Not yet at the trigger line (x = 425): keeps driving east.
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].heading, Heading::East);
    assert_eq!(state.cars[0].position.x, 434.0);

    // Past the trigger: snapped to the lane centerline, rotated north, tag
    // cleared, and already moving north within the same tick.
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].heading, Heading::North);
    assert_eq!(state.cars[0].position.x, 425.0);
    assert_eq!(state.cars[0].position.y, 420.0);
    assert_eq!(state.cars[0].pending_turn, None);

    // No second snap.
    engine.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].position.x, 425.0);
    assert_eq!(state.cars[0].position.y, 410.0);
}

/// A southbound car with a pending eastward turn fires just past the lower
/// crossing in the base route only.
#[test]
fn southbound_turn_to_east_only_in_base_route() {
    let start = car(0, 375.0, 440.0, Heading::South).with_turn(PendingTurn::ToEast);

    // Base route: leading edge is past y = 445, so the car turns east and
    // moves along the lower road.
    let base = engine(RouteVariant::Base);
    let mut state = state_with(vec![start.clone()], false);
    base.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].heading, Heading::East);
    assert_eq!(state.cars[0].position.x, 385.0);
    assert_eq!(state.cars[0].position.y, 440.0);
    assert_eq!(state.cars[0].pending_turn, None);

    // Extended route: the tag stays inert and the car continues south.
    let extended = engine(RouteVariant::Extended);
    let mut state = state_with(vec![start], false);
    extended.update(&mut state, DT_MS);
    assert_eq!(state.cars[0].heading, Heading::South);
    assert_eq!(state.cars[0].position.y, 450.0);
    assert_eq!(state.cars[0].pending_turn, Some(PendingTurn::ToEast));
}

/// Two cars whose predicted positions overlap are both halted and both
/// flagged, in the same tick.
#[test]
fn collision_marks_both_cars() {
    let engine = engine(RouteVariant::Base);
    let east = car(0, 100.0, 300.0, Heading::East);
    let west = car(1, 130.0, 300.0, Heading::West);
    let mut state = state_with(vec![east, west], false);

    engine.update(&mut state, DT_MS);

    assert!(state.cars[0].collided);
    assert!(state.cars[1].collided);
    assert_eq!(state.cars[0].position.x, 100.0, "neither car commits its move");
    assert_eq!(state.cars[1].position.x, 130.0);
}

/// The collided flag is sticky: it survives later ticks even once the cars
/// are far apart again.
#[test]
fn collided_flag_is_sticky() {
    let engine = engine(RouteVariant::Base);
    let east = car(0, 100.0, 300.0, Heading::East);
    let west = car(1, 130.0, 300.0, Heading::West);
    let mut state = state_with(vec![east, west], false);

    engine.update(&mut state, DT_MS);
    assert!(state.cars[0].collided && state.cars[1].collided);

    // Separate the pair by hand; both drive off freely but stay flagged.
    state.cars[1].position.x = 700.0;
    for _ in 0..10 {
        engine.update(&mut state, DT_MS);
    }

    assert!(state.cars[0].collided);
    assert!(state.cars[1].collided);
    assert!(state.cars[0].position.x > 100.0);
}

/// Every car moves strictly along one axis at every instant, across a full
/// run of the richest scenario.
#[test]
fn motion_is_never_diagonal() {
    let layout = Layout::default();
    let scenario = intersection_sim::config::ScenarioConfig::default();
    let engine = engine(RouteVariant::Extended);
    let mut state = state_with(
        build_cars(RouteVariant::Extended, &layout, &scenario),
        true,
    );
    let scheduler = SignalScheduler::new(5500.0);

    for _ in 0..600 {
        scheduler.advance(&mut state, 16.0);
        engine.update(&mut state, 16.0);

        for car in &state.cars {
            let v = car.heading.vector();
            let nonzero_axes = (v.x != 0.0) as u32 + (v.y != 0.0) as u32;
            assert_eq!(nonzero_axes, 1, "car {:?} has a diagonal direction", car.id);
        }
    }
}
