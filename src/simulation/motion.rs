use super::{Car, Heading, PendingTurn, Point, SignalPhase, SimulationState};
use crate::config::{Layout, RouteVariant};
use log::debug;

/// Southbound cars begin their eastward turn once their leading edge passes
/// this far beyond the lower road centerline.
const EAST_TURN_TRIGGER: f32 = 45.0;

/// Cross-axis tolerance within which two cars count as sharing a lane.
const LANE_TOLERANCE: f32 = 1.0;

/// Per-tick decision and integration engine. Each update runs a turn
/// sub-pass, a stop-decision pass (signals and lane-following), then a
/// predict-then-commit integration pass with pairwise collision detection.
pub struct MotionEngine {
    layout: Layout,
    route: RouteVariant,
    gap_margin: f32,
}

impl MotionEngine {
    pub fn new(layout: Layout, route: RouteVariant, gap_margin: f32) -> Self {
        Self {
            layout,
            route,
            gap_margin,
        }
    }

    pub fn route(&self) -> RouteVariant {
        self.route
    }

    pub fn update(&self, state: &mut SimulationState, dt_ms: f32) {
        // Turns first, so a just-turned car obeys its new direction's rules
        // within the same tick.
        self.apply_pending_turns(state);

        let car_count = state.cars.len();
        let mut will_stop = vec![false; car_count];

        for (i, car) in state.cars.iter().enumerate() {
            if state.signals_enabled && self.signal_blocks(car, state.signal.phase) {
                will_stop[i] = true;
            }

            if self.blocked_by_leader(i, &state.cars) {
                will_stop[i] = true;
            }
        }

        // Predict every next position up front so the collision scan never
        // observes a mid-tick commit.
        let dt_s = dt_ms / 1000.0;
        let next: Vec<Point> = state
            .cars
            .iter()
            .map(|car| car.position + car.heading.vector() * (car.speed * dt_s))
            .collect();

        for i in 0..car_count {
            if will_stop[i] {
                continue;
            }

            for j in 0..car_count {
                if i == j || will_stop[j] {
                    continue;
                }

                let sum_radii = state.cars[i].radius + state.cars[j].radius;
                if nalgebra::distance(&next[i], &next[j]) < sum_radii {
                    will_stop[i] = true;
                    will_stop[j] = true;

                    if !(state.cars[i].collided && state.cars[j].collided) {
                        debug!(
                            "cars {} and {} would overlap next tick, halting both",
                            state.cars[i].id.0,
                            state.cars[j].id.0
                        );
                    }
                    state.cars[i].collided = true;
                    state.cars[j].collided = true;
                }
            }
        }

        for i in 0..car_count {
            if !will_stop[i] {
                state.cars[i].position = next[i];
            }
        }

        state.time_ms += dt_ms;
    }

    fn apply_pending_turns(&self, state: &mut SimulationState) {
        let layout = &self.layout;

        for car in &mut state.cars {
            match car.pending_turn {
                Some(PendingTurn::ToEast) => {
                    // Only the base route sends southbound traffic east past
                    // the lower crossing.
                    if self.route == RouteVariant::Base
                        && car.heading == Heading::South
                        && car.position.y + car.radius >= layout.bottom_road_y + EAST_TURN_TRIGGER
                    {
                        car.position.x = layout.main_road_x - layout.lane_offset;
                        car.heading = Heading::East;
                        car.pending_turn = None;
                    }
                }
                Some(PendingTurn::ToNorth) => {
                    if car.heading == Heading::East
                        && car.position.x >= layout.main_road_x + layout.lane_offset
                    {
                        car.position.x = layout.main_road_x + layout.lane_offset;
                        car.heading = Heading::North;
                        car.pending_turn = None;
                    }
                }
                None => {}
            }
        }
    }

    /// Whether the car sits in the approach zone of one of the three
    /// controlled flows at the upper crossing without holding the green.
    fn signal_blocks(&self, car: &Car, phase: SignalPhase) -> bool {
        let half = self.layout.half_road_width();
        let top = self.layout.top_road_y;
        let main_x = self.layout.main_road_x;

        match car.heading {
            Heading::South => {
                car.position.y + car.radius >= top - half
                    && car.position.y <= top - half
                    && phase != SignalPhase::SouthboundGreen
            }
            Heading::North => {
                car.position.y - car.radius <= top + half
                    && car.position.y >= top - half
                    && phase != SignalPhase::NorthboundGreen
            }
            Heading::West => {
                car.position.y < top + half
                    && car.position.x - car.radius <= main_x + half
                    && car.position.x >= main_x - half
                    && phase != SignalPhase::WestboundGreen
            }
            Heading::East => false,
        }
    }

    /// Gap-threshold car following: stop when another car with the same
    /// heading shares the lane and sits closer ahead than the minimum safe
    /// gap. Equal gaps are non-blocking.
    fn blocked_by_leader(&self, i: usize, cars: &[Car]) -> bool {
        let car = &cars[i];
        let min_gap = car.radius * 2.0 + self.gap_margin;

        for (j, other) in cars.iter().enumerate() {
            if i == j || other.heading != car.heading {
                continue;
            }

            let same_lane = if car.heading.is_vertical() {
                (car.position.x - other.position.x).abs() < LANE_TOLERANCE
            } else {
                (car.position.y - other.position.y).abs() < LANE_TOLERANCE
            };
            if !same_lane {
                continue;
            }

            let gap = match car.heading {
                Heading::South if other.position.y > car.position.y => {
                    other.position.y - car.position.y
                }
                Heading::North if other.position.y < car.position.y => {
                    car.position.y - other.position.y
                }
                Heading::East if other.position.x > car.position.x => {
                    other.position.x - car.position.x
                }
                Heading::West if other.position.x < car.position.x => {
                    car.position.x - other.position.x
                }
                _ => continue,
            };

            if gap < min_gap {
                return true;
            }
        }

        false
    }
}
