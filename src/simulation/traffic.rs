use super::{Car, CarId, Heading, PendingTurn};
use crate::config::{Layout, RouteVariant, ScenarioConfig};
use log::debug;

/// Off-screen margin before the first car of each flow.
const ENTRY_MARGIN: f32 = 20.0;
/// Spacing between successive cars in the vertical flows.
const VERTICAL_SPACING: f32 = 100.0;
/// Spacing between successive cars in the horizontal flows.
const HORIZONTAL_SPACING: f32 = 120.0;
/// How far horizontal-flow lanes sit in from their road's edge.
const EDGE_LANE_INSET: f32 = 10.0;

/// Builds the initial vehicle population for a route variant. Deterministic:
/// the same layout, scenario, and variant always produce the same cars, so a
/// reset fully replaces the previous population with an identical one.
pub fn build_cars(route: RouteVariant, layout: &Layout, scenario: &ScenarioConfig) -> Vec<Car> {
    let speed = scenario.vehicles.speed;
    let radius = scenario.vehicles.radius;
    let half = layout.half_road_width();

    let mut cars = Vec::with_capacity(scenario.flows.total(route) as usize);

    // Southbound flow, left vertical lane, entering from above. These cars
    // carry the eastward-turn tag in both routes; the motion engine only
    // fires it in the base route.
    for i in 0..scenario.flows.vertical {
        cars.push(
            Car::new(
                CarId(cars.len()),
                layout.main_road_x - layout.lane_offset,
                -ENTRY_MARGIN - i as f32 * VERTICAL_SPACING,
                Heading::South,
                speed,
                radius,
            )
            .with_turn(PendingTurn::ToEast),
        );
    }

    // The extended route adds the opposite vertical flow, right lane,
    // entering from below.
    if route == RouteVariant::Extended {
        for i in 0..scenario.flows.vertical {
            cars.push(Car::new(
                CarId(cars.len()),
                layout.main_road_x + layout.lane_offset,
                layout.height + ENTRY_MARGIN + i as f32 * VERTICAL_SPACING,
                Heading::North,
                speed,
                radius,
            ));
        }
    }

    // Eastbound flow along the lower road; turns north at the vertical-road
    // centerline.
    for i in 0..scenario.flows.left_to_right {
        cars.push(
            Car::new(
                CarId(cars.len()),
                -ENTRY_MARGIN - i as f32 * HORIZONTAL_SPACING,
                layout.bottom_road_y + half - EDGE_LANE_INSET,
                Heading::East,
                speed,
                radius,
            )
            .with_turn(PendingTurn::ToNorth),
        );
    }

    // Westbound flow along the upper road.
    for i in 0..scenario.flows.right_to_left {
        cars.push(Car::new(
            CarId(cars.len()),
            layout.width + ENTRY_MARGIN + i as f32 * HORIZONTAL_SPACING,
            layout.top_road_y - half + EDGE_LANE_INSET,
            Heading::West,
            speed,
            radius,
        ));
    }

    debug!("built {} cars for {:?} route", cars.len(), route);

    cars
}
