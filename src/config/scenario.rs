use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub signal: SignalParams,
    pub vehicles: VehicleParams,
    pub flows: FlowCounts,
    pub run: RunParams,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalParams {
    /// Duration of each right-of-way phase in milliseconds.
    pub phase_duration_ms: f32,
    /// When false, vehicles ignore the signals entirely and the phase
    /// timer does not advance.
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleParams {
    /// Scalar speed in pixels per second.
    pub speed: f32,
    /// Collision/visual footprint radius in pixels.
    pub radius: f32,
    /// Extra spacing added on top of two radii when computing the minimum
    /// safe following gap.
    pub gap_margin: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowCounts {
    /// Cars per vertical flow (southbound, and northbound in the extended
    /// route).
    pub vertical: u32,
    /// Eastbound cars entering from the left edge.
    pub left_to_right: u32,
    /// Westbound cars entering from the right edge.
    pub right_to_left: u32,
}

impl FlowCounts {
    pub fn total(&self, route: RouteVariant) -> u32 {
        let vertical = match route {
            RouteVariant::Base => self.vertical,
            RouteVariant::Extended => self.vertical * 2,
        };
        vertical + self.left_to_right + self.right_to_left
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunParams {
    /// Total wall-clock duration of a run in milliseconds.
    pub duration_ms: f32,
    pub route: RouteVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteVariant {
    /// One southbound flow that turns east past the lower crossing, plus
    /// the two horizontal flows.
    Base,
    /// Base plus an opposite northbound vertical flow.
    Extended,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            signal: SignalParams {
                phase_duration_ms: 5500.0,
                enabled: true,
            },
            vehicles: VehicleParams {
                speed: 100.0,
                radius: 8.0,
                gap_margin: 4.0,
            },
            flows: FlowCounts {
                vertical: 8,
                left_to_right: 8,
                right_to_left: 5,
            },
            run: RunParams {
                duration_ms: 60_000.0,
                route: RouteVariant::Base,
            },
        }
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        if self.signal.phase_duration_ms <= 0.0 {
            return Err(anyhow!("Phase duration must be positive"));
        }

        let vehicles = &self.vehicles;
        if vehicles.speed < 0.0 {
            return Err(anyhow!("Vehicle speed must be non-negative"));
        }

        if vehicles.radius <= 0.0 {
            return Err(anyhow!("Vehicle radius must be positive"));
        }

        if vehicles.gap_margin < 0.0 {
            return Err(anyhow!("Gap margin must be non-negative"));
        }

        // Zero-car flows are allowed: the engine degrades to the remaining
        // flows rather than erroring.

        if self.run.duration_ms <= 0.0 {
            return Err(anyhow!("Run duration must be positive"));
        }

        Ok(())
    }
}
