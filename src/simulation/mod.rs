use instant::Instant;
use nalgebra::{Point2, Vector2};
use serde::Serialize;
use std::time::Duration;

pub mod signal;
pub mod motion;
pub mod traffic;
pub mod driver;

pub use signal::*;
pub use motion::*;
pub use traffic::*;
pub use driver::*;

pub type Vec2 = Vector2<f32>;
pub type Point = Point2<f32>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarId(pub usize);

/// Travel direction. Vehicles move strictly along one axis at a time;
/// diagonal motion is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    /// Unit direction vector in screen coordinates (y grows downward).
    pub fn vector(self) -> Vec2 {
        match self {
            Heading::North => Vector2::new(0.0, -1.0),
            Heading::South => Vector2::new(0.0, 1.0),
            Heading::East => Vector2::new(1.0, 0.0),
            Heading::West => Vector2::new(-1.0, 0.0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}

/// A direction change armed at creation and executed once when the car
/// reaches its trigger position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTurn {
    /// Eastbound car rotates to northbound at the vertical-road centerline.
    ToNorth,
    /// Southbound car rotates to eastbound just past the lower crossing.
    /// Fires only in the base route.
    ToEast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub position: Point,
    pub heading: Heading,
    pub speed: f32,
    pub radius: f32,
    pub pending_turn: Option<PendingTurn>,
    /// Sticky: once set it stays set until the population is rebuilt.
    pub collided: bool,
}

impl Car {
    pub fn new(id: CarId, x: f32, y: f32, heading: Heading, speed: f32, radius: f32) -> Self {
        Self {
            id,
            position: Point2::new(x, y),
            heading,
            speed,
            radius,
            pending_turn: None,
            collided: false,
        }
    }

    pub fn with_turn(mut self, turn: PendingTurn) -> Self {
        self.pending_turn = Some(turn);
        self
    }
}

/// The one explicitly-owned piece of mutable simulation state. The driver
/// owns it and passes it into the scheduler and motion engine; nothing is
/// kept in globals.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub cars: Vec<Car>,
    pub signal: SignalState,
    pub signals_enabled: bool,
    /// Accumulated simulated time in milliseconds.
    pub time_ms: f32,
}

impl SimulationState {
    pub fn new(signals_enabled: bool) -> Self {
        Self {
            cars: Vec::new(),
            signal: SignalState::new(),
            signals_enabled,
            time_ms: 0.0,
        }
    }

    pub fn collided_count(&self) -> usize {
        self.cars.iter().filter(|car| car.collided).count()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            time_ms: self.time_ms,
            phase: self.signal.phase.index(),
            signals_enabled: self.signals_enabled,
            vehicles: self
                .cars
                .iter()
                .map(|car| VehicleSnapshot {
                    x: car.position.x,
                    y: car.position.y,
                    radius: car.radius,
                    collided: car.collided,
                })
                .collect(),
        }
    }
}

/// Read-only per-frame view handed to an external renderer. The renderer
/// never mutates core state.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub time_ms: f32,
    pub phase: u8,
    pub signals_enabled: bool,
    pub vehicles: Vec<VehicleSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSnapshot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub collided: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameMetrics {
    pub frame_time: Duration,
    pub update_time: Duration,
}

/// Rolling frame-time statistics for the host loop.
#[derive(Debug)]
pub struct PerformanceTracker {
    samples: Vec<FrameMetrics>,
    max_samples: usize,
    current_frame_start: Option<Instant>,
    current_update_start: Option<Instant>,
}

impl PerformanceTracker {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Vec::with_capacity(max_samples),
            max_samples,
            current_frame_start: None,
            current_update_start: None,
        }
    }

    pub fn start_frame(&mut self) {
        self.current_frame_start = Some(Instant::now());
    }

    pub fn start_update(&mut self) {
        self.current_update_start = Some(Instant::now());
    }

    pub fn end_update(&mut self) {
        if let Some(start) = self.current_update_start.take() {
            if let Some(current) = self.samples.last_mut() {
                current.update_time = start.elapsed();
            }
        }
    }

    pub fn end_frame(&mut self) {
        if let Some(start) = self.current_frame_start.take() {
            let metrics = FrameMetrics {
                frame_time: start.elapsed(),
                update_time: self
                    .samples
                    .last()
                    .map(|s| s.update_time)
                    .unwrap_or(Duration::ZERO),
            };

            if self.samples.len() >= self.max_samples {
                self.samples.remove(0);
            }
            self.samples.push(metrics);
        }
    }

    pub fn average_frame_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().map(|s| s.frame_time).sum();
        total / self.samples.len() as u32
    }

    pub fn average_update_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().map(|s| s.update_time).sum();
        total / self.samples.len() as u32
    }

    pub fn fps(&self) -> f32 {
        let avg_frame_time = self.average_frame_time();
        if avg_frame_time.is_zero() {
            return 0.0;
        }
        1.0 / avg_frame_time.as_secs_f32()
    }
}
