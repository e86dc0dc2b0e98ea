use super::{build_cars, FrameSnapshot, MotionEngine, SignalScheduler, SignalState, SimulationState};
use crate::config::{Layout, RouteVariant, SimulationConfig};
use log::{debug, info};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
}

/// External control requests. Queued commands are consumed at the start of
/// the next tick, so the update algorithm never observes a mid-tick
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    /// Gates signal enforcement and phase progression; never touches the
    /// phase bookkeeping itself.
    SetSignalsEnabled(bool),
    /// Takes effect on the next reset, not mid-run.
    SelectRoute(RouteVariant),
}

/// Fixed-duration run loop. Owns the simulation state and delegates each
/// tick to the signal scheduler and then the motion engine; performs no
/// domain logic beyond timekeeping and orchestration.
///
/// The clock is external: callers feed monotonically increasing timestamps
/// into [`Simulation::tick`]. The first tick uses a zero delta, and a
/// regressing clock stalls the simulation instead of reversing it.
pub struct Simulation {
    config: SimulationConfig,
    layout: Layout,
    scheduler: SignalScheduler,
    engine: MotionEngine,
    state: SimulationState,
    run_state: RunState,
    route: RouteVariant,
    pending_route: Option<RouteVariant>,
    commands: VecDeque<Command>,
    duration_ms: f32,
    start_ms: Option<f64>,
    last_elapsed_ms: Option<f64>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let layout = Layout::from_config(&config.layout);
        let route = config.scenario.run.route;
        let scheduler = SignalScheduler::new(config.scenario.signal.phase_duration_ms);
        let engine = MotionEngine::new(layout, route, config.scenario.vehicles.gap_margin);

        let mut state = SimulationState::new(config.scenario.signal.enabled);
        state.cars = build_cars(route, &layout, &config.scenario);

        let duration_ms = config.scenario.run.duration_ms;

        Self {
            config,
            layout,
            scheduler,
            engine,
            state,
            run_state: RunState::Idle,
            route,
            pending_route: None,
            commands: VecDeque::new(),
            duration_ms,
            start_ms: None,
            last_elapsed_ms: None,
        }
    }

    pub fn start(&mut self) {
        if self.run_state == RunState::Idle {
            self.run_state = RunState::Running;
            info!(
                "simulation started: {:?} route, {} cars",
                self.route,
                self.state.cars.len()
            );
        }
    }

    /// Cooperative cancellation: no further ticks will update the state.
    pub fn stop(&mut self) {
        if self.run_state != RunState::Stopped {
            self.run_state = RunState::Stopped;
            info!("simulation stopped at {:.0}ms", self.state.time_ms);
        }
    }

    /// Rebuilds the vehicle population and signal state and transitions back
    /// to Running. Callable from any state. Applies a pending route variant;
    /// the signals-enabled flag carries over.
    pub fn reset(&mut self) {
        if let Some(route) = self.pending_route.take() {
            self.route = route;
            self.engine = MotionEngine::new(
                self.layout,
                route,
                self.config.scenario.vehicles.gap_margin,
            );
        }

        self.state.cars = build_cars(self.route, &self.layout, &self.config.scenario);
        self.state.signal = SignalState::new();
        self.state.time_ms = 0.0;
        self.start_ms = None;
        self.last_elapsed_ms = None;
        self.run_state = RunState::Running;

        info!(
            "simulation reset: {:?} route, {} cars",
            self.route,
            self.state.cars.len()
        );
    }

    pub fn queue_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Advances the simulation by one frame. `timestamp_ms` comes from the
    /// host's clock; deltas are derived here and clamped to zero against
    /// regression. Stops once total elapsed time reaches the configured run
    /// duration.
    pub fn tick(&mut self, timestamp_ms: f64) {
        self.drain_commands();

        if self.run_state != RunState::Running {
            return;
        }

        let start = *self.start_ms.get_or_insert(timestamp_ms);
        let elapsed = timestamp_ms - start;

        if elapsed >= self.duration_ms as f64 {
            self.stop();
            return;
        }

        let dt_ms = match self.last_elapsed_ms {
            Some(previous) => (elapsed - previous).max(0.0) as f32,
            None => 0.0,
        };
        self.last_elapsed_ms = Some(elapsed);

        self.scheduler.advance(&mut self.state, dt_ms);
        self.engine.update(&mut self.state, dt_ms);
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn route(&self) -> RouteVariant {
        self.route
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            debug!("applying queued command {:?}", command);
            match command {
                Command::Reset => self.reset(),
                Command::SetSignalsEnabled(enabled) => self.state.signals_enabled = enabled,
                Command::SelectRoute(route) => self.pending_route = Some(route),
            }
        }
    }
}
