//! Interactive session
//!
//! A `Session` owns the whole mutable state of one run (trajectory,
//! obstacles, gesture controller, run state and display entities) and is
//! driven by the frame loop through the `FrameHandler` callbacks.

use crate::backend::{Command, FrameHandler};
use crate::common::types::{config, Configuration};
use crate::error::{CoreError, Result};
use crate::interaction::{InteractionController, PointerEvent};
use crate::obstacles::{Obstacle, ObstacleStore};
use crate::optimizer::{DefaultOptimizer, Optimizer};
use crate::render::{self, Canvas};
use crate::simulation::{self, RunState, RunStateMachine, TickOutcome};
use crate::trajectory::Trajectory;
use crate::visualization::VisualizationAdapter;
use nalgebra::DVector;
use rand::Rng;
use std::collections::HashMap;

/// Range of the coordinates drawn by `jumble`
const JUMBLE_RANGE: std::ops::Range<f64> = -5.0..5.0;

/// Parameters of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub start: Configuration,
    pub goal: Configuration,
    pub waypoint_count: usize,
    pub obstacles: Vec<Obstacle>,
    pub new_obstacle_radius: f64,
    pub view_margin: f64,
    pub warmup_iterations: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            start: config(-5.0, -5.0),
            goal: config(7.0, 7.0),
            waypoint_count: 20,
            obstacles: vec![
                Obstacle::new(config(3.0, 0.0), 2.0),
                Obstacle::new(config(0.0, 3.0), 2.0),
            ],
            new_obstacle_radius: 2.0,
            view_margin: 2.0,
            warmup_iterations: 1,
        }
    }
}

impl SessionConfig {
    /// Largest accepted `waypoint_count`
    pub const MAX_WAYPOINTS: usize = 10_000;

    /// Configure the session with parameters
    ///
    /// Either every key is applied or, on error, the config is left unchanged.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let finite = |name: &str| -> Result<Option<f64>> {
            match params.get(name) {
                Some(&value) if value.is_finite() => Ok(Some(value)),
                Some(_) => Err(CoreError::invalid_parameter(name, "must be finite")),
                None => Ok(None),
            }
        };
        let count = |name: &str, min: usize, max: usize| -> Result<Option<usize>> {
            match finite(name)? {
                Some(value) if value.fract() == 0.0 && value >= min as f64 && value <= max as f64 => {
                    Ok(Some(value as usize))
                }
                Some(_) => Err(CoreError::invalid_parameter(
                    name,
                    &format!("must be an integer in [{}, {}]", min, max),
                )),
                None => Ok(None),
            }
        };

        let mut next = self.clone();
        if let Some(x) = finite("start_x")? {
            next.start.x = x;
        }
        if let Some(y) = finite("start_y")? {
            next.start.y = y;
        }
        if let Some(x) = finite("goal_x")? {
            next.goal.x = x;
        }
        if let Some(y) = finite("goal_y")? {
            next.goal.y = y;
        }
        if let Some(n) = count("waypoint_count", 1, Self::MAX_WAYPOINTS)? {
            next.waypoint_count = n;
        }
        if let Some(n) = count("warmup_iterations", 0, usize::MAX)? {
            next.warmup_iterations = n;
        }
        if let Some(radius) = finite("new_obstacle_radius")? {
            next.new_obstacle_radius = radius;
        }
        if let Some(margin) = finite("view_margin")? {
            next.view_margin = margin;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Check the constraints on every field
    pub fn validate(&self) -> Result<()> {
        if !(self.start.iter().all(|v| v.is_finite()) && self.goal.iter().all(|v| v.is_finite())) {
            return Err(CoreError::invalid_parameter("start/goal", "must be finite"));
        }
        if self.waypoint_count == 0 || self.waypoint_count > Self::MAX_WAYPOINTS {
            return Err(CoreError::invalid_parameter(
                "waypoint_count",
                &format!("must be in [1, {}]", Self::MAX_WAYPOINTS),
            ));
        }
        if !(self.new_obstacle_radius.is_finite() && self.new_obstacle_radius > 0.0) {
            return Err(CoreError::invalid_parameter("new_obstacle_radius", "must be positive"));
        }
        if !(self.view_margin.is_finite() && self.view_margin >= 0.0) {
            return Err(CoreError::invalid_parameter("view_margin", "must be non-negative"));
        }
        Ok(())
    }
}

/// Live state of one interactive run
#[derive(Debug)]
pub struct Session {
    trajectory: Trajectory,
    obstacles: ObstacleStore,
    controller: InteractionController,
    run_state: RunStateMachine,
    robots: VisualizationAdapter,
    optimizer: Box<dyn Optimizer>,
    view_margin: f64,
}

impl Session {
    /// Set up a session: seed the trajectory, run the warm-up iterations and pause
    pub fn new(config: SessionConfig, optimizer: Box<dyn Optimizer>) -> Result<Self> {
        config.validate()?;

        let mut obstacles = ObstacleStore::new();
        for obstacle in &config.obstacles {
            obstacles.add(obstacle.center, obstacle.radius)?;
        }

        let mut session = Session {
            trajectory: Trajectory::straight_line(config.start, config.goal, config.waypoint_count),
            obstacles,
            controller: InteractionController::new(config.new_obstacle_radius),
            run_state: RunStateMachine::new(),
            robots: VisualizationAdapter::new(),
            optimizer,
            view_margin: config.view_margin,
        };

        for _ in 0..config.warmup_iterations {
            simulation::run_iteration(session.optimizer.as_mut(), &mut session.trajectory, &session.obstacles)?;
        }
        session.robots.refresh(&session.trajectory)?;

        log::info!(
            "session ready: {} waypoints, {} obstacles, optimizer {}",
            session.trajectory.waypoint_count(),
            session.obstacles.len(),
            session.optimizer.name()
        );
        Ok(session)
    }

    /// Session with the reference configuration and the default optimizer
    pub fn with_defaults() -> Result<Self> {
        Session::new(SessionConfig::default(), Box::new(DefaultOptimizer::new()))
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn obstacles(&self) -> &ObstacleStore {
        &self.obstacles
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn run_state(&self) -> RunState {
        self.run_state.state()
    }

    pub fn robots(&self) -> &VisualizationAdapter {
        &self.robots
    }

    pub fn optimizer_name(&self) -> &str {
        self.optimizer.name()
    }

    /// Per-frame idle tick: maybe iterate, then refresh the robots
    pub fn on_idle(&mut self) -> Result<TickOutcome> {
        let outcome = self
            .run_state
            .tick(self.optimizer.as_mut(), &mut self.trajectory, &self.obstacles)?;
        if outcome == TickOutcome::Iterated {
            self.robots.refresh(&self.trajectory)?;
        }
        Ok(outcome)
    }

    /// Apply a pointer event and forward any gesture signal to the run state
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Result<()> {
        if let Some(signal) = self.controller.handle(event, &mut self.obstacles)? {
            self.run_state.apply_gesture(signal);
        }
        Ok(())
    }

    /// Draw the current state
    pub fn on_draw(&self, canvas: &mut dyn Canvas) {
        render::draw_frame(canvas, &self.trajectory, &self.robots, &self.obstacles, self.view_margin);
    }

    pub fn request_step(&mut self) {
        self.run_state.request_step();
    }

    pub fn toggle_run(&mut self) {
        self.run_state.toggle_run();
    }

    /// Scatter the waypoints uniformly over the jumble range
    pub fn jumble<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let len = self.trajectory.waypoints().len();
        let xi = DVector::from_fn(len, |_, _| rng.random_range(JUMBLE_RANGE));
        self.trajectory.set_waypoints(xi)?;
        self.robots.refresh(&self.trajectory)?;
        log::info!("jumbled {} waypoints", self.trajectory.waypoint_count());
        Ok(())
    }
}

impl FrameHandler for Session {
    fn idle(&mut self) -> Result<()> {
        self.on_idle().map(|_| ())
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.on_draw(canvas);
    }

    fn pointer(&mut self, event: &PointerEvent) -> Result<()> {
        self.on_pointer(event)
    }

    fn command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::ToggleRun => self.toggle_run(),
            Command::Step => self.request_step(),
            Command::Jumble => self.jumble(&mut rand::rng())?,
        }
        Ok(())
    }
}
