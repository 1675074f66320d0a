//! Run-state machine
//!
//! Decides once per frame whether the optimizer runs. Pointer gestures drive
//! the machine through `apply_gesture`: grabbing an obstacle starts
//! continuous optimization so the trajectory reacts while it is dragged, and
//! letting go pauses it again.

use crate::common::types::CONFIG_DIM;
use crate::error::{CoreError, Result};
use crate::interaction::GestureSignal;
use crate::obstacles::ObstacleStore;
use crate::optimizer::Optimizer;
use crate::trajectory::Trajectory;

/// Whether the optimizer is invoked on the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Paused,
    /// Run exactly one iteration, then pause
    Step,
    Running,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,
    Iterated,
}

/// Per-frame run-state machine
#[derive(Debug, Clone)]
pub struct RunStateMachine {
    state: RunState,
    iterations: u64,
}

impl Default for RunStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStateMachine {
    /// Create a paused machine
    pub fn new() -> Self {
        RunStateMachine {
            state: RunState::Paused,
            iterations: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Total optimizer iterations run by this machine
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    fn set_state(&mut self, state: RunState) {
        if self.state != state {
            log::info!("run state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Coupling rule between the gesture controller and this machine:
    /// a grab forces `Running`, a release forces `Paused`.
    pub fn apply_gesture(&mut self, signal: GestureSignal) {
        match signal {
            GestureSignal::Grabbed => self.set_state(RunState::Running),
            GestureSignal::Released => self.set_state(RunState::Paused),
        }
    }

    /// Run a single iteration on the next tick
    pub fn request_step(&mut self) {
        self.set_state(RunState::Step);
    }

    /// Switch between continuous running and paused
    pub fn toggle_run(&mut self) {
        match self.state {
            RunState::Running => self.set_state(RunState::Paused),
            RunState::Paused | RunState::Step => self.set_state(RunState::Running),
        }
    }

    pub fn pause(&mut self) {
        self.set_state(RunState::Paused);
    }

    /// Per-frame idle tick
    pub fn tick(
        &mut self,
        optimizer: &mut dyn Optimizer,
        trajectory: &mut Trajectory,
        obstacles: &ObstacleStore,
    ) -> Result<TickOutcome> {
        if self.state == RunState::Paused {
            return Ok(TickOutcome::Skipped);
        }

        run_iteration(optimizer, trajectory, obstacles)?;
        self.iterations += 1;
        log::debug!("{} iteration {} ({:?})", optimizer.name(), self.iterations, self.state);

        if self.state == RunState::Step {
            self.set_state(RunState::Paused);
        }
        Ok(TickOutcome::Iterated)
    }
}

/// Invoke the optimizer once and check that it kept the waypoint count
pub fn run_iteration(
    optimizer: &mut dyn Optimizer,
    trajectory: &mut Trajectory,
    obstacles: &ObstacleStore,
) -> Result<()> {
    let start = *trajectory.start();
    let goal = *trajectory.goal();
    let expected = trajectory.waypoint_count() * CONFIG_DIM;

    // The trajectory is only touched once the result has the right length
    let mut xi = trajectory.waypoints().clone();
    optimizer.iterate(&start, &goal, &mut xi, obstacles.as_slice());

    if xi.len() != expected {
        return Err(CoreError::WaypointLengthChanged {
            expected,
            actual: xi.len(),
        });
    }
    trajectory.set_waypoints(xi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{config, Configuration};
    use crate::obstacles::Obstacle;
    use nalgebra::DVector;
    use std::collections::HashMap;

    /// Shifts every coordinate by one and counts calls
    #[derive(Debug, Default)]
    struct CountingOptimizer {
        calls: usize,
    }

    impl Optimizer for CountingOptimizer {
        fn new() -> Self {
            CountingOptimizer::default()
        }

        fn iterate(&mut self, _: &Configuration, _: &Configuration, xi: &mut DVector<f64>, _: &[Obstacle]) {
            self.calls += 1;
            xi.add_scalar_mut(1.0);
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn configure(&mut self, _: &HashMap<String, f64>) -> Result<()> {
            Ok(())
        }
    }

    /// Violates the contract by growing the waypoint vector
    #[derive(Debug)]
    struct GrowingOptimizer;

    impl Optimizer for GrowingOptimizer {
        fn new() -> Self {
            GrowingOptimizer
        }

        fn iterate(&mut self, _: &Configuration, _: &Configuration, xi: &mut DVector<f64>, _: &[Obstacle]) {
            let len = xi.len();
            *xi = DVector::zeros(len + 2);
        }

        fn name(&self) -> &str {
            "growing"
        }

        fn configure(&mut self, _: &HashMap<String, f64>) -> Result<()> {
            Ok(())
        }
    }

    fn fixture() -> (Trajectory, ObstacleStore) {
        (
            Trajectory::straight_line(config(0.0, 0.0), config(4.0, 4.0), 3),
            ObstacleStore::new(),
        )
    }

    #[test]
    fn test_paused_skips_optimizer() {
        let (mut traj, obstacles) = fixture();
        let mut machine = RunStateMachine::new();
        let mut optimizer = CountingOptimizer::new();

        let outcome = machine.tick(&mut optimizer, &mut traj, &obstacles).unwrap();

        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(optimizer.calls, 0);
        assert_eq!(traj.waypoint_at(0).unwrap(), config(1.0, 1.0));
    }

    #[test]
    fn test_running_iterates_every_tick() {
        let (mut traj, obstacles) = fixture();
        let mut machine = RunStateMachine::new();
        let mut optimizer = CountingOptimizer::new();
        machine.apply_gesture(GestureSignal::Grabbed);

        for _ in 0..3 {
            assert_eq!(
                machine.tick(&mut optimizer, &mut traj, &obstacles).unwrap(),
                TickOutcome::Iterated
            );
        }

        assert_eq!(optimizer.calls, 3);
        assert_eq!(machine.state(), RunState::Running);
        assert_eq!(machine.iterations(), 3);
    }

    #[test]
    fn test_step_runs_once_then_pauses() {
        let (mut traj, obstacles) = fixture();
        let mut machine = RunStateMachine::new();
        let mut optimizer = CountingOptimizer::new();
        machine.request_step();

        machine.tick(&mut optimizer, &mut traj, &obstacles).unwrap();
        assert_eq!(machine.state(), RunState::Paused);
        machine.tick(&mut optimizer, &mut traj, &obstacles).unwrap();

        assert_eq!(optimizer.calls, 1);
    }

    #[test]
    fn test_gesture_coupling() {
        let mut machine = RunStateMachine::new();
        assert_eq!(machine.state(), RunState::Paused);

        machine.apply_gesture(GestureSignal::Grabbed);
        assert_eq!(machine.state(), RunState::Running);

        machine.apply_gesture(GestureSignal::Released);
        assert_eq!(machine.state(), RunState::Paused);

        // Release also cancels a pending step
        machine.request_step();
        machine.apply_gesture(GestureSignal::Released);
        assert_eq!(machine.state(), RunState::Paused);
    }

    #[test]
    fn test_toggle_run() {
        let mut machine = RunStateMachine::new();
        machine.toggle_run();
        assert_eq!(machine.state(), RunState::Running);
        machine.toggle_run();
        assert_eq!(machine.state(), RunState::Paused);
        machine.request_step();
        machine.toggle_run();
        assert_eq!(machine.state(), RunState::Running);
    }

    #[test]
    fn test_length_change_is_reported() {
        let (mut traj, obstacles) = fixture();
        let mut machine = RunStateMachine::new();
        machine.toggle_run();

        let err = machine
            .tick(&mut GrowingOptimizer::new(), &mut traj, &obstacles)
            .unwrap_err();

        assert_eq!(err, CoreError::WaypointLengthChanged { expected: 6, actual: 8 });
    }

    #[test]
    fn test_rejected_iteration_keeps_trajectory() {
        let (mut traj, obstacles) = fixture();
        let before = traj.waypoints().clone();
        let mut machine = RunStateMachine::new();
        machine.toggle_run();

        assert!(machine.tick(&mut GrowingOptimizer::new(), &mut traj, &obstacles).is_err());

        assert_eq!(traj.waypoints().len(), 6);
        assert_eq!(traj.waypoints(), &before);
        assert_eq!(traj.waypoint_at(0).unwrap(), config(1.0, 1.0));
        assert_eq!(machine.iterations(), 0);

        // A well-behaved optimizer still works on the untouched trajectory
        let mut counting = CountingOptimizer::new();
        assert_eq!(machine.tick(&mut counting, &mut traj, &obstacles).unwrap(), TickOutcome::Iterated);
        assert_eq!(traj.waypoint_at(0).unwrap(), config(2.0, 2.0));
    }
}
