//! Display entities derived from the trajectory

use crate::common::types::{Configuration, CONFIG_DIM};
use crate::error::{CoreError, Result};
use crate::trajectory::Trajectory;

/// A robot drawn at one configuration of the trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Robot {
    pub position: Configuration,
}

impl Robot {
    /// Display radius of every robot
    pub const RADIUS: f64 = 0.5;

    pub fn new() -> Self {
        Robot {
            position: Configuration::zeros(),
        }
    }

    /// Move the robot; `position` must have exactly two coordinates
    pub fn update(&mut self, position: &[f64]) -> Result<()> {
        if position.len() != CONFIG_DIM {
            return Err(CoreError::DimensionMismatch {
                expected: CONFIG_DIM,
                actual: position.len(),
            });
        }
        self.position = Configuration::new(position[0], position[1]);
        Ok(())
    }

    pub fn radius(&self) -> f64 {
        Self::RADIUS
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::new()
    }
}

/// One robot per waypoint, plus the fixed start and goal
#[derive(Debug, Clone, Default)]
pub struct VisualizationAdapter {
    start: Robot,
    goal: Robot,
    robots: Vec<Robot>,
}

impl VisualizationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every robot from the current trajectory
    pub fn refresh(&mut self, trajectory: &Trajectory) -> Result<()> {
        self.start.update(trajectory.start().as_slice())?;
        self.goal.update(trajectory.goal().as_slice())?;

        let n = trajectory.waypoint_count();
        self.robots.resize(n, Robot::new());
        for (robot, q) in self
            .robots
            .iter_mut()
            .zip(trajectory.waypoints().as_slice().chunks(CONFIG_DIM))
        {
            robot.update(q)?;
        }
        Ok(())
    }

    pub fn start(&self) -> &Robot {
        &self.start
    }

    pub fn goal(&self) -> &Robot {
        &self.goal
    }

    /// Waypoint robots in trajectory order
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Start, waypoints and goal in drawing order
    pub fn iter(&self) -> impl Iterator<Item = &Robot> {
        std::iter::once(&self.start)
            .chain(self.robots.iter())
            .chain(std::iter::once(&self.goal))
    }
}
