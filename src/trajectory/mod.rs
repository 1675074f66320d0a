//! Trajectory model
//!
//! The optimized trajectory is stored the way the optimizer consumes it: a
//! flat vector `xi = (q_1, q_2, ... q_n)` with waypoint `i` occupying
//! `xi[i * 2 .. i * 2 + 2]`. The start (`q_0`) and goal (`q_n+1`) are fixed
//! boundary configurations and never part of `xi`.

use crate::common::types::{Configuration, CONFIG_DIM};
use crate::error::{CoreError, Result};
use nalgebra::{DVector, Vector2};

/// Axis-aligned extent of a set of configurations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Configuration,
    pub max: Configuration,
}

impl BoundingBox {
    /// Degenerate box around a single point
    pub fn around(point: Configuration) -> Self {
        BoundingBox {
            min: point,
            max: point,
        }
    }

    /// Grow the box so it contains `point`
    pub fn include(&mut self, point: &Configuration) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Pad the box by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        let pad = Vector2::repeat(margin);
        BoundingBox {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Start, goal and the waypoints in between
#[derive(Debug, Clone)]
pub struct Trajectory {
    start: Configuration,
    goal: Configuration,
    xi: DVector<f64>,
}

impl Trajectory {
    /// Create a trajectory seeded by linear interpolation between start and goal
    pub fn straight_line(start: Configuration, goal: Configuration, waypoint_count: usize) -> Self {
        let mut xi = DVector::zeros(waypoint_count * CONFIG_DIM);
        for ii in 0..waypoint_count {
            let t = (ii + 1) as f64 / (waypoint_count + 1) as f64;
            let q = start + (goal - start) * t;
            xi.fixed_rows_mut::<2>(ii * CONFIG_DIM).copy_from(&q);
        }
        Trajectory { start, goal, xi }
    }

    /// Create a trajectory from an explicit flat waypoint vector
    pub fn from_waypoints(start: Configuration, goal: Configuration, xi: DVector<f64>) -> Result<Self> {
        if xi.len() % CONFIG_DIM != 0 {
            return Err(CoreError::DimensionMismatch {
                expected: CONFIG_DIM,
                actual: xi.len() % CONFIG_DIM,
            });
        }
        Ok(Trajectory { start, goal, xi })
    }

    pub fn start(&self) -> &Configuration {
        &self.start
    }

    pub fn goal(&self) -> &Configuration {
        &self.goal
    }

    /// Number of intermediate waypoints `N`
    pub fn waypoint_count(&self) -> usize {
        self.xi.len() / CONFIG_DIM
    }

    /// The flat waypoint vector
    pub fn waypoints(&self) -> &DVector<f64> {
        &self.xi
    }

    /// Replace all waypoints, keeping `N` unchanged
    pub fn set_waypoints(&mut self, xi: DVector<f64>) -> Result<()> {
        if xi.len() != self.xi.len() {
            return Err(CoreError::WaypointLengthChanged {
                expected: self.xi.len(),
                actual: xi.len(),
            });
        }
        self.xi = xi;
        Ok(())
    }

    /// The waypoint at position `index`
    pub fn waypoint_at(&self, index: usize) -> Result<Configuration> {
        if index >= self.waypoint_count() {
            return Err(CoreError::WaypointOutOfRange {
                index,
                len: self.waypoint_count(),
            });
        }
        Ok(self.xi.fixed_rows::<2>(index * CONFIG_DIM).into_owned())
    }

    /// Iterate over the waypoints as configurations
    pub fn iter_waypoints(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.xi
            .as_slice()
            .chunks_exact(CONFIG_DIM)
            .map(|q| Vector2::new(q[0], q[1]))
    }

    /// Start, waypoints and goal in path order
    pub fn polyline(&self) -> Vec<Configuration> {
        let mut points = Vec::with_capacity(self.waypoint_count() + 2);
        points.push(self.start);
        points.extend(self.iter_waypoints());
        points.push(self.goal);
        points
    }

    /// Extent of start, goal and all waypoints. Obstacles are not included.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::around(self.start);
        bbox.include(&self.goal);
        for q in self.iter_waypoints() {
            bbox.include(&q);
        }
        bbox
    }
}
