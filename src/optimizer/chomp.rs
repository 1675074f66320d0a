//! Covariant gradient trajectory optimizer (CHOMP)
//!
//! Based on:
//! Zucker et al., "CHOMP: Covariant Hamiltonian Optimization for Motion Planning", IJRR 2013
//!
//! Each iteration takes one step of covariant gradient descent on the sum of
//! a smoothness functional (squared finite-difference velocities, with the
//! fixed start and goal as boundary conditions) and an obstacle functional
//! (arc-length weighted clearance cost against every disk).

use super::Optimizer;
use crate::common::types::{Configuration, CONFIG_DIM};
use crate::error::{CoreError, Result};
use crate::obstacles::Obstacle;
use nalgebra::{DMatrix, DVector, Matrix2, Vector2};
use std::collections::HashMap;

/// CHOMP optimizer for a point vehicle in the plane
#[derive(Debug)]
pub struct ChompOptimizer {
    // Step size is 1 / eta
    eta: f64,
    // Weight of the smoothness gradient
    lambda: f64,
    // Weight of the obstacle gradient
    obstacle_gain: f64,
    // Clearance below which an obstacle starts to cost
    influence_distance: f64,
    // Time between waypoints
    dt: f64,
    // Cached inverse smoothness metric, keyed by waypoint count
    metric_inverse: Option<(usize, DMatrix<f64>)>,
}

impl ChompOptimizer {
    /// Smoothness metric `A = K^T K / dt^2` for `n` waypoints
    fn metric(&self, n: usize) -> DMatrix<f64> {
        let scale = 1.0 / (self.dt * self.dt);
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                2.0 * scale
            } else if i.abs_diff(j) == 1 {
                -scale
            } else {
                0.0
            }
        })
    }

    fn metric_inverse(&mut self, n: usize) -> Option<&DMatrix<f64>> {
        let stale = match &self.metric_inverse {
            Some((cached_n, _)) => *cached_n != n,
            None => true,
        };
        if stale {
            let inverse = self.metric(n).cholesky()?.inverse();
            self.metric_inverse = Some((n, inverse));
        }
        self.metric_inverse.as_ref().map(|(_, inv)| inv)
    }

    /// Clearance cost of a single point and its gradient
    fn obstacle_cost(&self, x: &Vector2<f64>, obstacles: &[Obstacle]) -> (f64, Vector2<f64>) {
        let eps = self.influence_distance;
        let mut cost = 0.0;
        let mut gradient = Vector2::zeros();

        for obstacle in obstacles {
            let delta = x - obstacle.center;
            let dist = delta.norm();
            if dist < 1e-12 {
                // Direction undefined at the very center
                cost += obstacle.radius + eps / 2.0;
                continue;
            }
            let normal = delta / dist;
            let d = dist - obstacle.radius;
            if d < 0.0 {
                cost += -d + eps / 2.0;
                gradient -= normal;
            } else if d < eps {
                cost += (d - eps).powi(2) / (2.0 * eps);
                gradient += normal * ((d - eps) / eps);
            }
        }

        (cost, gradient)
    }

    /// Obstacle gradient for every waypoint, flattened like `xi`
    fn obstacle_gradient(
        &self,
        start: &Configuration,
        goal: &Configuration,
        xi: &DVector<f64>,
        obstacles: &[Obstacle],
    ) -> DVector<f64> {
        let n = xi.len() / CONFIG_DIM;
        let mut gradient = DVector::zeros(xi.len());
        if obstacles.is_empty() {
            return gradient;
        }

        let q = |i: isize| -> Vector2<f64> {
            if i < 0 {
                *start
            } else if i as usize >= n {
                *goal
            } else {
                let i = i as usize;
                Vector2::new(xi[i * CONFIG_DIM], xi[i * CONFIG_DIM + 1])
            }
        };

        for ii in 0..n {
            let i = ii as isize;
            let prev = q(i - 1);
            let curr = q(i);
            let next = q(i + 1);

            let xd = (next - prev) / (2.0 * self.dt);
            let xdd = (next - 2.0 * curr + prev) / (self.dt * self.dt);
            let speed = xd.norm();
            if speed < 1e-9 {
                continue;
            }

            let (cost, grad_c) = self.obstacle_cost(&curr, obstacles);
            if cost == 0.0 {
                continue;
            }

            let xd_hat = xd / speed;
            let projection = Matrix2::identity() - xd_hat * xd_hat.transpose();
            let curvature = projection * xdd / (speed * speed);
            let g = (projection * grad_c - curvature * cost) * speed;

            gradient[ii * CONFIG_DIM] = g.x;
            gradient[ii * CONFIG_DIM + 1] = g.y;
        }

        gradient
    }

    /// Sum of squared finite-difference velocities along start, waypoints, goal
    pub fn smoothness_cost(&self, start: &Configuration, goal: &Configuration, xi: &DVector<f64>) -> f64 {
        let mut prev = *start;
        let mut cost = 0.0;
        for q in xi.as_slice().chunks_exact(CONFIG_DIM) {
            let q = Vector2::new(q[0], q[1]);
            cost += ((q - prev) / self.dt).norm_squared();
            prev = q;
        }
        cost += ((goal - prev) / self.dt).norm_squared();
        0.5 * cost
    }
}

impl Optimizer for ChompOptimizer {
    fn new() -> Self {
        ChompOptimizer {
            eta: 100.0,
            lambda: 1.0,
            obstacle_gain: 0.5,
            influence_distance: 1.0,
            dt: 1.0,
            metric_inverse: None,
        }
    }

    fn iterate(
        &mut self,
        start: &Configuration,
        goal: &Configuration,
        xi: &mut DVector<f64>,
        obstacles: &[Obstacle],
    ) {
        let n = xi.len() / CONFIG_DIM;
        if n == 0 {
            return;
        }

        let metric = self.metric(n);
        let obstacle_grad = self.obstacle_gradient(start, goal, xi, obstacles);
        let scale = 1.0 / (self.dt * self.dt);
        let (lambda, gain, eta) = (self.lambda, self.obstacle_gain, self.eta);

        let Some(inverse) = self.metric_inverse(n).cloned() else {
            log::warn!("smoothness metric for {} waypoints is not positive definite", n);
            return;
        };

        for dim in 0..CONFIG_DIM {
            let q_d = DVector::from_iterator(n, (0..n).map(|i| xi[i * CONFIG_DIM + dim]));

            // Boundary term b = K^T e / dt^2
            let mut smooth = &metric * &q_d;
            smooth[0] -= start[dim] * scale;
            smooth[n - 1] -= goal[dim] * scale;

            let obs_d = DVector::from_iterator(n, (0..n).map(|i| obstacle_grad[i * CONFIG_DIM + dim]));
            let step = &inverse * (smooth * lambda + obs_d * gain) / eta;

            for i in 0..n {
                xi[i * CONFIG_DIM + dim] -= step[i];
            }
        }
    }

    fn name(&self) -> &str {
        "CHOMP"
    }

    fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let positive = |name: &str| -> Result<Option<f64>> {
            match params.get(name) {
                Some(&value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
                Some(_) => Err(CoreError::invalid_parameter(name, "must be positive")),
                None => Ok(None),
            }
        };

        let eta = positive("eta")?;
        let lambda = positive("lambda")?;
        let obstacle_gain = positive("obstacle_gain")?;
        let influence_distance = positive("influence_distance")?;
        let dt = positive("dt")?;

        self.eta = eta.unwrap_or(self.eta);
        self.lambda = lambda.unwrap_or(self.lambda);
        self.obstacle_gain = obstacle_gain.unwrap_or(self.obstacle_gain);
        self.influence_distance = influence_distance.unwrap_or(self.influence_distance);
        if let Some(dt) = dt {
            self.dt = dt;
            self.metric_inverse = None;
        }

        Ok(())
    }
}
