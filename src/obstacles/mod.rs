//! Obstacle store
//!
//! This module holds the circular obstacles the optimizer steers around.
//! The collection only grows: an obstacle's identity is its position in the
//! store, so indices handed out by `add` or `hit_test` stay valid for the
//! whole session.

use crate::common::types::Configuration;
use crate::error::{CoreError, Result};

/// A circular obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Configuration,
    pub radius: f64,
}

impl Obstacle {
    /// Create a new obstacle
    pub fn new(center: Configuration, radius: f64) -> Self {
        Obstacle { center, radius }
    }

    /// Check if a point lies inside (or on the rim of) the obstacle
    pub fn contains(&self, point: &Configuration) -> bool {
        (self.center - point).norm() <= self.radius
    }

    /// Signed distance from a point to the rim, negative inside
    pub fn signed_distance(&self, point: &Configuration) -> f64 {
        (point - self.center).norm() - self.radius
    }
}

/// Append-only, index-stable collection of obstacles
#[derive(Debug, Clone, Default)]
pub struct ObstacleStore {
    obstacles: Vec<Obstacle>,
}

impl ObstacleStore {
    /// Create an empty store
    pub fn new() -> Self {
        ObstacleStore {
            obstacles: Vec::new(),
        }
    }

    /// Append a new obstacle at the tail and return its index.
    ///
    /// Growing the store may reallocate; callers that add many obstacles at
    /// once should do so outside the frame loop.
    pub fn add(&mut self, center: Configuration, radius: f64) -> Result<usize> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(CoreError::InvalidRadius(radius));
        }
        self.obstacles.push(Obstacle::new(center, radius));
        Ok(self.obstacles.len() - 1)
    }

    /// Get the obstacle at `index`
    pub fn get(&self, index: usize) -> Result<&Obstacle> {
        self.obstacles
            .get(index)
            .ok_or(CoreError::ObstacleOutOfRange {
                index,
                len: self.obstacles.len(),
            })
    }

    /// Move the obstacle at `index` to a new center
    pub fn set_center(&mut self, index: usize, center: Configuration) -> Result<()> {
        let len = self.obstacles.len();
        let obstacle = self
            .obstacles
            .get_mut(index)
            .ok_or(CoreError::ObstacleOutOfRange { index, len })?;
        obstacle.center = center;
        Ok(())
    }

    /// Index of the first obstacle containing `point`, in store order
    pub fn hit_test(&self, point: &Configuration) -> Option<usize> {
        self.obstacles.iter().position(|obs| obs.contains(point))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
