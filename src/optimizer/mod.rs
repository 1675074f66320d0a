//! Trajectory optimizers
//!
//! The session only depends on the `Optimizer` trait: one call performs one
//! bundled refinement iteration on the waypoint vector, in place.

use crate::common::types::Configuration;
use crate::error::Result;
use crate::obstacles::Obstacle;
use nalgebra::DVector;
use std::collections::HashMap;
use std::fmt::Debug;

/// Trait for trajectory refinement algorithms
pub trait Optimizer: Debug {
    /// Create a new instance with default parameters
    fn new() -> Self
    where
        Self: Sized;

    /// Run one iteration, updating `xi` in place. Must keep `xi.len()` unchanged.
    fn iterate(
        &mut self,
        start: &Configuration,
        goal: &Configuration,
        xi: &mut DVector<f64>,
        obstacles: &[Obstacle],
    );

    /// Get the name of this optimizer
    fn name(&self) -> &str;

    /// Configure the optimizer with parameters
    fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()>;
}

pub mod chomp;

// Default implementation
pub use chomp::ChompOptimizer as DefaultOptimizer;
