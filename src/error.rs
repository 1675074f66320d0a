//! Error type shared by the core components

use thiserror::Error;

/// Errors raised when a caller violates a component contract
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("obstacle index {index} out of range (store holds {len})")]
    ObstacleOutOfRange { index: usize, len: usize },

    #[error("waypoint index {index} out of range (trajectory holds {len})")]
    WaypointOutOfRange { index: usize, len: usize },

    #[error("position has {actual} DOF (but needs {expected})")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("obstacle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("waypoint vector has length {actual}, expected {expected}")]
    WaypointLengthChanged { expected: usize, actual: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl CoreError {
    pub(crate) fn invalid_parameter(name: &str, reason: &str) -> Self {
        CoreError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
