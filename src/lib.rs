//! Interactive trials with trajectory optimization for a point vehicle
//! moving holonomously in the plane.
//!
//! There is a fixed start and goal configuration, and circular obstacles can
//! be dragged around (or dropped in with the secondary button) to see how the
//! optimizer reacts.

pub mod backend;
pub mod common;
pub mod error;
pub mod interaction;
pub mod obstacles;
pub mod optimizer;
pub mod render;
pub mod session;
pub mod simulation;
pub mod trajectory;
pub mod visualization;

pub use crate::error::{CoreError, Result};
pub use crate::session::{Session, SessionConfig};
