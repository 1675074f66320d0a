//! Common utilities and types for the trajectory shell

/// Common types and utilities used across the codebase
pub mod types {
    use nalgebra::Vector2;

    /// Dimension of the configuration space
    pub const CONFIG_DIM: usize = 2;

    /// A point in the plane: start, goal, or an intermediate waypoint
    pub type Configuration = Vector2<f64>;

    /// Build a configuration from its coordinates
    pub fn config(x: f64, y: f64) -> Configuration {
        Vector2::new(x, y)
    }
}
