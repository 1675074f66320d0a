//! Event/render backend
//!
//! The frame loop calls into a `FrameHandler` on three occasions per frame:
//! zero or more pointer events, one idle tick, then one draw. Pointer
//! mutations are therefore always applied before the idle tick, and the idle
//! tick's optimizer update before the draw reads the trajectory.

use crate::error::Result;
use crate::interaction::PointerEvent;
use crate::render::Canvas;

pub mod macroquad_canvas;

pub use macroquad_canvas::{run, window_conf, MacroquadCanvas};

/// Keyboard commands of the interactive shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle continuous optimization
    ToggleRun,
    /// Run a single iteration
    Step,
    /// Scatter the waypoints randomly
    Jumble,
}

/// Callbacks the frame loop drives
pub trait FrameHandler {
    /// Called once per frame after input has been delivered
    fn idle(&mut self) -> Result<()>;

    /// Called once per frame after `idle`
    fn draw(&mut self, canvas: &mut dyn Canvas);

    /// Called for every pointer event, in world coordinates
    fn pointer(&mut self, event: &PointerEvent) -> Result<()>;

    /// Called for every keyboard command
    fn command(&mut self, command: Command) -> Result<()>;
}
