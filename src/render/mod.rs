//! Drawing of a frame onto an abstract canvas
//!
//! The canvas works in world coordinates; the backend maps the view set by
//! `set_view` onto the window.

use crate::obstacles::ObstacleStore;
use crate::trajectory::{BoundingBox, Trajectory};
use crate::visualization::{Robot, VisualizationAdapter};
use std::f64::consts::PI;

/// Line width and RGBA color used by subsequent drawing calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub width: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Pen {
    pub const fn new(width: f64, red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Pen {
            width,
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Pen styles of the scene
pub mod pens {
    use super::Pen;

    pub const ROBOT_FILL: Pen = Pen::new(1.0, 0.7, 0.7, 0.7, 0.5);
    pub const ROBOT_OUTLINE: Pen = Pen::new(3.0, 0.2, 0.2, 0.2, 1.0);
    pub const TRAJECTORY: Pen = Pen::new(1.0, 0.2, 0.2, 0.2, 1.0);
    pub const START_POINT: Pen = Pen::new(5.0, 0.8, 0.2, 0.2, 1.0);
    pub const WAYPOINT: Pen = Pen::new(5.0, 0.5, 0.5, 0.5, 1.0);
    pub const GOAL_POINT: Pen = Pen::new(5.0, 0.2, 0.8, 0.2, 1.0);
    pub const OBSTACLE: Pen = Pen::new(1.0, 0.0, 0.0, 1.0, 0.2);
}

/// Drawing primitives a backend must provide
pub trait Canvas {
    fn set_pen(&mut self, pen: Pen);

    /// Filled circular arc from `start_angle` to `end_angle` (radians)
    fn fill_arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64);

    /// Stroked circular arc from `start_angle` to `end_angle` (radians)
    fn draw_arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64);

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);

    fn draw_point(&mut self, x: f64, y: f64);

    /// Make `view` the visible region of the world
    fn set_view(&mut self, view: BoundingBox);
}

fn draw_robot(canvas: &mut dyn Canvas, robot: &Robot) {
    let (x, y) = (robot.position.x, robot.position.y);

    // translucent disk for base
    canvas.set_pen(pens::ROBOT_FILL);
    canvas.fill_arc(x, y, robot.radius(), 0.0, 2.0 * PI);

    // thick outline
    canvas.set_pen(pens::ROBOT_OUTLINE);
    canvas.draw_arc(x, y, robot.radius(), 0.0, 2.0 * PI);
}

/// Draw one frame: view, robots, trajectory polyline and points, obstacles
pub fn draw_frame(
    canvas: &mut dyn Canvas,
    trajectory: &Trajectory,
    robots: &VisualizationAdapter,
    obstacles: &ObstacleStore,
    view_margin: f64,
) {
    canvas.set_view(trajectory.bounding_box().expanded(view_margin));

    for robot in robots.iter() {
        draw_robot(canvas, robot);
    }

    let line = trajectory.polyline();
    canvas.set_pen(pens::TRAJECTORY);
    for pair in line.windows(2) {
        canvas.draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y);
    }

    let start = trajectory.start();
    canvas.set_pen(pens::START_POINT);
    canvas.draw_point(start.x, start.y);
    canvas.set_pen(pens::WAYPOINT);
    for q in trajectory.iter_waypoints() {
        canvas.draw_point(q.x, q.y);
    }
    let goal = trajectory.goal();
    canvas.set_pen(pens::GOAL_POINT);
    canvas.draw_point(goal.x, goal.y);

    for obstacle in obstacles.iter() {
        canvas.set_pen(pens::OBSTACLE);
        canvas.fill_arc(obstacle.center.x, obstacle.center.y, obstacle.radius, 0.0, 2.0 * PI);
    }
}
