//! macroquad implementation of the canvas and the frame loop

use super::{Command, FrameHandler};
use crate::common::types::{config, Configuration};
use crate::error::Result;
use crate::interaction::{PointerEvent, PointerFlags};
use crate::render::{Canvas, Pen};
use crate::trajectory::BoundingBox;
use macroquad::prelude::{
    clear_background, draw_circle, draw_circle_lines, draw_line, draw_triangle, is_key_pressed,
    is_mouse_button_down, is_mouse_button_pressed, is_mouse_button_released, mouse_position,
    next_frame, screen_height, screen_width, vec2, Color, Conf, KeyCode, MouseButton, WHITE,
};
use std::f64::consts::PI;

const WINDOW_WIDTH: i32 = 800;
const WINDOW_HEIGHT: i32 = 800;

// Angular resolution of partial arcs
const ARC_STEP: f64 = PI / 32.0;

/// Window configuration for `#[macroquad::main]`
pub fn window_conf(title: &str) -> Conf {
    Conf {
        window_title: title.to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        ..Default::default()
    }
}

/// Maps a world-space view onto the window, keeping the aspect ratio and
/// pointing the y axis up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    center: Configuration,
    scale: f64,
    screen_width: f64,
    screen_height: f64,
}

impl ViewTransform {
    /// Fit `view` into a `screen_width` x `screen_height` window, centered
    pub fn fit(view: &BoundingBox, screen_width: f64, screen_height: f64) -> Self {
        let sx = screen_width / view.width();
        let sy = screen_height / view.height();
        let scale = sx.min(sy);
        ViewTransform {
            center: (view.min + view.max) / 2.0,
            scale: if scale.is_finite() && scale > 0.0 { scale } else { 1.0 },
            screen_width,
            screen_height,
        }
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f32, f32) {
        let sx = self.screen_width / 2.0 + (x - self.center.x) * self.scale;
        let sy = self.screen_height / 2.0 - (y - self.center.y) * self.scale;
        (sx as f32, sy as f32)
    }

    pub fn to_world(&self, sx: f32, sy: f32) -> Configuration {
        config(
            self.center.x + (sx as f64 - self.screen_width / 2.0) / self.scale,
            self.center.y - (sy as f64 - self.screen_height / 2.0) / self.scale,
        )
    }

    /// World length to pixels
    pub fn length(&self, d: f64) -> f32 {
        (d * self.scale) as f32
    }
}

/// Canvas drawing with macroquad's immediate-mode shapes
#[derive(Debug, Clone)]
pub struct MacroquadCanvas {
    pen: Pen,
    view: BoundingBox,
    transform: ViewTransform,
}

impl MacroquadCanvas {
    pub fn new() -> Self {
        let view = BoundingBox {
            min: config(-10.0, -10.0),
            max: config(10.0, 10.0),
        };
        MacroquadCanvas {
            pen: Pen::new(1.0, 0.0, 0.0, 0.0, 1.0),
            view,
            transform: ViewTransform::fit(&view, WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64),
        }
    }

    /// Refit the current view to a new window size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.transform = ViewTransform::fit(&self.view, width as f64, height as f64);
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    fn color(&self) -> Color {
        Color::new(
            self.pen.red as f32,
            self.pen.green as f32,
            self.pen.blue as f32,
            self.pen.alpha as f32,
        )
    }

    fn arc_points(&self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> Vec<(f32, f32)> {
        let span = end - start;
        let steps = ((span.abs() / ARC_STEP).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| {
                let a = start + span * i as f64 / steps as f64;
                self.transform.to_screen(cx + radius * a.cos(), cy + radius * a.sin())
            })
            .collect()
    }
}

impl Default for MacroquadCanvas {
    fn default() -> Self {
        Self::new()
    }
}

fn is_full_circle(start: f64, end: f64) -> bool {
    (end - start).abs() >= 2.0 * PI - 1e-9
}

impl Canvas for MacroquadCanvas {
    fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    fn fill_arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let color = self.color();
        let (x, y) = self.transform.to_screen(cx, cy);
        if is_full_circle(start_angle, end_angle) {
            draw_circle(x, y, self.transform.length(radius), color);
            return;
        }
        let rim = self.arc_points(cx, cy, radius, start_angle, end_angle);
        for pair in rim.windows(2) {
            draw_triangle(
                vec2(x, y),
                vec2(pair[0].0, pair[0].1),
                vec2(pair[1].0, pair[1].1),
                color,
            );
        }
    }

    fn draw_arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let color = self.color();
        let width = self.pen.width as f32;
        if is_full_circle(start_angle, end_angle) {
            let (x, y) = self.transform.to_screen(cx, cy);
            draw_circle_lines(x, y, self.transform.length(radius), width, color);
            return;
        }
        let rim = self.arc_points(cx, cy, radius, start_angle, end_angle);
        for pair in rim.windows(2) {
            draw_line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, width, color);
        }
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let (sx0, sy0) = self.transform.to_screen(x0, y0);
        let (sx1, sy1) = self.transform.to_screen(x1, y1);
        draw_line(sx0, sy0, sx1, sy1, self.pen.width as f32, self.color());
    }

    fn draw_point(&mut self, x: f64, y: f64) {
        let (sx, sy) = self.transform.to_screen(x, y);
        draw_circle(sx, sy, self.pen.width as f32 / 2.0, self.color());
    }

    fn set_view(&mut self, view: BoundingBox) {
        self.view = view;
        self.transform = ViewTransform::fit(&view, screen_width() as f64, screen_height() as f64);
    }
}

/// Translate this frame's mouse state into pointer events
fn poll_pointer(transform: &ViewTransform, last_mouse: &mut (f32, f32)) -> Vec<PointerEvent> {
    let mouse = mouse_position();
    let moved = mouse != *last_mouse;
    *last_mouse = mouse;
    let position = transform.to_world(mouse.0, mouse.1);

    let mut events = Vec::new();
    for (button, flag) in [
        (MouseButton::Left, PointerFlags::PRIMARY),
        (MouseButton::Right, PointerFlags::SECONDARY),
    ] {
        if is_mouse_button_pressed(button) {
            events.push(PointerEvent::new(position, PointerFlags::PRESS | flag));
        } else if moved && is_mouse_button_down(button) {
            events.push(PointerEvent::new(position, PointerFlags::DRAG | flag));
        }
        if is_mouse_button_released(button) {
            events.push(PointerEvent::new(position, PointerFlags::RELEASE | flag));
        }
    }
    events
}

fn poll_commands() -> Vec<Command> {
    [
        (KeyCode::Space, Command::ToggleRun),
        (KeyCode::S, Command::Step),
        (KeyCode::J, Command::Jumble),
    ]
    .into_iter()
    .filter(|(key, _)| is_key_pressed(*key))
    .map(|(_, command)| command)
    .collect()
}

/// Drive `handler` until the window closes or Escape is pressed
pub async fn run(title: &str, handler: &mut dyn FrameHandler) -> Result<()> {
    log::info!("starting frame loop for '{}'", title);
    let mut canvas = MacroquadCanvas::new();
    let mut last_mouse = mouse_position();

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        canvas.resize(screen_width(), screen_height());

        for event in poll_pointer(canvas.transform(), &mut last_mouse) {
            handler.pointer(&event)?;
        }
        for command in poll_commands() {
            log::debug!("command {:?}", command);
            handler.command(command)?;
        }

        handler.idle()?;

        clear_background(WHITE);
        handler.draw(&mut canvas);

        next_frame().await;
    }

    log::info!("frame loop for '{}' finished", title);
    Ok(())
}
