use anyhow::{ensure, Context, Result};
use chomp_shell::backend::{Command, FrameHandler};
use chomp_shell::common::types::config;
use chomp_shell::interaction::{PointerEvent, PointerFlags};
use chomp_shell::simulation::RunState;
use chomp_shell::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Initializing session...");
    let mut session = Session::with_defaults().context("failed to set up session")?;

    let bbox = session.trajectory().bounding_box();
    log::info!(
        "Trajectory spans ({:.2}, {:.2}) .. ({:.2}, {:.2})",
        bbox.min.x,
        bbox.min.y,
        bbox.max.x,
        bbox.max.y
    );

    // Grab the first obstacle, drag it across the straight line and let go
    let primary = PointerFlags::PRIMARY;
    session.pointer(&PointerEvent::new(config(3.0, 0.5), PointerFlags::PRESS | primary))?;
    ensure!(session.run_state() == RunState::Running, "grab should start the optimizer");

    for step in 0..30 {
        let x = 3.0 - 0.1 * step as f64;
        let y = 0.5 + 0.1 * step as f64;
        session.pointer(&PointerEvent::new(config(x, y), PointerFlags::DRAG | primary))?;
        session.idle()?;
    }
    session.pointer(&PointerEvent::new(config(0.0, 3.5), PointerFlags::RELEASE | primary))?;
    ensure!(session.run_state() == RunState::Paused, "release should pause the optimizer");

    let moved = session.obstacles().get(0)?;
    log::info!(
        "Obstacle 0 now at ({:.2}, {:.2}) r={}",
        moved.center.x,
        moved.center.y,
        moved.radius
    );

    // Drop a new obstacle and take a single step
    session.pointer(&PointerEvent::new(
        config(4.0, 1.0),
        PointerFlags::RELEASE | PointerFlags::SECONDARY,
    ))?;
    session.command(Command::Step)?;
    session.idle()?;
    log::info!("{} obstacles after secondary click", session.obstacles().len());

    for (i, q) in session.trajectory().iter_waypoints().enumerate() {
        log::info!("waypoint {:2}: ({:7.3}, {:7.3})", i, q.x, q.y);
    }

    log::info!("Headless run finished in state {:?}", session.run_state());
    Ok(())
}
