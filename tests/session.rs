use chomp_shell::common::types::{config, Configuration};
use chomp_shell::interaction::{PointerEvent, PointerFlags};
use chomp_shell::obstacles::Obstacle;
use chomp_shell::optimizer::{DefaultOptimizer, Optimizer};
use chomp_shell::simulation::{RunState, TickOutcome};
use chomp_shell::{CoreError, Session, SessionConfig};
use nalgebra::DVector;
use std::collections::HashMap;

/// Appends one coordinate per iteration, which a session must refuse
#[derive(Debug)]
struct AppendingOptimizer;

impl Optimizer for AppendingOptimizer {
    fn new() -> Self {
        AppendingOptimizer
    }

    fn iterate(&mut self, _: &Configuration, _: &Configuration, xi: &mut DVector<f64>, _: &[Obstacle]) {
        let len = xi.len();
        *xi = xi.clone().resize_vertically(len + 1, 0.0);
    }

    fn name(&self) -> &str {
        "appending"
    }

    fn configure(&mut self, _: &HashMap<String, f64>) -> chomp_shell::Result<()> {
        Ok(())
    }
}

fn event(x: f64, y: f64, flags: PointerFlags) -> PointerEvent {
    PointerEvent::new(config(x, y), flags)
}

fn press(x: f64, y: f64) -> PointerEvent {
    event(x, y, PointerFlags::PRESS | PointerFlags::PRIMARY)
}

fn drag(x: f64, y: f64) -> PointerEvent {
    event(x, y, PointerFlags::DRAG | PointerFlags::PRIMARY)
}

fn release(x: f64, y: f64) -> PointerEvent {
    event(x, y, PointerFlags::RELEASE | PointerFlags::PRIMARY)
}

fn empty_session() -> Session {
    let cfg = SessionConfig {
        obstacles: Vec::new(),
        ..SessionConfig::default()
    };
    Session::new(cfg, Box::new(DefaultOptimizer::new())).unwrap()
}

#[test]
fn test_waypoint_count_survives_optimization() {
    let mut session = Session::with_defaults().unwrap();
    session.on_pointer(&press(3.0, 0.0)).unwrap();

    for i in 0..100 {
        session.on_pointer(&drag(3.0 - 0.05 * i as f64, 0.0)).unwrap();
        assert_eq!(session.on_idle().unwrap(), TickOutcome::Iterated);
        assert_eq!(session.trajectory().waypoint_count(), 20);
        assert_eq!(session.trajectory().waypoints().len(), 40);
    }
}

#[test]
fn test_grab_drag_release_cycle() {
    let mut session = Session::with_defaults().unwrap();
    assert_eq!(session.run_state(), RunState::Paused);

    session.on_pointer(&press(2.0, 1.0)).unwrap();
    assert_eq!(session.run_state(), RunState::Running);
    let offset = session.controller().grab().unwrap().offset;
    assert_eq!(offset, config(1.0, -1.0));

    let path = [(2.5, 1.5), (8.0, -4.0), (-3.0, 6.0), (1.0, 1.0), (0.0, 0.0)];
    for (x, y) in path {
        session.on_pointer(&drag(x, y)).unwrap();
        session.on_idle().unwrap();
        assert_eq!(session.obstacles().get(0).unwrap().center, config(x, y) + offset);
        assert_eq!(session.run_state(), RunState::Running);
    }

    session.on_pointer(&release(0.0, 0.0)).unwrap();
    assert_eq!(session.run_state(), RunState::Paused);
    assert!(session.controller().grab().is_none());
    assert_eq!(session.on_idle().unwrap(), TickOutcome::Skipped);
}

#[test]
fn test_release_after_no_drags_pauses() {
    let mut session = Session::with_defaults().unwrap();
    session.on_pointer(&press(0.0, 3.0)).unwrap();
    assert_eq!(session.controller().grab().unwrap().index, 1);

    session.on_pointer(&release(0.0, 3.0)).unwrap();

    assert_eq!(session.run_state(), RunState::Paused);
    assert_eq!(session.obstacles().get(1).unwrap().center, config(0.0, 3.0));
}

#[test]
fn test_overlapping_obstacles_pick_lowest_index() {
    let config_with_overlap = SessionConfig {
        obstacles: vec![
            Obstacle::new(config(0.0, 0.0), 2.0),
            Obstacle::new(config(1.0, 0.0), 2.0),
        ],
        ..SessionConfig::default()
    };
    let mut session = Session::new(config_with_overlap, Box::new(DefaultOptimizer::new())).unwrap();

    session.on_pointer(&press(0.5, 0.0)).unwrap();

    assert_eq!(session.controller().grab().unwrap().index, 0);
}

#[test]
fn test_missed_press_changes_nothing() {
    let mut session = Session::with_defaults().unwrap();
    let before: Vec<Obstacle> = session.obstacles().as_slice().to_vec();

    session.on_pointer(&press(-20.0, 20.0)).unwrap();
    session.on_pointer(&drag(-10.0, 10.0)).unwrap();

    assert!(session.controller().is_idle());
    assert_eq!(session.run_state(), RunState::Paused);
    assert_eq!(session.obstacles().as_slice(), before.as_slice());
}

#[test]
fn test_release_without_grab_is_noop() {
    let mut session = Session::with_defaults().unwrap();

    session.on_pointer(&release(3.0, 0.0)).unwrap();

    assert_eq!(session.run_state(), RunState::Paused);
    assert_eq!(session.obstacles().len(), 2);
}

#[test]
fn test_secondary_release_adds_default_obstacle() {
    let mut session = empty_session();
    assert!(session.obstacles().is_empty());

    session
        .on_pointer(&event(4.0, 1.0, PointerFlags::RELEASE | PointerFlags::SECONDARY))
        .unwrap();

    assert_eq!(session.obstacles().len(), 1);
    assert_eq!(*session.obstacles().get(0).unwrap(), Obstacle::new(config(4.0, 1.0), 2.0));
}

#[test]
fn test_new_obstacle_can_be_grabbed() {
    let mut session = empty_session();
    session
        .on_pointer(&event(4.0, 1.0, PointerFlags::RELEASE | PointerFlags::SECONDARY))
        .unwrap();

    session.on_pointer(&press(4.5, 1.0)).unwrap();
    session.on_pointer(&drag(0.5, 0.0)).unwrap();

    assert_eq!(session.obstacles().get(0).unwrap().center, config(0.0, 0.0));
}

#[test]
fn test_reference_view_box() {
    let config_no_warmup = SessionConfig {
        warmup_iterations: 0,
        ..SessionConfig::default()
    };
    let session = Session::new(config_no_warmup, Box::new(DefaultOptimizer::new())).unwrap();

    let bbox = session.trajectory().bounding_box();
    assert_eq!(bbox.min, config(-5.0, -5.0));
    assert_eq!(bbox.max, config(7.0, 7.0));

    let view = bbox.expanded(2.0);
    assert_eq!(view.min, config(-7.0, -7.0));
    assert_eq!(view.max, config(9.0, 9.0));
}

#[test]
fn test_optimizer_iterations_are_deterministic() {
    let mut a = Session::with_defaults().unwrap();
    let mut b = Session::with_defaults().unwrap();

    for session in [&mut a, &mut b] {
        session.toggle_run();
        for _ in 0..20 {
            session.on_idle().unwrap();
        }
    }

    assert_eq!(a.trajectory().waypoints(), b.trajectory().waypoints());
}

#[test]
fn test_bad_optimizer_output_leaves_session_intact() {
    let cfg = SessionConfig {
        warmup_iterations: 0,
        ..SessionConfig::default()
    };
    let mut session = Session::new(cfg, Box::new(AppendingOptimizer::new())).unwrap();
    let before = session.trajectory().waypoints().clone();
    session.toggle_run();

    let err = session.on_idle().unwrap_err();

    assert_eq!(err, CoreError::WaypointLengthChanged { expected: 40, actual: 41 });
    assert_eq!(session.trajectory().waypoints().len(), 40);
    assert_eq!(session.trajectory().waypoints(), &before);
    assert_eq!(session.robots().robots().len(), 20);
}

#[test]
fn test_zero_radius_config_is_rejected_up_front() {
    let cfg = SessionConfig {
        new_obstacle_radius: 0.0,
        ..SessionConfig::default()
    };

    let result = Session::new(cfg, Box::new(DefaultOptimizer::new()));

    assert!(matches!(result, Err(CoreError::InvalidParameter { .. })));
}

#[test]
fn test_warmup_with_bad_optimizer_fails_setup() {
    let result = Session::new(SessionConfig::default(), Box::new(AppendingOptimizer::new()));

    assert_eq!(
        result.err(),
        Some(CoreError::WaypointLengthChanged { expected: 40, actual: 41 })
    );
}
