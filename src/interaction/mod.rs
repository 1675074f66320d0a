//! Pointer gesture controller
//!
//! Turns raw pointer events into obstacle edits: press on an obstacle grabs
//! it, drag moves it while preserving the grab offset, release lets go, and a
//! secondary-button release on empty space drops a new obstacle.

use crate::common::types::Configuration;
use crate::error::Result;
use crate::obstacles::ObstacleStore;
use std::fmt;
use std::ops::BitOr;

/// Bit set describing one pointer event: a phase plus the buttons involved
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerFlags(u8);

impl PointerFlags {
    pub const NONE: PointerFlags = PointerFlags(0);
    pub const PRESS: PointerFlags = PointerFlags(1 << 0);
    pub const DRAG: PointerFlags = PointerFlags(1 << 1);
    pub const RELEASE: PointerFlags = PointerFlags(1 << 2);
    pub const PRIMARY: PointerFlags = PointerFlags(1 << 3);
    pub const SECONDARY: PointerFlags = PointerFlags(1 << 4);

    /// True if every bit of `other` is set
    pub fn contains(self, other: PointerFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for PointerFlags {
    type Output = PointerFlags;

    fn bitor(self, rhs: PointerFlags) -> PointerFlags {
        PointerFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for PointerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (PointerFlags::PRESS, "PRESS"),
            (PointerFlags::DRAG, "DRAG"),
            (PointerFlags::RELEASE, "RELEASE"),
            (PointerFlags::PRIMARY, "PRIMARY"),
            (PointerFlags::SECONDARY, "SECONDARY"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "PointerFlags({})", set.join(" | "))
    }
}

/// A pointer event in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Configuration,
    pub flags: PointerFlags,
}

impl PointerEvent {
    pub fn new(position: Configuration, flags: PointerFlags) -> Self {
        PointerEvent { position, flags }
    }
}

/// The obstacle currently being dragged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub index: usize,
    /// Obstacle center minus pointer position at grab time
    pub offset: Configuration,
}

/// Signal raised towards the run-state machine when a gesture starts or ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSignal {
    Grabbed,
    Released,
}

/// Grab/drag state machine over the obstacle store
#[derive(Debug, Clone)]
pub struct InteractionController {
    grab: Option<Grab>,
    new_obstacle_radius: f64,
}

impl InteractionController {
    /// Create an idle controller; secondary clicks create obstacles of `new_obstacle_radius`
    pub fn new(new_obstacle_radius: f64) -> Self {
        InteractionController {
            grab: None,
            new_obstacle_radius,
        }
    }

    /// The active grab, if any
    pub fn grab(&self) -> Option<&Grab> {
        self.grab.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.grab.is_none()
    }

    /// Apply one pointer event, returning the signal for the run-state machine
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        obstacles: &mut ObstacleStore,
    ) -> Result<Option<GestureSignal>> {
        let flags = event.flags;
        log::trace!("pointer {:?} at ({:.2}, {:.2})", flags, event.position.x, event.position.y);

        match self.grab {
            None if flags.contains(PointerFlags::RELEASE | PointerFlags::SECONDARY) => {
                let index = obstacles.add(event.position, self.new_obstacle_radius)?;
                log::info!(
                    "added obstacle {} at ({:.2}, {:.2}) r={}",
                    index,
                    event.position.x,
                    event.position.y,
                    self.new_obstacle_radius
                );
                Ok(None)
            }
            None if flags.contains(PointerFlags::PRESS) => {
                let Some(index) = obstacles.hit_test(&event.position) else {
                    return Ok(None);
                };
                let offset = obstacles.get(index)?.center - event.position;
                self.grab = Some(Grab { index, offset });
                log::info!("grabbed obstacle {}", index);
                Ok(Some(GestureSignal::Grabbed))
            }
            Some(grab) if flags.contains(PointerFlags::DRAG) => {
                obstacles.set_center(grab.index, event.position + grab.offset)?;
                Ok(None)
            }
            Some(grab) if flags.contains(PointerFlags::RELEASE) => {
                self.grab = None;
                log::info!("released obstacle {}", grab.index);
                Ok(Some(GestureSignal::Released))
            }
            _ => Ok(None),
        }
    }
}
