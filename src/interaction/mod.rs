//! Door swing and fridge scale, applied to scene nodes.

mod door;
mod scale;
mod tween;

use anyhow::Result;
use glam::Vec3;

use crate::scene::{NodeId, SceneGraph};

pub use door::{DoorState, DOOR_CLOSED_ANGLE, DOOR_OPEN_ANGLE, DOOR_SWING_SECONDS};
pub use scale::{ScaleFactor, SCALE_RANGE};
pub use tween::{ease_out_cubic, Tween};

/// Owns the door machine and the current scale, writes both into the graph
#[derive(Debug, Clone)]
pub struct InteractionController {
    door: DoorState,
    scale: ScaleFactor,
    door_pivot: NodeId,
    fridge_root: NodeId,
    base_height: f32,
}

impl InteractionController {
    pub fn new(door_pivot: NodeId, fridge_root: NodeId, base_height: f32) -> Self {
        Self {
            door: DoorState::Closed,
            scale: ScaleFactor::ONE,
            door_pivot,
            fridge_root,
            base_height,
        }
    }

    pub fn door(&self) -> DoorState {
        self.door
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    /// Requests a door swing, returns false when one is already running
    pub fn toggle_door(&mut self) -> bool {
        let (next, accepted) = self.door.toggle();
        if accepted {
            log::debug!("Door {} -> {}, heading to {:.2} rad", self.door, next, next.target_angle());
        } else {
            log::debug!("Door toggle ignored while {}", self.door);
        }
        self.door = next;
        accepted
    }

    /// Advances the swing and poses the hinge
    ///
    /// Returns the rest state reached on the frame a swing completes.
    pub fn update(&mut self, graph: &mut SceneGraph, delta: f32) -> Result<Option<DoorState>> {
        let was_stable = self.door.is_stable();
        self.door = self.door.advance(delta);
        graph.transform_mut(self.door_pivot)?.rotation.y = self.door.angle();

        if !was_stable && self.door.is_stable() {
            log::debug!("Door settled {}", self.door);
            return Ok(Some(self.door));
        }
        Ok(None)
    }

    /// Scales the fridge uniformly and shifts it by the grounding offset
    pub fn set_scale(&mut self, graph: &mut SceneGraph, scale: ScaleFactor) -> Result<()> {
        let transform = graph.transform_mut(self.fridge_root)?;
        transform.scale = Vec3::splat(scale.get());
        transform.position.y = scale.grounded_offset(self.base_height);
        self.scale = scale;
        log::debug!("Fridge scale {:.2}, offset {:.3}", scale.get(), transform.position.y);
        Ok(())
    }
}
