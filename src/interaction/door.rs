use std::f32::consts::PI;
use std::fmt;

use super::tween::Tween;

/// Hinge angle of the closed door
pub const DOOR_CLOSED_ANGLE: f32 = 0.0;
/// Hinge angle of the open door, swinging outwards
pub const DOOR_OPEN_ANGLE: f32 = -0.6 * PI;
/// Length of one swing in seconds
pub const DOOR_SWING_SECONDS: f32 = 0.8;

/// Door state machine
///
/// `Closed` and `Open` are rest states. The transient states carry the swing
/// in flight, so there is never more than one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DoorState {
    #[default]
    Closed,
    Opening(Tween),
    Open,
    Closing(Tween),
}

impl DoorState {
    pub fn is_stable(&self) -> bool {
        matches!(self, DoorState::Closed | DoorState::Open)
    }

    /// Hinge angle this state puts the door at
    pub fn angle(&self) -> f32 {
        match self {
            DoorState::Closed => DOOR_CLOSED_ANGLE,
            DoorState::Open => DOOR_OPEN_ANGLE,
            DoorState::Opening(tween) | DoorState::Closing(tween) => tween.value(),
        }
    }

    /// Angle the door comes to rest at once the current swing ends
    pub fn target_angle(&self) -> f32 {
        match self {
            DoorState::Opening(tween) | DoorState::Closing(tween) => tween.target(),
            stable => stable.angle(),
        }
    }

    /// Starts a swing from a rest state
    ///
    /// Requests during a swing are dropped; the flag says whether this one
    /// was accepted.
    pub fn toggle(self) -> (DoorState, bool) {
        let from = self.angle();
        match self {
            DoorState::Closed => (
                DoorState::Opening(Tween::new(from, DOOR_OPEN_ANGLE, DOOR_SWING_SECONDS)),
                true,
            ),
            DoorState::Open => (
                DoorState::Closing(Tween::new(from, DOOR_CLOSED_ANGLE, DOOR_SWING_SECONDS)),
                true,
            ),
            busy => (busy, false),
        }
    }

    /// Moves a swing forward by `delta` seconds, settling when it runs out
    pub fn advance(self, delta: f32) -> DoorState {
        match self {
            DoorState::Opening(mut tween) => {
                if tween.tick(delta) {
                    DoorState::Open
                } else {
                    DoorState::Opening(tween)
                }
            }
            DoorState::Closing(mut tween) => {
                if tween.tick(delta) {
                    DoorState::Closed
                } else {
                    DoorState::Closing(tween)
                }
            }
            stable => stable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DoorState::Closed => "closed",
            DoorState::Opening(_) => "opening",
            DoorState::Open => "open",
            DoorState::Closing(_) => "closing",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
