use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Edge-triggered game action.
///
/// Produced once per press and applied by the kernel in the order received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Switch between orbit and aim camera.
    ToggleCameraMode,
    /// Switch the airship spotlight on or off.
    ToggleSpotlight,
    /// Release a package from the airship.
    DropPackage,
    /// Capture or release the mouse for camera look.
    ToggleMouseLook,
}

/// Continuous airship steering intent, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

impl Movement {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0 && self.up == 0.0
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.right, self.up, self.forward)
    }
}

/// Everything the simulation needs from the player for one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub actions: Vec<Action>,
    pub movement: Movement,
    /// Keyboard look: `x` turns left, `y` tilts up. Only applied while
    /// mouse look is off.
    pub look: Vec2,
    /// Latest cursor position, if the pointer moved this frame.
    pub cursor: Option<Vec2>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_look(mut self, look: Vec2) -> Self {
        self.look = look;
        self
    }

    pub fn with_cursor(mut self, cursor: Vec2) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn has(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_frame_is_empty() {
        let f = FrameInput::idle();
        assert!(f.actions.is_empty());
        assert!(f.movement.is_idle());
        assert!(f.cursor.is_none());
    }

    #[test]
    fn builder_keeps_action_order() {
        let f = FrameInput::idle()
            .with_action(Action::DropPackage)
            .with_action(Action::ToggleCameraMode);
        assert_eq!(f.actions, vec![Action::DropPackage, Action::ToggleCameraMode]);
        assert!(f.has(Action::DropPackage));
        assert!(!f.has(Action::ToggleSpotlight));
    }

    #[test]
    fn movement_axes() {
        let m = Movement {
            forward: 1.0,
            right: -1.0,
            up: 0.0,
        };
        assert_eq!(m.as_vec3(), Vec3::new(-1.0, 0.0, 1.0));
        assert!(!m.is_idle());
    }
}
