use crate::action::{Action, FrameInput, Movement};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Keys the game reacts to, independent of any windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Shift,
    Up,
    Down,
    Left,
    Right,
    C,
    F,
    M,
    Enter,
}

/// Toggle keys in the order their actions are emitted within a frame.
pub const TOGGLE_BINDINGS: [(Key, Action); 4] = [
    (Key::C, Action::ToggleCameraMode),
    (Key::F, Action::ToggleSpotlight),
    (Key::Enter, Action::DropPackage),
    (Key::M, Action::ToggleMouseLook),
];

/// Key state between two frame boundaries.
///
/// Tracks which keys are held and which went down since the last
/// [`take_frame`](Self::take_frame), so a press and release inside one
/// frame still fires its toggle.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<Key>,
    pressed: BTreeSet<Key>,
    pending: Vec<Action>,
    cursor: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        // OS key repeat re-sends presses for held keys.
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Queue an action from a non-keyboard source (mouse buttons).
    pub fn push_action(&mut self, action: Action) {
        self.pending.push(action);
    }

    pub fn cursor_moved(&mut self, position: Vec2) {
        self.cursor = Some(position);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn axis(&self, positive: Key, negative: Key) -> f32 {
        let mut v = 0.0;
        if self.is_held(positive) {
            v += 1.0;
        }
        if self.is_held(negative) {
            v -= 1.0;
        }
        v
    }

    /// Snapshot the intent for one simulation step and start a new frame.
    pub fn take_frame(&mut self) -> FrameInput {
        let mut actions: Vec<Action> = TOGGLE_BINDINGS
            .iter()
            .filter(|(key, _)| self.just_pressed(*key))
            .map(|(_, action)| *action)
            .collect();
        actions.append(&mut self.pending);
        if !actions.is_empty() {
            tracing::trace!(?actions, "frame actions");
        }

        let frame = FrameInput {
            actions,
            movement: Movement {
                forward: self.axis(Key::W, Key::S),
                right: self.axis(Key::D, Key::A),
                up: self.axis(Key::Space, Key::Shift),
            },
            look: Vec2::new(
                self.axis(Key::Left, Key::Right),
                self.axis(Key::Up, Key::Down),
            ),
            cursor: self.cursor.take(),
        };
        self.pressed.clear();
        frame
    }
}
