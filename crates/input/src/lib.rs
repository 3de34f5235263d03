//! Input: raw key state turned into per-frame control intent.
//!
//! The kernel consumes [`FrameInput`], never windowing events, so the
//! simulation can be driven by a desktop window, a script, or a test.
//!
//! # Invariants
//! - A toggle action fires once per physical press, however long the key is held.
//! - Held keys map to continuous intent in `[-1, 1]` per axis.

pub mod action;
mod keyboard;

pub use action::{Action, FrameInput, Movement};
pub use keyboard::{InputState, Key, TOGGLE_BINDINGS};

pub fn crate_info() -> &'static str {
    "zima-input v0.1.0"
}
