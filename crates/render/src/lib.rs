//! Render orchestration, independent of any GPU API.
//!
//! [`plan_frame`] turns the world into frame uniforms plus an ordered list
//! of draw commands. [`Scene`] loads and uploads the static scene objects
//! through a backend's [`ResourceUploader`].
//!
//! # Invariants
//! - Renderers read a [`FramePlan`]; they never touch world state.
//! - Draw order is fixed: terrain, snow, Christmas tree, lanterns, houses,
//!   forest, packages, sleds, airship.
//! - Every scene object resolves to a mesh; missing files fall back.

mod plan;
mod renderer;
mod scene;

pub use plan::{
    CLEAR_COLOR, DrawCommand, DrawFlags, FAR_PLANE, FOV_DEGREES, FramePlan, FrameUniforms,
    MAX_LANTERNS, NEAR_PLANE, SceneObjectId, Spotlight, light_direction, plan_frame,
};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{
    HeadlessUploader, ResourceUploader, Scene, SceneObject, SceneObjectDesc, TextureRole,
    scene_manifest,
};

pub fn crate_info() -> &'static str {
    "zima-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
