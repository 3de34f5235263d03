//! wgpu backend for the winter scene.
//!
//! Uploads scene objects once, then draws each [`zima_render::FramePlan`]
//! with a single lit pipeline. Per-draw values live in one uniform buffer
//! addressed by dynamic offsets.
//!
//! # Invariants
//! - The renderer reads frame plans only; it never sees the world.
//! - GPU resources live as long as the renderer's scene.

mod gpu;
mod shaders;

pub use gpu::{GpuMesh, GpuTexture, WgpuRenderer, WgpuUploader};
