//! Zima kernel: authoritative game state and per-frame stepping.
//!
//! The world owns the camera rig, the circling sleds, packages in flight,
//! delivery houses and the airship. Front ends turn device input into a
//! [`zima_input::FrameInput`] and call [`World::step`] once per frame;
//! renderers only read.
//!
//! # Invariants
//! - Only `World::step` mutates game state.
//! - A package scores at most once, against the first waiting house in
//!   index order.
//! - Camera pitch stays within [-89, 89] degrees.
//! - Airship altitude stays within the configured band.
//! - Same config and same input sequence give the same `state_hash`.

pub mod airship;
pub mod camera;
pub mod config;
pub mod house;
pub mod package;
pub mod rng;
pub mod sled;
pub mod world;

pub use airship::Airship;
pub use camera::{Camera, CameraMode};
pub use config::{
    AirshipConfig, CameraConfig, ConfigError, GameConfig, HouseConfig, PackageConfig, SledConfig,
    TreeFieldConfig,
};
pub use house::{DELIVERED_GREY, House};
pub use package::Package;
pub use rng::SimRng;
pub use sled::Sled;
pub use world::{GameEvent, World, WorldSummary};

pub fn crate_info() -> &'static str {
    "zima-kernel v0.1.0"
}
