use crate::config::AirshipConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use zima_input::Movement;

/// The player's airship. Only its position is simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airship {
    pub position: Vec3,
}

impl Airship {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Move along the ground-projected `heading` and its right vector, then
    /// clamp altitude.
    pub fn steer(&mut self, movement: &Movement, heading: Vec3, dt: f32, config: &AirshipConfig) {
        let forward = Vec3::new(heading.x, 0.0, heading.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let step = config.speed * dt;

        self.position += forward * movement.forward * step;
        self.position += right * movement.right * step;
        self.position.y += movement.up * step;
        self.position.y = self
            .position
            .y
            .clamp(config.min_altitude, config.max_altitude);
    }
}
