use crate::config::SledConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A decorative sled circling the Christmas tree.
///
/// `angle` is the only integrated state; `position` is recomputed from it
/// and the game clock on every advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sled {
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    pub bob_offset: f32,
    pub position: Vec3,
}

impl Sled {
    pub fn new(angle: f32, speed: f32, radius: f32, bob_offset: f32, config: &SledConfig) -> Self {
        Self {
            angle,
            speed,
            radius,
            bob_offset,
            position: orbit_position(angle, radius, 0.0, bob_offset, config),
        }
    }

    pub fn advance(&mut self, dt: f32, game_time: f32, config: &SledConfig) {
        self.angle += self.speed * dt;
        self.position = orbit_position(self.angle, self.radius, game_time, self.bob_offset, config);
    }

    /// Model yaw about Y, in radians.
    pub fn heading(&self) -> f32 {
        self.angle + std::f32::consts::PI
    }

    /// Side-to-side rock about the model's Z axis, in radians.
    pub fn rock(&self, game_time: f32) -> f32 {
        (game_time + self.bob_offset).sin() * 0.1
    }
}

/// Position on the orbit for a given angle and game time.
pub fn orbit_position(
    angle: f32,
    radius: f32,
    game_time: f32,
    bob_offset: f32,
    config: &SledConfig,
) -> Vec3 {
    Vec3::new(
        angle.sin() * radius,
        config.base_height
            + config.bob_amplitude * (game_time * config.bob_frequency + bob_offset).sin(),
        angle.cos() * radius + config.center_z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_integrates_angle() {
        let config = SledConfig::default();
        let mut sled = Sled::new(0.0, 0.3, 120.0, 0.0, &config);
        sled.advance(1.0, 1.0, &config);
        assert!((sled.angle - 0.3).abs() < 1e-6);
        assert!((sled.position.x - 0.3f32.sin() * 120.0).abs() < 1e-3);
        assert!((sled.position.z - (0.3f32.cos() * 120.0 + 200.0)).abs() < 1e-3);
    }

    #[test]
    fn position_is_a_pure_function() {
        let config = SledConfig::default();
        let a = orbit_position(1.7, 160.0, 12.5, 0.4, &config);
        let b = orbit_position(1.7, 160.0, 12.5, 0.4, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn bob_stays_within_amplitude() {
        let config = SledConfig::default();
        for i in 0..200 {
            let t = i as f32 * 0.05;
            let p = orbit_position(0.0, 120.0, t, 1.0, &config);
            assert!((p.y - config.base_height).abs() <= config.bob_amplitude + 1e-4);
        }
    }

    #[test]
    fn rock_is_small() {
        let config = SledConfig::default();
        let sled = Sled::new(0.0, 0.3, 120.0, 2.0, &config);
        assert!(sled.rock(3.3).abs() <= 0.1);
    }
}
