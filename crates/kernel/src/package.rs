use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A package in flight from the airship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub position: Vec3,
    /// Unit travel direction.
    pub direction: Vec3,
    pub lifetime: f32,
    pub active: bool,
    pub color: Vec3,
}

impl Package {
    pub fn new(position: Vec3, direction: Vec3, lifetime: f32, color: Vec3) -> Self {
        Self {
            position,
            direction: direction.normalize_or_zero(),
            lifetime,
            active: true,
            color,
        }
    }

    /// Move and age the package. Returns false once its lifetime is spent.
    pub fn advance(&mut self, dt: f32, speed: f32) -> bool {
        self.position += self.direction * speed * dt;
        self.lifetime -= dt;
        self.lifetime > 0.0
    }

    /// Colour multiplier that makes packages pulse.
    pub fn pulse(game_time: f32) -> f32 {
        0.8 + 0.2 * (game_time * 8.0).sin()
    }
}
