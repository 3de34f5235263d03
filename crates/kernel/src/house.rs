use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Colour of a house that has just been served.
pub const DELIVERED_GREY: Vec3 = Vec3::splat(0.4);

/// A delivery target. While it needs a delivery its timer is dormant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub position: Vec3,
    pub color: Vec3,
    pub needs_delivery: bool,
    pub timer: f32,
}

impl House {
    pub fn new(position: Vec3, color: Vec3, timer: f32) -> Self {
        Self {
            position,
            color,
            needs_delivery: true,
            timer,
        }
    }

    /// True if a package at `point` lands on this house.
    pub fn accepts(&self, point: Vec3, radius: f32) -> bool {
        self.needs_delivery && self.position.distance(point) < radius
    }

    pub fn deliver(&mut self) {
        self.needs_delivery = false;
    }

    /// Count down while served. Returns true when the house wants another
    /// delivery; the caller then supplies a fresh timer via [`rearm`](Self::rearm).
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.needs_delivery {
            return false;
        }
        self.timer -= dt;
        self.timer <= 0.0
    }

    pub fn rearm(&mut self, timer: f32) {
        self.needs_delivery = true;
        self.timer = timer;
    }

    pub fn display_color(&self) -> Vec3 {
        if self.needs_delivery {
            self.color
        } else {
            DELIVERED_GREY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house() -> House {
        House::new(Vec3::new(100.0, 15.0, 100.0), Vec3::new(0.5, 0.6, 0.7), 3.0)
    }

    #[test]
    fn waiting_house_accepts_close_packages() {
        let h = house();
        assert!(h.accepts(Vec3::new(100.0, 40.0, 100.0), 40.0));
        assert!(!h.accepts(Vec3::new(100.0, 60.0, 100.0), 40.0));
    }

    #[test]
    fn served_house_rejects_packages() {
        let mut h = house();
        h.deliver();
        assert!(!h.accepts(h.position, 40.0));
        assert_eq!(h.display_color(), DELIVERED_GREY);
    }

    #[test]
    fn timer_is_dormant_while_waiting() {
        let mut h = house();
        assert!(!h.tick(100.0));
        assert_eq!(h.timer, 3.0);
    }

    #[test]
    fn timer_runs_out_after_delivery() {
        let mut h = house();
        h.deliver();
        assert!(!h.tick(2.0));
        assert!(h.tick(1.0));
        h.rearm(9.0);
        assert!(h.needs_delivery);
        assert_eq!(h.timer, 9.0);
        assert_eq!(h.display_color(), h.color);
    }
}
