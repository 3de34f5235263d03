use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

const PITCH_LIMIT: f32 = 89.0;

/// Which way the camera frames the airship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMode {
    /// Third person, circling the airship at a fixed distance.
    #[default]
    Orbit,
    /// First person, looking out from just above the airship.
    Aim,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Orbit => CameraMode::Aim,
            CameraMode::Aim => CameraMode::Orbit,
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraMode::Orbit => write!(f, "orbit"),
            CameraMode::Aim => write!(f, "aim"),
        }
    }
}

/// Spherical camera around a subject. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pitch: f32,
    pub yaw: f32,
    pub distance: f32,
    pub sensitivity: f32,
    pub aim_height: f32,
    last_cursor: Vec2,
    first_move: bool,
    mouse_enabled: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            yaw: config.yaw,
            distance: config.distance,
            sensitivity: config.sensitivity,
            aim_height: config.aim_height,
            last_cursor: Vec2::new(640.0, 360.0),
            first_move: true,
            mouse_enabled: true,
        }
    }

    /// Unit view direction from pitch and yaw.
    pub fn forward(&self) -> Vec3 {
        let (p, y) = (self.pitch.to_radians(), self.yaw.to_radians());
        Vec3::new(p.cos() * y.sin(), p.sin(), p.cos() * y.cos()).normalize()
    }

    /// Direction shots and the spotlight travel in. The orbit eye sits on
    /// the `forward` side of the subject, so there it is reversed.
    pub fn aim_direction(&self, mode: CameraMode) -> Vec3 {
        match mode {
            CameraMode::Orbit => -self.forward(),
            CameraMode::Aim => self.forward(),
        }
    }

    pub fn orbit_eye(&self, target: Vec3) -> Vec3 {
        target + self.forward() * self.distance
    }

    pub fn aim_eye(&self, subject: Vec3) -> Vec3 {
        subject + Vec3::Y * self.aim_height
    }

    pub fn view_orbit(&self, target: Vec3) -> Mat4 {
        Mat4::look_at_rh(self.orbit_eye(target), target, Vec3::Y)
    }

    pub fn view_aim(&self, subject: Vec3) -> Mat4 {
        let eye = self.aim_eye(subject);
        Mat4::look_at_rh(eye, eye + self.forward(), Vec3::Y)
    }

    pub fn view(&self, mode: CameraMode, subject: Vec3) -> Mat4 {
        match mode {
            CameraMode::Orbit => self.view_orbit(subject),
            CameraMode::Aim => self.view_aim(subject),
        }
    }

    pub fn eye(&self, mode: CameraMode, subject: Vec3) -> Vec3 {
        match mode {
            CameraMode::Orbit => self.orbit_eye(subject),
            CameraMode::Aim => self.aim_eye(subject),
        }
    }

    /// Feed an absolute cursor position. The first sample after enabling
    /// only seeds the reference point.
    pub fn process_mouse_movement(&mut self, x: f32, y: f32) {
        let cursor = Vec2::new(x, y);
        if !self.mouse_enabled || self.first_move {
            self.last_cursor = cursor;
            self.first_move = false;
            return;
        }

        let dx = (x - self.last_cursor.x) * self.sensitivity;
        // Screen Y grows downward.
        let dy = (self.last_cursor.y - y) * self.sensitivity;
        self.last_cursor = cursor;

        self.yaw += dx;
        self.pitch = (self.pitch + dy).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.last_cursor = Vec2::new(x, y);
    }

    pub fn toggle_mouse_control(&mut self, enabled: bool) {
        self.mouse_enabled = enabled;
        if enabled {
            self.first_move = true;
        }
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    pub fn last_cursor(&self) -> Vec2 {
        self.last_cursor
    }

    /// Keyboard look, in degrees.
    pub fn nudge(&mut self, dpitch: f32, dyaw: f32) {
        self.yaw += dyaw;
        self.set_pitch(self.pitch + dpitch);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cam = Camera::default();
        assert_eq!(cam.pitch, 25.0);
        assert_eq!(cam.yaw, 180.0);
        assert_eq!(cam.distance, 1200.0);
        assert_eq!(cam.last_cursor(), Vec2::new(640.0, 360.0));
        assert!(cam.mouse_enabled());
    }

    #[test]
    fn first_movement_only_records_position() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(100.0, 100.0);
        assert_eq!(cam.yaw, 180.0);
        assert_eq!(cam.pitch, 25.0);
        assert_eq!(cam.last_cursor(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn later_movement_applies_scaled_deltas() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(100.0, 100.0);
        cam.process_mouse_movement(110.0, 80.0);
        assert!((cam.yaw - 181.0).abs() < 1e-5);
        assert!((cam.pitch - 27.0).abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(0.0, 0.0);
        cam.process_mouse_movement(0.0, -10_000.0);
        assert_eq!(cam.pitch, 89.0);
        cam.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(cam.pitch, -89.0);
        cam.nudge(500.0, 0.0);
        assert_eq!(cam.pitch, 89.0);
    }

    #[test]
    fn pitch_stays_clamped_under_small_steps() {
        let mut cam = Camera::default();
        let mut y = 0.0;
        cam.process_mouse_movement(0.0, y);
        for _ in 0..2000 {
            y -= 3.0;
            cam.process_mouse_movement(0.0, y);
            assert!((-89.0..=89.0).contains(&cam.pitch));
        }
        assert_eq!(cam.pitch, 89.0);
        for _ in 0..4000 {
            y += 3.0;
            cam.process_mouse_movement(0.0, y);
            assert!((-89.0..=89.0).contains(&cam.pitch));
        }
        assert_eq!(cam.pitch, -89.0);
    }

    #[test]
    fn set_mouse_position_moves_reference_only() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(0.0, 0.0);
        cam.set_mouse_position(400.0, 300.0);
        assert_eq!(cam.yaw, 180.0);
        cam.process_mouse_movement(410.0, 300.0);
        assert!((cam.yaw - 181.0).abs() < 1e-5);
    }

    #[test]
    fn disabled_mouse_only_tracks_cursor() {
        let mut cam = Camera::default();
        cam.toggle_mouse_control(false);
        cam.process_mouse_movement(10.0, 10.0);
        cam.process_mouse_movement(500.0, 500.0);
        assert_eq!(cam.yaw, 180.0);
        assert_eq!(cam.last_cursor(), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn re_enabling_rearms_the_guard() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(0.0, 0.0);
        cam.toggle_mouse_control(false);
        cam.toggle_mouse_control(true);
        cam.process_mouse_movement(300.0, 0.0);
        assert_eq!(cam.yaw, 180.0);
    }

    #[test]
    fn orbit_eye_is_distance_from_target() {
        let cam = Camera::default();
        let target = Vec3::new(10.0, 300.0, -5.0);
        let eye = cam.orbit_eye(target);
        assert!(((eye - target).length() - cam.distance).abs() < 1e-2);
        // Positive pitch puts the eye above the target.
        assert!(eye.y > target.y);
    }

    #[test]
    fn aim_eye_sits_above_subject() {
        let cam = Camera::default();
        let subject = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(cam.aim_eye(subject), Vec3::new(1.0, 52.0, 3.0));
        let view = cam.view_aim(subject);
        let eye_in_view = view.transform_point3(cam.aim_eye(subject));
        assert!(eye_in_view.length() < 1e-3);
    }

    #[test]
    fn forward_is_unit_and_aim_direction_flips_in_orbit() {
        let cam = Camera::default();
        assert!((cam.forward().length() - 1.0).abs() < 1e-6);
        assert_eq!(cam.aim_direction(CameraMode::Orbit), -cam.forward());
        assert_eq!(cam.aim_direction(CameraMode::Aim), cam.forward());
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(CameraMode::Orbit.toggled(), CameraMode::Aim);
        assert_eq!(CameraMode::Aim.toggled(), CameraMode::Orbit);
    }
}
