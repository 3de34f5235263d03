use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a game configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Every tunable of the simulation. Missing YAML keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub houses: HouseConfig,
    pub trees: TreeFieldConfig,
    pub sleds: SledConfig,
    pub packages: PackageConfig,
    pub airship: AirshipConfig,
    pub camera: CameraConfig,
    pub lanterns: Vec<Vec3>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            houses: HouseConfig::default(),
            trees: TreeFieldConfig::default(),
            sleds: SledConfig::default(),
            packages: PackageConfig::default(),
            airship: AirshipConfig::default(),
            camera: CameraConfig::default(),
            lanterns: default_lanterns(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), seed = config.seed, "loaded game config");
        Ok(config)
    }

    /// Load `path` when given, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn default_lanterns() -> Vec<Vec3> {
    vec![
        Vec3::new(400.0, 15.0, 400.0),
        Vec3::new(-400.0, 15.0, 400.0),
        Vec3::new(400.0, 15.0, -400.0),
        Vec3::new(-400.0, 15.0, -400.0),
        Vec3::new(1200.0, 15.0, 0.0),
        Vec3::new(-1200.0, 15.0, 0.0),
        Vec3::new(0.0, 15.0, 1200.0),
        Vec3::new(0.0, 15.0, -1200.0),
        Vec3::new(1800.0, 15.0, 1800.0),
        Vec3::new(-1800.0, 15.0, -1800.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseConfig {
    pub count: usize,
    /// Houses are scattered over `[-spread, spread)` on X and Z.
    pub spread: f32,
    pub height: f32,
    pub color_range: (f32, f32),
    pub initial_timer: (f32, f32),
    pub redelivery_timer: (f32, f32),
    pub reward: u32,
    pub hit_radius: f32,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            count: 8,
            spread: 2000.0,
            height: 15.0,
            color_range: (0.3, 1.0),
            initial_timer: (5.0, 15.0),
            redelivery_timer: (8.0, 18.0),
            reward: 10,
            hit_radius: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeFieldConfig {
    pub count: usize,
    pub spread: f32,
}

impl Default for TreeFieldConfig {
    fn default() -> Self {
        Self {
            count: 20,
            spread: 3000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SledConfig {
    pub count: usize,
    pub base_radius: f32,
    pub radius_step: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub base_height: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    /// Z of the orbit centre (the Christmas tree).
    pub center_z: f32,
}

impl Default for SledConfig {
    fn default() -> Self {
        Self {
            count: 3,
            base_radius: 120.0,
            radius_step: 40.0,
            base_speed: 0.3,
            speed_step: 0.15,
            base_height: 20.0,
            bob_amplitude: 3.0,
            bob_frequency: 2.0,
            center_z: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub speed: f32,
    pub lifetime: f32,
    /// Packages below this height are discarded.
    pub floor: f32,
    /// Spawn lift above the airship in aim mode.
    pub aim_lift: f32,
    pub color: Vec3,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            speed: 600.0,
            lifetime: 6.0,
            floor: 30.0,
            aim_lift: 20.0,
            color: Vec3::new(1.0, 0.9, 0.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirshipConfig {
    pub start: Vec3,
    pub speed: f32,
    pub min_altitude: f32,
    pub max_altitude: f32,
}

impl Default for AirshipConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 300.0, 0.0),
            speed: 400.0,
            min_altitude: 50.0,
            max_altitude: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub pitch: f32,
    pub yaw: f32,
    pub distance: f32,
    pub sensitivity: f32,
    /// Arrow-key turn rate in degrees per second.
    pub look_speed: f32,
    pub orbit_pitch: f32,
    pub aim_pitch: f32,
    /// Eye height above the airship in aim mode.
    pub aim_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pitch: 25.0,
            yaw: 180.0,
            distance: 1200.0,
            sensitivity: 0.1,
            look_speed: 80.0,
            orbit_pitch: 25.0,
            aim_pitch: -10.0,
            aim_height: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_scene() {
        let c = GameConfig::default();
        assert_eq!(c.houses.count, 8);
        assert_eq!(c.trees.count, 20);
        assert_eq!(c.sleds.count, 3);
        assert_eq!(c.lanterns.len(), 10);
        assert_eq!(c.packages.lifetime, 6.0);
        assert_eq!(c.airship.max_altitude, 1000.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let c = GameConfig::from_yaml_str("seed: 7\nhouses:\n  count: 2\n").unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.houses.count, 2);
        assert_eq!(c.houses.reward, 10);
        assert_eq!(c.sleds, SledConfig::default());
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zima.yaml");
        let mut original = GameConfig::default();
        original.packages.speed = 900.0;
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(original.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = GameConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::from_yaml_file(dir.path().join("none.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = GameConfig::from_yaml_str("houses: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(GameConfig::load(None).unwrap(), GameConfig::default());
    }
}
