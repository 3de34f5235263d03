use crate::{LoadError, obj};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;
use zima_common::Mesh;
use zima_geometry::{
    LanternParams, SnowCircleParams, SphereParams, TerrainParams, TreeParams, house, lantern,
    sled, snow_circle, sphere, terrain, tree, unit_cube,
};

/// Where a scene object's mesh comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshSource {
    Terrain(TerrainParams),
    House,
    Tree(TreeParams),
    Lantern(LanternParams),
    Sphere(SphereParams),
    Sled,
    SnowCircle(SnowCircleParams),
    UnitCube,
    /// External OBJ model.
    File(PathBuf),
}

impl MeshSource {
    /// Build or load the mesh. Only `File` can fail.
    pub fn load(&self) -> Result<Mesh, LoadError> {
        let mesh = match self {
            MeshSource::Terrain(p) => terrain(p),
            MeshSource::House => house(),
            MeshSource::Tree(p) => tree(p),
            MeshSource::Lantern(p) => lantern(p),
            MeshSource::Sphere(p) => sphere(p),
            MeshSource::Sled => sled(),
            MeshSource::SnowCircle(p) => snow_circle(p),
            MeshSource::UnitCube => unit_cube(),
            MeshSource::File(path) => obj::load_obj(path)?,
        };
        Ok(mesh)
    }

    /// Load, or log and build `fallback` instead. A failing fallback
    /// degrades to the unit cube.
    pub fn load_or(&self, fallback: &MeshSource) -> Mesh {
        match self.load() {
            Ok(mesh) => mesh,
            Err(e) => {
                tracing::warn!("mesh {} unavailable ({}); using {}", self, e, fallback);
                fallback.load().unwrap_or_else(|e| {
                    tracing::warn!("fallback mesh {fallback} unavailable ({e}); using unit cube");
                    unit_cube()
                })
            }
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, MeshSource::File(_))
    }
}

impl std::fmt::Display for MeshSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshSource::Terrain(_) => write!(f, "terrain"),
            MeshSource::House => write!(f, "house"),
            MeshSource::Tree(_) => write!(f, "tree"),
            MeshSource::Lantern(_) => write!(f, "lantern"),
            MeshSource::Sphere(_) => write!(f, "sphere"),
            MeshSource::Sled => write!(f, "sled"),
            MeshSource::SnowCircle(_) => write!(f, "snow"),
            MeshSource::UnitCube => write!(f, "cube"),
            MeshSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Built-in names select a generator with default parameters; anything
/// else is taken as a model path.
impl FromStr for MeshSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "terrain" => MeshSource::Terrain(TerrainParams::default()),
            "house" => MeshSource::House,
            "tree" => MeshSource::Tree(TreeParams::default()),
            "lantern" => MeshSource::Lantern(LanternParams::default()),
            "sphere" => MeshSource::Sphere(SphereParams::default()),
            "sled" => MeshSource::Sled,
            "snow" => MeshSource::SnowCircle(SnowCircleParams::default()),
            "cube" => MeshSource::UnitCube,
            path => MeshSource::File(PathBuf::from(path)),
        })
    }
}
