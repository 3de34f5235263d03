use crate::plan::SceneObjectId;
use glam::Vec3;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use zima_assets::{MeshSource, TextureData};
use zima_common::{Mesh, VertexKind};
use zima_geometry::SphereParams;
use zima_kernel::World;

/// How texel data should be interpreted on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRole {
    /// Colour data, sampled as sRGB.
    Diffuse,
    /// Tangent-space normals, sampled linearly.
    NormalMap,
}

/// What to load for one scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObjectDesc {
    pub id: SceneObjectId,
    pub source: MeshSource,
    /// Used when `source` cannot be loaded.
    pub fallback: MeshSource,
    pub texture: Option<PathBuf>,
    pub normal_map: Option<PathBuf>,
    /// Per-instance offsets. Empty means a single instance at the origin.
    pub instances: Vec<Vec3>,
}

impl SceneObjectDesc {
    fn new(id: SceneObjectId, source: MeshSource) -> Self {
        Self {
            id,
            source,
            fallback: MeshSource::UnitCube,
            texture: None,
            normal_map: None,
            instances: Vec::new(),
        }
    }

    fn fallback(mut self, fallback: MeshSource) -> Self {
        self.fallback = fallback;
        self
    }

    fn texture(mut self, path: PathBuf) -> Self {
        self.texture = Some(path);
        self
    }

    fn normal_map(mut self, path: PathBuf) -> Self {
        self.normal_map = Some(path);
        self
    }

    fn instances(mut self, offsets: &[Vec3]) -> Self {
        self.instances = offsets.to_vec();
        self
    }
}

/// The nine scene objects, resolved against `asset_dir`.
pub fn scene_manifest(world: &World, asset_dir: &Path) -> Vec<SceneObjectDesc> {
    let asset = |name: &str| asset_dir.join(name);
    vec![
        SceneObjectDesc::new(SceneObjectId::Terrain, MeshSource::Terrain(Default::default()))
            .texture(asset("Field.png")),
        SceneObjectDesc::new(
            SceneObjectId::SnowDisc,
            MeshSource::SnowCircle(Default::default()),
        ),
        SceneObjectDesc::new(SceneObjectId::ChristmasTree, MeshSource::File(asset("ChrTree.obj")))
            .texture(asset("ChrTree.png")),
        SceneObjectDesc::new(SceneObjectId::Lanterns, MeshSource::Lantern(Default::default()))
            .instances(world.lanterns()),
        SceneObjectDesc::new(SceneObjectId::House, MeshSource::House),
        SceneObjectDesc::new(SceneObjectId::Forest, MeshSource::Tree(Default::default()))
            .instances(world.trees()),
        SceneObjectDesc::new(
            SceneObjectId::Package,
            MeshSource::Sphere(SphereParams::new(1.0, 12, 12, VertexKind::Glow)),
        ),
        SceneObjectDesc::new(SceneObjectId::Sled, MeshSource::File(asset("sled.obj")))
            .fallback(MeshSource::Sled),
        SceneObjectDesc::new(SceneObjectId::Airship, MeshSource::File(asset("shar.obj")))
            .texture(asset("shar.png"))
            .normal_map(asset("shar_displacement.png")),
    ]
}

/// Backend hook that turns CPU meshes and texels into GPU handles.
pub trait ResourceUploader {
    type Mesh;
    type Texture;

    /// Upload a triangle list together with its instance offsets.
    fn upload_mesh(&mut self, id: SceneObjectId, mesh: &Mesh, instances: &[Vec3]) -> Self::Mesh;

    fn upload_texture(
        &mut self,
        label: &str,
        texels: &TextureData,
        role: TextureRole,
    ) -> Self::Texture;
}

/// One uploaded scene object.
#[derive(Debug)]
pub struct SceneObject<M, T> {
    pub mesh: M,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub texture: Option<T>,
    pub normal_map: Option<T>,
}

/// Uploaded scene objects keyed by id. Resources live as long as the scene.
#[derive(Debug)]
pub struct Scene<M, T> {
    objects: BTreeMap<SceneObjectId, SceneObject<M, T>>,
}

impl<M, T> Scene<M, T> {
    /// Load every descriptor, falling back where sources are missing, and
    /// upload the results once.
    pub fn build<U>(uploader: &mut U, descs: &[SceneObjectDesc]) -> Self
    where
        U: ResourceUploader<Mesh = M, Texture = T>,
    {
        let mut objects = BTreeMap::new();
        for desc in descs {
            let mesh = desc.source.load_or(&desc.fallback);
            let instances: &[Vec3] = if desc.instances.is_empty() {
                &[Vec3::ZERO]
            } else {
                &desc.instances
            };

            let texture = desc.texture.as_ref().map(|path| {
                let texels = TextureData::load_or_white(path);
                uploader.upload_texture(desc.id.name(), &texels, TextureRole::Diffuse)
            });
            let normal_map = desc.normal_map.as_ref().map(|path| {
                let texels = match TextureData::load(path) {
                    Ok(t) => t,
                    Err(e) => {
                        tracing::warn!(
                            "normal map {} unavailable ({}); using flat normals",
                            path.display(),
                            e
                        );
                        TextureData::flat_normal()
                    }
                };
                uploader.upload_texture(desc.id.name(), &texels, TextureRole::NormalMap)
            });

            tracing::info!(
                object = %desc.id,
                vertices = mesh.vertex_count(),
                instances = instances.len(),
                "scene object uploaded"
            );

            objects.insert(
                desc.id,
                SceneObject {
                    mesh: uploader.upload_mesh(desc.id, &mesh, instances),
                    vertex_count: mesh.vertex_count() as u32,
                    instance_count: instances.len() as u32,
                    texture,
                    normal_map,
                },
            );
        }
        Self { objects }
    }

    pub fn get(&self, id: SceneObjectId) -> Option<&SceneObject<M, T>> {
        self.objects.get(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SceneObjectId, &SceneObject<M, T>)> {
        self.objects.iter().map(|(id, obj)| (*id, obj))
    }
}

/// Uploader that keeps CPU copies. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct HeadlessUploader {
    pub uploaded_bytes: usize,
}

impl ResourceUploader for HeadlessUploader {
    type Mesh = Mesh;
    type Texture = TextureData;

    fn upload_mesh(&mut self, _id: SceneObjectId, mesh: &Mesh, instances: &[Vec3]) -> Mesh {
        self.uploaded_bytes += std::mem::size_of_val(mesh.vertices.as_slice())
            + std::mem::size_of_val(instances);
        mesh.clone()
    }

    fn upload_texture(
        &mut self,
        _label: &str,
        texels: &TextureData,
        _role: TextureRole,
    ) -> TextureData {
        self.uploaded_bytes += texels.rgba.len();
        texels.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless_scene(dir: &Path) -> Scene<Mesh, TextureData> {
        let world = World::default();
        let mut uploader = HeadlessUploader::default();
        Scene::build(&mut uploader, &scene_manifest(&world, dir))
    }

    #[test]
    fn manifest_lists_every_object_once() {
        let world = World::default();
        let ids: Vec<SceneObjectId> = scene_manifest(&world, Path::new("assets"))
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, SceneObjectId::ALL.to_vec());
    }

    #[test]
    fn missing_assets_fall_back() {
        let scene = headless_scene(Path::new("/nonexistent/zima-assets"));
        assert_eq!(scene.len(), 9);

        // Unit cube stands in for the tree and the airship.
        assert_eq!(scene.get(SceneObjectId::ChristmasTree).unwrap().vertex_count, 36);
        assert_eq!(scene.get(SceneObjectId::Airship).unwrap().vertex_count, 36);

        // Generated sled replaces sled.obj.
        let sled = scene.get(SceneObjectId::Sled).unwrap();
        assert_eq!(sled.mesh, zima_geometry::sled());

        let airship = scene.get(SceneObjectId::Airship).unwrap();
        assert_eq!(airship.texture.as_ref().unwrap().rgba, vec![255; 4]);
        assert_eq!(
            airship.normal_map.as_ref().unwrap().rgba,
            TextureData::flat_normal().rgba
        );
    }

    #[test]
    fn instanced_objects_keep_offsets() {
        let scene = headless_scene(Path::new("/nonexistent"));
        assert_eq!(scene.get(SceneObjectId::Lanterns).unwrap().instance_count, 10);
        assert_eq!(scene.get(SceneObjectId::Forest).unwrap().instance_count, 20);
        assert_eq!(scene.get(SceneObjectId::House).unwrap().instance_count, 1);
    }

    #[test]
    fn package_is_glow_sphere() {
        let scene = headless_scene(Path::new("/nonexistent"));
        let pkg = scene.get(SceneObjectId::Package).unwrap();
        assert_eq!(pkg.vertex_count as usize, (2 * 12 * 12 - 2 * 12) * 3);
        assert!(pkg.mesh.vertices.iter().all(|v| v.vertex_kind() == VertexKind::Glow));
    }

    #[test]
    fn headless_uploader_counts_bytes() {
        let world = World::default();
        let mut uploader = HeadlessUploader::default();
        let _scene: Scene<Mesh, TextureData> =
            Scene::build(&mut uploader, &scene_manifest(&world, Path::new("/nonexistent")));
        assert!(uploader.uploaded_bytes > 0);
    }
}
