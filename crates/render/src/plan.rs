use glam::{Mat4, Vec3};
use std::f32::consts::PI;
use zima_kernel::{CameraMode, Package, World};

pub const FOV_DEGREES: f32 = 45.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 15000.0;
/// The shader holds at most this many lantern lights.
pub const MAX_LANTERNS: usize = 10;
pub const CLEAR_COLOR: Vec3 = Vec3::new(0.05, 0.08, 0.12);

const SNOW_COLOR: Vec3 = Vec3::new(0.95, 0.97, 1.0);
const LANTERN_COLOR: Vec3 = Vec3::new(0.9, 0.9, 0.8);
const FOREST_COLOR: Vec3 = Vec3::new(0.3, 0.6, 0.2);
const SLED_COLORS: [Vec3; 3] = [
    Vec3::new(0.8, 0.2, 0.2),
    Vec3::new(0.2, 0.8, 0.2),
    Vec3::new(0.2, 0.2, 0.8),
];

/// Direction of the moonlight.
pub fn light_direction() -> Vec3 {
    Vec3::new(0.2, -0.4, 0.2).normalize()
}

/// The nine uploaded scene objects, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneObjectId {
    Terrain,
    SnowDisc,
    ChristmasTree,
    Lanterns,
    House,
    Forest,
    Package,
    Sled,
    Airship,
}

impl SceneObjectId {
    pub const ALL: [SceneObjectId; 9] = [
        SceneObjectId::Terrain,
        SceneObjectId::SnowDisc,
        SceneObjectId::ChristmasTree,
        SceneObjectId::Lanterns,
        SceneObjectId::House,
        SceneObjectId::Forest,
        SceneObjectId::Package,
        SceneObjectId::Sled,
        SceneObjectId::Airship,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneObjectId::Terrain => "terrain",
            SceneObjectId::SnowDisc => "snow",
            SceneObjectId::ChristmasTree => "christmas_tree",
            SceneObjectId::Lanterns => "lanterns",
            SceneObjectId::House => "house",
            SceneObjectId::Forest => "forest",
            SceneObjectId::Package => "package",
            SceneObjectId::Sled => "sled",
            SceneObjectId::Airship => "airship",
        }
    }
}

impl std::fmt::Display for SceneObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-draw shader switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawFlags {
    /// Offset each instance by its uploaded instance position.
    pub instanced: bool,
    /// Sway instances and pulse them like drifting clouds.
    pub cloud: bool,
    /// Sample the diffuse texture instead of the base colour.
    pub textured: bool,
    /// Perturb normals with the bound normal map.
    pub normal_mapped: bool,
}

impl DrawFlags {
    pub fn textured() -> Self {
        Self {
            textured: true,
            ..Self::default()
        }
    }

    pub fn instanced() -> Self {
        Self {
            instanced: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    pub position: Vec3,
    pub direction: Vec3,
    pub enabled: bool,
}

/// Values shared by every draw in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub eye: Vec3,
    pub time: f32,
    pub light_dir: Vec3,
    pub lanterns: Vec<Vec3>,
    pub spotlight: Spotlight,
}

impl FrameUniforms {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One draw call against an uploaded scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub object: SceneObjectId,
    pub model: Mat4,
    pub color: Vec3,
    pub instances: u32,
    pub flags: DrawFlags,
}

impl DrawCommand {
    fn single(object: SceneObjectId, model: Mat4, color: Vec3, flags: DrawFlags) -> Self {
        Self {
            object,
            model,
            color,
            instances: 1,
            flags,
        }
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub uniforms: FrameUniforms,
    pub draws: Vec<DrawCommand>,
}

impl FramePlan {
    pub fn draws_of(&self, object: SceneObjectId) -> impl Iterator<Item = &DrawCommand> {
        self.draws.iter().filter(move |d| d.object == object)
    }

    pub fn count(&self, object: SceneObjectId) -> usize {
        self.draws_of(object).count()
    }
}

/// Build the frame plan for the current world state.
pub fn plan_frame(world: &World, aspect: f32) -> FramePlan {
    let camera = world.camera();
    let mode = world.camera_mode();
    let subject = world.airship().position;
    let time = world.game_time();

    let uniforms = FrameUniforms {
        projection: Mat4::perspective_rh(
            FOV_DEGREES.to_radians(),
            aspect.max(f32::EPSILON),
            NEAR_PLANE,
            FAR_PLANE,
        ),
        view: camera.view(mode, subject),
        eye: camera.eye(mode, subject),
        time,
        light_dir: light_direction(),
        lanterns: world.lanterns().iter().take(MAX_LANTERNS).copied().collect(),
        spotlight: Spotlight {
            position: subject,
            direction: world.aim_direction(),
            enabled: world.spotlight_on(),
        },
    };

    let mut draws = Vec::with_capacity(
        6 + world.houses().len() + world.packages().len() + world.sleds().len(),
    );

    draws.push(DrawCommand::single(
        SceneObjectId::Terrain,
        Mat4::IDENTITY,
        Vec3::ONE,
        DrawFlags::textured(),
    ));
    draws.push(DrawCommand::single(
        SceneObjectId::SnowDisc,
        Mat4::IDENTITY,
        SNOW_COLOR,
        DrawFlags::default(),
    ));
    draws.push(DrawCommand::single(
        SceneObjectId::ChristmasTree,
        Mat4::from_translation(Vec3::new(0.0, 0.0, 200.0))
            * Mat4::from_rotation_y(PI)
            * Mat4::from_scale(Vec3::splat(400.0)),
        Vec3::ONE,
        DrawFlags::textured(),
    ));
    draws.push(DrawCommand {
        object: SceneObjectId::Lanterns,
        model: Mat4::IDENTITY,
        color: LANTERN_COLOR,
        instances: world.lanterns().len() as u32,
        flags: DrawFlags::instanced(),
    });

    for house in world.houses() {
        draws.push(DrawCommand::single(
            SceneObjectId::House,
            Mat4::from_translation(house.position) * Mat4::from_scale(Vec3::splat(30.0)),
            house.display_color(),
            DrawFlags::default(),
        ));
    }

    draws.push(DrawCommand {
        object: SceneObjectId::Forest,
        model: Mat4::IDENTITY,
        color: FOREST_COLOR,
        instances: world.trees().len() as u32,
        flags: DrawFlags::instanced(),
    });

    let pulse = Package::pulse(time);
    for package in world.packages() {
        draws.push(DrawCommand::single(
            SceneObjectId::Package,
            Mat4::from_translation(package.position) * Mat4::from_scale(Vec3::splat(6.0)),
            package.color * pulse,
            DrawFlags::default(),
        ));
    }

    for (i, sled) in world.sleds().iter().enumerate() {
        draws.push(DrawCommand::single(
            SceneObjectId::Sled,
            Mat4::from_translation(sled.position)
                * Mat4::from_rotation_y(sled.heading())
                * Mat4::from_rotation_z(sled.rock(time))
                * Mat4::from_scale(Vec3::splat(2.0)),
            SLED_COLORS[i % SLED_COLORS.len()],
            DrawFlags::default(),
        ));
    }

    // From the aim eye the hull would fill the screen.
    if mode == CameraMode::Orbit {
        draws.push(DrawCommand::single(
            SceneObjectId::Airship,
            Mat4::from_translation(subject)
                * Mat4::from_rotation_y(camera.yaw.to_radians())
                * Mat4::from_rotation_y(PI)
                * Mat4::from_scale(Vec3::splat(2.0)),
            Vec3::ONE,
            DrawFlags {
                textured: true,
                normal_mapped: true,
                ..DrawFlags::default()
            },
        ));
    }

    FramePlan { uniforms, draws }
}
