use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;
use zima_assets::TextureData;
use zima_common::{Mesh, Vertex};
use zima_render::{
    CLEAR_COLOR, DrawCommand, DrawFlags, FramePlan, FrameUniforms, MAX_LANTERNS, ResourceUploader,
    Scene, SceneObjectDesc, SceneObjectId, TextureRole,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_DRAW_CAPACITY: u32 = 64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameRaw {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_dir: [f32; 4],
    spot_pos: [f32; 4],
    spot_dir: [f32; 4],
    lanterns: [[f32; 4]; MAX_LANTERNS],
    params: [f32; 4],
}

impl FrameRaw {
    fn from_uniforms(u: &FrameUniforms) -> Self {
        let mut lanterns = [[0.0; 4]; MAX_LANTERNS];
        for (slot, pos) in lanterns.iter_mut().zip(&u.lanterns) {
            *slot = pos.extend(1.0).to_array();
        }
        let spot_on = if u.spotlight.enabled { 1.0 } else { 0.0 };
        Self {
            view_proj: u.view_projection().to_cols_array_2d(),
            eye: u.eye.extend(1.0).to_array(),
            light_dir: u.light_dir.extend(0.0).to_array(),
            spot_pos: u.spotlight.position.extend(spot_on).to_array(),
            spot_dir: u.spotlight.direction.extend(0.0).to_array(),
            lanterns,
            params: [
                u.time,
                u.lanterns.len().min(MAX_LANTERNS) as f32,
                0.0,
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ObjectRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    flags: [f32; 4],
}

impl ObjectRaw {
    fn from_draw(draw: &DrawCommand) -> Self {
        Self {
            model: draw.model.to_cols_array_2d(),
            color: draw.color.extend(1.0).to_array(),
            flags: flag_vector(draw.flags),
        }
    }
}

fn flag_vector(flags: DrawFlags) -> [f32; 4] {
    let f = |on: bool| if on { 1.0 } else { 0.0 };
    [
        f(flags.instanced),
        f(flags.cloud),
        f(flags.textured),
        f(flags.normal_mapped),
    ]
}

/// Vertex and instance buffers for one scene object.
#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub instance_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, label: &str, mesh: &Mesh, instances: &[Vec3]) -> Self {
        let offsets: Vec<[f32; 3]> = instances.iter().map(|v| v.to_array()).collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_instances")),
            contents: bytemuck::cast_slice(&offsets),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            instance_buffer,
            vertex_count: mesh.vertex_count() as u32,
            instance_count: offsets.len() as u32,
        }
    }
}

/// A sampled 2D texture.
#[derive(Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    pub fn from_texels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        texels: &TextureData,
        role: TextureRole,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: texels.width,
            height: texels.height,
            depth_or_array_layers: 1,
        };
        let format = match role {
            TextureRole::Diffuse => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureRole::NormalMap => wgpu::TextureFormat::Rgba8Unorm,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &texels.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(texels.bytes_per_row()),
                rows_per_image: Some(texels.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Uploads scene objects straight to the device.
pub struct WgpuUploader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> WgpuUploader<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl ResourceUploader for WgpuUploader<'_> {
    type Mesh = GpuMesh;
    type Texture = GpuTexture;

    fn upload_mesh(&mut self, id: SceneObjectId, mesh: &Mesh, instances: &[Vec3]) -> GpuMesh {
        GpuMesh::new(self.device, id.name(), mesh, instances)
    }

    fn upload_texture(
        &mut self,
        label: &str,
        texels: &TextureData,
        role: TextureRole,
    ) -> GpuTexture {
        GpuTexture::from_texels(self.device, self.queue, label, texels, role)
    }
}

/// wgpu renderer for the winter scene.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_capacity: u32,
    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    flat_normal: GpuTexture,
    scene: Option<Scene<GpuMesh, GpuTexture>>,
    materials: BTreeMap<SceneObjectId, wgpu::BindGroup>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameRaw>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectRaw>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let object_stride = (std::mem::size_of::<ObjectRaw>() as u64).div_ceil(align) * align;
        let (object_buffer, object_bind_group) = Self::create_object_buffer(
            device,
            &object_layout,
            object_stride,
            INITIAL_DRAW_CAPACITY,
        );

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                Self::texture_entry(0),
                Self::texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white = GpuTexture::from_texels(
            device,
            queue,
            "white",
            &TextureData::white(),
            TextureRole::Diffuse,
        );
        let flat_normal = GpuTexture::from_texels(
            device,
            queue,
            "flat_normal",
            &TextureData::flat_normal(),
            TextureRole::NormalMap,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                            2 => Float32x3,
                            3 => Float32x3,
                            4 => Float32,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![5 => Float32x3],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_capacity: INITIAL_DRAW_CAPACITY,
            material_layout,
            sampler,
            white,
            flat_normal,
            scene: None,
            materials: BTreeMap::new(),
            depth_texture,
            surface_format,
        }
    }

    /// Load and upload the scene objects. Replaces any previous scene.
    pub fn load_scene(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        descs: &[SceneObjectDesc],
    ) {
        let mut uploader = WgpuUploader::new(device, queue);
        let scene = Scene::build(&mut uploader, descs);

        self.materials.clear();
        for (id, object) in scene.iter() {
            let diffuse = object.texture.as_ref().unwrap_or(&self.white);
            let normal = object.normal_map.as_ref().unwrap_or(&self.flat_normal);
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(id.name()),
                layout: &self.material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&diffuse.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&normal.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });
            self.materials.insert(id, bind_group);
        }
        tracing::info!(objects = scene.len(), "scene loaded");
        self.scene = Some(scene);
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame plan into `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameRaw::from_uniforms(&plan.uniforms)),
        );

        self.ensure_draw_capacity(device, plan.draws.len() as u32);
        let stride = self.object_stride as usize;
        let mut objects = vec![0u8; stride * plan.draws.len()];
        for (i, draw) in plan.draws.iter().enumerate() {
            let raw = ObjectRaw::from_draw(draw);
            let start = i * stride;
            objects[start..start + std::mem::size_of::<ObjectRaw>()]
                .copy_from_slice(bytemuck::bytes_of(&raw));
        }
        if !objects.is_empty() {
            queue.write_buffer(&self.object_buffer, 0, &objects);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR.x as f64,
                            g: CLEAR_COLOR.y as f64,
                            b: CLEAR_COLOR.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some(scene) = &self.scene {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);

                for (i, draw) in plan.draws.iter().enumerate() {
                    let (Some(object), Some(material)) =
                        (scene.get(draw.object), self.materials.get(&draw.object))
                    else {
                        continue;
                    };
                    let offset = (i as u64 * self.object_stride) as u32;
                    pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                    pass.set_bind_group(2, material, &[]);
                    pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                    pass.set_vertex_buffer(1, object.mesh.instance_buffer.slice(..));
                    let instances = draw.instances.min(object.mesh.instance_count);
                    pass.draw(0..object.mesh.vertex_count, 0..instances);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn ensure_draw_capacity(&mut self, device: &wgpu::Device, draws: u32) {
        if draws <= self.object_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_object_buffer(device, &self.object_layout, self.object_stride, capacity);
        tracing::debug!(capacity, "object uniform buffer grown");
        self.object_buffer = buffer;
        self.object_bind_group = bind_group;
        self.object_capacity = capacity;
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectRaw>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zima_kernel::World;
    use zima_render::plan_frame;

    #[test]
    fn uniform_layouts_match_wgsl() {
        // WGSL sizes: Frame = 64 + 4*16 + 10*16 + 16, Object = 64 + 2*16.
        assert_eq!(std::mem::size_of::<FrameRaw>(), 304);
        assert_eq!(std::mem::size_of::<ObjectRaw>(), 96);
        assert_eq!(std::mem::size_of::<Vertex>(), 48);
    }

    #[test]
    fn frame_packing_carries_lanterns_and_spotlight() {
        let world = World::default();
        let plan = plan_frame(&world, 1.0);
        let raw = FrameRaw::from_uniforms(&plan.uniforms);
        assert_eq!(raw.params[1], 10.0);
        assert_eq!(raw.spot_pos[3], 0.0);
        assert_eq!(raw.lanterns[0][..3], world.lanterns()[0].to_array());
    }

    #[test]
    fn draw_flags_pack_in_shader_order() {
        let flags = DrawFlags {
            instanced: true,
            normal_mapped: true,
            ..DrawFlags::default()
        };
        assert_eq!(flag_vector(flags), [1.0, 0.0, 0.0, 1.0]);
    }
}
