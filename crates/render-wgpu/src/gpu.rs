use crate::camera::OrthoCamera;
use crate::error::RenderError;
use crate::mesh::{MeshKind, Vertex, shape_scale};
use crate::shaders;
use crate::texture::RampTexture;
use bytemuck::{Pod, Zeroable};
use campfire_fire::{FireBlend, FlameRamp, FireUniforms, fire_shader_source};
use campfire_scene::{Prop, Scene};
use glam::Mat4;
use std::collections::BTreeMap;
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Window surface plus the device that draws into it.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub backend: wgpu::Backend,
}

impl GpuContext {
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("campfire_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let backend = adapter.get_info().backend;
        tracing::info!(backend = backend.to_str(), ?format, "GPU initialized");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            backend,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.reconfigure();
    }

    /// Re-apply the current configuration (after a lost or outdated surface).
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// Frame-wide uniform block. Starts with the camera fields the fire program
/// reads at group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    ambient: [f32; 4],
    spot_position: [f32; 4],
    spot_direction: [f32; 4],
    spot_color: [f32; 4],
    spot_params: [f32; 4],
}

impl FrameUniforms {
    fn new(camera: &OrthoCamera, scene: &Scene) -> Self {
        let spot = &scene.spot;
        let ambient = scene.ambient.color * scene.ambient.intensity;
        let spot_color = spot.color * spot.intensity;
        let inner = spot.angle * (1.0 - spot.penumbra.clamp(0.0, 1.0));
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: ambient.extend(0.0).to_array(),
            spot_position: spot.node.world_position().extend(1.0).to_array(),
            spot_direction: spot.direction().extend(0.0).to_array(),
            spot_color: spot_color.extend(0.0).to_array(),
            spot_params: [spot.distance, spot.angle.cos(), inner.cos(), 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl InstanceData {
    fn from_prop(prop: &Prop) -> Self {
        let model = prop.node.world_matrix() * Mat4::from_scale(shape_scale(&prop.shape));
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: prop.material.base_color.extend(1.0).to_array(),
            emissive: prop.material.emission().extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct FireInstance {
    model: [[f32; 4]; 4],
}

/// Everything that forces the fire program to be recompiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FirePipelineKey {
    iterations: u32,
    octaves: u32,
    blend: FireBlend,
}

impl FirePipelineKey {
    fn of(scene: &Scene) -> Self {
        let params = scene.campfire.material.params();
        Self {
            iterations: params.iterations,
            octaves: params.octaves,
            blend: params.blend,
        }
    }
}

fn fire_blend_state(blend: FireBlend) -> wgpu::BlendState {
    match blend {
        FireBlend::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        FireBlend::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

/// Split instances sorted by mesh into one draw range per mesh.
fn batches(kinds: &[MeshKind]) -> Vec<(MeshKind, Range<u32>)> {
    let mut out: Vec<(MeshKind, Range<u32>)> = Vec::new();
    for (i, kind) in kinds.iter().enumerate() {
        let i = i as u32;
        match out.last_mut() {
            Some((last, range)) if *last == *kind => range.end = i + 1,
            _ => out.push((*kind, i..i + 1)),
        }
    }
    out
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, kind: MeshKind) -> Self {
        let (vertices, indices) = kind.build();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        tracing::debug!(?kind, vertices = vertices.len(), "built mesh");
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu renderer for the campfire scene.
pub struct CampfireRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    fire_pipeline: wgpu::RenderPipeline,
    fire_pipeline_layout: wgpu::PipelineLayout,
    fire_key: FirePipelineKey,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    fire_uniform_buffer: wgpu::Buffer,
    fire_bind_group: wgpu::BindGroup,
    fire_instance_buffer: wgpu::Buffer,
    meshes: BTreeMap<MeshKind, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl CampfireRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Self {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniform_buffer"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
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

        let fire_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fire_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let fire_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fire_uniform_buffer"),
            contents: bytemuck::bytes_of(scene.campfire.material.uniforms()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let ramp = RampTexture::new(device, queue, &FlameRamp::default());
        let fire_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fire_bind_group"),
            layout: &fire_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: fire_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&ramp.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&ramp.sampler),
                },
            ],
        });

        let opaque_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("opaque_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let fire_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fire_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &fire_layout],
            push_constant_ranges: &[],
        });

        let opaque_pipeline = Self::create_opaque_pipeline(device, &opaque_layout, surface_format);
        let fire_key = FirePipelineKey::of(scene);
        let fire_pipeline =
            Self::create_fire_pipeline(device, &fire_pipeline_layout, surface_format, fire_key);

        let max_instances = 256u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let fire_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fire_instance_buffer"),
            size: std::mem::size_of::<FireInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut meshes = BTreeMap::new();
        meshes.insert(MeshKind::Cube, GpuMesh::new(device, MeshKind::Cube));

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            opaque_pipeline,
            fire_pipeline,
            fire_pipeline_layout,
            fire_key,
            frame_buffer,
            frame_bind_group,
            fire_uniform_buffer,
            fire_bind_group,
            fire_instance_buffer,
            meshes,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: opaque props, then the campfire.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrthoCamera,
        scene: &Scene,
    ) {
        let key = FirePipelineKey::of(scene);
        if key != self.fire_key {
            tracing::info!(
                iterations = key.iterations,
                octaves = key.octaves,
                blend = ?key.blend,
                "rebuilding fire pipeline"
            );
            self.fire_pipeline = Self::create_fire_pipeline(
                device,
                &self.fire_pipeline_layout,
                self.surface_format,
                key,
            );
            self.fire_key = key;
        }

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::new(camera, scene)),
        );

        let mut props: Vec<(MeshKind, InstanceData)> = scene
            .opaque_props()
            .map(|p| (MeshKind::of(&p.shape), InstanceData::from_prop(p)))
            .collect();
        if props.len() > self.max_instances as usize {
            tracing::warn!(
                count = props.len(),
                max = self.max_instances,
                "too many props, dropping the rest"
            );
            props.truncate(self.max_instances as usize);
        }
        props.sort_by_key(|(kind, _)| *kind);

        for (kind, _) in &props {
            self.meshes
                .entry(*kind)
                .or_insert_with(|| GpuMesh::new(device, *kind));
        }

        let kinds: Vec<MeshKind> = props.iter().map(|(k, _)| *k).collect();
        let instances: Vec<InstanceData> = props.iter().map(|(_, d)| *d).collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        queue.write_buffer(
            &self.fire_uniform_buffer,
            0,
            bytemuck::bytes_of::<FireUniforms>(scene.campfire.material.uniforms()),
        );
        queue.write_buffer(
            &self.fire_instance_buffer,
            0,
            bytemuck::bytes_of(&FireInstance {
                model: scene.campfire.node.world_matrix().to_cols_array_2d(),
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.04,
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

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            // Opaque props
            if !instances.is_empty() {
                pass.set_pipeline(&self.opaque_pipeline);
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                for (kind, range) in batches(&kinds) {
                    let Some(mesh) = self.meshes.get(&kind) else {
                        continue;
                    };
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..mesh.index_count, 0, range);
                }
            }

            // Campfire, after everything opaque
            if let Some(cube) = self.meshes.get(&MeshKind::Cube) {
                pass.set_pipeline(&self.fire_pipeline);
                pass.set_bind_group(1, &self.fire_bind_group, &[]);
                pass.set_vertex_buffer(0, cube.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.fire_instance_buffer.slice(..));
                pass.set_index_buffer(cube.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..cube.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    fn create_opaque_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("opaque_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    Self::mesh_vertex_layout(),
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
        })
    }

    fn create_fire_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
        key: FirePipelineKey,
    ) -> wgpu::RenderPipeline {
        let source = fire_shader_source(key.iterations, key.octaves);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fire_shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fire_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fire"),
                compilation_options: Default::default(),
                buffers: &[
                    Self::mesh_vertex_layout(),
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<FireInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_fire"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(fire_blend_state(key.blend)),
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
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
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
    use campfire_fire::{FireMaterial, FireParams};
    use glam::Vec3;

    fn scene() -> Scene {
        Scene::with_fire(FireMaterial::with_seed(FireParams::default(), 2.0))
    }

    #[test]
    fn frame_block_starts_with_camera_fields() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 160);
        assert_eq!(std::mem::offset_of!(FrameUniforms, view_proj), 0);
        assert_eq!(std::mem::offset_of!(FrameUniforms, camera_position), 64);
    }

    #[test]
    fn frame_uniforms_from_scene() {
        let mut s = scene();
        s.ambient.intensity = 0.05;
        let f = FrameUniforms::new(&OrthoCamera::default(), &s);
        assert_eq!(f.camera_position, [0.0, 0.0, 100.0, 1.0]);
        assert_eq!(f.ambient, [0.05, 0.05, 0.05, 0.0]);
        assert_eq!(f.spot_position, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(f.spot_direction, [0.0, 0.0, -1.0, 0.0]);
        assert_eq!(f.spot_params[0], 7.0);
        assert!((f.spot_params[1] - 1.0_f32.cos()).abs() < 1e-6);
        // Full penumbra: the soft edge reaches the cone axis.
        assert_eq!(f.spot_params[2], 1.0);
    }

    #[test]
    fn instance_folds_cylinder_size_into_model() {
        let s = scene();
        let prism = s.find_prop("prism").unwrap();
        let data = InstanceData::from_prop(prism);
        let model = Mat4::from_cols_array_2d(&[data.model_0, data.model_1, data.model_2, data.model_3]);
        let expected = prism.node.world_matrix() * Mat4::from_scale(Vec3::new(0.25, 0.1, 0.25));
        assert!(model.abs_diff_eq(expected, 1e-6));
        assert_eq!(data.emissive, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(data.color[3], 1.0);
    }

    #[test]
    fn instance_carries_emission() {
        let mut s = scene();
        s.prism.material.emissive_intensity = 2.0;
        let data = InstanceData::from_prop(&s.prism);
        assert_eq!(data.emissive, [2.0, 1.7, 1.2, 0.0]);
    }

    #[test]
    fn batches_group_consecutive_meshes() {
        let kinds = [
            MeshKind::Cube,
            MeshKind::Quad,
            MeshKind::Cylinder(30),
            MeshKind::Cylinder(30),
            MeshKind::Cylinder(32),
        ];
        let b = batches(&kinds);
        assert_eq!(
            b,
            vec![
                (MeshKind::Cube, 0..1),
                (MeshKind::Quad, 1..2),
                (MeshKind::Cylinder(30), 2..4),
                (MeshKind::Cylinder(32), 4..5),
            ]
        );
        assert!(batches(&[]).is_empty());
    }

    #[test]
    fn pipeline_key_tracks_shader_constants() {
        let mut s = scene();
        let before = FirePipelineKey::of(&s);
        s.campfire.material.set_params(FireParams {
            magnitude: 3.0,
            ..FireParams::default()
        });
        assert_eq!(FirePipelineKey::of(&s), before);
        s.campfire.material.set_params(FireParams {
            octaves: 5,
            ..FireParams::default()
        });
        assert_ne!(FirePipelineKey::of(&s), before);
    }

    #[test]
    fn blend_modes() {
        assert_eq!(fire_blend_state(FireBlend::Alpha), wgpu::BlendState::ALPHA_BLENDING);
        let add = fire_blend_state(FireBlend::Additive);
        assert_eq!(add.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(add.color.src_factor, wgpu::BlendFactor::SrcAlpha);
    }
}
