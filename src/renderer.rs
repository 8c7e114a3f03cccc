use std::collections::HashMap;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::core::GpuContext;
use crate::geometry::{GeometryHandle, GeometryId};
use crate::math::hex_to_linear;
use crate::scene::{Material, MaterialLibrary, SceneGraph};
use crate::types::{CameraUniform, DrawUniform, Lighting, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const BACKGROUND_COLOR: u32 = 0xf0f0f0;
const INITIAL_DRAW_CAPACITY: usize = 128;

/// Pipeline a material is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineKind {
    Opaque,
    OpaqueDoubleSided,
    Transparent,
}

impl PipelineKind {
    pub fn for_material(material: &Material) -> Self {
        if material.is_transparent() {
            PipelineKind::Transparent
        } else if material.double_sided {
            PipelineKind::OpaqueDoubleSided
        } else {
            PipelineKind::Opaque
        }
    }
}

/// One mesh ready to draw
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub geometry: GeometryHandle,
    pub kind: PipelineKind,
    pub uniform: DrawUniform,
    /// Distance from the eye, used to order transparent draws
    pub distance: f32,
}

/// Flattens the graph into draw order: opaque meshes in tree order, then
/// transparent meshes farthest first
pub fn plan_draws(graph: &SceneGraph, materials: &MaterialLibrary, eye: Vec3) -> Vec<DrawItem> {
    let mut items: Vec<DrawItem> = graph
        .mesh_instances()
        .into_iter()
        .filter_map(|instance| {
            let Some(material) = materials.get(instance.mesh.material) else {
                log::warn!("Node {:?} uses an unknown material, skipped", instance.node);
                return None;
            };
            Some(DrawItem {
                geometry: instance.mesh.geometry.clone(),
                kind: PipelineKind::for_material(material),
                uniform: draw_uniform(instance.world, material),
                distance: instance.world.transform_point3(Vec3::ZERO).distance(eye),
            })
        })
        .collect();

    // Stable sort keeps tree order among opaque draws
    items.sort_by(|a, b| {
        let a_transparent = a.kind == PipelineKind::Transparent;
        let b_transparent = b.kind == PipelineKind::Transparent;
        a_transparent.cmp(&b_transparent).then_with(|| {
            if a_transparent {
                b.distance.total_cmp(&a.distance)
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
    items
}

pub fn draw_uniform(world: Mat4, material: &Material) -> DrawUniform {
    DrawUniform {
        model: world.to_cols_array_2d(),
        normal_matrix: world.inverse().transpose().to_cols_array_2d(),
        color: material.linear_rgba(),
        params: [
            material.metalness,
            material.roughness,
            if material.unlit { 1.0 } else { 0.0 },
            0.0,
        ],
    }
}

/// Byte distance between draw slots in the dynamic uniform buffer
pub fn draw_stride(alignment: u32) -> u64 {
    let size = std::mem::size_of::<DrawUniform>() as u64;
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Forward renderer for the scene graph
pub struct MeshRenderer {
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_stride: u64,
    pipelines: HashMap<PipelineKind, wgpu::RenderPipeline>,
    depth_view: wgpu::TextureView,
    meshes: HashMap<GeometryId, GpuMesh>,
    lighting: Lighting,
    clear_color: wgpu::Color,
}

impl MeshRenderer {
    pub fn new(gpu: &GpuContext, lighting: Lighting) -> Self {
        let device = gpu.device();

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
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
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let stride = draw_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(device, &draw_layout, INITIAL_DRAW_CAPACITY, stride);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let pipelines = [
            PipelineKind::Opaque,
            PipelineKind::OpaqueDoubleSided,
            PipelineKind::Transparent,
        ]
        .into_iter()
        .map(|kind| {
            let pipeline = Self::create_pipeline(device, &pipeline_layout, &shader, gpu.surface_format(), kind);
            (kind, pipeline)
        })
        .collect();

        let (width, height) = gpu.size();
        let depth_view = Self::create_depth_view(device, width, height);
        let [r, g, b] = hex_to_linear(BACKGROUND_COLOR);

        Self {
            camera_buffer,
            camera_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            draw_stride: stride,
            pipelines,
            depth_view,
            meshes: HashMap::new(),
            lighting,
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
        }
    }

    /// Recreate the depth buffer for a new surface size
    pub fn resize(&mut self, gpu: &GpuContext) {
        let (width, height) = gpu.size();
        self.depth_view = Self::create_depth_view(gpu.device(), width, height);
    }

    /// Number of geometries with live GPU buffers
    pub fn cached_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Record the scene pass into `encoder`, clearing `view` first
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        graph: &SceneGraph,
        materials: &MaterialLibrary,
        camera: &OrbitCamera,
    ) {
        let draws = plan_draws(graph, materials, camera.eye());
        self.sync_meshes(gpu, &draws);
        self.upload_uniforms(gpu, camera, &draws);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        let mut bound: Option<PipelineKind> = None;
        for (slot, item) in draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(&item.geometry.id()) else {
                continue;
            };
            if bound != Some(item.kind) {
                if let Some(pipeline) = self.pipelines.get(&item.kind) {
                    pass.set_pipeline(pipeline);
                }
                bound = Some(item.kind);
            }
            let offset = slot as u64 * self.draw_stride;
            pass.set_bind_group(1, &self.draw_bind_group, &[offset as u32]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Upload new geometry and drop buffers nothing references any more
    fn sync_meshes(&mut self, gpu: &GpuContext, draws: &[DrawItem]) {
        for item in draws {
            let geometry = &item.geometry;
            if geometry.indices.is_empty() || self.meshes.contains_key(&geometry.id()) {
                continue;
            }
            let device = gpu.device();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertices"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Indices"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.insert(
                geometry.id(),
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: geometry.indices.len() as u32,
                },
            );
        }

        let before = self.meshes.len();
        self.meshes
            .retain(|id, _| draws.iter().any(|item| item.geometry.id() == *id));
        let released = before - self.meshes.len();
        if released > 0 {
            log::debug!("Released GPU buffers of {} geometries", released);
        }
    }

    fn upload_uniforms(&mut self, gpu: &GpuContext, camera: &OrbitCamera, draws: &[DrawItem]) {
        let queue = gpu.queue();
        let camera_uniform = camera.to_uniform(&self.lighting);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        if draws.len() > self.draw_capacity {
            let capacity = draws.len().next_power_of_two();
            let (buffer, bind_group) =
                Self::create_draw_buffer(gpu.device(), &self.draw_layout, capacity, self.draw_stride);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
            log::debug!("Draw buffer grown to {} slots", capacity);
        }

        let stride = self.draw_stride as usize;
        let mut staging = vec![0u8; draws.len() * stride];
        for (slot, item) in draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&item.uniform);
            staging[slot * stride..slot * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            queue.write_buffer(&self.draw_buffer, 0, &staging);
        }
    }

    fn create_draw_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Buffer"),
            size: capacity.max(1) as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        kind: PipelineKind,
    ) -> wgpu::RenderPipeline {
        let transparent = kind == PipelineKind::Transparent;
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(match kind {
                PipelineKind::Opaque => "Opaque Pipeline",
                PipelineKind::OpaqueDoubleSided => "Double Sided Pipeline",
                PipelineKind::Transparent => "Transparent Pipeline",
            }),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(if transparent {
                        wgpu::BlendState::ALPHA_BLENDING
                    } else {
                        wgpu::BlendState::REPLACE
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: match kind {
                    PipelineKind::Opaque => Some(wgpu::Face::Back),
                    _ => None,
                },
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: !transparent,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
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
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}
