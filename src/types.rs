use glam::{Mat4, Vec3};

/// Mesh vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera and light uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub ambient_intensity: f32,
    pub light_direction: [f32; 3],
    pub light_intensity: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, eye: Vec3, lighting: &Lighting) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.to_array(),
            ambient_intensity: lighting.ambient_intensity,
            light_direction: lighting.direction_to_light().to_array(),
            light_intensity: lighting.directional_intensity,
        }
    }
}

/// Per-draw data, one slot of the dynamic uniform buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// metalness, roughness, unlit flag, unused
    pub params: [f32; 4],
}

/// Ambient term plus one white directional light
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub directional_position: Vec3,
}

impl Lighting {
    pub fn direction_to_light(&self) -> Vec3 {
        self.directional_position.normalize_or_zero()
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.6,
            directional_intensity: 1.0,
            directional_position: Vec3::new(8.0, 10.0, 5.0),
        }
    }
}
