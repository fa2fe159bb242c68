//! CPU-side assembly of immediate-mode primitives into GPU vertex lists.
//!
//! [`PrimitiveBatch`] turns the begin/emit/end call stream into two flat
//! lists: triangles (with a flat normal per face) and line segments. The
//! wgpu backend uploads both once per frame.

use glam::Vec3;

use crate::color::Color;
use crate::drawable::Material;
use crate::mesh::Topology;

/// Vertex format uploaded by the wgpu backend (56 bytes).
///
/// | Attribute | Format    | Offset | Shader Location |
/// |-----------|-----------|--------|-----------------|
/// | position  | Float32x3 | 0      | 0               |
/// | normal    | Float32x3 | 12     | 1               |
/// | color     | Float32x4 | 24     | 2               |
/// | specular  | Float32x4 | 40     | 3               |
///
/// `specular.w` carries the material shininess.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BatchVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub specular: [f32; 4],
}

impl BatchVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BatchVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            // specular + shininess
            wgpu::VertexAttribute {
                offset: 40,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

/// Accumulates primitives for one frame.
#[derive(Debug, Default)]
pub struct PrimitiveBatch {
    triangles: Vec<BatchVertex>,
    lines: Vec<BatchVertex>,
    material: Material,
    color: Option<Color>,
    open: Option<Topology>,
    pending: Vec<(Vec3, Color)>,
}

impl PrimitiveBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangle-list vertices, three per face.
    pub fn triangles(&self) -> &[BatchVertex] {
        &self.triangles
    }

    /// Line-list vertices, two per segment.
    pub fn lines(&self) -> &[BatchVertex] {
        &self.lines
    }

    /// Empties the batch for the next frame. Material and color state persist.
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
        self.pending.clear();
        self.open = None;
    }

    /// Sets the material for subsequent primitives and drops any explicit color.
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.color = None;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    pub fn begin(&mut self, topology: Topology) {
        if self.open.is_some() {
            log::warn!("begin_primitive while a primitive is open; discarding it");
        }
        self.open = Some(topology);
        self.pending.clear();
    }

    pub fn vertex(&mut self, position: Vec3) {
        let color = self.color.unwrap_or(self.material.diffuse);
        self.pending.push((position, color));
    }

    pub fn end(&mut self) {
        let Some(topology) = self.open.take() else {
            log::warn!("end_primitive without begin_primitive");
            return;
        };
        let pending = std::mem::take(&mut self.pending);

        match topology {
            Topology::Triangles => {
                for tri in pending.chunks_exact(3) {
                    self.push_triangle(tri[0], tri[1], tri[2]);
                }
            }
            Topology::Polygon => {
                for i in 1..pending.len().saturating_sub(1) {
                    self.push_triangle(pending[0], pending[i], pending[i + 1]);
                }
            }
            Topology::LineLoop => {
                if pending.len() >= 2 {
                    for i in 0..pending.len() {
                        let next = (i + 1) % pending.len();
                        self.push_line(pending[i], pending[next]);
                    }
                }
            }
        }

        // keep the allocation for the next primitive
        self.pending = pending;
        self.pending.clear();
    }

    fn push_triangle(&mut self, a: (Vec3, Color), b: (Vec3, Color), c: (Vec3, Color)) {
        let normal = (b.0 - a.0).cross(c.0 - a.0).normalize_or_zero();
        for (position, color) in [a, b, c] {
            let vertex = self.vertex_for(position, normal, color);
            self.triangles.push(vertex);
        }
    }

    fn push_line(&mut self, a: (Vec3, Color), b: (Vec3, Color)) {
        for (position, color) in [a, b] {
            let vertex = self.vertex_for(position, Vec3::ZERO, color);
            self.lines.push(vertex);
        }
    }

    fn vertex_for(&self, position: Vec3, normal: Vec3, color: Color) -> BatchVertex {
        let s = self.material.specular;
        BatchVertex {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
            specular: [s.r, s.g, s.b, self.material.shininess],
        }
    }
}
