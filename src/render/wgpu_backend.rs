//! Renders the immediate-mode call stream with wgpu.
//!
//! Primitives are assembled on the CPU by a [`PrimitiveBatch`] while the
//! frame is being drawn. [`present_frame`](RenderBackend::present_frame)
//! uploads the triangles and lines, renders them in one pass with depth
//! testing, and presents the surface.
//!
//! Render state (view, projection, lights, depth, fog) is per frame: the last
//! value set before `present_frame` applies to everything drawn in the frame.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::LookAt;
use crate::color::Color;
use crate::drawable::Material;
use crate::error::AppError;
use crate::gpu::GpuContext;
use crate::mesh::Topology;
use crate::render::batch::{BatchVertex, PrimitiveBatch};
use crate::render::{
    DepthFunc, Fog, FogMode, LightParams, MAX_LIGHTS, Projection, RenderBackend,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct LightUniform {
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    position: [f32; 4],
}

impl From<LightParams> for LightUniform {
    fn from(light: LightParams) -> Self {
        Self {
            ambient: light.ambient.to_array(),
            diffuse: light.diffuse.to_array(),
            specular: light.specular.to_array(),
            position: light.position.to_array(),
        }
    }
}

/// Mirrors `Scene` in `shaders/scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    fog_color: [f32; 4],
    fog_params: [f32; 4],
    light_count: [u32; 4],
    lights: [LightUniform; MAX_LIGHTS],
}

fn fog_params(fog: Option<Fog>) -> ([f32; 4], [f32; 4]) {
    match fog {
        None => (Color::TRANSPARENT.to_array(), [0.0; 4]),
        Some(fog) => {
            let (mode, density) = match fog.mode {
                FogMode::Linear => (1.0, 0.0),
                FogMode::Exp(density) => (2.0, density),
                FogMode::Exp2(density) => (3.0, density),
            };
            (fog.color.to_array(), [mode, fog.start, fog.end, density])
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    lines: bool,
    depth: Option<DepthFunc>,
}

/// A [`RenderBackend`] that draws to a window surface.
pub struct WgpuBackend {
    window: Arc<Window>,
    gpu: GpuContext,
    batch: PrimitiveBatch,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    clear: Color,
    projection: Option<Projection>,
    view: Option<LookAt>,
    lights: [Option<LightParams>; MAX_LIGHTS],
    lighting: bool,
    depth: Option<DepthFunc>,
    fog: Option<Fog>,
}

impl WgpuBackend {
    /// Creates the GPU context for `window` and all pipeline resources.
    pub fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let gpu = GpuContext::new(window.clone())?;
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_view = create_depth_view(&gpu);
        let depth_size = (gpu.width(), gpu.height());

        Ok(Self {
            window,
            gpu,
            batch: PrimitiveBatch::new(),
            shader,
            pipeline_layout,
            pipelines: HashMap::new(),
            uniform_buffer,
            bind_group,
            depth_view,
            depth_size,
            clear: Color::BLACK,
            projection: None,
            view: None,
            lights: [None; MAX_LIGHTS],
            lighting: false,
            depth: Some(DepthFunc::Less),
            fog: None,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the surface and, lazily, the depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn ensure_depth_size(&mut self) {
        let size = (self.gpu.width(), self.gpu.height());
        if self.depth_size != size {
            self.depth_view = create_depth_view(&self.gpu);
            self.depth_size = size;
        }
    }

    fn pipeline(&mut self, key: PipelineKey) -> &wgpu::RenderPipeline {
        let Self {
            gpu,
            shader,
            pipeline_layout,
            pipelines,
            ..
        } = self;
        pipelines
            .entry(key)
            .or_insert_with(|| create_pipeline(gpu, shader, pipeline_layout, key))
    }

    fn uniforms(&self) -> SceneUniforms {
        let aspect = self.gpu.aspect();
        let proj = self
            .projection
            .map(|p| p.matrix())
            .unwrap_or_else(|| Mat4::perspective_rh(45f32.to_radians(), aspect, 1.0, 200.0));
        let view = self.view.map(|v| v.view_matrix()).unwrap_or(Mat4::IDENTITY);
        let eye = self.view.map(|v| v.eye).unwrap_or_default();

        let mut lights = [LightUniform::default(); MAX_LIGHTS];
        let mut count = 0;
        for light in self.lights.iter().flatten() {
            lights[count] = LightUniform::from(*light);
            count += 1;
        }

        let (fog_color, fog_params) = fog_params(self.fog);
        SceneUniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            eye: eye.extend(if self.lighting { 1.0 } else { 0.0 }).to_array(),
            fog_color,
            fog_params,
            light_count: [count as u32, 0, 0, 0],
            lights,
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ensure_depth_size();

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = self.uniforms();
        self.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let triangles = upload(&self.gpu, "Triangle Vertices", self.batch.triangles());
        let lines = upload(&self.gpu, "Line Vertices", self.batch.lines());

        // make sure both pipelines exist before the pass borrows them
        let depth = self.depth;
        let triangle_key = PipelineKey { lines: false, depth };
        let line_key = PipelineKey { lines: true, depth };
        self.pipeline(triangle_key);
        self.pipeline(line_key);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let c = self.clear;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.r as f64,
                            g: c.g as f64,
                            b: c.b as f64,
                            a: c.a as f64,
                        }),
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
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.bind_group, &[]);
            for (key, buffer, count) in [
                (triangle_key, &triangles, self.batch.triangles().len()),
                (line_key, &lines, self.batch.lines().len()),
            ] {
                let (Some(buffer), Some(pipeline)) = (buffer, self.pipelines.get(&key)) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..count as u32, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

fn upload(gpu: &GpuContext, label: &str, vertices: &[BatchVertex]) -> Option<wgpu::Buffer> {
    if vertices.is_empty() {
        return None;
    }
    Some(
        gpu.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
    )
}

fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: gpu.width(),
            height: gpu.height(),
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

fn create_pipeline(
    gpu: &GpuContext,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    key: PipelineKey,
) -> wgpu::RenderPipeline {
    log::debug!("creating pipeline {:?}", key);

    let (depth_write_enabled, depth_compare) = match key.depth {
        None => (false, wgpu::CompareFunction::Always),
        Some(DepthFunc::Less) => (true, wgpu::CompareFunction::Less),
        Some(DepthFunc::LessEqual) => (true, wgpu::CompareFunction::LessEqual),
        Some(DepthFunc::Always) => (true, wgpu::CompareFunction::Always),
    };
    let topology = if key.lines {
        wgpu::PrimitiveTopology::LineList
    } else {
        wgpu::PrimitiveTopology::TriangleList
    };

    gpu.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(if key.lines { "Line Pipeline" } else { "Triangle Pipeline" }),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs"),
                buffers: &[BatchVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            // no culling: terrain and panels are visible from both sides
            primitive: wgpu::PrimitiveState {
                topology,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

impl RenderBackend for WgpuBackend {
    fn clear_frame(&mut self, color: Color) {
        self.clear = color;
        self.batch.clear();
    }

    fn set_projection(&mut self, projection: Projection) {
        self.projection = Some(projection);
    }

    fn set_view(&mut self, view: LookAt) {
        self.view = Some(view);
    }

    fn begin_primitive(&mut self, topology: Topology) {
        self.batch.begin(topology);
    }

    fn emit_vertex(&mut self, position: glam::Vec3) {
        self.batch.vertex(position);
    }

    fn emit_color(&mut self, color: Color) {
        self.batch.set_color(color);
    }

    fn end_primitive(&mut self) {
        self.batch.end();
    }

    fn set_material(&mut self, material: Material) {
        self.batch.set_material(material);
    }

    fn set_light(&mut self, id: usize, light: LightParams) {
        match self.lights.get_mut(id) {
            Some(slot) => *slot = Some(light),
            None => log::warn!("light slot {} out of range, ignoring", id),
        }
    }

    fn enable_lighting(&mut self) {
        self.lighting = true;
    }

    fn set_depth_test(&mut self, enabled: bool, func: DepthFunc) {
        self.depth = enabled.then_some(func);
    }

    fn set_fog(&mut self, fog: Option<Fog>) {
        self.fog = fog;
    }

    fn present_frame(&mut self) {
        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(e) => log::warn!("dropped frame: {}", e),
        }
        self.batch.clear();
    }

    fn request_redraw(&mut self) {
        self.window.request_redraw();
    }

    fn viewport_aspect(&self) -> Option<f32> {
        Some(self.gpu.aspect())
    }
}
