//! A backend that remembers every call it receives.

use glam::Vec3;

use crate::camera::LookAt;
use crate::color::Color;
use crate::drawable::Material;
use crate::mesh::Topology;
use crate::render::{DepthFunc, Fog, LightParams, Projection, RenderBackend};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    ClearFrame(Color),
    SetProjection(Projection),
    SetView(LookAt),
    BeginPrimitive(Topology),
    EmitVertex(Vec3),
    EmitColor(Color),
    EndPrimitive,
    SetMaterial(Material),
    SetLight(usize, LightParams),
    EnableLighting,
    SetDepthTest(bool, DepthFunc),
    SetFog(Option<Fog>),
    PresentFrame,
    RequestRedraw,
}

/// Headless backend that records the command stream.
///
/// Useful for tests and for running a scene without a window:
///
/// ```
/// use diorama::render::{RecordingBackend, RenderBackend};
/// use diorama::{Drawable, Mesh, TransformStack, Vec3};
///
/// let cube = Drawable::new(Mesh::cuboid(Vec3::ONE));
/// let mut backend = RecordingBackend::new();
/// cube.draw(&mut TransformStack::new(), &mut backend, Vec3::ZERO);
///
/// assert_eq!(backend.primitive_count(), 12);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<RenderCommand>,
    aspect: Option<f32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `aspect` from [`RenderBackend::viewport_aspect`].
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = Some(aspect);
        self
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of completed begin/end primitive pairs.
    pub fn primitive_count(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::EndPrimitive))
    }

    /// Number of emitted vertices.
    pub fn vertex_count(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::EmitVertex(_)))
    }

    /// Number of presented frames.
    pub fn frame_count(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::PresentFrame))
    }

    pub fn redraw_requests(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::RequestRedraw))
    }

    /// Vertices of every recorded primitive, grouped per primitive.
    pub fn primitives(&self) -> Vec<(Topology, Vec<Vec3>)> {
        let mut out = Vec::new();
        let mut open: Option<(Topology, Vec<Vec3>)> = None;
        for command in &self.commands {
            match command {
                RenderCommand::BeginPrimitive(topology) => open = Some((*topology, Vec::new())),
                RenderCommand::EmitVertex(v) => {
                    if let Some((_, vertices)) = open.as_mut() {
                        vertices.push(*v);
                    }
                }
                RenderCommand::EndPrimitive => out.extend(open.take()),
                _ => {}
            }
        }
        out
    }

    fn count(&self, pred: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl RenderBackend for RecordingBackend {
    fn clear_frame(&mut self, color: Color) {
        self.commands.push(RenderCommand::ClearFrame(color));
    }

    fn set_projection(&mut self, projection: Projection) {
        self.commands.push(RenderCommand::SetProjection(projection));
    }

    fn set_view(&mut self, view: LookAt) {
        self.commands.push(RenderCommand::SetView(view));
    }

    fn begin_primitive(&mut self, topology: Topology) {
        self.commands.push(RenderCommand::BeginPrimitive(topology));
    }

    fn emit_vertex(&mut self, position: Vec3) {
        self.commands.push(RenderCommand::EmitVertex(position));
    }

    fn emit_color(&mut self, color: Color) {
        self.commands.push(RenderCommand::EmitColor(color));
    }

    fn end_primitive(&mut self) {
        self.commands.push(RenderCommand::EndPrimitive);
    }

    fn set_material(&mut self, material: Material) {
        self.commands.push(RenderCommand::SetMaterial(material));
    }

    fn set_light(&mut self, id: usize, light: LightParams) {
        self.commands.push(RenderCommand::SetLight(id, light));
    }

    fn enable_lighting(&mut self) {
        self.commands.push(RenderCommand::EnableLighting);
    }

    fn set_depth_test(&mut self, enabled: bool, func: DepthFunc) {
        self.commands.push(RenderCommand::SetDepthTest(enabled, func));
    }

    fn set_fog(&mut self, fog: Option<Fog>) {
        self.commands.push(RenderCommand::SetFog(fog));
    }

    fn present_frame(&mut self) {
        self.commands.push(RenderCommand::PresentFrame);
    }

    fn request_redraw(&mut self) {
        self.commands.push(RenderCommand::RequestRedraw);
    }

    fn viewport_aspect(&self) -> Option<f32> {
        self.aspect
    }
}
