//! Drawable objects: a mesh, an optional material, and the draw routine.

use glam::Vec3;

use crate::color::Color;
use crate::mesh::Mesh;
use crate::render::RenderBackend;
use crate::transform::{Transform, TransformStack};

/// Surface reflectance uploaded before an object's primitives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Specular exponent, `0..=128`.
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::matte(Color::rgb(0.8, 0.8, 0.8))
    }
}

impl Material {
    /// Diffuse-only surface whose ambient term is a darker shade of `color`.
    pub fn matte(color: Color) -> Self {
        Self {
            ambient: Color::rgba(color.r * 0.25, color.g * 0.25, color.b * 0.25, color.a),
            diffuse: color,
            specular: Color::BLACK,
            shininess: 0.0,
        }
    }

    /// Surface with a white highlight.
    pub fn shiny(color: Color, shininess: f32) -> Self {
        Self {
            specular: Color::WHITE,
            shininess: shininess.clamp(0.0, 128.0),
            ..Self::matte(color)
        }
    }
}

/// An immutable mesh that knows how to submit itself to a backend.
///
/// ```
/// use diorama::render::RecordingBackend;
/// use diorama::{Color, Drawable, Material, Mesh, TransformStack, Vec3};
///
/// let chimney = Drawable::new(Mesh::cuboid(Vec3::new(0.5, 1.5, 0.5)))
///     .with_material(Material::matte(Color::BRICK));
///
/// let mut stack = TransformStack::new();
/// let mut backend = RecordingBackend::new();
/// chimney.draw(&mut stack, &mut backend, Vec3::new(1.0, 3.0, 0.5));
/// assert_eq!(stack.depth(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Drawable {
    mesh: Mesh,
    material: Option<Material>,
}

impl Drawable {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            material: None,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn material(&self) -> Option<Material> {
        self.material
    }

    /// Draws the mesh translated to `position`.
    pub fn draw(&self, stack: &mut TransformStack, backend: &mut impl RenderBackend, position: Vec3) {
        self.draw_with(stack, backend, Transform::from_position(position));
    }

    /// Draws the mesh under an arbitrary transform.
    ///
    /// Emits one begin/end pair per polygon, in mesh order, with the polygon's
    /// indices emitted in order. Vertices reach the backend in world space.
    pub fn draw_with(
        &self,
        stack: &mut TransformStack,
        backend: &mut impl RenderBackend,
        transform: Transform,
    ) {
        let scope = stack.scope(transform);
        let matrix = scope.current();

        if let Some(material) = self.material {
            backend.set_material(material);
        }

        let vertices = self.mesh.vertices();
        let colors = self.mesh.colors();
        for polygon in self.mesh.polygons() {
            backend.begin_primitive(self.mesh.topology());
            for &index in polygon {
                let index = index as usize;
                if let Some(colors) = colors {
                    backend.emit_color(colors[index]);
                }
                backend.emit_vertex(matrix.transform_point3(vertices[index]));
            }
            backend.end_primitive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Topology;
    use crate::render::{RecordingBackend, RenderCommand};

    fn strip() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(-1.0, 2.0, 1.0),
                Vec3::new(-1.0, 0.0, 2.0),
                Vec3::new(-1.0, 2.0, 2.0),
            ],
            vec![vec![2, 1, 0], vec![2, 3, 1], vec![0, 1, 3, 2]],
            Topology::Polygon,
        )
        .unwrap()
    }

    #[test]
    fn one_primitive_per_polygon_in_mesh_order() {
        let mesh = strip();
        let drawable = Drawable::new(mesh.clone());
        let mut backend = RecordingBackend::new();
        drawable.draw(&mut TransformStack::new(), &mut backend, Vec3::ZERO);

        let primitives = backend.primitives();
        assert_eq!(primitives.len(), mesh.polygon_count());
        for ((topology, emitted), polygon) in primitives.iter().zip(mesh.polygons()) {
            assert_eq!(*topology, Topology::Polygon);
            assert_eq!(emitted.len(), polygon.len());
            let expected: Vec<Vec3> = polygon
                .iter()
                .map(|&i| mesh.vertices()[i as usize])
                .collect();
            assert_eq!(emitted, &expected);
        }
    }

    #[test]
    fn vertices_are_translated_and_stack_is_restored() {
        let drawable = Drawable::new(strip());
        let mut stack = TransformStack::new();
        let mut backend = RecordingBackend::new();

        drawable.draw(&mut stack, &mut backend, Vec3::new(10.0, 0.0, -1.0));

        assert_eq!(stack.depth(), 0);
        let first = backend.primitives()[0].1[0];
        assert_eq!(first, Vec3::new(9.0, 0.0, 1.0));
    }

    #[test]
    fn nested_draw_composes_parent_scope() {
        let drawable = Drawable::new(Mesh::outline(vec![Vec3::ZERO, Vec3::X]));
        let mut stack = TransformStack::new();
        let mut backend = RecordingBackend::new();

        {
            let mut parent = stack.scope(Vec3::new(0.0, 5.0, 0.0));
            drawable.draw(&mut parent, &mut backend, Vec3::new(1.0, 0.0, 0.0));
        }

        assert_eq!(
            backend.primitives()[0].1,
            vec![Vec3::new(1.0, 5.0, 0.0), Vec3::new(2.0, 5.0, 0.0)]
        );
    }

    #[test]
    fn material_precedes_geometry_and_colors_precede_vertices() {
        let mesh = Mesh::from_triangles(vec![Vec3::ZERO, Vec3::X, Vec3::Y], &[[0, 1, 2]])
            .unwrap()
            .with_colors(vec![Color::BLACK, Color::WHITE, Color::GRASS])
            .unwrap();
        let material = Material::shiny(Color::ROCK, 300.0);
        let drawable = Drawable::new(mesh).with_material(material);
        let mut backend = RecordingBackend::new();
        drawable.draw(&mut TransformStack::new(), &mut backend, Vec3::ZERO);

        let commands = backend.commands();
        assert_eq!(commands[0], RenderCommand::SetMaterial(material));
        assert_eq!(material.shininess, 128.0);
        assert_eq!(commands[1], RenderCommand::BeginPrimitive(Topology::Triangles));
        assert_eq!(commands[2], RenderCommand::EmitColor(Color::BLACK));
        assert_eq!(commands[3], RenderCommand::EmitVertex(Vec3::ZERO));
        assert_eq!(commands.last(), Some(&RenderCommand::EndPrimitive));
    }
}
