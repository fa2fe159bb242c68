//! Immutable polygon meshes and the built-in primitives the demos use.
//!
//! A [`Mesh`] is a list of vertex positions plus a list of polygons, each
//! polygon being an ordered list of vertex indices. The [`Topology`] tag says
//! how the backend should interpret each polygon.
//!
//! # Creating Meshes
//!
//! ```
//! use diorama::{Mesh, Topology, Vec3};
//!
//! // Built-in primitives
//! let wall = Mesh::cuboid(Vec3::new(4.0, 3.0, 4.0));
//! let roof = Mesh::gable_roof(4.4, 1.5, 4.4);
//! let wheel = Mesh::wheel(0.35, 0.2, 12);
//!
//! // Literal geometry, validated at construction
//! let panel = Mesh::new(
//!     vec![
//!         Vec3::new(-1.0, 0.0, 1.0),
//!         Vec3::new(-1.0, 2.0, 1.0),
//!         Vec3::new(-1.0, 0.0, 2.0),
//!         Vec3::new(-1.0, 2.0, 2.0),
//!     ],
//!     vec![vec![2, 1, 0], vec![2, 3, 1]],
//!     Topology::Triangles,
//! )
//! .unwrap();
//! assert_eq!(panel.polygon_count(), 2);
//! ```
//!
//! # Winding Order
//!
//! Closed primitives use counter-clockwise winding seen from outside.
//! Backends are free to ignore winding; the bundled wgpu backend lights
//! both faces.

use glam::Vec3;

use crate::color::Color;
use crate::error::SceneError;

/// How the indices of one polygon are assembled into a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Filled triangles; each polygon holds a multiple of three indices.
    Triangles,
    /// A closed outline through every index of the polygon.
    LineLoop,
    /// A filled convex polygon.
    Polygon,
}

impl Topology {
    /// Whether a polygon of `len` indices is well formed: a multiple of three
    /// for triangles, at least two points for a loop, three for a polygon.
    pub fn accepts(self, len: usize) -> bool {
        match self {
            Topology::Triangles => len > 0 && len % 3 == 0,
            Topology::LineLoop => len >= 2,
            Topology::Polygon => len >= 3,
        }
    }
}

/// Validated, immutable polygon mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    polygons: Vec<Vec<u32>>,
    topology: Topology,
    colors: Option<Vec<Color>>,
}

impl Mesh {
    /// Creates a mesh, checking every polygon index against the vertex list.
    ///
    /// # Errors
    ///
    /// - [`SceneError::EmptyPolygon`] if a polygon has no indices
    /// - [`SceneError::InvalidPolygonArity`] if a polygon's length does not
    ///   fit `topology` (see [`Topology::accepts`])
    /// - [`SceneError::InvalidMeshIndex`] if an index is out of range
    pub fn new(
        vertices: Vec<Vec3>,
        polygons: Vec<Vec<u32>>,
        topology: Topology,
    ) -> Result<Self, SceneError> {
        for (polygon, indices) in polygons.iter().enumerate() {
            if indices.is_empty() {
                return Err(SceneError::EmptyPolygon { polygon });
            }
            if !topology.accepts(indices.len()) {
                return Err(SceneError::InvalidPolygonArity {
                    polygon,
                    len: indices.len(),
                    topology,
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(SceneError::InvalidMeshIndex {
                    polygon,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self {
            vertices,
            polygons,
            topology,
            colors: None,
        })
    }

    /// Creates a triangle mesh from index triples.
    pub fn from_triangles(vertices: Vec<Vec3>, triangles: &[[u32; 3]]) -> Result<Self, SceneError> {
        let polygons = triangles.iter().map(|t| t.to_vec()).collect();
        Self::new(vertices, polygons, Topology::Triangles)
    }

    /// Attaches one color per vertex.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self, SceneError> {
        if colors.len() != self.vertices.len() {
            return Err(SceneError::ColorCountMismatch {
                colors: colors.len(),
                vertices: self.vertices.len(),
            });
        }
        self.colors = Some(colors);
        Ok(self)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn polygons(&self) -> &[Vec<u32>] {
        &self.polygons
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Per-vertex colors, if the mesh carries any.
    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }

    /// Creates a closed box centered at the origin.
    ///
    /// - **Vertices**: 8 (shared between faces)
    /// - **Triangles**: 12 (2 per face)
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        #[rustfmt::skip]
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new( h.x, -h.y, -h.z),
            Vec3::new( h.x,  h.y, -h.z),
            Vec3::new(-h.x,  h.y, -h.z),
            Vec3::new(-h.x, -h.y,  h.z),
            Vec3::new( h.x, -h.y,  h.z),
            Vec3::new( h.x,  h.y,  h.z),
            Vec3::new(-h.x,  h.y,  h.z),
        ];

        #[rustfmt::skip]
        let triangles = [
            [4, 5, 6], [6, 7, 4], // front
            [1, 0, 3], [3, 2, 1], // back
            [5, 1, 2], [2, 6, 5], // right
            [0, 4, 7], [7, 3, 0], // left
            [7, 6, 2], [2, 3, 7], // top
            [0, 1, 5], [5, 4, 0], // bottom
        ];

        Self::literal(vertices, &triangles)
    }

    /// Creates a triangular prism roof with its ridge along Z.
    ///
    /// The base sits on `y = 0`, spans `width` on X and `depth` on Z, and the
    /// ridge is `height` above it.
    pub fn gable_roof(width: f32, height: f32, depth: f32) -> Self {
        let (w, d) = (width * 0.5, depth * 0.5);
        #[rustfmt::skip]
        let vertices = vec![
            Vec3::new(-w, 0.0, -d),
            Vec3::new( w, 0.0, -d),
            Vec3::new(0.0, height, -d),
            Vec3::new(-w, 0.0,  d),
            Vec3::new( w, 0.0,  d),
            Vec3::new(0.0, height,  d),
        ];

        #[rustfmt::skip]
        let triangles = [
            [3, 4, 5],            // front gable
            [1, 0, 2],            // back gable
            [4, 1, 2], [2, 5, 4], // right slope
            [0, 3, 5], [5, 2, 0], // left slope
            [0, 1, 4], [4, 3, 0], // underside
        ];

        Self::literal(vertices, &triangles)
    }

    /// Creates a closed cylinder around the Z axis, centered at the origin.
    ///
    /// - **Vertices**: `2 × segments + 2`
    /// - **Triangles**: `4 × segments`
    ///
    /// `segments` below 3 is raised to 3.
    pub fn wheel(radius: f32, width: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = width * 0.5;
        let mut vertices = Vec::with_capacity(2 * segments as usize + 2);

        for z in [half, -half] {
            for seg in 0..segments {
                let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
                vertices.push(Vec3::new(radius * theta.cos(), radius * theta.sin(), z));
            }
        }
        let front_center = vertices.len() as u32;
        vertices.push(Vec3::new(0.0, 0.0, half));
        let back_center = front_center + 1;
        vertices.push(Vec3::new(0.0, 0.0, -half));

        let mut triangles = Vec::with_capacity(4 * segments as usize);
        for seg in 0..segments {
            let next = (seg + 1) % segments;
            let (f0, f1) = (seg, next);
            let (b0, b1) = (seg + segments, next + segments);

            triangles.push([f0, b0, b1]);
            triangles.push([b1, f1, f0]);
            triangles.push([front_center, f0, f1]);
            triangles.push([back_center, b1, b0]);
        }

        Self::literal(vertices, &triangles)
    }

    /// Creates a closed outline through `points`. Fewer than two points give
    /// an outline with nothing to draw.
    pub fn outline(points: Vec<Vec3>) -> Self {
        let polygons = if Topology::LineLoop.accepts(points.len()) {
            vec![(0..points.len() as u32).collect()]
        } else {
            Vec::new()
        };
        Self {
            vertices: points,
            polygons,
            topology: Topology::LineLoop,
            colors: None,
        }
    }

    // Built-in geometry is index-valid by construction.
    fn literal(vertices: Vec<Vec3>, triangles: &[[u32; 3]]) -> Self {
        debug_assert!(
            triangles
                .iter()
                .flatten()
                .all(|&i| (i as usize) < vertices.len())
        );
        Self {
            vertices,
            polygons: triangles.iter().map(|t| t.to_vec()).collect(),
            topology: Topology::Triangles,
            colors: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_closed_and_outward(mesh: &Mesh) {
        let center = {
            let (min, max) = mesh.bounds().unwrap();
            (min + max) * 0.5
        };
        for polygon in mesh.polygons() {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices()[polygon[k] as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                normal.dot(centroid - center) > 0.0,
                "triangle {:?} faces inward",
                polygon
            );
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![vec![0, 1, 2], vec![0, 1, 3]],
            Topology::Triangles,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SceneError::InvalidMeshIndex {
                polygon: 1,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn rejects_empty_polygon() {
        let err = Mesh::new(vec![Vec3::ZERO], vec![vec![]], Topology::Polygon).unwrap_err();
        assert_eq!(err, SceneError::EmptyPolygon { polygon: 0 });
    }

    #[test]
    fn rejects_mismatched_colors() {
        let mesh = Mesh::from_triangles(vec![Vec3::ZERO, Vec3::X, Vec3::Y], &[[0, 1, 2]]).unwrap();
        let err = mesh.with_colors(vec![Color::WHITE]).unwrap_err();
        assert_eq!(
            err,
            SceneError::ColorCountMismatch {
                colors: 1,
                vertices: 3
            }
        );
    }

    #[test]
    fn cuboid_counts_and_bounds() {
        let mesh = Mesh::cuboid(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.polygon_count(), 12);
        assert_eq!(
            mesh.bounds(),
            Some((Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0)))
        );
        assert_closed_and_outward(&mesh);
    }

    #[test]
    fn roof_faces_point_outward() {
        let roof = Mesh::gable_roof(4.0, 2.0, 3.0);
        assert_eq!(roof.polygon_count(), 8);
        assert_closed_and_outward(&roof);
    }

    #[test]
    fn wheel_counts() {
        let wheel = Mesh::wheel(0.5, 0.2, 16);
        assert_eq!(wheel.vertex_count(), 34);
        assert_eq!(wheel.polygon_count(), 64);
        assert_eq!(Mesh::wheel(0.5, 0.2, 1).vertex_count(), 8);
    }

    #[test]
    fn outline_is_single_loop() {
        let square = Mesh::outline(vec![Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Z, Vec3::Z]);
        assert_eq!(square.topology(), Topology::LineLoop);
        assert_eq!(square.polygons(), &[vec![0, 1, 2, 3]]);
        assert_eq!(Mesh::outline(Vec::new()).polygon_count(), 0);
        assert_eq!(Mesh::outline(vec![Vec3::ONE]).polygon_count(), 0);
    }

    #[test]
    fn rejects_polygons_that_do_not_fit_topology() {
        let quad = vec![Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Y, Vec3::Y];

        let err = Mesh::new(quad.clone(), vec![vec![0, 1], vec![0, 1, 2, 3]], Topology::Triangles)
            .unwrap_err();
        assert_eq!(
            err,
            SceneError::InvalidPolygonArity {
                polygon: 0,
                len: 2,
                topology: Topology::Triangles
            }
        );
        assert!(Mesh::new(quad.clone(), vec![vec![0, 1, 2, 3]], Topology::Triangles).is_err());
        assert!(Mesh::new(quad.clone(), vec![vec![0]], Topology::LineLoop).is_err());
        assert!(Mesh::new(quad.clone(), vec![vec![0, 1]], Topology::Polygon).is_err());

        assert!(Mesh::new(quad.clone(), vec![vec![0, 1, 2, 2, 3, 0]], Topology::Triangles).is_ok());
        assert!(Mesh::new(quad.clone(), vec![vec![0, 1]], Topology::LineLoop).is_ok());
        assert!(Mesh::new(quad, vec![vec![0, 1, 2, 3]], Topology::Polygon).is_ok());
    }
}
