//! Procedural height-field terrain.
//!
//! A [`TerrainGenerator`] samples a height function on a regular square grid
//! and triangulates it:
//!
//! ```
//! use diorama::{HeightField, TerrainGenerator};
//!
//! let terrain = TerrainGenerator::new(-20.0, 20.0, 40)
//!     .build(&HeightField::Flat)
//!     .unwrap();
//!
//! assert_eq!(terrain.vertex_count(), 40 * 40);
//! assert_eq!(terrain.polygon_count(), 2 * 39 * 39);
//! ```
//!
//! # Grid Layout
//!
//! With `step = (end - start) / steps`, the vertex in row `zi`, column `xi`
//! sits at `(start + xi·step, height(x, z), start + zi·step)` and has flat
//! index `zi·steps + xi`. Each grid cell becomes two triangles:
//!
//! ```text
//!  base+xi ---- base+xi+1
//!     |  A    /    |
//!     |     /   B  |
//!  next+xi ---- next+xi+1
//! ```
//!
//! A: `(base+xi+1, next+xi, base+xi)`, B: `(base+xi+1, next+xi+1, next+xi)`.
//!
//! Note that the last row and column land one step short of `end`.

use glam::Vec3;

use crate::color::Color;
use crate::error::SceneError;
use crate::mesh::{Mesh, Topology};

/// A source of terrain elevation.
pub trait HeightSource {
    fn height(&self, x: f32, z: f32) -> f32;
}

impl<F> HeightSource for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// The built-in elevation profiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightField {
    /// Height 0 everywhere.
    Flat,
    /// Flat at `level` within `radius` of `center` (on XZ), rolling hills elsewhere.
    Plateau {
        center: (f32, f32),
        radius: f32,
        level: f32,
        amplitude: f32,
        frequency: f32,
    },
    /// A sawtooth ramp: `slope · ((x + z) mod period)`.
    ModuloRamp { period: f32, slope: f32 },
}

impl HeightField {
    /// The hills used around the house: a level building site at the origin.
    pub fn house_site() -> Self {
        HeightField::Plateau {
            center: (0.0, 0.0),
            radius: 8.0,
            level: 0.0,
            amplitude: 1.5,
            frequency: 0.35,
        }
    }
}

impl HeightSource for HeightField {
    fn height(&self, x: f32, z: f32) -> f32 {
        match *self {
            HeightField::Flat => 0.0,
            HeightField::Plateau {
                center,
                radius,
                level,
                amplitude,
                frequency,
            } => {
                let (dx, dz) = (x - center.0, z - center.1);
                if dx * dx + dz * dz <= radius * radius {
                    level
                } else {
                    level + amplitude * (frequency * x).sin() * (frequency * z).cos()
                }
            }
            HeightField::ModuloRamp { period, slope } => {
                if period <= 0.0 {
                    return 0.0;
                }
                slope * (x + z).rem_euclid(period)
            }
        }
    }
}

/// A source of per-vertex terrain color.
pub trait ColorSource {
    fn color(&self, x: f32, y: f32, z: f32) -> Color;
}

impl<F> ColorSource for F
where
    F: Fn(f32, f32, f32) -> Color,
{
    fn color(&self, x: f32, y: f32, z: f32) -> Color {
        self(x, y, z)
    }
}

/// Built-in terrain coloring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorField {
    Uniform(Color),
    /// Blends from `low` at `min_y` to `high` at `max_y`.
    ByHeight {
        low: Color,
        high: Color,
        min_y: f32,
        max_y: f32,
    },
}

impl ColorSource for ColorField {
    fn color(&self, _x: f32, y: f32, _z: f32) -> Color {
        match *self {
            ColorField::Uniform(color) => color,
            ColorField::ByHeight {
                low,
                high,
                min_y,
                max_y,
            } => {
                let span = max_y - min_y;
                let t = if span > 0.0 { (y - min_y) / span } else { 0.0 };
                low.lerp(high, t)
            }
        }
    }
}

/// Raw sampled grid: positions and triangle index triples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainGrid {
    pub vertices: Vec<Vec3>,
    pub polygons: Vec<[u32; 3]>,
}

/// Samples a height field over `[start, end)²` with `steps × steps` vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainGenerator {
    start: f32,
    end: f32,
    steps: u32,
}

impl TerrainGenerator {
    /// Largest grid side whose vertex indices still fit in a `u32`.
    pub const MAX_STEPS: u32 = u16::MAX as u32;

    /// `steps` above [`MAX_STEPS`](Self::MAX_STEPS) is lowered to it.
    pub fn new(start: f32, end: f32, steps: u32) -> Self {
        if steps > Self::MAX_STEPS {
            log::warn!("terrain steps {} lowered to {}", steps, Self::MAX_STEPS);
        }
        Self {
            start,
            end,
            steps: steps.min(Self::MAX_STEPS),
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Distance between neighbouring grid samples.
    pub fn step(&self) -> f32 {
        if self.steps == 0 {
            0.0
        } else {
            (self.end - self.start) / self.steps as f32
        }
    }

    /// Samples the grid.
    ///
    /// Produces `steps²` vertices and `2·(steps-1)²` triangles; `steps < 2`
    /// yields no triangles.
    pub fn generate(&self, height: &impl HeightSource) -> TerrainGrid {
        let n = self.steps;
        let step = self.step();

        let mut vertices = Vec::with_capacity((n as usize).pow(2));
        for zi in 0..n {
            let z = self.start + zi as f32 * step;
            for xi in 0..n {
                let x = self.start + xi as f32 * step;
                vertices.push(Vec3::new(x, height.height(x, z), z));
            }
        }

        let cells = n.saturating_sub(1) as usize;
        let mut polygons = Vec::with_capacity(2 * cells * cells);
        for zi in 0..n.saturating_sub(1) {
            let base = zi * n;
            let next = (zi + 1) * n;
            for xi in 0..n - 1 {
                polygons.push([base + xi + 1, next + xi, base + xi]);
                polygons.push([base + xi + 1, next + xi + 1, next + xi]);
            }
        }

        TerrainGrid { vertices, polygons }
    }

    /// Samples the grid into a triangle [`Mesh`].
    pub fn build(&self, height: &impl HeightSource) -> Result<Mesh, SceneError> {
        let grid = self.generate(height);
        log::debug!(
            "terrain: {} vertices, {} triangles (step {:.3})",
            grid.vertices.len(),
            grid.polygons.len(),
            self.step()
        );
        Mesh::from_triangles(grid.vertices, &grid.polygons)
    }

    /// Samples the grid into a triangle [`Mesh`] with per-vertex colors.
    pub fn build_colored(
        &self,
        height: &impl HeightSource,
        color: &impl ColorSource,
    ) -> Result<Mesh, SceneError> {
        let grid = self.generate(height);
        let colors = grid
            .vertices
            .iter()
            .map(|v| color.color(v.x, v.y, v.z))
            .collect();
        Mesh::from_triangles(grid.vertices, &grid.polygons)?.with_colors(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_and_index_validity() {
        for steps in [2u32, 3, 7, 40] {
            let grid = TerrainGenerator::new(-20.0, 20.0, steps).generate(&HeightField::Flat);
            assert_eq!(grid.vertices.len(), (steps * steps) as usize);
            assert_eq!(grid.polygons.len(), (2 * (steps - 1) * (steps - 1)) as usize);
            assert!(grid.polygons.iter().flatten().all(|&i| i < steps * steps));
        }
    }

    #[test]
    fn steps_are_capped_so_indices_fit_u32() {
        let generator = TerrainGenerator::new(0.0, 1.0, 100_000);
        assert_eq!(generator.steps(), TerrainGenerator::MAX_STEPS);
        let n = TerrainGenerator::MAX_STEPS as u64;
        assert!(n * n - 1 <= u32::MAX as u64);
        assert_eq!(TerrainGenerator::new(0.0, 1.0, 40).steps(), 40);
    }

    #[test]
    fn first_vertex_samples_the_start_corner() {
        let field = HeightField::house_site();
        let grid = TerrainGenerator::new(-20.0, 20.0, 40).generate(&field);
        assert_eq!(
            grid.vertices[0],
            Vec3::new(-20.0, field.height(-20.0, -20.0), -20.0)
        );
        // row-major: index 1 is one step along x
        assert_eq!(grid.vertices[1].x, -19.0);
        assert_eq!(grid.vertices[40].z, -19.0);
    }

    #[test]
    fn first_cell_triangulation() {
        let grid = TerrainGenerator::new(0.0, 3.0, 3).generate(&HeightField::Flat);
        assert_eq!(grid.polygons[0], [1, 3, 0]);
        assert_eq!(grid.polygons[1], [1, 4, 3]);
        assert_eq!(grid.polygons[2], [2, 4, 1]);
    }

    #[test]
    fn degenerate_steps_yield_no_polygons() {
        let one = TerrainGenerator::new(0.0, 1.0, 1).generate(&HeightField::Flat);
        assert_eq!(one.vertices.len(), 1);
        assert!(one.polygons.is_empty());

        let zero = TerrainGenerator::new(0.0, 1.0, 0).generate(&HeightField::Flat);
        assert!(zero.vertices.is_empty());
        assert!(zero.polygons.is_empty());
        assert!(TerrainGenerator::new(0.0, 1.0, 0).build(&HeightField::Flat).is_ok());
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = TerrainGenerator::new(-5.0, 5.0, 17);
        let field = HeightField::ModuloRamp {
            period: 3.0,
            slope: 0.5,
        };
        assert_eq!(generator.generate(&field), generator.generate(&field));
    }

    #[test]
    fn plateau_is_flat_near_center() {
        let field = HeightField::house_site();
        assert_eq!(field.height(0.0, 0.0), 0.0);
        assert_eq!(field.height(5.0, -5.0), 0.0);
        assert!(field.height(12.0, 3.0) != 0.0);
    }

    #[test]
    fn modulo_ramp_wraps_negative_coordinates() {
        let field = HeightField::ModuloRamp {
            period: 4.0,
            slope: 2.0,
        };
        assert_eq!(field.height(1.0, 0.0), 2.0);
        assert_eq!(field.height(-1.0, 0.0), 6.0);
        assert_eq!(field.height(4.0, 0.0), 0.0);
    }

    #[test]
    fn closures_are_height_sources() {
        let grid = TerrainGenerator::new(0.0, 2.0, 2).generate(&|x: f32, z: f32| x + 10.0 * z);
        assert_eq!(grid.vertices[3], Vec3::new(1.0, 11.0, 1.0));
    }

    #[test]
    fn colored_terrain_carries_one_color_per_vertex() {
        let colors = ColorField::ByHeight {
            low: Color::GRASS,
            high: Color::ROCK,
            min_y: 0.0,
            max_y: 2.0,
        };
        let mesh = TerrainGenerator::new(-4.0, 4.0, 8)
            .build_colored(&HeightField::Flat, &colors)
            .unwrap();
        let mesh_colors = mesh.colors().unwrap();
        assert_eq!(mesh_colors.len(), mesh.vertex_count());
        assert!(mesh_colors.iter().all(|&c| c == Color::GRASS));
    }
}
