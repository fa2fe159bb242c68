//! # Diorama
//!
//! **A small 3D scene compositor with an immediate-mode heart.**
//!
//! Build a diorama out of meshes, drop in a couple of lights, an orbiting
//! camera and a car that bounces along the road, and let the frame driver
//! animate and draw it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use diorama::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let ground = TerrainGenerator::new(-20.0, 20.0, 40).build(&HeightField::house_site())?;
//!
//!     let scene = SceneBuilder::new("shed")
//!         .terrain(Drawable::new(ground))
//!         .object_at(
//!             "walls",
//!             Drawable::new(Mesh::cuboid(Vec3::new(4.0, 3.0, 4.0)))
//!                 .with_material(Material::matte(Color::BRICK)),
//!             Vec3::new(0.0, 1.5, 0.0),
//!         )
//!         .light(OrbitLight::new(Vec3::new(0.0, 15.0, 0.0), 25.0, Intensity::daylight()))
//!         .build()?;
//!
//!     run(AppConfig::new().title("Shed"), scene)
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`TransformStack`]: owned matrix stack with RAII [`TransformScope`] guards
//! - [`Drawable`]: a validated [`Mesh`] that emits itself primitive by primitive
//! - [`TerrainGenerator`]: height fields sampled into a triangle grid
//! - [`OrbitCamera`], [`OrbitLight`], [`BoundedMover`]: the animated parts
//! - [`FrameDriver`]: one `Updating → Drawing → Presented` cycle per tick
//! - [`render::RenderBackend`]: the seam to the GPU, or to a recorder in tests

mod app;
mod camera;
mod color;
mod config;
mod drawable;
mod error;
mod frame;
mod gpu;
mod input;
mod light;
mod mesh;
mod mover;
mod orbit_camera;
pub mod render;
pub mod scene;
mod terrain;
mod transform;

pub use app::{run, run_headless, run_with_bindings};
pub use camera::{Camera, LookAt};
pub use color::Color;
pub use config::{AppConfig, ProjectionMode, SceneConfig};
pub use drawable::{Drawable, Material};
pub use error::{AppError, SceneError};
pub use frame::{FrameDriver, FramePhase};
pub use gpu::GpuContext;
pub use input::{InputEvent, KeyBindings};
pub use light::{Intensity, LightKind, LightSource, OrbitLight, PositionedLight};
pub use mesh::{Mesh, Topology};
pub use mover::{BoundedMover, Vehicle, WheelBase};
pub use orbit_camera::OrbitCamera;
pub use scene::{Scene, SceneBuilder, SceneObject};
pub use terrain::{
    ColorField, ColorSource, HeightField, HeightSource, TerrainGenerator, TerrainGrid,
};
pub use transform::{Transform, TransformScope, TransformStack};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec3, Vec4};

// Re-export the key codes used by KeyBindings
pub use winit::keyboard::KeyCode;
