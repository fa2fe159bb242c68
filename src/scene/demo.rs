//! Ready-made scenes.
//!
//! Each preset adds to the one before it: a lone panel, a house on a hill, the
//! same house with a car driving past, and a fogged sawtooth landscape.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::color::Color;
use crate::config::{ProjectionMode, SceneConfig};
use crate::drawable::{Drawable, Material};
use crate::error::SceneError;
use crate::light::{Intensity, OrbitLight, PositionedLight};
use crate::mesh::Mesh;
use crate::mover::{BoundedMover, Vehicle};
use crate::orbit_camera::OrbitCamera;
use crate::render::{DepthFunc, Fog};
use crate::scene::{Scene, SceneBuilder};
use crate::terrain::{ColorField, HeightField, TerrainGenerator};

/// The built-in scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Demo {
    /// A single two-triangle panel seen from a fixed corner.
    Cube,
    /// A brick house with chimney and roof on a plateau in rolling hills.
    House,
    /// The house plus a car bouncing along the road.
    Village,
    /// Height-colored sawtooth terrain under linear fog.
    Terrain,
}

impl Demo {
    pub const ALL: [Demo; 4] = [Demo::Cube, Demo::House, Demo::Village, Demo::Terrain];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Cube => "cube",
            Demo::House => "house",
            Demo::Village => "village",
            Demo::Terrain => "terrain",
        }
    }

    /// Window title for the demo.
    pub fn title(self) -> &'static str {
        match self {
            Demo::Cube => "Diorama - panel",
            Demo::House => "Diorama - house",
            Demo::Village => "Diorama - village",
            Demo::Terrain => "Diorama - terrain",
        }
    }

    pub fn build(self) -> Result<Scene, SceneError> {
        match self {
            Demo::Cube => cube(),
            Demo::House => house(SceneBuilder::new(self.name()))?.build(),
            Demo::Village => village(),
            Demo::Terrain => terrain(),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a demo name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDemo(pub String);

impl fmt::Display for UnknownDemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = Demo::ALL.iter().map(|d| d.name()).collect();
        write!(f, "unknown demo '{}' (expected one of: {})", self.0, names.join(", "))
    }
}

impl std::error::Error for UnknownDemo {}

impl FromStr for Demo {
    type Err = UnknownDemo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Demo::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDemo(s.to_string()))
    }
}

const GROUND: (f32, f32, u32) = (-20.0, 20.0, 40);

/// Orbit that reproduces the fixed eye at (9, 7, -8).
fn corner_orbit() -> OrbitCamera {
    OrbitCamera::new()
        .center(Vec3::new(0.0, 7.0, 0.0))
        .distance_limits(2.0, 80.0)
        .distance(Vec3::new(9.0, 0.0, -8.0).length())
        .angle(9.0f32.atan2(-8.0))
}

fn cube() -> Result<Scene, SceneError> {
    let panel = Mesh::from_triangles(
        vec![
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(-1.0, 2.0, 1.0),
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(-1.0, 2.0, 2.0),
        ],
        &[[2, 1, 0], [2, 3, 1]],
    )?;

    SceneBuilder::new(Demo::Cube.name())
        .camera(corner_orbit())
        .config(
            SceneConfig::new()
                .look_target(Vec3::new(-2.5, 3.0, 5.0))
                .depth(true, DepthFunc::Less)
                .light_spin(0.0),
        )
        .object_at("panel", Drawable::new(panel), Vec3::ZERO)
        .build()
}

fn house(builder: SceneBuilder) -> Result<SceneBuilder, SceneError> {
    let (start, end, steps) = GROUND;
    let site = HeightField::house_site();
    let ground = TerrainGenerator::new(start, end, steps).build_colored(
        &site,
        &ColorField::ByHeight {
            low: Color::GRASS,
            high: Color::ROCK,
            min_y: -1.5,
            max_y: 1.5,
        },
    )?;

    let walls = Drawable::new(Mesh::cuboid(Vec3::new(4.0, 3.0, 4.0)))
        .with_material(Material::matte(Color::BRICK));
    let chimney = Drawable::new(Mesh::cuboid(Vec3::new(0.5, 1.5, 0.5)))
        .with_material(Material::matte(Color::BRICK));
    let roof = Drawable::new(Mesh::gable_roof(4.6, 1.6, 4.6))
        .with_material(Material::shiny(Color::ROOF, 16.0));

    Ok(builder
        .camera(corner_orbit())
        .config(
            SceneConfig::new()
                .clear_color(Color::rgb(0.55, 0.7, 0.9))
                .look_target(Vec3::new(0.0, 2.0, 0.0))
                .projection(ProjectionMode::FromViewport { fallback: 1.0 }),
        )
        .terrain(Drawable::new(ground))
        .light(OrbitLight::new(Vec3::new(0.0, 15.0, 0.0), 25.0, Intensity::daylight()))
        .light(PositionedLight::point(Vec3::new(0.0, -7.0, 0.0), Intensity::ember()))
        .object_at("walls", walls, Vec3::new(0.0, 1.5, 0.0))
        .object_at("chimney", chimney, Vec3::new(1.0, 3.5, 0.8))
        .object_at("roof", roof, Vec3::new(0.0, 3.0, 0.0)))
}

fn village() -> Result<Scene, SceneError> {
    let mover = BoundedMover::new(0.0, 0.1, (-5.0, 5.0))?;
    let road = Mesh::outline(vec![
        Vec3::new(-7.0, 0.01, 5.0),
        Vec3::new(7.0, 0.01, 5.0),
        Vec3::new(7.0, 0.01, 7.0),
        Vec3::new(-7.0, 0.01, 7.0),
    ]);

    house(SceneBuilder::new(Demo::Village.name()))?
        .object_at(
            "road",
            Drawable::new(road).with_material(Material::matte(Color::rgb(0.2, 0.2, 0.2))),
            Vec3::ZERO,
        )
        .vehicle(Vehicle::new(mover, Vec3::new(0.0, 0.0, 6.0), Vec3::X))
        .build()
}

fn terrain() -> Result<Scene, SceneError> {
    let (start, end, steps) = GROUND;
    let ramp = HeightField::ModuloRamp {
        period: 5.0,
        slope: 0.6,
    };
    let ground = TerrainGenerator::new(start, end, steps).build_colored(
        &ramp,
        &ColorField::ByHeight {
            low: Color::GRASS,
            high: Color::ROCK,
            min_y: 0.0,
            max_y: 3.0,
        },
    )?;

    SceneBuilder::new(Demo::Terrain.name())
        .camera(OrbitCamera::new().center(Vec3::new(0.0, 12.0, 0.0)).distance(30.0))
        .config(
            SceneConfig::new()
                .clear_color(Color::FOG)
                .projection(ProjectionMode::FromViewport { fallback: 1.0 })
                .fog(Fog::linear(Color::FOG, 15.0, 60.0)),
        )
        .terrain(Drawable::new(ground).with_material(Material::matte(Color::WHITE)))
        .light(OrbitLight::new(Vec3::new(0.0, 20.0, 0.0), 30.0, Intensity::daylight()))
        .build()
}
