//! Scene contents and the builder that assembles them.

use glam::Vec3;

use crate::config::SceneConfig;
use crate::drawable::Drawable;
use crate::error::SceneError;
use crate::light::LightSource;
use crate::mover::Vehicle;
use crate::orbit_camera::OrbitCamera;
use crate::render::MAX_LIGHTS;
use crate::transform::Transform;

/// A named static object placed once in the world.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub drawable: Drawable,
    pub transform: Transform,
}

/// Everything the frame driver draws and animates.
///
/// Scenes are created with [`SceneBuilder`] and then handed to a
/// [`FrameDriver`](crate::FrameDriver), which owns them for the rest of the run.
pub struct Scene {
    name: String,
    camera: OrbitCamera,
    lights: Vec<Box<dyn LightSource>>,
    terrain: Option<Drawable>,
    objects: Vec<SceneObject>,
    vehicle: Option<Vehicle>,
    config: SceneConfig,
}

impl Scene {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn lights(&self) -> &[Box<dyn LightSource>] {
        &self.lights
    }

    pub fn terrain(&self) -> Option<&Drawable> {
        self.terrain.as_ref()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Looks up a static object by name.
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The animated parts, borrowed together for one update step.
    pub(crate) fn animated_mut(&mut self) -> (&mut [Box<dyn LightSource>], Option<&mut Vehicle>) {
        (&mut self.lights, self.vehicle.as_mut())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("camera", &self.camera)
            .field("lights", &self.lights.len())
            .field("terrain", &self.terrain.is_some())
            .field("objects", &self.objects.len())
            .field("vehicle", &self.vehicle.is_some())
            .finish()
    }
}

/// Fluent builder for a [`Scene`].
///
/// # Example
///
/// ```
/// use diorama::{Color, Drawable, Intensity, Material, Mesh, PositionedLight, SceneBuilder, Vec3};
///
/// let scene = SceneBuilder::new("shed")
///     .light(PositionedLight::directional(Vec3::new(0.0, 0.0, 7.0), Intensity::daylight()))
///     .object_at(
///         "walls",
///         Drawable::new(Mesh::cuboid(Vec3::new(4.0, 3.0, 4.0)))
///             .with_material(Material::matte(Color::BRICK)),
///         Vec3::new(0.0, 1.5, 0.0),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(scene.objects().len(), 1);
/// ```
pub struct SceneBuilder {
    name: String,
    camera: OrbitCamera,
    lights: Vec<Box<dyn LightSource>>,
    terrain: Option<Drawable>,
    objects: Vec<SceneObject>,
    vehicle: Option<Vehicle>,
    config: SceneConfig,
}

impl SceneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            camera: OrbitCamera::default(),
            lights: Vec::new(),
            terrain: None,
            objects: Vec::new(),
            vehicle: None,
            config: SceneConfig::default(),
        }
    }

    pub fn camera(mut self, camera: OrbitCamera) -> Self {
        self.camera = camera;
        self
    }

    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a light. Lights take backend slots in the order they are added.
    pub fn light(mut self, light: impl LightSource + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    /// Sets the ground mesh, drawn before every other object.
    pub fn terrain(mut self, terrain: Drawable) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Adds a static object. Objects draw in insertion order.
    pub fn object(
        mut self,
        name: impl Into<String>,
        drawable: Drawable,
        transform: impl Into<Transform>,
    ) -> Self {
        self.objects.push(SceneObject {
            name: name.into(),
            drawable,
            transform: transform.into(),
        });
        self
    }

    pub fn object_at(self, name: impl Into<String>, drawable: Drawable, position: Vec3) -> Self {
        self.object(name, drawable, position)
    }

    pub fn vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn build(self) -> Result<Scene, SceneError> {
        if self.lights.len() > MAX_LIGHTS {
            return Err(SceneError::TooManyLights {
                count: self.lights.len(),
                max: MAX_LIGHTS,
            });
        }

        log::debug!(
            "scene '{}': {} lights, {} objects, terrain: {}, vehicle: {}",
            self.name,
            self.lights.len(),
            self.objects.len(),
            self.terrain.is_some(),
            self.vehicle.is_some()
        );

        Ok(Scene {
            name: self.name,
            camera: self.camera,
            lights: self.lights,
            terrain: self.terrain,
            objects: self.objects,
            vehicle: self.vehicle,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{Intensity, PositionedLight};
    use crate::mesh::Mesh;

    #[test]
    fn objects_keep_insertion_order_and_are_found_by_name() {
        let scene = SceneBuilder::new("test")
            .object_at("walls", Drawable::new(Mesh::cuboid(Vec3::ONE)), Vec3::ZERO)
            .object_at("chimney", Drawable::new(Mesh::cuboid(Vec3::ONE)), Vec3::Y)
            .build()
            .unwrap();

        let names: Vec<_> = scene.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["walls", "chimney"]);
        assert_eq!(scene.object("chimney").unwrap().transform.position, Vec3::Y);
        assert!(scene.object("roof").is_none());
    }

    #[test]
    fn rejects_more_lights_than_slots() {
        let mut builder = SceneBuilder::new("bright");
        for _ in 0..=MAX_LIGHTS {
            builder = builder.light(PositionedLight::point(Vec3::ZERO, Intensity::daylight()));
        }
        assert_eq!(
            builder.build().unwrap_err(),
            SceneError::TooManyLights {
                count: MAX_LIGHTS + 1,
                max: MAX_LIGHTS
            }
        );
    }
}
