//! Per-tick orchestration.
//!
//! A [`FrameDriver`] owns a [`Scene`] and walks it through one phase cycle per
//! tick:
//!
//! ```text
//! Idle -> Updating -> Drawing -> Presented -> Idle
//! ```
//!
//! Input events mutate the camera immediately and ask the backend for a
//! redraw; the host answers with [`FrameDriver::redraw`], which draws and
//! presents without advancing any animation.

use crate::input::InputEvent;
use crate::render::RenderBackend;
use crate::scene::Scene;
use crate::transform::TransformStack;

/// Where the driver is in its frame cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePhase {
    #[default]
    Idle,
    Updating,
    Drawing,
    Presented,
}

/// Drives a [`Scene`] against a [`RenderBackend`].
#[derive(Debug)]
pub struct FrameDriver {
    scene: Scene,
    stack: TransformStack,
    phase: FramePhase,
    frames: u64,
}

impl FrameDriver {
    pub fn new(scene: Scene) -> Self {
        log::debug!("frame driver ready for scene '{}'", scene.name());
        Self {
            scene,
            stack: TransformStack::new(),
            phase: FramePhase::Idle,
            frames: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of frames presented so far, including input-triggered redraws.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Runs one full cycle: animate, draw, present.
    pub fn tick(&mut self, backend: &mut impl RenderBackend) {
        self.update();
        self.draw(backend);
        self.present(backend);
    }

    /// Draws and presents the current state without animating.
    pub fn redraw(&mut self, backend: &mut impl RenderBackend) {
        self.draw(backend);
        self.present(backend);
    }

    /// Applies a camera command and requests an out-of-cycle redraw.
    pub fn handle_input(&mut self, event: InputEvent, backend: &mut impl RenderBackend) {
        let (rotate, zoom) = {
            let config = self.scene.config();
            (config.rotate_step, config.zoom_step)
        };
        let camera = self.scene.camera_mut();
        match event {
            InputEvent::RotateLeft => camera.rotate(-rotate),
            InputEvent::RotateRight => camera.rotate(rotate),
            InputEvent::ZoomIn => camera.move_by(-zoom),
            InputEvent::ZoomOut => camera.move_by(zoom),
        }
        log::trace!(
            "{:?}: angle {:.3}, distance {:.2}",
            event,
            camera.current_angle(),
            camera.current_distance()
        );
        backend.request_redraw();
    }

    fn enter(&mut self, phase: FramePhase) {
        log::trace!("frame {}: {:?} -> {:?}", self.frames, self.phase, phase);
        self.phase = phase;
    }

    fn update(&mut self) {
        self.enter(FramePhase::Updating);

        let spin = self.scene.config().light_spin;
        let (lights, vehicle) = self.scene.animated_mut();
        if let Some(vehicle) = vehicle {
            vehicle.tick();
        }
        for light in lights.iter_mut() {
            light.advance(spin);
        }
    }

    fn draw(&mut self, backend: &mut impl RenderBackend) {
        self.enter(FramePhase::Drawing);

        let scene = &self.scene;
        let config = scene.config();

        backend.clear_frame(config.clear_color);

        let camera = scene.camera().camera(config.look_target);
        let aspect = config.projection.aspect(backend.viewport_aspect());
        backend.set_projection(camera.projection(aspect));
        backend.set_view(camera.view);

        for (id, light) in scene.lights().iter().enumerate() {
            backend.set_light(id, light.params());
        }
        if !scene.lights().is_empty() {
            backend.enable_lighting();
        }

        backend.set_depth_test(config.depth_test, config.depth_func);
        backend.set_fog(config.fog);

        let stack = &mut self.stack;
        if let Some(terrain) = scene.terrain() {
            terrain.draw(stack, backend, glam::Vec3::ZERO);
        }
        for object in scene.objects() {
            object.drawable.draw_with(stack, backend, object.transform);
        }
        if let Some(vehicle) = scene.vehicle() {
            vehicle.draw(stack, backend);
        }

        debug_assert_eq!(self.stack.depth(), 0, "transform scope leaked out of a draw");
    }

    fn present(&mut self, backend: &mut impl RenderBackend) {
        backend.present_frame();
        self.enter(FramePhase::Presented);
        self.frames += 1;
        self.enter(FramePhase::Idle);
    }
}
