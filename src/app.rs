//! The windowed host: winit event loop, tick cadence and input routing.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::frame::FrameDriver;
use crate::input::KeyBindings;
use crate::render::{RecordingBackend, WgpuBackend};
use crate::scene::Scene;

/// Opens a window and runs `scene` until the window is closed.
///
/// The driver ticks every `config.tick_interval`; key presses are mapped to
/// camera commands through the default [`KeyBindings`]. When
/// `config.headless_frames` is set no window is opened and the scene runs
/// against a [`RecordingBackend`] instead.
///
/// # Example
/// ```no_run
/// use diorama::{AppConfig, scene::Demo};
///
/// fn main() -> Result<(), diorama::AppError> {
///     let scene = Demo::Village.build()?;
///     diorama::run(AppConfig::new().title(Demo::Village.title()), scene)
/// }
/// ```
pub fn run(config: AppConfig, scene: Scene) -> Result<(), AppError> {
    run_with_bindings(config, scene, KeyBindings::default())
}

/// Like [`run`], with custom key bindings.
pub fn run_with_bindings(
    config: AppConfig,
    scene: Scene,
    keys: KeyBindings,
) -> Result<(), AppError> {
    if let Some(frames) = config.headless_frames {
        run_headless(&config, scene, frames);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DioramaApp::Pending {
        config,
        scene: Some(scene),
        keys,
    };
    event_loop.run_app(&mut app)?;

    match app {
        DioramaApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

/// Runs `frames` ticks against a [`RecordingBackend`] and returns it holding
/// the commands of the last frame.
pub fn run_headless(config: &AppConfig, scene: Scene, frames: u64) -> RecordingBackend {
    let aspect = config.width as f32 / config.height.max(1) as f32;
    let mut driver = FrameDriver::new(scene);
    let mut backend = RecordingBackend::new().with_aspect(aspect);

    for _ in 0..frames {
        backend.clear();
        driver.tick(&mut backend);
    }

    log::info!(
        "headless run of '{}': {} frames, last frame {} primitives / {} vertices",
        driver.scene().name(),
        driver.frame_count(),
        backend.primitive_count(),
        backend.vertex_count()
    );
    backend
}

enum DioramaApp {
    Pending {
        config: AppConfig,
        scene: Option<Scene>,
        keys: KeyBindings,
    },
    Running {
        driver: FrameDriver,
        backend: WgpuBackend,
        keys: KeyBindings,
        tick_interval: std::time::Duration,
        next_tick: Instant,
    },
    Failed(AppError),
}

fn start(
    event_loop: &ActiveEventLoop,
    config: &AppConfig,
    scene: Scene,
) -> Result<(FrameDriver, WgpuBackend), AppError> {
    let window_attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = Arc::new(event_loop.create_window(window_attrs)?);
    let backend = WgpuBackend::new(window)?;
    log::info!(
        "running '{}' at {} ms per tick",
        scene.name(),
        config.tick_interval.as_millis()
    );
    Ok((FrameDriver::new(scene), backend))
}

impl ApplicationHandler for DioramaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let DioramaApp::Pending { config, scene, keys } = self else {
            return;
        };
        let Some(scene) = scene.take() else {
            return;
        };
        let tick_interval = config.tick_interval;
        let keys = std::mem::take(keys);

        *self = match start(event_loop, config, scene) {
            Ok((driver, backend)) => DioramaApp::Running {
                driver,
                backend,
                keys,
                tick_interval,
                next_tick: Instant::now(),
            },
            Err(err) => {
                log::error!("{}", err);
                event_loop.exit();
                DioramaApp::Failed(err)
            }
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let DioramaApp::Running {
            driver,
            backend,
            keys,
            ..
        } = self
        else {
            return;
        };

        if let Some(input) = keys.translate(&event) {
            driver.handle_input(input, backend);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                backend.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                driver.redraw(backend);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let DioramaApp::Running {
            driver,
            backend,
            tick_interval,
            next_tick,
            ..
        } = self
        else {
            return;
        };

        let now = Instant::now();
        if now >= *next_tick {
            driver.tick(backend);
            // no catch-up ticks after a stall
            *next_tick = now + *tick_interval;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(*next_tick));
    }
}
