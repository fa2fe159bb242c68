//! Scene composition.
//!
//! A [`Scene`] is the static description of a diorama: ground, buildings,
//! lights, an optional moving vehicle, the orbit camera and the
//! [`SceneConfig`](crate::SceneConfig) that says how to render it. The
//! [`FrameDriver`](crate::FrameDriver) takes ownership of a scene and animates it.
//!
//! Ready-made scenes live in [`demo`].
//!
//! # Example
//!
//! ```
//! use diorama::render::RecordingBackend;
//! use diorama::scene::Demo;
//! use diorama::FrameDriver;
//!
//! let scene = Demo::House.build().unwrap();
//! let mut driver = FrameDriver::new(scene);
//! let mut backend = RecordingBackend::new();
//!
//! driver.tick(&mut backend);
//! assert_eq!(backend.frame_count(), 1);
//! ```

pub mod demo;
mod scene;

pub use demo::{Demo, UnknownDemo};
pub use scene::{Scene, SceneBuilder, SceneObject};
