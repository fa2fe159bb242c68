//! Error types for scene construction and for the windowed host.

use std::fmt;

use crate::mesh::Topology;

/// Errors raised while building scene content.
///
/// Every variant is a precondition violation detected when a value is
/// constructed. Drawing never fails: a [`Mesh`](crate::Mesh) that exists
/// has already been validated.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneError {
    /// A polygon references a vertex that does not exist.
    InvalidMeshIndex {
        polygon: usize,
        index: u32,
        vertex_count: usize,
    },
    /// A polygon has no indices at all.
    EmptyPolygon { polygon: usize },
    /// A polygon's index count does not fit the mesh topology.
    InvalidPolygonArity {
        polygon: usize,
        len: usize,
        topology: Topology,
    },
    /// Per-vertex colors were supplied but do not line up with the vertices.
    ColorCountMismatch { colors: usize, vertices: usize },
    /// A transform was popped without a matching push.
    UnbalancedTransformScope,
    /// A bounded mover was given an empty or inverted range.
    InvalidBounds { low: f32, high: f32 },
    /// A scene was given more lights than a backend has slots for.
    TooManyLights { count: usize, max: usize },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidMeshIndex {
                polygon,
                index,
                vertex_count,
            } => write!(
                f,
                "polygon {} references vertex {} but the mesh has {} vertices",
                polygon, index, vertex_count
            ),
            SceneError::EmptyPolygon { polygon } => {
                write!(f, "polygon {} has no vertex indices", polygon)
            }
            SceneError::InvalidPolygonArity {
                polygon,
                len,
                topology,
            } => write!(
                f,
                "polygon {} has {} indices, which is not a valid {:?} polygon",
                polygon, len, topology
            ),
            SceneError::ColorCountMismatch { colors, vertices } => write!(
                f,
                "mesh has {} vertex colors for {} vertices",
                colors, vertices
            ),
            SceneError::UnbalancedTransformScope => {
                write!(f, "transform popped without a matching push")
            }
            SceneError::InvalidBounds { low, high } => {
                write!(f, "invalid mover bounds: low {} is not below high {}", low, high)
            }
            SceneError::TooManyLights { count, max } => {
                write!(f, "scene has {} lights, at most {} are supported", count, max)
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Errors raised while bringing up or running the window and GPU.
#[derive(Debug)]
pub enum AppError {
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Surface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    Scene(SceneError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "event loop error: {}", e),
            AppError::Window(e) => write!(f, "failed to create window: {}", e),
            AppError::Surface(e) => write!(f, "failed to create surface: {}", e),
            AppError::Adapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            AppError::Device(e) => write!(f, "failed to create device: {}", e),
            AppError::Scene(e) => write!(f, "invalid scene: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Surface(e) => Some(e),
            AppError::Adapter(e) => Some(e),
            AppError::Device(e) => Some(e),
            AppError::Scene(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<wgpu::CreateSurfaceError> for AppError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        AppError::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for AppError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        AppError::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for AppError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        AppError::Device(e)
    }
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        AppError::Scene(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_index() {
        let err = SceneError::InvalidMeshIndex {
            polygon: 3,
            index: 9,
            vertex_count: 4,
        };
        assert_eq!(
            err.to_string(),
            "polygon 3 references vertex 9 but the mesh has 4 vertices"
        );
    }

    #[test]
    fn app_error_exposes_scene_source() {
        use std::error::Error;

        let err = AppError::from(SceneError::UnbalancedTransformScope);
        assert_eq!(
            err.to_string(),
            "invalid scene: transform popped without a matching push"
        );
        assert!(err.source().is_some());
    }
}
