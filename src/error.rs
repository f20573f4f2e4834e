//! Errors surfaced to the application.

use thiserror::Error;

/// Failures that stop the viewer.
///
/// Per-frame problems (a lost surface, a model that fails to load, a
/// degenerate edge) are logged and recovered from instead.
#[derive(Debug, Error)]
pub enum QuadviewError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create wgpu surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("GPU ran out of memory while acquiring a frame")]
    SurfaceOutOfMemory,
}

pub type Result<T, E = QuadviewError> = std::result::Result<T, E>;
