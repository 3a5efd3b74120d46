//! Error types for the experience.
//!
//! The animation core never fails; everything here is about acquiring the
//! window and GPU at startup, which is treated as a fatal precondition.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reported no supported formats for this adapter.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => {
                write!(f, "Surface is not compatible with the selected adapter")
            }
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the experience.
#[derive(Debug)]
pub enum ExperienceError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for ExperienceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            ExperienceError::Window(e) => write!(f, "Failed to create window: {}", e),
            ExperienceError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for ExperienceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExperienceError::EventLoop(e) => Some(e),
            ExperienceError::Window(e) => Some(e),
            ExperienceError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ExperienceError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ExperienceError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ExperienceError {
    fn from(e: winit::error::OsError) -> Self {
        ExperienceError::Window(e)
    }
}

impl From<GpuError> for ExperienceError {
    fn from(e: GpuError) -> Self {
        ExperienceError::Gpu(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_gpu_error_wraps_into_experience_error() {
        let err: ExperienceError = GpuError::NoAdapter.into();
        assert!(matches!(err, ExperienceError::Gpu(GpuError::NoAdapter)));
        assert!(err.to_string().starts_with("GPU error: No compatible GPU adapter"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_no_adapter_has_no_source() {
        assert!(GpuError::NoAdapter.source().is_none());
    }
}
