use std::path::PathBuf;

use egui_wgpu::wgpu;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read shader {path:?}")]
    ShaderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader '{label}' failed validation: {message}")]
    ShaderCompile { label: String, message: String },

    #[error("failed to create surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window")]
    CreateWindow(#[from] winit::error::OsError),

    #[error("failed to encode image")]
    Image(#[from] image::ImageError),
}

pub type EngineResult<T> = Result<T, EngineError>;
