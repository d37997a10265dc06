use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while talking to the wgpu device.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter was found")]
    AdapterNone,
    #[error("shader `{0}` is not supported by this host")]
    UnsupportedShader(String),
    #[error("failed to request a device: {0}")]
    RequestDeviceError(#[from] wgpu::RequestDeviceError),
    #[error("failed to map a readback buffer")]
    BufferAsyncError,
    #[error("query set is not available on this device")]
    QueryNone,
}

/// Errors raised while building or loading volume profiles.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("unknown volume component `{0}`")]
    UnknownComponent(String),
    #[error("invalid data for volume component `{name}`: {source}")]
    InvalidComponent {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading configuration or shader files.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Volume(#[from] VolumeError),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Generic error type for any error.
/// Recommended to use with terminal errors only, which are expected to be displayed and not handled.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
