//! Engine error types.
//!
//! Library code returns [`RenderError`]; binaries and the window runtime wrap it
//! in `anyhow` with additional context.

use thiserror::Error;

use crate::surface::SurfaceErrorAction;

/// Failure reported by a [`ShaderLoader`](crate::shader::ShaderLoader).
#[derive(Debug, Error)]
pub enum ShaderLoadError {
    /// No source is registered (or stored) under the requested id.
    #[error("shader `{0}` not found")]
    NotFound(String),

    /// The source exists but could not be read.
    #[error("failed to read shader `{id}`: {source}")]
    Transport {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced while acquiring the GPU, registering drawables or rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No GPU backend is usable on this platform.
    #[error("GPU rendering is not supported on this platform")]
    UnsupportedPlatform,

    /// A backend exists, but an adapter/device/surface could not be obtained.
    #[error("failed to acquire GPU device: {0}")]
    DeviceAcquisitionFailed(String),

    /// Shader source for a drawable could not be fetched.
    #[error("failed to load shader for {label}")]
    ShaderLoadFailed {
        label: String,
        #[source]
        source: ShaderLoadError,
    },

    /// The device rejected a buffer, shader or pipeline description.
    #[error("invalid {what}: {reason}")]
    PipelineCreationFailed { what: String, reason: String },

    /// The output surface could not provide a frame.
    #[error("surface frame unavailable ({action:?}): {reason}")]
    Surface {
        action: SurfaceErrorAction,
        reason: String,
    },
}

impl RenderError {
    pub(crate) fn pipeline(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PipelineCreationFailed {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` when rendering cannot continue (the runtime should exit).
    ///
    /// Only surface errors are recoverable; every other variant is raised during
    /// startup or drawable registration and ends that operation.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Surface { action, .. } => *action == SurfaceErrorAction::Fatal,
            _ => true,
        }
    }
}
