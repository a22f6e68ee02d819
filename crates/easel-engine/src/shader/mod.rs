//! Shader source loading.
//!
//! Drawables fetch WGSL through a [`ShaderLoader`] during `create_shaders`. The
//! loader is object-safe so the renderer can own one behind `Box<dyn ShaderLoader>`.

use std::future::Future;
use std::pin::Pin;

use crate::error::ShaderLoadError;

mod embedded;
mod file;

pub use embedded::EmbeddedShaderLoader;
pub use file::FileShaderLoader;

/// Future returned by [`ShaderLoader::load`].
pub type ShaderFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ShaderLoadError>> + 'a>>;

/// Resolves a shader id (e.g. `"standard2d.wgsl"`) to WGSL source text.
pub trait ShaderLoader {
    fn load<'a>(&'a self, id: &'a str) -> ShaderFuture<'a>;
}
