//! Concrete drawables.
//!
//! Extending the scene:
//! - add a new shape module here
//! - implement `Drawable` + `DrawableInit` for it
//! - ship its WGSL under `shapes/shaders` and register it in
//!   `EmbeddedShaderLoader::builtin`

pub mod standard2d;

pub use standard2d::{ColoredVertex, Standard2DVertexObject};
