//! easel engine crate.
//!
//! A minimal wgpu 2D scaffold: a [`render::Renderer`] owns the device, the output
//! surface and an insertion-ordered scene of drawables, and records every frame
//! as one render pass followed by one compute pass in a single submission.

pub mod color;
pub mod device;
pub mod error;
pub mod scene;
pub mod shader;
pub mod shapes;
pub mod surface;

pub mod render;
pub mod diagnostics;

pub mod core;
pub mod logging;
pub mod window;
