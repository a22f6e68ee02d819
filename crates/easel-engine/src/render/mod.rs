//! Frame orchestration.
//!
//! [`Renderer`] owns the device, the output surface and the scene, and records
//! every frame as one render pass followed by one compute pass in a single
//! submission.

mod renderer;

pub use renderer::{Renderer, RendererConfig};
