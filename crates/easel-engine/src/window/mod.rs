//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the renderer.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowRenderer};
