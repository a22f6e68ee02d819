//! Output surface management.
//!
//! This module is responsible for:
//! - the [`SurfaceTarget`] contract implemented by presentable surfaces
//! - translating logical size + pixel density into backing-store pixels
//! - (re)configuring the surface when the display reports a resize

use winit::dpi::PhysicalSize;

use crate::device::GraphicsDevice;
use crate::error::RenderError;

mod manager;
mod metrics;

pub use manager::SurfaceManager;
pub use metrics::SurfaceMetrics;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// A presentable render target bound to one device.
pub trait SurfaceTarget<D: GraphicsDevice> {
    type Frame: SurfaceFrame<D>;

    /// Binds the surface to `device` with `format` at `size` backing pixels.
    ///
    /// Must be safe to call repeatedly (every resize reconfigures).
    fn configure(&mut self, device: &D, format: wgpu::TextureFormat, size: PhysicalSize<u32>);

    /// Acquires the image to render the next frame into.
    fn acquire(&mut self, device: &D) -> Result<Self::Frame, RenderError>;
}

/// One acquired output image.
pub trait SurfaceFrame<D: GraphicsDevice> {
    fn view(&self) -> &D::TextureView;

    /// Hands the image back for display. Call after the frame's commands are submitted.
    fn present(self);
}
