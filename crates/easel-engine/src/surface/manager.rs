use winit::dpi::{LogicalSize, PhysicalSize};

use crate::device::GraphicsDevice;
use crate::error::RenderError;

use super::{SurfaceMetrics, SurfaceTarget};

/// Owns the output surface and its sizing state.
///
/// Backing and presented sizes are tracked independently: the backing store is
/// `logical * density` pixels, the presented size stays at logical scale.
pub struct SurfaceManager<S> {
    target: S,
    format: Option<wgpu::TextureFormat>,
    backing: PhysicalSize<u32>,
    presented: LogicalSize<f64>,
}

impl<S> SurfaceManager<S> {
    /// Wraps `target` and performs the initial sizing pass.
    ///
    /// The surface is not configured until [`configure`](Self::configure) is called.
    pub fn new(target: S, metrics: SurfaceMetrics) -> Self {
        Self {
            target,
            format: None,
            backing: metrics.backing_size(),
            presented: metrics.presented_size(),
        }
    }

    pub fn format(&self) -> Option<wgpu::TextureFormat> {
        self.format
    }

    /// Current backing-store size in physical pixels.
    pub fn backing_size(&self) -> PhysicalSize<u32> {
        self.backing
    }

    /// Current presented size in logical pixels.
    pub fn presented_size(&self) -> LogicalSize<f64> {
        self.presented
    }

    /// `true` once configured with a non-zero backing store.
    pub fn is_renderable(&self) -> bool {
        self.format.is_some() && self.backing.width > 0 && self.backing.height > 0
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut S {
        &mut self.target
    }

    /// Binds the surface to `device` with `format`.
    ///
    /// Idempotent: calling it again re-applies the same configuration.
    /// wgpu does not support configuring a surface with a 0x0 size; in that case
    /// configuration is deferred until the next non-empty resize.
    pub fn configure<D>(&mut self, device: &D, format: wgpu::TextureFormat)
    where
        D: GraphicsDevice,
        S: SurfaceTarget<D>,
    {
        self.format = Some(format);
        self.apply(device);
    }

    /// Recomputes backing and presented sizes from `metrics` and reconfigures the
    /// surface.
    ///
    /// Returns [`is_renderable`](Self::is_renderable) after the resize.
    pub fn resize<D>(&mut self, device: &D, metrics: SurfaceMetrics) -> bool
    where
        D: GraphicsDevice,
        S: SurfaceTarget<D>,
    {
        self.backing = metrics.backing_size();
        self.presented = metrics.presented_size();

        log::debug!(
            "surface resized: backing {}x{} px, presented {}x{} logical",
            self.backing.width,
            self.backing.height,
            self.presented.width,
            self.presented.height
        );

        self.apply(device);
        self.is_renderable()
    }

    /// Acquires the next output frame.
    pub fn acquire<D>(&mut self, device: &D) -> Result<<S as SurfaceTarget<D>>::Frame, RenderError>
    where
        D: GraphicsDevice,
        S: SurfaceTarget<D>,
    {
        self.target.acquire(device)
    }

    fn apply<D>(&mut self, device: &D)
    where
        D: GraphicsDevice,
        S: SurfaceTarget<D>,
    {
        let Some(format) = self.format else { return };
        if self.backing.width == 0 || self.backing.height == 0 {
            return;
        }
        self.target.configure(device, format, self.backing);
    }
}
