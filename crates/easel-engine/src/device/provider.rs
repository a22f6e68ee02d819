use crate::diagnostics::PlatformInfo;
use crate::error::RenderError;
use crate::surface::SurfaceTarget;

use super::GraphicsDevice;

/// Everything the renderer needs from a successful acquisition.
pub struct Acquired<D, S> {
    pub device: D,
    pub surface: S,
    /// Pixel format the surface prefers; the renderer configures the surface with it.
    pub preferred_format: wgpu::TextureFormat,
    pub platform: PlatformInfo,
}

/// Source of a device + output surface pair (adapter/device request).
///
/// Fails with [`RenderError::UnsupportedPlatform`] when no GPU capability exists and
/// [`RenderError::DeviceAcquisitionFailed`] when one exists but cannot be opened.
#[allow(async_fn_in_trait)]
pub trait DeviceProvider {
    type Device: GraphicsDevice;
    type Surface: SurfaceTarget<Self::Device>;

    async fn acquire(self) -> Result<Acquired<Self::Device, Self::Surface>, RenderError>;
}
