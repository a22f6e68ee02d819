/// How [`WgpuProvider`](super::WgpuProvider) acquires a device and configures
/// the window surface.
///
/// Acquisition runs in order: backends are narrowed to what this build can
/// use, one adapter compatible with the window surface is requested, a device
/// is opened with the required features and limits, and the surface format and
/// alpha mode are picked from the surface's capabilities. Having no usable
/// backend is [`UnsupportedPlatform`](crate::error::RenderError::UnsupportedPlatform);
/// every later failure is `DeviceAcquisitionFailed`.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may search.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Pick the first sRGB format the surface offers, otherwise its first format.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Used only when the surface lists it; otherwise the surface's first mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Requested from the adapter as-is. A set the adapter lacks fails
    /// acquisition rather than degrading.
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the surface may queue ahead of presentation.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Requested backends that this build compiled in, or `None` when there are none.
    pub(crate) fn usable_backends(&self) -> Option<wgpu::Backends> {
        let usable = self.backends & wgpu::Instance::enabled_backend_features();
        (!usable.is_empty()).then_some(usable)
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_requested_backends_means_no_platform() {
        let init = GpuInit {
            backends: wgpu::Backends::empty(),
            ..GpuInit::default()
        };
        assert_eq!(init.usable_backends(), None);
    }

    #[test]
    fn usable_backends_stay_within_the_request() {
        let init = GpuInit {
            backends: wgpu::Backends::NOOP,
            ..GpuInit::default()
        };
        // Test builds enable the noop backend.
        assert_eq!(init.usable_backends(), Some(wgpu::Backends::NOOP));
    }
}
