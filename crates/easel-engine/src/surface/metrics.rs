use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::Window;

/// Display measurements reported by the windowing layer.
///
/// `pixel_density` is the physical/logical pixel ratio (winit's scale factor).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceMetrics {
    pub logical_width: f64,
    pub logical_height: f64,
    pub pixel_density: f64,
}

impl SurfaceMetrics {
    pub const fn new(logical_width: f64, logical_height: f64, pixel_density: f64) -> Self {
        Self {
            logical_width,
            logical_height,
            pixel_density,
        }
    }

    /// Reads the current inner size and scale factor of `window`.
    pub fn of_window(window: &Window) -> Self {
        Self::from_physical(window.inner_size(), window.scale_factor())
    }

    /// Metrics for a physical size reported by the window system at `density`.
    pub fn from_physical(size: PhysicalSize<u32>, density: f64) -> Self {
        let logical: LogicalSize<f64> = size.to_logical(sanitize_density(density));
        Self::new(logical.width, logical.height, density)
    }

    /// Density used for sizing; non-finite or non-positive values fall back to `1.0`.
    pub fn effective_density(&self) -> f64 {
        sanitize_density(self.pixel_density)
    }

    /// Backing-store size: `logical * density` per axis, rounded to whole pixels.
    pub fn backing_size(&self) -> PhysicalSize<u32> {
        let density = self.effective_density();
        PhysicalSize::new(
            to_pixels(self.logical_width * density),
            to_pixels(self.logical_height * density),
        )
    }

    /// Presented (layout) size: the logical size at 1:1 scale.
    pub fn presented_size(&self) -> LogicalSize<f64> {
        LogicalSize::new(
            self.logical_width.max(0.0),
            self.logical_height.max(0.0),
        )
    }
}

fn sanitize_density(density: f64) -> f64 {
    if density.is_finite() && density > 0.0 {
        density
    } else {
        1.0
    }
}

fn to_pixels(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
