/// Straight-alpha RGBA color with `f32` components in `[0, 1]`.
///
/// Used for the render pass clear value; vertex colors are carried in the
/// vertex data itself.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit channels (`0`–`255`).
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps every channel to `[0, 1]`; non-finite channels become `0`.
    #[inline]
    pub fn clamped(self) -> Self {
        fn c(v: f32) -> f32 {
            if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
        }
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}

impl From<Color> for wgpu::Color {
    #[inline]
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_u8_scales_channels() {
        let c = Color::from_rgba_u8(0, 56, 101, 255);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 56.0 / 255.0).abs() < f32::EPSILON);
        assert!((c.b - 101.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn clamped_handles_out_of_range_and_nan() {
        let c = Color::new(-0.5, 2.0, f32::NAN, 0.5).clamped();
        assert_eq!(c, Color::new(0.0, 1.0, 0.0, 0.5));
        assert!(c.is_finite());
    }

    #[test]
    fn converts_to_wgpu_color() {
        let w: wgpu::Color = Color::new(0.25, 0.5, 0.75, 1.0).into();
        assert_eq!(w.r, 0.25);
        assert_eq!(w.g, 0.5);
        assert_eq!(w.b, 0.75);
        assert_eq!(w.a, 1.0);
    }
}
