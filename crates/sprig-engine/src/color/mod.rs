//! Color representation shared by call sites and the batcher.
//!
//! Colors are straight (non-premultiplied) RGBA in `[0, 1]`. The batch
//! pipeline blends with standard source-over alpha.

mod named;

pub use named::*;

use crate::coords::Vec4;

/// Straight-alpha RGBA color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Unpacks a `0xRRGGBBAA` value.
    #[inline]
    pub const fn from_rgba_u32(rgba: u32) -> Self {
        Self::new(
            ((rgba >> 24) & 0xFF) as f32 / 255.0,
            ((rgba >> 16) & 0xFF) as f32 / 255.0,
            ((rgba >> 8) & 0xFF) as f32 / 255.0,
            (rgba & 0xFF) as f32 / 255.0,
        )
    }

    /// Unpacks a `0xRRGGBBxx` value, ignoring the low byte in favour of `alpha`.
    #[inline]
    pub const fn from_rgb_u32(rgbx: u32, alpha: f32) -> Self {
        let c = Self::from_rgba_u32(rgbx);
        Self::new(c.r, c.g, c.b, alpha)
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Packs back into `0xRRGGBBAA`, clamping and rounding each channel.
    pub fn to_rgba_u32(self) -> u32 {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.r) << 24) | (q(self.g) << 16) | (q(self.b) << 8) | q(self.a)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Color for `wgpu` clear operations.
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<Color> for Vec4 {
    #[inline]
    fn from(c: Color) -> Self {
        Vec4::new(c.r, c.g, c.b, c.a)
    }
}

impl From<u32> for Color {
    #[inline]
    fn from(rgba: u32) -> Self {
        Color::from_rgba_u32(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_channels_in_rrggbbaa_order() {
        let c = Color::from_rgba_u32(0xFF00_80FF);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn explicit_alpha_overrides_low_byte() {
        let c = Color::from_rgb_u32(0x0000_FF00, 0.5);
        assert_eq!(c, Color::new(0.0, 0.0, 1.0, 0.5));
    }

    #[test]
    fn pack_unpack_is_stable_for_bytes() {
        for v in [0x0000_0000u32, 0xFFFF_FFFF, 0x6495_EDFF, 0x1234_5678] {
            assert_eq!(Color::from_rgba_u32(v).to_rgba_u32(), v);
        }
    }

    #[test]
    fn named_palette_matches_hex() {
        assert_eq!(CORNFLOWER_BLUE.to_rgba_u32(), 0x6495_EDFF);
        assert_eq!(WHITE, Color::new(1.0, 1.0, 1.0, 1.0));
    }
}
