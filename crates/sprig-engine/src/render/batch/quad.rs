use crate::color::Color;
use crate::coords::{Rect, Vec2, Vec4};
use crate::gfx::TextureRef;

/// Normalized anchor points for [`Quad`] placement.
///
/// An origin of `(ox, oy)` places the quad so that the point
/// `position` lands at `ox * width, oy * height` inside it.
pub mod origin {
    use crate::coords::Vec2;

    pub const TOP_LEFT: Vec2 = Vec2::new(0.0, 0.0);
    pub const TOP_RIGHT: Vec2 = Vec2::new(1.0, 0.0);
    pub const BOTTOM_LEFT: Vec2 = Vec2::new(0.0, 1.0);
    pub const BOTTOM_RIGHT: Vec2 = Vec2::new(1.0, 1.0);
    pub const CENTER: Vec2 = Vec2::new(0.5, 0.5);
}

/// An axis-aligned, optionally textured rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
    /// Source rectangle in normalized texture coordinates.
    pub uv: Rect,
    pub texture: TextureRef,
}

impl Quad {
    pub fn colored(position: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            position,
            size,
            color,
            uv: Rect::unit(),
            texture: TextureRef::NONE,
        }
    }

    /// White-tinted quad sampling `uv` of `texture`.
    pub fn textured(position: Vec2, size: Vec2, texture: TextureRef, uv: Rect) -> Self {
        Self {
            position,
            size,
            color: crate::color::WHITE,
            uv,
            texture,
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left, with
    /// the quad shifted by `origin * size`.
    pub fn corners(&self, origin: Vec2) -> [Vec4; 4] {
        let p = self.position - self.size.scale(origin);
        let Vec2 { x: w, y: h } = self.size;
        [
            Vec4::point(p.x, p.y),
            Vec4::point(p.x + w, p.y),
            Vec4::point(p.x + w, p.y + h),
            Vec4::point(p.x, p.y + h),
        ]
    }

    /// Texture coordinates matching [`Quad::corners`].
    pub fn uv_corners(&self) -> [Vec2; 4] {
        let min = self.uv.min();
        let max = self.uv.max();
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(v: Vec4) -> (f32, f32) {
        (v.x, v.y)
    }

    #[test]
    fn top_left_origin_keeps_position() {
        let q = Quad::colored(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0), crate::color::RED);
        let c = q.corners(origin::TOP_LEFT);
        assert_eq!(c.map(xy), [(10.0, 20.0), (14.0, 20.0), (14.0, 22.0), (10.0, 22.0)]);
    }

    #[test]
    fn center_origin_shifts_by_half_size() {
        let q = Quad::colored(Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0), crate::color::RED);
        assert_eq!(xy(q.corners(origin::CENTER)[0]), (75.0, 75.0));
    }

    #[test]
    fn bottom_right_origin_ends_at_position() {
        let q = Quad::colored(Vec2::new(8.0, 8.0), Vec2::new(8.0, 4.0), crate::color::RED);
        let c = q.corners(origin::BOTTOM_RIGHT);
        assert_eq!(xy(c[0]), (0.0, 4.0));
        assert_eq!(xy(c[2]), (8.0, 8.0));
    }

    #[test]
    fn uv_corners_follow_source_rect() {
        let q = Quad::textured(
            Vec2::zero(),
            Vec2::new(16.0, 16.0),
            TextureRef::from_slot(0),
            Rect::new(0.25, 0.5, 0.25, 0.5),
        );
        assert_eq!(
            q.uv_corners(),
            [
                Vec2::new(0.25, 0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(0.5, 1.0),
                Vec2::new(0.25, 1.0),
            ]
        );
    }

    #[test]
    fn corners_are_points_in_the_z0_plane() {
        let q = Quad::colored(Vec2::zero(), Vec2::new(1.0, 1.0), crate::color::RED);
        for c in q.corners(origin::TOP_LEFT) {
            assert_eq!((c.z, c.w), (0.0, 1.0));
        }
    }
}
