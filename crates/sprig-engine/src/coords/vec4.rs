use super::Vec2;

/// Homogeneous 2D point as consumed by the batch vertex stage.
///
/// `z` is kept at 0 and `w` at 1 for everything the batcher emits; the
/// extra lanes exist so call sites can hand pre-transformed geometry to
/// `append_triangle` unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Lifts a 2D point to `(x, y, 0, 1)`.
    #[inline]
    pub const fn point(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    #[inline]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<Vec2> for Vec4 {
    #[inline]
    fn from(v: Vec2) -> Self {
        Vec4::point(v.x, v.y)
    }
}
