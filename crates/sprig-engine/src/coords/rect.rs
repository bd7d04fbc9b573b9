use super::Vec2;

/// Axis-aligned rectangle: `position` is the top-left corner.
///
/// Used both for screen-space areas (logical pixels) and for texture-atlas
/// source rectangles (normalized `0..1` UV space).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// The whole texture: `(0, 0)` to `(1, 1)`.
    #[inline]
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.position + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.position.is_finite() && self.size.is_finite()
    }

    /// Sub-rectangle `index` of a grid of `columns` x `rows` equal cells, in
    /// row-major order. Handy for addressing frames of a sprite sheet.
    ///
    /// Returns `None` when the grid is empty or `index` is out of range.
    pub fn grid_cell(self, columns: u32, rows: u32, index: u32) -> Option<Rect> {
        if columns == 0 || rows == 0 || index >= columns * rows {
            return None;
        }
        let cell = Vec2::new(self.size.x / columns as f32, self.size.y / rows as f32);
        let col = (index % columns) as f32;
        let row = (index / columns) as f32;
        Some(Rect::from_position_size(
            self.position + Vec2::new(col * cell.x, row * cell.y),
            cell,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(!Rect::unit().is_empty());
    }

    #[test]
    fn grid_cell_row_major() {
        let sheet = Rect::unit();
        let c = sheet.grid_cell(4, 2, 5).unwrap();
        assert_eq!(c, r(0.25, 0.5, 0.25, 0.5));
    }

    #[test]
    fn grid_cell_out_of_range() {
        assert!(Rect::unit().grid_cell(4, 2, 8).is_none());
        assert!(Rect::unit().grid_cell(0, 2, 0).is_none());
    }
}
