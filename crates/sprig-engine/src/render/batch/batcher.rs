use crate::color::Color;
use crate::coords::{Vec2, Vec4, Viewport};
use crate::gfx::TextureRef;

use super::quad::Quad;
use super::vertex::BatchVertex;

/// Batcher sizing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Triangles held before an implicit flush.
    pub max_triangles: usize,
    /// Logical coordinate space mapped onto the target by the projection.
    pub logical_size: Viewport,
    /// Binding array slots available for resident textures.
    pub texture_slots: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_triangles: 100_000,
            logical_size: Viewport::new(1920.0, 1080.0),
            texture_slots: 256,
        }
    }
}

impl BatchConfig {
    #[inline]
    pub fn max_vertices(&self) -> usize {
        self.max_triangles.max(1) * 3
    }
}

/// Receives the used prefix of the batch on every flush.
///
/// Implementations upload the vertices and draw them as one triangle list.
/// The slice is only valid for the duration of the call.
pub trait BatchSubmit {
    fn submit(&mut self, vertices: &[BatchVertex]);
}

/// Accumulates triangles in a fixed host buffer and hands them to a
/// [`BatchSubmit`] sink in one draw per flush.
///
/// Usage per frame: [`start`](Batcher::start), any number of `append_*`
/// calls, then [`end`](Batcher::end). When the buffer fills up mid-frame the
/// batcher flushes and restarts on its own.
pub struct Batcher<S> {
    vertices: Box<[BatchVertex]>,
    used: usize,
    triangles: usize,
    flushes: u64,
    sink: S,
}

impl<S: BatchSubmit> Batcher<S> {
    pub fn with_sink(config: &BatchConfig, sink: S) -> Self {
        Self {
            vertices: vec![BatchVertex::default(); config.max_vertices()].into_boxed_slice(),
            used: 0,
            triangles: 0,
            flushes: 0,
            sink,
        }
    }

    /// Discards pending geometry and starts a new batch.
    #[inline]
    pub fn start(&mut self) {
        self.used = 0;
        self.triangles = 0;
    }

    /// Submits the used prefix of the buffer. Does not reset it; call
    /// [`start`](Batcher::start) before appending the next batch.
    pub fn flush(&mut self) {
        if self.used == 0 {
            return;
        }
        self.sink.submit(&self.vertices[..self.used]);
        self.flushes += 1;
    }

    /// Ends the batch (same as [`flush`](Batcher::flush)).
    #[inline]
    pub fn end(&mut self) {
        self.flush();
    }

    pub fn append_triangle(
        &mut self,
        positions: [Vec4; 3],
        colors: [Color; 3],
        uvs: [Vec2; 3],
        texture: TextureRef,
    ) {
        if self.used + 3 > self.vertices.len() {
            log::trace!("Batcher: buffer full after {} triangles, flushing", self.triangles);
            self.flush();
            self.start();
        }

        for i in 0..3 {
            self.vertices[self.used + i] = BatchVertex::new(positions[i], colors[i], uvs[i], texture);
        }
        self.used += 3;
        self.triangles += 1;
    }

    /// Appends a quad with explicit corners as the triangles `(0, 1, 2)` and
    /// `(0, 2, 3)`.
    pub fn append_quad_ex(
        &mut self,
        positions: [Vec4; 4],
        colors: [Color; 4],
        uvs: [Vec2; 4],
        texture: TextureRef,
    ) {
        let [p1, p2, p3, p4] = positions;
        let [c1, c2, c3, c4] = colors;
        let [t1, t2, t3, t4] = uvs;
        self.append_triangle([p1, p2, p3], [c1, c2, c3], [t1, t2, t3], texture);
        self.append_triangle([p1, p3, p4], [c1, c3, c4], [t1, t3, t4], texture);
    }

    /// Appends `quad` anchored at `origin` (see [`super::origin`]).
    pub fn append_quad(&mut self, quad: &Quad, origin: Vec2) {
        self.append_quad_ex(
            quad.corners(origin),
            [quad.color; 4],
            quad.uv_corners(),
            quad.texture,
        );
    }

    /// Appends an untextured rectangle.
    pub fn append_rect(&mut self, position: Vec2, size: Vec2, color: Color, origin: Vec2) {
        self.append_quad(&Quad::colored(position, size, color), origin);
    }

    /// Vertices written since the last [`start`](Batcher::start).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles
    }

    /// Vertex capacity of the host buffer.
    #[inline]
    pub fn capacity_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of non-empty flushes since construction.
    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// Pending vertices, in append order.
    #[inline]
    pub fn vertices(&self) -> &[BatchVertex] {
        &self.vertices[..self.used]
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::render::batch::origin;

    /// Records every submission.
    #[derive(Default)]
    struct Recorder {
        submissions: Vec<Vec<BatchVertex>>,
    }

    impl BatchSubmit for Recorder {
        fn submit(&mut self, vertices: &[BatchVertex]) {
            self.submissions.push(vertices.to_vec());
        }
    }

    fn batcher(max_triangles: usize) -> Batcher<Recorder> {
        let config = BatchConfig {
            max_triangles,
            ..BatchConfig::default()
        };
        Batcher::with_sink(&config, Recorder::default())
    }

    fn tri() -> ([Vec4; 3], [Color; 3], [Vec2; 3]) {
        (
            [Vec4::point(0.0, 0.0), Vec4::point(1.0, 0.0), Vec4::point(0.0, 1.0)],
            [color::RED; 3],
            [Vec2::zero(); 3],
        )
    }

    #[test]
    fn quads_and_triangles_count_vertices() {
        let mut b = batcher(64);
        b.start();
        for _ in 0..3 {
            b.append_rect(Vec2::zero(), Vec2::new(1.0, 1.0), color::RED, origin::TOP_LEFT);
        }
        let (p, c, t) = tri();
        b.append_triangle(p, c, t, TextureRef::NONE);

        assert_eq!(b.vertex_count(), 3 * 6 + 3);
        assert_eq!(b.triangle_count(), 7);
    }

    #[test]
    fn end_submits_used_prefix_once() {
        let mut b = batcher(64);
        b.start();
        b.append_rect(Vec2::zero(), Vec2::new(2.0, 2.0), color::BLUE, origin::TOP_LEFT);
        b.end();

        let subs = &b.sink().submissions;
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].len(), 6);
        assert_eq!(std::mem::size_of_val(subs[0].as_slice()), 6 * 48);
    }

    #[test]
    fn overflow_flushes_exactly_once_and_restarts() {
        let mut b = batcher(2);
        b.start();
        let (p, c, t) = tri();
        b.append_triangle(p, c, t, TextureRef::NONE);
        b.append_triangle(p, c, t, TextureRef::NONE);
        assert!(b.sink().submissions.is_empty());

        b.append_triangle(p, c, t, TextureRef::NONE);
        assert_eq!(b.sink().submissions.len(), 1);
        assert_eq!(b.sink().submissions[0].len(), 6);
        assert_eq!(b.vertex_count(), 3);
        assert_eq!(b.triangle_count(), 1);
    }

    #[test]
    fn empty_flush_submits_nothing() {
        let mut b = batcher(8);
        b.start();
        b.end();
        b.flush();
        assert!(b.sink().submissions.is_empty());
        assert_eq!(b.flush_count(), 0);
    }

    #[test]
    fn start_discards_pending_geometry() {
        let mut b = batcher(8);
        b.start();
        b.append_rect(Vec2::zero(), Vec2::new(1.0, 1.0), color::RED, origin::TOP_LEFT);
        b.start();
        assert_eq!(b.vertex_count(), 0);
        b.end();
        assert!(b.sink().submissions.is_empty());
    }

    #[test]
    fn zero_size_quad_is_still_emitted() {
        let mut b = batcher(8);
        b.start();
        b.append_rect(Vec2::new(5.0, 5.0), Vec2::zero(), color::RED, origin::CENTER);
        assert_eq!(b.vertex_count(), 6);
        assert!(b.vertices().iter().all(|v| v.position[..2] == [5.0, 5.0]));

        b.append_rect(Vec2::zero(), Vec2::new(2.0, 2.0), color::RED, origin::TOP_LEFT);
        assert_eq!(b.vertex_count(), 12);
        assert_eq!(b.vertices()[7].position[..2], [2.0, 0.0]);
    }

    #[test]
    fn zero_max_triangles_still_holds_one_triangle() {
        let b = batcher(0);
        assert_eq!(b.capacity_vertices(), 3);
    }

    #[test]
    fn quad_splits_into_two_triangles_sharing_the_diagonal() {
        let mut b = batcher(8);
        b.start();
        let quad = Quad::colored(Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0), color::RED);
        b.append_quad(&quad, origin::CENTER);

        let xy: Vec<[f32; 2]> = b.vertices().iter().map(|v| [v.position[0], v.position[1]]).collect();
        assert_eq!(
            xy,
            vec![
                [75.0, 75.0],
                [125.0, 75.0],
                [125.0, 125.0],
                [75.0, 75.0],
                [125.0, 125.0],
                [75.0, 125.0],
            ]
        );
    }

    #[test]
    fn texture_ref_reaches_every_vertex() {
        let mut b = batcher(8);
        b.start();
        let r = TextureRef::from_slot(3);
        let quad = Quad::textured(Vec2::zero(), Vec2::new(8.0, 8.0), r, crate::coords::Rect::unit());
        b.append_quad(&quad, origin::TOP_LEFT);
        assert!(b.vertices().iter().all(|v| v.texture == [0, 4]));
        assert!(b.vertices().iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
    }
}
