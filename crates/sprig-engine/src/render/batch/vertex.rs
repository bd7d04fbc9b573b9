use bytemuck::{Pod, Zeroable};

use crate::color::Color;
use crate::coords::{Vec2, Vec4};
use crate::gfx::TextureRef;

/// One vertex as uploaded to the batch vertex buffer.
///
/// The texture reference is split into `[hi, lo]` u32 halves so it survives
/// the trip through vertex attributes exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct BatchVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub texture: [u32; 2],
}

impl BatchVertex {
    /// Byte stride of one vertex.
    pub const STRIDE: u64 = std::mem::size_of::<BatchVertex>() as u64;

    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x4, // color
        2 => Float32x2, // uv
        3 => Uint32x2   // texture [hi, lo]
    ];

    #[inline]
    pub fn new(position: Vec4, color: Color, uv: Vec2, texture: TextureRef) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            uv: uv.to_array(),
            texture: texture.to_lanes(),
        }
    }

    #[inline]
    pub fn texture_ref(&self) -> TextureRef {
        TextureRef::from_lanes(self.texture)
    }

    /// Static layout matching the batch shader's inputs.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_48_bytes() {
        assert_eq!(BatchVertex::STRIDE, 48);
        assert_eq!(BatchVertex::layout().array_stride, 48);
    }

    #[test]
    fn texture_ref_round_trips_through_lanes() {
        let r = TextureRef(0xDEAD_BEEF_0000_0007);
        let v = BatchVertex::new(Vec4::point(1.0, 2.0), Color::new(1.0, 1.0, 1.0, 1.0), Vec2::zero(), r);
        assert_eq!(v.texture, [0xDEAD_BEEF, 7]);
        assert_eq!(v.texture_ref(), r);
    }
}
