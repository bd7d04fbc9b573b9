//! Immediate-mode triangle batcher.
//!
//! Geometry is accumulated on the CPU as [`BatchVertex`]es and drawn with a
//! single draw call per flush. Textures are addressed per vertex through
//! [`crate::gfx::TextureRef`], so textured and untextured quads mix freely in
//! one batch.

mod batcher;
mod gpu;
mod quad;
mod vertex;

pub use batcher::{BatchConfig, BatchSubmit, Batcher};
pub use gpu::{ortho_projection, GpuBatch, SpriteBatcher};
pub use quad::{origin, Quad};
pub use vertex::BatchVertex;
