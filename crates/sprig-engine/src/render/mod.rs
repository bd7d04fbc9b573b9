//! GPU rendering subsystem.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader maps it to clip space with an orthographic projection.

pub mod batch;
mod ctx;

pub use batch::{
    origin, ortho_projection, BatchConfig, BatchSubmit, BatchVertex, Batcher, GpuBatch, Quad,
    SpriteBatcher,
};
pub use ctx::{RenderCtx, RenderTarget};
