//! Coordinate and geometry types shared by the batcher and call sites.
//!
//! Canonical CPU space:
//! - Logical pixels of the batcher's fixed resolution
//! - Origin top-left
//! - +X right, +Y down
//!
//! The batch shader converts to NDC with an orthographic projection.

mod rect;
mod vec2;
mod vec4;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use vec4::Vec4;
pub use viewport::Viewport;
