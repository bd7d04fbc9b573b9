//! Sprig engine crate.
//!
//! A small 2D rendering runtime: one window, a wgpu device, a triangle
//! batcher that addresses textures per vertex, and deferred texture loading.
//!
//! Typical frame:
//! 1. `FrameCtx::render` clears the surface and hands out a `RenderTarget`
//! 2. `SpriteBatcher::begin` / `append_*` / `end` draw into it
//! 3. the runtime presents the frame

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod color;
pub mod gfx;
pub mod render;
pub mod assets;
