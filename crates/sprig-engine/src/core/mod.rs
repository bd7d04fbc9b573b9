//! The contract between the runtime and an application: the [`App`] trait and
//! the per-frame [`FrameCtx`] handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
