//! wgpu device and window surface: adapter selection, surface configuration,
//! frame acquire and present.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
