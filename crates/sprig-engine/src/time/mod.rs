//! Frame timing. The runtime ticks one [`FrameClock`] per window before
//! every `App::on_frame`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
