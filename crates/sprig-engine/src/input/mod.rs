//! Keyboard, mouse and pointer input.
//!
//! The runtime converts winit events into [`InputEvent`]s and folds them into
//! the window's [`InputState`] (what is held now) and [`InputFrame`] (what
//! changed this frame). Nothing here exposes winit types.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, Modifiers, MouseButton};
