//! Image decoding and deferred texture loading.

mod decode;
mod texture_loader;

pub use decode::{DecodedImage, FileDecoder, ImageDecoder, TextureLoadError};
pub use texture_loader::{LoadKey, PendingTexture, ResolveReport, TextureLoader};
