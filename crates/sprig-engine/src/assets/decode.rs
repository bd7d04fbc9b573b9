use std::fmt;
use std::path::{Path, PathBuf};

/// Why an image could not be turned into pixels.
#[derive(Debug)]
pub enum TextureLoadError {
    Io { path: PathBuf, source: std::io::Error },
    Decode { path: PathBuf, message: String },
    /// A decode worker panicked.
    Worker { path: PathBuf },
}

impl fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureLoadError::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            TextureLoadError::Decode { path, message } => {
                write!(f, "cannot decode '{}': {message}", path.display())
            }
            TextureLoadError::Worker { path } => {
                write!(f, "decode worker for '{}' panicked", path.display())
            }
        }
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureLoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Decoded pixel rows, top row first, tightly packed with `channels` bytes
/// per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Decodes an encoded image (PNG, JPEG, BMP, GIF, TGA), keeping 8-bit
    /// gray, gray+alpha, RGB and RGBA as they are. Other layouts are
    /// converted to RGBA8.
    pub fn from_bytes(bytes: &[u8], flip_vertically: bool) -> Result<Self, image::ImageError> {
        let mut img = image::load_from_memory(bytes)?;
        if flip_vertically {
            img = img.flipv();
        }

        let (width, height) = (img.width(), img.height());
        let (channels, pixels) = match img {
            image::DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            image::DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            image::DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// A `width` x `height` RGBA image filled with `rgba`.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            channels: 4,
            pixels: rgba.repeat(width as usize * height as usize),
        }
    }
}

/// Source of decoded images, keyed by path.
///
/// Decoders run on worker threads during [`super::TextureLoader::resolve`].
pub trait ImageDecoder {
    fn decode(&self, path: &Path, flip_vertically: bool) -> Result<DecodedImage, TextureLoadError>;
}

/// Reads and decodes image files from disk.
#[derive(Debug, Copy, Clone, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path, flip_vertically: bool) -> Result<DecodedImage, TextureLoadError> {
        let bytes = std::fs::read(path).map_err(|source| TextureLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        DecodedImage::from_bytes(&bytes, flip_vertically).map_err(|e| TextureLoadError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(img: image::DynamicImage) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// 1x2 RGB image: red on top, blue below.
    fn red_over_blue() -> Vec<u8> {
        let mut buf = image::RgbImage::new(1, 2);
        buf.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        buf.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        encode_png(image::DynamicImage::ImageRgb8(buf))
    }

    #[test]
    fn rgb_png_keeps_three_channels() {
        let img = DecodedImage::from_bytes(&red_over_blue(), false).unwrap();
        assert_eq!((img.width, img.height, img.channels), (1, 2, 3));
        assert_eq!(img.pixels, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn flip_reverses_rows() {
        let img = DecodedImage::from_bytes(&red_over_blue(), true).unwrap();
        assert_eq!(img.pixels, vec![0, 0, 255, 255, 0, 0]);
    }

    #[test]
    fn gray_png_keeps_one_channel() {
        let gray = image::GrayImage::from_pixel(2, 2, image::Luma([7]));
        let img = DecodedImage::from_bytes(&encode_png(image::DynamicImage::ImageLuma8(gray)), false)
            .unwrap();
        assert_eq!(img.channels, 1);
        assert_eq!(img.pixels, vec![7; 4]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(DecodedImage::from_bytes(b"definitely not an image", false).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FileDecoder
            .decode(Path::new("does/not/exist.png"), false)
            .unwrap_err();
        assert!(matches!(err, TextureLoadError::Io { .. }));
        assert!(err.to_string().contains("exist.png"));
    }

    #[test]
    fn solid_fills_every_pixel() {
        let img = DecodedImage::solid(2, 3, [1, 2, 3, 4]);
        assert_eq!(img.pixels.len(), 2 * 3 * 4);
        assert_eq!(&img.pixels[20..24], &[1, 2, 3, 4]);
    }
}
