use std::path::Path;

use crate::assets::{DecodedImage, FileDecoder, ImageDecoder};

/// Pixel formats a [`Texture2D`] can be created with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFormat {
    R8,
    RG8,
    /// Stored as RGBA8 on the device; source data is expanded on upload.
    RGB8,
    RGBA8,
    RGBA16F,
    R32I,
    R32UI,
    D24S8,
}

impl TextureFormat {
    /// Format matching a decoded image's channel count.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(TextureFormat::R8),
            2 => Some(TextureFormat::RG8),
            3 => Some(TextureFormat::RGB8),
            4 => Some(TextureFormat::RGBA8),
            _ => None,
        }
    }

    pub fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TextureFormat::R8 => wgpu::TextureFormat::R8Unorm,
            TextureFormat::RG8 => wgpu::TextureFormat::Rg8Unorm,
            TextureFormat::RGB8 | TextureFormat::RGBA8 => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::RGBA16F => wgpu::TextureFormat::Rgba16Float,
            TextureFormat::R32I => wgpu::TextureFormat::R32Sint,
            TextureFormat::R32UI => wgpu::TextureFormat::R32Uint,
            TextureFormat::D24S8 => wgpu::TextureFormat::Depth24PlusStencil8,
        }
    }

    /// Bytes per pixel of caller-provided data.
    pub fn source_bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::RGB8 => 3,
            other => other.device_bytes_per_pixel(),
        }
    }

    /// Bytes per pixel as stored on the device.
    pub fn device_bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::RG8 => 2,
            TextureFormat::RGB8 | TextureFormat::RGBA8 => 4,
            TextureFormat::RGBA16F => 8,
            TextureFormat::R32I | TextureFormat::R32UI | TextureFormat::D24S8 => 4,
        }
    }

    #[inline]
    pub fn is_depth_stencil(self) -> bool {
        self == TextureFormat::D24S8
    }

    /// Whether the format can be sampled through a filtering float sampler.
    #[inline]
    pub fn is_filterable(self) -> bool {
        !matches!(self, TextureFormat::R32I | TextureFormat::R32UI | TextureFormat::D24S8)
    }
}

/// Expands tightly packed RGB8 rows into RGBA8 with opaque alpha.
pub(crate) fn expand_rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        out.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
    }
    out
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Device-resident 2D texture, single mip level.
///
/// An *empty* texture owns no device object; it is what failed loads and
/// default construction produce. Renderers treat it as "nothing to sample".
///
/// Dropping releases this wrapper's handle only. Views cloned from it (for
/// example by a `TextureRegistry` slot) keep the device texture alive until
/// they are released too.
pub struct Texture2D {
    gpu: Option<GpuTexture>,
    width: u32,
    height: u32,
    format: Option<TextureFormat>,
}

impl Default for Texture2D {
    fn default() -> Self {
        Self::empty()
    }
}

impl Texture2D {
    pub const fn empty() -> Self {
        Self {
            gpu: None,
            width: 0,
            height: 0,
            format: None,
        }
    }

    /// Allocates an uninitialized texture usable as a render attachment.
    pub fn attachment(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Self {
        Self::allocate(
            device,
            label,
            width,
            height,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    /// Creates a texture from tightly packed pixel rows in `format`.
    ///
    /// Returns an empty texture (with a warning) if the dimensions are zero
    /// or `pixels` is too short.
    pub fn from_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: &[u8],
    ) -> Self {
        let expected = width as usize * height as usize * format.source_bytes_per_pixel() as usize;
        if width == 0 || height == 0 || pixels.len() < expected {
            log::warn!(
                "Texture2D `{label}`: {}x{} {:?} needs {} bytes, got {}; left empty",
                width,
                height,
                format,
                expected,
                pixels.len()
            );
            return Self::empty();
        }

        let tex = Self::allocate(
            device,
            label,
            width,
            height,
            format,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );

        let expanded;
        let upload: &[u8] = if format == TextureFormat::RGB8 {
            expanded = expand_rgb_to_rgba(&pixels[..expected]);
            &expanded
        } else {
            &pixels[..expected]
        };

        if let Some(gpu) = &tex.gpu {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &gpu.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                upload,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * format.device_bytes_per_pixel()),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        tex
    }

    /// Uploads a decoded image, picking the format from its channel count.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &DecodedImage,
    ) -> Self {
        let Some(format) = TextureFormat::from_channels(image.channels) else {
            log::warn!(
                "Texture2D `{label}`: unsupported channel count {}; left empty",
                image.channels
            );
            return Self::empty();
        };
        Self::from_data(device, queue, label, image.width, image.height, format, &image.pixels)
    }

    /// Decodes and uploads the image at `path` on the calling thread.
    ///
    /// A missing or undecodable file yields an empty texture and a warning.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        flip_vertically: bool,
    ) -> Self {
        let path = path.as_ref();
        match FileDecoder.decode(path, flip_vertically) {
            Ok(image) => Self::from_image(device, queue, &path.display().to_string(), &image),
            Err(e) => {
                log::warn!("Texture2D: {e}");
                Self::empty()
            }
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: format.to_wgpu(),
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            gpu: Some(GpuTexture { texture, view }),
            width,
            height,
            format: Some(format),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gpu.is_none()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> Option<TextureFormat> {
        self.format
    }

    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.gpu.as_ref().map(|g| &g.view)
    }

    #[inline]
    pub fn raw(&self) -> Option<&wgpu::Texture> {
        self.gpu.as_ref().map(|g| &g.texture)
    }
}

impl std::fmt::Debug for Texture2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture2D")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("empty", &self.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts_map_to_formats() {
        assert_eq!(TextureFormat::from_channels(1), Some(TextureFormat::R8));
        assert_eq!(TextureFormat::from_channels(3), Some(TextureFormat::RGB8));
        assert_eq!(TextureFormat::from_channels(4), Some(TextureFormat::RGBA8));
        assert_eq!(TextureFormat::from_channels(0), None);
        assert_eq!(TextureFormat::from_channels(5), None);
    }

    #[test]
    fn rgb8_is_stored_as_rgba() {
        assert_eq!(TextureFormat::RGB8.source_bytes_per_pixel(), 3);
        assert_eq!(TextureFormat::RGB8.device_bytes_per_pixel(), 4);
        assert_eq!(TextureFormat::RGB8.to_wgpu(), TextureFormat::RGBA8.to_wgpu());
    }

    #[test]
    fn expand_rgb_adds_opaque_alpha() {
        let rgb = [1, 2, 3, 4, 5, 6];
        assert_eq!(expand_rgb_to_rgba(&rgb), vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn integer_and_depth_formats_are_not_filterable() {
        assert!(TextureFormat::RGBA8.is_filterable());
        assert!(TextureFormat::RGBA16F.is_filterable());
        assert!(!TextureFormat::R32UI.is_filterable());
        assert!(!TextureFormat::D24S8.is_filterable());
        assert!(TextureFormat::D24S8.is_depth_stencil());
    }

    // Dropping must not destroy the device texture while clones of its view
    // are still bound elsewhere; this only compiles without a `Drop` impl.
    fn fields_move_out_of_a_texture(t: Texture2D) -> Option<wgpu::TextureView> {
        let Texture2D { gpu, .. } = t;
        gpu.map(|g| g.view)
    }

    #[test]
    fn dropping_an_empty_texture_is_a_no_op() {
        let t = Texture2D::empty();
        assert!(fields_move_out_of_a_texture(t).is_none());
    }

    #[test]
    fn empty_texture_has_no_view() {
        let t = Texture2D::empty();
        assert!(t.is_empty());
        assert!(t.view().is_none());
        assert_eq!((t.width(), t.height(), t.format()), (0, 0, None));
    }
}
