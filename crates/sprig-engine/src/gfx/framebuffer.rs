use crate::color::Color;

use super::texture::{Texture2D, TextureFormat};

/// Offscreen render target made of color attachments and an optional
/// depth-stencil attachment, all sharing one size.
///
/// Attachments are (re)allocated by [`Framebuffer::resize`]; until the first
/// resize the framebuffer only records the requested formats.
#[derive(Debug, Default)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    color_formats: Vec<TextureFormat>,
    wants_depth_stencil: bool,
    color: Vec<Texture2D>,
    depth_stencil: Option<Texture2D>,
    warned_incomplete: bool,
}

/// Sizes and attachment counts that decide completeness.
#[derive(Debug, Copy, Clone, Default)]
struct Completeness {
    width: u32,
    height: u32,
    requested_color: usize,
    allocated_color: usize,
    wants_depth_stencil: bool,
    has_depth_stencil: bool,
}

impl Completeness {
    fn is_complete(self) -> bool {
        self.width > 0
            && self.height > 0
            && (self.allocated_color > 0 || self.has_depth_stencil)
            && self.allocated_color == self.requested_color
            && self.has_depth_stencil == self.wants_depth_stencil
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a color attachment of `format`. Depth formats are rejected.
    pub fn add_attachment(&mut self, device: &wgpu::Device, format: TextureFormat) {
        if format.is_depth_stencil() {
            log::warn!("Framebuffer: {format:?} is not a color format; use add_depth_stencil");
            return;
        }
        self.color_formats.push(format);
        if self.is_allocated() {
            let index = self.color.len();
            self.color.push(Texture2D::attachment(
                device,
                &format!("sprig framebuffer color {index}"),
                self.width,
                self.height,
                format,
            ));
        }
    }

    /// Adds a D24S8 depth-stencil attachment, replacing any previous one.
    pub fn add_depth_stencil(&mut self, device: &wgpu::Device) {
        self.wants_depth_stencil = true;
        if self.is_allocated() {
            self.depth_stencil = Some(self.depth_texture(device));
        }
    }

    /// Reallocates every attachment at `width` x `height`. Zero sizes are
    /// ignored since wgpu cannot create empty textures.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Framebuffer: ignoring resize to {width}x{height}");
            return;
        }
        if self.is_allocated() && (self.width, self.height) == (width, height) {
            return;
        }

        self.width = width;
        self.height = height;

        self.color = self
            .color_formats
            .iter()
            .enumerate()
            .map(|(i, &format)| {
                Texture2D::attachment(
                    device,
                    &format!("sprig framebuffer color {i}"),
                    width,
                    height,
                    format,
                )
            })
            .collect();

        self.depth_stencil = self.wants_depth_stencil.then(|| self.depth_texture(device));

        self.note_incomplete();
    }

    /// Warns the first time the framebuffer is found incomplete and re-arms
    /// once it becomes complete. Returns whether a warning was logged.
    fn note_incomplete(&mut self) -> bool {
        if self.is_complete() {
            self.warned_incomplete = false;
            return false;
        }
        if self.warned_incomplete {
            return false;
        }
        self.warned_incomplete = true;
        log::warn!(
            "Framebuffer: incomplete after resize to {}x{} ({} of {} color attachments, depth-stencil {})",
            self.width,
            self.height,
            self.color.len(),
            self.color_formats.len(),
            if self.depth_stencil.is_some() { "present" } else { "absent" },
        );
        true
    }

    fn depth_texture(&self, device: &wgpu::Device) -> Texture2D {
        Texture2D::attachment(
            device,
            "sprig framebuffer depth-stencil",
            self.width,
            self.height,
            TextureFormat::D24S8,
        )
    }

    fn is_allocated(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Allocated, has at least one attachment, and every requested
    /// attachment exists.
    pub fn is_complete(&self) -> bool {
        self.completeness().is_complete()
    }

    fn completeness(&self) -> Completeness {
        Completeness {
            width: self.width,
            height: self.height,
            requested_color: self.color_formats.len(),
            allocated_color: self.color.len(),
            wants_depth_stencil: self.wants_depth_stencil,
            has_depth_stencil: self.depth_stencil.is_some(),
        }
    }

    /// Begins a render pass on this framebuffer with the given load ops and
    /// a full-size viewport. Returns `None` if the framebuffer is incomplete.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_load: wgpu::LoadOp<wgpu::Color>,
        depth_load: wgpu::LoadOp<f32>,
        stencil_load: wgpu::LoadOp<u32>,
    ) -> Option<wgpu::RenderPass<'e>> {
        if !self.is_complete() {
            log::warn!("Framebuffer: render pass on incomplete framebuffer skipped");
            return None;
        }

        let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment<'_>>> = self
            .color
            .iter()
            .filter_map(Texture2D::view)
            .map(|view| {
                Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })
            })
            .collect();

        let depth_stencil_attachment = self
            .depth_stencil
            .as_ref()
            .and_then(Texture2D::view)
            .map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: stencil_load,
                    store: wgpu::StoreOp::Store,
                }),
            });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprig framebuffer pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_viewport(0.0, 0.0, self.width as f32, self.height as f32, 0.0, 1.0);
        Some(pass)
    }

    /// Clears every color attachment to `color`, leaving depth untouched.
    pub fn clear_color(&self, encoder: &mut wgpu::CommandEncoder, color: Color) {
        let _ = self.begin_pass(
            encoder,
            wgpu::LoadOp::Clear(color.to_wgpu()),
            wgpu::LoadOp::Load,
            wgpu::LoadOp::Load,
        );
    }

    pub fn clear_depth_stencil(&self, encoder: &mut wgpu::CommandEncoder, depth: f32, stencil: u32) {
        let _ = self.begin_pass(
            encoder,
            wgpu::LoadOp::Load,
            wgpu::LoadOp::Clear(depth),
            wgpu::LoadOp::Clear(stencil),
        );
    }

    /// Clears color, depth and stencil in one pass.
    pub fn clear_attachments(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: Color,
        depth: f32,
        stencil: u32,
    ) {
        let _ = self.begin_pass(
            encoder,
            wgpu::LoadOp::Clear(color.to_wgpu()),
            wgpu::LoadOp::Clear(depth),
            wgpu::LoadOp::Clear(stencil),
        );
    }

    /// Opaque black, depth 1.0, stencil 0.
    pub fn clear_default(&self, encoder: &mut wgpu::CommandEncoder) {
        self.clear_attachments(encoder, crate::color::BLACK, 1.0, 0);
    }

    #[inline]
    pub fn color_attachments(&self) -> &[Texture2D] {
        &self.color
    }

    #[inline]
    pub fn depth_stencil_attachment(&self) -> Option<&Texture2D> {
        self.depth_stencil.as_ref()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_framebuffer_is_incomplete() {
        let fb = Framebuffer::new();
        assert!(!fb.is_complete());
        assert_eq!((fb.width(), fb.height()), (0, 0));
        assert!(fb.color_attachments().is_empty());
        assert!(fb.depth_stencil_attachment().is_none());
    }

    fn sized(width: u32, height: u32) -> Completeness {
        Completeness {
            width,
            height,
            ..Completeness::default()
        }
    }

    #[test]
    fn attachments_decide_completeness() {
        let color = Completeness { requested_color: 1, allocated_color: 1, ..sized(8, 8) };
        assert!(color.is_complete());

        let depth_only = Completeness {
            wants_depth_stencil: true,
            has_depth_stencil: true,
            ..sized(8, 8)
        };
        assert!(depth_only.is_complete());

        assert!(!sized(8, 8).is_complete(), "no attachments");
    }

    #[test]
    fn missing_requested_attachments_are_incomplete() {
        let color = Completeness { requested_color: 1, allocated_color: 1, ..sized(8, 8) };
        let no_depth = Completeness { wants_depth_stencil: true, ..color };
        assert!(!no_depth.is_complete());

        let short = Completeness { requested_color: 2, ..color };
        assert!(!short.is_complete());
    }

    #[test]
    fn zero_size_is_incomplete() {
        let color = Completeness { requested_color: 1, allocated_color: 1, ..sized(0, 8) };
        assert!(!color.is_complete());
        assert!(!Completeness { height: 0, ..sized(8, 8) }.is_complete());
    }

    #[test]
    fn incomplete_state_is_logged_once_until_complete() {
        let mut fb = Framebuffer {
            width: 4,
            height: 4,
            color_formats: vec![TextureFormat::RGBA8],
            ..Framebuffer::default()
        };
        assert!(fb.note_incomplete());
        assert!(!fb.note_incomplete(), "repeat resizes stay quiet");

        fb.color.push(Texture2D::empty());
        assert!(fb.is_complete());
        assert!(!fb.note_incomplete());

        fb.color.clear();
        assert!(fb.note_incomplete(), "warns again after recovering");
    }
}
