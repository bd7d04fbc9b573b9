//! Texture residency: maps textures to slots of a sampled-texture binding
//! array so that vertices can address them by a plain integer.

use super::texture::Texture2D;

/// 64-bit texture reference carried per vertex.
///
/// `0` means "untextured". A resident texture in slot `n` has the reference
/// `n + 1`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextureRef(pub u64);

impl TextureRef {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_slot(slot: u32) -> Self {
        Self(slot as u64 + 1)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Binding array slot, or `None` for [`TextureRef::NONE`] and references
    /// that do not fit a 32-bit slot index.
    #[inline]
    pub fn slot(self) -> Option<u32> {
        self.0.checked_sub(1).and_then(|s| u32::try_from(s).ok())
    }

    /// `[hi, lo]` 32-bit halves, the layout used by vertex data.
    #[inline]
    pub const fn to_lanes(self) -> [u32; 2] {
        [(self.0 >> 32) as u32, self.0 as u32]
    }

    #[inline]
    pub const fn from_lanes(lanes: [u32; 2]) -> Self {
        Self(((lanes[0] as u64) << 32) | lanes[1] as u64)
    }
}

/// Slot bookkeeping, independent of the device.
#[derive(Debug, Clone)]
struct SlotAllocator {
    capacity: u32,
    next: u32,
    free: Vec<u32>,
}

impl SlotAllocator {
    fn new(capacity: u32) -> Self {
        Self {
            capacity,
            next: 0,
            free: Vec::new(),
        }
    }

    fn allocate(&mut self) -> Option<u32> {
        if let Some(slot) = self.free.pop() {
            return Some(slot);
        }
        if self.next < self.capacity {
            self.next += 1;
            return Some(self.next - 1);
        }
        None
    }

    fn release(&mut self, slot: u32) -> bool {
        if slot >= self.next || self.free.contains(&slot) {
            return false;
        }
        self.free.push(slot);
        true
    }

    fn in_use(&self) -> u32 {
        self.next - self.free.len() as u32
    }
}

/// Fixed-size table of resident textures bound as
/// `binding_array<texture_2d<f32>>` plus one shared sampler.
///
/// Empty slots are bound to a 1x1 white texture. The bind group is rebuilt
/// lazily whenever residency changed since it was last requested.
pub struct TextureRegistry {
    slots: Vec<Option<wgpu::TextureView>>,
    allocator: SlotAllocator,

    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: wgpu::TextureView,

    bind_group: wgpu::BindGroup,
    generation: u64,
    bind_group_generation: u64,

    warned_full: bool,
}

impl TextureRegistry {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, capacity: u32) -> Self {
        let capacity = capacity.max(1);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig texture registry bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: std::num::NonZeroU32::new(capacity),
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprig texture sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = white_texture(device, queue);
        let slots = vec![None; capacity as usize];
        let bind_group = build_bind_group(device, &layout, &sampler, &slots, &white);

        Self {
            slots,
            allocator: SlotAllocator::new(capacity),
            layout,
            sampler,
            white,
            bind_group,
            generation: 0,
            bind_group_generation: 0,
            warned_full: false,
        }
    }

    /// Makes `texture` addressable from vertex data.
    ///
    /// Returns [`TextureRef::NONE`] (with a warning) for empty or
    /// non-filterable textures and when every slot is taken.
    ///
    /// The slot holds its own view of the texture, so it stays valid until
    /// [`release`](Self::release) even if `texture` is dropped first.
    pub fn make_resident(&mut self, texture: &Texture2D) -> TextureRef {
        let (Some(view), Some(format)) = (texture.view(), texture.format()) else {
            log::warn!("TextureRegistry: empty texture cannot be made resident");
            return TextureRef::NONE;
        };
        if !format.is_filterable() {
            log::warn!("TextureRegistry: {format:?} textures cannot be sampled by the batcher");
            return TextureRef::NONE;
        }

        let Some(slot) = self.allocator.allocate() else {
            if !self.warned_full {
                log::warn!(
                    "TextureRegistry: all {} slots in use; texture left non-resident",
                    self.capacity()
                );
                self.warned_full = true;
            }
            return TextureRef::NONE;
        };

        self.slots[slot as usize] = Some(view.clone());
        self.generation += 1;
        log::debug!("TextureRegistry: slot {slot} <- {}x{}", texture.width(), texture.height());
        TextureRef::from_slot(slot)
    }

    /// Frees the slot behind `texture_ref`. Releasing [`TextureRef::NONE`] is
    /// a no-op; unknown or already released references are ignored with a
    /// warning.
    pub fn release(&mut self, texture_ref: TextureRef) {
        if texture_ref.is_none() {
            return;
        }
        match texture_ref.slot() {
            Some(slot) if self.allocator.release(slot) => {
                self.slots[slot as usize] = None;
                self.generation += 1;
                self.warned_full = false;
            }
            _ => log::warn!("TextureRegistry: release of non-resident {texture_ref:?} ignored"),
        }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.allocator.capacity
    }

    #[inline]
    pub fn resident_count(&self) -> u32 {
        self.allocator.in_use()
    }

    #[inline]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group reflecting current residency.
    pub fn bind_group(&mut self, device: &wgpu::Device) -> &wgpu::BindGroup {
        if self.bind_group_generation != self.generation {
            self.bind_group =
                build_bind_group(device, &self.layout, &self.sampler, &self.slots, &self.white);
            self.bind_group_generation = self.generation;
        }
        &self.bind_group
    }
}

fn build_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    slots: &[Option<wgpu::TextureView>],
    white: &wgpu::TextureView,
) -> wgpu::BindGroup {
    let views: Vec<&wgpu::TextureView> =
        slots.iter().map(|s| s.as_ref().unwrap_or(white)).collect();

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("sprig texture registry bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureViewArray(&views),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// 1x1 opaque white texture bound to unused slots.
fn white_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: 1,
        height: 1,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("sprig white texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &[0xFF; 4],
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(1),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
