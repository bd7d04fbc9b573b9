use wgpu::util::DeviceExt;

/// How a [`DeviceBuffer`] is going to be accessed after creation.
///
/// wgpu only allows CPU-mappable buffers to act as copy staging buffers, so
/// `cpu_read` / `cpu_write` override the GPU role the buffer was created for.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BufferUsage {
    /// Contents are replaced later through [`DeviceBuffer::sub_data`].
    pub dynamic: bool,
    /// CPU can map the buffer for writing (upload staging).
    pub cpu_write: bool,
    /// CPU can map the buffer for reading (readback).
    pub cpu_read: bool,
}

impl BufferUsage {
    pub const STATIC: Self = Self { dynamic: false, cpu_write: false, cpu_read: false };
    pub const DYNAMIC: Self = Self { dynamic: true, cpu_write: false, cpu_read: false };

    /// Translates into wgpu usage flags for a buffer used as `role`
    /// (e.g. `VERTEX`, `UNIFORM`).
    pub fn wgpu_usages(self, role: wgpu::BufferUsages) -> wgpu::BufferUsages {
        if self.cpu_read {
            return wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST;
        }
        if self.cpu_write {
            return wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC;
        }

        let mut usages = role | wgpu::BufferUsages::COPY_SRC;
        if self.dynamic {
            usages |= wgpu::BufferUsages::COPY_DST;
        }
        usages
    }
}

/// Owned device buffer.
///
/// Dropping the wrapper releases its handle; the allocation is freed once
/// no queued command still references it.
pub struct DeviceBuffer {
    buffer: wgpu::Buffer,
    size: u64,
    usage: BufferUsage,
    warned_static_write: bool,
}

impl DeviceBuffer {
    /// Creates a buffer of `size` bytes.
    ///
    /// `contents`, if given, initializes the start of the buffer; shorter slices
    /// are zero-padded, longer ones truncated to `size`.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        size: u64,
        contents: Option<&[u8]>,
        role: wgpu::BufferUsages,
        usage: BufferUsage,
    ) -> Self {
        let size = align_copy_size(size);
        let usages = usage.wgpu_usages(role);

        let buffer = match contents {
            Some(data) => {
                let mut init = vec![0u8; size as usize];
                let n = data.len().min(init.len());
                init[..n].copy_from_slice(&data[..n]);
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: &init,
                    usage: usages,
                })
            }
            None => device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: usages,
                mapped_at_creation: false,
            }),
        };

        Self {
            buffer,
            size,
            usage,
            warned_static_write: false,
        }
    }

    /// Writes `data` at `offset`.
    ///
    /// Only valid for dynamic buffers; writes to static buffers are ignored with
    /// a one-time warning. `offset` and `data.len()` must be multiples of
    /// `wgpu::COPY_BUFFER_ALIGNMENT`.
    pub fn sub_data(&mut self, queue: &wgpu::Queue, offset: u64, data: &[u8]) {
        if !self.usage.dynamic {
            if !self.warned_static_write {
                log::warn!("DeviceBuffer: sub_data on a non-dynamic buffer ignored");
                self.warned_static_write = true;
            }
            return;
        }
        if data.is_empty() {
            return;
        }

        debug_assert!(
            offset + data.len() as u64 <= self.size,
            "DeviceBuffer::sub_data out of range: {} + {} > {}",
            offset,
            data.len(),
            self.size
        );

        queue.write_buffer(&self.buffer, offset, data);
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Underlying wgpu buffer, for binding.
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Rounds `size` up to the copy alignment wgpu requires for buffer sizes.
pub(crate) fn align_copy_size(size: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    size.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    // In-flight submissions may still read the buffer after the wrapper goes
    // away, so it must not be destroyed explicitly; this only compiles without
    // a `Drop` impl.
    #[allow(dead_code)]
    fn buffer_moves_out_of_the_wrapper(b: DeviceBuffer) -> wgpu::Buffer {
        b.buffer
    }

    #[test]
    fn dynamic_buffers_accept_copies() {
        let u = BufferUsage::DYNAMIC.wgpu_usages(wgpu::BufferUsages::VERTEX);
        assert!(u.contains(wgpu::BufferUsages::VERTEX));
        assert!(u.contains(wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn static_buffers_are_not_copy_targets() {
        let u = BufferUsage::STATIC.wgpu_usages(wgpu::BufferUsages::UNIFORM);
        assert!(!u.contains(wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn mappable_buffers_become_staging() {
        let read = BufferUsage { cpu_read: true, ..BufferUsage::DYNAMIC };
        assert_eq!(
            read.wgpu_usages(wgpu::BufferUsages::VERTEX),
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST
        );

        let write = BufferUsage { cpu_write: true, ..BufferUsage::STATIC };
        assert_eq!(
            write.wgpu_usages(wgpu::BufferUsages::VERTEX),
            wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC
        );
    }

    #[test]
    fn sizes_round_up_to_copy_alignment() {
        assert_eq!(align_copy_size(0), 0);
        assert_eq!(align_copy_size(1), 4);
        assert_eq!(align_copy_size(48), 48);
        assert_eq!(align_copy_size(50), 52);
    }
}
