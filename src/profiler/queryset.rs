use std::{mem::size_of, ops::Deref};

use futures::executor::block_on;

use crate::GpuError;
use crate::QUERYSET_BUFFER_USAGE;

pub struct QuerySet {
    pub(crate) inner: wgpu::QuerySet,
    pub(crate) buffer: wgpu::Buffer,
}
/// Allows deref of a `QuerySet` to the inner `wgpu::QuerySet`.
impl Deref for QuerySet {
    type Target = wgpu::QuerySet;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl std::fmt::Debug for QuerySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet").finish_non_exhaustive()
    }
}

impl QuerySet {
    /// Creates a new `QuerySet` that times various events.
    pub(crate) fn new_timestamp(device: &wgpu::Device, count: u32) -> Self {
        let label = Some("Timestamp QuerySet");

        let inner = device.create_query_set(&wgpu::QuerySetDescriptor {
            label,
            ty: wgpu::QueryType::Timestamp,
            count,
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: u64::from(count) * size_of::<u64>() as u64,
            usage: QUERYSET_BUFFER_USAGE,
            mapped_at_creation: false,
        });
        QuerySet { inner, buffer }
    }

    pub fn resolve(&self, count: u32, encoder: &mut wgpu::CommandEncoder) {
        if count > 0 {
            encoder.resolve_query_set(self, 0..count, &self.buffer, 0);
        }
    }

    /// Must first call resolve()
    pub fn get(&self, device: &wgpu::Device, count: u32) -> Result<Vec<u64>, GpuError> {
        // Check to see if there aren't any markers
        if count == 0 {
            // We return an empty array to avoid mapping the buffer which we already know is empty
            return Ok(Vec::new());
        }

        let slice = self
            .buffer
            .slice(..size_of::<u64>() as u64 * u64::from(count));
        let mapping = slice.map_async(wgpu::MapMode::Read);
        device.poll(wgpu::Maintain::Wait);
        block_on(mapping).map_err(|_| GpuError::BufferAsyncError)?;

        let timestamps = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, u64>(&view).to_vec()
        };
        self.buffer.unmap();

        Ok(timestamps)
    }
}
