mod builder;
pub use builder::GpuBuilder;

mod context;
pub use context::*;

mod pipeline;
pub use pipeline::*;

pub use wgpu::Backends;
pub use wgpu::Features;

use std::{ops::Deref, rc::Rc};

use crate::{Profiler, TimestampMarker};

/// The HW GPU context which contains all wgpu context info.
/// This is meant as an easier and more ergonomic way to pass around wgpu info.
/// You can manually construct this with fields but it is recommended to use the [builder].
///
/// [builder]: Gpu::builder()
pub struct Gpu {
    /// This is the instance for wgpu itself. We shouldn't need more than 1 in the
    /// life of a program.
    pub instance: wgpu::Instance,
    /// This is the adapter, representing the physical device.
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub profiler: Profiler,
}
impl Gpu {
    /// An alias for `GpuBuilder::new()`
    #[must_use]
    pub fn builder() -> GpuBuilder {
        GpuBuilder::new()
    }

    /// Converts the Gpu into a `GpuHandle` which can be passed around by clone
    #[must_use]
    pub fn into_handle(self) -> GpuHandle {
        GpuHandle {
            context: Rc::new(self),
        }
    }
}
impl Deref for Gpu {
    type Target = wgpu::Device;
    fn deref(&self) -> &Self::Target {
        &self.device
    }
}

/// A struct that wraps over `Rc<Gpu>` which can be passed around by clone.
/// Because this is a `Rc`, it will automatically be freed when there are no
/// more references to it.
#[derive(Clone)]
pub struct GpuHandle {
    context: Rc<Gpu>,
}
impl GpuHandle {
    pub fn create_command_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Resolves the timestamps written so far and pairs them into samples.
    /// Blocks until the GPU is idle. Markers are cleared afterwards.
    pub fn timestamp_report(&self) -> Vec<TimestampMarker> {
        if !self.profiler.is_enabled() {
            return Vec::new();
        }
        let mut encoder = self.create_command_encoder("Resolve timestamps");
        self.profiler.resolve(&mut encoder);
        self.queue.submit(Some(encoder.finish()));

        let report = self.profiler.timestamp_report(&self.device);
        self.profiler.clear();
        report
    }
}

impl Deref for GpuHandle {
    type Target = Gpu;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}
