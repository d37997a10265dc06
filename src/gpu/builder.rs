use futures::executor::block_on;
use tracing::info;

use crate::{Gpu, GpuError, GpuHandle, Profiler};

#[derive(Clone)]
/// Builder for `Gpu`.
/// By default this is initialized with sensible values for offscreen rendering.
pub struct GpuBuilder {
    /// Only the PRIMARY backends, which have first-class support.
    backends: wgpu::Backends,
    power_preference: wgpu::PowerPreference,
    limits: wgpu::Limits,
    /// The features that the device can optionally support.
    optional_features: wgpu::Features,
}
impl Default for GpuBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl GpuBuilder {
    /// Create a `GpuBuilder` with sensible defaults.
    pub fn new() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::HighPerformance,
            limits: wgpu::Limits::downlevel_defaults(),
            optional_features: wgpu::Features::empty(),
        }
    }

    /// Requests timestamp queries when the adapter has them.
    /// Profiling samples are still recorded without them, they just carry no timings.
    #[must_use]
    pub fn with_profiler(mut self) -> Self {
        self.optional_features |= wgpu::Features::TIMESTAMP_QUERY;
        self
    }

    /// Blocking version of `build_headless_async()`.
    /// # Errors
    /// Errors when a connection to the GPU could not be established.
    pub fn build_headless(self) -> Result<GpuHandle, GpuError> {
        block_on(self.build_headless_async())
    }

    /// Builds a `Gpu` without a surface. Every target is offscreen.
    /// # Errors
    /// Errors when a connection to the GPU could not be established.
    pub async fn build_headless_async(self) -> Result<GpuHandle, GpuError> {
        let instance = wgpu::Instance::new(self.backends);

        // Initialize the adapter (physical device).
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: self.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterNone)?;

        let info = adapter.get_info();
        info!("using adapter {} ({:?})", info.name, info.backend);

        // Create the `device` (and get the handle for the command queue `queue`)
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    limits: self.limits.clone(),
                    label: None,
                    features: self.features(&adapter),
                },
                None,
            )
            .await?;

        let profiler = Profiler::new(&device, &queue);

        let gpu = Gpu {
            instance,
            adapter,
            device,
            queue,
            profiler,
        };

        Ok(gpu.into_handle())
    }

    fn features(&self, adapter: &wgpu::Adapter) -> wgpu::Features {
        self.features_from(adapter.features())
    }

    fn features_from(&self, supported: wgpu::Features) -> wgpu::Features {
        self.optional_features & supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_only_requested_when_supported() {
        let builder = GpuBuilder::new();
        assert!(builder.features_from(wgpu::Features::all()).is_empty());

        let builder = builder.with_profiler();
        assert_eq!(
            builder.features_from(wgpu::Features::all()),
            wgpu::Features::TIMESTAMP_QUERY
        );
        assert!(builder.features_from(wgpu::Features::empty()).is_empty());
    }
}
