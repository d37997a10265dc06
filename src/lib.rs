#![allow(clippy::module_name_repetitions)]
//! A small render-pass host for full-screen post-processing on wgpu.
//!
//! Effects plug in as [`RendererFeature`]s that enqueue
//! [`ScriptableRenderPass`]es. Passes record into pooled [`CommandBuffer`]s,
//! read their parameters from the camera's [`VolumeStack`], and submit to a
//! [`RenderContext`]: either a [`GpuContext`] that replays commands on a
//! device, or a [`RecordingContext`] that keeps them for inspection.

#[macro_use]
mod macros;

/// Error types for the host
pub mod error;
pub use error::*;

pub mod command;
pub use command::*;

/// Headless device setup and command replay
pub mod gpu;
pub use gpu::*;

pub mod pipeline;
pub use pipeline::*;

pub mod profiler;
pub use profiler::*;

pub mod shader;
pub use shader::*;

pub mod texture;
pub use texture::*;

pub mod volume;
pub use volume::*;

pub mod prelude;

/// Export wgpu crate
pub use wgpu;
/// Export glam crate
pub use glam;

pub_const_flag!(QUERYSET_BUFFER_USAGE, wgpu::BufferUsages, MAP_READ, COPY_DST);
