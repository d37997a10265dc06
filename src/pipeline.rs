//! The extension points a post-processing effect plugs into.
//!
//! A [`RendererFeature`] owns one or more [`ScriptableRenderPass`]es and
//! enqueues them every frame. The [`Renderer`] orders the queue by
//! [`RenderPassEvent`] and executes each pass against a [`RenderContext`].

mod blit;
pub use blit::blit;

mod context;
pub use context::*;

mod feature;
pub use feature::*;

mod frame;
pub use frame::*;

mod pass;
pub use pass::*;

mod renderer;
pub use renderer::*;
