use bitflags::bitflags;

use crate::{RenderContext, RenderTextureDescriptor, RenderingData};

/// Where in the frame a pass runs. Passes execute in ascending order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum RenderPassEvent {
    BeforeRendering = 0,
    BeforeRenderingShadows = 50,
    AfterRenderingShadows = 100,
    BeforeRenderingPrePasses = 150,
    AfterRenderingPrePasses = 200,
    BeforeRenderingOpaques = 250,
    AfterRenderingOpaques = 300,
    BeforeRenderingSkybox = 350,
    AfterRenderingSkybox = 400,
    BeforeRenderingTransparents = 450,
    AfterRenderingTransparents = 500,
    /// Immediately before the built-in post-processing stage.
    BeforeRenderingPostProcessing = 550,
    AfterRenderingPostProcessing = 600,
    AfterRendering = 1000,
}

bitflags! {
    /// Buffers a pass reads, produced upstream by the renderer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PassInput: u32 {
        const DEPTH = 1 << 0;
        const NORMAL = 1 << 1;
        const COLOR = 1 << 2;
        const MOTION = 1 << 3;
    }
}

/// One orderable unit of work the renderer runs once per frame.
pub trait ScriptableRenderPass {
    fn name(&self) -> &str;

    /// Ordering token, fixed at construction.
    fn event(&self) -> RenderPassEvent;

    /// Inputs this pass declared for the current frame.
    fn inputs(&self) -> PassInput {
        PassInput::empty()
    }

    /// Called before `execute` every frame. Must not bind render targets.
    fn configure(&mut self, _camera_descriptor: &RenderTextureDescriptor) {}

    fn execute(&mut self, context: &dyn RenderContext, data: &mut RenderingData<'_>);

    /// Releases resources owned by the pass. No `execute` follows.
    fn cleanup(&mut self) {}
}
