pub use crate::{
    blit, BlitMode, CameraData, CameraType, CommandBuffer, ComponentRegistry, GpuContext,
    GpuHandle, Material, MinFloatParameter, PassInput, ProfilingSampler, ProfilingScope,
    PropertyId, RecordingContext, RenderContext, RenderPassEvent, RenderQueue,
    RenderTextureDescriptor, Renderer, RendererFeature, RenderingData, ScriptableRenderPass,
    Shader, Volume, VolumeComponent, VolumeManager, VolumeProfile, VolumeStack,
};
