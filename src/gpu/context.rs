use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;

use futures::executor::block_on;
use tracing::{debug, trace, warn};
use wgpu::util::DeviceExt;

use crate::{
    BlitPipeline, Command, CommandBuffer, CommandBufferPool, GpuError, GpuHandle,
    MaterialBinding, RenderContext, RenderTargetId, RenderTextureDescriptor, Shader,
    TextureFormat,
};

pub_const_flag!(
    RENDER_TARGET_USAGE,
    wgpu::TextureUsages,
    RENDER_ATTACHMENT,
    TEXTURE_BINDING,
    COPY_SRC,
    COPY_DST
);

struct Target {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    descriptor: RenderTextureDescriptor,
}

impl Target {
    fn new(device: &wgpu::Device, id: RenderTargetId, descriptor: RenderTextureDescriptor) -> Self {
        let label = format!("{:?}", id);
        let texture = device.create_texture(&descriptor.to_wgpu(Some(&label), RENDER_TARGET_USAGE));
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            base_mip_level: 0,
            mip_level_count: NonZeroU32::new(1),
            ..Default::default()
        });
        Self {
            texture,
            view,
            descriptor,
        }
    }
}

/// Identifies a cached pipeline by shader instance, not by name.
/// Two shaders loaded from files with the same stem still get their own pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    shader: *const Shader,
    format: TextureFormat,
}

impl PipelineKey {
    fn new(shader: &Rc<Shader>, format: TextureFormat) -> Self {
        Self {
            shader: Rc::as_ptr(shader),
            format,
        }
    }
}

/// The cached shader is held so its address cannot be reused by another shader.
struct CachedPipeline {
    _shader: Rc<Shader>,
    pipeline: Rc<BlitPipeline>,
}

/// A render context that replays command buffers on a wgpu device.
///
/// Owns the camera color double buffer and any temporary targets passes
/// request. Pipelines are built on first use and cached per shader and
/// target format.
pub struct GpuContext {
    gpu: GpuHandle,
    pool: CommandBufferPool,
    sampler: wgpu::Sampler,
    targets: RefCell<HashMap<RenderTargetId, Target>>,
    pipelines: RefCell<HashMap<PipelineKey, CachedPipeline>>,
}

impl GpuContext {
    #[must_use]
    pub fn new(gpu: GpuHandle, camera: RenderTextureDescriptor) -> Self {
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let context = Self {
            gpu,
            pool: CommandBufferPool::new(),
            sampler,
            targets: RefCell::new(HashMap::new()),
            pipelines: RefCell::new(HashMap::new()),
        };
        context.resize(camera);
        context
    }

    pub fn gpu(&self) -> &GpuHandle {
        &self.gpu
    }

    /// Recreates the camera color targets. Their contents are lost.
    pub fn resize(&self, camera: RenderTextureDescriptor) {
        let camera = camera.without_mips();
        let mut targets = self.targets.borrow_mut();
        for id in [RenderTargetId::CAMERA_COLOR_A, RenderTargetId::CAMERA_COLOR_B] {
            targets.insert(id, Target::new(&self.gpu.device, id, camera));
        }
        debug!("camera targets resized to {}x{}", camera.width, camera.height);
    }

    pub fn descriptor(&self, id: RenderTargetId) -> Option<RenderTextureDescriptor> {
        self.targets.borrow().get(&id).map(|t| t.descriptor)
    }

    /// Uploads tightly packed texels into a target.
    pub fn write_target(&self, id: RenderTargetId, texels: &[u8]) {
        let targets = self.targets.borrow();
        let target = match targets.get(&id) {
            Some(target) => target,
            None => {
                warn!("cannot write unknown render target {:?}", id);
                return;
            }
        };
        let descriptor = target.descriptor;
        let bytes_per_pixel = u32::from(descriptor.format.describe().block_size);
        self.gpu.queue.write_texture(
            target.texture.as_image_copy(),
            texels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(descriptor.width * bytes_per_pixel),
                rows_per_image: None,
            },
            descriptor.extent(),
        );
    }

    /// Reads a target back into tightly packed texels. Blocks until the copy completes.
    /// # Errors
    /// Errors when the readback buffer cannot be mapped.
    pub fn read_target(&self, id: RenderTargetId) -> Result<Option<Vec<u8>>, GpuError> {
        let targets = self.targets.borrow();
        let target = match targets.get(&id) {
            Some(target) => target,
            None => return Ok(None),
        };
        let descriptor = target.descriptor;
        let bytes_per_pixel = u32::from(descriptor.format.describe().block_size);
        let unpadded = descriptor.width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = (unpadded + align - 1) / align * align;

        let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback buffer"),
            size: u64::from(padded) * u64::from(descriptor.height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self.gpu.create_command_encoder("Readback");
        encoder.copy_texture_to_buffer(
            target.texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: NonZeroU32::new(padded),
                    rows_per_image: None,
                },
            },
            descriptor.extent(),
        );
        self.gpu.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let mapping = slice.map_async(wgpu::MapMode::Read);
        self.gpu.device.poll(wgpu::Maintain::Wait);
        block_on(mapping).map_err(|_| GpuError::BufferAsyncError)?;

        let texels = {
            let view = slice.get_mapped_range();
            view.chunks(padded as usize)
                .flat_map(|row| &row[..unpadded as usize])
                .copied()
                .collect()
        };
        buffer.unmap();
        Ok(Some(texels))
    }

    fn pipeline(&self, binding: &MaterialBinding, format: TextureFormat) -> Result<Rc<BlitPipeline>, GpuError> {
        let key = PipelineKey::new(&binding.shader, format);
        if let Some(cached) = self.pipelines.borrow().get(&key) {
            return Ok(Rc::clone(&cached.pipeline));
        }
        debug!("building blit pipeline for {} ({:?})", binding.shader.name(), format);
        let pipeline = Rc::new(
            BlitPipeline::builder(&binding.shader)
                .with_format(format)
                .create(&self.gpu.device)?,
        );
        self.pipelines.borrow_mut().insert(
            key,
            CachedPipeline {
                _shader: Rc::clone(&binding.shader),
                pipeline: Rc::clone(&pipeline),
            },
        );
        Ok(pipeline)
    }

    fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: RenderTargetId,
        destination: RenderTargetId,
        binding: &MaterialBinding,
    ) {
        let targets = self.targets.borrow();
        let (src, dst) = match (targets.get(&source), targets.get(&destination)) {
            (Some(src), Some(dst)) if source != destination => (src, dst),
            _ => {
                warn!("invalid blit from {:?} to {:?}", source, destination);
                return;
            }
        };
        let pipeline = match self.pipeline(binding, dst.descriptor.format) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                warn!("skipping blit: {}", e);
                return;
            }
        };

        let uniforms = self
            .gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Material uniforms"),
                contents: bytemuck::bytes_of(&binding.uniforms()),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = pipeline.bind_group(&self.gpu.device, &src.view, &self.sampler, &uniforms);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(binding.shader.name()),
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view: &dst.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        });
        pass.set_pipeline(&pipeline.inner);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn copy(&self, encoder: &mut wgpu::CommandEncoder, source: RenderTargetId, destination: RenderTargetId) {
        let targets = self.targets.borrow();
        match (targets.get(&source), targets.get(&destination)) {
            (Some(src), Some(dst))
                if src.descriptor.extent() == dst.descriptor.extent()
                    && src.descriptor.format == dst.descriptor.format =>
            {
                encoder.copy_texture_to_texture(
                    src.texture.as_image_copy(),
                    dst.texture.as_image_copy(),
                    src.descriptor.extent(),
                );
            }
            _ => warn!("cannot copy {:?} into {:?}", source, destination),
        }
    }
}

impl RenderContext for GpuContext {
    fn command_buffer_pool(&self) -> &CommandBufferPool {
        &self.pool
    }

    fn execute_command_buffer(&self, cmd: &CommandBuffer) {
        trace!("replaying {} commands from {}", cmd.len(), cmd.name());
        let mut encoder = self.gpu.create_command_encoder(cmd.name());
        // Released targets stay alive until the commands using them are submitted
        let mut retired = Vec::new();

        for command in cmd.commands() {
            match command {
                Command::BeginSample(label) => {
                    encoder.push_debug_group(label);
                    #[cfg(feature = "profiler")]
                    self.gpu.profiler.begin_sample(label, &mut encoder);
                }
                Command::EndSample(label) => {
                    #[cfg(feature = "profiler")]
                    self.gpu.profiler.end_sample(label, &mut encoder);
                    encoder.pop_debug_group();
                }
                Command::GetTemporaryRt { id, descriptor } => {
                    let target = Target::new(&self.gpu.device, *id, *descriptor);
                    if let Some(old) = self.targets.borrow_mut().insert(*id, target) {
                        retired.push(old);
                    }
                }
                Command::ReleaseTemporaryRt(id) => {
                    if !id.is_temporary() {
                        warn!("refusing to release camera target {:?}", id);
                    } else if let Some(old) = self.targets.borrow_mut().remove(id) {
                        retired.push(old);
                    }
                }
                Command::Blit {
                    source,
                    destination,
                    material,
                    pass_index,
                } => {
                    if *pass_index != 0 {
                        warn!("blit shaders have a single pass, ignoring pass {}", pass_index);
                    }
                    match material {
                        Some(binding) => self.draw(&mut encoder, *source, *destination, binding),
                        None => self.copy(&mut encoder, *source, *destination),
                    }
                }
            }
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        drop(retired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "fn vs_main() {}\nfn fs_main() {}";

    #[test]
    fn pipelines_are_keyed_by_shader_instance() {
        let format = RenderTextureDescriptor::DEFAULT_FORMAT;
        let builtin = Rc::new(Shader::from_wgsl("color_aberration", SOURCE));
        let custom = Rc::new(Shader::from_wgsl("color_aberration", SOURCE));

        assert_ne!(PipelineKey::new(&builtin, format), PipelineKey::new(&custom, format));
        assert_eq!(
            PipelineKey::new(&builtin, format),
            PipelineKey::new(&Rc::clone(&builtin), format)
        );
        assert_ne!(
            PipelineKey::new(&builtin, format),
            PipelineKey::new(&builtin, wgpu::TextureFormat::Rgba16Float)
        );
    }
}
