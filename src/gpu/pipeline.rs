use std::borrow::Cow;
use std::mem::size_of;
use std::num::NonZeroU64;

use futures::executor::block_on;

use crate::{GpuError, MaterialUniforms, Shader, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// A full-screen triangle pipeline for one shader and target format.
///
/// Bind group 0 holds the source texture (binding 0), a sampler (binding 1)
/// and the material uniform block (binding 2).
#[derive(Debug)]
pub struct BlitPipeline {
    pub(crate) inner: wgpu::RenderPipeline,
    pub(crate) layout: wgpu::BindGroupLayout,
}

impl BlitPipeline {
    pub fn builder<'a>(shader: &'a Shader) -> BlitPipelineBuilder<'a> {
        BlitPipelineBuilder::new(shader)
    }

    pub(crate) fn bind_group(
        &self,
        device: &wgpu::Device,
        source: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        uniforms: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit bind group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    }
}

pub struct BlitPipelineBuilder<'a> {
    shader: &'a Shader,
    format: wgpu::TextureFormat,
}

impl<'a> BlitPipelineBuilder<'a> {
    pub fn new(shader: &'a Shader) -> Self {
        Self {
            shader,
            format: crate::RenderTextureDescriptor::DEFAULT_FORMAT,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Compiles the shader and builds the pipeline.
    /// # Errors
    /// Errors when the shader lacks a blit entry point or fails validation.
    pub fn create(&self, device: &wgpu::Device) -> Result<BlitPipeline, GpuError> {
        let name = self.shader.name();
        if !self.shader.is_supported() {
            return Err(GpuError::UnsupportedShader(name.to_string()));
        }

        // Invalid WGSL is reported through the error scope instead of the device's panic handler
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(&wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(self.shader.source())),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(size_of::<MaterialUniforms>() as u64),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(name),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let inner = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(name),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: VERTEX_ENTRY,
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: FRAGMENT_ENTRY,
                targets: &[wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        match block_on(device.pop_error_scope()) {
            Some(error) => {
                tracing::error!("shader {} failed validation: {}", name, error);
                Err(GpuError::UnsupportedShader(name.to_string()))
            }
            None => Ok(BlitPipeline { inner, layout }),
        }
    }
}
