// Re-export TextureFormat
pub use wgpu::TextureFormat;

/// Describes a render target the host allocates for a camera.
///
/// Passes receive the camera's descriptor every frame and may keep an
/// adjusted copy for the temporary targets they request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderTextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub msaa_samples: u32,
    /// Allocate the full mip chain for the target.
    pub use_mip_map: bool,
    /// Regenerate the mip chain after the target is rendered to.
    pub auto_generate_mips: bool,
}

impl RenderTextureDescriptor {
    pub const DEFAULT_FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;

    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: Self::DEFAULT_FORMAT,
            msaa_samples: 1,
            use_mip_map: false,
            auto_generate_mips: false,
        }
    }

    #[must_use]
    pub const fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub const fn with_mips(mut self) -> Self {
        self.use_mip_map = true;
        self.auto_generate_mips = true;
        self
    }

    /// Copy of this descriptor with mip-mapping disabled.
    #[must_use]
    pub const fn without_mips(mut self) -> Self {
        self.use_mip_map = false;
        self.auto_generate_mips = false;
        self
    }

    pub fn mip_level_count(&self) -> u32 {
        if self.use_mip_map {
            u32::BITS - self.width.max(self.height).max(1).leading_zeros()
        } else {
            1
        }
    }

    pub const fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    /// The wgpu descriptor for a 2D target with the given usage.
    pub fn to_wgpu<'a>(
        &self,
        label: Option<&'a str>,
        usage: wgpu::TextureUsages,
    ) -> wgpu::TextureDescriptor<'a> {
        wgpu::TextureDescriptor {
            label,
            size: self.extent(),
            mip_level_count: self.mip_level_count(),
            sample_count: self.msaa_samples.max(1),
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage,
        }
    }
}

impl Default for RenderTextureDescriptor {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_count_follows_major_dimension() {
        let desc = RenderTextureDescriptor::new(1024, 512).with_mips();
        assert_eq!(desc.mip_level_count(), 11);
        assert_eq!(desc.without_mips().mip_level_count(), 1);
    }

    #[test]
    fn without_mips_keeps_everything_else() {
        let desc = RenderTextureDescriptor::new(640, 360)
            .with_format(TextureFormat::Rgba16Float)
            .with_mips();
        let stripped = desc.without_mips();
        assert!(!stripped.use_mip_map);
        assert!(!stripped.auto_generate_mips);
        assert_eq!(stripped.width, 640);
        assert_eq!(stripped.height, 360);
        assert_eq!(stripped.format, TextureFormat::Rgba16Float);
    }
}
