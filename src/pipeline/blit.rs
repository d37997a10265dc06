use crate::{BlitMode, CameraColorTargets, CommandBuffer, Material, RenderTextureDescriptor};

/// Runs `material` over every pixel of the camera color buffer.
///
/// In [`BlitMode::SwapBuffer`] the shader reads the front buffer and writes
/// the back buffer, which then becomes the front. In
/// [`BlitMode::TemporaryTarget`] it writes a temporary target described by
/// `descriptor`, which is copied back into the front buffer and released.
/// Either way exactly one blit runs the material.
pub fn blit(
    cmd: &mut CommandBuffer,
    color: &mut CameraColorTargets,
    descriptor: &RenderTextureDescriptor,
    material: &Material,
    pass_index: u32,
) {
    match color.mode() {
        BlitMode::SwapBuffer => {
            cmd.blit(color.front(), color.back(), Some(material), pass_index);
            color.swap();
        }
        BlitMode::TemporaryTarget => {
            let temporary = color.allocate_temporary();
            cmd.get_temporary_rt(temporary, descriptor.without_mips());
            cmd.blit(color.front(), temporary, Some(material), pass_index);
            cmd.blit(temporary, color.front(), None, 0);
            cmd.release_temporary_rt(temporary);
        }
    }
}
