mod pool;
pub use pool::*;

use crate::{Material, MaterialBinding, RenderTextureDescriptor};

/// Handle to a render target owned by the render context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTargetId(u32);

impl RenderTargetId {
    /// First half of the camera color double buffer.
    pub const CAMERA_COLOR_A: Self = Self(0);
    /// Second half of the camera color double buffer.
    pub const CAMERA_COLOR_B: Self = Self(1);

    const TEMPORARY_BASE: u32 = 0x100;

    pub const fn temporary(index: u32) -> Self {
        Self(Self::TEMPORARY_BASE + index)
    }

    pub const fn is_temporary(self) -> bool {
        self.0 >= Self::TEMPORARY_BASE
    }
}

/// A single recorded operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    BeginSample(String),
    EndSample(String),
    GetTemporaryRt {
        id: RenderTargetId,
        descriptor: RenderTextureDescriptor,
    },
    ReleaseTemporaryRt(RenderTargetId),
    /// Full-screen transfer from `source` to `destination`.
    /// Without a material this is a plain copy.
    Blit {
        source: RenderTargetId,
        destination: RenderTargetId,
        material: Option<MaterialBinding>,
        pass_index: u32,
    },
}

/// A list of commands that is submitted to a render context as a unit.
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
}

impl CommandBuffer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
    }

    pub fn begin_sample(&mut self, name: &str) {
        self.commands.push(Command::BeginSample(name.to_string()));
    }

    pub fn end_sample(&mut self, name: &str) {
        self.commands.push(Command::EndSample(name.to_string()));
    }

    pub fn get_temporary_rt(&mut self, id: RenderTargetId, descriptor: RenderTextureDescriptor) {
        self.commands
            .push(Command::GetTemporaryRt { id, descriptor });
    }

    pub fn release_temporary_rt(&mut self, id: RenderTargetId) {
        self.commands.push(Command::ReleaseTemporaryRt(id));
    }

    /// Records a blit. The material's current properties are captured now,
    /// later changes to the material do not affect this command.
    pub fn blit(
        &mut self,
        source: RenderTargetId,
        destination: RenderTargetId,
        material: Option<&Material>,
        pass_index: u32,
    ) {
        self.commands.push(Command::Blit {
            source,
            destination,
            material: material.map(Material::binding),
            pass_index,
        });
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{PropertyId, Shader};

    #[test]
    fn blit_captures_material_state() {
        let shader = Rc::new(Shader::from_wgsl("blit", "fn vs_main() {} fn fs_main() {}"));
        let mut material = Material::new(shader);
        let id = PropertyId::of("_Value");
        material.set_float(id, 1.0);

        let mut cmd = CommandBuffer::new("test");
        cmd.blit(
            RenderTargetId::CAMERA_COLOR_A,
            RenderTargetId::CAMERA_COLOR_B,
            Some(&material),
            0,
        );
        material.set_float(id, 2.0);

        match &cmd.commands()[0] {
            Command::Blit {
                material: Some(binding),
                ..
            } => assert_eq!(binding.float(id), Some(1.0)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn temporary_ids_do_not_collide_with_camera_targets() {
        assert!(RenderTargetId::temporary(0).is_temporary());
        assert!(!RenderTargetId::CAMERA_COLOR_A.is_temporary());
        assert!(!RenderTargetId::CAMERA_COLOR_B.is_temporary());
        assert_ne!(RenderTargetId::temporary(0), RenderTargetId::temporary(1));
    }
}
