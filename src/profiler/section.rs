use std::ops::{Deref, DerefMut};

use crate::CommandBuffer;

/// Names a region of recorded commands for timing attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfilingSampler {
    name: String,
}

impl ProfilingSampler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Records a begin sample on creation and the matching end sample on drop.
/// Commands recorded through the scope land between the two.
pub struct ProfilingScope<'a> {
    cmd: &'a mut CommandBuffer,
    sampler: &'a ProfilingSampler,
}

impl<'a> ProfilingScope<'a> {
    pub fn new(cmd: &'a mut CommandBuffer, sampler: &'a ProfilingSampler) -> Self {
        cmd.begin_sample(sampler.name());
        Self { cmd, sampler }
    }
}

impl Deref for ProfilingScope<'_> {
    type Target = CommandBuffer;
    fn deref(&self) -> &Self::Target {
        &*self.cmd
    }
}

impl DerefMut for ProfilingScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.cmd
    }
}

impl Drop for ProfilingScope<'_> {
    fn drop(&mut self) {
        self.cmd.end_sample(self.sampler.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Command;

    #[test]
    fn scope_brackets_recorded_commands() {
        let sampler = ProfilingSampler::new("Outer");
        let mut cmd = CommandBuffer::new("test");
        {
            let mut scope = ProfilingScope::new(&mut cmd, &sampler);
            scope.get_temporary_rt(
                crate::RenderTargetId::temporary(0),
                crate::RenderTextureDescriptor::new(4, 4),
            );
        }
        let commands = cmd.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], Command::BeginSample("Outer".into()));
        assert_eq!(commands[2], Command::EndSample("Outer".into()));
    }

    #[test]
    fn empty_scope_still_balances() {
        let sampler = ProfilingSampler::new("Empty");
        let mut cmd = CommandBuffer::new("test");
        drop(ProfilingScope::new(&mut cmd, &sampler));
        assert_eq!(
            cmd.commands(),
            &[
                Command::BeginSample("Empty".into()),
                Command::EndSample("Empty".into())
            ]
        );
    }
}
