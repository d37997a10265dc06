use std::cell::{Ref, RefCell};

use tracing::trace;

use crate::{Command, CommandBuffer, CommandBufferPool, MaterialBinding};

/// The host side of command submission.
///
/// Methods take `&self` so a pass can hold a pooled buffer borrowed from the
/// context while it submits to the same context.
pub trait RenderContext {
    fn command_buffer_pool(&self) -> &CommandBufferPool;

    /// Submits the recorded commands. The caller keeps the buffer and may clear it.
    fn execute_command_buffer(&self, cmd: &CommandBuffer);
}

/// One command buffer as it was submitted.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub name: String,
    pub commands: Vec<Command>,
}

/// A render context that keeps every submission instead of running it.
/// Useful for frame captures and for driving passes without a device.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pool: CommandBufferPool,
    submissions: RefCell<Vec<Submission>>,
}

impl RecordingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Ref<'_, Vec<Submission>> {
        self.submissions.borrow()
    }

    /// Every submitted command, in submission order.
    pub fn commands(&self) -> Vec<Command> {
        self.submissions
            .borrow()
            .iter()
            .flat_map(|s| s.commands.iter().cloned())
            .collect()
    }

    /// Materials of every blit that ran a shader.
    pub fn draw_calls(&self) -> Vec<MaterialBinding> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                Command::Blit {
                    material: Some(binding),
                    ..
                } => Some(binding),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.submissions.borrow_mut().clear();
    }
}

impl RenderContext for RecordingContext {
    fn command_buffer_pool(&self) -> &CommandBufferPool {
        &self.pool
    }

    fn execute_command_buffer(&self, cmd: &CommandBuffer) {
        trace!("recording {} commands from {}", cmd.len(), cmd.name());
        self.submissions.borrow_mut().push(Submission {
            name: cmd.name().to_string(),
            commands: cmd.commands().to_vec(),
        });
    }
}
