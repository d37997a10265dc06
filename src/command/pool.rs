use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::CommandBuffer;

/// Reusable command buffers handed out for the duration of one pass.
///
/// Buffers are returned when their [`PooledCommandBuffer`] guard drops, so
/// every exit path of a pass gives the buffer back.
#[derive(Debug, Default)]
pub struct CommandBufferPool {
    free: RefCell<Vec<CommandBuffer>>,
    outstanding: Cell<usize>,
    allocated: Cell<usize>,
}

impl CommandBufferPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a cleared buffer from the pool, allocating one if none is free.
    pub fn get(&self, name: &str) -> PooledCommandBuffer<'_> {
        let mut buffer = self.free.borrow_mut().pop().unwrap_or_else(|| {
            self.allocated.set(self.allocated.get() + 1);
            trace!("allocating command buffer #{}", self.allocated.get());
            CommandBuffer::default()
        });
        buffer.set_name(name);
        self.outstanding.set(self.outstanding.get() + 1);
        PooledCommandBuffer { pool: self, buffer }
    }

    fn release(&self, mut buffer: CommandBuffer) {
        buffer.clear();
        self.free.borrow_mut().push(buffer);
        self.outstanding.set(self.outstanding.get() - 1);
    }

    /// Buffers currently checked out.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Buffers ever created by this pool.
    pub fn allocated(&self) -> usize {
        self.allocated.get()
    }

    pub fn free_count(&self) -> usize {
        self.free.borrow().len()
    }
}

/// A command buffer borrowed from a [`CommandBufferPool`].
pub struct PooledCommandBuffer<'a> {
    pool: &'a CommandBufferPool,
    buffer: CommandBuffer,
}

impl Deref for PooledCommandBuffer<'_> {
    type Target = CommandBuffer;
    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledCommandBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// On drop, the cleared buffer goes back to the pool
impl Drop for PooledCommandBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}
