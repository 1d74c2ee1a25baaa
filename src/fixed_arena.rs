use core::mem::MaybeUninit;

use log::debug;

use crate::{
    bump::BumpAllocator, config::AllocatorConfig, errors::AllocError,
    fixed_buffer::FixedBuffer,
};

/// A linear allocator over a fixed buffer. Allocation bumps an offset
/// forward; the only way to give memory back is [`reset`](FixedArena::reset),
/// which gives back all of it.
pub struct FixedArena {
    buffer: FixedBuffer,
}

impl FixedArena {
    /// Creates an arena of `capacity` bytes with the default configuration
    pub fn with_capacity(capacity: usize) -> Result<FixedArena, AllocError> {
        Self::with_config(AllocatorConfig::new(capacity))
    }

    pub fn with_config(config: AllocatorConfig) -> Result<FixedArena, AllocError> {
        let buffer = FixedBuffer::new(&config)?;
        Ok(FixedArena { buffer })
    }

    /// Because the alloc methods immutably borrow self and reset mutably
    /// borrows self, a call to reset will invalidate all previous values that
    /// were allocated from the arena. Rust will not allow an immutable borrow
    /// of self to exist past a mutable borrow of self.
    ///
    /// The contents of the buffer are not touched.
    pub fn reset(&mut self) {
        debug!("arena reset, discarding {} bytes", self.buffer.used());
        self.buffer.set_used(0);
    }

    /// Releases the buffer. Dropping the arena does the same.
    pub fn free(self) {
        drop(self);
    }

    /// Every byte allocated so far, padding included
    pub fn used_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        self.buffer.used_mut()
    }
}

unsafe impl BumpAllocator for FixedArena {
    fn alloc_raw(
        &self,
        count: usize,
        element_size: usize,
        alignment: usize,
    ) -> Result<&mut [MaybeUninit<u8>], AllocError> {
        let (_, bytes) = self.buffer.bump(count, element_size, alignment)?;
        Ok(bytes)
    }

    fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    fn used(&self) -> usize {
        self.buffer.used()
    }

    fn base_addr(&self) -> usize {
        self.buffer.base_addr()
    }
}
