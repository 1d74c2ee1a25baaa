use core::{cell::RefCell, mem::MaybeUninit, ops::Deref};

use log::{debug, trace, warn};

use crate::{
    bump::BumpAllocator,
    config::AllocatorConfig,
    errors::{AllocError, InvariantViolation},
    fixed_buffer::FixedBuffer,
};

/// A saved offset of a [`StackAllocator`], see [`StackAllocator::mark`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StackMarker(usize);

impl StackMarker {
    pub fn offset(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct LifoEntry {
    // offset before the bump, padding excluded
    before: usize,
    start: usize,
    size: usize,
}

/// A bump allocator whose most recent allocations can be released again.
///
/// [`pop`](StackAllocator::pop) moves the offset back by a byte count the
/// caller supplies. Pops have to mirror the pushes in reverse order and with
/// exact sizes. Nothing is recorded per allocation unless LIFO tracking is
/// turned on in the [`AllocatorConfig`], in which case out-of-order pops are
/// reported as invariant violations.
pub struct StackAllocator {
    buffer: FixedBuffer,
    lifo: Option<RefCell<Vec<LifoEntry>>>,
}

impl StackAllocator {
    /// Creates a stack of `capacity` bytes with the default configuration
    pub fn with_capacity(capacity: usize) -> Result<StackAllocator, AllocError> {
        Self::with_config(AllocatorConfig::new(capacity))
    }

    pub fn with_config(config: AllocatorConfig) -> Result<StackAllocator, AllocError> {
        let buffer = FixedBuffer::new(&config)?;
        let lifo = config.track_lifo.then(|| RefCell::new(Vec::new()));
        Ok(StackAllocator { buffer, lifo })
    }

    /// Whether pops are checked against recorded allocation sizes
    pub fn tracks_lifo(&self) -> bool {
        self.lifo.is_some()
    }

    /// Releases the last `size` bytes.
    ///
    /// `size` is compared against the current offset: a pop larger than what
    /// has been allocated is rejected and leaves the stack as it was.
    ///
    /// Untracked, the offset moves back by exactly `size`. With LIFO tracking
    /// a pop that matches the most recent allocations restores the offset
    /// they were pushed at, alignment padding included.
    ///
    /// # Panics
    ///
    /// In strict validation mode, if `size` is zero or, with LIFO tracking,
    /// if `size` is not the exact total of the most recent allocations.
    pub fn pop(&mut self, size: usize) -> Result<(), AllocError> {
        let validation = self.buffer.validation();
        validation.check(size != 0, || InvariantViolation::ZeroSizedPop);

        let used = self.buffer.used();
        if size > used {
            warn!("rejected pop of {} bytes with only {} in use", size, used);
            return Err(AllocError::PopUnderflow {
                requested: size,
                used,
            });
        }

        let mut restored = used - size;
        if let Some(lifo) = &mut self.lifo {
            let entries = lifo.get_mut();
            let mut popped = 0;
            let mut cumulative = 0;
            for entry in entries.iter().rev() {
                if cumulative >= size {
                    break;
                }
                cumulative += entry.size;
                popped += 1;
            }
            validation.check(cumulative == size, || InvariantViolation::LifoMismatch {
                requested: size,
                expected: cumulative,
            });
            let keep = entries.len() - popped;
            if popped > 0 && cumulative == size {
                restored = entries[keep].before;
            }
            entries.truncate(keep);
        }

        self.buffer.set_used(restored);
        trace!("popped {} bytes, offset now {}", size, restored);
        Ok(())
    }

    /// The current offset, to roll back to with [`pop_to`](StackAllocator::pop_to)
    pub fn mark(&self) -> StackMarker {
        StackMarker(self.buffer.used())
    }

    /// Releases everything allocated since `marker` was taken.
    ///
    /// A marker above the current offset (taken before a pop that went below
    /// it) is rejected and leaves the stack as it was.
    pub fn pop_to(&mut self, marker: StackMarker) -> Result<(), AllocError> {
        let used = self.buffer.used();
        if marker.0 > used {
            warn!("rejected marker {} above offset {}", marker.0, used);
            return Err(AllocError::StaleMarker {
                marker: marker.0,
                used,
            });
        }

        if let Some(lifo) = &mut self.lifo {
            let entries = lifo.get_mut();
            while entries
                .last()
                .is_some_and(|entry| entry.start + entry.size > marker.0)
            {
                entries.pop();
            }
        }

        debug!("rolled back from {} to {}", used, marker.0);
        self.buffer.set_used(marker.0);
        Ok(())
    }

    /// Pops everything
    pub fn reset(&mut self) {
        debug!("stack reset, discarding {} bytes", self.buffer.used());
        if let Some(lifo) = &mut self.lifo {
            lifo.get_mut().clear();
        }
        self.buffer.set_used(0);
    }

    /// Starts a frame that rolls the stack back to the current offset when
    /// dropped. Allocations made through the frame borrow it, so none of them
    /// outlive the roll back.
    pub fn frame(&mut self) -> StackFrame<'_> {
        let marker = self.mark();
        StackFrame {
            allocator: self,
            marker,
        }
    }

    /// Releases the buffer. Dropping the stack does the same.
    pub fn free(self) {
        drop(self);
    }

    /// Every byte allocated so far, padding included
    pub fn used_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        self.buffer.used_mut()
    }
}

unsafe impl BumpAllocator for StackAllocator {
    fn alloc_raw(
        &self,
        count: usize,
        element_size: usize,
        alignment: usize,
    ) -> Result<&mut [MaybeUninit<u8>], AllocError> {
        let before = self.buffer.used();
        let (start, bytes) = self.buffer.bump(count, element_size, alignment)?;
        if let Some(lifo) = &self.lifo {
            lifo.borrow_mut().push(LifoEntry {
                before,
                start,
                size: bytes.len(),
            });
        }
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

/// Scoped allocation on a [`StackAllocator`], see [`StackAllocator::frame`]
pub struct StackFrame<'a> {
    allocator: &'a mut StackAllocator,
    marker: StackMarker,
}

impl StackFrame<'_> {
    pub fn marker(&self) -> StackMarker {
        self.marker
    }
}

impl Deref for StackFrame<'_> {
    type Target = StackAllocator;

    fn deref(&self) -> &StackAllocator {
        self.allocator
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        // nothing below the marker can be popped through a shared borrow
        let result = self.allocator.pop_to(self.marker);
        debug_assert!(result.is_ok());
    }
}
