use core::{cell::Cell, mem::MaybeUninit, ptr::NonNull, slice};
use std::alloc::{alloc_zeroed, dealloc, Layout};

use log::{debug, trace};

use crate::{
    align::{checked_align_up, is_power_of_two},
    config::{AllocatorConfig, ValidationMode},
    errors::{AllocError, InvariantViolation},
};

/// The storage both allocators bump through: one zeroed heap block that is
/// never resized, and the offset of the first unused byte.
pub(crate) struct FixedBuffer {
    base: NonNull<u8>,
    // None when capacity is zero; nothing was allocated and nothing is freed
    layout: Option<Layout>,
    capacity: usize,
    used: Cell<usize>,
    validation: ValidationMode,
}

// The buffer is exclusively owned. Cell keeps it !Sync.
unsafe impl Send for FixedBuffer {}

impl FixedBuffer {
    pub(crate) fn new(config: &AllocatorConfig) -> Result<FixedBuffer, AllocError> {
        config
            .validation
            .check(is_power_of_two(config.base_align), || {
                InvariantViolation::NonPowerOfTwoAlignment(config.base_align)
            });

        let layout = Layout::from_size_align(config.capacity, config.base_align)
            .map_err(|_| AllocError::InvalidLayout {
                capacity: config.capacity,
                base_align: config.base_align,
            })?;

        let (base, layout) = if layout.size() == 0 {
            // well aligned, never dereferenced
            let dangling = layout.align() as *mut u8;
            let base = NonNull::new(dangling).ok_or(AllocError::InvalidLayout {
                capacity: config.capacity,
                base_align: config.base_align,
            })?;
            (base, None)
        } else {
            let pointer = unsafe { alloc_zeroed(layout) };
            let base = NonNull::new(pointer).ok_or(AllocError::OutOfMemory {
                capacity: config.capacity,
            })?;
            (base, Some(layout))
        };

        debug!(
            "reserved {} bytes at {:#x} (base align {})",
            config.capacity,
            base.as_ptr() as usize,
            config.base_align
        );

        Ok(FixedBuffer {
            base,
            layout,
            capacity: config.capacity,
            used: Cell::new(0),
            validation: config.validation,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.used.get()
    }

    #[inline]
    pub(crate) fn base_addr(&self) -> usize {
        self.base.as_ptr() as usize
    }

    #[inline]
    pub(crate) fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Moves the offset. Only callable with exclusive access, so no view
    /// handed out by `bump` can still be alive.
    #[inline]
    pub(crate) fn set_used(&mut self, used: usize) {
        debug_assert!(used <= self.capacity);
        self.used.set(used);
    }

    /// Reserves `count * element_size` bytes at the next address aligned to
    /// `alignment`. Returns the offset of the reservation and a view of it.
    ///
    /// On failure the offset is left untouched.
    #[allow(clippy::mut_from_ref)]
    pub(crate) fn bump(
        &self,
        count: usize,
        element_size: usize,
        alignment: usize,
    ) -> Result<(usize, &mut [MaybeUninit<u8>]), AllocError> {
        self.validation.check(is_power_of_two(alignment), || {
            InvariantViolation::NonPowerOfTwoAlignment(alignment)
        });

        let size = count
            .checked_mul(element_size)
            .ok_or(AllocError::SizeOverflow {
                count,
                element_size,
            })?;

        let used = self.used.get();
        let base_addr = self.base_addr();
        let at_capacity = |aligned_offset| AllocError::AtCapacity {
            requested: size,
            aligned_offset,
            capacity: self.capacity,
        };

        // the aligned address is never below the current one, so views
        // handed out earlier can't be overlapped even with a bad alignment
        let aligned_addr =
            checked_align_up(base_addr + used, alignment).ok_or(at_capacity(used))?;
        let aligned_offset = aligned_addr - base_addr;
        if aligned_offset > self.capacity || size > self.capacity - aligned_offset {
            trace!(
                "rejected {} bytes at offset {} (capacity {})",
                size,
                aligned_offset,
                self.capacity
            );
            return Err(at_capacity(aligned_offset));
        }

        self.used.set(aligned_offset + size);
        trace!("bumped {} bytes at offset {}", size, aligned_offset);

        let view = unsafe {
            let pointer = self.base.as_ptr().add(aligned_offset);
            slice::from_raw_parts_mut(pointer as *mut MaybeUninit<u8>, size)
        };
        Ok((aligned_offset, view))
    }

    /// View of every byte below the offset
    pub(crate) fn used_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        unsafe {
            slice::from_raw_parts_mut(
                self.base.as_ptr() as *mut MaybeUninit<u8>,
                self.used.get(),
            )
        }
    }
}

impl Drop for FixedBuffer {
    fn drop(&mut self) {
        debug!(
            "releasing {} bytes at {:#x}",
            self.capacity,
            self.base_addr()
        );
        if let Some(layout) = self.layout {
            unsafe {
                dealloc(self.base.as_ptr(), layout);
            }
        }
    }
}
