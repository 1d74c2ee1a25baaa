//! The allocation surface shared by [`FixedArena`](crate::fixed_arena::FixedArena)
//! and [`StackAllocator`](crate::stack_allocator::StackAllocator).

use core::{
    mem::{align_of, size_of, MaybeUninit},
    ptr, slice,
};

use crate::{config::DEFAULT_ALIGN, errors::AllocError};

/// A fixed-capacity allocator that hands out memory by bumping an offset.
///
/// Every allocation borrows the allocator immutably, so any number of
/// allocations can be alive at once. Operations that move the offset back
/// (reset, pop) take `&mut self`, which ends all of those borrows.
///
/// Values written into the allocator are never dropped.
///
/// # Safety
///
/// Implementors of [`alloc_raw`](BumpAllocator::alloc_raw) must return a view
/// of exactly `count * element_size` bytes whose address is a multiple of
/// `alignment` whenever `alignment` is a power of two, and which does not
/// overlap any other view that can still be borrowed.
pub unsafe trait BumpAllocator {
    /// The general allocation entry point: room for `count` elements of
    /// `element_size` bytes each, starting at an address aligned to
    /// `alignment`. The bytes are left as they are.
    #[allow(clippy::mut_from_ref)]
    fn alloc_raw(
        &self,
        count: usize,
        element_size: usize,
        alignment: usize,
    ) -> Result<&mut [MaybeUninit<u8>], AllocError>;

    /// Total size of the backing buffer in bytes
    fn capacity(&self) -> usize;

    /// The current offset: bytes consumed by allocations and their padding
    fn used(&self) -> usize;

    /// Address of the first byte of the backing buffer
    fn base_addr(&self) -> usize;

    fn remaining(&self) -> usize {
        self.capacity() - self.used()
    }

    /// A single `size`-byte allocation aligned to `alignment`
    #[allow(clippy::mut_from_ref)]
    fn alloc_aligned(
        &self,
        size: usize,
        alignment: usize,
    ) -> Result<&mut [MaybeUninit<u8>], AllocError> {
        self.alloc_raw(1, size, alignment)
    }

    /// A single `size`-byte allocation aligned to the platform word
    #[allow(clippy::mut_from_ref)]
    fn alloc_default_aligned(
        &self,
        size: usize,
    ) -> Result<&mut [MaybeUninit<u8>], AllocError> {
        self.alloc_raw(1, size, DEFAULT_ALIGN)
    }

    /// Like [`alloc_aligned`](BumpAllocator::alloc_aligned) but the bytes are
    /// zeroed before they are returned
    #[allow(clippy::mut_from_ref)]
    fn alloc_zeroed_bytes(
        &self,
        size: usize,
        alignment: usize,
    ) -> Result<&mut [u8], AllocError> {
        let bytes = self.alloc_raw(1, size, alignment)?;
        unsafe {
            let pointer = bytes.as_mut_ptr() as *mut u8;
            ptr::write_bytes(pointer, 0, size);
            Ok(slice::from_raw_parts_mut(pointer, size))
        }
    }

    /// Moves `val` into the allocator
    #[allow(clippy::mut_from_ref)]
    fn alloc<T>(&self, val: T) -> Result<&mut T, AllocError> {
        let bytes = self.alloc_raw(1, size_of::<T>(), align_of::<T>())?;
        unsafe {
            let result = bytes.as_mut_ptr() as *mut T;
            ptr::write(result, val);
            Ok(&mut *result)
        }
    }

    /// Allocates an all-zero `T`
    ///
    /// # Safety
    ///
    /// The all-zero bit pattern must be a valid `T`.
    #[allow(clippy::mut_from_ref)]
    unsafe fn alloc_zeroed<T>(&self) -> Result<&mut T, AllocError> {
        let bytes = self.alloc_raw(1, size_of::<T>(), align_of::<T>())?;
        let result = bytes.as_mut_ptr() as *mut T;
        ptr::write_bytes(result, 0, 1);
        Ok(&mut *result)
    }

    /// Allocates `count` clones of `val`
    #[allow(clippy::mut_from_ref)]
    fn alloc_array<T>(&self, val: T, count: usize) -> Result<&mut [T], AllocError>
    where
        T: Clone,
    {
        let bytes = self.alloc_raw(count, size_of::<T>(), align_of::<T>())?;
        unsafe {
            let pointer = bytes.as_mut_ptr() as *mut T;
            for index in 0..count {
                ptr::write(pointer.add(index), val.clone());
            }
            Ok(slice::from_raw_parts_mut(pointer, count))
        }
    }

    /// Allocates `count` default values
    #[allow(clippy::mut_from_ref)]
    fn alloc_default_array<T>(&self, count: usize) -> Result<&mut [T], AllocError>
    where
        T: Default,
    {
        let bytes = self.alloc_raw(count, size_of::<T>(), align_of::<T>())?;
        unsafe {
            let pointer = bytes.as_mut_ptr() as *mut T;
            for index in 0..count {
                ptr::write(pointer.add(index), T::default());
            }
            Ok(slice::from_raw_parts_mut(pointer, count))
        }
    }

    /// Allocates `count` all-zero values of `T`
    ///
    /// # Safety
    ///
    /// The all-zero bit pattern must be a valid `T`.
    #[allow(clippy::mut_from_ref)]
    unsafe fn alloc_zeroed_array<T>(&self, count: usize) -> Result<&mut [T], AllocError> {
        let bytes = self.alloc_raw(count, size_of::<T>(), align_of::<T>())?;
        let pointer = bytes.as_mut_ptr() as *mut T;
        ptr::write_bytes(pointer, 0, count);
        Ok(slice::from_raw_parts_mut(pointer, count))
    }
}
