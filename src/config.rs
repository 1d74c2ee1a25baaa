//! Allocator configuration

use std::mem::align_of;

use crate::{errors::InvariantViolation, platform};

/// How invariant violations (bad alignment, zero-sized pops, out of order
/// pops) are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Check every invariant and panic on the first violation
    Strict,
    /// Skip invariant checks. Capacity and underflow checks still run.
    Fast,
}

impl ValidationMode {
    /// Panics with the violation's message when strict and `holds` is false
    #[inline]
    pub(crate) fn check(self, holds: bool, violation: impl FnOnce() -> InvariantViolation) {
        if self == ValidationMode::Strict && !holds {
            panic!("{}", violation());
        }
    }
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ValidationMode::Strict
        } else {
            ValidationMode::Fast
        }
    }
}

/// Default alignment for allocations that don't name one: the platform word
pub const DEFAULT_ALIGN: usize = align_of::<usize>();

/// Configuration shared by [`FixedArena`](crate::fixed_arena::FixedArena)
/// and [`StackAllocator`](crate::stack_allocator::StackAllocator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Size of the backing buffer in bytes
    pub capacity: usize,
    /// Alignment of the buffer's base address
    pub base_align: usize,
    /// Invariant handling
    pub validation: ValidationMode,
    /// Record allocation sizes so stack pops can be checked for LIFO order.
    /// Ignored by the arena.
    pub track_lifo: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            capacity: 0,
            base_align: DEFAULT_ALIGN,
            validation: ValidationMode::default(),
            track_lifo: cfg!(debug_assertions),
        }
    }
}

impl AllocatorConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Capacity of `pages` whole pages, with the base aligned to a page
    pub fn with_pages(pages: usize) -> Self {
        let page_size = platform::page_size();
        Self {
            capacity: pages.saturating_mul(page_size),
            base_align: page_size,
            ..Default::default()
        }
    }

    /// Strict checks and LIFO tracking
    pub fn debug(capacity: usize) -> Self {
        Self {
            capacity,
            validation: ValidationMode::Strict,
            track_lifo: true,
            ..Default::default()
        }
    }

    /// No invariant checks, no tracking
    pub fn performance(capacity: usize) -> Self {
        Self {
            capacity,
            validation: ValidationMode::Fast,
            track_lifo: false,
            ..Default::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_base_align(mut self, base_align: usize) -> Self {
        self.base_align = base_align;
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_lifo_tracking(mut self, track_lifo: bool) -> Self {
        self.track_lifo = track_lifo;
        self
    }
}
