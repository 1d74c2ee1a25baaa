use thiserror::Error;

/// Errors that may be returned from an attempt to allocate from, or pop
/// from, a fixed-capacity allocator. None of these leave the allocator in a
/// modified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error(
        "at capacity: {requested} bytes at offset {aligned_offset} exceeds capacity {capacity}"
    )]
    AtCapacity {
        requested: usize,
        aligned_offset: usize,
        capacity: usize,
    },

    #[error("allocation size overflows: {count} elements of {element_size} bytes")]
    SizeOverflow { count: usize, element_size: usize },

    #[error("pop of {requested} bytes would underflow offset {used}")]
    PopUnderflow { requested: usize, used: usize },

    #[error("marker {marker} is above the current offset {used}")]
    StaleMarker { marker: usize, used: usize },

    #[error("no buffer of {capacity} bytes can be aligned to {base_align}")]
    InvalidLayout { capacity: usize, base_align: usize },

    #[error("system allocator could not provide {capacity} bytes")]
    OutOfMemory { capacity: usize },
}

/// Programmer errors. These are never returned: in strict validation mode
/// they panic with this message, in fast mode they are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("alignment {0} is not a power of two")]
    NonPowerOfTwoAlignment(usize),

    #[error("pop size must be non-zero")]
    ZeroSizedPop,

    #[error("pop of {requested} bytes does not match the most recent allocations (nearest cumulative size {expected})")]
    LifoMismatch { requested: usize, expected: usize },
}
