//! Fixed-capacity bump allocators.
//!
//! [`FixedArena`] hands out memory by moving an offset forward through a
//! buffer allocated once up front and gives it all back at once on
//! [`reset`](FixedArena::reset). [`StackAllocator`] does the same but can
//! also [`pop`](StackAllocator::pop) its most recent allocations.
//!
//! ```
//! use tea_bump::{BumpAllocator, FixedArena};
//!
//! let mut arena = FixedArena::with_capacity(1024).unwrap();
//! let values = arena.alloc_array(0u32, 16).unwrap();
//! values[3] = 7;
//! assert_eq!(arena.used(), 64);
//!
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//! ```

pub mod align;
pub mod bump;
pub mod config;
pub mod errors;
pub mod fixed_arena;
mod fixed_buffer;
pub mod platform;
pub mod stack_allocator;

pub use bump::BumpAllocator;
pub use config::{AllocatorConfig, ValidationMode, DEFAULT_ALIGN};
pub use errors::{AllocError, InvariantViolation};
pub use fixed_arena::FixedArena;
pub use stack_allocator::{StackAllocator, StackFrame, StackMarker};

#[cfg(test)]
mod test_common;
