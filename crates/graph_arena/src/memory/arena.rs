//! # Byte Arena
//!
//! A monotonic bump allocator that every pool draws fresh slots from.
//! Memory is given back all at once when the arena is reset.

use std::alloc::Layout;

use crate::error::{GraphError, GraphResult};

/// A bump-pointer byte arena.
///
/// Allocations only advance an offset. Nothing is returned individually:
/// [`ByteArena::reset`] invalidates everything issued so far.
///
/// The arena also counts how many allocations it served, which is how
/// callers observe that recycled objects were reused instead of freshly
/// allocated.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. It is owned by exactly one
/// [`GraphArena`](crate::GraphArena).
///
/// # Example
///
/// ```rust,ignore
/// let mut arena = ByteArena::new(1024 * 1024); // 1MB
///
/// let offset = arena.allocate(Layout::new::<u64>())?;
///
/// // Reset to free all allocations
/// arena.reset();
/// ```
#[derive(Debug)]
pub struct ByteArena {
    /// Current allocation offset.
    offset: usize,
    /// Total capacity.
    capacity: usize,
    /// Number of allocations served since the last reset.
    allocations: u64,
}

impl ByteArena {
    /// Creates a new arena with the specified capacity in bytes.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            offset: 0,
            capacity,
            allocations: 0,
        }
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current used space in bytes.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.offset
    }

    /// Returns the remaining free space in bytes.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.offset
    }

    /// Returns how many allocations were served since the last reset.
    #[inline]
    #[must_use]
    pub const fn allocation_count(&self) -> u64 {
        self.allocations
    }

    /// Reserves a block matching `layout`, returning its offset.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the aligned block does not
    /// fit in the remaining space. The arena never grows.
    pub fn allocate(&mut self, layout: Layout) -> GraphResult<usize> {
        let align = layout.align();
        let aligned_offset = (self.offset + align - 1) & !(align - 1);
        let new_offset = aligned_offset
            .checked_add(layout.size())
            .filter(|&end| end <= self.capacity)
            .ok_or(GraphError::ArenaExhausted {
                requested: layout.size(),
                remaining: self.remaining(),
            })?;

        self.offset = new_offset;
        self.allocations += 1;
        Ok(aligned_offset)
    }

    /// Reserves space for one value of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    #[inline]
    pub fn allocate_for<T>(&mut self) -> GraphResult<usize> {
        self.allocate(Layout::new::<T>())
    }

    /// Resets the arena, invalidating all previous allocations.
    ///
    /// No memory is freed or reallocated; the offset and counter go back
    /// to zero.
    #[inline]
    pub fn reset(&mut self) {
        self.offset = 0;
        self.allocations = 0;
    }
}
