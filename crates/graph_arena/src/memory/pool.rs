//! # Slot Pool
//!
//! Fixed-type slot allocator backed by the byte arena.
//!
//! A slot is either live (`Some(value)`) or free (`None`). Free slots sit
//! on the pool's free list and are reissued before the arena is asked for
//! more space, so a recycled slot costs no arena allocation.

use std::marker::PhantomData;

use super::arena::ByteArena;
use super::handle::Handle;
use crate::error::{GraphError, GraphResult};
use crate::stats::PoolStats;

/// A single pool slot.
#[derive(Debug)]
struct Slot<T> {
    /// Bumped every time the slot is released.
    generation: u32,
    /// The stored object, `None` while the slot is on the free list.
    value: Option<T>,
}

/// A pool allocator for objects of one type, addressed by one handle type.
///
/// Objects can be released individually or in bulk, and every release bumps
/// the slot's generation so an old handle no longer resolves.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe and not reentrant.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena = ByteArena::new(1 << 20);
/// let mut pool: Pool<u32, NodeId> = Pool::new();
///
/// let handle = pool.allocate(&mut arena, 42)?;
/// pool.free(handle);
///
/// // Reissued from the free list, no arena allocation
/// let again = pool.allocate(&mut arena, 7)?;
/// ```
#[derive(Debug)]
pub struct Pool<T, H> {
    /// The storage array.
    slots: Vec<Slot<T>>,
    /// Free list - indices of released slots, most recent last.
    free_list: Vec<u32>,
    /// Number of live objects.
    allocated_count: usize,
    /// Generation given to slots created after the last full clear.
    epoch: u32,
    /// Marker for the handle type.
    _phantom: PhantomData<H>,
}

impl<T, H: Handle> Default for Pool<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: Handle> Pool<T, H> {
    /// Creates an empty pool. No memory is reserved until the first allocation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            allocated_count: 0,
            epoch: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of currently live objects.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Returns the number of slots waiting on the free list.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Returns the number of slots ever drawn from the arena.
    #[inline]
    #[must_use]
    pub fn reserved(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` in a free slot, drawing a new one from `arena` only
    /// when the free list is empty.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when a fresh slot is needed
    /// and the arena is full.
    pub fn allocate(&mut self, arena: &mut ByteArena, value: T) -> GraphResult<H> {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            self.allocated_count += 1;
            return Ok(H::from_parts(index, slot.generation));
        }

        arena.allocate_for::<T>()?;
        let index = u32::try_from(self.slots.len()).map_err(|_| GraphError::ArenaExhausted {
            requested: std::mem::size_of::<T>(),
            remaining: arena.remaining(),
        })?;

        self.slots.push(Slot {
            generation: self.epoch,
            value: Some(value),
        });
        self.allocated_count += 1;

        tracing::trace!(kind = H::KIND, reserved = self.slots.len(), "pool grew from arena");
        Ok(H::from_parts(index, self.epoch))
    }

    /// Releases a live object, returning it.
    ///
    /// Returns `None` if the handle is stale or already released.
    pub fn free(&mut self, handle: H) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index());
        self.allocated_count -= 1;

        Some(value)
    }

    /// Releases every live handle yielded by `handles`, skipping stale ones.
    ///
    /// Returns the number of objects actually released.
    pub fn free_all<I>(&mut self, handles: I) -> usize
    where
        I: IntoIterator<Item = H>,
    {
        handles
            .into_iter()
            .filter(|&handle| self.free(handle).is_some())
            .count()
    }

    /// Checks whether a handle still refers to a live object.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.get(handle).is_some()
    }

    /// Gets a reference to a live object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: H) -> Option<&T> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable reference to a live object.
    #[inline]
    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    /// Releases every live object while keeping all slots reserved.
    ///
    /// Returns the number of objects released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(index as u32);
                released += 1;
            }
        }
        self.allocated_count = 0;
        released
    }

    /// Drops every slot, returning the pool to its never-used shape.
    ///
    /// Slots created afterwards start at a generation above any handle
    /// issued before, so old handles never validate again.
    pub fn clear(&mut self) {
        let highest = self.slots.iter().map(|slot| slot.generation).max();
        if let Some(highest) = highest {
            self.epoch = self.epoch.max(highest.wrapping_add(1));
        }
        self.slots.clear();
        self.free_list.clear();
        self.allocated_count = 0;
    }

    /// Iterates over all live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (H::from_parts(index as u32, slot.generation), value))
        })
    }

    /// Iterates mutably over all live objects in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (H::from_parts(index as u32, generation), value))
        })
    }

    /// Returns the live/free/reserved counters of this pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            live: self.allocated_count,
            free: self.free_list.len(),
            reserved: self.slots.len(),
        }
    }
}

/// The open generation of a generation-scoped pool.
///
/// Handles are recorded in issue order; iteration yields the most recent
/// first, matching the prepend order of the chain it models.
#[derive(Debug)]
pub struct GenerationChain<H> {
    members: Vec<H>,
}

impl<H: Handle> Default for GenerationChain<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle> GenerationChain<H> {
    /// Creates an empty generation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Records a freshly issued handle at the head of the generation.
    #[inline]
    pub fn prepend(&mut self, handle: H) {
        self.members.push(handle);
    }

    /// Returns the number of handles recorded.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if nothing was issued in this generation.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates most-recent-first.
    pub fn iter(&self) -> impl Iterator<Item = H> + '_ {
        self.members.iter().rev().copied()
    }

    /// Releases the whole generation back into `pool`, leaving it empty.
    ///
    /// Handles already released individually are skipped. Returns the
    /// number of objects reclaimed.
    pub fn release_into<T>(&mut self, pool: &mut Pool<T, H>) -> usize {
        pool.free_all(self.members.drain(..))
    }

    /// Forgets every recorded handle without touching the pool.
    #[inline]
    pub fn clear(&mut self) {
        self.members.clear();
    }
}
