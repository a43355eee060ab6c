//! # Double-Link Cells
//!
//! Doubly linked cells used only by the crossing-count sweep. Cells are
//! appended while a level is scanned and dropped wholesale afterwards.

use super::{release_chain, Chain, Linked};
use crate::error::GraphResult;
use crate::memory::{ByteArena, DoubleLinkId, GenerationChain, NodeId, Pool};
use crate::stats::PoolStats;

/// One element of a sweep list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoubleLinkCell {
    /// Node the cell tracks.
    pub node: NodeId,
    /// Previous cell.
    pub pred: Option<DoubleLinkId>,
    /// Next cell.
    pub succ: Option<DoubleLinkId>,
    /// Scratch counter.
    pub count: i32,
    /// Scratch position.
    pub position: i32,
}

impl Linked<DoubleLinkId> for DoubleLinkCell {
    #[inline]
    fn link(&self) -> Option<DoubleLinkId> {
        self.succ
    }
}

/// Pool of double-link cells.
#[derive(Debug, Default)]
pub struct DoubleLinkPool {
    cells: Pool<DoubleLinkCell, DoubleLinkId>,
    active: GenerationChain<DoubleLinkId>,
}

impl DoubleLinkPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a cell for `node` and inserts it right after `pred`, if given.
    ///
    /// A stale `pred` starts a new list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`](crate::GraphError::ArenaExhausted)
    /// when the arena is full.
    pub fn acquire(
        &mut self,
        arena: &mut ByteArena,
        node: NodeId,
        pred: Option<DoubleLinkId>,
    ) -> GraphResult<DoubleLinkId> {
        let pred = pred.filter(|&pred| self.cells.contains(pred));
        let succ = pred
            .and_then(|pred| self.cells.get(pred))
            .and_then(|previous| previous.succ);
        let cell = DoubleLinkCell {
            node,
            pred,
            succ,
            count: 0,
            position: 0,
        };
        let id = self.cells.allocate(arena, cell)?;
        self.active.prepend(id);

        if let Some(previous) = pred.and_then(|pred| self.cells.get_mut(pred)) {
            previous.succ = Some(id);
        }
        if let Some(next) = succ.and_then(|succ| self.cells.get_mut(succ)) {
            next.pred = Some(id);
        }
        Ok(id)
    }

    /// Unlinks one cell from its neighbours and releases it.
    ///
    /// Returns `false` if the handle is stale.
    pub fn unlink(&mut self, id: DoubleLinkId) -> bool {
        let Some(cell) = self.cells.free(id) else {
            return false;
        };
        if let Some(pred) = cell.pred.and_then(|pred| self.cells.get_mut(pred)) {
            pred.succ = cell.succ;
        }
        if let Some(succ) = cell.succ.and_then(|succ| self.cells.get_mut(succ)) {
            succ.pred = cell.pred;
        }
        true
    }

    /// Reclaims every cell of the open generation.
    pub fn release_active(&mut self) -> usize {
        self.active.release_into(&mut self.cells)
    }

    /// Releases a list early, following successor links from `head`.
    pub fn release_chain(&mut self, head: Option<DoubleLinkId>) -> usize {
        release_chain(&mut self.cells, head)
    }

    /// Gets a cell, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: DoubleLinkId) -> Option<&DoubleLinkCell> {
        self.cells.get(id)
    }

    /// Gets a mutable cell, or `None` if the handle is stale.
    #[inline]
    pub fn get_mut(&mut self, id: DoubleLinkId) -> Option<&mut DoubleLinkCell> {
        self.cells.get_mut(id)
    }

    /// Walks successor links starting at `head`.
    #[must_use]
    pub fn iter_chain(
        &self,
        head: Option<DoubleLinkId>,
    ) -> Chain<'_, DoubleLinkCell, DoubleLinkId> {
        Chain::new(&self.cells, head)
    }

    /// Releases every cell, keeping the slots.
    pub fn reset_logical(&mut self) -> usize {
        self.active.clear();
        self.cells.release_all()
    }

    /// Returns the pool to its never-used shape.
    pub fn clear(&mut self) {
        self.active.clear();
        self.cells.clear();
    }

    /// Slot counters of the underlying pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.cells.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Handle;

    fn sweep(pool: &mut DoubleLinkPool, arena: &mut ByteArena, count: u32) -> Vec<DoubleLinkId> {
        let mut cells = Vec::new();
        let mut pred = None;
        for i in 0..count {
            let id = pool.acquire(arena, NodeId::from_parts(i, 0), pred).unwrap();
            cells.push(id);
            pred = Some(id);
        }
        cells
    }

    #[test]
    fn test_append_links_both_ways() {
        let mut arena = ByteArena::new(4096);
        let mut pool = DoubleLinkPool::new();
        let cells = sweep(&mut pool, &mut arena, 3);

        assert_eq!(pool.get(cells[0]).unwrap().succ, Some(cells[1]));
        assert_eq!(pool.get(cells[2]).unwrap().pred, Some(cells[1]));
        assert_eq!(pool.iter_chain(Some(cells[0])).count(), 3);
    }

    #[test]
    fn test_unlink_middle() {
        let mut arena = ByteArena::new(4096);
        let mut pool = DoubleLinkPool::new();
        let cells = sweep(&mut pool, &mut arena, 3);

        assert!(pool.unlink(cells[1]));
        assert!(!pool.unlink(cells[1]));
        assert_eq!(pool.get(cells[0]).unwrap().succ, Some(cells[2]));
        assert_eq!(pool.get(cells[2]).unwrap().pred, Some(cells[0]));

        assert_eq!(pool.release_active(), 2);
    }

    #[test]
    fn test_release_chain_from_head() {
        let mut arena = ByteArena::new(4096);
        let mut pool = DoubleLinkPool::new();
        let cells = sweep(&mut pool, &mut arena, 4);

        assert_eq!(pool.release_chain(Some(cells[2])), 2);
        assert_eq!(pool.stats().live, 2);
        assert_eq!(pool.release_chain(None), 0);
    }

    #[test]
    fn test_acquire_after_inner_cell_splices() {
        let mut arena = ByteArena::new(4096);
        let mut pool = DoubleLinkPool::new();
        let head = pool.acquire(&mut arena, NodeId::from_parts(0, 0), None).unwrap();
        let tail = pool.acquire(&mut arena, NodeId::from_parts(1, 0), Some(head)).unwrap();
        let middle = pool.acquire(&mut arena, NodeId::from_parts(2, 0), Some(head)).unwrap();

        let order: Vec<_> = pool.iter_chain(Some(head)).map(|(id, _)| id).collect();
        assert_eq!(order, vec![head, middle, tail]);
        assert_eq!(pool.get(middle).unwrap().pred, Some(head));
        assert_eq!(pool.get(tail).unwrap().pred, Some(middle));
    }
}
