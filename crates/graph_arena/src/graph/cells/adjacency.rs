//! # Adjacency Cells
//!
//! Per-node predecessor and successor chains of edges, rebuilt on every
//! layout pass.

use super::{release_chain, Chain, Linked};
use crate::error::GraphResult;
use crate::memory::{AdjacencyId, ByteArena, EdgeId, GenerationChain, Pool};
use crate::stats::PoolStats;

/// One element of an adjacency chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjacencyCell {
    /// The edge this cell stands for.
    pub edge: EdgeId,
    /// The following cell.
    pub next: Option<AdjacencyId>,
}

impl Linked<AdjacencyId> for AdjacencyCell {
    #[inline]
    fn link(&self) -> Option<AdjacencyId> {
        self.next
    }
}

/// Pool of adjacency cells.
#[derive(Debug, Default)]
pub struct AdjacencyPool {
    cells: Pool<AdjacencyCell, AdjacencyId>,
    active: GenerationChain<AdjacencyId>,
}

impl AdjacencyPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a cell for `edge` in front of `next`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`](crate::GraphError::ArenaExhausted)
    /// when the arena is full.
    pub fn acquire(
        &mut self,
        arena: &mut ByteArena,
        edge: EdgeId,
        next: Option<AdjacencyId>,
    ) -> GraphResult<AdjacencyId> {
        let id = self.cells.allocate(arena, AdjacencyCell { edge, next })?;
        self.active.prepend(id);
        Ok(id)
    }

    /// Reclaims every cell of the open generation.
    pub fn release_active(&mut self) -> usize {
        self.active.release_into(&mut self.cells)
    }

    /// Releases one chain early, starting at `head`.
    pub fn release_chain(&mut self, head: Option<AdjacencyId>) -> usize {
        release_chain(&mut self.cells, head)
    }

    /// Gets a cell, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: AdjacencyId) -> Option<&AdjacencyCell> {
        self.cells.get(id)
    }

    /// Walks the chain starting at `head`.
    #[must_use]
    pub fn iter_chain(
        &self,
        head: Option<AdjacencyId>,
    ) -> Chain<'_, AdjacencyCell, AdjacencyId> {
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
