//! # Node Reference Cells
//!
//! Singly linked lists of nodes. Working cells build generic lists during
//! a layout pass and belong to the open generation. Stable cells build
//! subgraph member lists and fold region lists; they outlive layout passes
//! and are handed back by the folding code through
//! [`NodeRefPool::release_region_list`].

use super::{release_chain, Chain, Linked};
use crate::error::{GraphError, GraphResult};
use crate::memory::{ByteArena, GenerationChain, NodeId, NodeRefId, Pool};
use crate::stats::PoolStats;

/// Lifetime of a node reference cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellScope {
    /// Reclaimed with the open generation.
    Working,
    /// Kept until released as a region list or by a logical reset.
    Stable,
}

/// One element of a node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRefCell {
    /// The referenced node.
    pub node: NodeId,
    /// The following cell.
    pub next: Option<NodeRefId>,
    scope: CellScope,
}

impl NodeRefCell {
    /// Lifetime of this cell.
    #[inline]
    #[must_use]
    pub const fn scope(&self) -> CellScope {
        self.scope
    }
}

impl Linked<NodeRefId> for NodeRefCell {
    #[inline]
    fn link(&self) -> Option<NodeRefId> {
        self.next
    }
}

/// Pool of node reference cells.
#[derive(Debug, Default)]
pub struct NodeRefPool {
    cells: Pool<NodeRefCell, NodeRefId>,
    active: GenerationChain<NodeRefId>,
}

impl NodeRefPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a working cell in front of `next`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn acquire(
        &mut self,
        arena: &mut ByteArena,
        node: NodeId,
        next: Option<NodeRefId>,
    ) -> GraphResult<NodeRefId> {
        let cell = NodeRefCell {
            node,
            next,
            scope: CellScope::Working,
        };
        let id = self.cells.allocate(arena, cell)?;
        self.active.prepend(id);
        Ok(id)
    }

    /// Takes a stable cell in front of `next`. Stable cells never join the
    /// open generation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn acquire_stable(
        &mut self,
        arena: &mut ByteArena,
        node: NodeId,
        next: Option<NodeRefId>,
    ) -> GraphResult<NodeRefId> {
        let cell = NodeRefCell {
            node,
            next,
            scope: CellScope::Stable,
        };
        self.cells.allocate(arena, cell)
    }

    /// Reclaims every working cell of the open generation.
    pub fn release_active(&mut self) -> usize {
        self.active.release_into(&mut self.cells)
    }

    /// Releases a working list early, starting at `head`.
    pub fn release_chain(&mut self, head: Option<NodeRefId>) -> usize {
        release_chain(&mut self.cells, head)
    }

    /// Releases a stable list (a subgraph member list or a fold region).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotRegionList`] without releasing anything if
    /// the chain contains a working cell.
    pub fn release_region_list(&mut self, head: Option<NodeRefId>) -> GraphResult<usize> {
        if self
            .iter_chain(head)
            .any(|(_, cell)| cell.scope != CellScope::Stable)
        {
            return Err(GraphError::NotRegionList);
        }
        Ok(release_chain(&mut self.cells, head))
    }

    /// Gets a cell, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeRefId) -> Option<&NodeRefCell> {
        self.cells.get(id)
    }

    /// Walks the list starting at `head`.
    #[must_use]
    pub fn iter_chain(&self, head: Option<NodeRefId>) -> Chain<'_, NodeRefCell, NodeRefId> {
        Chain::new(&self.cells, head)
    }

    /// Number of working cells in the open generation.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Releases every cell, working and stable.
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

    fn node(index: u32) -> NodeId {
        NodeId::from_parts(index, 0)
    }

    fn build(
        pool: &mut NodeRefPool,
        arena: &mut ByteArena,
        stable: bool,
        count: u32,
    ) -> Option<NodeRefId> {
        let mut head = None;
        for i in 0..count {
            head = Some(if stable {
                pool.acquire_stable(arena, node(i), head).unwrap()
            } else {
                pool.acquire(arena, node(i), head).unwrap()
            });
        }
        head
    }

    #[test]
    fn test_list_order_is_prepend() {
        let mut arena = ByteArena::new(4096);
        let mut pool = NodeRefPool::new();

        let head = build(&mut pool, &mut arena, false, 3);
        let nodes: Vec<_> = pool.iter_chain(head).map(|(_, cell)| cell.node).collect();
        assert_eq!(nodes, vec![node(2), node(1), node(0)]);
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_stable_cells_survive_generation() {
        let mut arena = ByteArena::new(4096);
        let mut pool = NodeRefPool::new();

        let stable = build(&mut pool, &mut arena, true, 2);
        build(&mut pool, &mut arena, false, 3);

        assert_eq!(pool.release_active(), 3);
        assert_eq!(pool.iter_chain(stable).count(), 2);
        assert_eq!(pool.stats().live, 2);
    }

    #[test]
    fn test_release_region_list() {
        let mut arena = ByteArena::new(4096);
        let mut pool = NodeRefPool::new();

        let region = build(&mut pool, &mut arena, true, 4);
        assert_eq!(pool.release_region_list(region), Ok(4));
        assert_eq!(pool.stats().live, 0);
        assert_eq!(pool.stats().free, 4);
    }

    #[test]
    fn test_region_release_rejects_working_cells() {
        let mut arena = ByteArena::new(4096);
        let mut pool = NodeRefPool::new();

        let working = build(&mut pool, &mut arena, false, 2);
        assert_eq!(pool.release_region_list(working), Err(GraphError::NotRegionList));
        assert_eq!(pool.stats().live, 2);
    }

    #[test]
    fn test_empty_chain_release_is_noop() {
        let mut pool = NodeRefPool::new();
        assert_eq!(pool.release_chain(None), 0);
        assert_eq!(pool.release_region_list(None), Ok(0));
        assert_eq!(pool.stats(), PoolStats::default());
    }

    #[test]
    fn test_early_chain_release_then_generation() {
        let mut arena = ByteArena::new(4096);
        let mut pool = NodeRefPool::new();

        let head = build(&mut pool, &mut arena, false, 3);
        assert_eq!(pool.release_chain(head), 3);
        // The generation still lists the cells but they are already free.
        assert_eq!(pool.release_active(), 0);
        assert_eq!(pool.stats().free, 3);
    }
}
