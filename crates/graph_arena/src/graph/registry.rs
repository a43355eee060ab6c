//! # Special Edge Registries
//!
//! Near edges, bent near edges and back edges need forced placement during
//! layout, so the walker records them in three prepend-only registries.
//! Entries are never removed one by one; the registries empty only on a
//! logical reset.

use crate::error::GraphResult;
use crate::memory::{ByteArena, EdgeId, Pool, RegistryCellId};
use crate::stats::PoolStats;

/// Which registry an edge is recorded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialEdgeKind {
    /// Endpoints placed side by side on one level.
    Near,
    /// Near edge drawn with a bend.
    BentNear,
    /// Edge declared as pointing upwards.
    Back,
}

impl SpecialEdgeKind {
    /// All registries, in storage order.
    pub const ALL: [Self; 3] = [Self::Near, Self::BentNear, Self::Back];

    const fn slot(self) -> usize {
        match self {
            Self::Near => 0,
            Self::BentNear => 1,
            Self::Back => 2,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RegistryCell {
    edge: EdgeId,
    next: Option<RegistryCellId>,
}

/// The three special edge registries sharing one cell pool.
#[derive(Debug, Default)]
pub struct SpecialEdgeRegistries {
    cells: Pool<RegistryCell, RegistryCellId>,
    heads: [Option<RegistryCellId>; 3],
    lengths: [usize; 3],
}

impl SpecialEdgeRegistries {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `edge` to the registry of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`](crate::GraphError::ArenaExhausted)
    /// when no recycled cell is available and the arena is full.
    pub fn insert(
        &mut self,
        arena: &mut ByteArena,
        kind: SpecialEdgeKind,
        edge: EdgeId,
    ) -> GraphResult<()> {
        let slot = kind.slot();
        let cell = RegistryCell {
            edge,
            next: self.heads[slot],
        };
        self.heads[slot] = Some(self.cells.allocate(arena, cell)?);
        self.lengths[slot] += 1;
        Ok(())
    }

    /// Edges registered under `kind`, most recent first.
    pub fn iter(&self, kind: SpecialEdgeKind) -> impl Iterator<Item = EdgeId> + '_ {
        let mut cursor = self.heads[kind.slot()];
        std::iter::from_fn(move || {
            let cell = self.cells.get(cursor?)?;
            cursor = cell.next;
            Some(cell.edge)
        })
    }

    /// Number of edges registered under `kind`.
    #[inline]
    #[must_use]
    pub fn len(&self, kind: SpecialEdgeKind) -> usize {
        self.lengths[kind.slot()]
    }

    /// Returns `true` if no edge is registered under `kind`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self, kind: SpecialEdgeKind) -> bool {
        self.heads[kind.slot()].is_none()
    }

    /// Clears all three heads and recycles every cell.
    pub fn reset_logical(&mut self) -> usize {
        self.heads = [None; 3];
        self.lengths = [0; 3];
        self.cells.release_all()
    }

    /// Returns the registries to their never-used shape.
    pub fn clear(&mut self) {
        self.reset_logical();
        self.cells.clear();
    }

    /// Slot counters of the shared cell pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.cells.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Handle;

    fn edge(index: u32) -> EdgeId {
        EdgeId::from_parts(index, 0)
    }

    #[test]
    fn test_registries_are_independent() {
        let mut arena = ByteArena::new(4096);
        let mut registries = SpecialEdgeRegistries::new();

        registries.insert(&mut arena, SpecialEdgeKind::Near, edge(1)).unwrap();
        registries.insert(&mut arena, SpecialEdgeKind::Back, edge(2)).unwrap();
        registries.insert(&mut arena, SpecialEdgeKind::Near, edge(3)).unwrap();

        let near: Vec<_> = registries.iter(SpecialEdgeKind::Near).collect();
        assert_eq!(near, vec![edge(3), edge(1)]);
        assert_eq!(registries.len(SpecialEdgeKind::Back), 1);
        assert!(registries.is_empty(SpecialEdgeKind::BentNear));
    }

    #[test]
    fn test_reset_recycles_cells() {
        let mut arena = ByteArena::new(4096);
        let mut registries = SpecialEdgeRegistries::new();

        for kind in SpecialEdgeKind::ALL {
            registries.insert(&mut arena, kind, edge(0)).unwrap();
        }
        assert_eq!(registries.reset_logical(), 3);
        assert!(SpecialEdgeKind::ALL.iter().all(|&k| registries.is_empty(k)));

        let allocations = arena.allocation_count();
        registries.insert(&mut arena, SpecialEdgeKind::BentNear, edge(4)).unwrap();
        assert_eq!(arena.allocation_count(), allocations);
    }
}
