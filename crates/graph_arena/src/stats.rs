//! # Memory Statistics
//!
//! Counters describing every pool, sequence and registry of a
//! [`GraphArena`](crate::GraphArena). Two snapshots compare equal exactly
//! when the structural state of the arenas is the same, which is how a
//! reset arena is checked against a pristine one.

use std::fmt;

/// Slot counters of one pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Objects currently issued.
    pub live: usize,
    /// Released slots waiting for reuse.
    pub free: usize,
    /// Slots ever drawn from the arena.
    pub reserved: usize,
}

/// Snapshot of the whole graph arena.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Node pool.
    pub nodes: PoolStats,
    /// Edge pool.
    pub edges: PoolStats,
    /// Node reference cell pool.
    pub node_refs: PoolStats,
    /// Adjacency cell pool.
    pub adjacency: PoolStats,
    /// Connection record pool.
    pub connections: PoolStats,
    /// Double-link cell pool.
    pub double_links: PoolStats,
    /// Special edge registry cell pool.
    pub registry_cells: PoolStats,
    /// Length of the specification node sequence.
    pub specification_nodes: usize,
    /// Length of the summary node sequence.
    pub summary_nodes: usize,
    /// Nodes in the open generation.
    pub temporary_nodes: usize,
    /// Length of the label list.
    pub label_nodes: usize,
    /// Length of the dummy list.
    pub dummy_nodes: usize,
    /// Length of the specification edge sequence.
    pub specification_edges: usize,
    /// Edges in the open generation.
    pub temporary_edges: usize,
    /// Entries per special edge registry (near, bent near, back).
    pub special_edges: [usize; 3],
    /// Entries in the title index.
    pub title_entries: usize,
    /// Buckets of the title index.
    pub title_table_size: usize,
    /// Last reference number handed out.
    pub last_refnum: u64,
    /// Bytes used in the arena.
    pub arena_used: usize,
    /// Allocations served by the arena since its last reset.
    pub arena_allocations: u64,
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pools = [
            ("nodes", self.nodes),
            ("edges", self.edges),
            ("node refs", self.node_refs),
            ("adjacency", self.adjacency),
            ("connections", self.connections),
            ("double links", self.double_links),
            ("registry cells", self.registry_cells),
        ];
        writeln!(f, "{:<16} {:>10} {:>10} {:>10}", "pool", "live", "free", "reserved")?;
        for (name, stats) in pools {
            writeln!(
                f,
                "{:<16} {:>10} {:>10} {:>10}",
                name, stats.live, stats.free, stats.reserved
            )?;
        }
        writeln!(
            f,
            "nodes: {} specification, {} summary, {} temporary ({} labels, {} dummies)",
            self.specification_nodes,
            self.summary_nodes,
            self.temporary_nodes,
            self.label_nodes,
            self.dummy_nodes
        )?;
        writeln!(
            f,
            "edges: {} specification, {} temporary, {}/{}/{} near/bent/back",
            self.specification_edges,
            self.temporary_edges,
            self.special_edges[0],
            self.special_edges[1],
            self.special_edges[2]
        )?;
        write!(
            f,
            "titles: {} in {} buckets; arena: {} bytes in {} allocations",
            self.title_entries, self.title_table_size, self.arena_used, self.arena_allocations
        )
    }
}
