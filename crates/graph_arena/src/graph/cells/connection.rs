//! # Connection Records
//!
//! A connection record merges a node with up to two horizontally adjacent
//! nodes on the same level into one layout unit. The record is installed
//! straight into the node it describes.

use crate::error::GraphResult;
use crate::graph::node::Node;
use crate::memory::{ByteArena, ConnectionId, EdgeId, GenerationChain, NodeId, Pool};
use crate::stats::PoolStats;

/// A neighbour and the edge that ties it to the owning node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionPair {
    /// The neighbouring node.
    pub target: NodeId,
    /// The connecting edge.
    pub edge: EdgeId,
}

/// Up to two connected neighbours of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Connection {
    /// First neighbour.
    pub first: Option<ConnectionPair>,
    /// Second neighbour.
    pub second: Option<ConnectionPair>,
}

impl Connection {
    /// Records a neighbour in the first empty position.
    ///
    /// Returns `false` if both positions are already taken.
    pub fn attach(&mut self, target: NodeId, edge: EdgeId) -> bool {
        let pair = Some(ConnectionPair { target, edge });
        if self.first.is_none() {
            self.first = pair;
        } else if self.second.is_none() {
            self.second = pair;
        } else {
            return false;
        }
        true
    }

    /// Iterates over the recorded neighbours.
    pub fn pairs(&self) -> impl Iterator<Item = ConnectionPair> {
        self.first.into_iter().chain(self.second)
    }
}

/// Pool of connection records.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    records: Pool<Connection, ConnectionId>,
    active: GenerationChain<ConnectionId>,
}

impl ConnectionPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an empty record and installs it into `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`](crate::GraphError::ArenaExhausted)
    /// when the arena is full; `node` is left untouched.
    pub fn acquire_for(&mut self, arena: &mut ByteArena, node: &mut Node) -> GraphResult<ConnectionId> {
        let id = self.records.allocate(arena, Connection::default())?;
        self.active.prepend(id);
        node.layout.connection = Some(id);
        Ok(id)
    }

    /// Reclaims every record of the open generation.
    pub fn release_active(&mut self) -> usize {
        self.active.release_into(&mut self.records)
    }

    /// Gets a record, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.records.get(id)
    }

    /// Gets a mutable record, or `None` if the handle is stale.
    #[inline]
    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.records.get_mut(id)
    }

    /// Releases every record, keeping the slots.
    pub fn reset_logical(&mut self) -> usize {
        self.active.clear();
        self.records.release_all()
    }

    /// Returns the pool to its never-used shape.
    pub fn clear(&mut self) {
        self.active.clear();
        self.records.clear();
    }

    /// Slot counters of the underlying pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.records.stats()
    }
}
