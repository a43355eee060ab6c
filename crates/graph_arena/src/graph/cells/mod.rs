//! # Linkage Cell Pools
//!
//! Small cons-like cells that chain nodes and edges together:
//!
//! | Pool            | Cell              | Lifetime                       |
//! |-----------------|-------------------|--------------------------------|
//! | node references | [`NodeRefCell`]   | working (generation) or stable |
//! | adjacency       | [`AdjacencyCell`] | generation                     |
//! | connections     | [`Connection`]    | generation                     |
//! | sweep lists     | [`DoubleLinkCell`]| generation                     |
//!
//! Every pool has its own handle type, so a cell can never be returned to
//! a pool that did not issue it.

mod adjacency;
mod connection;
mod double_link;
mod node_ref;

pub use adjacency::{AdjacencyCell, AdjacencyPool};
pub use connection::{Connection, ConnectionPair, ConnectionPool};
pub use double_link::{DoubleLinkCell, DoubleLinkPool};
pub use node_ref::{CellScope, NodeRefCell, NodeRefPool};

use crate::memory::{Handle, Pool};

/// A cell that points at the next cell of its chain.
pub trait Linked<H> {
    /// The following cell, `None` at the end of the chain.
    fn link(&self) -> Option<H>;
}

/// Iterator over a chain of linked cells.
///
/// Stops at the end of the chain or at the first stale link.
pub struct Chain<'a, T, H> {
    pool: &'a Pool<T, H>,
    cursor: Option<H>,
}

impl<'a, T, H> Chain<'a, T, H> {
    pub(crate) const fn new(pool: &'a Pool<T, H>, head: Option<H>) -> Self {
        Self { pool, cursor: head }
    }
}

impl<'a, T: Linked<H>, H: Handle> Iterator for Chain<'a, T, H> {
    type Item = (H, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let Some(cell) = self.pool.get(handle) else {
            self.cursor = None;
            return None;
        };
        self.cursor = cell.link();
        Some((handle, cell))
    }
}

/// Releases a whole chain starting at `head`, following each cell's link.
///
/// The walk stops at the end of the chain or at a cell that is no longer
/// live. An empty chain is a no-op. Returns the number of cells released.
pub(crate) fn release_chain<T: Linked<H>, H: Handle>(
    pool: &mut Pool<T, H>,
    head: Option<H>,
) -> usize {
    let mut released = 0;
    let mut cursor = head;
    while let Some(handle) = cursor {
        let Some(cell) = pool.free(handle) else {
            break;
        };
        cursor = cell.link();
        released += 1;
    }
    released
}
