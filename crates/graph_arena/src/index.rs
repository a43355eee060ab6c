//! # Title Index
//!
//! Hash map from a node's display title to the node, with chained buckets.
//!
//! - The table size is picked once from a fixed ladder of primes, using
//!   the node count estimated by a pre-pass over the syntax tree
//! - The table never resizes
//! - Duplicate titles are accepted; the most recent insert wins lookups
//! - A cursor enumerates every entry in bucket-then-chain order for
//!   "pick the nth node" queries

use crate::error::{GraphError, GraphResult};
use crate::graph::Text;
use crate::memory::NodeId;

/// Table sizes the index chooses from.
pub const TABLE_SIZES: [usize; 14] = [
    53, 97, 193, 389, 769, 1_543, 3_079, 6_151, 12_289, 24_593, 49_157, 98_317, 196_613,
    393_241,
];

/// Returns the smallest ladder size not below `estimate`, or the largest
/// size for huge graphs.
#[must_use]
pub fn table_size_for(estimate: usize) -> usize {
    TABLE_SIZES
        .iter()
        .copied()
        .find(|&size| size >= estimate)
        .unwrap_or(TABLE_SIZES[TABLE_SIZES.len() - 1])
}

/// FNV-1a over the title bytes.
#[inline]
fn fnv1a(title: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    title.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

#[derive(Debug)]
struct IndexEntry {
    title: Text,
    node: NodeId,
    next: Option<u32>,
}

/// Position of the enumeration cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CursorPosition {
    bucket: usize,
    entry: u32,
}

/// Title to node lookup table.
#[derive(Debug)]
pub struct TitleIndex {
    buckets: Vec<Option<u32>>,
    entries: Vec<IndexEntry>,
    cursor: Option<CursorPosition>,
}

impl TitleIndex {
    /// Creates an empty index sized for `estimate` nodes.
    #[must_use]
    pub fn with_estimate(estimate: usize) -> Self {
        Self {
            buckets: vec![None; table_size_for(estimate)],
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// Number of buckets.
    #[inline]
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Number of entries, duplicates included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was inserted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bucket_of(&self, title: &str) -> usize {
        (fnv1a(title) % self.buckets.len() as u64) as usize
    }

    /// Prepends `node` to the bucket of `title`.
    ///
    /// No duplicate check is made; callers reject duplicates beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] once the entry count no
    /// longer fits a `u32` chain link.
    pub fn insert(&mut self, title: Text, node: NodeId) -> GraphResult<()> {
        let index = u32::try_from(self.entries.len()).map_err(|_| GraphError::ArenaExhausted {
            requested: std::mem::size_of::<IndexEntry>(),
            remaining: 0,
        })?;
        let bucket = self.bucket_of(&title);
        self.entries.push(IndexEntry {
            title,
            node,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(index);
        Ok(())
    }

    /// Drops every entry and the cursor, keeping the table size.
    ///
    /// Returns the number of entries dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.buckets.fill(None);
        self.entries.clear();
        self.cursor = None;
        dropped
    }

    /// Finds the most recently inserted node titled `title`.
    #[must_use]
    pub fn lookup(&self, title: &str) -> Option<NodeId> {
        let mut cursor = self.buckets[self.bucket_of(title)];
        while let Some(index) = cursor {
            let entry = &self.entries[index as usize];
            let same_text = std::ptr::eq(entry.title.as_ptr(), title.as_ptr())
                && entry.title.len() == title.len();
            if same_text || *entry.title == *title {
                return Some(entry.node);
            }
            cursor = entry.next;
        }
        None
    }

    /// Returns `true` if `title` is indexed.
    #[inline]
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.lookup(title).is_some()
    }

    fn first_from(&self, bucket: usize) -> Option<CursorPosition> {
        self.buckets
            .iter()
            .enumerate()
            .skip(bucket)
            .find_map(|(bucket, head)| head.map(|entry| CursorPosition { bucket, entry }))
    }

    fn successor(&self, position: CursorPosition) -> Option<CursorPosition> {
        match self.entries[position.entry as usize].next {
            Some(entry) => Some(CursorPosition {
                bucket: position.bucket,
                entry,
            }),
            None => self.first_from(position.bucket + 1),
        }
    }

    fn node_at(&self, position: Option<CursorPosition>) -> Option<NodeId> {
        position.map(|position| self.entries[position.entry as usize].node)
    }

    /// Moves the cursor to the first entry and returns its node.
    pub fn first(&mut self) -> Option<NodeId> {
        self.cursor = self.first_from(0);
        self.node_at(self.cursor)
    }

    /// Moves the cursor to the `n`th entry (zero based) and returns its node.
    ///
    /// Seeking past the end leaves the cursor exhausted.
    pub fn seek(&mut self, n: usize) -> Option<NodeId> {
        self.first();
        self.next(n)
    }

    /// Advances the cursor by `k` entries and returns the node there.
    ///
    /// `next(0)` returns the current node. Returns `None` once the cursor
    /// runs past the last entry or was never positioned.
    pub fn next(&mut self, k: usize) -> Option<NodeId> {
        for _ in 0..k {
            let position = self.cursor?;
            self.cursor = self.successor(position);
        }
        self.node_at(self.cursor)
    }

    /// Iterates every indexed node in cursor order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut position = self.first_from(0);
        std::iter::from_fn(move || {
            let current = position?;
            position = self.successor(current);
            Some(self.entries[current.entry as usize].node)
        })
    }
}
