//! # Typed Handles
//!
//! Handles are lightweight identifiers consisting of:
//! - An index into a pool's slot array
//! - A generation counter for safe reuse
//!
//! Every pool has its own handle type. A `NodeRefId` cannot be passed
//! where an `AdjacencyId` is expected, so a cell can only ever be given
//! back to the pool that issued it.

use std::fmt;

/// Common behaviour of every pool handle.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into the pool's slots
/// - Upper 32 bits: Generation counter for detecting stale references
pub trait Handle: Copy + Eq + fmt::Debug {
    /// Human-readable name of the pooled object, used in errors and logs.
    const KIND: &'static str;

    /// Creates a handle from index and generation.
    fn from_parts(index: u32, generation: u32) -> Self;

    /// Returns the index portion of the handle.
    fn index(self) -> u32;

    /// Returns the generation portion of the handle.
    fn generation(self) -> u32;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(u64);

        impl Handle for $name {
            const KIND: &'static str = $kind;

            #[inline]
            fn from_parts(index: u32, generation: u32) -> Self {
                Self((u64::from(generation) << 32) | u64::from(index))
            }

            #[inline]
            fn index(self) -> u32 {
                self.0 as u32
            }

            #[inline]
            fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.index(), self.generation())
            }
        }
    };
}

define_handle!(
    /// Handle to a [`Node`](crate::graph::Node).
    NodeId,
    "node"
);

define_handle!(
    /// Handle to an [`Edge`](crate::graph::Edge).
    EdgeId,
    "edge"
);

define_handle!(
    /// Handle to a [`NodeRefCell`](crate::graph::NodeRefCell).
    NodeRefId,
    "node reference cell"
);

define_handle!(
    /// Handle to an [`AdjacencyCell`](crate::graph::AdjacencyCell).
    AdjacencyId,
    "adjacency cell"
);

define_handle!(
    /// Handle to a [`Connection`](crate::graph::Connection) record.
    ConnectionId,
    "connection record"
);

define_handle!(
    /// Handle to a [`DoubleLinkCell`](crate::graph::DoubleLinkCell).
    DoubleLinkId,
    "double-link cell"
);

define_handle!(
    /// Handle to a special edge registry cell.
    RegistryCellId,
    "registry cell"
);
