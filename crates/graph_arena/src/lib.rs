//! # Graph Arena
//!
//! Pooled storage for the nodes, edges and linkage cells of an interactive
//! graph layout engine, designed for:
//! - Thousands of short-lived layout objects per pass, recycled in bulk
//! - Zero fresh arena allocations once a graph has been laid out once
//! - Instant teardown of a whole graph when a new file is loaded
//!
//! ## Architecture Rules
//!
//! 1. **One arena, many pools** - Every pool draws fresh slots from a single
//!    bounded [`ByteArena`] and recycles released slots itself
//! 2. **Typed generational handles** - A handle into one pool can never be
//!    presented to another, and a recycled slot invalidates old handles
//! 3. **Generations, not lifetimes** - Temporary objects are chained into the
//!    open generation and reclaimed together by
//!    [`GraphArena::recycle_temporaries`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use graph_arena::{ArenaConfig, GraphArena, NodeAttributes, TemporaryNodeConfig};
//!
//! let mut graph = GraphArena::new(ArenaConfig::default());
//! let a = graph.allocate_specification_node(&NodeAttributes::default())?;
//! let dummy = graph.allocate_dummy_node(&TemporaryNodeConfig::default())?;
//! graph.recycle_temporaries(); // dummy is gone, a stays
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod lifecycle;
pub mod memory;
pub mod stats;

pub use config::ArenaConfig;
pub use error::{ConfigError, GraphError, GraphResult};
pub use graph::{
    Edge, EdgeAttributes, EdgeClass, Node, NodeAttributes, NodeClass, SpecialEdgeKind,
    TemporaryNodeConfig, Text,
};
pub use index::TitleIndex;
pub use lifecycle::GraphArena;
pub use memory::{
    AdjacencyId, ByteArena, ConnectionId, DoubleLinkId, EdgeId, Handle, NodeId, NodeRefId,
};
pub use stats::{MemoryStats, PoolStats};
