//! # Graph Arena Error Types
//!
//! All errors that can occur while allocating, recycling or indexing graph
//! objects.

use thiserror::Error;

use crate::graph::{Endpoint, NodeClass};

/// Errors that can occur in the graph arena.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The byte arena cannot serve a fresh slot. Callers treat this as fatal.
    #[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
    ArenaExhausted {
        /// Size of the refused request in bytes.
        requested: usize,
        /// Bytes still free in the arena.
        remaining: usize,
    },

    /// A handle no longer refers to a live object.
    #[error("stale {kind} handle")]
    StaleHandle {
        /// Kind of pooled object the handle addressed.
        kind: &'static str,
    },

    /// Single-object release was attempted on a node outside its only
    /// permitted class.
    #[error("cannot release a {class} node individually")]
    ReleaseRejected {
        /// Class of the node the caller tried to release.
        class: NodeClass,
    },

    /// Subgraph members can only be attached to a summary node.
    #[error("a {class} node cannot own subgraph members")]
    NotASummary {
        /// Class of the would-be owner.
        class: NodeClass,
    },

    /// A region list handed back for release contains a working cell.
    #[error("node reference chain is not a stable region list")]
    NotRegionList,

    /// A title was registered twice.
    #[error("duplicate node title: {0}")]
    DuplicateTitle(String),

    /// A specification edge lacks one of its endpoints.
    #[error("edge {position} has no {endpoint} node")]
    MissingEndpoint {
        /// Position of the edge in the specification sequence.
        position: usize,
        /// Which endpoint is missing.
        endpoint: Endpoint,
    },

    /// The title index can only be resized while it is empty.
    #[error("title index already holds {0} entries")]
    IndexNotEmpty(usize),
}

/// Result type for graph arena operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while loading an [`ArenaConfig`](crate::ArenaConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
