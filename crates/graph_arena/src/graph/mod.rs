//! # Graph Objects
//!
//! Nodes, edges and the cells that link them, each with its own pool.
//!
//! ## Lifetime Classes
//!
//! - Specification objects live from parse until the next logical reset
//! - Temporary objects live for one layout pass (one generation)
//! - Stable node reference cells live until the folding code hands them back

mod attributes;
mod cells;
mod edge;
mod node;
mod registry;

pub use attributes::{
    Arrow, ArrowStyle, Color, EdgeAttributes, LineStyle, NodeAttributes, NodeShape, Point,
    TemporaryNodeConfig, Text, TextMode,
};
pub use cells::{
    AdjacencyCell, AdjacencyPool, CellScope, Chain, Connection, ConnectionPair, ConnectionPool,
    DoubleLinkCell, DoubleLinkPool, Linked, NodeRefCell, NodeRefPool,
};
pub use edge::{Edge, EdgeClass, EdgePool, EdgeWeights, Endpoint};
pub use node::{AdjacencyHeads, Node, NodeClass, NodeLayout, NodePool};
pub use registry::{SpecialEdgeKind, SpecialEdgeRegistries};
