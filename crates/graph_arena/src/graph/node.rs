//! # Node Pool
//!
//! Nodes come in three lifetime classes:
//! - **Specification** and **summary** nodes are created by the syntax-tree
//!   walker and live until the next logical reset
//! - **Temporary** nodes (dummies, edge labels, layout helpers) belong to
//!   the open generation and are reclaimed in one sweep per layout pass
//! - **Region replacement** nodes stand in for a folded region and are the
//!   only nodes that may be released one at a time

use std::fmt;

use super::attributes::{NodeAttributes, TemporaryNodeConfig};
use crate::error::{GraphError, GraphResult};
use crate::memory::{
    AdjacencyId, ByteArena, ConnectionId, DoubleLinkId, GenerationChain, Handle, NodeId,
    NodeRefId, Pool,
};
use crate::stats::PoolStats;

/// Lifetime class of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    /// Declared in the specification.
    Specification,
    /// Stands for a whole subgraph.
    Summary,
    /// Layout helper owned by the open generation.
    Temporary,
    /// Temporary node carrying an edge label.
    Label,
    /// Temporary node splitting a long edge.
    Dummy,
    /// Substitute for a folded region.
    RegionReplacement,
}

impl NodeClass {
    /// Returns `true` for classes reclaimed by a generation recycle.
    #[inline]
    #[must_use]
    pub const fn is_temporary(self) -> bool {
        matches!(self, Self::Temporary | Self::Label | Self::Dummy)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Specification => "specification",
            Self::Summary => "summary",
            Self::Temporary => "temporary",
            Self::Label => "label",
            Self::Dummy => "dummy",
            Self::RegionReplacement => "region replacement",
        };
        f.write_str(name)
    }
}

/// Heads of the adjacency chains hanging off a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyHeads {
    /// Incoming edges.
    pub pred: Option<AdjacencyId>,
    /// Outgoing edges.
    pub succ: Option<AdjacencyId>,
    /// Edges to the horizontal neighbour on the left.
    pub left: Option<AdjacencyId>,
    /// Edges to the horizontal neighbour on the right.
    pub right: Option<AdjacencyId>,
}

/// Scratch state written by the layout phases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLayout {
    /// Drawing position of the top-left corner.
    pub x: i32,
    /// Drawing position of the top-left corner.
    pub y: i32,
    /// Rank (depth).
    pub level: i32,
    /// Position inside the level.
    pub position: i32,
    /// Barycenter weight for crossing reduction.
    pub weight: f32,
    /// DFS entry number, -1 when unvisited.
    pub dfs_number: i32,
    /// Number of incoming edges.
    pub in_degree: u32,
    /// Number of outgoing edges.
    pub out_degree: u32,
    /// Adjacency chain heads.
    pub heads: AdjacencyHeads,
    /// Pred head saved during temporary reordering.
    pub saved_pred: Option<AdjacencyId>,
    /// Succ head saved during temporary reordering.
    pub saved_succ: Option<AdjacencyId>,
    /// Horizontal neighbours merged into one layout unit.
    pub connection: Option<ConnectionId>,
    /// Bookkeeping cell of the crossing-count sweep.
    pub sweep: Option<DoubleLinkId>,
}

impl NodeLayout {
    /// Fresh scratch state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            level: 0,
            position: 0,
            weight: 0.0,
            dfs_number: -1,
            in_degree: 0,
            out_degree: 0,
            heads: AdjacencyHeads {
                pred: None,
                succ: None,
                left: None,
                right: None,
            },
            saved_pred: None,
            saved_succ: None,
            connection: None,
            sweep: None,
        }
    }

    /// Drops every reference into the generation-scoped cell pools.
    pub fn clear_links(&mut self) {
        self.in_degree = 0;
        self.out_degree = 0;
        self.heads = AdjacencyHeads::default();
        self.saved_pred = None;
        self.saved_succ = None;
        self.connection = None;
        self.sweep = None;
    }
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// A drawable node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    refnum: u64,
    class: NodeClass,
    /// Display attributes.
    pub attributes: NodeAttributes,
    /// Member of the plain specification sequence.
    pub in_specification: bool,
    /// Hidden from layout and drawing.
    pub invisible: bool,
    /// Enclosing summary node, `None` at top level.
    pub root: Option<NodeId>,
    /// Head of the member list if this is a summary node.
    pub members: Option<NodeRefId>,
    /// Layout scratch state.
    pub layout: NodeLayout,
}

impl Node {
    fn new(refnum: u64, class: NodeClass, attributes: NodeAttributes) -> Self {
        Self {
            refnum,
            class,
            attributes,
            in_specification: class == NodeClass::Specification,
            invisible: class == NodeClass::Summary,
            root: None,
            members: None,
            layout: NodeLayout::new(),
        }
    }

    /// Unique, never reused reference number. Layout phases use it as a
    /// stable tie-break key.
    #[inline]
    #[must_use]
    pub const fn refnum(&self) -> u64 {
        self.refnum
    }

    /// Lifetime class.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> NodeClass {
        self.class
    }

    /// Returns `true` if the drawn box contains `(x, y)`.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let left = i64::from(self.layout.x);
        let top = i64::from(self.layout.y);
        x >= left
            && y >= top
            && x <= left + i64::from(self.attributes.width)
            && y <= top + i64::from(self.attributes.height)
    }
}

/// Pool of all nodes with their permanent sequences and the open
/// temporary generation.
#[derive(Debug, Default)]
pub struct NodePool {
    nodes: Pool<Node, NodeId>,
    specification: Vec<NodeId>,
    summaries: Vec<NodeId>,
    temporaries: GenerationChain<NodeId>,
    labels: Vec<NodeId>,
    dummies: Vec<NodeId>,
    next_refnum: u64,
}

impl NodePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(
        &mut self,
        arena: &mut ByteArena,
        class: NodeClass,
        attributes: NodeAttributes,
    ) -> GraphResult<NodeId> {
        let refnum = self.next_refnum + 1;
        let id = self.nodes.allocate(arena, Node::new(refnum, class, attributes))?;
        self.next_refnum = refnum;
        Ok(id)
    }

    /// Allocates a node declared in the specification.
    ///
    /// Display attributes are copied from `template`, the default node of
    /// the enclosing scope. The node is appended to the specification
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_specification_node(
        &mut self,
        arena: &mut ByteArena,
        template: &NodeAttributes,
    ) -> GraphResult<NodeId> {
        let id = self.issue(arena, NodeClass::Specification, template.clone())?;
        self.specification.push(id);
        Ok(id)
    }

    /// Allocates a summary node for a subgraph.
    ///
    /// The node starts invisible and goes into the summary sequence, not
    /// the specification sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_summary_node(
        &mut self,
        arena: &mut ByteArena,
        template: &NodeAttributes,
    ) -> GraphResult<NodeId> {
        let id = self.issue(arena, NodeClass::Summary, template.clone())?;
        self.summaries.push(id);
        Ok(id)
    }

    /// Allocates the substitute node of a folded region.
    ///
    /// It takes part in layout like a specification node, but can later be
    /// handed back with [`NodePool::release_single_node`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_region_node(
        &mut self,
        arena: &mut ByteArena,
        template: &NodeAttributes,
    ) -> GraphResult<NodeId> {
        let mut attributes = template.clone();
        attributes.fold_level = attributes.fold_level.max(1);
        let id = self.issue(arena, NodeClass::RegionReplacement, attributes)?;
        if let Some(node) = self.nodes.get_mut(id) {
            node.in_specification = true;
        }
        self.specification.push(id);
        Ok(id)
    }

    /// Allocates a layout helper node in the open generation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_temporary_node(
        &mut self,
        arena: &mut ByteArena,
        config: &TemporaryNodeConfig,
    ) -> GraphResult<NodeId> {
        self.issue_temporary(arena, NodeClass::Temporary, config)
    }

    /// Allocates a temporary node carrying an edge label and appends it to
    /// the label list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_label_node(
        &mut self,
        arena: &mut ByteArena,
        config: &TemporaryNodeConfig,
    ) -> GraphResult<NodeId> {
        let id = self.issue_temporary(arena, NodeClass::Label, config)?;
        self.labels.push(id);
        Ok(id)
    }

    /// Allocates a temporary dummy node and prepends it to the dummy list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_dummy_node(
        &mut self,
        arena: &mut ByteArena,
        config: &TemporaryNodeConfig,
    ) -> GraphResult<NodeId> {
        let id = self.issue_temporary(arena, NodeClass::Dummy, config)?;
        self.dummies.push(id);
        Ok(id)
    }

    fn issue_temporary(
        &mut self,
        arena: &mut ByteArena,
        class: NodeClass,
        config: &TemporaryNodeConfig,
    ) -> GraphResult<NodeId> {
        let id = self.issue(arena, class, config.to_attributes())?;
        self.temporaries.prepend(id);
        Ok(id)
    }

    /// Reclaims every node of the open generation, including the label and
    /// dummy lists that share its lifetime.
    ///
    /// Returns the number of nodes reclaimed.
    pub fn release_temporary_generation(&mut self) -> usize {
        self.labels.clear();
        self.dummies.clear();
        self.temporaries.release_into(&mut self.nodes)
    }

    /// Releases one region replacement node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] if `id` is not live and
    /// [`GraphError::ReleaseRejected`] for any other node class.
    pub fn release_single_node(&mut self, id: NodeId) -> GraphResult<()> {
        let class = self.node(id)?.class;
        if class != NodeClass::RegionReplacement {
            tracing::warn!("rejected single release of {} node {:?}", class, id);
            return Err(GraphError::ReleaseRejected { class });
        }

        self.nodes.free(id);
        self.specification.retain(|&member| member != id);
        Ok(())
    }

    /// Gets a node, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Gets a mutable node, or `None` if the handle is stale.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Gets a node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] if the handle is stale.
    #[inline]
    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(id).ok_or(GraphError::StaleHandle {
            kind: NodeId::KIND,
        })
    }

    /// Gets a mutable node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] if the handle is stale.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes.get_mut(id).ok_or(GraphError::StaleHandle {
            kind: NodeId::KIND,
        })
    }

    /// Specification nodes in allocation order.
    #[inline]
    #[must_use]
    pub fn specification(&self) -> &[NodeId] {
        &self.specification
    }

    /// Summary nodes in allocation order.
    #[inline]
    #[must_use]
    pub fn summaries(&self) -> &[NodeId] {
        &self.summaries
    }

    /// Nodes of the open generation, most recent first.
    pub fn temporaries(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.temporaries.iter()
    }

    /// Number of nodes in the open generation.
    #[inline]
    #[must_use]
    pub fn temporary_count(&self) -> usize {
        self.temporaries.len()
    }

    /// Label nodes in allocation order.
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[NodeId] {
        &self.labels
    }

    /// Dummy nodes, most recent first.
    pub fn dummies(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dummies.iter().rev().copied()
    }

    /// Number of dummy nodes in the open generation.
    #[inline]
    #[must_use]
    pub fn dummy_count(&self) -> usize {
        self.dummies.len()
    }

    /// Iterates every permanent node (specification, then summary).
    pub fn permanent_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes
            .iter_mut()
            .map(|(_, node)| node)
            .filter(|node| !node.class.is_temporary())
    }

    /// The reference number the next node will receive minus one.
    #[inline]
    #[must_use]
    pub const fn last_refnum(&self) -> u64 {
        self.next_refnum
    }

    /// Releases every node and empties all sequences, keeping the slots
    /// and the reference number counter.
    pub fn reset_logical(&mut self) -> usize {
        self.specification.clear();
        self.summaries.clear();
        self.temporaries.clear();
        self.labels.clear();
        self.dummies.clear();
        self.nodes.release_all()
    }

    /// Returns the pool to its never-used shape, restarting reference
    /// numbers at zero.
    pub fn clear(&mut self) {
        self.reset_logical();
        self.nodes.clear();
        self.next_refnum = 0;
    }

    /// Slot counters of the underlying pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.nodes.stats()
    }
}
