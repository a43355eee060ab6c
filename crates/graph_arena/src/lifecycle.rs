//! # Graph Arena
//!
//! The one context object that owns the byte arena, every pool and the
//! title index. Parsing, layout, folding and picking code all go through
//! it; nothing else touches pool roots.
//!
//! ## Lifecycle
//!
//! ```text
//! Empty ──parse──▶ Populating ──layout──▶ Laid-out ──reset_all──▶ Empty
//!                                   ▲          │
//!                                   └─recycle──┘  (once per layout pass)
//! ```
//!
//! - [`GraphArena::recycle_temporaries`] closes the open generation
//! - [`GraphArena::reset_logical_state`] empties every pool but keeps
//!   the arena
//! - [`GraphArena::reset_all`] also resets the arena, rebuilds the title
//!   index and restarts reference numbers

use crate::config::ArenaConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::{
    AdjacencyPool, ConnectionPool, DoubleLinkPool, Edge, EdgeAttributes, EdgePool, Node,
    NodeAttributes, NodeClass, NodePool, NodeRefPool, SpecialEdgeKind, SpecialEdgeRegistries,
    TemporaryNodeConfig, Text,
};
use crate::index::TitleIndex;
use crate::memory::{
    AdjacencyId, ByteArena, ConnectionId, DoubleLinkId, EdgeId, NodeId, NodeRefId,
};
use crate::stats::MemoryStats;

/// Object pools and title index of one interactive graph session.
///
/// # Thread Safety
///
/// Single-threaded and not reentrant. Every operation runs to completion
/// before the next one starts.
///
/// # Example
///
/// ```rust,ignore
/// let mut graph = GraphArena::new(ArenaConfig::default());
///
/// let scope = NodeAttributes::default();
/// let a = graph.allocate_specification_node(&scope)?;
///
/// for _pass in 0..3 {
///     let dummy = graph.allocate_dummy_node(&TemporaryNodeConfig::default())?;
///     // ... layout ...
///     graph.recycle_temporaries();
/// }
///
/// graph.reset_all();
/// ```
#[derive(Debug)]
pub struct GraphArena {
    config: ArenaConfig,
    arena: ByteArena,
    nodes: NodePool,
    edges: EdgePool,
    special_edges: SpecialEdgeRegistries,
    node_refs: NodeRefPool,
    adjacency: AdjacencyPool,
    connections: ConnectionPool,
    double_links: DoubleLinkPool,
    titles: TitleIndex,
}

impl GraphArena {
    /// Creates an empty session.
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            arena: ByteArena::new(config.arena_capacity),
            titles: TitleIndex::with_estimate(config.title_index_estimate),
            nodes: NodePool::new(),
            edges: EdgePool::new(),
            special_edges: SpecialEdgeRegistries::new(),
            node_refs: NodeRefPool::new(),
            adjacency: AdjacencyPool::new(),
            connections: ConnectionPool::new(),
            double_links: DoubleLinkPool::new(),
            config,
        }
    }

    /// The configuration this session was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The byte arena.
    #[inline]
    #[must_use]
    pub const fn arena(&self) -> &ByteArena {
        &self.arena
    }

    /// The node pool and its sequences.
    #[inline]
    #[must_use]
    pub const fn nodes(&self) -> &NodePool {
        &self.nodes
    }

    /// The edge pool and its sequences.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> &EdgePool {
        &self.edges
    }

    /// The near, bent near and back edge registries.
    #[inline]
    #[must_use]
    pub const fn special_edges(&self) -> &SpecialEdgeRegistries {
        &self.special_edges
    }

    /// The node reference cell pool.
    #[inline]
    #[must_use]
    pub const fn node_refs(&self) -> &NodeRefPool {
        &self.node_refs
    }

    /// The adjacency cell pool.
    #[inline]
    #[must_use]
    pub const fn adjacency(&self) -> &AdjacencyPool {
        &self.adjacency
    }

    /// The connection record pool.
    #[inline]
    #[must_use]
    pub const fn connections(&self) -> &ConnectionPool {
        &self.connections
    }

    /// Mutable access to connection records.
    #[inline]
    pub fn connections_mut(&mut self) -> &mut ConnectionPool {
        &mut self.connections
    }

    /// The double-link cell pool.
    #[inline]
    #[must_use]
    pub const fn double_links(&self) -> &DoubleLinkPool {
        &self.double_links
    }

    /// Mutable access to the sweep cells.
    #[inline]
    pub fn double_links_mut(&mut self) -> &mut DoubleLinkPool {
        &mut self.double_links
    }

    /// The title index.
    #[inline]
    #[must_use]
    pub const fn titles(&self) -> &TitleIndex {
        &self.titles
    }

    /// The title index, for cursor enumeration.
    #[inline]
    pub fn titles_mut(&mut self) -> &mut TitleIndex {
        &mut self.titles
    }

    /// Gets a node, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Gets a mutable node, or `None` if the handle is stale.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Gets an edge, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Gets a mutable edge, or `None` if the handle is stale.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Allocates a specification node copying `template`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_specification_node(
        &mut self,
        template: &NodeAttributes,
    ) -> GraphResult<NodeId> {
        self.nodes
            .allocate_specification_node(&mut self.arena, template)
    }

    /// Allocates an invisible summary node copying `template`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_summary_node(&mut self, template: &NodeAttributes) -> GraphResult<NodeId> {
        self.nodes.allocate_summary_node(&mut self.arena, template)
    }

    /// Allocates the substitute node of a folded region.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_region_node(&mut self, template: &NodeAttributes) -> GraphResult<NodeId> {
        self.nodes.allocate_region_node(&mut self.arena, template)
    }

    /// Allocates a temporary layout node in the open generation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_temporary_node(
        &mut self,
        config: &TemporaryNodeConfig,
    ) -> GraphResult<NodeId> {
        self.nodes.allocate_temporary_node(&mut self.arena, config)
    }

    /// Allocates a temporary label node and appends it to the label list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_label_node(&mut self, config: &TemporaryNodeConfig) -> GraphResult<NodeId> {
        self.nodes.allocate_label_node(&mut self.arena, config)
    }

    /// Allocates a temporary dummy node and prepends it to the dummy list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_dummy_node(&mut self, config: &TemporaryNodeConfig) -> GraphResult<NodeId> {
        self.nodes.allocate_dummy_node(&mut self.arena, config)
    }

    /// Releases one region replacement node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ReleaseRejected`] for every other node class
    /// and [`GraphError::StaleHandle`] for a dead handle.
    pub fn release_single_node(&mut self, id: NodeId) -> GraphResult<()> {
        self.nodes.release_single_node(id)
    }

    /// First visible specification node whose box contains `(x, y)`.
    #[must_use]
    pub fn search_by_position(&self, x: i32, y: i32) -> Option<NodeId> {
        self.nodes.specification().iter().copied().find(|&id| {
            self.nodes
                .get(id)
                .is_some_and(|node| !node.invisible && node.contains(x, y))
        })
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Allocates a specification edge copying `template`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_specification_edge(
        &mut self,
        template: &EdgeAttributes,
    ) -> GraphResult<EdgeId> {
        self.edges
            .allocate_specification_edge(&mut self.arena, template)
    }

    /// Allocates a temporary edge in the open generation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_temporary_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        template: &EdgeAttributes,
    ) -> GraphResult<EdgeId> {
        self.edges
            .allocate_temporary_edge(&mut self.arena, source, target, template)
    }

    /// Records `edge` in the registry of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn insert_special_edge(&mut self, kind: SpecialEdgeKind, edge: EdgeId) -> GraphResult<()> {
        self.special_edges.insert(&mut self.arena, kind, edge)
    }

    /// Checks every specification edge for missing endpoints once parsing
    /// is done.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingEndpoint`] for the first incomplete edge.
    pub fn finalize_edges(&self) -> GraphResult<()> {
        self.edges.check_endpoints()
    }

    // =========================================================================
    // Linkage cells
    // =========================================================================

    /// Takes a working node reference cell in front of `next`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn acquire_node_ref(
        &mut self,
        node: NodeId,
        next: Option<NodeRefId>,
    ) -> GraphResult<NodeRefId> {
        self.node_refs.acquire(&mut self.arena, node, next)
    }

    /// Takes a stable node reference cell in front of `next`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn acquire_stable_node_ref(
        &mut self,
        node: NodeId,
        next: Option<NodeRefId>,
    ) -> GraphResult<NodeRefId> {
        self.node_refs.acquire_stable(&mut self.arena, node, next)
    }

    /// Hands a stable region list back to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotRegionList`] if the chain holds working cells.
    pub fn release_region_list(&mut self, head: Option<NodeRefId>) -> GraphResult<usize> {
        self.node_refs.release_region_list(head)
    }

    /// Makes `member` part of the subgraph of `summary`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead handle,
    /// [`GraphError::NotASummary`] if `summary` is not a summary node and
    /// [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn add_subgraph_member(&mut self, summary: NodeId, member: NodeId) -> GraphResult<()> {
        let owner = self.nodes.node(summary)?;
        if owner.class() != NodeClass::Summary {
            return Err(GraphError::NotASummary {
                class: owner.class(),
            });
        }
        let head = owner.members;
        self.nodes.node(member)?;

        let cell = self
            .node_refs
            .acquire_stable(&mut self.arena, member, head)?;
        self.nodes.node_mut(summary)?.members = Some(cell);
        self.nodes.node_mut(member)?.root = Some(summary);
        Ok(())
    }

    /// Members of the subgraph of `summary`, most recently added first.
    pub fn members(&self, summary: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let head = self.nodes.get(summary).and_then(|node| node.members);
        self.node_refs.iter_chain(head).map(|(_, cell)| cell.node)
    }

    /// Prepends `edge` to the predecessor chain of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead node handle and
    /// [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn push_predecessor(&mut self, node: NodeId, edge: EdgeId) -> GraphResult<AdjacencyId> {
        let head = self.nodes.node(node)?.layout.heads.pred;
        let cell = self.adjacency.acquire(&mut self.arena, edge, head)?;
        let layout = &mut self.nodes.node_mut(node)?.layout;
        layout.heads.pred = Some(cell);
        layout.in_degree += 1;
        Ok(cell)
    }

    /// Prepends `edge` to the successor chain of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead node handle and
    /// [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn push_successor(&mut self, node: NodeId, edge: EdgeId) -> GraphResult<AdjacencyId> {
        let head = self.nodes.node(node)?.layout.heads.succ;
        let cell = self.adjacency.acquire(&mut self.arena, edge, head)?;
        let layout = &mut self.nodes.node_mut(node)?.layout;
        layout.heads.succ = Some(cell);
        layout.out_degree += 1;
        Ok(cell)
    }

    /// Edges on the predecessor chain of `node`.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let head = self.nodes.get(node).and_then(|n| n.layout.heads.pred);
        self.adjacency.iter_chain(head).map(|(_, cell)| cell.edge)
    }

    /// Edges on the successor chain of `node`.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let head = self.nodes.get(node).and_then(|n| n.layout.heads.succ);
        self.adjacency.iter_chain(head).map(|(_, cell)| cell.edge)
    }

    /// Saves the pred and succ heads of `node` before a temporary reordering.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead node handle.
    pub fn save_adjacency(&mut self, node: NodeId) -> GraphResult<()> {
        let layout = &mut self.nodes.node_mut(node)?.layout;
        layout.saved_pred = layout.heads.pred;
        layout.saved_succ = layout.heads.succ;
        Ok(())
    }

    /// Restores the pred and succ heads saved by [`GraphArena::save_adjacency`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead node handle.
    pub fn restore_adjacency(&mut self, node: NodeId) -> GraphResult<()> {
        let layout = &mut self.nodes.node_mut(node)?.layout;
        layout.heads.pred = layout.saved_pred;
        layout.heads.succ = layout.saved_succ;
        Ok(())
    }

    /// Installs a fresh connection record into `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead node handle and
    /// [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn acquire_connection_for(&mut self, node: NodeId) -> GraphResult<ConnectionId> {
        let node = self.nodes.node_mut(node)?;
        self.connections.acquire_for(&mut self.arena, node)
    }

    /// Connects `target` to `node` through `edge`, installing a record
    /// first if `node` has none.
    ///
    /// Returns `false` if the record already holds two neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] for a dead node handle and
    /// [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn connect(&mut self, node: NodeId, target: NodeId, edge: EdgeId) -> GraphResult<bool> {
        let current = self
            .nodes
            .node(node)?
            .layout
            .connection
            .filter(|&id| self.connections.get(id).is_some());
        let id = match current {
            Some(id) => id,
            None => self.acquire_connection_for(node)?,
        };
        let record = self
            .connections
            .get_mut(id)
            .ok_or(GraphError::StaleHandle {
                kind: "connection record",
            })?;
        Ok(record.attach(target, edge))
    }

    /// Takes a sweep cell for `node`, appended after `pred`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn acquire_double_link(
        &mut self,
        node: NodeId,
        pred: Option<DoubleLinkId>,
    ) -> GraphResult<DoubleLinkId> {
        self.double_links.acquire(&mut self.arena, node, pred)
    }

    // =========================================================================
    // Title index
    // =========================================================================

    /// Resizes the title index for `estimate` nodes, as counted by the
    /// walker's pre-pass.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexNotEmpty`] once titles were inserted.
    pub fn prepare_title_index(&mut self, estimate: usize) -> GraphResult<()> {
        if !self.titles.is_empty() {
            return Err(GraphError::IndexNotEmpty(self.titles.len()));
        }
        self.titles = TitleIndex::with_estimate(estimate);
        tracing::debug!(
            "title index sized for {} nodes: {} buckets",
            estimate,
            self.titles.table_size()
        );
        Ok(())
    }

    /// Inserts `title` without checking for duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the index cannot link
    /// another entry.
    pub fn insert_title(&mut self, title: Text, node: NodeId) -> GraphResult<()> {
        self.titles.insert(title, node)
    }

    /// Inserts `title` unless it is already indexed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateTitle`] and leaves the index
    /// untouched if the title is present.
    pub fn register_title(&mut self, title: Text, node: NodeId) -> GraphResult<()> {
        if self.titles.contains(&title) {
            return Err(GraphError::DuplicateTitle(title.to_string()));
        }
        self.titles.insert(title, node)
    }

    /// Finds the node titled `title`.
    #[inline]
    #[must_use]
    pub fn lookup_title(&self, title: &str) -> Option<NodeId> {
        self.titles.lookup(title)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Closes the open generation: every temporary node, edge and
    /// generation-scoped cell goes back to its pool's free list.
    ///
    /// Permanent nodes drop their references into the recycled pools.
    /// Returns the number of objects reclaimed.
    pub fn recycle_temporaries(&mut self) -> usize {
        let nodes = self.nodes.release_temporary_generation();
        let edges = self.edges.release_temporary_generation();
        let node_refs = self.node_refs.release_active();
        let adjacency = self.adjacency.release_active();
        let connections = self.connections.release_active();
        let double_links = self.double_links.release_active();

        for node in self.nodes.permanent_mut() {
            node.layout.clear_links();
        }

        tracing::debug!(
            nodes,
            edges,
            node_refs,
            adjacency,
            connections,
            double_links,
            "recycled temporary generation"
        );
        nodes + edges + node_refs + adjacency + connections + double_links
    }

    /// Empties every pool, sequence and registry without touching the arena.
    ///
    /// Slots stay reserved and are reissued by later allocations. The
    /// title index drops its entries but keeps its table size. Reference
    /// numbers keep counting.
    pub fn reset_logical_state(&mut self) {
        let nodes = self.nodes.reset_logical();
        let edges = self.edges.reset_logical();
        let registry = self.special_edges.reset_logical();
        let cells = self.node_refs.reset_logical()
            + self.adjacency.reset_logical()
            + self.connections.reset_logical()
            + self.double_links.reset_logical();
        let titles = self.titles.clear();

        tracing::debug!(nodes, edges, registry, cells, titles, "logical state reset");
    }

    /// Resets the arena, rebuilds the title index and restarts reference
    /// numbers, then resets the logical state.
    ///
    /// Every handle issued before this call is invalid afterwards. The
    /// session is structurally identical to a freshly created one.
    pub fn reset_all(&mut self) {
        let used = self.arena.used();
        self.arena.reset();
        self.titles = TitleIndex::with_estimate(self.config.title_index_estimate);

        self.nodes.clear();
        self.edges.clear();
        self.special_edges.clear();
        self.node_refs.clear();
        self.adjacency.clear();
        self.connections.clear();
        self.double_links.clear();

        self.reset_logical_state();
        tracing::info!("arena reset, {} bytes reclaimed", used);
    }

    /// Snapshot of every pool, sequence and counter.
    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            nodes: self.nodes.stats(),
            edges: self.edges.stats(),
            node_refs: self.node_refs.stats(),
            adjacency: self.adjacency.stats(),
            connections: self.connections.stats(),
            double_links: self.double_links.stats(),
            registry_cells: self.special_edges.stats(),
            specification_nodes: self.nodes.specification().len(),
            summary_nodes: self.nodes.summaries().len(),
            temporary_nodes: self.nodes.temporary_count(),
            label_nodes: self.nodes.labels().len(),
            dummy_nodes: self.nodes.dummy_count(),
            specification_edges: self.edges.specification().len(),
            temporary_edges: self.edges.temporary_count(),
            special_edges: SpecialEdgeKind::ALL.map(|kind| self.special_edges.len(kind)),
            title_entries: self.titles.len(),
            title_table_size: self.titles.table_size(),
            last_refnum: self.nodes.last_refnum(),
            arena_used: self.arena.used(),
            arena_allocations: self.arena.allocation_count(),
        }
    }
}

impl Default for GraphArena {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}
