//! # Edge Pool
//!
//! Mirrors the node pool with two lifetime classes: specification edges
//! kept until the next logical reset, and temporary edges reclaimed with
//! the open generation.

use std::fmt;

use super::attributes::{EdgeAttributes, Point};
use crate::error::{GraphError, GraphResult};
use crate::memory::{ByteArena, EdgeId, GenerationChain, Handle, NodeId, Pool};
use crate::stats::PoolStats;

/// Classification assigned by the partitioning passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// Not classified yet.
    #[default]
    Undefined,
    /// Points downwards through the levels.
    Normal,
    /// Source and target are the same node.
    SelfLoop,
    /// Merged with its reverse twin.
    Bidirectional,
    /// Direction flipped to break a cycle.
    Reverted,
    /// Forces its endpoints side by side on one level.
    Near,
    /// Near edge drawn with a bend.
    BentNear,
    /// Declared as pointing upwards.
    Back,
}

/// One end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The node the edge leaves.
    Source,
    /// The node the edge enters.
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Per-edge weights used by the coordinate assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeWeights {
    /// Pull towards a vertical line.
    pub straight: i32,
    /// Pull towards short horizontal distance.
    pub stretch: i32,
}

impl Default for EdgeWeights {
    fn default() -> Self {
        Self {
            straight: 1,
            stretch: 1,
        }
    }
}

/// A drawable edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    temporary: bool,
    /// Node the edge leaves.
    pub source: Option<NodeId>,
    /// Node the edge enters.
    pub target: Option<NodeId>,
    /// Drawing position of the source end.
    pub start: Point,
    /// Drawing position of the target end.
    pub end: Point,
    /// Drawing position of the bend point.
    pub bend: Point,
    /// Display attributes.
    pub attributes: EdgeAttributes,
    /// Classification, rewritten by the partitioning passes.
    pub class: EdgeClass,
    /// Drawn when `true`.
    pub visible: bool,
    /// Layout weights.
    pub weights: EdgeWeights,
}

impl Edge {
    fn new(
        temporary: bool,
        source: Option<NodeId>,
        target: Option<NodeId>,
        attributes: EdgeAttributes,
    ) -> Self {
        Self {
            temporary,
            source,
            target,
            start: Point::new(0, 0),
            end: Point::new(0, 0),
            bend: Point::new(0, 0),
            attributes,
            class: EdgeClass::Undefined,
            visible: true,
            weights: EdgeWeights::default(),
        }
    }

    /// Returns `true` if the edge belongs to the open generation.
    #[inline]
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Drawing path from the source end over the bend point to the target
    /// end. Feed it to [`Point::as_coordinates`] for the drawing backends.
    #[inline]
    #[must_use]
    pub const fn path(&self) -> [Point; 3] {
        [self.start, self.bend, self.end]
    }

    /// Returns the first missing endpoint, if any.
    #[must_use]
    pub const fn missing_endpoint(&self) -> Option<Endpoint> {
        if self.source.is_none() {
            Some(Endpoint::Source)
        } else if self.target.is_none() {
            Some(Endpoint::Target)
        } else {
            None
        }
    }
}

/// Pool of all edges with the specification sequence and the open
/// temporary generation.
#[derive(Debug, Default)]
pub struct EdgePool {
    edges: Pool<Edge, EdgeId>,
    specification: Vec<EdgeId>,
    temporaries: GenerationChain<EdgeId>,
}

impl EdgePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an edge declared in the specification.
    ///
    /// Attributes are copied from `template`, the default edge of the
    /// enclosing scope. The walker fills in the endpoints once it has
    /// resolved their titles.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_specification_edge(
        &mut self,
        arena: &mut ByteArena,
        template: &EdgeAttributes,
    ) -> GraphResult<EdgeId> {
        let id = self
            .edges
            .allocate(arena, Edge::new(false, None, None, template.clone()))?;
        self.specification.push(id);
        Ok(id)
    }

    /// Allocates an edge in the open generation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ArenaExhausted`] when the arena is full.
    pub fn allocate_temporary_edge(
        &mut self,
        arena: &mut ByteArena,
        source: NodeId,
        target: NodeId,
        template: &EdgeAttributes,
    ) -> GraphResult<EdgeId> {
        let edge = Edge::new(true, Some(source), Some(target), template.clone());
        let id = self.edges.allocate(arena, edge)?;
        self.temporaries.prepend(id);
        Ok(id)
    }

    /// Reclaims every edge of the open generation.
    ///
    /// Returns the number of edges reclaimed.
    pub fn release_temporary_generation(&mut self) -> usize {
        self.temporaries.release_into(&mut self.edges)
    }

    /// Checks that every specification edge has both endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingEndpoint`] for the first incomplete
    /// edge, by position in the specification sequence.
    pub fn check_endpoints(&self) -> GraphResult<()> {
        for (position, &id) in self.specification.iter().enumerate() {
            let Some(edge) = self.edges.get(id) else {
                continue;
            };
            if let Some(endpoint) = edge.missing_endpoint() {
                return Err(GraphError::MissingEndpoint { position, endpoint });
            }
        }
        Ok(())
    }

    /// Gets an edge, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Gets a mutable edge, or `None` if the handle is stale.
    #[inline]
    pub fn get_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    /// Gets a mutable edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleHandle`] if the handle is stale.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> GraphResult<&mut Edge> {
        self.edges.get_mut(id).ok_or(GraphError::StaleHandle {
            kind: EdgeId::KIND,
        })
    }

    /// Specification edges in allocation order.
    #[inline]
    #[must_use]
    pub fn specification(&self) -> &[EdgeId] {
        &self.specification
    }

    /// Edges of the open generation, most recent first.
    pub fn temporaries(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.temporaries.iter()
    }

    /// Number of edges in the open generation.
    #[inline]
    #[must_use]
    pub fn temporary_count(&self) -> usize {
        self.temporaries.len()
    }

    /// Releases every edge and empties the sequences, keeping the slots.
    pub fn reset_logical(&mut self) -> usize {
        self.specification.clear();
        self.temporaries.clear();
        self.edges.release_all()
    }

    /// Returns the pool to its never-used shape.
    pub fn clear(&mut self) {
        self.reset_logical();
        self.edges.clear();
    }

    /// Slot counters of the underlying pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.edges.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::attributes::{Color, LineStyle, Text};

    fn arena() -> ByteArena {
        ByteArena::new(1 << 20)
    }

    fn node(index: u32) -> NodeId {
        NodeId::from_parts(index, 0)
    }

    #[test]
    fn test_specification_edge_copies_template() {
        let mut arena = arena();
        let mut pool = EdgePool::new();
        let template = EdgeAttributes {
            line_style: LineStyle::Dashed,
            color: Color::BLUE,
            label: Some(Text::from("calls")),
            ..EdgeAttributes::default()
        };

        let id = pool.allocate_specification_edge(&mut arena, &template).unwrap();
        let edge = pool.get(id).unwrap();
        assert_eq!(edge.attributes, template);
        assert_eq!(edge.class, EdgeClass::Undefined);
        assert!(edge.visible);
        assert!(!edge.is_temporary());
        assert_eq!(pool.specification(), &[id]);
    }

    #[test]
    fn test_temporary_edges_recycle() {
        let mut arena = arena();
        let mut pool = EdgePool::new();
        let template = EdgeAttributes::default();

        let spec = pool.allocate_specification_edge(&mut arena, &template).unwrap();
        let temps: Vec<_> = (0..4)
            .map(|i| {
                pool.allocate_temporary_edge(&mut arena, node(i), node(i + 1), &template)
                    .unwrap()
            })
            .collect();
        assert_eq!(pool.temporary_count(), 4);
        assert!(pool.get(temps[0]).unwrap().is_temporary());

        assert_eq!(pool.release_temporary_generation(), 4);
        assert!(temps.iter().all(|&id| pool.get(id).is_none()));
        assert!(pool.get(spec).is_some());

        let allocations = arena.allocation_count();
        for i in 0..4 {
            pool.allocate_temporary_edge(&mut arena, node(i), node(i), &template)
                .unwrap();
        }
        assert_eq!(arena.allocation_count(), allocations);
    }

    #[test]
    fn test_missing_endpoint_reported() {
        let mut arena = arena();
        let mut pool = EdgePool::new();
        let template = EdgeAttributes::default();

        let complete = pool.allocate_specification_edge(&mut arena, &template).unwrap();
        let dangling = pool.allocate_specification_edge(&mut arena, &template).unwrap();
        {
            let edge = pool.get_mut(complete).unwrap();
            edge.source = Some(node(0));
            edge.target = Some(node(1));
        }
        pool.get_mut(dangling).unwrap().source = Some(node(0));

        assert_eq!(
            pool.check_endpoints(),
            Err(GraphError::MissingEndpoint {
                position: 1,
                endpoint: Endpoint::Target
            })
        );

        pool.get_mut(dangling).unwrap().target = Some(node(2));
        assert_eq!(pool.check_endpoints(), Ok(()));
    }

    #[test]
    fn test_path_coordinates() {
        let mut arena = arena();
        let mut pool = EdgePool::new();
        let id = pool
            .allocate_temporary_edge(&mut arena, node(0), node(1), &EdgeAttributes::default())
            .unwrap();
        let edge = pool.get_mut(id).unwrap();
        edge.start = Point::new(10, 0);
        edge.bend = Point::new(15, 20);
        edge.end = Point::new(10, 40);

        let path = edge.path();
        assert_eq!(Point::as_coordinates(&path), &[10, 0, 15, 20, 10, 40]);
    }
}
