//! Integration test for the graph arena lifecycle.

use graph_arena::{
    ArenaConfig, EdgeAttributes, GraphArena, GraphError, Handle, NodeAttributes, NodeClass,
    SpecialEdgeKind, TemporaryNodeConfig, Text,
};

fn titled(title: &str) -> NodeAttributes {
    NodeAttributes {
        title: Some(Text::from(title)),
        ..NodeAttributes::default()
    }
}

/// Fills every pool with something, the way a parse and one layout pass do.
fn populate(graph: &mut GraphArena) {
    let scope = NodeAttributes::default();
    let summary = graph.allocate_summary_node(&titled("cluster")).unwrap();
    let a = graph.allocate_specification_node(&titled("a")).unwrap();
    let b = graph.allocate_specification_node(&titled("b")).unwrap();
    graph.insert_title(Text::from("a"), a).unwrap();
    graph.insert_title(Text::from("b"), b).unwrap();
    graph.add_subgraph_member(summary, a).unwrap();

    let edge = graph.allocate_specification_edge(&EdgeAttributes::default()).unwrap();
    graph.edge_mut(edge).unwrap().source = Some(a);
    graph.edge_mut(edge).unwrap().target = Some(b);
    graph.insert_special_edge(SpecialEdgeKind::Near, edge).unwrap();

    let dummy = graph.allocate_dummy_node(&TemporaryNodeConfig::default()).unwrap();
    let hop = graph.allocate_temporary_edge(a, dummy, &EdgeAttributes::default()).unwrap();
    graph.push_successor(a, hop).unwrap();
    graph.push_predecessor(dummy, hop).unwrap();
    graph.connect(a, b, edge).unwrap();
    let level = graph.acquire_double_link(a, None).unwrap();
    graph.acquire_double_link(b, Some(level)).unwrap();
    graph.acquire_node_ref(a, None).unwrap();
    graph.allocate_region_node(&scope).unwrap();
}

#[test]
fn test_refnums_strictly_increase_across_recycling() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let mut last = 0;

    for _pass in 0..5 {
        let spec = graph.allocate_specification_node(&NodeAttributes::default()).unwrap();
        let refnum = graph.node(spec).unwrap().refnum();
        assert!(refnum > last);
        last = refnum;

        for _ in 0..10 {
            let temp = graph
                .allocate_temporary_node(&TemporaryNodeConfig::default())
                .unwrap();
            let refnum = graph.node(temp).unwrap().refnum();
            assert!(refnum > last);
            last = refnum;
        }
        graph.recycle_temporaries();
    }

    assert_eq!(last, 55);
    assert_eq!(graph.stats().last_refnum, 55);
}

#[test]
fn test_recycled_temporaries_need_no_fresh_allocations() {
    const N: usize = 250;
    let mut graph = GraphArena::new(ArenaConfig::small());
    let config = TemporaryNodeConfig::default();

    for _ in 0..N {
        graph.allocate_temporary_node(&config).unwrap();
    }
    let reclaimed = graph.recycle_temporaries();
    assert_eq!(reclaimed, N);

    let allocations = graph.arena().allocation_count();
    let used = graph.arena().used();
    for _ in 0..N {
        graph.allocate_temporary_node(&config).unwrap();
    }

    assert_eq!(graph.arena().allocation_count(), allocations);
    assert_eq!(graph.arena().used(), used);
    assert_eq!(graph.stats().nodes.reserved, N);
}

#[test]
fn test_recycled_cells_need_no_fresh_allocations() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let a = graph.allocate_specification_node(&NodeAttributes::default()).unwrap();
    let b = graph.allocate_specification_node(&NodeAttributes::default()).unwrap();

    let pass = |graph: &mut GraphArena| {
        let edge = graph.allocate_temporary_edge(a, b, &EdgeAttributes::default()).unwrap();
        graph.push_successor(a, edge).unwrap();
        graph.push_predecessor(b, edge).unwrap();
        graph.connect(a, b, edge).unwrap();
        let first = graph.acquire_double_link(a, None).unwrap();
        graph.acquire_double_link(b, Some(first)).unwrap();
        graph.acquire_node_ref(b, None).unwrap();
        graph.recycle_temporaries();
    };

    pass(&mut graph);
    let allocations = graph.arena().allocation_count();
    for _ in 0..10 {
        pass(&mut graph);
    }
    assert_eq!(graph.arena().allocation_count(), allocations);
}

#[test]
fn test_reset_all_matches_pristine_state() {
    let config = ArenaConfig::small();
    let pristine = GraphArena::new(config.clone()).stats();

    let mut graph = GraphArena::new(config);
    populate(&mut graph);
    graph.recycle_temporaries();
    populate(&mut graph);
    assert_ne!(graph.stats(), pristine);

    graph.reset_all();
    assert_eq!(graph.stats(), pristine);

    // Reference numbers restart.
    let id = graph.allocate_specification_node(&NodeAttributes::default()).unwrap();
    assert_eq!(graph.node(id).unwrap().refnum(), 1);
}

#[test]
fn test_handles_die_with_reset_all() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let old = graph.allocate_specification_node(&titled("a")).unwrap();
    graph.reset_all();

    let new = graph.allocate_specification_node(&titled("b")).unwrap();
    assert_eq!(old.index(), new.index());
    assert!(graph.node(old).is_none());
    assert!(graph.node(new).is_some());
}

#[test]
fn test_title_lookup_after_insert() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let node = graph.allocate_specification_node(&titled("main")).unwrap();
    graph.insert_title(Text::from("main"), node).unwrap();

    assert_eq!(graph.lookup_title("main"), Some(node));
    assert_eq!(graph.lookup_title("missing"), None);
}

#[test]
fn test_empty_bulk_release_is_noop() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    graph.allocate_temporary_node(&TemporaryNodeConfig::default()).unwrap();
    graph.recycle_temporaries();
    let before = graph.stats();

    assert_eq!(graph.recycle_temporaries(), 0);
    assert_eq!(graph.release_region_list(None), Ok(0));
    assert_eq!(graph.stats(), before);
}

#[test]
fn test_duplicate_title_scenario() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let first_a = graph.allocate_specification_node(&titled("A")).unwrap();
    let b = graph.allocate_specification_node(&titled("B")).unwrap();
    let second_a = graph.allocate_specification_node(&titled("A")).unwrap();

    graph.register_title(Text::from("A"), first_a).unwrap();
    graph.register_title(Text::from("B"), b).unwrap();
    assert!(matches!(
        graph.register_title(Text::from("A"), second_a),
        Err(GraphError::DuplicateTitle(_))
    ));

    assert_eq!(graph.titles().len(), 2);
    assert_eq!(graph.lookup_title("A"), Some(first_a));
}

#[test]
fn test_recycle_keeps_specification_sequence() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let spec: Vec<_> = ["x", "y", "z"]
        .iter()
        .map(|title| graph.allocate_specification_node(&titled(title)).unwrap())
        .collect();
    let temps: Vec<_> = (0..5)
        .map(|_| {
            graph
                .allocate_temporary_node(&TemporaryNodeConfig::default())
                .unwrap()
        })
        .collect();

    graph.recycle_temporaries();

    assert_eq!(graph.nodes().specification(), spec.as_slice());
    assert_eq!(graph.nodes().temporary_count(), 0);
    assert!(temps.iter().all(|&id| graph.node(id).is_none()));
    assert!(spec.iter().all(|&id| graph.node(id).is_some()));
}

#[test]
fn test_special_registries_survive_recycling() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let edge = graph.allocate_specification_edge(&EdgeAttributes::default()).unwrap();
    graph.insert_special_edge(SpecialEdgeKind::Back, edge).unwrap();
    graph.insert_special_edge(SpecialEdgeKind::BentNear, edge).unwrap();

    graph.recycle_temporaries();
    assert_eq!(graph.special_edges().len(SpecialEdgeKind::Back), 1);

    graph.reset_logical_state();
    assert!(SpecialEdgeKind::ALL
        .iter()
        .all(|&kind| graph.special_edges().is_empty(kind)));
}

#[test]
fn test_region_fold_round_trip() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let a = graph.allocate_specification_node(&titled("a")).unwrap();
    let b = graph.allocate_specification_node(&titled("b")).unwrap();

    // Fold a and b into one substitute node.
    let first = graph.acquire_stable_node_ref(a, None).unwrap();
    let region = graph.acquire_stable_node_ref(b, Some(first)).unwrap();
    let folded = graph.allocate_region_node(&titled("ab")).unwrap();
    graph.recycle_temporaries();
    assert_eq!(graph.node_refs().iter_chain(Some(region)).count(), 2);

    // Unfold.
    assert_eq!(graph.release_single_node(folded), Ok(()));
    assert_eq!(graph.release_region_list(Some(region)), Ok(2));
    assert_eq!(graph.nodes().specification(), &[a, b]);
    assert_eq!(graph.node_refs().stats().live, 0);
}

#[test]
fn test_single_release_rejects_other_classes() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let spec = graph.allocate_specification_node(&NodeAttributes::default()).unwrap();
    let temp = graph
        .allocate_temporary_node(&TemporaryNodeConfig::default())
        .unwrap();

    assert_eq!(
        graph.release_single_node(spec),
        Err(GraphError::ReleaseRejected {
            class: NodeClass::Specification
        })
    );
    assert_eq!(
        graph.release_single_node(temp),
        Err(GraphError::ReleaseRejected {
            class: NodeClass::Temporary
        })
    );
    assert!(graph.node(spec).is_some());
}

#[test]
fn test_arena_exhaustion_is_reported() {
    let config = ArenaConfig {
        arena_capacity: 4096,
        title_index_estimate: 10,
    };
    let mut graph = GraphArena::new(config);

    let mut result = Ok(());
    for _ in 0..10_000 {
        if let Err(err) = graph.allocate_specification_node(&NodeAttributes::default()) {
            result = Err(err);
            break;
        }
    }
    assert!(matches!(result, Err(GraphError::ArenaExhausted { .. })));

    // Recycled slots are still served from a full arena.
    graph.reset_logical_state();
    assert!(graph
        .allocate_specification_node(&NodeAttributes::default())
        .is_ok());
}

#[test]
fn test_finalize_reports_missing_endpoint() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let a = graph.allocate_specification_node(&NodeAttributes::default()).unwrap();
    let edge = graph.allocate_specification_edge(&EdgeAttributes::default()).unwrap();
    graph.edge_mut(edge).unwrap().source = Some(a);

    assert!(matches!(
        graph.finalize_edges(),
        Err(GraphError::MissingEndpoint { position: 0, .. })
    ));

    graph.edge_mut(edge).unwrap().target = Some(a);
    assert_eq!(graph.finalize_edges(), Ok(()));
}

#[test]
fn test_title_cursor_through_arena() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    for i in 0..8 {
        let title = format!("n{i}");
        let node = graph.allocate_specification_node(&titled(&title)).unwrap();
        graph.register_title(Text::from(title), node).unwrap();
    }

    let order: Vec<_> = graph.titles().iter().collect();
    assert_eq!(order.len(), 8);
    assert_eq!(graph.titles_mut().seek(3), Some(order[3]));
    assert_eq!(graph.titles_mut().next(2), Some(order[5]));
}

#[test]
fn test_fresh_parse_after_logical_reset() {
    let mut graph = GraphArena::new(ArenaConfig::small());
    let first = graph.allocate_specification_node(&titled("A")).unwrap();
    graph.register_title(Text::from("A"), first).unwrap();

    graph.reset_logical_state();
    assert_eq!(graph.stats().title_entries, 0);

    let second = graph.allocate_specification_node(&titled("A")).unwrap();
    graph.register_title(Text::from("A"), second).unwrap();
    assert_eq!(graph.titles().len(), 1);
    assert_eq!(graph.lookup_title("A"), Some(second));
}
