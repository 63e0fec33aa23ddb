// Copyright 2025 Cowboy AI, LLC.

use cim_necessity::{
    build_graph, shortest_paths, ConceptHierarchy, ConceptId, HierarchyIndex, NecessityGraph,
    SimilarityError, OWL_THING,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::Index;

fn id(s: &str) -> ConceptId {
    ConceptId::new(s)
}

/// Random DAG: node `i` picks its parents among nodes `0..i`
fn dag(parent_picks: &[Vec<Index>]) -> ConceptHierarchy {
    let mut h = ConceptHierarchy::new("random");
    for (i, picks) in parent_picks.iter().enumerate() {
        let name = format!("n{i}");
        let parents: Vec<String> = if i == 0 {
            Vec::new()
        } else {
            picks.iter().map(|pick| format!("n{}", pick.index(i))).collect()
        };
        let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
        h.declare(&name, &parents).unwrap();
    }
    h
}

fn edge_weight(graph: &NecessityGraph, sub: &ConceptId) -> f64 {
    graph.parent_count(sub).unwrap() as f64
}

#[test]
fn chain_scenario_distances() {
    let mut h = ConceptHierarchy::new("zoo");
    h.declare("Animal", &[OWL_THING]).unwrap();
    h.declare("Mammal", &["Animal"]).unwrap();
    h.declare("Dog", &["Mammal"]).unwrap();
    h.declare("Cat", &["Mammal"]).unwrap();
    let graph = build_graph(&h).unwrap();

    assert_eq!(graph.parents(&id("Dog")).unwrap(), vec![(id("Mammal"), 1.0)]);
    assert_eq!(graph.parents(&id("Mammal")).unwrap(), vec![(id("Animal"), 1.0)]);

    let table = shortest_paths(&graph, &id("Dog")).unwrap();
    assert_eq!(table.distance_to(&id("Animal")).unwrap(), 2.0);
    assert!(!table.is_reachable(&id("Cat")));
}

#[test]
fn multi_parent_edges_weigh_the_parent_count() {
    let mut h = ConceptHierarchy::new("x");
    h.declare("P1", &[]).unwrap();
    h.declare("P2", &[]).unwrap();
    h.declare("X", &["P1", "P2", OWL_THING]).unwrap();
    let graph = build_graph(&h).unwrap();

    assert_eq!(
        graph.parents(&id("X")).unwrap(),
        vec![(id("P1"), 2.0), (id("P2"), 2.0)]
    );
    let relations = graph.relations();
    assert!(relations.iter().all(|r| r.degree == 0.5));
}

#[test]
fn duplicate_declaration_is_rejected() {
    // Custom hierarchy sources may list a concept twice.
    struct Doubled;
    impl cim_necessity::Hierarchy for Doubled {
        fn name(&self) -> &str {
            "doubled"
        }
        fn concepts(&self) -> Vec<ConceptId> {
            vec![id("A"), id("A")]
        }
        fn label(&self, _: &ConceptId) -> Option<String> {
            None
        }
        fn direct_parents(&self, _: &ConceptId) -> Vec<ConceptId> {
            Vec::new()
        }
        fn is_top(&self, _: &ConceptId) -> bool {
            false
        }
    }
    let err = build_graph(&Doubled).unwrap_err();
    assert!(matches!(err, SimilarityError::InvalidHierarchy(_)));
}

#[test]
fn cycles_are_rejected_when_indexing() {
    struct Loop;
    impl cim_necessity::Hierarchy for Loop {
        fn name(&self) -> &str {
            "loop"
        }
        fn concepts(&self) -> Vec<ConceptId> {
            vec![id("A"), id("B")]
        }
        fn label(&self, _: &ConceptId) -> Option<String> {
            None
        }
        fn direct_parents(&self, concept: &ConceptId) -> Vec<ConceptId> {
            match concept.as_str() {
                "A" => vec![id("B")],
                _ => vec![id("A")],
            }
        }
        fn is_top(&self, _: &ConceptId) -> bool {
            false
        }
    }
    let err = HierarchyIndex::prepare(&Loop).unwrap_err();
    assert!(matches!(err, SimilarityError::InvalidHierarchy(_)));
}

proptest! {
    #[test]
    fn recorded_paths_match_reported_distances(
        picks in proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..3), 1..12)
    ) {
        let h = dag(&picks);
        let graph = build_graph(&h).unwrap();

        for source in graph.concepts() {
            let table = shortest_paths(&graph, source).unwrap();
            for (target, shortest) in table.iter() {
                prop_assert!(shortest.distance >= 0.0);
                prop_assert_eq!(shortest.path.first(), Some(source));
                prop_assert_eq!(shortest.path.last(), Some(target));

                let walked: f64 = shortest.path[..shortest.path.len() - 1]
                    .iter()
                    .map(|sub| edge_weight(&graph, sub))
                    .sum();
                prop_assert_eq!(walked, shortest.distance);
            }
        }
    }

    #[test]
    fn no_edge_shortens_a_settled_distance(
        picks in proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..3), 1..12)
    ) {
        let h = dag(&picks);
        let graph = build_graph(&h).unwrap();

        for source in graph.concepts() {
            let table = shortest_paths(&graph, source).unwrap();
            for (sub, reached) in table.iter() {
                for (parent, weight) in graph.parents(sub).unwrap() {
                    let to_parent = table.distance_to(&parent).unwrap();
                    prop_assert!(to_parent <= reached.distance + weight);
                }
            }
        }
    }

    #[test]
    fn every_concept_reaches_its_root(
        picks in proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..3), 1..12)
    ) {
        let h = dag(&picks);
        let index = HierarchyIndex::prepare(&h).unwrap();

        for concept in index.concepts() {
            let root = index.root_of(concept).unwrap();
            prop_assert!(index.is_root(root));
            prop_assert!(index.distance(concept, root).is_ok());
            prop_assert!(!index.paths_to_roots(concept).unwrap().is_empty());
        }
    }
}
