// Copyright 2025 Cowboy AI, LLC.

//! Necessity graph
//!
//! Possibilistic reading of a class hierarchy: a subclass with `k` direct
//! parents holds each of its subclass-of relations with necessity degree
//! `1/k`. The graph stores the inverse of that degree as the edge distance,
//! so every edge out of a subclass weighs `k`. Multiple inheritance makes
//! each individual parent link less necessary, hence longer.
//!
//! Edges point from subclass to parent. The top concept is not a node and
//! links to it are dropped; concepts whose only parent is the top concept
//! have out-degree 0. Input hierarchies are assumed acyclic.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::concepts::Hierarchy;
use crate::errors::{SimilarityError, SimilarityResult};
use crate::identifiers::ConceptId;

/// Weight of a subclass-of edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NecessityWeight {
    /// Number of direct parents of the subclass
    pub parents: usize,
}

impl NecessityWeight {
    /// Necessity degree of the relation, `1 / parents`
    pub fn degree(&self) -> f64 {
        1.0 / self.parents as f64
    }

    /// Distance along the edge, the inverse of the necessity degree
    pub fn distance(&self) -> f64 {
        self.parents as f64
    }
}

/// A subclass-of relation with its necessity data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubclassRelation {
    /// Subclass
    pub sub: ConceptId,
    /// Direct parent
    pub parent: ConceptId,
    /// Parent count of the subclass
    pub parents: usize,
    /// Necessity degree (`1 / parents`)
    pub degree: f64,
    /// Edge distance (`parents`)
    pub distance: f64,
}

/// Weighted subclass→parent graph over the non-top concepts of a hierarchy
#[derive(Debug, Clone)]
pub struct NecessityGraph {
    graph: DiGraph<ConceptId, NecessityWeight>,
    nodes: HashMap<ConceptId, NodeIndex>,
}

impl NecessityGraph {
    /// Build the necessity graph of a hierarchy
    pub fn build<H: Hierarchy + ?Sized>(hierarchy: &H) -> SimilarityResult<Self> {
        let concepts: Vec<ConceptId> = hierarchy
            .concepts()
            .into_iter()
            .filter(|c| !hierarchy.is_top(c))
            .collect();

        let mut graph = DiGraph::with_capacity(concepts.len(), concepts.len());
        let mut nodes = HashMap::with_capacity(concepts.len());
        for concept in &concepts {
            if nodes.contains_key(concept) {
                return Err(SimilarityError::InvalidHierarchy(format!(
                    "concept {concept} is declared twice in {}",
                    hierarchy.name()
                )));
            }
            let idx = graph.add_node(concept.clone());
            nodes.insert(concept.clone(), idx);
        }

        for concept in &concepts {
            let mut parents: Vec<ConceptId> = Vec::new();
            for parent in hierarchy.direct_parents(concept) {
                if hierarchy.is_top(&parent) || parents.contains(&parent) {
                    continue;
                }
                if parent == *concept {
                    return Err(SimilarityError::InvalidHierarchy(format!(
                        "{concept} cannot be its own parent"
                    )));
                }
                parents.push(parent);
            }

            let weight = NecessityWeight {
                parents: parents.len(),
            };
            let sub_idx = nodes[concept];
            for parent in &parents {
                let parent_idx = *nodes
                    .get(parent)
                    .ok_or_else(|| SimilarityError::unknown(parent, hierarchy.name()))?;
                graph.add_edge(sub_idx, parent_idx, weight);
            }
        }

        debug!(
            hierarchy = %hierarchy.name(),
            concepts = graph.node_count(),
            relations = graph.edge_count(),
            "Built necessity graph"
        );

        Ok(Self { graph, nodes })
    }

    /// Node index of a concept
    pub fn node(&self, concept: &ConceptId) -> Option<NodeIndex> {
        self.nodes.get(concept).copied()
    }

    /// Concept at a node index
    pub fn concept(&self, idx: NodeIndex) -> Option<&ConceptId> {
        self.graph.node_weight(idx)
    }

    /// Check if a concept is a node of the graph
    pub fn contains(&self, concept: &ConceptId) -> bool {
        self.nodes.contains_key(concept)
    }

    /// Concepts in declaration order
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptId> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of subclass-of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing edges of a node in assertion order
    pub(crate) fn out_edges(
        &self,
        idx: NodeIndex,
    ) -> Vec<EdgeReference<'_, NecessityWeight>> {
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
    }

    /// Direct parents of a concept with their edge distances, in assertion order
    pub fn parents(&self, concept: &ConceptId) -> SimilarityResult<Vec<(ConceptId, f64)>> {
        let idx = self
            .node(concept)
            .ok_or_else(|| SimilarityError::unknown(concept, "necessity graph"))?;
        Ok(self
            .out_edges(idx)
            .into_iter()
            .map(|edge| (self.graph[edge.target()].clone(), edge.weight().distance()))
            .collect())
    }

    /// Number of direct parents (out-degree)
    pub fn parent_count(&self, concept: &ConceptId) -> SimilarityResult<usize> {
        let idx = self
            .node(concept)
            .ok_or_else(|| SimilarityError::unknown(concept, "necessity graph"))?;
        Ok(self.graph.edges(idx).count())
    }

    /// Every subclass-of relation with its necessity degree
    pub fn relations(&self) -> Vec<SubclassRelation> {
        self.graph
            .node_indices()
            .flat_map(|idx| self.out_edges(idx))
            .map(|edge| {
                let weight = *edge.weight();
                SubclassRelation {
                    sub: self.graph[edge.source()].clone(),
                    parent: self.graph[edge.target()].clone(),
                    parents: weight.parents,
                    degree: weight.degree(),
                    distance: weight.distance(),
                }
            })
            .collect()
    }
}

/// Build the necessity graph of a hierarchy
pub fn build_graph<H: Hierarchy + ?Sized>(hierarchy: &H) -> SimilarityResult<NecessityGraph> {
    NecessityGraph::build(hierarchy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::{ConceptHierarchy, OWL_THING};

    fn vehicles() -> ConceptHierarchy {
        //   Vehicle   Machine
        //        \    /
        //         Car
        //          |
        //        Sedan
        let mut h = ConceptHierarchy::new("vehicles");
        h.declare("Vehicle", &[OWL_THING]).unwrap();
        h.declare("Machine", &[]).unwrap();
        h.declare("Car", &["Vehicle", "Machine"]).unwrap();
        h.declare("Sedan", &["Car"]).unwrap();
        h
    }

    #[test]
    fn top_concept_is_not_a_node() {
        let g = build_graph(&vehicles()).unwrap();
        assert_eq!(g.node_count(), 4);
        assert!(!g.contains(&ConceptId::new(OWL_THING)));
        assert_eq!(g.parent_count(&ConceptId::new("Vehicle")).unwrap(), 0);
    }

    #[test]
    fn edge_weight_is_parent_count() {
        let g = build_graph(&vehicles()).unwrap();
        let car = g.parents(&ConceptId::new("Car")).unwrap();
        assert_eq!(
            car,
            vec![
                (ConceptId::new("Vehicle"), 2.0),
                (ConceptId::new("Machine"), 2.0)
            ]
        );
        let sedan = g.parents(&ConceptId::new("Sedan")).unwrap();
        assert_eq!(sedan, vec![(ConceptId::new("Car"), 1.0)]);
    }

    #[test]
    fn relations_report_necessity_degrees() {
        let g = build_graph(&vehicles()).unwrap();
        let relations = g.relations();
        assert_eq!(relations.len(), 3);
        let car_vehicle = relations
            .iter()
            .find(|r| r.sub.as_str() == "Car" && r.parent.as_str() == "Vehicle")
            .unwrap();
        assert_eq!(car_vehicle.parents, 2);
        assert_eq!(car_vehicle.degree, 0.5);
        assert_eq!(car_vehicle.distance, 2.0);
    }

    #[test]
    fn unknown_concept_is_reported() {
        let g = build_graph(&vehicles()).unwrap();
        let err = g.parents(&ConceptId::new("Boat")).unwrap_err();
        assert!(err.is_not_found());
    }
}
