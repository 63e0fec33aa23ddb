// Copyright 2025 Cowboy AI, LLC.

//! Single-source shortest necessity paths
//!
//! Dijkstra over a [`NecessityGraph`]. Search state (tentative distance,
//! predecessor, settled flag) lives in tables owned by one call, so any
//! number of searches may run over the same graph, concurrently or not.
//! All edge weights are parent counts (≥ 1), so the recorded paths are
//! globally minimal. Ties between equal-distance paths are broken by node
//! order; only the total distance is meaningful.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{SimilarityError, SimilarityResult};
use crate::identifiers::ConceptId;
use crate::necessity_graph::NecessityGraph;

/// Minimal-distance path from a source to one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPath {
    /// Concepts from the source (first) to the target (last)
    pub path: Vec<ConceptId>,
    /// Sum of edge distances along `path`
    pub distance: f64,
}

/// Every shortest path from one source
///
/// Unreachable targets have no entry; asking for one is an
/// `UnreachableTarget` error, never a huge finite distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTable {
    source: ConceptId,
    entries: IndexMap<ConceptId, ShortestPath>,
}

impl PathTable {
    /// Source concept of the search
    pub fn source(&self) -> &ConceptId {
        &self.source
    }

    /// Path to a target, if reached
    pub fn get(&self, target: &ConceptId) -> Option<&ShortestPath> {
        self.entries.get(target)
    }

    /// Check if a target was reached
    pub fn is_reachable(&self, target: &ConceptId) -> bool {
        self.entries.contains_key(target)
    }

    /// Distance to a target
    pub fn distance_to(&self, target: &ConceptId) -> SimilarityResult<f64> {
        self.get(target)
            .map(|p| p.distance)
            .ok_or_else(|| SimilarityError::unreachable(&self.source, target.as_str()))
    }

    /// Path to a target
    pub fn path_to(&self, target: &ConceptId) -> SimilarityResult<&[ConceptId]> {
        self.get(target)
            .map(|p| p.path.as_slice())
            .ok_or_else(|| SimilarityError::unreachable(&self.source, target.as_str()))
    }

    /// Reached targets in settle order (the source first, at distance 0)
    pub fn iter(&self) -> impl Iterator<Item = (&ConceptId, &ShortestPath)> {
        self.entries.iter()
    }

    /// Number of reached targets, the source included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the source reaches itself
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run Dijkstra from `source` over `graph`
pub fn shortest_paths(graph: &NecessityGraph, source: &ConceptId) -> SimilarityResult<PathTable> {
    let start = graph
        .node(source)
        .ok_or_else(|| SimilarityError::unknown(source, "necessity graph"))?;

    let mut distance: HashMap<NodeIndex, f64> = HashMap::new();
    let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut settled: HashSet<NodeIndex> = HashSet::new();
    let mut order: Vec<NodeIndex> = Vec::new();
    let mut queue = BinaryHeap::new();

    distance.insert(start, 0.0);
    queue.push(Reverse((OrderedFloat(0.0_f64), start)));

    while let Some(Reverse((OrderedFloat(dist), current))) = queue.pop() {
        if !settled.insert(current) {
            continue;
        }
        order.push(current);

        for edge in graph.out_edges(current) {
            let next = edge.target();
            if settled.contains(&next) {
                continue;
            }
            let candidate = dist + edge.weight().distance();
            let improved = distance.get(&next).map_or(true, |known| candidate < *known);
            if improved {
                distance.insert(next, candidate);
                predecessor.insert(next, current);
                queue.push(Reverse((OrderedFloat(candidate), next)));
            }
        }
    }

    let mut entries = IndexMap::with_capacity(order.len());
    for idx in order {
        let path = reconstruct(graph, &predecessor, idx);
        let Some(target) = graph.concept(idx) else {
            continue;
        };
        entries.insert(
            target.clone(),
            ShortestPath {
                path,
                distance: distance[&idx],
            },
        );
    }

    trace!(source = %source, reached = entries.len(), "Computed shortest necessity paths");

    Ok(PathTable {
        source: source.clone(),
        entries,
    })
}

/// Walk predecessors back to the source
fn reconstruct(
    graph: &NecessityGraph,
    predecessor: &HashMap<NodeIndex, NodeIndex>,
    target: NodeIndex,
) -> Vec<ConceptId> {
    let mut path = Vec::new();
    let mut current = Some(target);
    while let Some(idx) = current {
        if let Some(concept) = graph.concept(idx) {
            path.push(concept.clone());
        }
        current = predecessor.get(&idx).copied();
    }
    path.reverse();
    path
}
