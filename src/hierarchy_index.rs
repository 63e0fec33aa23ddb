// Copyright 2025 Cowboy AI, LLC.

//! Prepared hierarchies
//!
//! Everything the similarity formulas read about one hierarchy, computed
//! once: labels, the necessity graph, a path table rooted at every concept,
//! ancestor sets and the root set. An index is immutable after
//! [`HierarchyIndex::prepare`], so metric calls never rebuild graph state.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::concepts::Hierarchy;
use crate::errors::{SimilarityError, SimilarityResult};
use crate::identifiers::ConceptId;
use crate::necessity_graph::{NecessityGraph, SubclassRelation};
use crate::shortest_path::{shortest_paths, PathTable, ShortestPath};

/// Case-insensitive label key used for cross-hierarchy identity
pub fn label_key(label: &str) -> String {
    label.to_lowercase()
}

/// Check if two labels denote the same real-world notion
pub fn labels_match(a: &str, b: &str) -> bool {
    a == b || label_key(a) == label_key(b)
}

#[derive(Debug, Clone)]
struct IndexedConcept {
    label: String,
    parents: Vec<ConceptId>,
    ancestors: IndexSet<ConceptId>,
    root: ConceptId,
}

/// Immutable, fully prepared view of one hierarchy
#[derive(Debug, Clone)]
pub struct HierarchyIndex {
    name: String,
    concepts: IndexMap<ConceptId, IndexedConcept>,
    by_label: IndexMap<String, Vec<ConceptId>>,
    graph: NecessityGraph,
    paths: IndexMap<ConceptId, PathTable>,
    roots: IndexSet<ConceptId>,
}

impl HierarchyIndex {
    /// Index a hierarchy
    ///
    /// Fails on missing labels, dangling parents, duplicates and cycles.
    pub fn prepare<H: Hierarchy + ?Sized>(hierarchy: &H) -> SimilarityResult<Self> {
        let graph = NecessityGraph::build(hierarchy)?;

        let mut labels: IndexMap<ConceptId, String> = IndexMap::new();
        let mut by_label: IndexMap<String, Vec<ConceptId>> = IndexMap::new();
        let mut parents: IndexMap<ConceptId, Vec<ConceptId>> = IndexMap::new();
        for concept in graph.concepts() {
            let label = hierarchy.display_label(concept)?;
            by_label
                .entry(label_key(&label))
                .or_default()
                .push(concept.clone());
            labels.insert(concept.clone(), label);
            let direct = graph
                .parents(concept)?
                .into_iter()
                .map(|(parent, _)| parent)
                .collect();
            parents.insert(concept.clone(), direct);
        }

        let ancestors = ancestor_sets(&parents)?;

        let mut concepts = IndexMap::with_capacity(labels.len());
        let mut roots = IndexSet::new();
        for (concept, label) in labels {
            let root = walk_to_root(&parents, &concept);
            roots.insert(root.clone());
            let indexed = IndexedConcept {
                label,
                parents: parents.get(&concept).cloned().unwrap_or_default(),
                ancestors: ancestors.get(&concept).cloned().unwrap_or_default(),
                root,
            };
            concepts.insert(concept, indexed);
        }

        let mut paths = IndexMap::with_capacity(concepts.len());
        for concept in concepts.keys() {
            paths.insert(concept.clone(), shortest_paths(&graph, concept)?);
        }

        debug!(
            hierarchy = %hierarchy.name(),
            concepts = concepts.len(),
            relations = graph.edge_count(),
            roots = roots.len(),
            "Indexed hierarchy"
        );

        Ok(Self {
            name: hierarchy.name().to_string(),
            concepts,
            by_label,
            graph,
            paths,
            roots,
        })
    }

    /// Hierarchy name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of non-top concepts
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// True when the hierarchy has no concepts
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Concepts in declaration order
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptId> {
        self.concepts.keys()
    }

    /// Check if a concept belongs to the hierarchy
    pub fn contains(&self, concept: &ConceptId) -> bool {
        self.concepts.contains_key(concept)
    }

    /// Fail with `UnknownConcept` unless the concept belongs to the hierarchy
    pub fn require(&self, concept: &ConceptId) -> SimilarityResult<()> {
        self.entry(concept).map(|_| ())
    }

    fn entry(&self, concept: &ConceptId) -> SimilarityResult<&IndexedConcept> {
        self.concepts
            .get(concept)
            .ok_or_else(|| SimilarityError::unknown(concept, &self.name))
    }

    /// Label of a concept (explicit or local-name fallback)
    pub fn label(&self, concept: &ConceptId) -> SimilarityResult<&str> {
        Ok(self.entry(concept)?.label.as_str())
    }

    /// First concept, in declaration order, whose label matches case-insensitively
    pub fn find_by_label(&self, label: &str) -> Option<&ConceptId> {
        self.by_label
            .get(&label_key(label))
            .and_then(|matches| matches.first())
    }

    /// Nearest concept labelled `label` among `concept` and its ancestors
    ///
    /// `concept` itself wins at distance 0; otherwise the ancestor with the
    /// shortest necessity path, the first in ancestor order on ties.
    pub fn nearest_labelled<'a>(
        &'a self,
        concept: &'a ConceptId,
        label: &str,
    ) -> SimilarityResult<Option<&'a ConceptId>> {
        let entry = self.entry(concept)?;
        if labels_match(&entry.label, label) {
            return Ok(Some(concept));
        }
        let table = self.path_table(concept)?;
        let mut nearest: Option<(&ConceptId, f64)> = None;
        for ancestor in &entry.ancestors {
            if !labels_match(self.label(ancestor)?, label) {
                continue;
            }
            let Some(path) = table.get(ancestor) else {
                continue;
            };
            if nearest.map_or(true, |(_, best)| path.distance < best) {
                nearest = Some((ancestor, path.distance));
            }
        }
        Ok(nearest.map(|(ancestor, _)| ancestor))
    }

    /// The necessity graph
    pub fn graph(&self) -> &NecessityGraph {
        &self.graph
    }

    /// Direct (non-top) parents in assertion order
    pub fn parents(&self, concept: &ConceptId) -> SimilarityResult<&[ConceptId]> {
        Ok(self.entry(concept)?.parents.as_slice())
    }

    /// Number of direct parents
    pub fn parent_count(&self, concept: &ConceptId) -> SimilarityResult<usize> {
        Ok(self.entry(concept)?.parents.len())
    }

    /// Necessity degree of `sub` subclass-of `parent`
    pub fn necessity_degree(&self, sub: &ConceptId, parent: &ConceptId) -> SimilarityResult<f64> {
        let entry = self.entry(sub)?;
        if !entry.parents.contains(parent) {
            return Err(SimilarityError::unknown(
                parent,
                format!("parents of {sub} in {}", self.name),
            ));
        }
        Ok(1.0 / entry.parents.len() as f64)
    }

    /// Every subclass-of relation with its necessity degree
    pub fn necessity_degrees(&self) -> Vec<SubclassRelation> {
        self.graph.relations()
    }

    /// Transitive ancestors (the top concept excluded)
    pub fn ancestors(&self, concept: &ConceptId) -> SimilarityResult<&IndexSet<ConceptId>> {
        Ok(&self.entry(concept)?.ancestors)
    }

    /// Ancestor set of every concept
    pub fn ancestor_map(&self) -> IndexMap<&ConceptId, &IndexSet<ConceptId>> {
        self.concepts
            .iter()
            .map(|(concept, entry)| (concept, &entry.ancestors))
            .collect()
    }

    /// Root set
    pub fn roots(&self) -> &IndexSet<ConceptId> {
        &self.roots
    }

    /// Check if a concept is a root
    pub fn is_root(&self, concept: &ConceptId) -> bool {
        self.roots.contains(concept)
    }

    /// Root reached by walking first-listed parents upward
    pub fn root_of(&self, concept: &ConceptId) -> SimilarityResult<&ConceptId> {
        Ok(&self.entry(concept)?.root)
    }

    /// Path table rooted at a concept
    pub fn path_table(&self, source: &ConceptId) -> SimilarityResult<&PathTable> {
        self.paths
            .get(source)
            .ok_or_else(|| SimilarityError::unknown(source, &self.name))
    }

    /// Shortest necessity distance from one concept to another
    pub fn distance(&self, source: &ConceptId, target: &ConceptId) -> SimilarityResult<f64> {
        self.require(target)?;
        self.path_table(source)?.distance_to(target)
    }

    /// Shortest necessity paths from a concept to each root it reaches
    pub fn paths_to_roots(
        &self,
        concept: &ConceptId,
    ) -> SimilarityResult<Vec<(&ConceptId, &ShortestPath)>> {
        let table = self.path_table(concept)?;
        Ok(self
            .roots
            .iter()
            .filter_map(|root| table.get(root).map(|path| (root, path)))
            .collect())
    }
}

/// Ancestor sets, computed recursively: for each parent, its ancestors
/// then the parent itself
fn ancestor_sets(
    parents: &IndexMap<ConceptId, Vec<ConceptId>>,
) -> SimilarityResult<IndexMap<ConceptId, IndexSet<ConceptId>>> {
    let mut done: IndexMap<ConceptId, IndexSet<ConceptId>> = IndexMap::new();
    let mut visiting: IndexSet<ConceptId> = IndexSet::new();
    for concept in parents.keys() {
        collect_ancestors(concept, parents, &mut done, &mut visiting)?;
    }
    Ok(done)
}

fn collect_ancestors(
    concept: &ConceptId,
    parents: &IndexMap<ConceptId, Vec<ConceptId>>,
    done: &mut IndexMap<ConceptId, IndexSet<ConceptId>>,
    visiting: &mut IndexSet<ConceptId>,
) -> SimilarityResult<()> {
    if done.contains_key(concept) {
        return Ok(());
    }
    if !visiting.insert(concept.clone()) {
        return Err(SimilarityError::InvalidHierarchy(format!(
            "subclass cycle through {concept}"
        )));
    }

    let mut ancestors = IndexSet::new();
    for parent in parents.get(concept).map(Vec::as_slice).unwrap_or_default() {
        collect_ancestors(parent, parents, done, visiting)?;
        if let Some(inherited) = done.get(parent) {
            ancestors.extend(inherited.iter().cloned());
        }
        ancestors.insert(parent.clone());
    }

    visiting.swap_remove(concept);
    done.insert(concept.clone(), ancestors);
    Ok(())
}

/// Follow the first listed parent until none remains
///
/// Only one chain is walked even when a concept has several; cycles were
/// rejected before this runs.
fn walk_to_root(parents: &IndexMap<ConceptId, Vec<ConceptId>>, concept: &ConceptId) -> ConceptId {
    let mut current = concept;
    while let Some(next) = parents.get(current).and_then(|p| p.first()) {
        current = next;
    }
    current.clone()
}
