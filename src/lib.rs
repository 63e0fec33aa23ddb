//! # CIM Necessity
//!
//! Necessity-based semantic similarity between concepts of two ontology class
//! hierarchies.
//!
//! A class hierarchy is read possibilistically: a subclass with `k` direct
//! parents holds each subclass-of relation with necessity degree `1/k`. The
//! resulting weighted graph drives four measures:
//! - **distance**: how close the least common subsumer of two concepts sits to a root
//! - **simNec**: pairwise similarity from the legs to the least common subsumer
//! - **weightNec**: how central a concept is within its own hierarchy
//! - **simNecOnto**: ontology-level dissimilarity of two hierarchies
//!
//! ## Design Principles
//!
//! 1. **Prepared once**: [`HierarchyIndex`] holds every graph, path table and
//!    ancestor set a query needs; queries never rebuild them
//! 2. **Call-scoped search state**: shortest-path bookkeeping lives in the
//!    call, never on graph nodes
//! 3. **Deterministic order**: declaration order drives ties and accumulators
//! 4. **Explicit failures**: unreachable targets and missing subsumers are
//!    errors, never sentinel distances
//!
//! ## Example
//!
//! ```
//! use cim_necessity::{ConceptHierarchy, ConceptId, HierarchyIndex, NecessitySimilarity};
//!
//! let mut zoo = ConceptHierarchy::new("zoo");
//! zoo.declare("Animal", &[]).unwrap();
//! zoo.declare("Mammal", &["Animal"]).unwrap();
//! zoo.declare("Dog", &["Mammal"]).unwrap();
//! zoo.declare("Cat", &["Mammal"]).unwrap();
//! let zoo = HierarchyIndex::prepare(&zoo).unwrap();
//!
//! let engine = NecessitySimilarity::default();
//! let sim = engine
//!     .sim_nec(&zoo, &ConceptId::new("Dog"), &zoo, &ConceptId::new("Cat"))
//!     .unwrap();
//! assert!((sim - 0.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]

mod concepts;
mod config;
mod document;
mod errors;
mod hierarchy_index;
mod identifiers;
mod necessity_graph;
mod shortest_path;
mod similarity;
mod subsumers;

// Re-export core types
pub use concepts::{Concept, ConceptHierarchy, Hierarchy, OWL_THING};
pub use config::{SimilarityConfig, UnrelatedPairPolicy};
pub use document::{ConceptRecord, HierarchyDocument};
pub use errors::{SimilarityError, SimilarityResult};
pub use hierarchy_index::{label_key, labels_match, HierarchyIndex};
pub use identifiers::ConceptId;
pub use necessity_graph::{build_graph, NecessityGraph, NecessityWeight, SubclassRelation};
pub use shortest_path::{shortest_paths, PathTable, ShortestPath};
pub use similarity::{different_concepts_count, NecessitySimilarity};
pub use subsumers::{
    common_subsumers, resolve_lcs, CommonSubsumers, LeastCommonSubsumer, SubsumerCandidate,
    SubsumerOrigin,
};
