// Copyright 2025 Cowboy AI, LLC.

//! Concepts and Concept Hierarchies
//!
//! A hierarchy is the asserted subclass-of structure of one ontology: its
//! concepts, their human readable labels and their direct parents. Nothing
//! here is inferred. The universal top concept (`owl:Thing` by default) is
//! never a concept of the hierarchy; parent links to it are kept as asserted
//! and ignored by everything downstream.
//!
//! [`Hierarchy`] is the seam to whatever loads ontologies. [`ConceptHierarchy`]
//! is the in-memory implementation used by the document loader and the tests.

use indexmap::{IndexMap, IndexSet};

use crate::errors::{SimilarityError, SimilarityResult};
use crate::identifiers::ConceptId;

/// Default identifier of the universal top concept
pub const OWL_THING: &str = "owl:Thing";

/// Source of class hierarchy data
pub trait Hierarchy {
    /// Name used in error messages and logs
    fn name(&self) -> &str;

    /// All concept identifiers, in a stable order
    ///
    /// May include the top concept; callers filter it with [`Hierarchy::is_top`].
    fn concepts(&self) -> Vec<ConceptId>;

    /// Explicit label annotation, if any
    fn label(&self, concept: &ConceptId) -> Option<String>;

    /// Direct parents of a concept, as asserted
    fn direct_parents(&self, concept: &ConceptId) -> Vec<ConceptId>;

    /// True for the universal top concept
    fn is_top(&self, concept: &ConceptId) -> bool;

    /// Label used for cross-hierarchy identity
    ///
    /// Falls back to the identifier's local name when no non-blank label is
    /// annotated.
    fn display_label(&self, concept: &ConceptId) -> SimilarityResult<String> {
        if let Some(label) = self.label(concept) {
            if !label.trim().is_empty() {
                return Ok(label);
            }
        }
        concept
            .local_name()
            .map(str::to_string)
            .ok_or_else(|| SimilarityError::MissingLabel {
                concept: concept.clone(),
            })
    }
}

/// A Concept of a hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    /// Identifier, unique within its hierarchy
    pub id: ConceptId,
    /// Explicit label annotation (e.g., "Heart")
    pub label: Option<String>,
}

impl Concept {
    /// Create an unlabeled concept
    pub fn new(id: impl Into<ConceptId>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    /// Set/replace the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// In-memory class hierarchy
///
/// Concepts and parent lists keep their declaration order.
#[derive(Debug, Clone)]
pub struct ConceptHierarchy {
    name: String,
    top: ConceptId,
    concepts: IndexMap<ConceptId, Concept>,
    parents: IndexMap<ConceptId, IndexSet<ConceptId>>,
}

impl ConceptHierarchy {
    /// Create an empty hierarchy whose top concept is `owl:Thing`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            top: ConceptId::new(OWL_THING),
            concepts: IndexMap::new(),
            parents: IndexMap::new(),
        }
    }

    /// Use a different identifier for the top concept
    pub fn with_top(mut self, top: impl Into<ConceptId>) -> Self {
        self.top = top.into();
        self
    }

    /// Identifier of the top concept
    pub fn top(&self) -> &ConceptId {
        &self.top
    }

    /// Insert or update a concept; an update keeps the original position and parents
    pub fn upsert_concept(&mut self, concept: Concept) -> SimilarityResult<()> {
        if concept.id == self.top {
            return Err(SimilarityError::InvalidHierarchy(format!(
                "top concept {} cannot be declared as a concept",
                concept.id
            )));
        }
        self.parents.entry(concept.id.clone()).or_default();
        self.concepts.insert(concept.id.clone(), concept);
        Ok(())
    }

    /// Assert `sub` subclass-of `parent`
    ///
    /// `parent` may be the top concept; anything else must already be declared.
    pub fn add_subclass_of(
        &mut self,
        sub: impl Into<ConceptId>,
        parent: impl Into<ConceptId>,
    ) -> SimilarityResult<()> {
        let sub = sub.into();
        let parent = parent.into();
        if !self.concepts.contains_key(&sub) {
            return Err(SimilarityError::unknown(&sub, &self.name));
        }
        if parent != self.top && !self.concepts.contains_key(&parent) {
            return Err(SimilarityError::unknown(&parent, &self.name));
        }
        if sub == parent {
            return Err(SimilarityError::InvalidHierarchy(format!(
                "{sub} cannot be its own parent"
            )));
        }
        self.parents.entry(sub).or_default().insert(parent);
        Ok(())
    }

    /// Declare an unlabeled concept together with its direct parents
    pub fn declare(&mut self, id: &str, parents: &[&str]) -> SimilarityResult<()> {
        self.upsert_concept(Concept::new(id))?;
        for parent in parents {
            self.add_subclass_of(id, *parent)?;
        }
        Ok(())
    }

    /// Declare a labeled concept together with its direct parents
    pub fn declare_labeled(
        &mut self,
        id: &str,
        label: &str,
        parents: &[&str],
    ) -> SimilarityResult<()> {
        self.upsert_concept(Concept::new(id).with_label(label))?;
        for parent in parents {
            self.add_subclass_of(id, *parent)?;
        }
        Ok(())
    }

    /// Get a concept by id
    pub fn concept(&self, id: &ConceptId) -> Option<&Concept> {
        self.concepts.get(id)
    }

    /// Iterate concepts in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Number of concepts (the top concept is never counted)
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// True when no concept is declared
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

impl Hierarchy for ConceptHierarchy {
    fn name(&self) -> &str {
        &self.name
    }

    fn concepts(&self) -> Vec<ConceptId> {
        self.concepts.keys().cloned().collect()
    }

    fn label(&self, concept: &ConceptId) -> Option<String> {
        self.concepts.get(concept).and_then(|c| c.label.clone())
    }

    fn direct_parents(&self, concept: &ConceptId) -> Vec<ConceptId> {
        self.parents
            .get(concept)
            .map(|parents| parents.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn is_top(&self, concept: &ConceptId) -> bool {
        *concept == self.top
    }
}
