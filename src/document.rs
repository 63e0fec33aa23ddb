// Copyright 2025 Cowboy AI, LLC.

//! JSON documents for concept hierarchies
//!
//! ```json
//! {
//!   "name": "body-system",
//!   "top": "owl:Thing",
//!   "concepts": [
//!     { "id": "body:Organ", "label": "Organ" },
//!     { "id": "body:Heart", "parents": ["body:Organ"] }
//!   ]
//! }
//! ```
//!
//! Parents may reference concepts declared later in the document.

use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::concepts::{Concept, ConceptHierarchy, Hierarchy, OWL_THING};
use crate::errors::{SimilarityError, SimilarityResult};
use crate::identifiers::ConceptId;

/// One concept entry of a hierarchy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    /// Concept identifier
    pub id: ConceptId,
    /// Explicit label annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Direct parents (may include the top concept)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ConceptId>,
}

/// Serializable form of a [`ConceptHierarchy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyDocument {
    /// Hierarchy name
    pub name: String,
    /// Identifier of the universal top concept
    #[serde(default = "default_top")]
    pub top: ConceptId,
    /// Concepts in declaration order
    pub concepts: Vec<ConceptRecord>,
}

fn default_top() -> ConceptId {
    ConceptId::new(OWL_THING)
}

impl HierarchyDocument {
    /// Parse a document from JSON
    pub fn from_json(json: &str) -> SimilarityResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the document as pretty-printed JSON
    pub fn to_json(&self) -> SimilarityResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the in-memory hierarchy
    ///
    /// All concepts are declared before any parent link, so forward
    /// references are allowed. A concept id listed twice is rejected.
    pub fn into_hierarchy(self) -> SimilarityResult<ConceptHierarchy> {
        let mut hierarchy = ConceptHierarchy::new(self.name).with_top(self.top);
        let mut seen = IndexSet::with_capacity(self.concepts.len());
        for record in &self.concepts {
            if !seen.insert(&record.id) {
                return Err(SimilarityError::InvalidHierarchy(format!(
                    "concept {} is declared twice in {}",
                    record.id,
                    hierarchy.name()
                )));
            }
            let mut concept = Concept::new(record.id.clone());
            concept.label = record.label.clone();
            hierarchy.upsert_concept(concept)?;
        }
        for record in &self.concepts {
            for parent in &record.parents {
                hierarchy.add_subclass_of(record.id.clone(), parent.clone())?;
            }
        }
        debug!(
            hierarchy = %hierarchy.name(),
            concepts = hierarchy.len(),
            "Loaded hierarchy document"
        );
        Ok(hierarchy)
    }

    /// Capture a hierarchy as a document
    pub fn from_hierarchy(hierarchy: &ConceptHierarchy) -> Self {
        let concepts = hierarchy
            .iter()
            .map(|concept| ConceptRecord {
                id: concept.id.clone(),
                label: concept.label.clone(),
                parents: hierarchy.direct_parents(&concept.id),
            })
            .collect();
        Self {
            name: hierarchy.name().to_string(),
            top: hierarchy.top().clone(),
            concepts,
        }
    }
}

impl ConceptHierarchy {
    /// Parse a hierarchy from a JSON document
    pub fn from_json(json: &str) -> SimilarityResult<Self> {
        HierarchyDocument::from_json(json)?.into_hierarchy()
    }

    /// Render the hierarchy as a JSON document
    pub fn to_json(&self) -> SimilarityResult<String> {
        HierarchyDocument::from_hierarchy(self).to_json()
    }

    /// Load a hierarchy from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimilarityResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Save the hierarchy as a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> SimilarityResult<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }
}
