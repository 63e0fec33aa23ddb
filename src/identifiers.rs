// Copyright 2025 Cowboy AI, LLC.

//! Identifier types for concepts
//!
//! A [`ConceptId`] is only meaningful within the hierarchy that declared it.
//! Two hierarchies may use different identifiers for the same real-world
//! notion; cross-hierarchy identity is established through labels, never
//! through identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Concept ID - unique within one hierarchy
///
/// Usually an IRI (`http://example.org/body#Heart`) or a CURIE (`body:Heart`),
/// but any non-empty string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(String);

impl ConceptId {
    /// Create from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local name of the identifier: the text after the last `#`, `/` or `:`.
    ///
    /// Returns `None` when nothing follows the final separator
    /// (e.g. `http://example.org/body#`).
    pub fn local_name(&self) -> Option<&str> {
        let tail = match self.0.rfind(['#', '/', ':']) {
            Some(pos) => &self.0[pos + 1..],
            None => self.0.as_str(),
        };
        let tail = tail.trim();
        if tail.is_empty() {
            None
        } else {
            Some(tail)
        }
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConceptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConceptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&ConceptId> for ConceptId {
    fn from(id: &ConceptId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for ConceptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
