// Copyright 2025 Cowboy AI, LLC.

//! Error types for similarity operations

use thiserror::Error;

use crate::identifiers::ConceptId;

/// Errors that can occur while indexing hierarchies or scoring concepts
///
/// None of these are retried: every computation is deterministic, so a
/// failed query fails the same way on every attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    /// Concept has neither an explicit label nor a derivable local name
    #[error("Missing label: concept {concept} has no label and no local name")]
    MissingLabel {
        /// Concept without a usable label
        concept: ConceptId,
    },

    /// No label-matching common ancestor exists for the pair
    #[error("No common subsumer for {first} and {second}")]
    NoCommonSubsumer {
        /// Concept from the first hierarchy
        first: ConceptId,
        /// Concept from the second hierarchy
        second: ConceptId,
    },

    /// A shortest-path target was never reached from the source
    #[error("Unreachable target: no necessity path from {origin} to {target}")]
    UnreachableTarget {
        /// Source of the path search
        origin: ConceptId,
        /// Requested target
        target: String,
    },

    /// Identifier not present in the hierarchy
    #[error("Unknown concept: {concept} in hierarchy {hierarchy}")]
    UnknownConcept {
        /// Identifier that was looked up
        concept: ConceptId,
        /// Name of the hierarchy that was searched
        hierarchy: String,
    },

    /// Hierarchy violates a structural precondition
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Engine configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading or writing a hierarchy document
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for similarity operations
pub type SimilarityResult<T> = Result<T, SimilarityError>;

impl From<serde_json::Error> for SimilarityError {
    fn from(err: serde_json::Error) -> Self {
        SimilarityError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SimilarityError {
    fn from(err: std::io::Error) -> Self {
        SimilarityError::Io(err.to_string())
    }
}

impl SimilarityError {
    /// Create an unknown-concept error
    pub fn unknown(concept: &ConceptId, hierarchy: impl Into<String>) -> Self {
        SimilarityError::UnknownConcept {
            concept: concept.clone(),
            hierarchy: hierarchy.into(),
        }
    }

    /// Create an unreachable-target error
    pub fn unreachable(origin: &ConceptId, target: impl Into<String>) -> Self {
        SimilarityError::UnreachableTarget {
            origin: origin.clone(),
            target: target.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SimilarityError::UnknownConcept { .. } | SimilarityError::MissingLabel { .. }
        )
    }

    /// Check if the pair simply shares no necessity structure
    ///
    /// These are the errors an aggregate score may absorb as a zero
    /// contribution, depending on [`crate::UnrelatedPairPolicy`].
    pub fn is_unrelated_pair(&self) -> bool {
        matches!(
            self,
            SimilarityError::NoCommonSubsumer { .. } | SimilarityError::UnreachableTarget { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = SimilarityError::MissingLabel {
            concept: ConceptId::new("http://example.org/#"),
        };
        assert_eq!(
            err.to_string(),
            "Missing label: concept http://example.org/# has no label and no local name"
        );

        let err = SimilarityError::NoCommonSubsumer {
            first: ConceptId::new("Dog"),
            second: ConceptId::new("Oak"),
        };
        assert_eq!(err.to_string(), "No common subsumer for Dog and Oak");

        let err = SimilarityError::unreachable(&ConceptId::new("Dog"), "Plant");
        assert_eq!(
            err.to_string(),
            "Unreachable target: no necessity path from Dog to Plant"
        );

        let err = SimilarityError::unknown(&ConceptId::new("Unicorn"), "zoo");
        assert_eq!(err.to_string(), "Unknown concept: Unicorn in hierarchy zoo");

        let err = SimilarityError::InvalidHierarchy("cycle through Dog".to_string());
        assert_eq!(err.to_string(), "Invalid hierarchy: cycle through Dog");

        let err = SimilarityError::InvalidConfig("unit_distance must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: unit_distance must be positive");
    }

    #[test]
    fn test_error_classification() {
        let unrelated = SimilarityError::NoCommonSubsumer {
            first: ConceptId::new("a"),
            second: ConceptId::new("b"),
        };
        assert!(unrelated.is_unrelated_pair());
        assert!(!unrelated.is_not_found());

        let unreachable = SimilarityError::unreachable(&ConceptId::new("a"), "b");
        assert!(unreachable.is_unrelated_pair());

        let unknown = SimilarityError::unknown(&ConceptId::new("a"), "h");
        assert!(unknown.is_not_found());
        assert!(!unknown.is_unrelated_pair());
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SimilarityError = json_err.into();
        assert!(matches!(err, SimilarityError::Serialization(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: SimilarityError = io_err.into();
        assert!(matches!(err, SimilarityError::Io(msg) if msg.contains("missing.json")));
    }
}
