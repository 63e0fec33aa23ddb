// Copyright 2025 Cowboy AI, LLC.

//! Configuration for the similarity engine

use serde::{Deserialize, Serialize};

use crate::errors::{SimilarityError, SimilarityResult};

/// How aggregate scores treat pairs that share no necessity structure
///
/// A pair is unrelated when its pairwise query fails with
/// `NoCommonSubsumer` or `UnreachableTarget` (typically two concepts under
/// different roots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrelatedPairPolicy {
    /// Score the pair 0.0; it still counts in every denominator
    #[default]
    Zero,
    /// Abort the aggregate with the pairwise error
    Fail,
}

/// Similarity engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Distance used where a leg is empty: a concept that is its own LCS,
    /// an LCS that is already a root, or two concepts with identical labels
    pub unit_distance: f64,
    /// Treatment of unrelated pairs inside `weight_nec` and `sim_nec_onto`
    pub unrelated_pairs: UnrelatedPairPolicy,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            unit_distance: 1.0,
            unrelated_pairs: UnrelatedPairPolicy::Zero,
        }
    }
}

impl SimilarityConfig {
    /// Strict configuration: unrelated pairs abort aggregate scores
    pub fn strict() -> Self {
        Self {
            unrelated_pairs: UnrelatedPairPolicy::Fail,
            ..Self::default()
        }
    }

    /// Load from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> SimilarityResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that `unit_distance` is finite and strictly positive
    pub fn validate(&self) -> SimilarityResult<()> {
        if !self.unit_distance.is_finite() || self.unit_distance <= 0.0 {
            return Err(SimilarityError::InvalidConfig(format!(
                "unit_distance must be finite and positive, got {}",
                self.unit_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_unit_distance_and_zero_policy() {
        let config = SimilarityConfig::default();
        assert_eq!(config.unit_distance, 1.0);
        assert_eq!(config.unrelated_pairs, UnrelatedPairPolicy::Zero);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimilarityConfig::from_json(r#"{ "unrelated_pairs": "fail" }"#).unwrap();
        assert_eq!(config, SimilarityConfig::strict());

        let config = SimilarityConfig::from_json("{}").unwrap();
        assert_eq!(config, SimilarityConfig::default());
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = SimilarityConfig::from_json(r#"{ "unrelated_pairs": "ignore" }"#).unwrap_err();
        assert!(matches!(err, SimilarityError::Serialization(_)));
    }

    #[test]
    fn rejects_unusable_unit_distance() {
        for json in [
            r#"{ "unit_distance": 0.0 }"#,
            r#"{ "unit_distance": -1.0 }"#,
        ] {
            let err = SimilarityConfig::from_json(json).unwrap_err();
            assert!(matches!(err, SimilarityError::InvalidConfig(_)), "{json}");
        }

        let config = SimilarityConfig {
            unit_distance: f64::NAN,
            ..SimilarityConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimilarityError::InvalidConfig(_))));
        assert!(SimilarityConfig::from_json(r#"{ "unit_distance": 2.5 }"#).is_ok());
    }
}
