// Copyright 2025 Cowboy AI, LLC.

//! Necessity-based semantic similarity
//!
//! Pure functions of prepared hierarchies:
//!
//! - `distance(H1, H2, c1, c2)`: how close the LCS of `c1`/`c2` sits to a root
//! - `sim_nec(H1, H2, c1, c2)`: `2D / (d1 + d2 + 2D)` with `D = distance`,
//!   `d1 = d(c1 → LCS)` in `H1` and `d2 = d(c2 → LCS)` in `H2`
//! - `weight_nec(H, c)`: mean `sim_nec` of every other concept against `c`
//! - `sim_nec_onto(H1, H2)`: weighted ontology-level dissimilarity
//!
//! `sim_nec` short-circuits on identifier equality while `distance` and the
//! LCS search compare labels. The two notions are kept apart.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{SimilarityConfig, UnrelatedPairPolicy};
use crate::errors::{SimilarityError, SimilarityResult};
use crate::hierarchy_index::{labels_match, HierarchyIndex};
use crate::identifiers::ConceptId;
use crate::subsumers::{self, CommonSubsumers, LeastCommonSubsumer};

/// Similarity engine
#[derive(Debug, Clone, Default)]
pub struct NecessitySimilarity {
    config: SimilarityConfig,
}

impl NecessitySimilarity {
    /// Create an engine with the given configuration
    ///
    /// Fails with `InvalidConfig` unless `unit_distance` is finite and positive.
    pub fn new(config: SimilarityConfig) -> SimilarityResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Label-matched common subsumers of `c1` and `c2`
    pub fn common_subsumers(
        &self,
        first: &HierarchyIndex,
        c1: &ConceptId,
        second: &HierarchyIndex,
        c2: &ConceptId,
    ) -> SimilarityResult<CommonSubsumers> {
        subsumers::common_subsumers(first, c1, second, c2)
    }

    /// Least common subsumer of `c1` and `c2`
    pub fn resolve_lcs(
        &self,
        first: &HierarchyIndex,
        c1: &ConceptId,
        second: &HierarchyIndex,
        c2: &ConceptId,
    ) -> SimilarityResult<LeastCommonSubsumer> {
        subsumers::resolve_lcs(first, c1, second, c2)
    }

    /// Distance from the LCS of `c1`/`c2` to the nearest root of either hierarchy
    ///
    /// Identical labels give the unit distance. An LCS that is itself a root
    /// on one side contributes the unit distance for that side. Roots the LCS
    /// cannot reach are skipped.
    pub fn distance(
        &self,
        first: &HierarchyIndex,
        c1: &ConceptId,
        second: &HierarchyIndex,
        c2: &ConceptId,
    ) -> SimilarityResult<f64> {
        if labels_match(first.label(c1)?, second.label(c2)?) {
            return Ok(self.config.unit_distance);
        }

        let lcs = self.resolve_lcs(first, c1, second, c2)?;
        let sides = [
            lcs.in_first(first)?.map(|c| (first, c)),
            lcs.in_second(second)?.map(|c| (second, c)),
        ];

        let mut shortest: Option<f64> = None;
        for (index, located) in sides.into_iter().flatten() {
            for candidate in self.root_distances(index, &located)? {
                if shortest.map_or(true, |best| candidate < best) {
                    shortest = Some(candidate);
                }
            }
        }

        shortest.ok_or_else(|| SimilarityError::unreachable(&lcs.concept, "any root"))
    }

    fn root_distances(
        &self,
        index: &HierarchyIndex,
        located: &ConceptId,
    ) -> SimilarityResult<Vec<f64>> {
        if index.is_root(located) {
            return Ok(vec![self.config.unit_distance]);
        }
        let table = index.path_table(located)?;
        Ok(index
            .roots()
            .iter()
            .filter_map(|root| table.get(root).map(|path| path.distance))
            .collect())
    }

    /// Necessity similarity of `c1` (first) and `c2` (second)
    pub fn sim_nec(
        &self,
        first: &HierarchyIndex,
        c1: &ConceptId,
        second: &HierarchyIndex,
        c2: &ConceptId,
    ) -> SimilarityResult<f64> {
        first.require(c1)?;
        second.require(c2)?;
        if c1 == c2 {
            return Ok(1.0);
        }

        let lcs = self.resolve_lcs(first, c1, second, c2)?;
        let to_first = self.leg(first, c1, lcs.in_first(first)?, &lcs)?;
        let to_second = self.leg(second, c2, lcs.in_second(second)?, &lcs)?;
        let to_root = 2.0 * self.distance(first, c1, second, c2)?;

        Ok(to_root / (to_first + to_second + to_root))
    }

    fn leg(
        &self,
        index: &HierarchyIndex,
        concept: &ConceptId,
        located: Option<ConceptId>,
        lcs: &LeastCommonSubsumer,
    ) -> SimilarityResult<f64> {
        match located {
            Some(target) if target == *concept => Ok(self.config.unit_distance),
            Some(target) => index.path_table(concept)?.distance_to(&target),
            None => Err(SimilarityError::unreachable(concept, lcs.label.as_str())),
        }
    }

    /// Mean necessity similarity of every other concept against `concept`
    ///
    /// 0.0 for a hierarchy with no other concept. Under
    /// [`UnrelatedPairPolicy::Zero`] unrelated pairs add 0 to the mean, so a
    /// concept unrelated to every other one also weighs 0.0; under
    /// [`UnrelatedPairPolicy::Fail`] the first such pair is returned as an error.
    pub fn weight_nec(&self, index: &HierarchyIndex, concept: &ConceptId) -> SimilarityResult<f64> {
        index.require(concept)?;
        let mut total = 0.0;
        let mut others = 0usize;
        for other in index.concepts().filter(|c| *c != concept) {
            total += self.absorb(self.sim_nec(index, other, index, concept), other, concept)?;
            others += 1;
        }
        if others == 0 {
            return Ok(0.0);
        }
        Ok(total / others as f64)
    }

    /// `weight_nec` of every concept, in declaration order
    pub fn weights(&self, index: &HierarchyIndex) -> SimilarityResult<IndexMap<ConceptId, f64>> {
        index
            .concepts()
            .map(|concept| Ok((concept.clone(), self.weight_nec(index, concept)?)))
            .collect()
    }

    /// Ontology-level necessity dissimilarity of two hierarchies
    ///
    /// The running totals `w` and `ww` start at 1 and are never reset:
    /// `w` keeps growing across outer iterations and `ww` adds `w × w1(c1)`
    /// after each one. The result is `1 - sum / (ww × (|H1| + |H2|))`.
    pub fn sim_nec_onto(
        &self,
        first: &HierarchyIndex,
        second: &HierarchyIndex,
    ) -> SimilarityResult<f64> {
        if first.is_empty() && second.is_empty() {
            return Err(SimilarityError::InvalidHierarchy(format!(
                "cannot compare empty hierarchies {} and {}",
                first.name(),
                second.name()
            )));
        }
        let first_weights = self.weights(first)?;
        let second_weights = self.weights(second)?;

        let mut sum = 0.0;
        let mut w = 1.0;
        let mut ww = 1.0;
        for (c1, w1) in &first_weights {
            for (c2, w2) in &second_weights {
                let sim = self.absorb(self.sim_nec(first, c1, second, c2), c1, c2)?;
                sum += w1 * w2 * sim;
                w += w2;
            }
            ww += w * w1;
        }

        let size = (first.len() + second.len()) as f64;
        let score = 1.0 - sum / (ww * size);

        debug!(
            first = %first.name(),
            second = %second.name(),
            pairs = first.len() * second.len(),
            score,
            "Computed ontology necessity similarity"
        );

        Ok(score)
    }

    /// Apply the unrelated-pair policy to a pairwise result
    fn absorb(
        &self,
        result: SimilarityResult<f64>,
        c1: &ConceptId,
        c2: &ConceptId,
    ) -> SimilarityResult<f64> {
        match result {
            Err(err)
                if err.is_unrelated_pair()
                    && self.config.unrelated_pairs == UnrelatedPairPolicy::Zero =>
            {
                debug!(c1 = %c1, c2 = %c2, error = %err, "Scoring unrelated pair as 0");
                Ok(0.0)
            }
            other => other,
        }
    }

    /// Concepts of either hierarchy without a label-matching counterpart
    pub fn different_concepts_count(
        &self,
        first: &HierarchyIndex,
        second: &HierarchyIndex,
    ) -> SimilarityResult<usize> {
        different_concepts_count(first, second)
    }
}

/// `|H1| + |H2| - 2 × (number of label-matching pairs)`
///
/// Every matching pair is counted, so duplicate labels can drive the count
/// below zero; the result saturates at 0.
pub fn different_concepts_count(
    first: &HierarchyIndex,
    second: &HierarchyIndex,
) -> SimilarityResult<usize> {
    let mut matches = 0usize;
    for c1 in first.concepts() {
        let label1 = first.label(c1)?;
        for c2 in second.concepts() {
            if labels_match(label1, second.label(c2)?) {
                matches += 1;
            }
        }
    }
    Ok((first.len() + second.len()).saturating_sub(2 * matches))
}
