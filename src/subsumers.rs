// Copyright 2025 Cowboy AI, LLC.

//! Common subsumers across two hierarchies
//!
//! Two hierarchies share no identifiers, only labels. A common subsumer of
//! `c1` (in the first hierarchy) and `c2` (in the second) is an ancestor of
//! `c2` whose label matches, case-insensitively, the label of some ancestor
//! of `c1`. The least common subsumer (LCS) is the candidate minimizing
//! `d1(c1 → a1) + d2(c2 → a2)`, each leg measured in its own hierarchy.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{SimilarityError, SimilarityResult};
use crate::hierarchy_index::{labels_match, HierarchyIndex};
use crate::identifiers::ConceptId;

/// One label-matched ancestor pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsumerCandidate {
    /// Ancestor of `c1` in the first hierarchy
    pub first: ConceptId,
    /// Ancestor of `c2` in the second hierarchy with a matching label
    pub second: ConceptId,
}

/// Common subsumers of a concept pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonSubsumers {
    candidates: Vec<SubsumerCandidate>,
}

impl CommonSubsumers {
    /// Matched ancestor pairs, first-hierarchy ancestors in outer order
    pub fn candidates(&self) -> &[SubsumerCandidate] {
        &self.candidates
    }

    /// The common subsumers as second-hierarchy concepts
    pub fn concepts(&self) -> IndexSet<&ConceptId> {
        self.candidates.iter().map(|c| &c.second).collect()
    }

    /// Number of matched pairs
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when the concepts share no labelled ancestor
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Where an LCS came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubsumerOrigin {
    /// `c1` is a root of the first hierarchy and is its own LCS
    FirstRoot,
    /// `c2` is a root of the second hierarchy and is its own LCS
    SecondRoot,
    /// Chosen among the common subsumers
    Shared,
}

/// Least common subsumer of a concept pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeastCommonSubsumer {
    /// How the LCS was determined
    pub origin: SubsumerOrigin,
    /// The LCS as reported: `c1`, `c2`, or the second-hierarchy candidate
    pub concept: ConceptId,
    /// Label of the LCS
    pub label: String,
    /// The LCS in the first hierarchy, when known without a label lookup
    pub first: Option<ConceptId>,
    /// The LCS in the second hierarchy, when known without a label lookup
    pub second: Option<ConceptId>,
    /// `c1` as queried
    pub c1: ConceptId,
    /// `c2` as queried
    pub c2: ConceptId,
    /// `d1(c1 → first) + d2(c2 → second)` for shared subsumers
    pub combined_distance: Option<f64>,
}

impl LeastCommonSubsumer {
    /// The LCS in the first hierarchy
    ///
    /// After a `SecondRoot` shortcut only the label is known; the counterpart
    /// is the nearest concept with that label among `c1` and its ancestors.
    pub fn in_first(&self, first: &HierarchyIndex) -> SimilarityResult<Option<ConceptId>> {
        match &self.first {
            Some(known) => Ok(Some(known.clone())),
            None => Ok(first.nearest_labelled(&self.c1, &self.label)?.cloned()),
        }
    }

    /// The LCS in the second hierarchy, located like [`Self::in_first`]
    pub fn in_second(&self, second: &HierarchyIndex) -> SimilarityResult<Option<ConceptId>> {
        match &self.second {
            Some(known) => Ok(Some(known.clone())),
            None => Ok(second.nearest_labelled(&self.c2, &self.label)?.cloned()),
        }
    }
}

/// Label-matched common ancestors of `c1` (first) and `c2` (second)
///
/// Pairs are listed with the first hierarchy's ancestors as the outer loop
/// and the second's as the inner loop, both in ancestor-set order.
pub fn common_subsumers(
    first: &HierarchyIndex,
    c1: &ConceptId,
    second: &HierarchyIndex,
    c2: &ConceptId,
) -> SimilarityResult<CommonSubsumers> {
    let ancestors1 = first.ancestors(c1)?;
    let ancestors2 = second.ancestors(c2)?;

    let mut candidates = Vec::new();
    for a1 in ancestors1 {
        let label1 = first.label(a1)?;
        for a2 in ancestors2 {
            if labels_match(label1, second.label(a2)?) {
                candidates.push(SubsumerCandidate {
                    first: a1.clone(),
                    second: a2.clone(),
                });
            }
        }
    }
    Ok(CommonSubsumers { candidates })
}

/// Resolve the least common subsumer of `c1` (first) and `c2` (second)
///
/// A root `c1` is its own LCS and the second hierarchy is not consulted;
/// otherwise a root `c2` is its own LCS. Ties between candidates keep the
/// first one listed by [`common_subsumers`].
pub fn resolve_lcs(
    first: &HierarchyIndex,
    c1: &ConceptId,
    second: &HierarchyIndex,
    c2: &ConceptId,
) -> SimilarityResult<LeastCommonSubsumer> {
    first.require(c1)?;
    if first.is_root(c1) {
        trace!(c1 = %c1, "LCS shortcut: first concept is a root");
        return Ok(LeastCommonSubsumer {
            origin: SubsumerOrigin::FirstRoot,
            concept: c1.clone(),
            label: first.label(c1)?.to_string(),
            first: Some(c1.clone()),
            second: None,
            c1: c1.clone(),
            c2: c2.clone(),
            combined_distance: None,
        });
    }

    second.require(c2)?;
    if second.is_root(c2) {
        trace!(c2 = %c2, "LCS shortcut: second concept is a root");
        return Ok(LeastCommonSubsumer {
            origin: SubsumerOrigin::SecondRoot,
            concept: c2.clone(),
            label: second.label(c2)?.to_string(),
            first: None,
            second: Some(c2.clone()),
            c1: c1.clone(),
            c2: c2.clone(),
            combined_distance: None,
        });
    }

    let cs = common_subsumers(first, c1, second, c2)?;
    let paths1 = first.path_table(c1)?;
    let paths2 = second.path_table(c2)?;

    let mut best: Option<(&SubsumerCandidate, f64)> = None;
    for candidate in cs.candidates() {
        let total = paths1.distance_to(&candidate.first)? + paths2.distance_to(&candidate.second)?;
        if best.map_or(true, |(_, shortest)| total < shortest) {
            best = Some((candidate, total));
        }
    }

    let Some((winner, total)) = best else {
        return Err(SimilarityError::NoCommonSubsumer {
            first: c1.clone(),
            second: c2.clone(),
        });
    };

    trace!(
        c1 = %c1,
        c2 = %c2,
        lcs = %winner.second,
        candidates = cs.len(),
        combined_distance = total,
        "Resolved least common subsumer"
    );

    Ok(LeastCommonSubsumer {
        origin: SubsumerOrigin::Shared,
        concept: winner.second.clone(),
        label: second.label(&winner.second)?.to_string(),
        first: Some(winner.first.clone()),
        second: Some(winner.second.clone()),
        c1: c1.clone(),
        c2: c2.clone(),
        combined_distance: Some(total),
    })
}
