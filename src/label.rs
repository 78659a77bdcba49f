//! Label & Bag Algebra (§4.3). The Pareto-domination primitives the rest of
//! the engine builds on: component-wise weak/strict dominance over a fixed
//! arity criterion vector, and the `pareto_filter` / `is_non_dominated` /
//! `merge` operations spec.md defines.
//!
//! A label carries a criterion vector plus an owning trip id; trip id never
//! participates in dominance (§4.3: "Trip id is ignored").

use crate::ids::TripId;
use arrayvec::ArrayVec;

/// Upper bound on the number of simultaneously minimized criteria. The
/// algebra in this module is generic up to this bound; only the Round
/// Engine's cost model (§4.4) fixes a specific arity.
pub const MAX_CRITERIA: usize = 8;

pub type CriterionValue = u64;

/// A value exceeding all plausible arrival times, used uniformly across
/// every criterion slot (see SPEC_FULL.md Open Question 5).
pub const INFINITE: CriterionValue = CriterionValue::MAX / 2;

pub type CriterionVector = ArrayVec<CriterionValue, MAX_CRITERIA>;

/// Build the all-infinite vector of a given arity.
pub fn infinite_vector(num_criteria: usize) -> CriterionVector {
    let mut v = CriterionVector::new();
    for _ in 0..num_criteria {
        v.push(INFINITE);
    }
    v
}

/// Weak dominance: `u ⪯ v` iff `u[i] <= v[i]` for every `i`.
pub fn weakly_dominates(u: &CriterionVector, v: &CriterionVector) -> bool {
    debug_assert_eq!(u.len(), v.len(), "criterion vectors must share an arity");
    u.iter().zip(v.iter()).all(|(a, b)| a <= b)
}

/// Strict dominance: `u ≺ v` iff `u ⪯ v` and `u != v`.
pub fn strictly_dominates(u: &CriterionVector, v: &CriterionVector) -> bool {
    weakly_dominates(u, v) && u != v
}

/// A `(criterion vector, trip id)` pair. `trip = None` is the `NO_TRIP`
/// sentinel: a transfer state that hasn't yet boarded a trip.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub criteria: CriterionVector,
    pub trip: Option<TripId>,
}

impl Label {
    pub fn new(criteria: CriterionVector, trip: Option<TripId>) -> Self {
        Self { criteria, trip }
    }

    pub fn infinite(num_criteria: usize) -> Self {
        Self { criteria: infinite_vector(num_criteria), trip: None }
    }

    pub fn is_infinite(&self) -> bool {
        self.criteria.iter().all(|&c| c == INFINITE)
    }
}

/// A set of labels, pairwise non-dominated under the criterion vector (I1).
#[derive(Clone, Debug, Default)]
pub struct Bag {
    labels: Vec<Label>,
}

impl Bag {
    pub fn single(label: Label) -> Self {
        Self { labels: vec![label] }
    }

    /// Wrap an already pairwise non-dominated set of labels, e.g. the
    /// output of [`Bag::pareto_filter`]. Does not re-check the invariant.
    pub fn from_filtered(labels: Vec<Label>) -> Self {
        Self { labels }
    }

    pub fn infinite(num_criteria: usize) -> Self {
        Self::single(Label::infinite(num_criteria))
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True iff every label in the bag is the all-infinite sentinel (the
    /// destination-unreachable representation from §4.5).
    pub fn is_all_infinite(&self) -> bool {
        self.labels.iter().all(Label::is_infinite)
    }

    /// `is_non_dominated(x, B)`: true iff no label in `B` strictly
    /// dominates `x`, and `x`'s vector is not already present in `B`.
    pub fn is_non_dominated(&self, candidate: &CriterionVector) -> bool {
        !self.labels.iter().any(|l| {
            strictly_dominates(&l.criteria, candidate) || &l.criteria == candidate
        })
    }

    /// Remove every label strictly dominated by another, coalescing
    /// duplicate vectors with first-seen-wins (so trip attribution is
    /// deterministic downstream in `merge`).
    pub fn pareto_filter(labels: Vec<Label>) -> Vec<Label> {
        let mut deduped: Vec<Label> = Vec::with_capacity(labels.len());
        for label in labels {
            if !deduped.iter().any(|kept| kept.criteria == label.criteria) {
                deduped.push(label);
            }
        }

        let mut survivors = Vec::with_capacity(deduped.len());
        for (i, candidate) in deduped.iter().enumerate() {
            let dominated = deduped
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && strictly_dominates(&other.criteria, &candidate.criteria));
            if !dominated {
                survivors.push(candidate.clone());
            }
        }
        survivors
    }

    /// Insert `candidate` into the bag, keeping it pairwise non-dominated.
    /// Used by the star frontier, which only ever grows one label at a
    /// time (§4.4.2 Step B item 2).
    pub fn insert_pareto(&mut self, candidate: Label) {
        let mut combined = std::mem::take(&mut self.labels);
        combined.push(candidate);
        self.labels = Self::pareto_filter(combined);
    }

    /// `merge(existing, incoming) -> (merged, newly_added)` per §4.3.
    pub fn merge(existing: &Bag, incoming: &Bag) -> (Bag, Bag) {
        let mut combined: Vec<Label> = Vec::with_capacity(existing.labels.len() + incoming.labels.len());
        combined.extend(existing.labels.iter().cloned());
        for label in &incoming.labels {
            if !combined.iter().any(|e| e.criteria == label.criteria) {
                combined.push(Label::new(label.criteria.clone(), None));
            }
        }

        let filtered = Self::pareto_filter(combined);
        debug_assert!(
            {
                let mut vectors: Vec<&CriterionVector> = filtered.iter().map(|l| &l.criteria).collect();
                let before = vectors.len();
                vectors.sort_by(|a, b| a.as_slice().cmp(b.as_slice()));
                vectors.dedup();
                vectors.len() == before
            },
            "merge produced duplicate criterion vectors with distinct trips"
        );

        let mut newly = Vec::new();
        for label in &filtered {
            if !existing.labels.iter().any(|e| e.criteria == label.criteria) {
                newly.push(label.clone());
            }
        }

        (Bag { labels: filtered }, Bag { labels: newly })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3(a: u64, b: u64, c: u64) -> CriterionVector {
        let mut v = CriterionVector::new();
        v.push(a);
        v.push(b);
        v.push(c);
        v
    }

    #[test]
    fn strict_dominance_requires_difference() {
        let u = vec3(100, 1, 0);
        assert!(!strictly_dominates(&u, &u));
        let v = vec3(100, 1, 1);
        assert!(strictly_dominates(&u, &v));
        assert!(!strictly_dominates(&v, &u));
    }

    #[test]
    fn pareto_filter_drops_dominated_and_coalesces_duplicates() {
        let labels = vec![
            Label::new(vec3(100, 1, 0), Some(TripId(1))),
            Label::new(vec3(100, 1, 0), Some(TripId(2))), // duplicate vector, first-seen wins
            Label::new(vec3(200, 2, 50), Some(TripId(3))), // dominated by the first
            Label::new(vec3(90, 3, 0), Some(TripId(4))), // incomparable (better arrival, worse stops)
        ];
        let filtered = Bag::pareto_filter(labels);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().any(|l| l.trip == Some(TripId(1))));
        assert!(filtered.iter().any(|l| l.trip == Some(TripId(4))));
    }

    #[test]
    fn merge_reports_only_genuinely_new_vectors() {
        let existing = Bag::single(Label::new(vec3(100, 1, 0), Some(TripId(1))));
        let incoming = Bag::single(Label::new(vec3(90, 2, 0), None));
        let (merged, newly) = Bag::merge(&existing, &incoming);
        assert_eq!(merged.len(), 2);
        assert_eq!(newly.len(), 1);
        assert_eq!(newly.labels()[0].criteria, vec3(90, 2, 0));
        assert_eq!(newly.labels()[0].trip, None);
    }

    #[test]
    fn merge_is_idempotent_on_identical_bags() {
        let bag = Bag::single(Label::new(vec3(100, 1, 0), Some(TripId(1))));
        let (merged, newly) = Bag::merge(&bag, &bag);
        assert_eq!(merged.len(), 1);
        assert!(newly.is_empty());
        assert_eq!(merged.labels()[0].trip, Some(TripId(1)));
    }

    #[test]
    fn is_non_dominated_rejects_exact_duplicate() {
        let bag = Bag::single(Label::new(vec3(100, 1, 0), Some(TripId(1))));
        assert!(!bag.is_non_dominated(&vec3(100, 1, 0)));
        assert!(bag.is_non_dominated(&vec3(99, 1, 0)));
        assert!(!bag.is_non_dominated(&vec3(101, 2, 0)));
    }
}
