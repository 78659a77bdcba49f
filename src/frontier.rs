//! Per-Stop Best Frontier ("star bag", §3 `StarFrontier`): one bag per stop
//! tracking the best labels ever established there across all rounds. Used
//! only as a pruning oracle during the route scan and footpath relaxation —
//! never read back out by the Query Driver.

use crate::ids::StopIdx;
use crate::label::{Bag, CriterionVector, Label};

pub struct StarFrontier {
    bags: Vec<Bag>,
}

impl StarFrontier {
    pub fn new(num_stops: usize, num_criteria: usize) -> Self {
        Self { bags: (0..num_stops).map(|_| Bag::infinite(num_criteria)).collect() }
    }

    pub fn is_non_dominated(&self, stop: StopIdx, candidate: &CriterionVector) -> bool {
        self.bags[stop as usize].is_non_dominated(candidate)
    }

    /// Install a single newly-improved label at `stop`, re-filtering the
    /// frontier's bag (§4.4.2 Step B item 2).
    pub fn install(&mut self, stop: StopIdx, label: Label) {
        self.bags[stop as usize].insert_pareto(label);
    }

    /// Install every label of `labels` at `stop` in one pareto_filter pass
    /// (§4.4.2 Step C: `StarFrontier[q] := pareto_filter(temp ∪ StarFrontier[q])`).
    pub fn install_all(&mut self, stop: StopIdx, labels: &[Label]) {
        let mut combined: Vec<Label> = self.bags[stop as usize].labels().to_vec();
        combined.extend(labels.iter().cloned());
        self.bags[stop as usize] = Bag::from_filtered(Bag::pareto_filter(combined));
    }
}
