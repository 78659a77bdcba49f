//! `LabelStore` (§3): `round -> stop -> Bag`, populated for rounds
//! `0..=MAX_TRANSFER` and immutable once the Query Driver returns it.

use crate::ids::StopIdx;
use crate::label::{Bag, Label};

pub struct LabelStore {
    rounds: Vec<Vec<Bag>>,
}

impl LabelStore {
    pub(crate) fn new(max_transfer: usize, num_stops: usize, num_criteria: usize) -> Self {
        let rounds = (0..=max_transfer).map(|_| (0..num_stops).map(|_| Bag::infinite(num_criteria)).collect()).collect();
        Self { rounds }
    }

    pub fn max_transfer(&self) -> usize {
        self.rounds.len() - 1
    }

    pub fn num_stops(&self) -> usize {
        self.rounds.first().map_or(0, |round| round.len())
    }

    /// `LabelStore[k][p]`.
    pub fn get(&self, round: usize, stop: StopIdx) -> &Bag {
        &self.rounds[round][stop as usize]
    }

    pub(crate) fn set(&mut self, round: usize, stop: StopIdx, bag: Bag) {
        self.rounds[round][stop as usize] = bag;
    }

    /// §4.5: "A terminal label at DESTINATION is any label in
    /// LabelStore\[k\]\[DESTINATION\] for some k in \[1, MAX_TRANSFER\] whose
    /// arrival is not the infinite sentinel."
    pub fn terminal_labels(&self, destination: StopIdx) -> impl Iterator<Item = (usize, &Label)> {
        self.rounds[1..]
            .iter()
            .enumerate()
            .flat_map(move |(offset, round)| {
                round[destination as usize].labels().iter().filter(|l| !l.is_infinite()).map(move |l| (offset + 1, l))
            })
    }

    /// §4.5: the destination is unreachable iff every round's bag at the
    /// destination contains only the infinite label.
    pub fn is_destination_unreachable(&self, destination: StopIdx) -> bool {
        self.rounds[1..].iter().all(|round| round[destination as usize].is_all_infinite())
    }
}
