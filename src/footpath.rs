//! Footpath Graph (§4.2): per-stop adjacency of short walking transfers.
//! The relation need not be symmetric; each directed edge is independent.

use std::collections::HashMap;

use crate::error::FootpathError;
use crate::ids::{StopId, StopIdx};
use crate::timetable::{Timestamp, Timetable};

/// `neighbors(p) -> [(q, walk_seconds)]`.
pub struct FootpathGraph {
    adjacency: Vec<Vec<(StopIdx, Timestamp)>>,
}

impl FootpathGraph {
    /// An empty footpath graph sized for `num_stops` stops — valid input
    /// when the timetable defines no walking transfers at all.
    pub fn empty(num_stops: usize) -> Self {
        Self { adjacency: vec![Vec::new(); num_stops] }
    }

    pub fn neighbors(&self, stop: StopIdx) -> &[(StopIdx, Timestamp)] {
        &self.adjacency[stop as usize]
    }
}

/// Validates and constructs an immutable [`FootpathGraph`] against an
/// already-built [`Timetable`], so stop ids can be resolved to the dense
/// indices the round engine operates on.
pub struct FootpathGraphBuilder<'t> {
    timetable: &'t Timetable,
    edges: HashMap<StopIdx, Vec<(StopIdx, Timestamp)>>,
}

impl<'t> FootpathGraphBuilder<'t> {
    pub fn new(timetable: &'t Timetable) -> Self {
        Self { timetable, edges: HashMap::new() }
    }

    pub fn add_footpath(&mut self, from: StopId, to: StopId, walk_seconds: i64) -> Result<&mut Self, FootpathError> {
        if walk_seconds < 0 {
            return Err(FootpathError::NegativeDuration(from, walk_seconds));
        }
        if from == to {
            return Err(FootpathError::SelfLoop(from));
        }
        let from_idx = self.timetable.stop_idx(from).ok_or(FootpathError::UnknownStop(from))?;
        let to_idx = self.timetable.stop_idx(to).ok_or(FootpathError::UnknownStop(to))?;
        self.edges.entry(from_idx).or_default().push((to_idx, walk_seconds as Timestamp));
        Ok(self)
    }

    pub fn build(self) -> FootpathGraph {
        let mut adjacency = vec![Vec::new(); self.timetable.num_stops()];
        for (from, edges) in self.edges {
            adjacency[from as usize] = edges;
        }
        FootpathGraph { adjacency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RouteId, TripId};
    use crate::timetable::TimetableBuilder;

    #[test]
    fn rejects_self_loop() {
        let mut tb = TimetableBuilder::new([StopId(1)]);
        tb.add_route(RouteId(1), vec![StopId(1)], vec![(TripId(1), vec![0])]).unwrap();
        let timetable = tb.build().unwrap();
        let mut fb = FootpathGraphBuilder::new(&timetable);
        let err = fb.add_footpath(StopId(1), StopId(1), 30).unwrap_err();
        assert_eq!(err, FootpathError::SelfLoop(StopId(1)));
    }

    #[test]
    fn rejects_negative_duration() {
        let mut tb = TimetableBuilder::new([StopId(1), StopId(2)]);
        tb.add_route(RouteId(1), vec![StopId(1), StopId(2)], vec![(TripId(1), vec![0, 10])]).unwrap();
        let timetable = tb.build().unwrap();
        let mut fb = FootpathGraphBuilder::new(&timetable);
        let err = fb.add_footpath(StopId(1), StopId(2), -5).unwrap_err();
        assert_eq!(err, FootpathError::NegativeDuration(StopId(1), -5));
    }

    #[test]
    fn builds_directed_edge() {
        let mut tb = TimetableBuilder::new([StopId(1), StopId(2)]);
        tb.add_route(RouteId(1), vec![StopId(1), StopId(2)], vec![(TripId(1), vec![0, 10])]).unwrap();
        let timetable = tb.build().unwrap();
        let mut fb = FootpathGraphBuilder::new(&timetable);
        fb.add_footpath(StopId(1), StopId(2), 60).unwrap();
        let graph = fb.build();
        let p1 = timetable.stop_idx(StopId(1)).unwrap();
        let p2 = timetable.stop_idx(StopId(2)).unwrap();
        assert_eq!(graph.neighbors(p1), &[(p2, 60)]);
        assert!(graph.neighbors(p2).is_empty());
    }
}
