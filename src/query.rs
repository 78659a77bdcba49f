//! Query Driver (§4.5): validates a query's parameters, performs
//! initialization (§4.4.1), runs rounds until `max_transfer` or early
//! termination, and hands back the finished [`LabelStore`].

use log::{debug, info};

use crate::engine::{self, ARRIVAL, IVTT, STOP_COUNT};
use crate::error::QueryError;
use crate::footpath::FootpathGraph;
use crate::frontier::StarFrontier;
use crate::ids::StopId;
use crate::label::{CriterionVector, Label, INFINITE};
use crate::store::LabelStore;
use crate::timetable::Timetable;

/// The reference cost model's arity: `(arrival_time_sec, stop_count, ivtt_sec)`.
pub const REFERENCE_NUM_CRITERIA: usize = 3;

/// Parameters for a single route query (§6).
#[derive(Clone, Debug)]
pub struct Query {
    pub source: StopId,
    pub destination: StopId,
    pub departure_time_sec: i64,
    pub max_transfer: usize,
    pub number_of_criteria: usize,
}

impl Query {
    pub fn new(source: StopId, destination: StopId, departure_time_sec: i64, max_transfer: usize) -> Self {
        Self { source, destination, departure_time_sec, max_transfer, number_of_criteria: REFERENCE_NUM_CRITERIA }
    }
}

/// Runs `query` against `timetable`/`footpaths`, returning the populated
/// [`LabelStore`] or the `InvalidInput`/`InconsistentTimetable` error that
/// aborted it (§7). `UnreachableDestination` is not an error case; callers
/// check [`LabelStore::is_destination_unreachable`] on the `Ok` result.
pub fn run_query(timetable: &Timetable, footpaths: &FootpathGraph, query: &Query) -> Result<LabelStore, QueryError> {
    validate(timetable, query)?;

    let source_idx = timetable.stop_idx(query.source).expect("validated above");
    let destination_idx = timetable.stop_idx(query.destination).expect("validated above");

    let mut store = LabelStore::new(query.max_transfer, timetable.num_stops(), query.number_of_criteria);
    let mut frontier = StarFrontier::new(timetable.num_stops(), query.number_of_criteria);
    let mut marked = vec![false; timetable.num_stops()];

    // §4.4.1: LabelStore[0][SOURCE] and StarFrontier[SOURCE] start at the
    // single label (departure, 1, 0, ...), remaining slots per cost model.
    let mut criteria = CriterionVector::new();
    criteria.push(query.departure_time_sec as u64);
    criteria.push(1);
    for _ in 2..query.number_of_criteria {
        criteria.push(0);
    }
    let initial = Label::new(criteria, None);
    store.set(0, source_idx, crate::label::Bag::single(initial.clone()));
    frontier.install(source_idx, initial);
    marked[source_idx as usize] = true;

    info!("query source={:?} destination={:?} depart={} max_transfer={}", query.source, query.destination, query.departure_time_sec, query.max_transfer);

    for k in 1..=query.max_transfer {
        let made_progress = engine::run_round(timetable, footpaths, &mut store, &mut frontier, &mut marked, k, destination_idx)?;
        debug!("round {k} complete, made_progress={made_progress}");
        if !made_progress {
            debug!("terminating early after round {k}: marked set empty (§4.4.2 Step D)");
            break;
        }
    }

    Ok(store)
}

fn validate(timetable: &Timetable, query: &Query) -> Result<(), QueryError> {
    timetable.stop_idx(query.source).ok_or(QueryError::UnknownSource(query.source))?;
    timetable.stop_idx(query.destination).ok_or(QueryError::UnknownDestination(query.destination))?;
    if query.max_transfer < 1 {
        return Err(QueryError::InvalidMaxTransfer(query.max_transfer));
    }
    if query.number_of_criteria != REFERENCE_NUM_CRITERIA {
        return Err(QueryError::InvalidNumberOfCriteria { expected: REFERENCE_NUM_CRITERIA, got: query.number_of_criteria });
    }
    if query.departure_time_sec < 0 {
        return Err(QueryError::NegativeDepartureTime(query.departure_time_sec));
    }
    Ok(())
}

/// Indices into a reference-cost-model criterion vector, re-exported so
/// callers reading a [`LabelStore`] don't need to know `engine`'s layout.
pub const ARRIVAL_INDEX: usize = ARRIVAL;
pub const STOP_COUNT_INDEX: usize = STOP_COUNT;
pub const IVTT_INDEX: usize = IVTT;

/// The sentinel value used for unreachable criterion slots (§6: "any large
/// value exceeding all plausible arrival times").
pub const INFINITE_TIME: u64 = INFINITE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footpath::FootpathGraphBuilder;
    use crate::ids::{RouteId, TripId};
    use crate::timetable::TimetableBuilder;

    fn stop(n: u32) -> StopId {
        StopId(n)
    }

    #[test]
    fn rejects_unknown_source() {
        let mut tb = TimetableBuilder::new([stop(1), stop(2)]);
        tb.add_route(RouteId(1), vec![stop(1), stop(2)], vec![(TripId(1), vec![0, 100])]).unwrap();
        let timetable = tb.build().unwrap();
        let footpaths = FootpathGraph::empty(timetable.num_stops());
        let query = Query::new(stop(99), stop(2), 0, 1);
        let err = run_query(&timetable, &footpaths, &query).unwrap_err();
        assert_eq!(err, QueryError::UnknownSource(stop(99)));
    }

    #[test]
    fn rejects_max_transfer_below_one() {
        let mut tb = TimetableBuilder::new([stop(1), stop(2)]);
        tb.add_route(RouteId(1), vec![stop(1), stop(2)], vec![(TripId(1), vec![0, 100])]).unwrap();
        let timetable = tb.build().unwrap();
        let footpaths = FootpathGraph::empty(timetable.num_stops());
        let query = Query::new(stop(1), stop(2), 0, 0);
        let err = run_query(&timetable, &footpaths, &query).unwrap_err();
        assert_eq!(err, QueryError::InvalidMaxTransfer(0));
    }

    #[test]
    fn single_route_direct_scenario_s1() {
        let mut tb = TimetableBuilder::new([stop(1), stop(2), stop(3)]);
        tb.add_route(RouteId(1), vec![stop(1), stop(2), stop(3)], vec![(TripId(1), vec![100, 200, 300])]).unwrap();
        let timetable = tb.build().unwrap();
        let fb = FootpathGraphBuilder::new(&timetable);
        let footpaths = fb.build();
        let query = Query::new(stop(1), stop(3), 0, 1);
        let store = run_query(&timetable, &footpaths, &query).unwrap();

        let destination = timetable.stop_idx(stop(3)).unwrap();
        let labels = store.get(1, destination).labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].criteria[ARRIVAL_INDEX], 300);
        assert_eq!(labels[0].criteria[STOP_COUNT_INDEX], 3);
        assert_eq!(labels[0].criteria[IVTT_INDEX], 200);
        assert_eq!(labels[0].trip, Some(TripId(1)));
    }

    #[test]
    fn unreachable_scenario_s2() {
        let mut tb = TimetableBuilder::new([stop(1), stop(2), stop(3)]);
        tb.add_route(RouteId(1), vec![stop(1), stop(2), stop(3)], vec![(TripId(1), vec![100, 200, 300])]).unwrap();
        let timetable = tb.build().unwrap();
        let fb = FootpathGraphBuilder::new(&timetable);
        let footpaths = fb.build();
        let query = Query::new(stop(1), stop(3), 400, 1);
        let store = run_query(&timetable, &footpaths, &query).unwrap();
        let destination = timetable.stop_idx(stop(3)).unwrap();
        assert!(store.get(1, destination).is_all_infinite());
        assert!(store.is_destination_unreachable(destination));
    }
}
