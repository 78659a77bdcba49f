//! Round Engine (§4.4): orchestrates one round of the McRAPTOR loop —
//! collapse marked stops into route-entry points, scan each selected route
//! forward extending a running per-route bag, then relax footpaths from
//! newly improved stops.
//!
//! The reference cost model fixes three named criterion slots: arrival
//! time, stop count, in-vehicle travel time (§3). The generic Pareto
//! algebra in `label.rs` has no knowledge of these names; only this module
//! does.

use log::{debug, trace, warn};

use crate::error::QueryError;
use crate::footpath::FootpathGraph;
use crate::frontier::StarFrontier;
use crate::ids::{RouteIdx, StopIdx};
use crate::label::{Bag, Label};
use crate::store::LabelStore;
use crate::timetable::Timetable;

/// Index of the arrival-time criterion in the reference cost model.
pub const ARRIVAL: usize = 0;
/// Index of the stop-count criterion in the reference cost model.
pub const STOP_COUNT: usize = 1;
/// Index of the in-vehicle-travel-time criterion in the reference cost model.
pub const IVTT: usize = 2;

/// Soft threshold past which a stop's bag is logged as unusually large.
/// §5 deliberately performs no capping; this is diagnostic only.
const BAG_WARN_THRESHOLD: usize = 32;

/// Runs round `k` (§4.4.2). `marked` is drained of round `k-1`'s
/// improvements on entry and left holding round `k`'s improvements on exit.
/// Returns `false` when nothing was marked, signalling the caller to
/// terminate early (§4.4.2 Step D).
pub(crate) fn run_round(
    timetable: &Timetable,
    footpaths: &FootpathGraph,
    store: &mut LabelStore,
    frontier: &mut StarFrontier,
    marked: &mut [bool],
    k: usize,
    destination: StopIdx,
) -> Result<bool, QueryError> {
    let route_entry = collect_marked_routes(timetable, marked);
    debug!("round {k}: {} routes selected from the marked set", route_entry.len());

    for (route, entry_order) in route_entry {
        scan_route(timetable, store, frontier, marked, k, route, entry_order, destination)?;
    }

    relax_footpaths(timetable, footpaths, store, frontier, marked, k);

    let progressed = marked.iter().any(|&m| m);
    debug!("round {k} complete: progressed={progressed}");
    Ok(progressed)
}

/// Step A: `Q: route -> earliest_marked_stop_on_route`, then drain the
/// marked set. Iterates stops in ascending index order for a deterministic
/// result independent of insertion order (§5).
fn collect_marked_routes(timetable: &Timetable, marked: &mut [bool]) -> Vec<(RouteIdx, usize)> {
    let mut route_entry: Vec<Option<usize>> = vec![None; timetable.num_routes()];

    for stop in 0..marked.len() as StopIdx {
        if !marked[stop as usize] {
            continue;
        }
        for &route in timetable.routes_of_stop(stop) {
            let order = timetable.index_of(route, stop).expect("route_of_stop implies index_of is defined") as usize;
            match route_entry[route as usize] {
                None => route_entry[route as usize] = Some(order),
                Some(existing) if order < existing => route_entry[route as usize] = Some(order),
                _ => {}
            }
        }
    }

    marked.iter_mut().for_each(|m| *m = false);

    route_entry.into_iter().enumerate().filter_map(|(r, order)| order.map(|o| (r as RouteIdx, o))).collect()
}

/// Step B: traverse `route` forward from `entry_order`, extending the
/// running per-route bag `Br` and merging improvements into stop bags.
fn scan_route(
    timetable: &Timetable,
    store: &mut LabelStore,
    frontier: &mut StarFrontier,
    marked: &mut [bool],
    k: usize,
    route: RouteIdx,
    entry_order: usize,
    destination: StopIdx,
) -> Result<(), QueryError> {
    let stops = timetable.stops_of_route(route).to_vec();
    let mut br: Vec<Label> = Vec::new();
    trace!("round {k}: scanning route {route:?} from order {entry_order}");

    for i in entry_order..stops.len() {
        let stop = stops[i];

        // Step B.1 — advance. A label cannot reach the first stop it's
        // scanned from without a predecessor, so the entry stop is skipped.
        if i > entry_order {
            let prev_stop = stops[i - 1];
            for label in br.iter_mut() {
                let trip = label.trip.expect("label in Br must carry a trip before advancing (I4)");
                let new_arrival = timetable
                    .arrival(trip, stop)
                    .ok_or_else(|| QueryError::InconsistentTimetable { trip, stop: stop_id_of(timetable, stop) })?;
                let prev_arrival = timetable
                    .arrival(trip, prev_stop)
                    .ok_or_else(|| QueryError::InconsistentTimetable { trip, stop: stop_id_of(timetable, prev_stop) })?;
                label.criteria[ARRIVAL] = new_arrival;
                label.criteria[STOP_COUNT] += 1;
                label.criteria[IVTT] += new_arrival - prev_arrival;
            }
        }

        // Step B.2 — prune against the stop's and destination's frontiers.
        // Sequential: each survivor immediately updates StarFrontier[stop],
        // so later labels in the same Br are checked against it too.
        let mut br_new: Vec<Label> = Vec::new();
        for label in &br {
            if frontier.is_non_dominated(stop, &label.criteria) && frontier.is_non_dominated(destination, &label.criteria) {
                br_new.push(label.clone());
                frontier.install(stop, label.clone());
            }
        }

        // Step B.3 — install into the stop's bag for this round.
        let incoming = Bag::from_filtered(br_new);
        let existing = store.get(k, stop).clone();
        let (merged, newly) = Bag::merge(&existing, &incoming);
        let has_new = !newly.is_empty();
        if merged.len() > BAG_WARN_THRESHOLD {
            warn!(
                "stop {:?} bag has grown to {} pareto-optimal labels in round {k}; criteria may be weakly correlated",
                stop_id_of(timetable, stop),
                merged.len()
            );
        }
        store.set(k, stop, merged);
        if has_new {
            marked[stop as usize] = true;
        }

        // Step B.4 — board from the previous round; a label cannot both
        // alight and re-board at the same stop within one round.
        let br_bag = Bag::from_filtered(br);
        let prior = store.get(k - 1, stop);
        let (br_merged, newly_in_br) = Bag::merge(&br_bag, prior);

        let mut next_br = Vec::with_capacity(br_merged.len());
        for label in br_merged.labels() {
            let is_new = newly_in_br.labels().iter().any(|n| n.criteria == label.criteria);
            if is_new {
                let tau = label.criteria[ARRIVAL];
                if let Some(trip) = timetable.latest_trip(route, i, tau) {
                    next_br.push(Label::new(label.criteria.clone(), Some(trip)));
                }
                // else: NO_TRIP, the label is dropped per §4.4.2 Step B.4.
            } else {
                next_br.push(label.clone());
            }
        }
        br = next_br;
    }

    Ok(())
}

/// Step C: relax footpaths from stops marked during this round (by the
/// route scan, or carried over from initialization). The snapshot is taken
/// once so relaxations don't cascade within the same round.
fn relax_footpaths(timetable: &Timetable, footpaths: &FootpathGraph, store: &mut LabelStore, frontier: &mut StarFrontier, marked: &mut [bool], k: usize) {
    let snapshot: Vec<StopIdx> = (0..marked.len() as StopIdx).filter(|&s| marked[s as usize]).collect();
    trace!("round {k}: relaxing footpaths from {} marked stops", snapshot.len());

    for p in snapshot {
        for &(q, walk_seconds) in footpaths.neighbors(p) {
            let temp: Vec<Label> = store
                .get(k, p)
                .labels()
                .iter()
                .map(|label| {
                    let mut criteria = label.criteria.clone();
                    criteria[ARRIVAL] += walk_seconds;
                    criteria[STOP_COUNT] += 1;
                    Label::new(criteria, label.trip)
                })
                .collect();

            let temp_bag = Bag::from_filtered(temp.clone());
            let existing = store.get(k, q).clone();
            let (merged, newly) = Bag::merge(&existing, &temp_bag);
            if merged.len() > BAG_WARN_THRESHOLD {
                warn!(
                    "stop {:?} bag has grown to {} pareto-optimal labels in round {k} after a footpath relaxation",
                    stop_id_of(timetable, q),
                    merged.len()
                );
            }
            store.set(k, q, merged);
            frontier.install_all(q, &temp);
            if !newly.is_empty() {
                marked[q as usize] = true;
            }
        }
    }
}

fn stop_id_of(timetable: &Timetable, stop: StopIdx) -> crate::ids::StopId {
    timetable.stop_id(stop)
}
