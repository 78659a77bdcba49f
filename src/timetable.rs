//! Timetable Model (§4.1): an immutable, indexed view of the transit
//! network. Exposes constant-time lookups for routes, stops and trips. All
//! inputs are validated by [`TimetableBuilder`]; once built, the core
//! assumes well-formed data (§4.1).
//!
//! Internally this is a dense, flattened layout in the spirit of the
//! teacher's `Network` (`route.route_stops_idx`, `route.stop_times_idx`
//! style offsets into shared backing vectors) rather than a graph of boxed
//! nodes, so lookups stay allocation-free on the query hot path.

use std::collections::{HashMap, HashSet};

use crate::error::TimetableError;
use crate::ids::{RouteId, RouteIdx, StopId, StopIdx, TripId, TripOrder};

pub type Timestamp = u64;

struct RouteRecord {
    #[allow(dead_code)] // kept for symmetry with StopRecord / future debugging
    id: RouteId,
    stops_offset: usize,
    num_stops: usize,
    stop_times_offset: usize,
    trip_ids_offset: usize,
    num_trips: usize,
}

impl RouteRecord {
    fn stop_time_index(&self, trip_order: usize, stop_order: usize) -> usize {
        self.stop_times_offset + trip_order * self.num_stops + stop_order
    }
}

struct StopRecord {
    id: StopId,
    routes_offset: usize,
    num_routes: usize,
}

/// An immutable, validated transit timetable.
pub struct Timetable {
    routes: Vec<RouteRecord>,
    stops: Vec<StopRecord>,
    route_stops: Vec<StopIdx>,
    stop_times: Vec<Timestamp>,
    trip_ids: Vec<TripId>,
    stop_routes: Vec<RouteIdx>,
    stop_id_index: HashMap<StopId, StopIdx>,
    route_id_index: HashMap<RouteId, RouteIdx>,
    trip_location: HashMap<TripId, (RouteIdx, TripOrder)>,
    stop_position_in_route: HashMap<(RouteIdx, StopIdx), u32>,
}

impl Timetable {
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn stop_idx(&self, stop: StopId) -> Option<StopIdx> {
        self.stop_id_index.get(&stop).copied()
    }

    /// Reverse of [`Timetable::stop_idx`]: the external id of a dense index.
    pub fn stop_id(&self, idx: StopIdx) -> StopId {
        self.stops[idx as usize].id
    }

    pub fn route_idx(&self, route: RouteId) -> Option<RouteIdx> {
        self.route_id_index.get(&route).copied()
    }

    /// `routes_of_stop(p)`: dense route indices serving stop `p`.
    pub fn routes_of_stop(&self, stop: StopIdx) -> &[RouteIdx] {
        let record = &self.stops[stop as usize];
        &self.stop_routes[record.routes_offset..record.routes_offset + record.num_routes]
    }

    /// `stops_of_route(r)`: the ordered stop sequence of route `r`.
    pub fn stops_of_route(&self, route: RouteIdx) -> &[StopIdx] {
        let record = &self.routes[route as usize];
        &self.route_stops[record.stops_offset..record.stops_offset + record.num_stops]
    }

    /// `trips_of_route(r)`: external trip ids, in non-decreasing start order.
    pub fn trip_id_at(&self, route: RouteIdx, trip_order: TripOrder) -> TripId {
        let record = &self.routes[route as usize];
        self.trip_ids[record.trip_ids_offset + trip_order as usize]
    }

    /// `index_of(r, p)`: position of stop `p` within route `r`.
    pub fn index_of(&self, route: RouteIdx, stop: StopIdx) -> Option<u32> {
        self.stop_position_in_route.get(&(route, stop)).copied()
    }

    /// `arrival(t, p)`: arrival time of trip `t` at stop `p`, seconds.
    ///
    /// Returns `None` if `t` does not serve `p`. §4.1 treats this case as
    /// forbidden by construction within a well-formed route scan; the Round
    /// Engine (`engine.rs`) nonetheless surfaces it as
    /// [`crate::error::QueryError::InconsistentTimetable`] rather than
    /// panicking, per §7.
    pub fn arrival(&self, trip: TripId, stop: StopIdx) -> Option<Timestamp> {
        let &(route, trip_order) = self.trip_location.get(&trip)?;
        let stop_order = self.index_of(route, stop)?;
        let record = &self.routes[route as usize];
        let idx = record.stop_time_index(trip_order as usize, stop_order as usize);
        self.stop_times.get(idx).copied()
    }

    /// `arrival_at_order`: arrival time of the trip at the given stop
    /// *order* within the route (used by the route scan, which walks stops
    /// in route order rather than by external stop id).
    pub fn arrival_at_order(&self, route: RouteIdx, trip_order: TripOrder, stop_order: usize) -> Timestamp {
        let record = &self.routes[route as usize];
        self.stop_times[record.stop_time_index(trip_order as usize, stop_order)]
    }

    /// `latest_trip(r, p, τ)` (§4.4.4): despite the name inherited from the
    /// reference implementation, this returns the *earliest-feasible*
    /// trip — the first trip (in ascending start order) whose arrival at
    /// `p` is `>= tau`. Returns `None` (`NO_TRIP`) if none exists.
    pub fn latest_trip(&self, route: RouteIdx, stop_order: usize, tau: Timestamp) -> Option<TripId> {
        let record = &self.routes[route as usize];
        for trip_order in 0..record.num_trips {
            let arrival = self.arrival_at_order(route, trip_order as TripOrder, stop_order);
            if arrival >= tau {
                return Some(self.trip_ids[record.trip_ids_offset + trip_order]);
            }
        }
        None
    }
}

struct PendingRoute {
    id: RouteId,
    stops: Vec<StopId>,
    trips: Vec<(TripId, Vec<Timestamp>)>,
}

/// Validates and constructs an immutable [`Timetable`].
pub struct TimetableBuilder {
    stop_order: Vec<StopId>,
    stop_id_index: HashMap<StopId, StopIdx>,
    routes: Vec<PendingRoute>,
    seen_routes: HashSet<RouteId>,
}

impl TimetableBuilder {
    pub fn new(stops: impl IntoIterator<Item = StopId>) -> Self {
        let mut stop_order = Vec::new();
        let mut stop_id_index = HashMap::new();
        for stop in stops {
            if !stop_id_index.contains_key(&stop) {
                stop_id_index.insert(stop, stop_order.len() as StopIdx);
                stop_order.push(stop);
            }
        }
        Self { stop_order, stop_id_index, routes: Vec::new(), seen_routes: HashSet::new() }
    }

    /// Adds a route with its ordered stop sequence and its trips (each a
    /// `(trip_id, arrival_seconds_per_stop)` pair). Trips are sorted by
    /// their first-stop arrival time, mirroring the teacher's
    /// `Network::new` ("Sort trips in route based on earliest arrival
    /// time"); callers need not pre-sort.
    pub fn add_route(
        &mut self,
        route_id: RouteId,
        stops: Vec<StopId>,
        trips: Vec<(TripId, Vec<i64>)>,
    ) -> Result<&mut Self, TimetableError> {
        if !self.seen_routes.insert(route_id) {
            return Err(TimetableError::DuplicateRoute(route_id));
        }
        if stops.is_empty() {
            return Err(TimetableError::EmptyRoute(route_id));
        }

        let mut seen_stops = HashSet::with_capacity(stops.len());
        for &stop in &stops {
            if !self.stop_id_index.contains_key(&stop) {
                return Err(TimetableError::UnknownStop(route_id, stop));
            }
            if !seen_stops.insert(stop) {
                return Err(TimetableError::DuplicateStopInRoute(route_id, stop));
            }
        }

        let mut validated_trips = Vec::with_capacity(trips.len());
        for (trip_id, arrivals) in trips {
            if arrivals.len() != stops.len() {
                return Err(TimetableError::StopTripMismatch {
                    route: route_id,
                    trip: trip_id,
                    expected: stops.len(),
                    got: arrivals.len(),
                });
            }
            let mut checked = Vec::with_capacity(arrivals.len());
            for (position, seconds) in arrivals.into_iter().enumerate() {
                if seconds < 0 {
                    return Err(TimetableError::NegativeArrival { route: route_id, trip: trip_id, position, seconds });
                }
                checked.push(seconds as Timestamp);
            }
            validated_trips.push((trip_id, checked));
        }
        validated_trips.sort_by_key(|(_, arrivals)| arrivals[0]);

        self.routes.push(PendingRoute { id: route_id, stops, trips: validated_trips });
        Ok(self)
    }

    pub fn build(self) -> Result<Timetable, TimetableError> {
        let num_stops = self.stop_order.len();
        let mut stop_routes_map: Vec<Vec<RouteIdx>> = vec![Vec::new(); num_stops];

        let mut routes = Vec::with_capacity(self.routes.len());
        let mut route_stops = Vec::new();
        let mut stop_times = Vec::new();
        let mut trip_ids = Vec::new();
        let mut route_id_index = HashMap::with_capacity(self.routes.len());
        let mut trip_location = HashMap::new();
        let mut stop_position_in_route = HashMap::new();

        for (route_idx, pending) in self.routes.into_iter().enumerate() {
            let route_idx = route_idx as RouteIdx;
            route_id_index.insert(pending.id, route_idx);

            let stops_offset = route_stops.len();
            for (order, &stop) in pending.stops.iter().enumerate() {
                let stop_idx = self.stop_id_index[&stop];
                route_stops.push(stop_idx);
                stop_position_in_route.insert((route_idx, stop_idx), order as u32);
                stop_routes_map[stop_idx as usize].push(route_idx);
            }

            let stop_times_offset = stop_times.len();
            let trip_ids_offset = trip_ids.len();
            for (trip_order, (trip_id, arrivals)) in pending.trips.iter().enumerate() {
                trip_location.insert(*trip_id, (route_idx, trip_order as TripOrder));
                trip_ids.push(*trip_id);
                stop_times.extend_from_slice(arrivals);
            }

            routes.push(RouteRecord {
                id: pending.id,
                stops_offset,
                num_stops: pending.stops.len(),
                stop_times_offset,
                trip_ids_offset,
                num_trips: pending.trips.len(),
            });
        }

        let mut stop_routes = Vec::new();
        let mut stops = Vec::with_capacity(num_stops);
        for (stop_idx, &stop_id) in self.stop_order.iter().enumerate() {
            let routes_offset = stop_routes.len();
            let routes_for_stop = &stop_routes_map[stop_idx];
            stop_routes.extend_from_slice(routes_for_stop);
            stops.push(StopRecord { id: stop_id, routes_offset, num_routes: routes_for_stop.len() });
        }

        Ok(Timetable {
            routes,
            stops,
            route_stops,
            stop_times,
            trip_ids,
            stop_routes,
            stop_id_index: self.stop_id_index,
            route_id_index,
            trip_location,
            stop_position_in_route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(n: u32) -> StopId {
        StopId(n)
    }
    fn route(n: u32) -> RouteId {
        RouteId(n)
    }
    fn trip(n: u32) -> TripId {
        TripId(n)
    }

    #[test]
    fn builds_simple_route() {
        let mut builder = TimetableBuilder::new([stop(1), stop(2), stop(3)]);
        builder.add_route(route(1), vec![stop(1), stop(2), stop(3)], vec![(trip(1), vec![100, 200, 300])]).unwrap();
        let timetable = builder.build().unwrap();

        let r = timetable.route_idx(route(1)).unwrap();
        assert_eq!(timetable.stops_of_route(r).len(), 3);
        let p3 = timetable.stop_idx(stop(3)).unwrap();
        assert_eq!(timetable.arrival(trip(1), p3), Some(300));
    }

    #[test]
    fn rejects_duplicate_stop_in_route() {
        let mut builder = TimetableBuilder::new([stop(1), stop(2)]);
        let err = builder.add_route(route(1), vec![stop(1), stop(1)], vec![]).unwrap_err();
        assert_eq!(err, TimetableError::DuplicateStopInRoute(route(1), stop(1)));
    }

    #[test]
    fn rejects_negative_arrival() {
        let mut builder = TimetableBuilder::new([stop(1), stop(2)]);
        let err = builder.add_route(route(1), vec![stop(1), stop(2)], vec![(trip(1), vec![0, -5])]).unwrap_err();
        assert_eq!(err, TimetableError::NegativeArrival { route: route(1), trip: trip(1), position: 1, seconds: -5 });
    }

    #[test]
    fn sorts_trips_by_start_time() {
        let mut builder = TimetableBuilder::new([stop(1), stop(2)]);
        builder
            .add_route(
                route(1),
                vec![stop(1), stop(2)],
                vec![(trip(2), vec![50, 150]), (trip(1), vec![0, 100])],
            )
            .unwrap();
        let timetable = builder.build().unwrap();
        let r = timetable.route_idx(route(1)).unwrap();
        assert_eq!(timetable.trip_id_at(r, 0), trip(1));
        assert_eq!(timetable.trip_id_at(r, 1), trip(2));
    }

    #[test]
    fn latest_trip_is_earliest_feasible() {
        let mut builder = TimetableBuilder::new([stop(1), stop(2)]);
        builder
            .add_route(
                route(1),
                vec![stop(1), stop(2)],
                vec![(trip(1), vec![0, 100]), (trip(2), vec![50, 150])],
            )
            .unwrap();
        let timetable = builder.build().unwrap();
        let r = timetable.route_idx(route(1)).unwrap();
        assert_eq!(timetable.latest_trip(r, 0, 10), Some(trip(2)));
        assert_eq!(timetable.latest_trip(r, 0, 51), None);
    }
}
