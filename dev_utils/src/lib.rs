use mcraptor::ids::{RouteId, StopId, TripId};
use mcraptor::{FootpathGraph, FootpathGraphBuilder, Query, Timetable, TimetableBuilder};

// Synthetic scenario generation for the examples and benchmarks. Mirrors a
// grid of routes feeding a shared trunk, which is enough structure to
// exercise transfers, footpaths and Pareto-incomparable alternatives
// without depending on any real feed.

pub fn get_example_seed() -> u64 {
    7
}

pub fn get_example_transfer_time() -> i64 {
    3 * 60
}

pub fn get_example_start_time() -> i64 {
    8 * 3600 + 30 * 60
}

/// Builds `num_routes` independent routes of `stops_per_route` stops each,
/// plus a footpath from every route's last stop into a shared interchange
/// stop, so reaching the interchange always costs at least one transfer.
pub fn build_example_timetable(num_routes: u32, stops_per_route: u32, trips_per_route: u32) -> (Timetable, FootpathGraph, StopId, StopId) {
    fastrand::seed(get_example_seed());

    let interchange = StopId((num_routes * stops_per_route) + 1);
    let mut all_stops: Vec<StopId> = (1..=num_routes * stops_per_route).map(StopId).collect();
    all_stops.push(interchange);

    let mut builder = TimetableBuilder::new(all_stops);

    for r in 0..num_routes {
        let stops: Vec<StopId> = (0..stops_per_route).map(|i| StopId(r * stops_per_route + 1 + i)).collect();

        let mut trips = Vec::with_capacity(trips_per_route as usize);
        for t in 0..trips_per_route {
            let departure = (t * 600) as i64;
            let mut arrivals = Vec::with_capacity(stops.len());
            let mut clock = departure;
            for i in 0..stops.len() {
                if i > 0 {
                    clock += 60 + fastrand::i64(0..120);
                }
                arrivals.push(clock);
            }
            trips.push((TripId(r * trips_per_route + t + 1), arrivals));
        }

        builder.add_route(RouteId(r + 1), stops, trips).expect("synthetic route is well-formed");
    }

    let timetable = builder.build().expect("synthetic timetable is well-formed");

    let mut footpath_builder = FootpathGraphBuilder::new(&timetable);
    for r in 0..num_routes {
        let last_stop_of_route = StopId(r * stops_per_route + stops_per_route);
        footpath_builder.add_footpath(last_stop_of_route, interchange, get_example_transfer_time()).expect("synthetic footpath is well-formed");
    }
    let footpaths = footpath_builder.build();

    let source = StopId(1);
    (timetable, footpaths, source, interchange)
}

pub fn get_example_query(source: StopId, destination: StopId) -> Query {
    Query::new(source, destination, get_example_start_time(), 5)
}
