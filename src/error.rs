//! Error surface for the crate, one small enum per failure domain, in the
//! style of the teacher's `JourneyError` (`journey.rs`).

use crate::ids::{RouteId, StopId, TripId};

/// Raised while validating a [`crate::timetable::TimetableBuilder`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    #[error("route {0:?} contains stop {1:?} more than once")]
    DuplicateStopInRoute(RouteId, StopId),

    #[error("route {0:?} references stop {1:?} which was never declared")]
    UnknownStop(RouteId, StopId),

    #[error("trip {trip:?} on route {route:?} provides {got} arrival times but the route has {expected} stops")]
    StopTripMismatch { route: RouteId, trip: TripId, expected: usize, got: usize },

    #[error("trip {trip:?} on route {route:?} has a negative arrival time ({seconds}) at stop position {position}")]
    NegativeArrival { route: RouteId, trip: TripId, position: usize, seconds: i64 },

    #[error("route {0:?} was declared more than once")]
    DuplicateRoute(RouteId),

    #[error("route {0:?} has no stops")]
    EmptyRoute(RouteId),
}

/// Raised while validating a [`crate::footpath::FootpathGraphBuilder`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FootpathError {
    #[error("footpath from {0:?} has a negative walk duration ({1} seconds)")]
    NegativeDuration(StopId, i64),

    #[error("footpath from {0:?} to itself is not allowed")]
    SelfLoop(StopId),

    #[error("footpath references stop {0:?} which is not in the timetable")]
    UnknownStop(StopId),
}

/// Raised by the Query Driver. Corresponds to §7's `InvalidInput` and
/// `InconsistentTimetable` error kinds. `UnreachableDestination` is
/// deliberately absent: per §7 it is ordinary output, not a failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("source stop {0:?} is not part of the timetable")]
    UnknownSource(StopId),

    #[error("destination stop {0:?} is not part of the timetable")]
    UnknownDestination(StopId),

    #[error("max_transfer must be at least 1, got {0}")]
    InvalidMaxTransfer(usize),

    #[error("number_of_criteria must be exactly {expected}, got {got}")]
    InvalidNumberOfCriteria { expected: usize, got: usize },

    #[error("negative departure_time_sec: {0}")]
    NegativeDepartureTime(i64),

    #[error("trip {trip:?} does not serve stop {stop:?}, but the round engine reached it there")]
    InconsistentTimetable { trip: TripId, stop: StopId },
}
