//! Opaque external identifiers for stops, routes and trips.
//!
//! These wrap the caller-supplied integers from §6 of the network's external
//! interface. Keeping them as distinct newtypes (rather than bare `u32`s)
//! means a stop id can never be passed where a route id is expected.

use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u32);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }
    };
}

id_type!(StopId);
id_type!(RouteId);
id_type!(TripId);

/// Dense, zero-based position of a stop inside the timetable's internal
/// tables. Not exposed to callers; `StopId` is the public identifier.
pub(crate) type StopIdx = u32;
pub(crate) type RouteIdx = u32;

/// Position of a trip within its route's ascending start-time order.
pub(crate) type TripOrder = u32;
