pub mod ids;

pub mod error;

pub mod label;

pub mod timetable;

pub use timetable::{Timetable, TimetableBuilder};

pub mod footpath;

pub use footpath::{FootpathGraph, FootpathGraphBuilder};

mod frontier;

pub mod store;

pub use store::LabelStore;

mod engine;

pub mod query;

pub use query::{run_query, Query};
