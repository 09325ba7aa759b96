mod common;
pub use self::common::*;
mod error;
pub use self::error::*;
pub mod graph;
pub use self::graph::{Airport, AirportId, RankedAirport, Route, RouteGraph, RouteId};
pub mod ingest;

pub mod page_rank;
