//! flightboard - arrivals, departures and flight lookup for a hub airport
//!
//! This library turns the loosely-structured timetable feed into an ordered
//! catalog of flights and answers three queries against it: lookup by flight
//! number, upcoming arrivals and upcoming departures.

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed_cache;
pub mod feed_source;
pub mod feed_xml;
pub mod leg;
pub mod log_format;
pub mod query;
pub mod render;
pub mod timestamp;

pub use board::FlightBoard;
pub use catalog::{FlightCatalog, FlightRecord};
pub use error::{FetchError, MalformedFlight};
pub use feed_source::{FeedSource, FileFeedSource, HttpFeedSource};
pub use leg::{Leg, LegTimes};
pub use query::{BoardEntry, Direction, lookup, upcoming_arrivals, upcoming_departures};
