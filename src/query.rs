//! Lookup and arrival/departure boards over a `FlightCatalog`.
//!
//! Every function here is pure: the catalog and the reference `now` are passed in.
//! Boards filter on planned UTC (falling back to estimated UTC) but order by the
//! *local* estimate, matching how the timetable has always been presented.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{FlightCatalog, FlightRecord};
use crate::leg::{Leg, LegTimes};

/// Home airport the boards are relative to
pub const HUB_CODE: &str = "TAS";

/// Maximum number of rows on a board
pub const BOARD_LIMIT: usize = 5;

/// Which board to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Arrivals,
    Departures,
}

impl Direction {
    /// Leg that represents the flight on this board
    fn select_leg(self, flight: &FlightRecord) -> &Leg {
        match self {
            Direction::Arrivals => flight.last_leg(),
            Direction::Departures => flight.first_leg(),
        }
    }

    /// Airport code that must equal the hub
    fn hub_side(self, leg: &Leg) -> &str {
        match self {
            Direction::Arrivals => &leg.destination_iata,
            Direction::Departures => &leg.origin_iata,
        }
    }

    /// Time columns relevant to this board
    pub fn times(self, leg: &Leg) -> &LegTimes {
        match self {
            Direction::Arrivals => &leg.arrival,
            Direction::Departures => &leg.departure,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Arrivals => write!(f, "arrivals"),
            Direction::Departures => write!(f, "departures"),
        }
    }
}

/// Board parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    pub hub: String,
    pub limit: usize,
}

impl Default for BoardQuery {
    fn default() -> Self {
        Self {
            hub: HUB_CODE.to_string(),
            limit: BOARD_LIMIT,
        }
    }
}

/// One board row: the flight and the leg that put it on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub flight: FlightRecord,
    pub leg: Leg,
}

/// First flight in feed order whose number matches exactly
pub fn lookup<'a>(catalog: &'a FlightCatalog, flight_no: &str) -> Option<&'a FlightRecord> {
    catalog.iter().find(|flight| flight.flight_no == flight_no)
}

/// Up to five flights landing at the hub at or after `now`
pub fn upcoming_arrivals(catalog: &FlightCatalog, now: DateTime<Utc>) -> Vec<BoardEntry> {
    upcoming(catalog, Direction::Arrivals, now, &BoardQuery::default())
}

/// Up to five flights leaving the hub at or after `now`
pub fn upcoming_departures(catalog: &FlightCatalog, now: DateTime<Utc>) -> Vec<BoardEntry> {
    upcoming(catalog, Direction::Departures, now, &BoardQuery::default())
}

/// Shared board implementation.
///
/// The sort is stable, so rows with equal (or missing) local estimates keep the
/// catalog's feed order.
pub fn upcoming(
    catalog: &FlightCatalog,
    direction: Direction,
    now: DateTime<Utc>,
    query: &BoardQuery,
) -> Vec<BoardEntry> {
    let mut rows: Vec<(&FlightRecord, &Leg)> = catalog
        .iter()
        .map(|flight| (flight, direction.select_leg(flight)))
        .filter(|(_, leg)| direction.hub_side(leg) == query.hub)
        .filter(|(_, leg)| {
            direction
                .times(leg)
                .comparison_instant()
                .is_some_and(|instant| instant >= now)
        })
        .collect();

    rows.sort_by_key(|(_, leg)| direction.times(leg).sort_key());
    rows.truncate(query.limit);

    rows.into_iter()
        .map(|(flight, leg)| BoardEntry {
            flight: flight.clone(),
            leg: leg.clone(),
        })
        .collect()
}
