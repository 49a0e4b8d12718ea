//! Shared fixtures for timetable integration tests
//!
//! `tests/data/timetable.xml` is a trimmed real-shape timetable. With the reference
//! time `REFERENCE_TIME` it yields three departures (53, 305, 771) and three
//! arrivals (54, 306, 772); the other entries are past, off-hub, untimed or legless.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use flightboard::timestamp;
use std::path::PathBuf;

pub const REFERENCE_TIME: &str = "08.11.2025 12:00";

pub fn reference_time() -> DateTime<Utc> {
    timestamp::parse(REFERENCE_TIME).expect("reference time is in feed format")
}

pub fn timetable_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("timetable.xml")
}

/// One `<FLIGHT>` element with a single arrival leg
pub fn arrival_xml(flight_no: &str, destination: &str, plan_utc: &str, est_local: &str) -> String {
    format!(
        "<FLIGHT><CARRIER>HY</CARRIER><FLIGHT_NO>{flight_no}</FLIGHT_NO><LEG>\
         <ORIGIN_IATA>DME</ORIGIN_IATA><DESTINATION_IATA>{destination}</DESTINATION_IATA>\
         <ARRIVAL_PLAN_UTC>{plan_utc}</ARRIVAL_PLAN_UTC>\
         <ARRIVAL_EST_LOCAL>{est_local}</ARRIVAL_EST_LOCAL>\
         </LEG></FLIGHT>"
    )
}

/// Wrap flight elements in the timetable root
pub fn timetable_xml(flights: &[String]) -> String {
    format!("<FLIGHT_TYPE>{}</FLIGHT_TYPE>", flights.concat())
}
