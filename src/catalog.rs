//! Normalized snapshot of one timetable feed.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::MalformedFlight;
use crate::feed_xml::RawFeedPayload;
use crate::leg::{Leg, LegSequence, RawLegs, text_field};

/// Root element of the timetable document
pub const FEED_ROOT_KEY: &str = "FLIGHT_TYPE";
/// Repeated flight element under the root
pub const FEED_FLIGHT_KEY: &str = "FLIGHT";

/// One flight with its legs in feed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightRecord {
    pub carrier: String,
    pub flight_no: String,
    pub legs: LegSequence,
}

impl FlightRecord {
    /// Normalize one raw `FLIGHT` node
    pub fn from_raw(raw: &Value) -> Result<Self, MalformedFlight> {
        if !raw.is_object() {
            return Err(MalformedFlight::NotAnObject);
        }

        let flight_no = text_field(raw, "FLIGHT_NO");
        let legs = LegSequence::from_raw(RawLegs::from_value(raw.get("LEG")), &flight_no)?;

        Ok(Self {
            carrier: text_field(raw, "CARRIER"),
            flight_no,
            legs,
        })
    }

    pub fn first_leg(&self) -> &Leg {
        self.legs.first()
    }

    pub fn last_leg(&self) -> &Leg {
        self.legs.last()
    }
}

/// Immutable, ordered set of flights built from one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightCatalog {
    flights: Vec<FlightRecord>,
    skipped: usize,
}

impl FlightCatalog {
    /// Build a catalog from a decoded feed.
    ///
    /// Best effort: entries without legs are dropped. Feed sources reject bodies
    /// with a foreign root (see `feed_xml::decode_timetable`), so a payload that
    /// still lacks the flight list here is built as an empty catalog.
    pub fn build(raw_feed: &RawFeedPayload) -> Self {
        let entries: &[Value] = match raw_feed
            .get(FEED_ROOT_KEY)
            .and_then(|root| root.get(FEED_FLIGHT_KEY))
        {
            Some(Value::Array(items)) => items,
            Some(single @ Value::Object(_)) => std::slice::from_ref(single),
            Some(Value::Null) => &[],
            Some(other) => {
                warn!("Unexpected {} node in feed: {}", FEED_FLIGHT_KEY, other);
                &[]
            }
            None => {
                warn!(
                    "Feed has no {}.{} list, treating it as empty",
                    FEED_ROOT_KEY, FEED_FLIGHT_KEY
                );
                &[]
            }
        };

        let mut flights = Vec::with_capacity(entries.len());
        let mut skipped = 0;

        for entry in entries {
            match FlightRecord::from_raw(entry) {
                Ok(record) => flights.push(record),
                Err(e) => {
                    debug!("Dropping feed entry: {}", e);
                    skipped += 1;
                }
            }
        }

        info!(
            "Built flight catalog: {} flights ({} malformed entries dropped)",
            flights.len(),
            skipped
        );

        Self { flights, skipped }
    }

    pub fn flights(&self) -> &[FlightRecord] {
        &self.flights
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightRecord> {
        self.flights.iter()
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Number of feed entries dropped as malformed
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<'a> IntoIterator for &'a FlightCatalog {
    type Item = &'a FlightRecord;
    type IntoIter = std::slice::Iter<'a, FlightRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.flights.iter()
    }
}
