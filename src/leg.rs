//! Flight legs and leg selection.
//!
//! The feed collapses a one-leg flight to a bare `LEG` object and a multi-leg flight
//! to an array of them. `RawLegs` captures that shape once; everything downstream
//! works on a `LegSequence`, which is never empty.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::MalformedFlight;
use crate::timestamp;

/// Planned / estimated / actual times for one direction of a leg
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegTimes {
    pub planned_local: Option<DateTime<Utc>>,
    pub planned_utc: Option<DateTime<Utc>>,
    pub estimated_local: Option<DateTime<Utc>>,
    pub estimated_utc: Option<DateTime<Utc>>,
    pub actual_local: Option<DateTime<Utc>>,
    pub actual_utc: Option<DateTime<Utc>>,
}

impl LegTimes {
    /// Read the six time columns sharing a prefix (`DEPARTURE` or `ARRIVAL`)
    fn from_raw(raw: &Value, prefix: &str) -> Self {
        let column = |kind: &str, zone: &str| {
            timestamp::parse_value(raw.get(format!("{}_{}_{}", prefix, kind, zone)))
        };

        Self {
            planned_local: column("PLAN", "LOCAL"),
            planned_utc: column("PLAN", "UTC"),
            estimated_local: column("EST", "LOCAL"),
            estimated_utc: column("EST", "UTC"),
            actual_local: column("FACT", "LOCAL"),
            actual_utc: column("FACT", "UTC"),
        }
    }

    /// Instant that decides whether the leg is still upcoming
    pub fn comparison_instant(&self) -> Option<DateTime<Utc>> {
        self.planned_utc.or(self.estimated_utc)
    }

    /// Ordering key for boards; legs without a local estimate sort last
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.estimated_local.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// One directional flight segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leg {
    pub origin_iata: String,
    pub destination_iata: String,
    pub origin_name: String,
    pub destination_name: String,
    pub departure: LegTimes,
    pub arrival: LegTimes,
    pub status: String,
    pub aircraft_type: String,
    pub aircraft_tail: String,
}

/// Text field of a raw node; anything but a string reads as empty
pub(crate) fn text_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

impl Leg {
    /// Best-effort extraction of a leg from its raw node. Never fails.
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            origin_iata: text_field(raw, "ORIGIN_IATA"),
            destination_iata: text_field(raw, "DESTINATION_IATA"),
            origin_name: text_field(raw, "ORIGIN_NAME_TR"),
            destination_name: text_field(raw, "DESTINATION_NAME_TR"),
            departure: LegTimes::from_raw(raw, "DEPARTURE"),
            arrival: LegTimes::from_raw(raw, "ARRIVAL"),
            status: text_field(raw, "STATUS"),
            aircraft_type: text_field(raw, "NAME_TYP"),
            aircraft_tail: text_field(raw, "BORT"),
        }
    }
}

/// Shape of the `LEG` value as it arrives from the feed
#[derive(Debug, Clone, Copy)]
pub enum RawLegs<'a> {
    Single(&'a Value),
    Sequence(&'a [Value]),
    Missing,
}

impl<'a> RawLegs<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Array(items)) => RawLegs::Sequence(items),
            Some(single @ Value::Object(_)) => RawLegs::Single(single),
            _ => RawLegs::Missing,
        }
    }
}

/// Ordered, non-empty legs of a flight (index 0 is the first segment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LegSequence(Vec<Leg>);

impl LegSequence {
    /// Normalize either feed shape. Non-object array entries are skipped; if
    /// nothing usable remains the flight is malformed.
    pub fn from_raw(raw: RawLegs<'_>, flight_no: &str) -> Result<Self, MalformedFlight> {
        let legs: Vec<Leg> = match raw {
            RawLegs::Single(value) => vec![Leg::from_raw(value)],
            RawLegs::Sequence(values) => values
                .iter()
                .filter(|v| v.is_object())
                .map(Leg::from_raw)
                .collect(),
            RawLegs::Missing => Vec::new(),
        };

        Self::new(legs).ok_or_else(|| MalformedFlight::NoLegs {
            flight_no: flight_no.to_string(),
        })
    }

    /// Wrap already-built legs; `None` when empty
    pub fn new(legs: Vec<Leg>) -> Option<Self> {
        if legs.is_empty() { None } else { Some(Self(legs)) }
    }

    /// Departure reference
    pub fn first(&self) -> &Leg {
        &self.0[0]
    }

    /// Arrival reference
    pub fn last(&self) -> &Leg {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Leg> {
        self.0.iter()
    }
}

/// First leg of a raw `LEG` value
pub fn first_leg(raw: &Value) -> Result<Leg, MalformedFlight> {
    LegSequence::from_raw(RawLegs::from_value(Some(raw)), "").map(|legs| legs.first().clone())
}

/// Last leg of a raw `LEG` value
pub fn last_leg(raw: &Value) -> Result<Leg, MalformedFlight> {
    LegSequence::from_raw(RawLegs::from_value(Some(raw)), "").map(|legs| legs.last().clone())
}
