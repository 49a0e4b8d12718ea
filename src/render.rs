//! Plain-text rendering of lookups and boards.
//!
//! The language is always an explicit argument; nothing here keeps per-user state.

use serde::{Deserialize, Serialize};

use crate::catalog::FlightRecord;
use crate::leg::{Leg, LegTimes};
use crate::query::{BoardEntry, Direction};
use crate::timestamp;

/// Shown where a timestamp is absent or was malformed
const MISSING: &str = "—";

/// Label bundle language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Ru,
    Uz,
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ru" => Ok(Lang::Ru),
            "uz" => Ok(Lang::Uz),
            other => Err(format!("unsupported language '{}' (expected en, ru or uz)", other)),
        }
    }
}

/// Every user-facing label in one language
#[derive(Debug)]
pub struct Labels {
    pub flight_not_found: &'static str,
    pub upcoming_arrivals: &'static str,
    pub upcoming_departures: &'static str,
    pub no_arrivals: &'static str,
    pub no_departures: &'static str,
    pub planned: &'static str,
    pub estimated: &'static str,
    pub actual: &'static str,
    pub status: &'static str,
    pub aircraft: &'static str,
    pub feed_unavailable: &'static str,
}

static EN: Labels = Labels {
    flight_not_found: "Flight {flight_no} not found.",
    upcoming_arrivals: "Upcoming Arrivals to {hub}",
    upcoming_departures: "Upcoming Departures from {hub}",
    no_arrivals: "No arrivals found.",
    no_departures: "No departures found.",
    planned: "Planned",
    estimated: "Est",
    actual: "Actual",
    status: "Status",
    aircraft: "Aircraft",
    feed_unavailable: "Flight data is unavailable right now.",
};

static RU: Labels = Labels {
    flight_not_found: "Рейс {flight_no} не найден.",
    upcoming_arrivals: "Прилёты в {hub}",
    upcoming_departures: "Вылеты из {hub}",
    no_arrivals: "Прилётов нет.",
    no_departures: "Вылетов нет.",
    planned: "План",
    estimated: "Ожид.",
    actual: "Факт",
    status: "Статус",
    aircraft: "ВС",
    feed_unavailable: "Данные о рейсах сейчас недоступны.",
};

static UZ: Labels = Labels {
    flight_not_found: "Parvoz {flight_no} topilmadi.",
    upcoming_arrivals: "{hub} ga keladigan reyslar",
    upcoming_departures: "{hub} dan uchadigan reyslar",
    no_arrivals: "Keladigan reys yo‘q.",
    no_departures: "Uchadigan reys yo‘q.",
    planned: "Reja",
    estimated: "Taxmin",
    actual: "Haqiqiy",
    status: "Holati",
    aircraft: "Samolyot",
    feed_unavailable: "Parvoz ma'lumotlari hozircha mavjud emas.",
};

impl Lang {
    pub fn labels(self) -> &'static Labels {
        match self {
            Lang::En => &EN,
            Lang::Ru => &RU,
            Lang::Uz => &UZ,
        }
    }
}

fn time(value: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .as_ref()
        .map(timestamp::format)
        .unwrap_or_else(|| MISSING.to_string())
}

fn route(leg: &Leg) -> String {
    format!(
        "{} ({}) → {} ({})",
        leg.origin_name, leg.origin_iata, leg.destination_name, leg.destination_iata
    )
}

/// Detail card for a looked-up flight, one block per leg
pub fn render_flight(flight: &FlightRecord, lang: Lang) -> String {
    let labels = lang.labels();
    let mut out = format!("✈️ {} {}\n", flight.carrier, flight.flight_no);

    for leg in flight.legs.iter() {
        let (dep, arr) = (&leg.departure, &leg.arrival);
        out.push_str(&format!(
            "{}\n\n{}: {} → {}\n{}: {} → {}\n{}: {} → {}\n\n{}: {} | {}: {} ({})\n",
            route(leg),
            labels.planned,
            time(&dep.planned_local),
            time(&arr.planned_local),
            labels.estimated,
            time(&dep.estimated_local),
            time(&arr.estimated_local),
            labels.actual,
            time(&dep.actual_local),
            time(&arr.actual_local),
            labels.status,
            leg.status,
            labels.aircraft,
            leg.aircraft_type,
            leg.aircraft_tail,
        ));
    }

    out.trim_end().to_string()
}

/// "Not found" message for a lookup miss
pub fn render_not_found(flight_no: &str, lang: Lang) -> String {
    lang.labels()
        .flight_not_found
        .replace("{flight_no}", flight_no)
}

/// Board with a title line; an empty board renders its own message
pub fn render_board(rows: &[BoardEntry], direction: Direction, hub: &str, lang: Lang) -> String {
    let labels = lang.labels();

    if rows.is_empty() {
        return match direction {
            Direction::Arrivals => labels.no_arrivals,
            Direction::Departures => labels.no_departures,
        }
        .to_string();
    }

    let (icon, title) = match direction {
        Direction::Arrivals => ("🛬", labels.upcoming_arrivals),
        Direction::Departures => ("🛫", labels.upcoming_departures),
    };
    let mut out = format!("{} {}\n", icon, title.replace("{hub}", hub));

    for row in rows {
        let times: &LegTimes = direction.times(&row.leg);
        out.push_str(&format!(
            "\n{} {}  {} → {}\n{}: {}\n{}: {}\n",
            row.flight.carrier,
            row.flight.flight_no,
            row.leg.origin_iata,
            row.leg.destination_iata,
            labels.planned,
            time(&times.planned_local),
            labels.estimated,
            time(&times.estimated_local),
        ));
    }

    out.trim_end().to_string()
}

/// Message shown when the feed could not be fetched
pub fn render_unavailable(lang: Lang) -> String {
    lang.labels().feed_unavailable.to_string()
}
