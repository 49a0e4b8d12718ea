//! End-to-end timetable tests: XML file → FeedSource → cache → queries → text
mod common;

use chrono::Duration;
use flightboard::config::BoardConfig;
use flightboard::feed_xml;
use flightboard::query::Direction;
use flightboard::render::{self, Lang};
use flightboard::{FetchError, FileFeedSource, FlightBoard, FlightCatalog, timestamp};
use std::sync::Arc;

fn numbers(rows: &[flightboard::BoardEntry]) -> Vec<&str> {
    rows.iter().map(|r| r.flight.flight_no.as_str()).collect()
}

fn board_for(path: &std::path::Path) -> FlightBoard {
    FlightBoard::new(Arc::new(FileFeedSource::new(path)), &BoardConfig::default())
}

#[tokio::test]
async fn test_departures_from_fixture() {
    let board = board_for(&common::timetable_path());
    let rows = board.departures(common::reference_time()).await.unwrap();

    assert_eq!(numbers(&rows), vec!["53", "305", "771"]);
    // Multi-leg flight is represented by its first leg
    assert_eq!(rows[2].leg.destination_iata, "UGC");
    assert_eq!(rows[2].flight.legs.len(), 2);
}

#[tokio::test]
async fn test_arrivals_from_fixture() {
    let board = board_for(&common::timetable_path());
    let rows = board.arrivals(common::reference_time()).await.unwrap();

    assert_eq!(numbers(&rows), vec!["54", "306", "772"]);
    for row in &rows {
        assert_eq!(row.leg.destination_iata, "TAS");
    }
    // Multi-leg flight is represented by its last leg
    assert_eq!(rows[2].leg.origin_iata, "UGC");
}

#[tokio::test]
async fn test_lookup_from_fixture() {
    let board = board_for(&common::timetable_path());

    let flight = board.flight("771").await.unwrap().unwrap();
    assert_eq!(flight.carrier, "HY");
    assert_eq!(flight.first_leg().origin_iata, "TAS");
    assert_eq!(flight.last_leg().destination_iata, "DME");

    assert!(board.flight("999").await.unwrap().is_none(), "legless entry is dropped");
    assert!(board.flight("HY305").await.unwrap().is_none());
}

#[test]
fn test_fixture_catalog_drops_only_legless_entry() {
    let xml = std::fs::read_to_string(common::timetable_path()).unwrap();
    let catalog = FlightCatalog::build(&feed_xml::decode(&xml).unwrap());

    assert_eq!(catalog.len(), 9);
    assert_eq!(catalog.skipped(), 1);
}

#[tokio::test]
async fn test_arrivals_sorted_by_local_estimate_not_filter_time() {
    let now = common::reference_time();
    let plus = |hours| timestamp::format(&(now + Duration::hours(hours)));
    let xml = common::timetable_xml(&[
        common::arrival_xml("A", "TAS", &plus(1), "08.11.2025 10:00"),
        common::arrival_xml("B", "TAS", &plus(2), "08.11.2025 09:00"),
        common::arrival_xml("C", "SKD", &plus(1), "08.11.2025 08:00"),
    ]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.xml");
    std::fs::write(&path, xml).unwrap();

    let rows = board_for(&path).arrivals(now).await.unwrap();
    assert_eq!(numbers(&rows), vec!["B", "A"]);
}

#[tokio::test]
async fn test_board_never_exceeds_five_rows() {
    let now = common::reference_time();
    let flights: Vec<String> = (1..=9)
        .map(|i| {
            common::arrival_xml(
                &format!("{i}"),
                "TAS",
                &timestamp::format(&(now + Duration::minutes(10 * i))),
                "",
            )
        })
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.xml");
    std::fs::write(&path, common::timetable_xml(&flights)).unwrap();

    let rows = board_for(&path).arrivals(now).await.unwrap();
    // No local estimates at all: feed order is kept
    assert_eq!(numbers(&rows), vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn test_missing_feed_file_is_fetch_error_not_empty_board() {
    let dir = tempfile::tempdir().unwrap();
    let board = board_for(&dir.path().join("absent.xml"));

    let result = board.arrivals(common::reference_time()).await;
    assert!(matches!(result, Err(FetchError::Io(_))));
}

#[tokio::test]
async fn test_foreign_root_is_decode_error_not_empty_board() {
    let dir = tempfile::tempdir().unwrap();
    let bodies = [
        "<error><message>Unauthorized</message></error>",
        "<FLIGHT_TYPE>oops</FLIGHT_TYPE>",
        "<FLIGHT_TYPE><FLIGHT>maintenance</FLIGHT></FLIGHT_TYPE>",
    ];

    for (i, body) in bodies.iter().enumerate() {
        let path = dir.path().join(format!("feed-{i}.xml"));
        std::fs::write(&path, body).unwrap();
        let board = board_for(&path);

        let arrivals = board.arrivals(common::reference_time()).await;
        assert!(matches!(arrivals, Err(FetchError::Decode(_))), "{body}: {arrivals:?}");
        let lookup = board.flight("305").await;
        assert!(matches!(lookup, Err(FetchError::Decode(_))), "{body}: {lookup:?}");
    }
}

#[tokio::test]
async fn test_empty_timetable_is_empty_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.xml");
    std::fs::write(&path, "<FLIGHT_TYPE/>").unwrap();

    let rows = board_for(&path).arrivals(common::reference_time()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_rendered_outputs_are_distinct() {
    let board = board_for(&common::timetable_path());
    let far_future = timestamp::parse("01.01.2030 00:00").unwrap();

    let empty = board.board(Direction::Arrivals, far_future).await.unwrap();
    let empty_text = render::render_board(&empty, Direction::Arrivals, board.hub(), Lang::En);
    assert_eq!(empty_text, "No arrivals found.");

    let not_found = render::render_not_found("12345", Lang::En);
    assert_eq!(not_found, "Flight 12345 not found.");

    let rows = board.departures(common::reference_time()).await.unwrap();
    let text = render::render_board(&rows, Direction::Departures, board.hub(), Lang::En);
    assert!(text.starts_with("🛫 Upcoming Departures from TAS"));
    assert!(text.contains("HY 53  TAS → IST"));
    assert!(text.contains("Est: 08.11.2025 16:30"));

    let unavailable = render::render_unavailable(Lang::En);
    assert_ne!(unavailable, empty_text);
    assert_ne!(unavailable, not_found);
}
