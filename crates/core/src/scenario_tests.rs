// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{small_yard, wagon_spec};
use yare::parameterized;

#[test]
fn small_yard_validates() {
    let scenario = small_yard("ok").build();
    scenario.validate().unwrap();
}

#[parameterized(
    empty = { "" },
    too_long = { "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" },
    spaces = { "bad id" },
    slash = { "bad/id" },
)]
fn invalid_ids_are_rejected(id: &str) {
    let scenario = small_yard(id).build();
    assert!(matches!(scenario.validate(), Err(ConfigError::InvalidScenarioId(_))));
}

#[test]
fn end_before_start_is_rejected() {
    let mut scenario = small_yard("s1").build();
    scenario.end_date = scenario.start_date;
    assert!(matches!(scenario.validate(), Err(ConfigError::EmptyTimeWindow { .. })));
}

#[test]
fn workshop_with_unknown_track_is_rejected() {
    let mut scenario = small_yard("s1").build();
    scenario.workshops[0].track = "nowhere".into();
    assert!(matches!(scenario.validate(), Err(ConfigError::UnknownWorkshopTrack { .. })));
}

#[test]
fn workshop_on_non_workshop_track_is_rejected() {
    let mut scenario = small_yard("s1").build();
    scenario.workshops[0].track = "collection".into();
    assert!(matches!(scenario.validate(), Err(ConfigError::WrongWorkshopTrackKind { .. })));
}

#[test]
fn route_with_unknown_track_is_rejected() {
    let scenario = small_yard("s1").route("parking", "ghost", 2.0).build();
    assert!(matches!(scenario.validate(), Err(ConfigError::UnknownRouteTrack { .. })));
}

#[test]
fn missing_track_kind_is_rejected() {
    let mut scenario = small_yard("s1").build();
    scenario.tracks.retain(|t| t.kind != TrackKind::Retrofitted);
    assert!(matches!(
        scenario.validate(),
        Err(ConfigError::MissingTrackKind(TrackKind::Retrofitted))
    ));
}

#[test]
fn duplicate_track_ids_are_rejected() {
    let scenario = small_yard("s1").track("parking", TrackKind::Parking, 50.0).build();
    assert!(matches!(scenario.validate(), Err(ConfigError::DuplicateId { .. })));
}

#[test]
fn zero_trains_is_a_valid_scenario() {
    let scenario = small_yard("quiet").build();
    assert!(scenario.trains.is_empty());
    scenario.validate().unwrap();
}

#[test]
fn duration_and_arrival_offsets() {
    let scenario = small_yard("s1").duration_minutes(90.0).train("t1", 15.0, vec![]).build();
    assert_eq!(scenario.duration_minutes(), 90.0);
    assert_eq!(scenario.minutes_from_start(scenario.trains[0].arrival_time), 15.0);
}

#[test]
fn scenario_round_trips_through_json() {
    let scenario = small_yard("rt").train("t1", 5.0, vec![wagon_spec("w1", 14.0)]).build();
    let json = serde_json::to_string(&scenario).unwrap();
    let back: Scenario = serde_json::from_str(&json).unwrap();
    assert_eq!(back, scenario);
}

#[test]
fn wagon_spec_defaults_apply() {
    let spec: WagonSpec =
        serde_json::from_str(r#"{"id": "w1", "length": 12.0, "coupler_type": "SCREW"}"#).unwrap();
    assert!(spec.needs_retrofit);
    assert!(!spec.is_loaded);
}

#[test]
fn strategies_deserialize_snake_case() {
    let s: TrackSelection = serde_json::from_str("\"round_robin\"").unwrap();
    assert_eq!(s, TrackSelection::RoundRobin);
    let d: LocoDelivery = serde_json::from_str("\"direct_delivery\"").unwrap();
    assert_eq!(d, LocoDelivery::DirectDelivery);
}
