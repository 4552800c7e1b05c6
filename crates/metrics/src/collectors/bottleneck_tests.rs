// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::collector::Collector as _;
use ys_core::ids::{EventId, WagonId};

fn ev(minute: f64, kind: EventKind) -> DomainEvent {
    DomainEvent { id: EventId(0), minute, context: "test".into(), kind }
}

fn collector() -> BottleneckCollector {
    BottleneckCollector::new([(WorkshopId::new("shop1"), 1)], BottleneckThresholds::default())
}

#[test]
fn overloaded_workshop_is_flagged() {
    let mut c = collector();
    c.record(&ev(
        0.0,
        EventKind::WorkshopStationOccupied {
            workshop: WorkshopId::new("shop1"),
            station: 0,
            wagon: WagonId::new("w1"),
        },
    ));
    c.record(&ev(95.0, EventKind::WorkshopStationIdle { workshop: WorkshopId::new("shop1"), station: 0 }));
    let found = c.detect(100.0);
    assert!(found
        .iter()
        .any(|b| b.resource_type == "workshop" && b.severity == Severity::Overutilization));
}

#[test]
fn idle_workshop_is_flagged_underutilized() {
    let c = collector();
    let found = c.detect(100.0);
    assert!(found
        .iter()
        .any(|b| b.resource_type == "workshop" && b.severity == Severity::Underutilization));
}

#[test]
fn track_peaks_trigger_nearly_full_and_full() {
    let mut c = collector();
    c.record(&ev(
        1.0,
        EventKind::TrackOccupancyChanged { track: "t_high".into(), occupied_m: 88.0, total_m: 100.0 },
    ));
    c.record(&ev(
        2.0,
        EventKind::TrackOccupancyChanged { track: "t_full".into(), occupied_m: 97.0, total_m: 100.0 },
    ));
    c.record(&ev(
        3.0,
        EventKind::TrackOccupancyChanged { track: "t_ok".into(), occupied_m: 10.0, total_m: 100.0 },
    ));
    let found = c.detect(10.0);
    let severity_of = |id: &str| {
        found
            .iter()
            .find(|b| b.resource_id == id)
            .map(|b| b.severity)
    };
    assert_eq!(severity_of("t_high"), Some(Severity::NearlyFull));
    assert_eq!(severity_of("t_full"), Some(Severity::Full));
    assert_eq!(severity_of("t_ok"), None);
}

#[test]
fn busy_fleet_is_flagged_overutilized() {
    let mut c = collector();
    c.record(&ev(
        0.0,
        EventKind::LocomotiveStatusChanged { loco: "l1".into(), status: LocoStatus::Moving },
    ));
    let found = c.detect(100.0);
    assert!(found
        .iter()
        .any(|b| b.resource_type == "locomotive" && b.severity == Severity::Overutilization));
}

#[test]
fn parked_fleet_is_flagged_underutilized() {
    let mut c = collector();
    c.record(&ev(
        0.0,
        EventKind::LocomotiveStatusChanged { loco: "l1".into(), status: LocoStatus::Parking },
    ));
    let found = c.detect(100.0);
    assert!(found
        .iter()
        .any(|b| b.resource_type == "locomotive" && b.severity == Severity::Underutilization));
}

#[test]
fn no_locomotive_events_means_no_fleet_verdict() {
    let c = collector();
    let found = c.detect(100.0);
    assert!(!found.iter().any(|b| b.resource_type == "locomotive"));
}

#[test]
fn custom_thresholds_apply() {
    let mut c = BottleneckCollector::new(
        [(WorkshopId::new("shop1"), 1)],
        BottleneckThresholds { track_high: 0.5, ..BottleneckThresholds::default() },
    );
    c.record(&ev(
        1.0,
        EventKind::TrackOccupancyChanged { track: "t1".into(), occupied_m: 60.0, total_m: 100.0 },
    ));
    let found = c.detect(10.0);
    assert!(found.iter().any(|b| b.resource_id == "t1" && b.severity == Severity::NearlyFull));
}
