// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::collector::Collector as _;
use ys_core::coupler::CouplerType;
use ys_core::ids::{EventId, TrackId};

fn ev(minute: f64, kind: EventKind) -> DomainEvent {
    DomainEvent { id: EventId(0), minute, context: "test".into(), kind }
}

fn shop() -> WorkshopId {
    WorkshopId::new("shop1")
}

fn collector() -> WorkshopCollector {
    WorkshopCollector::new([(shop(), 2)])
}

#[test]
fn tracks_completions_and_retrofit_time() {
    let mut c = collector();
    c.record(&ev(
        30.0,
        EventKind::WagonRetrofitted {
            wagon: WagonId::new("w1"),
            workshop: shop(),
            duration_min: 10.0,
            coupler: CouplerType::Screw,
        },
    ));
    c.record(&ev(
        40.0,
        EventKind::WagonRetrofitted {
            wagon: WagonId::new("w2"),
            workshop: shop(),
            duration_min: 10.0,
            coupler: CouplerType::Screw,
        },
    ));
    let stats = c.stats(120.0);
    let s = stats.get(&shop()).unwrap();
    assert_eq!(s.completed, 2);
    assert_eq!(s.total_retrofit_min, 20.0);
    assert_eq!(s.throughput_per_hour, 1.0);
}

#[test]
fn utilization_counts_station_busy_time() {
    let mut c = collector();
    c.record(&ev(
        0.0,
        EventKind::WorkshopStationOccupied { workshop: shop(), station: 0, wagon: WagonId::new("w1") },
    ));
    c.record(&ev(50.0, EventKind::WorkshopStationIdle { workshop: shop(), station: 0 }));
    // 50 busy minutes over 2 stations * 100 minutes = 25%.
    let stats = c.stats(100.0);
    assert_eq!(stats.get(&shop()).unwrap().utilization_pct, 25.0);
}

#[test]
fn open_occupation_counts_until_end_of_run() {
    let mut c = collector();
    c.record(&ev(
        60.0,
        EventKind::WorkshopStationOccupied { workshop: shop(), station: 1, wagon: WagonId::new("w1") },
    ));
    let stats = c.stats(100.0);
    // 40 open minutes over 200 station-minutes.
    assert_eq!(stats.get(&shop()).unwrap().utilization_pct, 20.0);
}

#[test]
fn waiting_time_runs_from_delivery_to_station() {
    let mut c = collector();
    c.record(&ev(
        10.0,
        EventKind::WagonDelivered { wagon: WagonId::new("w1"), track: TrackId::new("retrofit") },
    ));
    c.record(&ev(
        25.0,
        EventKind::WorkshopStationOccupied { workshop: shop(), station: 0, wagon: WagonId::new("w1") },
    ));
    let stats = c.stats(100.0);
    assert_eq!(stats.get(&shop()).unwrap().total_waiting_min, 15.0);
}

#[test]
fn results_carry_per_workshop_names_and_units() {
    let c = collector();
    let results = c.results(60.0);
    assert!(results.iter().any(|m| m.name == "shop1_completed" && m.unit == Unit::Count));
    assert!(results.iter().any(|m| m.name == "shop1_throughput" && m.unit == Unit::PerHour));
    assert!(results.iter().any(|m| m.name == "shop1_utilization" && m.unit == Unit::Percent));
}

#[test]
fn unknown_workshop_events_are_ignored() {
    let mut c = collector();
    c.record(&ev(
        5.0,
        EventKind::WorkshopStationOccupied {
            workshop: WorkshopId::new("ghost"),
            station: 0,
            wagon: WagonId::new("w1"),
        },
    ));
    assert!(c.stats(10.0).get(&WorkshopId::new("ghost")).is_none());
}
