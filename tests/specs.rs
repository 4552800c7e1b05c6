// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level end-to-end scenarios.
//!
//! Each test builds an orchestrator from a small scenario, runs it, and
//! checks the resulting event stream, metrics, and invariants. Time
//! assertions allow a one-minute tolerance where the expected instant
//! depends on transport interleaving.

use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::{LocomotiveId, WorkshopId};
use ys_core::test_support::{small_yard, wagon_spec, ScenarioBuilder};
use ys_core::track::TrackKind;
use ys_core::wagon::{RejectReason, WagonStatus};
use ys_core::{CouplerType, ProcessTimes, Scenario, WagonSpec};
use ys_metrics::{BottleneckThresholds, MetricsPipeline};
use ys_yard::{SimulationReport, YardOrchestrator};

fn run(scenario: Scenario, until: f64) -> SimulationReport {
    YardOrchestrator::new(scenario).unwrap().run(Some(until))
}

fn minutes_of(events: &[DomainEvent], f: impl Fn(&EventKind) -> bool) -> Vec<f64> {
    events.iter().filter(|e| f(&e.kind)).map(|e| e.minute).collect()
}

fn status_count(report: &SimulationReport, status: WagonStatus) -> usize {
    report.wagon_status_counts.get(&status).copied().unwrap_or(0)
}

fn completed(report: &SimulationReport, workshop: &str) -> u64 {
    report
        .metrics
        .per_workshop
        .get(&WorkshopId::new(workshop))
        .map(|s| s.completed)
        .unwrap_or(0)
}

/// Every arrived wagon is retrofitted, rejected, or still in flight —
/// exactly one of the three.
fn assert_conservation(report: &SimulationReport) {
    use std::collections::BTreeSet;
    let mut arrived = BTreeSet::new();
    let mut retrofitted = BTreeSet::new();
    let mut rejected = BTreeSet::new();
    for event in &report.events {
        match &event.kind {
            EventKind::WagonArrived { wagon, status: WagonStatus::Arrived, .. } => {
                arrived.insert(wagon.clone());
            }
            EventKind::WagonRetrofitted { wagon, .. } => {
                retrofitted.insert(wagon.clone());
            }
            EventKind::WagonRejected { wagon, .. } => {
                rejected.insert(wagon.clone());
            }
            _ => {}
        }
    }
    assert!(retrofitted.is_disjoint(&rejected), "a wagon was both retrofitted and rejected");
    assert!(retrofitted.is_subset(&arrived));
    assert!(rejected.is_subset(&arrived));
    let in_flight = arrived.len() - retrofitted.len() - rejected.len();
    let registered: usize = report.wagon_status_counts.values().sum();
    assert_eq!(arrived.len(), registered, "every registered wagon must have arrived");
    assert_eq!(retrofitted.len() + rejected.len() + in_flight, arrived.len());
}

/// Clock is non-decreasing and every occupancy sample stays within bounds.
fn assert_stream_invariants(report: &SimulationReport) {
    let mut last = 0.0;
    for event in &report.events {
        assert!(event.minute >= last, "clock went backwards at {:?}", event.id);
        last = event.minute;
        if let EventKind::TrackOccupancyChanged { track, occupied_m, total_m } = &event.kind {
            assert!(
                *occupied_m >= -1e-9 && *occupied_m <= total_m + 1e-9,
                "track {track} occupancy {occupied_m} outside [0, {total_m}]"
            );
        }
    }
}

/// Station concurrency never exceeds the workshop's station count.
fn assert_station_bound(report: &SimulationReport, workshop: &str, stations: i64) {
    let mut open = 0i64;
    for event in &report.events {
        match &event.kind {
            EventKind::WorkshopStationOccupied { workshop: w, .. } if *w == WorkshopId::new(workshop) => {
                open += 1;
                assert!(open <= stations, "{workshop} exceeded {stations} concurrent retrofits");
            }
            EventKind::WorkshopStationIdle { workshop: w, .. } if *w == WorkshopId::new(workshop) => {
                open -= 1;
                assert!(open >= 0);
            }
            _ => {}
        }
    }
}

/// Locomotive allocations never overlap per locomotive.
fn assert_exclusive_locomotives(report: &SimulationReport) {
    use std::collections::HashMap;
    let mut held: HashMap<String, bool> = HashMap::new();
    for event in &report.events {
        match &event.kind {
            EventKind::ResourceAllocated { resource, id, .. } if resource == "locomotives" => {
                let slot = held.entry(id.clone()).or_insert(false);
                assert!(!*slot, "locomotive {id} double-allocated");
                *slot = true;
            }
            EventKind::ResourceReleased { resource, id } if resource == "locomotives" => {
                let slot = held.entry(id.clone()).or_insert(false);
                assert!(*slot, "locomotive {id} released while free");
                *slot = false;
            }
            _ => {}
        }
    }
}

// --- Scenario 1: single wagon, single station -----------------------------

#[test]
fn single_wagon_single_station() {
    let report = run(
        small_yard("spec1").train("t1", 0.0, vec![wagon_spec("w1", 10.0)]).build(),
        50.0,
    );
    assert!(report.success, "faults: {:?}", report.faults);
    assert_eq!(status_count(&report, WagonStatus::Rejected), 0);
    assert_eq!(status_count(&report, WagonStatus::Parking), 1);
    assert_eq!(completed(&report, "shop1"), 1);

    // Retrofit takes exactly the configured 10 minutes.
    let starts = minutes_of(&report.events, |k| matches!(k, EventKind::WorkshopStationOccupied { .. }));
    let ends = minutes_of(&report.events, |k| matches!(k, EventKind::WagonRetrofitted { .. }));
    assert_eq!(starts.len(), 1);
    assert_eq!(ends.len(), 1);
    assert!((ends[0] - starts[0] - 10.0).abs() < 1e-9);

    // End-to-end: arrival at t=0, parked about twenty minutes later.
    let parked = minutes_of(&report.events, |k| {
        matches!(k, EventKind::WagonArrived { status: WagonStatus::Parking, .. })
    });
    assert_eq!(parked.len(), 1);
    assert!((18.0..=22.0).contains(&parked[0]), "parked at {}", parked[0]);

    assert_stream_invariants(&report);
    assert_conservation(&report);
    assert_exclusive_locomotives(&report);
}

// --- Scenario 2: two wagons, one station, sequential ----------------------

#[test]
fn two_wagons_one_station_process_sequentially() {
    let report = run(
        small_yard("spec2")
            .train("t1", 0.0, vec![wagon_spec("w1", 10.0), wagon_spec("w2", 10.0)])
            .build(),
        60.0,
    );
    assert!(report.success, "faults: {:?}", report.faults);
    assert_eq!(completed(&report, "shop1"), 2);

    let starts = minutes_of(&report.events, |k| matches!(k, EventKind::WorkshopStationOccupied { .. }));
    assert_eq!(starts.len(), 2);
    // The second wagon waits for the first to clear the workshop.
    assert!((starts[1] - 20.0).abs() <= 1.0, "second retrofit started at {}", starts[1]);

    let on_retrofitted = minutes_of(&report.events, |k| {
        matches!(k, EventKind::WagonArrived { status: WagonStatus::Retrofitted, .. })
    });
    assert_eq!(on_retrofitted.len(), 2);
    assert!(
        (31.0..=33.0).contains(&on_retrofitted[1]),
        "second wagon reached retrofitted at {}",
        on_retrofitted[1]
    );
    assert_station_bound(&report, "shop1", 1);
    assert_stream_invariants(&report);
}

// --- Scenario 3: two wagons, two stations, parallel -----------------------

#[test]
fn two_wagons_two_stations_process_in_parallel() {
    let scenario = ScenarioBuilder::new("spec3")
        .track("parking", TrackKind::Parking, 100.0)
        .track("collection", TrackKind::Collection, 100.0)
        .track("retrofit", TrackKind::Retrofit, 100.0)
        .track("retrofitted", TrackKind::Retrofitted, 100.0)
        .track("ws1", TrackKind::Workshop, 100.0)
        .loco("loco1", "parking")
        .workshop("shop1", "ws1", 2)
        .process_times(ProcessTimes::zeroed_with_retrofit(10.0))
        .train("t1", 0.0, vec![wagon_spec("w1", 10.0), wagon_spec("w2", 10.0)])
        .build();
    let report = run(scenario, 50.0);
    assert!(report.success, "faults: {:?}", report.faults);

    let starts = minutes_of(&report.events, |k| matches!(k, EventKind::WorkshopStationOccupied { .. }));
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[0], starts[1], "both retrofits start together");
    assert!((starts[0] - 5.0).abs() <= 1.0, "retrofits started at {}", starts[0]);

    let done = minutes_of(&report.events, |k| matches!(k, EventKind::WagonRetrofitted { .. }));
    assert_eq!(done.len(), 2);
    assert_eq!(done[0], done[1]);
    assert!((done[0] - 15.0).abs() <= 1.0);

    // Each station completed one wagon.
    let mut stations_used: Vec<usize> = report
        .events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::WorkshopStationOccupied { station, .. } => Some(*station),
            _ => None,
        })
        .collect();
    stations_used.sort_unstable();
    assert_eq!(stations_used, vec![0, 1]);
    assert_station_bound(&report, "shop1", 2);
}

// --- Scenario 4: six wagons, two workshops --------------------------------

#[test]
fn six_wagons_balance_across_two_workshops() {
    let scenario = ScenarioBuilder::new("spec4")
        .track("parking", TrackKind::Parking, 300.0)
        .track("collection", TrackKind::Collection, 300.0)
        .track("retrofit", TrackKind::Retrofit, 300.0)
        .track("retrofitted", TrackKind::Retrofitted, 300.0)
        .track("ws1", TrackKind::Workshop, 100.0)
        .track("ws2", TrackKind::Workshop, 100.0)
        .loco("loco1", "parking")
        .loco("loco2", "parking")
        .workshop("shop1", "ws1", 2)
        .workshop("shop2", "ws2", 2)
        .process_times(ProcessTimes::zeroed_with_retrofit(10.0))
        .train("t1", 0.0, (1..=6).map(|i| wagon_spec(&format!("w{i}"), 10.0)).collect())
        .build();
    let report = run(scenario, 300.0);
    assert!(report.success, "faults: {:?}", report.faults);

    let shop1 = completed(&report, "shop1");
    let shop2 = completed(&report, "shop2");
    assert_eq!(shop1 + shop2, 6);
    // The effective-availability heuristic sends four to the first workshop
    // and two to the second; the second is never starved.
    assert_eq!(shop1, 4);
    assert_eq!(shop2, 2);
    assert_station_bound(&report, "shop1", 2);
    assert_station_bound(&report, "shop2", 2);
    assert_exclusive_locomotives(&report);
}

// --- Scenario 5: rejection on a full collection track ---------------------

#[test]
fn second_wagon_rejected_when_collection_track_is_full() {
    let scenario = ScenarioBuilder::new("spec5")
        .track("parking", TrackKind::Parking, 100.0)
        .track("collection", TrackKind::Collection, 10.0)
        .track("retrofit", TrackKind::Retrofit, 100.0)
        .track("retrofitted", TrackKind::Retrofitted, 100.0)
        .track("ws1", TrackKind::Workshop, 100.0)
        .loco("loco1", "parking")
        .workshop("shop1", "ws1", 1)
        .process_times(ProcessTimes::zeroed_with_retrofit(10.0))
        .train("t1", 0.0, vec![wagon_spec("w1", 10.0), wagon_spec("w2", 10.0)])
        .build();
    let report = run(scenario, 100.0);
    assert!(report.success, "faults: {:?}", report.faults);

    let rejected: Vec<&DomainEvent> = report
        .events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::WagonRejected { .. }))
        .collect();
    assert_eq!(rejected.len(), 1);
    let EventKind::WagonRejected { wagon, reason } = &rejected[0].kind else { unreachable!() };
    assert_eq!(wagon.as_str(), "w2");
    assert_eq!(*reason, RejectReason::CollectionTrackFull);

    assert_eq!(completed(&report, "shop1"), 1);
    let wagon_metrics = report.metrics.categories.get("wagon").unwrap();
    let by_name = |name: &str| wagon_metrics.iter().find(|m| m.name == name).map(|m| m.value);
    assert_eq!(by_name("wagons_rejected"), Some(1.0));
    assert_eq!(by_name("wagons_retrofitted"), Some(1.0));
    assert_conservation(&report);
}

// --- Scenario 6: no parking outflow ---------------------------------------

#[test]
fn full_parking_strands_wagons_without_deadlock() {
    let scenario = ScenarioBuilder::new("spec6")
        .track("parking", TrackKind::Parking, 0.0)
        .track("collection", TrackKind::Collection, 100.0)
        .track("retrofit", TrackKind::Retrofit, 100.0)
        .track("retrofitted", TrackKind::Retrofitted, 100.0)
        .track("ws1", TrackKind::Workshop, 100.0)
        .loco("loco1", "parking")
        .workshop("shop1", "ws1", 1)
        .process_times(ProcessTimes::zeroed_with_retrofit(10.0))
        .train("t1", 0.0, vec![wagon_spec("w1", 10.0)])
        .build();
    let report = run(scenario, 120.0);
    assert!(report.success, "faults: {:?}", report.faults);
    assert_eq!(report.duration_min, 120.0);
    // The wagon completes its retrofit but can never park.
    assert_eq!(completed(&report, "shop1"), 1);
    assert_eq!(status_count(&report, WagonStatus::Parking), 0);
    assert_eq!(status_count(&report, WagonStatus::Retrofitted), 1);
    assert_stream_invariants(&report);
}

// --- Boundary: zero trains ------------------------------------------------

#[test]
fn zero_trains_is_a_successful_empty_run() {
    let report = run(small_yard("spec_empty").build(), 50.0);
    assert!(report.success);
    assert!(report.quiescent_early);
    assert_eq!(report.duration_min, 50.0);
    let wagon_metrics = report.metrics.categories.get("wagon").unwrap();
    assert!(wagon_metrics.iter().all(|m| m.value == 0.0));
}

// --- Replay idempotence ---------------------------------------------------

#[test]
fn replaying_the_event_stream_reproduces_the_metrics() {
    let report = run(
        small_yard("spec_replay")
            .train("t1", 0.0, vec![wagon_spec("w1", 10.0), wagon_spec("w2", 12.0)])
            .build(),
        120.0,
    );
    let mut fresh = MetricsPipeline::standard(
        vec![(WorkshopId::new("shop1"), 1)],
        None,
        BottleneckThresholds::default(),
    );
    fresh.replay(report.events.iter());
    let replayed = fresh.report(report.duration_min);
    assert_eq!(
        serde_json::to_string(&replayed).unwrap(),
        serde_json::to_string(&report.metrics).unwrap()
    );
}

// --- Determinism ----------------------------------------------------------

#[test]
fn identical_scenarios_yield_identical_streams() {
    let build = || {
        small_yard("spec_det")
            .train("t1", 0.0, vec![wagon_spec("w1", 10.0), wagon_spec("w2", 14.0)])
            .train("t2", 7.0, vec![wagon_spec("w3", 9.0), wagon_spec("w4", 20.0)])
            .build()
    };
    let a = run(build(), 240.0);
    let b = run(build(), 240.0);
    assert_eq!(
        serde_json::to_string(&a.events).unwrap(),
        serde_json::to_string(&b.events).unwrap()
    );
}

// --- Mixed eligibility ----------------------------------------------------

#[test]
fn ineligible_wagons_are_rejected_with_their_reasons() {
    let mut dac = wagon_spec("w_dac", 10.0);
    dac.coupler_type = CouplerType::Dac;
    let mut loaded = wagon_spec("w_loaded", 10.0);
    loaded.is_loaded = true;
    let mut unflagged = wagon_spec("w_unflagged", 10.0);
    unflagged.needs_retrofit = false;
    let good: WagonSpec = wagon_spec("w_good", 10.0);

    let report = run(
        small_yard("spec_mixed").train("t1", 0.0, vec![dac, loaded, unflagged, good]).build(),
        120.0,
    );
    assert!(report.success, "faults: {:?}", report.faults);
    assert_eq!(status_count(&report, WagonStatus::Rejected), 3);
    assert_eq!(completed(&report, "shop1"), 1);

    let reasons: Vec<RejectReason> = report
        .events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::WagonRejected { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![RejectReason::AlreadyDac, RejectReason::Loaded, RejectReason::NotFlagged]
    );
    assert_conservation(&report);
}

// --- Locomotive accounting ------------------------------------------------

#[test]
fn locomotive_history_covers_the_whole_run() {
    let report = run(
        small_yard("spec_loco").train("t1", 0.0, vec![wagon_spec("w1", 10.0)]).build(),
        50.0,
    );
    let breakdown = report.metrics.per_locomotive.get(&LocomotiveId::new("loco1")).unwrap();
    let total = breakdown.parking_pct
        + breakdown.moving_pct
        + breakdown.coupling_pct
        + breakdown.decoupling_pct;
    assert!((total - 100.0).abs() < 1e-6, "breakdown sums to {total}");
    assert!(breakdown.moving_pct > 0.0);
    assert_exclusive_locomotives(&report);
}
