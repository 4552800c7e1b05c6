// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::collector::Collector as _;
use ys_core::ids::EventId;

fn status(loco: &str, minute: f64, status: LocoStatus) -> DomainEvent {
    DomainEvent {
        id: EventId(0),
        minute,
        context: "test".into(),
        kind: EventKind::LocomotiveStatusChanged { loco: LocomotiveId::new(loco), status },
    }
}

#[test]
fn reconstructs_intervals_from_status_changes() {
    let mut c = LocomotiveCollector::new();
    c.record(&status("l1", 0.0, LocoStatus::Parking));
    c.record(&status("l1", 50.0, LocoStatus::Moving));
    c.record(&status("l1", 70.0, LocoStatus::Coupling));
    c.record(&status("l1", 80.0, LocoStatus::Parking));
    let breakdowns = c.breakdowns(100.0);
    let b = breakdowns.get(&LocomotiveId::new("l1")).unwrap();
    assert_eq!(b.parking_pct, 70.0);
    assert_eq!(b.moving_pct, 20.0);
    assert_eq!(b.coupling_pct, 10.0);
    assert_eq!(b.decoupling_pct, 0.0);
    assert_eq!(b.utilization_pct(), 30.0);
}

#[test]
fn silent_locomotive_counts_as_parked() {
    let mut c = LocomotiveCollector::new();
    c.record(&status("l1", 0.0, LocoStatus::Parking));
    // l2 appears but has an empty history entry.
    c.history.entry(LocomotiveId::new("l2")).or_default();
    let breakdowns = c.breakdowns(60.0);
    assert_eq!(breakdowns.get(&LocomotiveId::new("l2")).unwrap().parking_pct, 100.0);
}

#[test]
fn fleet_average_spans_locomotives() {
    let mut c = LocomotiveCollector::new();
    // l1 moves the whole run, l2 parks the whole run.
    c.record(&status("l1", 0.0, LocoStatus::Moving));
    c.record(&status("l2", 0.0, LocoStatus::Parking));
    let fleet = c.fleet_breakdown(100.0);
    assert_eq!(fleet.moving_pct, 50.0);
    assert_eq!(fleet.parking_pct, 50.0);
    assert_eq!(fleet.utilization_pct(), 50.0);
}

#[test]
fn results_report_percentages() {
    let mut c = LocomotiveCollector::new();
    c.record(&status("l1", 0.0, LocoStatus::Moving));
    let results = c.results(10.0);
    let util = results.iter().find(|m| m.name == "fleet_utilization").unwrap();
    assert_eq!(util.value, 100.0);
    assert_eq!(util.unit, crate::metric::Unit::Percent);
}

#[test]
fn zero_duration_run_yields_default_breakdown() {
    let mut c = LocomotiveCollector::new();
    c.record(&status("l1", 0.0, LocoStatus::Moving));
    let b = c.breakdowns(0.0);
    assert_eq!(b.get(&LocomotiveId::new("l1")).unwrap().moving_pct, 0.0);
}
