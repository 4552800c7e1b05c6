// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn loco() -> Locomotive {
    Locomotive::new(LocomotiveId::new("loco1"), TrackId::new("parking"), 10)
}

#[test]
fn starts_parked_on_home_track() {
    let l = loco();
    assert_eq!(l.status, LocoStatus::Parking);
    assert_eq!(l.track, l.home_track);
    assert!(l.history.points().is_empty());
}

#[test]
fn history_rejects_decreasing_timestamps() {
    let mut l = loco();
    l.set_status(5.0, LocoStatus::Moving).unwrap();
    let err = l.set_status(4.0, LocoStatus::Parking).unwrap_err();
    assert!(matches!(err, DomainError::HistoryRewind { .. }));
}

#[test]
fn history_allows_same_timestamp() {
    let mut l = loco();
    l.set_status(5.0, LocoStatus::Coupling).unwrap();
    l.set_status(5.0, LocoStatus::Moving).unwrap();
    assert_eq!(l.history.points().len(), 2);
}

#[test]
fn intervals_close_at_end_of_run() {
    let mut l = loco();
    l.set_status(0.0, LocoStatus::Parking).unwrap();
    l.set_status(10.0, LocoStatus::Moving).unwrap();
    l.set_status(12.0, LocoStatus::Coupling).unwrap();
    let intervals = l.history.intervals(20.0);
    assert_eq!(
        intervals,
        vec![
            (LocoStatus::Parking, 0.0, 10.0),
            (LocoStatus::Moving, 10.0, 12.0),
            (LocoStatus::Coupling, 12.0, 20.0),
        ]
    );
}

#[test]
fn zero_width_intervals_are_dropped() {
    let mut l = loco();
    l.set_status(3.0, LocoStatus::Coupling).unwrap();
    l.set_status(3.0, LocoStatus::Moving).unwrap();
    let intervals = l.history.intervals(6.0);
    assert_eq!(intervals, vec![(LocoStatus::Moving, 3.0, 6.0)]);
}
