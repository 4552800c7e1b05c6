// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn track(len: f64) -> Track {
    Track::new(TrackId::new("t1"), TrackKind::Retrofit, len, vec![]).unwrap()
}

#[test]
fn occupy_and_vacate_round_trip() {
    let mut t = track(100.0);
    t.occupy(40.0).unwrap();
    t.occupy(25.0).unwrap();
    assert_eq!(t.occupied_m(), 65.0);
    assert_eq!(t.available_m(), 35.0);
    t.vacate(40.0).unwrap();
    assert_eq!(t.occupied_m(), 25.0);
}

#[test]
fn overflow_is_rejected() {
    let mut t = track(50.0);
    t.occupy(45.0).unwrap();
    let err = t.occupy(10.0).unwrap_err();
    assert!(matches!(err, DomainError::TrackOverflow { .. }));
    // Occupancy unchanged after the failed operation.
    assert_eq!(t.occupied_m(), 45.0);
}

#[test]
fn underflow_is_rejected() {
    let mut t = track(50.0);
    t.occupy(10.0).unwrap();
    assert!(matches!(t.vacate(11.0), Err(DomainError::TrackUnderflow { .. })));
}

#[test]
fn exactly_full_track_boundary() {
    let mut t = track(20.0);
    t.occupy(20.0).unwrap();
    assert!(t.can_fit(0.0));
    assert!(!t.can_fit(1.0));
    assert_eq!(t.available_m(), 0.0);
}

#[test]
fn repeated_fractional_occupancy_stays_within_bounds() {
    let mut t = track(10.0);
    for _ in 0..100 {
        t.occupy(0.1).unwrap();
    }
    // 100 * 0.1 does not sum to exactly 10.0 in f64; the epsilon absorbs it.
    assert!(t.can_fit(0.0));
    assert!(t.occupied_m() <= t.length_m);
    for _ in 0..100 {
        t.vacate(0.1).unwrap();
    }
    assert!(t.occupied_m() >= 0.0);
    assert!(t.occupied_m() < 1e-6);
}

#[test]
fn utilization_fraction() {
    let mut t = track(200.0);
    t.occupy(170.0).unwrap();
    assert!((t.utilization() - 0.85).abs() < 1e-12);
}

#[test]
fn zero_length_track_is_always_full() {
    let t = track(0.0);
    assert!(t.can_fit(0.0));
    assert!(!t.can_fit(10.0));
    assert_eq!(t.utilization(), 0.0);
}

#[test]
fn negative_length_is_invalid() {
    assert!(Track::new(TrackId::new("t"), TrackKind::Parking, -5.0, vec![]).is_err());
}

#[test]
fn kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&TrackKind::Retrofitted).unwrap(), "\"retrofitted\"");
}
