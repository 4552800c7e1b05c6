// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn wagon(coupler: CouplerType, needs_retrofit: bool, is_loaded: bool) -> Wagon {
    Wagon::new(WagonId::new("w1"), 14.0, coupler, needs_retrofit, is_loaded).unwrap()
}

#[parameterized(
    to_retrofit_track = { WagonStatus::Arrived, WagonStatus::OnRetrofitTrack, true },
    to_rejected = { WagonStatus::Arrived, WagonStatus::Rejected, true },
    queue_to_moving = { WagonStatus::OnRetrofitTrack, WagonStatus::Moving, true },
    moving_to_workshop = { WagonStatus::Moving, WagonStatus::AtWorkshop, true },
    workshop_to_station = { WagonStatus::AtWorkshop, WagonStatus::Retrofitting, true },
    station_to_done = { WagonStatus::Retrofitting, WagonStatus::Retrofitted, true },
    done_to_moving = { WagonStatus::Retrofitted, WagonStatus::Moving, true },
    moving_to_parking = { WagonStatus::Moving, WagonStatus::Parking, true },
    moving_back_to_done = { WagonStatus::Moving, WagonStatus::Retrofitted, true },
    backwards_to_arrived = { WagonStatus::Moving, WagonStatus::Arrived, false },
    parking_is_terminal = { WagonStatus::Parking, WagonStatus::Moving, false },
    rejected_is_terminal = { WagonStatus::Rejected, WagonStatus::OnRetrofitTrack, false },
    skip_station = { WagonStatus::AtWorkshop, WagonStatus::Retrofitted, false },
)]
fn status_dag(from: WagonStatus, to: WagonStatus, allowed: bool) {
    assert_eq!(from.can_advance_to(to), allowed, "{from} -> {to}");
}

#[test]
fn advance_rejects_backward_transition() {
    let mut w = wagon(CouplerType::Screw, true, false);
    w.advance(WagonStatus::OnRetrofitTrack).unwrap();
    let err = w.advance(WagonStatus::Arrived).unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));
    // Status untouched after the failed transition.
    assert_eq!(w.status, WagonStatus::OnRetrofitTrack);
}

#[parameterized(
    dac_wagon = { CouplerType::Dac, true, false, Some(RejectReason::AlreadyDac) },
    loaded_wagon = { CouplerType::Screw, true, true, Some(RejectReason::Loaded) },
    not_flagged = { CouplerType::Screw, false, false, Some(RejectReason::NotFlagged) },
    eligible = { CouplerType::Screw, true, false, None },
    hybrid_eligible = { CouplerType::Hybrid, true, false, None },
)]
fn rejection_reasons(
    coupler: CouplerType,
    needs_retrofit: bool,
    is_loaded: bool,
    expected: Option<RejectReason>,
) {
    assert_eq!(wagon(coupler, needs_retrofit, is_loaded).rejection_reason(), expected);
}

#[test]
fn negative_length_is_invalid() {
    let err = Wagon::new(WagonId::new("w"), -1.0, CouplerType::Screw, true, false).unwrap_err();
    assert!(matches!(err, DomainError::InvalidMeasure { field: "length_m", .. }));
}

#[test]
fn nan_length_is_invalid() {
    assert!(Wagon::new(WagonId::new("w"), f64::NAN, CouplerType::Screw, true, false).is_err());
}

#[test]
fn status_serializes_screaming_snake() {
    let json = serde_json::to_string(&WagonStatus::OnRetrofitTrack).unwrap();
    assert_eq!(json, "\"ON_RETROFIT_TRACK\"");
}
