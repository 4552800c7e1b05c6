// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers shared across the workspace (behind the `test-support`
//! feature). The scenario builder itself is generated by [`crate::builder!`]
//! next to [`Scenario`](crate::scenario::Scenario).

pub use crate::scenario::ScenarioBuilder;

use crate::coupler::CouplerType;
use crate::process_times::ProcessTimes;
use crate::scenario::WagonSpec;
use crate::track::TrackKind;

/// A screw-coupled, empty wagon flagged for retrofit.
pub fn wagon_spec(id: &str, length: f64) -> WagonSpec {
    WagonSpec {
        id: id.into(),
        length,
        is_loaded: false,
        needs_retrofit: true,
        coupler_type: CouplerType::Screw,
    }
}

/// The small yard used by most end-to-end tests: one track of each kind plus
/// one workshop track, 100 m each, one locomotive, one workshop. Route
/// durations rely on the 1.0-minute fallback.
pub fn small_yard(id: &str) -> ScenarioBuilder {
    ScenarioBuilder::new(id)
        .track("parking", TrackKind::Parking, 100.0)
        .track("collection", TrackKind::Collection, 100.0)
        .track("retrofit", TrackKind::Retrofit, 100.0)
        .track("retrofitted", TrackKind::Retrofitted, 100.0)
        .track("ws1", TrackKind::Workshop, 100.0)
        .loco("loco1", "parking")
        .workshop("shop1", "ws1", 1)
        .process_times(ProcessTimes::zeroed_with_retrofit(10.0))
}
