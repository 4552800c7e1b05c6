// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locomotive time breakdown, reconstructed from status-change events.

use crate::collector::Collector;
use crate::metric::{Metric, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::LocomotiveId;
use ys_core::locomotive::LocoStatus;

/// Share of a locomotive's time spent in each status, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocoBreakdown {
    pub parking_pct: f64,
    pub moving_pct: f64,
    pub coupling_pct: f64,
    pub decoupling_pct: f64,
}

impl LocoBreakdown {
    /// Non-parking share, the conventional utilization figure.
    pub fn utilization_pct(&self) -> f64 {
        100.0 - self.parking_pct
    }
}

#[derive(Default)]
pub struct LocomotiveCollector {
    history: IndexMap<LocomotiveId, Vec<(f64, LocoStatus)>>,
}

impl LocomotiveCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn minutes_by_status(points: &[(f64, LocoStatus)], end_min: f64) -> [f64; 4] {
        // parking, moving, coupling, decoupling
        let mut acc = [0.0; 4];
        for (i, &(start, status)) in points.iter().enumerate() {
            let end = points.get(i + 1).map_or(end_min, |&(t, _)| t);
            if end <= start {
                continue;
            }
            let slot = match status {
                LocoStatus::Parking => 0,
                LocoStatus::Moving => 1,
                LocoStatus::Coupling => 2,
                LocoStatus::Decoupling => 3,
            };
            acc[slot] += end - start;
        }
        acc
    }

    fn breakdown_of(points: &[(f64, LocoStatus)], end_min: f64) -> LocoBreakdown {
        if end_min <= 0.0 {
            return LocoBreakdown::default();
        }
        if points.is_empty() {
            // A locomotive with no recorded status spent the run parked.
            return LocoBreakdown { parking_pct: 100.0, ..LocoBreakdown::default() };
        }
        let m = Self::minutes_by_status(points, end_min);
        let pct = |v: f64| v / end_min * 100.0;
        LocoBreakdown {
            parking_pct: pct(m[0]),
            moving_pct: pct(m[1]),
            coupling_pct: pct(m[2]),
            decoupling_pct: pct(m[3]),
        }
    }

    /// Per-locomotive breakdown at `end_min`.
    pub fn breakdowns(&self, end_min: f64) -> IndexMap<LocomotiveId, LocoBreakdown> {
        self.history
            .iter()
            .map(|(id, points)| (id.clone(), Self::breakdown_of(points, end_min)))
            .collect()
    }

    /// Fleet-average breakdown at `end_min`.
    pub fn fleet_breakdown(&self, end_min: f64) -> LocoBreakdown {
        let per_loco = self.breakdowns(end_min);
        let n = per_loco.len() as f64;
        if n == 0.0 {
            return LocoBreakdown::default();
        }
        let mut fleet = LocoBreakdown::default();
        for b in per_loco.values() {
            fleet.parking_pct += b.parking_pct / n;
            fleet.moving_pct += b.moving_pct / n;
            fleet.coupling_pct += b.coupling_pct / n;
            fleet.decoupling_pct += b.decoupling_pct / n;
        }
        fleet
    }
}

const TAGS: &[EventTag] = &[EventTag::LocomotiveStatusChanged];

impl Collector for LocomotiveCollector {
    fn name(&self) -> &'static str {
        "locomotive"
    }

    fn handled_tags(&self) -> &'static [EventTag] {
        TAGS
    }

    fn record(&mut self, event: &DomainEvent) {
        if let EventKind::LocomotiveStatusChanged { loco, status } = &event.kind {
            self.history.entry(loco.clone()).or_default().push((event.minute, *status));
        }
    }

    fn results(&self, end_min: f64) -> Vec<Metric> {
        let fleet = self.fleet_breakdown(end_min);
        vec![
            Metric::new("locomotive", "fleet_utilization", fleet.utilization_pct(), Unit::Percent),
            Metric::new("locomotive", "fleet_parking", fleet.parking_pct, Unit::Percent),
            Metric::new("locomotive", "fleet_moving", fleet.moving_pct, Unit::Percent),
            Metric::new("locomotive", "fleet_coupling", fleet.coupling_pct, Unit::Percent),
            Metric::new("locomotive", "fleet_decoupling", fleet.decoupling_pct, Unit::Percent),
        ]
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "locomotive_tests.rs"]
mod tests;
