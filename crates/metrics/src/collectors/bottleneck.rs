// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bottleneck detection over workshops, tracks, and the locomotive fleet.
//!
//! Tracks are judged on peak occupancy; workshops and the locomotive fleet
//! on their time-weighted busy share over the run.

use crate::collector::Collector;
use crate::metric::{Metric, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::{LocomotiveId, TrackId, WorkshopId};
use ys_core::locomotive::LocoStatus;

/// Utilization thresholds, as 0..=1 fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BottleneckThresholds {
    pub workshop_over: f64,
    pub workshop_under: f64,
    pub track_high: f64,
    pub track_full: f64,
    pub locomotive_over: f64,
    pub locomotive_under: f64,
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self {
            workshop_over: 0.90,
            workshop_under: 0.30,
            track_high: 0.85,
            track_full: 0.95,
            locomotive_over: 0.90,
            locomotive_under: 0.20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Overutilization,
    Underutilization,
    NearlyFull,
    Full,
}

ys_core::simple_display! {
    Severity {
        Overutilization => "overutilization",
        Underutilization => "underutilization",
        NearlyFull => "nearly_full",
        Full => "full",
    }
}

/// One flagged resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub resource_type: &'static str,
    pub resource_id: String,
    pub severity: Severity,
    pub utilization: f64,
    pub threshold: f64,
    pub description: String,
}

#[derive(Default)]
struct StationUse {
    busy_min: f64,
    open: IndexMap<usize, f64>,
}

pub struct BottleneckCollector {
    thresholds: BottleneckThresholds,
    stations: IndexMap<WorkshopId, usize>,
    station_use: IndexMap<WorkshopId, StationUse>,
    track_peak: IndexMap<TrackId, (f64, f64)>,
    loco_history: IndexMap<LocomotiveId, Vec<(f64, LocoStatus)>>,
}

impl BottleneckCollector {
    pub fn new(
        workshops: impl IntoIterator<Item = (WorkshopId, usize)>,
        thresholds: BottleneckThresholds,
    ) -> Self {
        Self {
            thresholds,
            stations: workshops.into_iter().collect(),
            station_use: IndexMap::new(),
            track_peak: IndexMap::new(),
            loco_history: IndexMap::new(),
        }
    }

    fn workshop_utilization(&self, workshop: &WorkshopId, end_min: f64) -> f64 {
        let stations = self.stations.get(workshop).copied().unwrap_or(0);
        if stations == 0 || end_min <= 0.0 {
            return 0.0;
        }
        let Some(state) = self.station_use.get(workshop) else { return 0.0 };
        let open: f64 = state.open.values().map(|s| (end_min - s).max(0.0)).sum();
        (state.busy_min + open) / (stations as f64 * end_min)
    }

    fn fleet_busy_fraction(&self, end_min: f64) -> f64 {
        if end_min <= 0.0 || self.loco_history.is_empty() {
            return 0.0;
        }
        let mut busy = 0.0;
        for points in self.loco_history.values() {
            for (i, &(start, status)) in points.iter().enumerate() {
                let end = points.get(i + 1).map_or(end_min, |&(t, _)| t);
                if status != LocoStatus::Parking && end > start {
                    busy += end - start;
                }
            }
        }
        busy / (end_min * self.loco_history.len() as f64)
    }

    /// All flagged resources at `end_min`.
    pub fn detect(&self, end_min: f64) -> Vec<Bottleneck> {
        let t = &self.thresholds;
        let mut out = Vec::new();

        for workshop in self.stations.keys() {
            let util = self.workshop_utilization(workshop, end_min);
            if util > t.workshop_over {
                out.push(Bottleneck {
                    resource_type: "workshop",
                    resource_id: workshop.to_string(),
                    severity: Severity::Overutilization,
                    utilization: util,
                    threshold: t.workshop_over,
                    description: format!("workshop {workshop} runs at {:.0}% of station capacity", util * 100.0),
                });
            } else if util < t.workshop_under {
                out.push(Bottleneck {
                    resource_type: "workshop",
                    resource_id: workshop.to_string(),
                    severity: Severity::Underutilization,
                    utilization: util,
                    threshold: t.workshop_under,
                    description: format!("workshop {workshop} idles at {:.0}% of station capacity", util * 100.0),
                });
            }
        }

        for (track, &(peak, total)) in &self.track_peak {
            if total <= 0.0 {
                continue;
            }
            let frac = peak / total;
            if frac >= t.track_full {
                out.push(Bottleneck {
                    resource_type: "track",
                    resource_id: track.to_string(),
                    severity: Severity::Full,
                    utilization: frac,
                    threshold: t.track_full,
                    description: format!("track {track} reached {:.0}% of its length", frac * 100.0),
                });
            } else if frac > t.track_high {
                out.push(Bottleneck {
                    resource_type: "track",
                    resource_id: track.to_string(),
                    severity: Severity::NearlyFull,
                    utilization: frac,
                    threshold: t.track_high,
                    description: format!("track {track} peaked at {:.0}% of its length", frac * 100.0),
                });
            }
        }

        let fleet = self.fleet_busy_fraction(end_min);
        if !self.loco_history.is_empty() {
            if fleet > t.locomotive_over {
                out.push(Bottleneck {
                    resource_type: "locomotive",
                    resource_id: "fleet".to_string(),
                    severity: Severity::Overutilization,
                    utilization: fleet,
                    threshold: t.locomotive_over,
                    description: format!("locomotive fleet busy {:.0}% of the run", fleet * 100.0),
                });
            } else if fleet < t.locomotive_under {
                out.push(Bottleneck {
                    resource_type: "locomotive",
                    resource_id: "fleet".to_string(),
                    severity: Severity::Underutilization,
                    utilization: fleet,
                    threshold: t.locomotive_under,
                    description: format!("locomotive fleet busy only {:.0}% of the run", fleet * 100.0),
                });
            }
        }

        out
    }
}

const TAGS: &[EventTag] = &[
    EventTag::WorkshopStationOccupied,
    EventTag::WorkshopStationIdle,
    EventTag::TrackOccupancyChanged,
    EventTag::LocomotiveStatusChanged,
];

impl Collector for BottleneckCollector {
    fn name(&self) -> &'static str {
        "bottleneck"
    }

    fn handled_tags(&self) -> &'static [EventTag] {
        TAGS
    }

    fn record(&mut self, event: &DomainEvent) {
        match &event.kind {
            EventKind::WorkshopStationOccupied { workshop, station, .. } => {
                self.station_use
                    .entry(workshop.clone())
                    .or_default()
                    .open
                    .insert(*station, event.minute);
            }
            EventKind::WorkshopStationIdle { workshop, station } => {
                if let Some(state) = self.station_use.get_mut(workshop) {
                    if let Some(start) = state.open.swap_remove(station) {
                        state.busy_min += (event.minute - start).max(0.0);
                    }
                }
            }
            EventKind::TrackOccupancyChanged { track, occupied_m, total_m } => {
                let entry = self.track_peak.entry(track.clone()).or_insert((0.0, *total_m));
                entry.0 = entry.0.max(*occupied_m);
                entry.1 = *total_m;
            }
            EventKind::LocomotiveStatusChanged { loco, status } => {
                self.loco_history.entry(loco.clone()).or_default().push((event.minute, *status));
            }
            _ => {}
        }
    }

    fn results(&self, end_min: f64) -> Vec<Metric> {
        let detected = self.detect(end_min);
        vec![Metric::new("bottleneck", "flagged_resources", detected.len() as f64, Unit::Count)]
    }

    fn reset(&mut self) {
        self.station_use.clear();
        self.track_peak.clear();
        self.loco_history.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "bottleneck_tests.rs"]
mod tests;
