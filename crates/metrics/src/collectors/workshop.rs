// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-workshop completion, timing, and utilization metrics.

use crate::collector::Collector;
use crate::metric::{Metric, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::{WagonId, WorkshopId};

/// Aggregated per-workshop statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkshopStats {
    pub completed: u64,
    pub total_retrofit_min: f64,
    pub total_waiting_min: f64,
    pub throughput_per_hour: f64,
    pub utilization_pct: f64,
}

#[derive(Default)]
struct WorkshopState {
    stations: usize,
    completed: u64,
    total_retrofit_min: f64,
    total_waiting_min: f64,
    busy_min: f64,
    /// Open station occupations: station index -> start minute.
    open: IndexMap<usize, f64>,
}

pub struct WorkshopCollector {
    workshops: IndexMap<WorkshopId, WorkshopState>,
    /// Delivery minute per wagon, for waiting-time measurement.
    delivered_at: IndexMap<WagonId, f64>,
}

impl WorkshopCollector {
    /// Collectors need the station counts to compute utilization; the
    /// pipeline passes them in from the scenario.
    pub fn new(workshops: impl IntoIterator<Item = (WorkshopId, usize)>) -> Self {
        Self {
            workshops: workshops
                .into_iter()
                .map(|(id, stations)| (id, WorkshopState { stations, ..WorkshopState::default() }))
                .collect(),
            delivered_at: IndexMap::new(),
        }
    }

    /// Station-busy minutes including occupations still open at `end_min`.
    fn busy_min_at(state: &WorkshopState, end_min: f64) -> f64 {
        let open: f64 = state.open.values().map(|start| (end_min - start).max(0.0)).sum();
        state.busy_min + open
    }

    pub fn stats(&self, end_min: f64) -> IndexMap<WorkshopId, WorkshopStats> {
        let hours = (end_min / 60.0).max(1e-9);
        self.workshops
            .iter()
            .map(|(id, state)| {
                let busy = Self::busy_min_at(state, end_min);
                let capacity_min = state.stations as f64 * end_min;
                (
                    id.clone(),
                    WorkshopStats {
                        completed: state.completed,
                        total_retrofit_min: state.total_retrofit_min,
                        total_waiting_min: state.total_waiting_min,
                        throughput_per_hour: state.completed as f64 / hours,
                        utilization_pct: if capacity_min > 0.0 {
                            busy / capacity_min * 100.0
                        } else {
                            0.0
                        },
                    },
                )
            })
            .collect()
    }

    pub fn completed(&self, workshop: &WorkshopId) -> u64 {
        self.workshops.get(workshop).map_or(0, |s| s.completed)
    }
}

const TAGS: &[EventTag] = &[
    EventTag::WagonDelivered,
    EventTag::WorkshopStationOccupied,
    EventTag::WorkshopStationIdle,
    EventTag::WagonRetrofitted,
];

impl Collector for WorkshopCollector {
    fn name(&self) -> &'static str {
        "workshop"
    }

    fn handled_tags(&self) -> &'static [EventTag] {
        TAGS
    }

    fn record(&mut self, event: &DomainEvent) {
        match &event.kind {
            EventKind::WagonDelivered { wagon, .. } => {
                self.delivered_at.insert(wagon.clone(), event.minute);
            }
            EventKind::WorkshopStationOccupied { workshop, station, wagon } => {
                if let Some(state) = self.workshops.get_mut(workshop) {
                    state.open.insert(*station, event.minute);
                    if let Some(delivered) = self.delivered_at.swap_remove(wagon) {
                        state.total_waiting_min += (event.minute - delivered).max(0.0);
                    }
                }
            }
            EventKind::WorkshopStationIdle { workshop, station } => {
                if let Some(state) = self.workshops.get_mut(workshop) {
                    if let Some(start) = state.open.swap_remove(station) {
                        state.busy_min += (event.minute - start).max(0.0);
                    }
                }
            }
            EventKind::WagonRetrofitted { workshop, duration_min, .. } => {
                if let Some(state) = self.workshops.get_mut(workshop) {
                    state.completed += 1;
                    state.total_retrofit_min += duration_min;
                }
            }
            _ => {}
        }
    }

    fn results(&self, end_min: f64) -> Vec<Metric> {
        let mut out = Vec::new();
        for (id, stats) in self.stats(end_min) {
            out.push(Metric::new("workshop", format!("{id}_completed"), stats.completed as f64, Unit::Count));
            out.push(Metric::new(
                "workshop",
                format!("{id}_retrofit_time"),
                stats.total_retrofit_min,
                Unit::Minutes,
            ));
            out.push(Metric::new(
                "workshop",
                format!("{id}_waiting_time"),
                stats.total_waiting_min,
                Unit::Minutes,
            ));
            out.push(Metric::new(
                "workshop",
                format!("{id}_throughput"),
                stats.throughput_per_hour,
                Unit::PerHour,
            ));
            out.push(Metric::new(
                "workshop",
                format!("{id}_utilization"),
                stats.utilization_pct,
                Unit::Percent,
            ));
        }
        out
    }

    fn reset(&mut self) {
        for state in self.workshops.values_mut() {
            let stations = state.stations;
            *state = WorkshopState { stations, ..WorkshopState::default() };
        }
        self.delivered_at.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "workshop_tests.rs"]
mod tests;
