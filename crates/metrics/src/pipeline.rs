// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The standard pipeline: the mandatory collectors wired into one registry,
//! plus report assembly.

use crate::collector::CollectorRegistry;
use crate::collectors::bottleneck::{Bottleneck, BottleneckCollector, BottleneckThresholds};
use crate::collectors::locomotive::{LocoBreakdown, LocomotiveCollector};
use crate::collectors::movement::{LocationPoint, WagonMovementCollector};
use crate::collectors::occupancy::TrackOccupancyCollector;
use crate::collectors::wagon_flow::WagonFlowCollector;
use crate::collectors::workshop::{WorkshopCollector, WorkshopStats};
use crate::metric::MetricEntry;
use crate::timeseries::{TimePoint, DEFAULT_BUCKET_MIN};
use indexmap::IndexMap;
use serde::Serialize;
use ys_core::event::DomainEvent;
use ys_core::ids::{LocomotiveId, TrackId, WagonId, WorkshopId};

/// Metrics result: flat category map plus the structured per-resource views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub categories: IndexMap<&'static str, Vec<MetricEntry>>,
    pub per_locomotive: IndexMap<LocomotiveId, LocoBreakdown>,
    pub per_workshop: IndexMap<WorkshopId, WorkshopStats>,
    pub track_occupancy: IndexMap<TrackId, Vec<TimePoint>>,
    pub wagon_timelines: IndexMap<WagonId, Vec<LocationPoint>>,
    pub bottlenecks: Vec<Bottleneck>,
}

/// The mandatory collector set behind a single record entry point.
pub struct MetricsPipeline {
    registry: CollectorRegistry,
}

impl MetricsPipeline {
    /// Build the standard pipeline for a scenario's workshops.
    pub fn standard(
        workshops: impl IntoIterator<Item = (WorkshopId, usize)> + Clone,
        bucket_min: Option<f64>,
        thresholds: BottleneckThresholds,
    ) -> Self {
        let mut registry = CollectorRegistry::new();
        registry.register(WagonFlowCollector::new());
        registry.register(LocomotiveCollector::new());
        registry.register(WagonMovementCollector::new());
        registry.register(WorkshopCollector::new(workshops.clone()));
        registry.register(TrackOccupancyCollector::new(bucket_min.unwrap_or(DEFAULT_BUCKET_MIN)));
        registry.register(BottleneckCollector::new(workshops, thresholds));
        Self { registry }
    }

    pub fn record(&mut self, event: &DomainEvent) {
        self.registry.record(event);
    }

    /// Replay a recorded stream from scratch.
    pub fn replay<'a>(&mut self, events: impl IntoIterator<Item = &'a DomainEvent>) {
        self.registry.reset();
        for event in events {
            self.registry.record(event);
        }
    }

    pub fn reset(&mut self) {
        self.registry.reset();
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    /// Assemble the final report at `end_min`.
    pub fn report(&self, end_min: f64) -> MetricsReport {
        let mut categories: IndexMap<&'static str, Vec<MetricEntry>> = IndexMap::new();
        for metric in self.registry.results(end_min) {
            categories.entry(metric.category).or_default().push(metric.into());
        }

        let per_locomotive = self
            .registry
            .get::<LocomotiveCollector>()
            .map(|c| c.breakdowns(end_min))
            .unwrap_or_default();
        let per_workshop = self
            .registry
            .get::<WorkshopCollector>()
            .map(|c| c.stats(end_min))
            .unwrap_or_default();
        let track_occupancy = self
            .registry
            .get::<TrackOccupancyCollector>()
            .map(|c| c.series(end_min))
            .unwrap_or_default();
        let wagon_timelines = self
            .registry
            .get::<WagonMovementCollector>()
            .map(|c| c.timelines().clone())
            .unwrap_or_default();
        let bottlenecks = self
            .registry
            .get::<BottleneckCollector>()
            .map(|c| c.detect(end_min))
            .unwrap_or_default();

        MetricsReport {
            categories,
            per_locomotive,
            per_workshop,
            track_occupancy,
            wagon_timelines,
            bottlenecks,
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
