// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wagon flow-time metrics.
//!
//! Flow time runs from `wagon:delivered` (placement on a retrofit track) to
//! `wagon:retrofitted`.

use crate::collector::Collector;
use crate::metric::{Metric, Unit};
use indexmap::IndexMap;
use std::any::Any;
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::WagonId;

#[derive(Default)]
pub struct WagonFlowCollector {
    start_times: IndexMap<WagonId, f64>,
    total_flow_min: f64,
    flow_count: u64,
    delivered: u64,
    retrofitted: u64,
    rejected: u64,
    rejected_by_reason: IndexMap<&'static str, u64>,
}

impl WagonFlowCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn average_flow_min(&self) -> f64 {
        if self.flow_count > 0 {
            self.total_flow_min / self.flow_count as f64
        } else {
            0.0
        }
    }

    pub fn retrofitted(&self) -> u64 {
        self.retrofitted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

const TAGS: &[EventTag] =
    &[EventTag::WagonDelivered, EventTag::WagonRetrofitted, EventTag::WagonRejected];

impl Collector for WagonFlowCollector {
    fn name(&self) -> &'static str {
        "wagon_flow"
    }

    fn handled_tags(&self) -> &'static [EventTag] {
        TAGS
    }

    fn record(&mut self, event: &DomainEvent) {
        match &event.kind {
            EventKind::WagonDelivered { wagon, .. } => {
                self.delivered += 1;
                self.start_times.insert(wagon.clone(), event.minute);
            }
            EventKind::WagonRetrofitted { wagon, .. } => {
                self.retrofitted += 1;
                if let Some(start) = self.start_times.swap_remove(wagon) {
                    self.total_flow_min += event.minute - start;
                    self.flow_count += 1;
                }
            }
            EventKind::WagonRejected { wagon, reason } => {
                self.rejected += 1;
                self.start_times.swap_remove(wagon);
                let key = match reason {
                    ys_core::wagon::RejectReason::AlreadyDac => "already_dac",
                    ys_core::wagon::RejectReason::Loaded => "loaded",
                    ys_core::wagon::RejectReason::NotFlagged => "not_flagged",
                    ys_core::wagon::RejectReason::CollectionTrackFull => "collection_track_full",
                };
                *self.rejected_by_reason.entry(key).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    fn results(&self, _end_min: f64) -> Vec<Metric> {
        let mut out = vec![
            Metric::new("wagon", "avg_flow_time", self.average_flow_min(), Unit::Minutes),
            Metric::new("wagon", "total_flow_time", self.total_flow_min, Unit::Minutes),
            Metric::new("wagon", "wagons_delivered", self.delivered as f64, Unit::Count),
            Metric::new("wagon", "wagons_retrofitted", self.retrofitted as f64, Unit::Count),
            Metric::new("wagon", "wagons_rejected", self.rejected as f64, Unit::Count),
        ];
        for (reason, count) in &self.rejected_by_reason {
            out.push(Metric::new("wagon", format!("rejected_{reason}"), *count as f64, Unit::Count));
        }
        out
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "wagon_flow_tests.rs"]
mod tests;
