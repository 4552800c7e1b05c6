// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collector capability and registry.

use crate::metric::Metric;
use std::any::Any;
use ys_core::event::{DomainEvent, EventTag};

/// A metrics collector plugged into the event stream.
///
/// Implementations declare the event kinds they handle, accumulate state in
/// `record`, and report metrics as a pure function of that state plus the
/// end-of-run minute.
pub trait Collector: 'static {
    fn name(&self) -> &'static str;

    /// Event kinds this collector wants. An empty slice subscribes to all.
    fn handled_tags(&self) -> &'static [EventTag];

    fn record(&mut self, event: &DomainEvent);

    fn results(&self, end_min: f64) -> Vec<Metric>;

    fn reset(&mut self);

    /// Downcast support for typed access to structured outputs.
    fn as_any(&self) -> &dyn Any;
}

/// Holds collectors and routes events to them in registration order.
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn Collector>>,
    events_routed: u64,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collector: impl Collector) {
        tracing::debug!(collector = collector.name(), "registered metrics collector");
        self.collectors.push(Box::new(collector));
    }

    pub fn record(&mut self, event: &DomainEvent) {
        let tag = event.tag();
        self.events_routed += 1;
        for collector in &mut self.collectors {
            let tags = collector.handled_tags();
            if tags.is_empty() || tags.contains(&tag) {
                collector.record(event);
            }
        }
    }

    /// All metrics from all collectors, in registration order.
    pub fn results(&self, end_min: f64) -> Vec<Metric> {
        self.collectors.iter().flat_map(|c| c.results(end_min)).collect()
    }

    pub fn reset(&mut self) {
        for collector in &mut self.collectors {
            collector.reset();
        }
        self.events_routed = 0;
    }

    /// Typed access to a registered collector.
    pub fn get<C: Collector>(&self) -> Option<&C> {
        self.collectors.iter().find_map(|c| c.as_any().downcast_ref::<C>())
    }

    pub fn events_routed(&self) -> u64 {
        self.events_routed
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
