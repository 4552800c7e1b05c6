// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ys-metrics: event-driven metrics pipeline.
//!
//! Collectors subscribe to the domain event stream and reconstruct
//! wagon-level and resource-level statistics from it. Every computation is a
//! pure function of the event stream plus the bucket size, so replaying a
//! recorded stream through a fresh pipeline reproduces a run's metrics
//! exactly.

pub mod collector;
pub mod collectors;
pub mod metric;
pub mod pipeline;
pub mod timeseries;

pub use collector::{Collector, CollectorRegistry};
pub use collectors::bottleneck::{Bottleneck, BottleneckCollector, BottleneckThresholds, Severity};
pub use collectors::locomotive::{LocoBreakdown, LocomotiveCollector};
pub use collectors::movement::{LocationPoint, WagonMovementCollector};
pub use collectors::occupancy::TrackOccupancyCollector;
pub use collectors::wagon_flow::WagonFlowCollector;
pub use collectors::workshop::{WorkshopCollector, WorkshopStats};
pub use metric::{Metric, MetricEntry, Unit};
pub use pipeline::{MetricsPipeline, MetricsReport};
pub use timeseries::{bucketize, Fill, TimePoint};
