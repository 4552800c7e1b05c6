// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wagon movement timelines — the raw input for Gantt-style charts.

use crate::collector::Collector;
use crate::metric::{Metric, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::{TrackId, WagonId};

/// One point of a wagon's timeline; `track` is `None` while in motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub minute: f64,
    pub track: Option<TrackId>,
}

#[derive(Default)]
pub struct WagonMovementCollector {
    timelines: IndexMap<WagonId, Vec<LocationPoint>>,
    moves: u64,
}

impl WagonMovementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timelines(&self) -> &IndexMap<WagonId, Vec<LocationPoint>> {
        &self.timelines
    }
}

const TAGS: &[EventTag] = &[EventTag::WagonArrived, EventTag::WagonLocationChanged];

impl Collector for WagonMovementCollector {
    fn name(&self) -> &'static str {
        "wagon_movement"
    }

    fn handled_tags(&self) -> &'static [EventTag] {
        TAGS
    }

    fn record(&mut self, event: &DomainEvent) {
        match &event.kind {
            EventKind::WagonArrived { wagon, track, .. } => {
                self.timelines
                    .entry(wagon.clone())
                    .or_default()
                    .push(LocationPoint { minute: event.minute, track: Some(track.clone()) });
            }
            EventKind::WagonLocationChanged { wagon, to, .. } => {
                self.moves += 1;
                self.timelines
                    .entry(wagon.clone())
                    .or_default()
                    .push(LocationPoint { minute: event.minute, track: to.clone() });
            }
            _ => {}
        }
    }

    fn results(&self, _end_min: f64) -> Vec<Metric> {
        vec![
            Metric::new("movement", "wagons_tracked", self.timelines.len() as f64, Unit::Count),
            Metric::new("movement", "location_changes", self.moves as f64, Unit::Count),
        ]
    }

    fn reset(&mut self) {
        self.timelines.clear();
        self.moves = 0;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
