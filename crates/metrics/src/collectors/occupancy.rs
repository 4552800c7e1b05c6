// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Track occupancy time series.

use crate::collector::Collector;
use crate::metric::{Metric, Unit};
use crate::timeseries::{bucketize, Fill, TimePoint};
use indexmap::IndexMap;
use std::any::Any;
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::TrackId;

struct TrackSeries {
    total_m: f64,
    peak_m: f64,
    samples: Vec<(f64, f64)>,
}

/// Records every occupancy change and aggregates per-track meter series into
/// fixed-width buckets (carry-forward fill).
pub struct TrackOccupancyCollector {
    bucket_min: f64,
    tracks: IndexMap<TrackId, TrackSeries>,
}

impl TrackOccupancyCollector {
    pub fn new(bucket_min: f64) -> Self {
        Self { bucket_min, tracks: IndexMap::new() }
    }

    /// Bucketed meters-occupied series per track.
    pub fn series(&self, end_min: f64) -> IndexMap<TrackId, Vec<TimePoint>> {
        self.tracks
            .iter()
            .map(|(id, s)| {
                (id.clone(), bucketize(&s.samples, self.bucket_min, end_min, Fill::CarryForward))
            })
            .collect()
    }

    /// Peak occupancy as a fraction of track length.
    pub fn peak_fraction(&self, track: &TrackId) -> f64 {
        self.tracks
            .get(track)
            .map(|s| if s.total_m > 0.0 { s.peak_m / s.total_m } else { 0.0 })
            .unwrap_or(0.0)
    }
}

impl Default for TrackOccupancyCollector {
    fn default() -> Self {
        Self::new(crate::timeseries::DEFAULT_BUCKET_MIN)
    }
}

const TAGS: &[EventTag] = &[EventTag::TrackOccupancyChanged];

impl Collector for TrackOccupancyCollector {
    fn name(&self) -> &'static str {
        "track_occupancy"
    }

    fn handled_tags(&self) -> &'static [EventTag] {
        TAGS
    }

    fn record(&mut self, event: &DomainEvent) {
        if let EventKind::TrackOccupancyChanged { track, occupied_m, total_m } = &event.kind {
            let series = self.tracks.entry(track.clone()).or_insert_with(|| TrackSeries {
                total_m: *total_m,
                peak_m: 0.0,
                samples: Vec::new(),
            });
            series.total_m = *total_m;
            series.peak_m = series.peak_m.max(*occupied_m);
            series.samples.push((event.minute, *occupied_m));
        }
    }

    fn results(&self, _end_min: f64) -> Vec<Metric> {
        let mut out = Vec::new();
        for (id, series) in &self.tracks {
            out.push(Metric::new("track", format!("{id}_peak"), series.peak_m, Unit::Meters));
            let peak_pct =
                if series.total_m > 0.0 { series.peak_m / series.total_m * 100.0 } else { 0.0 };
            out.push(Metric::new("track", format!("{id}_peak_utilization"), peak_pct, Unit::Percent));
        }
        out
    }

    fn reset(&mut self) {
        self.tracks.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
