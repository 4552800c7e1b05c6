// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-width bucket aggregation for time series.

use serde::{Deserialize, Serialize};

/// Default aggregation bucket: one hour of simulated time.
pub const DEFAULT_BUCKET_MIN: f64 = 60.0;

/// How to fill buckets without a sample of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Empty buckets read as zero.
    Zero,
    /// Empty buckets repeat the last observed value.
    CarryForward,
}

/// One aggregated sample: the bucket's start minute and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub minute: f64,
    pub value: f64,
}

/// Aggregate `(minute, value)` samples into fixed-width buckets covering
/// `[0, end_min]`.
///
/// Each bucket reports the last sample at or before the bucket's end. This
/// is a pure function: the same samples and bucket size always produce the
/// same series.
pub fn bucketize(samples: &[(f64, f64)], bucket_min: f64, end_min: f64, fill: Fill) -> Vec<TimePoint> {
    if bucket_min <= 0.0 || end_min < 0.0 {
        return Vec::new();
    }
    let buckets = (end_min / bucket_min).ceil().max(1.0) as usize;
    let mut out = Vec::with_capacity(buckets);
    let mut idx = 0usize;
    let mut last: Option<f64> = None;
    for b in 0..buckets {
        let bucket_end = (b as f64 + 1.0) * bucket_min;
        while idx < samples.len() && samples[idx].0 <= bucket_end {
            last = Some(samples[idx].1);
            idx += 1;
        }
        let value = match (last, fill) {
            (Some(v), _) => v,
            (None, Fill::Zero) => 0.0,
            (None, Fill::CarryForward) => 0.0,
        };
        out.push(TimePoint { minute: b as f64 * bucket_min, value });
        if fill == Fill::Zero {
            // Zero-fill series only carry samples inside their own bucket.
            if idx >= samples.len() || samples[idx].0 > bucket_end {
                last = None;
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "timeseries_tests.rs"]
mod tests;
