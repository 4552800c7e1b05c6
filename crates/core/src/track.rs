// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Yard tracks with metered capacity.

use crate::error::DomainError;
use crate::ids::TrackId;
use serde::{Deserialize, Serialize};

/// Tolerance for capacity comparisons; occupancy arithmetic accumulates
/// f64 rounding over many add/remove cycles.
pub const CAPACITY_EPS_M: f64 = 1e-9;

/// Functional role of a track in the yard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Parking,
    Collection,
    Retrofit,
    Retrofitted,
    Workshop,
}

crate::simple_display! {
    TrackKind {
        Parking => "parking",
        Collection => "collection",
        Retrofit => "retrofit",
        Retrofitted => "retrofitted",
        Workshop => "workshop",
    }
}

/// A named track with a total length and current occupancy in meters.
///
/// Invariant: `0 <= occupied_m <= length_m` at every observable moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub kind: TrackKind,
    pub length_m: f64,
    occupied_m: f64,
    /// Neighboring tracks, for route cost lookup.
    #[serde(default)]
    pub edges: Vec<TrackId>,
}

impl Track {
    pub fn new(
        id: TrackId,
        kind: TrackKind,
        length_m: f64,
        edges: Vec<TrackId>,
    ) -> Result<Self, DomainError> {
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(DomainError::InvalidMeasure {
                entity: "track",
                id: id.to_string(),
                field: "length_m",
                value: length_m,
            });
        }
        Ok(Self { id, kind, length_m, occupied_m: 0.0, edges })
    }

    pub fn occupied_m(&self) -> f64 {
        self.occupied_m
    }

    pub fn available_m(&self) -> f64 {
        (self.length_m - self.occupied_m).max(0.0)
    }

    /// Pure check; `can_fit(0.0)` is true even on a full track.
    pub fn can_fit(&self, length_m: f64) -> bool {
        self.occupied_m + length_m <= self.length_m + CAPACITY_EPS_M
    }

    pub fn occupy(&mut self, length_m: f64) -> Result<(), DomainError> {
        if !self.can_fit(length_m) {
            return Err(DomainError::TrackOverflow {
                track: self.id.clone(),
                occupied: self.occupied_m,
                requested: length_m,
                total: self.length_m,
            });
        }
        self.occupied_m = (self.occupied_m + length_m).min(self.length_m);
        Ok(())
    }

    pub fn vacate(&mut self, length_m: f64) -> Result<(), DomainError> {
        if length_m > self.occupied_m + CAPACITY_EPS_M {
            return Err(DomainError::TrackUnderflow {
                track: self.id.clone(),
                occupied: self.occupied_m,
                requested: length_m,
            });
        }
        self.occupied_m = (self.occupied_m - length_m).max(0.0);
        Ok(())
    }

    /// Occupancy as a 0..=1 fraction of total length.
    pub fn utilization(&self) -> f64 {
        if self.length_m > 0.0 {
            self.occupied_m / self.length_m
        } else {
            0.0
        }
    }
}

#[cfg(test)]
#[path = "track_tests.rs"]
mod tests;
