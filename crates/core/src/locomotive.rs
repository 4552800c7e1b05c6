// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shunting locomotives and their status history.

use crate::error::DomainError;
use crate::ids::{LocomotiveId, TrackId};
use serde::{Deserialize, Serialize};

/// Activity status of a locomotive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocoStatus {
    Parking,
    Moving,
    Coupling,
    Decoupling,
}

crate::simple_display! {
    LocoStatus {
        Parking => "parking",
        Moving => "moving",
        Coupling => "coupling",
        Decoupling => "decoupling",
    }
}

/// Append-only sequence of `(minute, status)` points.
///
/// Sufficient to reconstruct utilization intervals: each point opens an
/// interval that the next point (or the end of the run) closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusHistory {
    points: Vec<(f64, LocoStatus)>,
}

impl StatusHistory {
    pub fn record(&mut self, loco: &LocomotiveId, at: f64, status: LocoStatus) -> Result<(), DomainError> {
        if let Some(&(prev, _)) = self.points.last() {
            if at < prev {
                return Err(DomainError::HistoryRewind { loco: loco.clone(), prev, at });
            }
        }
        self.points.push((at, status));
        Ok(())
    }

    pub fn points(&self) -> &[(f64, LocoStatus)] {
        &self.points
    }

    /// Closed intervals `(status, start, end)` up to `end_min`.
    pub fn intervals(&self, end_min: f64) -> Vec<(LocoStatus, f64, f64)> {
        let mut out = Vec::with_capacity(self.points.len());
        for (i, &(start, status)) in self.points.iter().enumerate() {
            let end = self.points.get(i + 1).map_or(end_min, |&(t, _)| t);
            if end > start {
                out.push((status, start, end));
            }
        }
        out
    }
}

/// A shunting locomotive. Exclusive while allocated from the pool.
#[derive(Debug, Clone)]
pub struct Locomotive {
    pub id: LocomotiveId,
    pub home_track: TrackId,
    pub track: TrackId,
    pub max_wagons: usize,
    pub status: LocoStatus,
    pub history: StatusHistory,
}

impl Locomotive {
    pub fn new(id: LocomotiveId, home_track: TrackId, max_wagons: usize) -> Self {
        Self {
            id,
            track: home_track.clone(),
            home_track,
            max_wagons,
            status: LocoStatus::Parking,
            history: StatusHistory::default(),
        }
    }

    /// Record a status change at `at` minutes, updating the live status.
    pub fn set_status(&mut self, at: f64, status: LocoStatus) -> Result<(), DomainError> {
        let id = self.id.clone();
        self.history.record(&id, at, status)?;
        self.status = status;
        Ok(())
    }
}

#[cfg(test)]
#[path = "locomotive_tests.rs"]
mod tests;
