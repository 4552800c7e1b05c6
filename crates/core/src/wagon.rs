// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wagon entity and its status machine.

use crate::coupler::CouplerType;
use crate::error::DomainError;
use crate::ids::{TrackId, WagonId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a wagon.
///
/// Transitions form a DAG; see [`WagonStatus::can_advance_to`]. `Moving`
/// occurs twice in a wagon's life (towards the workshop and towards
/// parking), which is why `Retrofitted -> Moving` and `Moving -> Retrofitted`
/// are both legal edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WagonStatus {
    Arrived,
    OnRetrofitTrack,
    Moving,
    AtWorkshop,
    Retrofitting,
    Retrofitted,
    Parking,
    Rejected,
}

impl WagonStatus {
    /// Whether the status machine permits moving from `self` to `next`.
    pub fn can_advance_to(self, next: WagonStatus) -> bool {
        use WagonStatus::*;
        matches!(
            (self, next),
            (Arrived, OnRetrofitTrack)
                | (Arrived, Rejected)
                | (OnRetrofitTrack, Moving)
                | (Moving, AtWorkshop)
                | (Moving, Retrofitted)
                | (Moving, Parking)
                | (AtWorkshop, Retrofitting)
                | (Retrofitting, Retrofitted)
                | (Retrofitted, Moving)
        )
    }

    /// Terminal statuses never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, WagonStatus::Parking | WagonStatus::Rejected)
    }
}

crate::simple_display! {
    WagonStatus {
        Arrived => "arrived",
        OnRetrofitTrack => "on_retrofit_track",
        Moving => "moving",
        AtWorkshop => "at_workshop",
        Retrofitting => "retrofitting",
        Retrofitted => "retrofitted",
        Parking => "parking",
        Rejected => "rejected",
    }
}

/// Why a wagon was turned away at arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Wagon already carries a DAC coupler.
    AlreadyDac,
    /// Loaded wagons are not converted.
    Loaded,
    /// Scenario did not flag the wagon for retrofit.
    NotFlagged,
    /// No room left on the chosen collection track.
    CollectionTrackFull,
}

crate::simple_display! {
    RejectReason {
        AlreadyDac => "already_dac",
        Loaded => "loaded",
        NotFlagged => "not_flagged",
        CollectionTrackFull => "collection_track_full",
    }
}

/// A single wagon, owned by the wagon registry from train arrival to the end
/// of the run. The `status` field is the single source of truth for where a
/// wagon stands in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wagon {
    pub id: WagonId,
    pub length_m: f64,
    pub needs_retrofit: bool,
    pub is_loaded: bool,
    pub coupler: CouplerType,
    /// Current track; `None` while the wagon is being moved.
    pub track: Option<TrackId>,
    pub status: WagonStatus,
    pub arrived_at: Option<f64>,
    pub retrofit_started_at: Option<f64>,
    pub retrofit_ended_at: Option<f64>,
}

impl Wagon {
    pub fn new(
        id: WagonId,
        length_m: f64,
        coupler: CouplerType,
        needs_retrofit: bool,
        is_loaded: bool,
    ) -> Result<Self, DomainError> {
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(DomainError::InvalidMeasure {
                entity: "wagon",
                id: id.to_string(),
                field: "length_m",
                value: length_m,
            });
        }
        Ok(Self {
            id,
            length_m,
            needs_retrofit,
            is_loaded,
            coupler,
            track: None,
            status: WagonStatus::Arrived,
            arrived_at: None,
            retrofit_started_at: None,
            retrofit_ended_at: None,
        })
    }

    /// Eligibility check applied when the wagon rolls off the hump.
    ///
    /// Returns the rejection reason, or `None` when the wagon should enter
    /// the retrofit pipeline.
    pub fn rejection_reason(&self) -> Option<RejectReason> {
        if self.coupler.is_dac() {
            Some(RejectReason::AlreadyDac)
        } else if self.is_loaded {
            Some(RejectReason::Loaded)
        } else if !self.needs_retrofit {
            Some(RejectReason::NotFlagged)
        } else {
            None
        }
    }

    /// Advance the status machine, failing loudly on a backward edge.
    pub fn advance(&mut self, next: WagonStatus) -> Result<(), DomainError> {
        if !self.status.can_advance_to(next) {
            return Err(DomainError::InvalidTransition {
                wagon: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "wagon_tests.rs"]
mod tests;
