// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events — the authoritative output of a simulation run.
//!
//! Every state change of interest is published as a [`DomainEvent`]. The
//! ordered event stream is what metrics, exporters, and tests consume; the
//! total order is emission order, which coincides with non-decreasing
//! simulated timestamps.

use crate::coupler::CouplerType;
use crate::ids::{EventId, LocomotiveId, TrackId, TrainId, WagonId, WorkshopId};
use crate::locomotive::LocoStatus;
use crate::wagon::{RejectReason, WagonStatus};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// An immutable, timestamped domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: EventId,
    /// Simulated minutes since the scenario origin.
    pub minute: f64,
    /// Which part of the yard emitted the event.
    pub context: SmolStr,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl DomainEvent {
    pub fn tag(&self) -> EventTag {
        self.kind.tag()
    }
}

/// Event payloads.
///
/// Serializes with `{"type": "wagon:arrived", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    // -- train --
    #[serde(rename = "train:arrived")]
    TrainArrived { train: TrainId, wagons: usize },

    // -- wagon --
    /// Wagon physically arrived on a track.
    #[serde(rename = "wagon:arrived")]
    WagonArrived { wagon: WagonId, track: TrackId, status: WagonStatus },

    /// Wagon placed on a retrofit track and handed to a workshop queue;
    /// flow-time measurement starts here.
    #[serde(rename = "wagon:delivered")]
    WagonDelivered { wagon: WagonId, track: TrackId },

    #[serde(rename = "wagon:location_changed")]
    WagonLocationChanged {
        wagon: WagonId,
        from: Option<TrackId>,
        to: Option<TrackId>,
    },

    #[serde(rename = "wagon:retrofitted")]
    WagonRetrofitted {
        wagon: WagonId,
        workshop: WorkshopId,
        duration_min: f64,
        coupler: CouplerType,
    },

    #[serde(rename = "wagon:rejected")]
    WagonRejected { wagon: WagonId, reason: RejectReason },

    // -- locomotive --
    #[serde(rename = "loco:status_changed")]
    LocomotiveStatusChanged { loco: LocomotiveId, status: LocoStatus },

    #[serde(rename = "loco:movement_started")]
    LocomotiveMovementStarted { loco: LocomotiveId, from: TrackId, to: TrackId },

    #[serde(rename = "loco:movement_completed")]
    LocomotiveMovementCompleted { loco: LocomotiveId, from: TrackId, to: TrackId },

    // -- workshop --
    #[serde(rename = "workshop:station_occupied")]
    WorkshopStationOccupied { workshop: WorkshopId, station: usize, wagon: WagonId },

    #[serde(rename = "workshop:station_idle")]
    WorkshopStationIdle { workshop: WorkshopId, station: usize },

    // -- resources --
    #[serde(rename = "resource:allocated")]
    ResourceAllocated { resource: String, id: String, purpose: String },

    #[serde(rename = "resource:released")]
    ResourceReleased { resource: String, id: String },

    // -- track --
    #[serde(rename = "track:occupancy_changed")]
    TrackOccupancyChanged { track: TrackId, occupied_m: f64, total_m: f64 },

    // -- lifecycle --
    #[serde(rename = "simulation:started")]
    SimulationStarted { scenario: String },

    #[serde(rename = "simulation:ended")]
    SimulationEnded { duration_min: f64 },

    #[serde(rename = "simulation:failed")]
    SimulationFailed { message: String },
}

impl EventKind {
    /// Event name for log lines, matching the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::TrainArrived { .. } => "train:arrived",
            EventKind::WagonArrived { .. } => "wagon:arrived",
            EventKind::WagonDelivered { .. } => "wagon:delivered",
            EventKind::WagonLocationChanged { .. } => "wagon:location_changed",
            EventKind::WagonRetrofitted { .. } => "wagon:retrofitted",
            EventKind::WagonRejected { .. } => "wagon:rejected",
            EventKind::LocomotiveStatusChanged { .. } => "loco:status_changed",
            EventKind::LocomotiveMovementStarted { .. } => "loco:movement_started",
            EventKind::LocomotiveMovementCompleted { .. } => "loco:movement_completed",
            EventKind::WorkshopStationOccupied { .. } => "workshop:station_occupied",
            EventKind::WorkshopStationIdle { .. } => "workshop:station_idle",
            EventKind::ResourceAllocated { .. } => "resource:allocated",
            EventKind::ResourceReleased { .. } => "resource:released",
            EventKind::TrackOccupancyChanged { .. } => "track:occupancy_changed",
            EventKind::SimulationStarted { .. } => "simulation:started",
            EventKind::SimulationEnded { .. } => "simulation:ended",
            EventKind::SimulationFailed { .. } => "simulation:failed",
        }
    }

    pub fn tag(&self) -> EventTag {
        EventTag::from(self)
    }
}

/// Tag-only variant of [`EventKind`] for subscriber registration and
/// collector dispatch (strips associated data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    TrainArrived,
    WagonArrived,
    WagonDelivered,
    WagonLocationChanged,
    WagonRetrofitted,
    WagonRejected,
    LocomotiveStatusChanged,
    LocomotiveMovementStarted,
    LocomotiveMovementCompleted,
    WorkshopStationOccupied,
    WorkshopStationIdle,
    ResourceAllocated,
    ResourceReleased,
    TrackOccupancyChanged,
    SimulationStarted,
    SimulationEnded,
    SimulationFailed,
}

impl From<&EventKind> for EventTag {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::TrainArrived { .. } => EventTag::TrainArrived,
            EventKind::WagonArrived { .. } => EventTag::WagonArrived,
            EventKind::WagonDelivered { .. } => EventTag::WagonDelivered,
            EventKind::WagonLocationChanged { .. } => EventTag::WagonLocationChanged,
            EventKind::WagonRetrofitted { .. } => EventTag::WagonRetrofitted,
            EventKind::WagonRejected { .. } => EventTag::WagonRejected,
            EventKind::LocomotiveStatusChanged { .. } => EventTag::LocomotiveStatusChanged,
            EventKind::LocomotiveMovementStarted { .. } => EventTag::LocomotiveMovementStarted,
            EventKind::LocomotiveMovementCompleted { .. } => EventTag::LocomotiveMovementCompleted,
            EventKind::WorkshopStationOccupied { .. } => EventTag::WorkshopStationOccupied,
            EventKind::WorkshopStationIdle { .. } => EventTag::WorkshopStationIdle,
            EventKind::ResourceAllocated { .. } => EventTag::ResourceAllocated,
            EventKind::ResourceReleased { .. } => EventTag::ResourceReleased,
            EventKind::TrackOccupancyChanged { .. } => EventTag::TrackOccupancyChanged,
            EventKind::SimulationStarted { .. } => EventTag::SimulationStarted,
            EventKind::SimulationEnded { .. } => EventTag::SimulationEnded,
            EventKind::SimulationFailed { .. } => EventTag::SimulationFailed,
        }
    }
}

#[cfg(test)]
#[path = "../event_tests.rs"]
mod tests;
