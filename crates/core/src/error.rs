// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared across the workspace.

use crate::ids::{LocomotiveId, TrackId, WagonId, WorkshopId};
use crate::track::TrackKind;
use crate::wagon::WagonStatus;
use thiserror::Error;

/// Runtime domain faults.
///
/// These are programming errors when they surface mid-run: the offending
/// coordinator rolls back what it can and the fault is recorded, but the
/// simulation keeps running.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error(
        "track {track}: occupying {requested:.1} m would exceed capacity \
         ({occupied:.1}/{total:.1} m)"
    )]
    TrackOverflow { track: TrackId, occupied: f64, requested: f64, total: f64 },

    #[error("track {track}: vacating {requested:.1} m would underflow occupancy ({occupied:.1} m)")]
    TrackUnderflow { track: TrackId, occupied: f64, requested: f64 },

    #[error("wagon {wagon}: invalid status transition {from} -> {to}")]
    InvalidTransition { wagon: WagonId, from: WagonStatus, to: WagonStatus },

    #[error("wagon {0} is not registered")]
    UnknownWagon(WagonId),

    #[error("track {0} is not registered")]
    UnknownTrack(TrackId),

    #[error("workshop {0} is not registered")]
    UnknownWorkshop(WorkshopId),

    #[error("locomotive {0} is not registered")]
    UnknownLocomotive(LocomotiveId),

    #[error("{entity} {id}: {field} must be finite and non-negative, got {value}")]
    InvalidMeasure { entity: &'static str, id: String, field: &'static str, value: f64 },

    #[error("locomotive {loco}: status recorded at {at:.1} min before previous point {prev:.1} min")]
    HistoryRewind { loco: LocomotiveId, prev: f64, at: f64 },
}

/// Static configuration faults, detected before the run starts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("scenario id {0:?} must match [A-Za-z0-9_-]{{1,50}}")]
    InvalidScenarioId(String),

    #[error("scenario {id}: end_date must be after start_date")]
    EmptyTimeWindow { id: String },

    #[error("scenario must define at least one {0}")]
    MissingCollection(&'static str),

    #[error("scenario has no track of type {0}")]
    MissingTrackKind(TrackKind),

    #[error("workshop {workshop} references unknown track {track}")]
    UnknownWorkshopTrack { workshop: WorkshopId, track: TrackId },

    #[error("workshop {workshop} track {track} is not a workshop track")]
    WrongWorkshopTrackKind { workshop: WorkshopId, track: TrackId },

    #[error("locomotive {loco} references unknown track {track}")]
    UnknownLocomotiveTrack { loco: LocomotiveId, track: TrackId },

    #[error("route {route} references unknown track {track}")]
    UnknownRouteTrack { route: String, track: TrackId },

    #[error("route {route} needs at least two tracks in its sequence")]
    ShortRoute { route: String },

    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}
