// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrofit workshops.

use crate::error::DomainError;
use crate::ids::{TrackId, WorkshopId};
use serde::{Deserialize, Serialize};

/// A workshop attached to one workshop track, with a fixed number of
/// retrofit stations (bays). Concurrent retrofits never exceed the station
/// count; the station pool enforces this with a counted resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: WorkshopId,
    pub track: TrackId,
    pub retrofit_stations: usize,
}

impl Workshop {
    pub fn new(id: WorkshopId, track: TrackId, retrofit_stations: usize) -> Result<Self, DomainError> {
        if retrofit_stations == 0 {
            return Err(DomainError::InvalidMeasure {
                entity: "workshop",
                id: id.to_string(),
                field: "retrofit_stations",
                value: 0.0,
            });
        }
        Ok(Self { id, track, retrofit_stations })
    }
}
