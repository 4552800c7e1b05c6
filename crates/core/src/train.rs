// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound trains.

use crate::ids::TrainId;
use crate::wagon::Wagon;

/// An inbound train: an arrival minute and its ordered wagons.
///
/// Immutable after scenario load; the arrival coordinator consumes each train
/// exactly once and takes ownership of its wagons.
#[derive(Debug, Clone)]
pub struct Train {
    pub id: TrainId,
    pub arrival_min: f64,
    pub wagons: Vec<Wagon>,
}

impl Train {
    pub fn new(id: TrainId, arrival_min: f64, wagons: Vec<Wagon>) -> Self {
        Self { id, arrival_min, wagons }
    }

    pub fn wagon_count(&self) -> usize {
        self.wagons.len()
    }
}
