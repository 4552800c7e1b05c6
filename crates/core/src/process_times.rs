// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named process durations, fixed per scenario.

use crate::coupler::CouplerType;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Process timing configuration, all values in fractional minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessTimes {
    /// Time from train arrival to the first wagon at the hump.
    pub train_to_hump_min: f64,
    /// Time between consecutive wagons passing the hump.
    pub wagon_hump_interval_min: f64,
    pub screw_coupling_min: f64,
    pub screw_decoupling_min: f64,
    pub dac_coupling_min: f64,
    pub dac_decoupling_min: f64,
    /// Shunt between neighboring stations while coupling a batch.
    pub wagon_move_to_next_station_min: f64,
    /// Time to retrofit one wagon at a station.
    pub wagon_retrofit_min: f64,
    /// Rest applied at parking before the locomotive takes the next trip.
    pub loco_parking_delay_min: f64,
}

impl Default for ProcessTimes {
    fn default() -> Self {
        Self {
            train_to_hump_min: 10.0,
            wagon_hump_interval_min: 2.0,
            screw_coupling_min: 1.0,
            screw_decoupling_min: 1.0,
            dac_coupling_min: 0.5,
            dac_decoupling_min: 0.5,
            wagon_move_to_next_station_min: 0.5,
            wagon_retrofit_min: 60.0,
            loco_parking_delay_min: 0.0,
        }
    }
}

impl ProcessTimes {
    /// Per-wagon coupling time for a coupler type. Hybrid stock handles like
    /// screw-coupled stock.
    pub fn coupling_min(&self, coupler: CouplerType) -> f64 {
        match coupler {
            CouplerType::Dac => self.dac_coupling_min,
            CouplerType::Screw | CouplerType::Hybrid => self.screw_coupling_min,
        }
    }

    pub fn decoupling_min(&self, coupler: CouplerType) -> f64 {
        match coupler {
            CouplerType::Dac => self.dac_decoupling_min,
            CouplerType::Screw | CouplerType::Hybrid => self.screw_decoupling_min,
        }
    }

    /// All durations must be finite and non-negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("train_to_hump_min", self.train_to_hump_min),
            ("wagon_hump_interval_min", self.wagon_hump_interval_min),
            ("screw_coupling_min", self.screw_coupling_min),
            ("screw_decoupling_min", self.screw_decoupling_min),
            ("dac_coupling_min", self.dac_coupling_min),
            ("dac_decoupling_min", self.dac_decoupling_min),
            ("wagon_move_to_next_station_min", self.wagon_move_to_next_station_min),
            ("wagon_retrofit_min", self.wagon_retrofit_min),
            ("loco_parking_delay_min", self.loco_parking_delay_min),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidMeasure {
                    entity: "process_times",
                    id: String::new(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// All-zero durations except the given retrofit time; used by tests to
    /// isolate transport and retrofit timing.
    #[cfg(any(test, feature = "test-support"))]
    pub fn zeroed_with_retrofit(retrofit_min: f64) -> Self {
        Self {
            train_to_hump_min: 0.0,
            wagon_hump_interval_min: 0.0,
            screw_coupling_min: 0.0,
            screw_decoupling_min: 0.0,
            dac_coupling_min: 0.0,
            dac_decoupling_min: 0.0,
            wagon_move_to_next_station_min: 0.0,
            wagon_retrofit_min: retrofit_min,
            loco_parking_delay_min: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "process_times_tests.rs"]
mod tests;
