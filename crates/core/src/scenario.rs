// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario configuration record (§6.1 surface).
//!
//! The core never reads files: an external loader hands this structure to
//! the orchestrator. Validation here covers the static faults that must
//! refuse a run before the clock starts.

use crate::coupler::CouplerType;
use crate::error::ConfigError;
use crate::ids::{LocomotiveId, TrackId, TrainId, WagonId, WorkshopId};
use crate::process_times::ProcessTimes;
use crate::track::TrackKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Strategy for picking a track out of a set of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackSelection {
    RoundRobin,
    #[default]
    LeastOccupied,
    FirstAvailable,
    Random,
}

crate::simple_display! {
    TrackSelection {
        RoundRobin => "round_robin",
        LeastOccupied => "least_occupied",
        FirstAvailable => "first_available",
        Random => "random",
    }
}

/// Where a locomotive goes after dropping a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocoDelivery {
    #[default]
    ReturnToParking,
    DirectDelivery,
}

/// How locomotive work is prioritized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocoPriority {
    #[default]
    WorkshopPriority,
    BatchCompletion,
}

fn default_max_capacity() -> usize {
    10
}

fn default_needs_retrofit() -> bool {
    true
}

/// One wagon of an inbound train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagonSpec {
    pub id: WagonId,
    pub length: f64,
    #[serde(default)]
    pub is_loaded: bool,
    #[serde(default = "default_needs_retrofit")]
    pub needs_retrofit: bool,
    pub coupler_type: CouplerType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSpec {
    pub id: TrainId,
    pub arrival_time: DateTime<Utc>,
    pub wagons: Vec<WagonSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub id: TrackId,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub length: f64,
    #[serde(default)]
    pub edges: Vec<TrackId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotiveSpec {
    pub id: LocomotiveId,
    pub track: TrackId,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopSpec {
    pub id: WorkshopId,
    pub track: TrackId,
    pub retrofit_stations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub id: String,
    pub track_sequence: Vec<TrackId>,
    pub duration_minutes: f64,
}

/// Complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub track_selection_strategy: TrackSelection,
    #[serde(default)]
    pub retrofit_selection_strategy: TrackSelection,
    #[serde(default)]
    pub workshop_selection_strategy: TrackSelection,
    #[serde(default)]
    pub parking_selection_strategy: TrackSelection,
    #[serde(default)]
    pub loco_delivery_strategy: LocoDelivery,
    #[serde(default)]
    pub loco_priority_strategy: LocoPriority,
    /// Seed for the `random` selection strategy, so runs stay reproducible.
    #[serde(default)]
    pub random_seed: u64,

    pub locomotives: Vec<LocomotiveSpec>,
    pub tracks: Vec<TrackSpec>,
    pub workshops: Vec<WorkshopSpec>,
    #[serde(default)]
    pub trains: Vec<TrainSpec>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub process_times: ProcessTimes,
}

impl Scenario {
    /// Simulation horizon in minutes.
    pub fn duration_minutes(&self) -> f64 {
        (self.end_date - self.start_date).num_seconds() as f64 / 60.0
    }

    /// Minutes between the scenario origin and `t` (negative when earlier).
    pub fn minutes_from_start(&self, t: DateTime<Utc>) -> f64 {
        (t - self.start_date).num_seconds() as f64 / 60.0
    }

    fn tracks_of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &TrackSpec> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }

    /// Static validation; a failing scenario must not start a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty()
            || self.id.len() > 50
            || !self.id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::InvalidScenarioId(self.id.clone()));
        }
        if self.end_date <= self.start_date {
            return Err(ConfigError::EmptyTimeWindow { id: self.id.clone() });
        }
        if self.tracks.is_empty() {
            return Err(ConfigError::MissingCollection("track"));
        }
        if self.locomotives.is_empty() {
            return Err(ConfigError::MissingCollection("locomotive"));
        }
        if self.workshops.is_empty() {
            return Err(ConfigError::MissingCollection("workshop"));
        }
        for kind in [TrackKind::Collection, TrackKind::Retrofit, TrackKind::Retrofitted, TrackKind::Parking]
        {
            if self.tracks_of_kind(kind).next().is_none() {
                return Err(ConfigError::MissingTrackKind(kind));
            }
        }

        let mut track_ids: HashSet<&TrackId> = HashSet::new();
        for track in &self.tracks {
            if !track_ids.insert(&track.id) {
                return Err(ConfigError::DuplicateId {
                    entity: "track",
                    id: track.id.to_string(),
                });
            }
        }
        for workshop in &self.workshops {
            let Some(spec) = self.tracks.iter().find(|t| t.id == workshop.track) else {
                return Err(ConfigError::UnknownWorkshopTrack {
                    workshop: workshop.id.clone(),
                    track: workshop.track.clone(),
                });
            };
            if spec.kind != TrackKind::Workshop {
                return Err(ConfigError::WrongWorkshopTrackKind {
                    workshop: workshop.id.clone(),
                    track: workshop.track.clone(),
                });
            }
        }
        for loco in &self.locomotives {
            if !track_ids.contains(&loco.track) {
                return Err(ConfigError::UnknownLocomotiveTrack {
                    loco: loco.id.clone(),
                    track: loco.track.clone(),
                });
            }
        }
        for route in &self.routes {
            if route.track_sequence.len() < 2 {
                return Err(ConfigError::ShortRoute { route: route.id.clone() });
            }
            for track in &route.track_sequence {
                if !track_ids.contains(track) {
                    return Err(ConfigError::UnknownRouteTrack {
                        route: route.id.clone(),
                        track: track.clone(),
                    });
                }
            }
        }
        self.process_times.validate()?;
        Ok(())
    }
}

crate::builder! {
    pub struct ScenarioBuilder => Scenario {
        into { id: String = "test" }
        set {
            start_date: DateTime<Utc> = DateTime::UNIX_EPOCH,
            end_date: DateTime<Utc> = DateTime::UNIX_EPOCH + chrono::Duration::hours(24),
            track_selection_strategy: TrackSelection = TrackSelection::LeastOccupied,
            retrofit_selection_strategy: TrackSelection = TrackSelection::LeastOccupied,
            workshop_selection_strategy: TrackSelection = TrackSelection::RoundRobin,
            parking_selection_strategy: TrackSelection = TrackSelection::LeastOccupied,
            loco_delivery_strategy: LocoDelivery = LocoDelivery::ReturnToParking,
            loco_priority_strategy: LocoPriority = LocoPriority::WorkshopPriority,
            random_seed: u64 = 0,
            locomotives: Vec<LocomotiveSpec> = Vec::new(),
            tracks: Vec<TrackSpec> = Vec::new(),
            workshops: Vec<WorkshopSpec> = Vec::new(),
            trains: Vec<TrainSpec> = Vec::new(),
            routes: Vec<RouteSpec> = Vec::new(),
            process_times: ProcessTimes = ProcessTimes::default(),
        }
    }
}

/// Incremental helpers layered over the generated whole-field setters.
#[cfg(any(test, feature = "test-support"))]
impl ScenarioBuilder {
    /// A builder for an empty yard with a 24 h window starting at the Unix
    /// epoch.
    pub fn new(id: &str) -> Self {
        Scenario::builder().id(id)
    }

    /// Shrink or grow the window to `minutes` past the start.
    pub fn duration_minutes(mut self, minutes: f64) -> Self {
        self.end_date = self.start_date + chrono::Duration::seconds((minutes * 60.0) as i64);
        self
    }

    pub fn track(mut self, id: &str, kind: TrackKind, length: f64) -> Self {
        self.tracks.push(TrackSpec { id: id.into(), kind, length, edges: Vec::new() });
        self
    }

    pub fn loco(mut self, id: &str, track: &str) -> Self {
        self.locomotives.push(LocomotiveSpec {
            id: id.into(),
            track: track.into(),
            max_capacity: 10,
        });
        self
    }

    pub fn workshop(mut self, id: &str, track: &str, stations: usize) -> Self {
        self.workshops.push(WorkshopSpec {
            id: id.into(),
            track: track.into(),
            retrofit_stations: stations,
        });
        self
    }

    pub fn route(mut self, from: &str, to: &str, duration_minutes: f64) -> Self {
        self.routes.push(RouteSpec {
            id: format!("{from}-{to}"),
            track_sequence: vec![from.into(), to.into()],
            duration_minutes,
        });
        self
    }

    /// Add a train arriving `minute` minutes after the scenario start.
    pub fn train(mut self, id: &str, minute: f64, wagons: Vec<WagonSpec>) -> Self {
        self.trains.push(TrainSpec {
            id: id.into(),
            arrival_time: self.start_date + chrono::Duration::seconds((minute * 60.0) as i64),
            wagons,
        });
        self
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
