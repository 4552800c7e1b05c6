// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Track capacity manager: occupied meters per track plus the selection
//! strategies.
//!
//! All operations are synchronous and instantaneous in simulated time; the
//! single-threaded engine makes each occupy/vacate atomic relative to other
//! processes. Callers still pair "reserve before transport" with "release on
//! failure" to avoid orphaned capacity.

use crate::events::EventHub;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;
use ys_core::error::DomainError;
use ys_core::event::EventKind;
use ys_core::ids::TrackId;
use ys_core::scenario::TrackSelection;
use ys_core::track::{Track, TrackKind};

struct SpaceInner {
    tracks: IndexMap<TrackId, Track>,
    collection_strategy: TrackSelection,
    retrofit_strategy: TrackSelection,
    parking_strategy: TrackSelection,
    collection_cursor: usize,
    retrofit_cursor: usize,
    parking_cursor: usize,
    rng: StdRng,
}

impl SpaceInner {
    fn ids_of_kind(&self, kind: TrackKind) -> Vec<TrackId> {
        self.tracks
            .values()
            .filter(|t| t.kind == kind)
            .map(|t| t.id.clone())
            .collect()
    }

    fn select(&mut self, kind: TrackKind, needed_m: f64) -> Option<TrackId> {
        let (strategy, cursor) = match kind {
            TrackKind::Collection => (self.collection_strategy, self.collection_cursor),
            TrackKind::Retrofit => (self.retrofit_strategy, self.retrofit_cursor),
            TrackKind::Parking => (self.parking_strategy, self.parking_cursor),
            _ => (TrackSelection::FirstAvailable, 0),
        };
        let candidates = self.ids_of_kind(kind);
        if candidates.is_empty() {
            return None;
        }
        let fits = |inner: &Self, id: &TrackId| {
            inner.tracks.get(id).is_some_and(|t| t.can_fit(needed_m))
        };
        let chosen = match strategy {
            TrackSelection::FirstAvailable => {
                candidates.iter().find(|id| fits(self, id)).cloned()
            }
            TrackSelection::RoundRobin => {
                let n = candidates.len();
                (0..n)
                    .map(|i| &candidates[(cursor + i) % n])
                    .find(|id| fits(self, id))
                    .cloned()
            }
            TrackSelection::LeastOccupied => candidates
                .iter()
                .filter(|id| fits(self, id))
                .min_by(|a, b| {
                    let occ = |id: &TrackId| {
                        self.tracks.get(id).map(|t| t.occupied_m()).unwrap_or(f64::MAX)
                    };
                    occ(a).total_cmp(&occ(b))
                })
                .cloned(),
            TrackSelection::Random => {
                let fitting: Vec<&TrackId> =
                    candidates.iter().filter(|id| fits(self, id)).collect();
                if fitting.is_empty() {
                    None
                } else {
                    let pick = self.rng.gen_range(0..fitting.len());
                    Some(fitting[pick].clone())
                }
            }
        };
        if chosen.is_some() {
            if let TrackKind::Retrofit = kind {
                self.retrofit_cursor = self.retrofit_cursor.wrapping_add(1);
            } else if let TrackKind::Collection = kind {
                self.collection_cursor = self.collection_cursor.wrapping_add(1);
            }
        }
        chosen
    }
}

/// Shared track capacity state.
#[derive(Clone)]
pub struct TrackSpace {
    inner: Rc<RefCell<SpaceInner>>,
    events: EventHub,
}

impl TrackSpace {
    pub fn new(
        tracks: Vec<Track>,
        collection_strategy: TrackSelection,
        retrofit_strategy: TrackSelection,
        parking_strategy: TrackSelection,
        seed: u64,
        events: EventHub,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SpaceInner {
                tracks: tracks.into_iter().map(|t| (t.id.clone(), t)).collect(),
                collection_strategy,
                retrofit_strategy,
                parking_strategy,
                collection_cursor: 0,
                retrofit_cursor: 0,
                parking_cursor: 0,
                rng: StdRng::seed_from_u64(seed),
            })),
            events,
        }
    }

    fn with_track<T>(
        &self,
        id: &TrackId,
        f: impl FnOnce(&Track) -> T,
    ) -> Result<T, DomainError> {
        self.inner
            .borrow()
            .tracks
            .get(id)
            .map(f)
            .ok_or_else(|| DomainError::UnknownTrack(id.clone()))
    }

    pub fn can_fit(&self, id: &TrackId, length_m: f64) -> Result<bool, DomainError> {
        self.with_track(id, |t| t.can_fit(length_m))
    }

    pub fn available_m(&self, id: &TrackId) -> Result<f64, DomainError> {
        self.with_track(id, |t| t.available_m())
    }

    pub fn occupied_m(&self, id: &TrackId) -> Result<f64, DomainError> {
        self.with_track(id, |t| t.occupied_m())
    }

    pub fn total_m(&self, id: &TrackId) -> Result<f64, DomainError> {
        self.with_track(id, |t| t.length_m)
    }

    pub fn kind_of(&self, id: &TrackId) -> Result<TrackKind, DomainError> {
        self.with_track(id, |t| t.kind)
    }

    /// Claim meters on a track, broadcasting the new occupancy.
    pub fn occupy(&self, id: &TrackId, length_m: f64) -> Result<(), DomainError> {
        let (occupied, total) = {
            let mut inner = self.inner.borrow_mut();
            let track =
                inner.tracks.get_mut(id).ok_or_else(|| DomainError::UnknownTrack(id.clone()))?;
            track.occupy(length_m)?;
            (track.occupied_m(), track.length_m)
        };
        self.events.emit(
            "yard",
            EventKind::TrackOccupancyChanged { track: id.clone(), occupied_m: occupied, total_m: total },
        );
        Ok(())
    }

    /// Free meters on a track, broadcasting the new occupancy.
    pub fn vacate(&self, id: &TrackId, length_m: f64) -> Result<(), DomainError> {
        let (occupied, total) = {
            let mut inner = self.inner.borrow_mut();
            let track =
                inner.tracks.get_mut(id).ok_or_else(|| DomainError::UnknownTrack(id.clone()))?;
            track.vacate(length_m)?;
            (track.occupied_m(), track.length_m)
        };
        self.events.emit(
            "yard",
            EventKind::TrackOccupancyChanged { track: id.clone(), occupied_m: occupied, total_m: total },
        );
        Ok(())
    }

    pub fn tracks_of_kind(&self, kind: TrackKind) -> Vec<TrackId> {
        self.inner.borrow().ids_of_kind(kind)
    }

    pub fn select_collection_track(&self, needed_m: f64) -> Option<TrackId> {
        self.inner.borrow_mut().select(TrackKind::Collection, needed_m)
    }

    pub fn select_retrofit_track(&self, needed_m: f64) -> Option<TrackId> {
        self.inner.borrow_mut().select(TrackKind::Retrofit, needed_m)
    }

    pub fn select_parking_track(&self, needed_m: f64) -> Option<TrackId> {
        self.inner.borrow_mut().select(TrackKind::Parking, needed_m)
    }

    /// Rotate the sequential-fill parking cursor to the next parking track.
    pub fn advance_parking(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.parking_cursor = inner.parking_cursor.wrapping_add(1);
    }

    pub fn snapshot(&self) -> Vec<Track> {
        self.inner.borrow().tracks.values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "track_space_tests.rs"]
mod tests;
