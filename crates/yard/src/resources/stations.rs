// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workshop station pool: one counted resource per workshop plus per-station
//! occupancy slots for reporting.

use crate::events::EventHub;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use ys_core::error::DomainError;
use ys_core::event::EventKind;
use ys_core::ids::{TrackId, WagonId, WorkshopId};
use ys_core::workshop::Workshop;
use ys_engine::{SimEngine, SimResource};

struct WorkshopStations {
    workshop: Workshop,
    resource: SimResource,
    occupants: Vec<Option<WagonId>>,
    completed: Vec<u64>,
}

/// Per-station occupancy and counters, for reports.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSnapshot {
    pub workshop: WorkshopId,
    pub station: usize,
    pub occupant: Option<WagonId>,
    pub completed: u64,
}

#[derive(Clone)]
pub struct StationPool {
    inner: Rc<RefCell<IndexMap<WorkshopId, WorkshopStations>>>,
    events: EventHub,
}

impl StationPool {
    pub fn new(engine: &SimEngine, workshops: Vec<Workshop>, events: EventHub) -> Self {
        let table = workshops
            .into_iter()
            .map(|w| {
                let stations = w.retrofit_stations;
                (
                    w.id.clone(),
                    WorkshopStations {
                        resource: engine.resource(stations),
                        occupants: vec![None; stations],
                        completed: vec![0; stations],
                        workshop: w,
                    },
                )
            })
            .collect();
        Self { inner: Rc::new(RefCell::new(table)), events }
    }

    /// Block until a station in `workshop` frees, then occupy it for `wagon`.
    /// Returns the station index.
    pub async fn acquire(&self, workshop: &WorkshopId, wagon: &WagonId) -> Result<usize, DomainError> {
        let resource = {
            let inner = self.inner.borrow();
            let state = inner
                .get(workshop)
                .ok_or_else(|| DomainError::UnknownWorkshop(workshop.clone()))?;
            state.resource.clone()
        };
        resource.acquire().await;
        let station = {
            let mut inner = self.inner.borrow_mut();
            let state = inner
                .get_mut(workshop)
                .ok_or_else(|| DomainError::UnknownWorkshop(workshop.clone()))?;
            let station = state
                .occupants
                .iter()
                .position(Option::is_none)
                // The counted resource admitted us, so a free slot exists.
                .unwrap_or(0);
            state.occupants[station] = Some(wagon.clone());
            station
        };
        self.events.emit(
            "workshop",
            EventKind::WorkshopStationOccupied {
                workshop: workshop.clone(),
                station,
                wagon: wagon.clone(),
            },
        );
        Ok(station)
    }

    /// Free a station, bumping its completed counter.
    pub fn release(&self, workshop: &WorkshopId, station: usize) -> Result<(), DomainError> {
        {
            let mut inner = self.inner.borrow_mut();
            let state = inner
                .get_mut(workshop)
                .ok_or_else(|| DomainError::UnknownWorkshop(workshop.clone()))?;
            if let Some(slot) = state.occupants.get_mut(station) {
                *slot = None;
            }
            if let Some(count) = state.completed.get_mut(station) {
                *count += 1;
            }
            if state.resource.release().is_err() {
                tracing::warn!(%workshop, station, "station released without acquire");
            }
        }
        self.events.emit(
            "workshop",
            EventKind::WorkshopStationIdle { workshop: workshop.clone(), station },
        );
        Ok(())
    }

    pub fn available(&self, workshop: &WorkshopId) -> Result<usize, DomainError> {
        self.inner
            .borrow()
            .get(workshop)
            .map(|s| s.resource.available())
            .ok_or_else(|| DomainError::UnknownWorkshop(workshop.clone()))
    }

    pub fn station_count(&self, workshop: &WorkshopId) -> Result<usize, DomainError> {
        self.inner
            .borrow()
            .get(workshop)
            .map(|s| s.workshop.retrofit_stations)
            .ok_or_else(|| DomainError::UnknownWorkshop(workshop.clone()))
    }

    pub fn track_of(&self, workshop: &WorkshopId) -> Result<TrackId, DomainError> {
        self.inner
            .borrow()
            .get(workshop)
            .map(|s| s.workshop.track.clone())
            .ok_or_else(|| DomainError::UnknownWorkshop(workshop.clone()))
    }

    /// Workshop ids in scenario order.
    pub fn workshop_ids(&self) -> Vec<WorkshopId> {
        self.inner.borrow().keys().cloned().collect()
    }

    pub fn workshops(&self) -> Vec<Workshop> {
        self.inner.borrow().values().map(|s| s.workshop.clone()).collect()
    }

    pub fn snapshot(&self) -> Vec<StationSnapshot> {
        let inner = self.inner.borrow();
        let mut out = Vec::new();
        for (id, state) in inner.iter() {
            for station in 0..state.workshop.retrofit_stations {
                out.push(StationSnapshot {
                    workshop: id.clone(),
                    station,
                    occupant: state.occupants.get(station).cloned().flatten(),
                    completed: state.completed.get(station).copied().unwrap_or(0),
                });
            }
        }
        out
    }
}
