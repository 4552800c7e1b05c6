// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locomotive pool backed by a FIFO store.
//!
//! Holding locomotives in a store gives natural blocking and FIFO fairness:
//! `allocate` is a blocking `get`, `release` a `put`. Entity state (track,
//! status history) stays in the pool's table; only ids travel through the
//! store.

use crate::events::EventHub;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use ys_core::error::DomainError;
use ys_core::event::EventKind;
use ys_core::ids::{LocomotiveId, TrackId};
use ys_core::locomotive::{LocoStatus, Locomotive};
use ys_engine::{SimEngine, Store};

const RESOURCE_NAME: &str = "locomotives";

#[derive(Clone)]
pub struct LocoPool {
    store: Store<LocomotiveId>,
    locos: Rc<RefCell<IndexMap<LocomotiveId, Locomotive>>>,
    events: EventHub,
}

impl LocoPool {
    pub fn new(engine: &SimEngine, fleet: Vec<Locomotive>, events: EventHub) -> Self {
        let store = engine.store(Some(fleet.len().max(1)));
        let mut table = IndexMap::new();
        for loco in fleet {
            // Seeding an empty bounded store never fails.
            let _ = store.try_put(loco.id.clone());
            table.insert(loco.id.clone(), loco);
        }
        Self { store, locos: Rc::new(RefCell::new(table)), events }
    }

    /// Block until a locomotive is free and take exclusive use of it.
    pub async fn allocate(&self, purpose: &str) -> LocomotiveId {
        let id = self.store.get().await;
        self.events.emit(
            "shunting",
            EventKind::ResourceAllocated {
                resource: RESOURCE_NAME.to_string(),
                id: id.to_string(),
                purpose: purpose.to_string(),
            },
        );
        id
    }

    /// Return a locomotive to the pool.
    pub fn release(&self, id: LocomotiveId) -> Result<(), DomainError> {
        if !self.locos.borrow().contains_key(&id) {
            return Err(DomainError::UnknownLocomotive(id));
        }
        self.events.emit(
            "shunting",
            EventKind::ResourceReleased { resource: RESOURCE_NAME.to_string(), id: id.to_string() },
        );
        // The store was sized to the fleet, so the put cannot overflow.
        let _ = self.store.try_put(id);
        Ok(())
    }

    pub fn available(&self) -> usize {
        self.store.len()
    }

    pub fn fleet_size(&self) -> usize {
        self.locos.borrow().len()
    }

    pub fn track_of(&self, id: &LocomotiveId) -> Result<TrackId, DomainError> {
        self.locos
            .borrow()
            .get(id)
            .map(|l| l.track.clone())
            .ok_or_else(|| DomainError::UnknownLocomotive(id.clone()))
    }

    pub fn home_track_of(&self, id: &LocomotiveId) -> Result<TrackId, DomainError> {
        self.locos
            .borrow()
            .get(id)
            .map(|l| l.home_track.clone())
            .ok_or_else(|| DomainError::UnknownLocomotive(id.clone()))
    }

    pub fn set_track(&self, id: &LocomotiveId, track: TrackId) -> Result<(), DomainError> {
        let mut locos = self.locos.borrow_mut();
        let loco = locos.get_mut(id).ok_or_else(|| DomainError::UnknownLocomotive(id.clone()))?;
        loco.track = track;
        Ok(())
    }

    /// Record a status point in the locomotive's history and broadcast it.
    pub fn set_status(&self, id: &LocomotiveId, at: f64, status: LocoStatus) -> Result<(), DomainError> {
        {
            let mut locos = self.locos.borrow_mut();
            let loco =
                locos.get_mut(id).ok_or_else(|| DomainError::UnknownLocomotive(id.clone()))?;
            loco.set_status(at, status)?;
        }
        self.events.emit(
            "shunting",
            EventKind::LocomotiveStatusChanged { loco: id.clone(), status },
        );
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<Locomotive> {
        self.locos.borrow().values().cloned().collect()
    }
}
