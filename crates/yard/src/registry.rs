// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wagon ownership: one registry holds every wagon for the run's lifetime.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use ys_core::error::DomainError;
use ys_core::ids::{TrackId, WagonId};
use ys_core::wagon::{Wagon, WagonStatus};

/// Shared wagon table, keyed by id in insertion order. Coordinators mutate
/// wagons only through this registry (or the state manager built on it).
#[derive(Clone, Default)]
pub struct WagonRegistry {
    inner: Rc<RefCell<IndexMap<WagonId, Wagon>>>,
}

impl WagonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, wagon: Wagon) {
        self.inner.borrow_mut().insert(wagon.id.clone(), wagon);
    }

    pub fn get(&self, id: &WagonId) -> Option<Wagon> {
        self.inner.borrow().get(id).cloned()
    }

    pub fn length_m(&self, id: &WagonId) -> Result<f64, DomainError> {
        self.inner
            .borrow()
            .get(id)
            .map(|w| w.length_m)
            .ok_or_else(|| DomainError::UnknownWagon(id.clone()))
    }

    pub fn track_of(&self, id: &WagonId) -> Result<Option<TrackId>, DomainError> {
        self.inner
            .borrow()
            .get(id)
            .map(|w| w.track.clone())
            .ok_or_else(|| DomainError::UnknownWagon(id.clone()))
    }

    pub fn status_of(&self, id: &WagonId) -> Result<WagonStatus, DomainError> {
        self.inner
            .borrow()
            .get(id)
            .map(|w| w.status)
            .ok_or_else(|| DomainError::UnknownWagon(id.clone()))
    }

    /// Mutate one wagon under the registry lock.
    pub fn modify<T>(
        &self,
        id: &WagonId,
        f: impl FnOnce(&mut Wagon) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut inner = self.inner.borrow_mut();
        let wagon = inner.get_mut(id).ok_or_else(|| DomainError::UnknownWagon(id.clone()))?;
        f(wagon)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Count of wagons per status, in status-agnostic insertion order.
    pub fn status_counts(&self) -> IndexMap<WagonStatus, usize> {
        let mut counts: IndexMap<WagonStatus, usize> = IndexMap::new();
        for wagon in self.inner.borrow().values() {
            *counts.entry(wagon.status).or_insert(0) += 1;
        }
        counts
    }

    /// Snapshot of all wagons, insertion-ordered.
    pub fn snapshot(&self) -> Vec<Wagon> {
        self.inner.borrow().values().cloned().collect()
    }
}
