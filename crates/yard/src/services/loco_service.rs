// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locomotive life cycle for one yard move:
//! allocate → travel → couple → travel → decouple → release.
//!
//! Each operation runs in simulated time and emits its events at the instant
//! they occur. Callers pair `allocate` with `release` on every exit path; on
//! a fault mid-move the coordinator releases the locomotive before the fault
//! propagates.

use crate::events::EventHub;
use crate::fault;
use crate::resources::LocoPool;
use std::rc::Rc;
use ys_core::coupler::CouplerType;
use ys_core::event::EventKind;
use ys_core::ids::{LocomotiveId, TrackId};
use ys_core::locomotive::LocoStatus;
use ys_core::process_times::ProcessTimes;
use ys_core::route::RouteTable;
use ys_core::scenario::LocoDelivery;
use ys_engine::{ProcessError, SimEngine};

#[derive(Clone)]
pub struct LocoService {
    engine: SimEngine,
    pool: LocoPool,
    routes: Rc<RouteTable>,
    times: Rc<ProcessTimes>,
    events: EventHub,
    delivery: LocoDelivery,
    /// Where locomotives rest between trips.
    loco_parking: TrackId,
}

impl LocoService {
    pub fn new(
        engine: SimEngine,
        pool: LocoPool,
        routes: Rc<RouteTable>,
        times: Rc<ProcessTimes>,
        events: EventHub,
        delivery: LocoDelivery,
        loco_parking: TrackId,
    ) -> Self {
        Self { engine, pool, routes, times, events, delivery, loco_parking }
    }

    pub fn pool(&self) -> &LocoPool {
        &self.pool
    }

    fn now(&self) -> f64 {
        self.engine.now()
    }

    /// Route duration between two tracks (undirected, with the 1-minute
    /// fallback for uncovered pairs).
    pub fn duration(&self, from: &TrackId, to: &TrackId) -> f64 {
        self.routes.duration(from, to)
    }

    pub fn track_of(&self, loco: &LocomotiveId) -> Result<TrackId, ProcessError> {
        self.pool.track_of(loco).map_err(fault)
    }

    /// Acquire a locomotive from the pool; it reports MOVING from this
    /// instant until released.
    pub async fn allocate(&self, purpose: &str) -> Result<LocomotiveId, ProcessError> {
        let id = self.pool.allocate(purpose).await;
        self.pool.set_status(&id, self.now(), LocoStatus::Moving).map_err(fault)?;
        tracing::info!(loco = %id, purpose, sim_min = self.now(), "locomotive allocated");
        Ok(id)
    }

    /// Drive from `from` to `to`, taking the route's transit time.
    pub async fn travel(
        &self,
        loco: &LocomotiveId,
        from: &TrackId,
        to: &TrackId,
    ) -> Result<(), ProcessError> {
        let minutes = self.duration(from, to);
        self.pool.set_status(loco, self.now(), LocoStatus::Moving).map_err(fault)?;
        self.events.emit(
            "shunting",
            EventKind::LocomotiveMovementStarted { loco: loco.clone(), from: from.clone(), to: to.clone() },
        );
        tracing::info!(loco = %loco, %from, %to, minutes, sim_min = self.now(), "locomotive moving");
        self.engine.delay(minutes).await?;
        self.pool.set_track(loco, to.clone()).map_err(fault)?;
        self.pool.set_status(loco, self.now(), LocoStatus::Parking).map_err(fault)?;
        self.events.emit(
            "shunting",
            EventKind::LocomotiveMovementCompleted { loco: loco.clone(), from: from.clone(), to: to.clone() },
        );
        Ok(())
    }

    /// Couple `count` wagons; `count × coupling_time(coupler)` minutes. A
    /// zero-time coupling does not toggle status.
    pub async fn couple(
        &self,
        loco: &LocomotiveId,
        count: usize,
        coupler: CouplerType,
    ) -> Result<(), ProcessError> {
        let per_wagon = self.times.coupling_min(coupler);
        self.timed_operation(loco, count, per_wagon, LocoStatus::Coupling).await
    }

    /// Decouple `count` wagons (defaulting to screw timing when the caller
    /// has no coupler in hand).
    pub async fn decouple(
        &self,
        loco: &LocomotiveId,
        count: usize,
        coupler: Option<CouplerType>,
    ) -> Result<(), ProcessError> {
        let per_wagon = self.times.decoupling_min(coupler.unwrap_or(CouplerType::Screw));
        self.timed_operation(loco, count, per_wagon, LocoStatus::Decoupling).await
    }

    async fn timed_operation(
        &self,
        loco: &LocomotiveId,
        count: usize,
        per_wagon_min: f64,
        status: LocoStatus,
    ) -> Result<(), ProcessError> {
        let total = per_wagon_min * count as f64;
        if total <= 0.0 {
            return Ok(());
        }
        self.pool.set_status(loco, self.now(), status).map_err(fault)?;
        for _ in 0..count {
            self.engine.delay(per_wagon_min).await?;
        }
        self.pool.set_status(loco, self.now(), LocoStatus::Moving).map_err(fault)?;
        Ok(())
    }

    /// Send the locomotive home per the delivery strategy, then apply the
    /// parking rest.
    pub async fn return_home(&self, loco: &LocomotiveId) -> Result<(), ProcessError> {
        if self.delivery == LocoDelivery::ReturnToParking {
            let current = self.track_of(loco)?;
            if current != self.loco_parking {
                let target = self.loco_parking.clone();
                self.travel(loco, &current, &target).await?;
            }
            if self.times.loco_parking_delay_min > 0.0 {
                self.engine.delay(self.times.loco_parking_delay_min).await?;
            }
        }
        Ok(())
    }

    /// Return the locomotive to the pool; it reports PARKING from here.
    pub async fn release(&self, loco: LocomotiveId) -> Result<(), ProcessError> {
        self.pool.set_status(&loco, self.now(), LocoStatus::Parking).map_err(fault)?;
        tracing::info!(loco = %loco, sim_min = self.now(), "locomotive released");
        self.pool.release(loco).map_err(fault)?;
        Ok(())
    }

    /// Release without surfacing secondary errors; used on fault paths where
    /// the original error must win.
    pub async fn release_quietly(&self, loco: LocomotiveId) {
        if let Err(err) = self.release(loco).await {
            tracing::warn!(%err, "failed to release locomotive during rollback");
        }
    }
}

#[cfg(test)]
#[path = "loco_service_tests.rs"]
mod tests;
