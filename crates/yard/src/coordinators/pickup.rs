// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pickup-to-retrofit: forms batches from the inbound queue, transports
//! them collection → retrofit, and distributes them across workshop queues.

use crate::coordinators::CAPACITY_POLL_MIN;
use crate::fault;
use crate::services::{WorkshopDistributor, YardServices};
use indexmap::IndexMap;
use ys_core::coupler::CouplerType;
use ys_core::event::EventKind;
use ys_core::ids::{TrackId, WagonId, WorkshopId};
use ys_engine::{ProcessError, Store};

pub struct PickupCoordinator {
    services: YardServices,
    inbound: Store<WagonId>,
    ready: IndexMap<WorkshopId, Store<WagonId>>,
    distributor: WorkshopDistributor,
}

impl PickupCoordinator {
    pub fn new(
        services: YardServices,
        inbound: Store<WagonId>,
        ready: IndexMap<WorkshopId, Store<WagonId>>,
        distributor: WorkshopDistributor,
    ) -> Self {
        Self { services, inbound, ready, distributor }
    }

    pub async fn run(self) -> Result<(), ProcessError> {
        loop {
            let first = self.inbound.get().await;
            self.process_batch(first).await?;
        }
    }

    async fn process_batch(&self, first: WagonId) -> Result<(), ProcessError> {
        let s = &self.services;
        // Let wagons humped in the same instant reach the queue before the
        // batch is sized.
        s.engine.delay(0.0).await?;
        let first_len = s.wagons.length_m(&first).map_err(fault)?;
        let collection = s
            .wagons
            .track_of(&first)
            .map_err(fault)?
            .ok_or_else(|| fault(format!("wagon {first} is queued but not on a track")))?;

        // Pick a retrofit track that can take at least the first wagon,
        // polling until capacity frees.
        let retrofit = loop {
            if let Some(track) = s.tracks.select_retrofit_track(first_len) {
                break track;
            }
            tracing::debug!(wagon = %first, "retrofit tracks full, waiting");
            s.engine.delay(CAPACITY_POLL_MIN).await?;
        };

        // Extend the batch while the next queued wagon shares the same
        // collection track and still fits the retrofit track's free space.
        let available = s.tracks.available_m(&retrofit).map_err(fault)?;
        let mut batch = vec![first.clone()];
        let mut total_len = first_len;
        loop {
            let Some(next) = self.inbound.items().first().cloned() else { break };
            let next_len = s.wagons.length_m(&next).map_err(fault)?;
            let next_track = s.wagons.track_of(&next).map_err(fault)?;
            if next_track.as_ref() != Some(&collection) || total_len + next_len > available {
                break;
            }
            let Some(taken) = self.inbound.try_get() else { break };
            total_len += next_len;
            batch.push(taken);
        }
        tracing::info!(
            wagons = batch.len(),
            total_m = total_len,
            from = %collection,
            to = %retrofit,
            "forming retrofit batch"
        );

        // Reserve destination capacity before taking a locomotive, so a full
        // retrofit track can never strand an allocated locomotive.
        s.tracks.occupy(&retrofit, total_len).map_err(fault)?;

        let loco = s.locos.allocate("collection_pickup").await?;
        let result = self.transport(&loco, &batch, total_len, &collection, &retrofit).await;
        match result {
            Ok(()) => {
                s.locos.return_home(&loco).await?;
                s.locos.release(loco).await?;
            }
            Err(err) => {
                // Roll back what we can, then surface the fault.
                s.locos.release_quietly(loco).await;
                return Err(err);
            }
        }

        // Hand the batch to workshops per effective availability.
        let assignments = self.distributor.distribute(batch).map_err(fault)?;
        for (workshop, wagons) in assignments {
            let store = self
                .ready
                .get(&workshop)
                .ok_or_else(|| fault(format!("no ready queue for workshop {workshop}")))?;
            for wagon in wagons {
                s.events.emit(
                    "yard",
                    EventKind::WagonDelivered { wagon: wagon.clone(), track: retrofit.clone() },
                );
                store.put(wagon).await;
            }
        }
        Ok(())
    }

    async fn transport(
        &self,
        loco: &ys_core::ids::LocomotiveId,
        batch: &[WagonId],
        total_len: f64,
        collection: &TrackId,
        retrofit: &TrackId,
    ) -> Result<(), ProcessError> {
        let s = &self.services;
        let coupler = s
            .wagons
            .get(&batch[0])
            .map(|w| w.coupler)
            .unwrap_or(CouplerType::Screw);

        let loco_track = s.locos.track_of(loco)?;
        s.locos.travel(loco, &loco_track, collection).await?;
        s.locos.couple(loco, batch.len(), coupler).await?;

        s.tracks.vacate(collection, total_len).map_err(fault)?;
        for wagon in batch {
            s.wagons
                .modify(wagon, |w| {
                    w.track = None;
                    Ok(())
                })
                .map_err(fault)?;
            s.events.emit(
                "yard",
                EventKind::WagonLocationChanged {
                    wagon: wagon.clone(),
                    from: Some(collection.clone()),
                    to: None,
                },
            );
        }

        s.locos.travel(loco, collection, retrofit).await?;
        s.locos.decouple(loco, batch.len(), Some(coupler)).await?;

        // Capacity was reserved up front; placement only flips state.
        for wagon in batch {
            s.state.mark_on_retrofit_track(wagon, retrofit).map_err(fault)?;
        }
        Ok(())
    }
}
