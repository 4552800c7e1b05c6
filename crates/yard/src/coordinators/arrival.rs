// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Train arrival: drains the scenario's train list, humps wagons onto a
//! collection track, and feeds eligible wagons to the pickup queue.

use crate::fault;
use crate::services::YardServices;
use ys_core::event::EventKind;
use ys_core::ids::WagonId;
use ys_core::track::TrackKind;
use ys_core::train::Train;
use ys_core::wagon::RejectReason;
use ys_engine::{ProcessError, Store};

pub struct TrainArrivalCoordinator {
    services: YardServices,
    trains: Vec<Train>,
    inbound: Store<WagonId>,
}

impl TrainArrivalCoordinator {
    pub fn new(services: YardServices, trains: Vec<Train>, inbound: Store<WagonId>) -> Self {
        Self { services, trains, inbound }
    }

    pub async fn run(self) -> Result<(), ProcessError> {
        let s = &self.services;
        for train in &self.trains {
            let wait = train.arrival_min - s.engine.now();
            if wait > 0.0 {
                s.engine.delay(wait).await?;
            }
            tracing::info!(
                train = %train.id,
                wagons = train.wagon_count(),
                sim_min = s.engine.now(),
                "train arrived"
            );
            s.events.emit(
                "arrival",
                EventKind::TrainArrived { train: train.id.clone(), wagons: train.wagon_count() },
            );
            for wagon in &train.wagons {
                s.wagons.insert(wagon.clone());
            }
            if train.wagons.is_empty() {
                continue;
            }
            // Time from train arrival to the first wagon reaching the hump.
            s.engine.delay(s.times.train_to_hump_min).await?;
            for (i, wagon) in train.wagons.iter().enumerate() {
                if i > 0 {
                    s.engine.delay(s.times.wagon_hump_interval_min).await?;
                }
                self.hump_wagon(&wagon.id).await?;
            }
        }
        tracing::info!("all trains processed");
        Ok(())
    }

    /// One wagon rolls off the hump: arrival event, eligibility check, and
    /// either the inbound queue or rejection.
    async fn hump_wagon(&self, id: &WagonId) -> Result<(), ProcessError> {
        let s = &self.services;
        let wagon = s.wagons.get(id).ok_or_else(|| fault(format!("wagon {id} not registered")))?;

        let selected = s.tracks.select_collection_track(wagon.length_m);
        let event_track = selected.clone().or_else(|| {
            s.tracks.tracks_of_kind(TrackKind::Collection).into_iter().next()
        });
        if let Some(track) = &event_track {
            s.state.mark_arrived(id, track).map_err(fault)?;
        }

        if let Some(reason) = wagon.rejection_reason() {
            tracing::info!(wagon = %id, %reason, "wagon rejected at hump");
            s.state.reject(id, reason).map_err(fault)?;
            return Ok(());
        }

        let Some(track) = selected else {
            tracing::warn!(wagon = %id, "no collection track can take the wagon");
            s.state.reject(id, RejectReason::CollectionTrackFull).map_err(fault)?;
            return Ok(());
        };

        s.tracks.occupy(&track, wagon.length_m).map_err(fault)?;
        self.inbound.put(id.clone()).await;
        Ok(())
    }
}
