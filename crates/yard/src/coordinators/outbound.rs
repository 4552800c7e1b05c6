// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrofitted pickup: collects finished wagons at a workshop and brings
//! them to the retrofitted track.

use crate::coordinators::STRAGGLER_WAIT_MIN;
use crate::fault;
use crate::services::YardServices;
use ys_core::coupler::CouplerType;
use ys_core::ids::{TrackId, WagonId};
use ys_core::wagon::WagonStatus;
use ys_core::workshop::Workshop;
use ys_engine::{ProcessError, Store};

pub struct RetrofittedPickupCoordinator {
    services: YardServices,
    workshop: Workshop,
    completed: Store<WagonId>,
    retrofitted_ready: Store<WagonId>,
    retrofitted_track: TrackId,
}

impl RetrofittedPickupCoordinator {
    pub fn new(
        services: YardServices,
        workshop: Workshop,
        completed: Store<WagonId>,
        retrofitted_ready: Store<WagonId>,
        retrofitted_track: TrackId,
    ) -> Self {
        Self { services, workshop, completed, retrofitted_ready, retrofitted_track }
    }

    pub async fn run(self) -> Result<(), ProcessError> {
        let batch_size = self.workshop.retrofit_stations;
        loop {
            // First wagon blocks; the rest join greedily, with one bounded
            // wait for stragglers still in their stations.
            let first = self.completed.get().await;
            let mut batch = vec![first];
            while batch.len() < batch_size {
                if let Some(wagon) = self.completed.try_get() {
                    batch.push(wagon);
                    continue;
                }
                match self.completed.get_or_timeout(STRAGGLER_WAIT_MIN).await {
                    Some(wagon) => batch.push(wagon),
                    None => break,
                }
            }
            tracing::info!(
                workshop = %self.workshop.id,
                wagons = batch.len(),
                target = batch_size,
                "picking up retrofitted batch"
            );
            self.transport_batch(&batch).await?;
        }
    }

    async fn transport_batch(&self, batch: &[WagonId]) -> Result<(), ProcessError> {
        let s = &self.services;
        let ws_track = &self.workshop.track;
        let total_len: f64 = {
            let mut sum = 0.0;
            for wagon in batch {
                sum += s.wagons.length_m(wagon).map_err(fault)?;
            }
            sum
        };

        let loco = s.locos.allocate("retrofitted_pickup").await?;
        let moved = async {
            let loco_track = s.locos.track_of(&loco)?;
            s.locos.travel(&loco, &loco_track, ws_track).await?;

            for (i, wagon) in batch.iter().enumerate() {
                let coupler = s.wagons.get(wagon).map(|w| w.coupler).unwrap_or(CouplerType::Dac);
                s.locos.couple(&loco, 1, coupler).await?;
                if i + 1 < batch.len() {
                    s.engine.delay(s.times.wagon_move_to_next_station_min).await?;
                }
            }

            s.tracks.vacate(ws_track, total_len).map_err(fault)?;
            for wagon in batch {
                s.state.start_movement(wagon, ws_track).map_err(fault)?;
            }

            s.locos.travel(&loco, ws_track, &self.retrofitted_track).await?;

            // Retrofitted stock decouples with DAC timing when any wagon
            // carries it.
            let any_dac = batch.iter().any(|w| {
                s.wagons.get(w).map(|w| w.coupler == CouplerType::Dac).unwrap_or(false)
            });
            let coupler = if any_dac { CouplerType::Dac } else { CouplerType::Screw };
            s.locos.decouple(&loco, batch.len(), Some(coupler)).await?;

            s.tracks.occupy(&self.retrofitted_track, total_len).map_err(fault)?;
            for wagon in batch {
                s.state
                    .complete_arrival(wagon, &self.retrofitted_track, WagonStatus::Retrofitted)
                    .map_err(fault)?;
            }
            Ok(())
        }
        .await;

        if let Err(err) = moved {
            s.locos.release_quietly(loco).await;
            return Err(err);
        }

        s.locos.return_home(&loco).await?;
        s.locos.release(loco).await?;

        // Queue for parking only while the retrofitted track keeps headroom;
        // wagons past this point wait on the track itself.
        for wagon in batch {
            let length = s.wagons.length_m(wagon).map_err(fault)?;
            if s.tracks.can_fit(&self.retrofitted_track, length).map_err(fault)? {
                self.retrofitted_ready.put(wagon.clone()).await;
            } else {
                tracing::warn!(
                    wagon = %wagon,
                    track = %self.retrofitted_track,
                    "retrofitted track out of headroom, wagon not queued for parking"
                );
            }
        }
        Ok(())
    }
}
