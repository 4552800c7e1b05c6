// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workshop feed: moves batches from the retrofit track to the workshop
//! track and spawns one station process per wagon.

use crate::coordinators::WORKSHOP_READY_POLL_MIN;
use crate::fault;
use crate::services::YardServices;
use ys_core::coupler::CouplerType;
use ys_core::ids::WagonId;
use ys_core::track::CAPACITY_EPS_M;
use ys_core::wagon::WagonStatus;
use ys_core::workshop::Workshop;
use ys_engine::{ProcessError, Store};

pub struct WorkshopFeedCoordinator {
    services: YardServices,
    workshop: Workshop,
    ready: Store<WagonId>,
    completed: Store<WagonId>,
}

impl WorkshopFeedCoordinator {
    pub fn new(
        services: YardServices,
        workshop: Workshop,
        ready: Store<WagonId>,
        completed: Store<WagonId>,
    ) -> Self {
        Self { services, workshop, ready, completed }
    }

    pub async fn run(self) -> Result<(), ProcessError> {
        let batch_size = self.workshop.retrofit_stations;
        loop {
            // Take up to one stationful, greedily, without waiting for more.
            let first = self.ready.get().await;
            let mut batch = vec![first];
            while batch.len() < batch_size {
                match self.ready.try_get() {
                    Some(wagon) => batch.push(wagon),
                    None => break,
                }
            }
            self.wait_for_workshop_clear().await?;
            self.deliver_batch(&batch).await?;
        }
    }

    /// The next batch enters only once the workshop track and all stations
    /// are clear.
    async fn wait_for_workshop_clear(&self) -> Result<(), ProcessError> {
        let s = &self.services;
        loop {
            let occupied = s.tracks.occupied_m(&self.workshop.track).map_err(fault)?;
            let free_stations = s.stations.available(&self.workshop.id).map_err(fault)?;
            if occupied <= CAPACITY_EPS_M && free_stations == self.workshop.retrofit_stations {
                return Ok(());
            }
            s.engine.delay(WORKSHOP_READY_POLL_MIN).await?;
        }
    }

    async fn deliver_batch(&self, batch: &[WagonId]) -> Result<(), ProcessError> {
        let s = &self.services;
        let retrofit_track = s
            .wagons
            .track_of(&batch[0])
            .map_err(fault)?
            .ok_or_else(|| fault(format!("wagon {} has no source track", batch[0])))?;
        let total_len: f64 = {
            let mut sum = 0.0;
            for wagon in batch {
                sum += s.wagons.length_m(wagon).map_err(fault)?;
            }
            sum
        };

        let loco = s.locos.allocate("workshop_feed").await?;
        let moved = async {
            let loco_track = s.locos.track_of(&loco)?;
            s.locos.travel(&loco, &loco_track, &retrofit_track).await?;

            // Couple one wagon at a time, shunting between stations.
            for (i, wagon) in batch.iter().enumerate() {
                let coupler = s.wagons.get(wagon).map(|w| w.coupler).unwrap_or(CouplerType::Screw);
                s.locos.couple(&loco, 1, coupler).await?;
                if i + 1 < batch.len() {
                    s.engine.delay(s.times.wagon_move_to_next_station_min).await?;
                }
            }

            s.tracks.vacate(&retrofit_track, total_len).map_err(fault)?;
            for wagon in batch {
                s.state.start_movement(wagon, &retrofit_track).map_err(fault)?;
            }

            s.locos.travel(&loco, &retrofit_track, &self.workshop.track).await?;

            for (i, wagon) in batch.iter().enumerate() {
                let coupler = s.wagons.get(wagon).map(|w| w.coupler).unwrap_or(CouplerType::Screw);
                s.locos.decouple(&loco, 1, Some(coupler)).await?;
                if i + 1 < batch.len() {
                    s.engine.delay(s.times.wagon_move_to_next_station_min).await?;
                }
            }

            s.tracks.occupy(&self.workshop.track, total_len).map_err(fault)?;
            for wagon in batch {
                s.state
                    .complete_arrival(wagon, &self.workshop.track, WagonStatus::AtWorkshop)
                    .map_err(fault)?;
            }
            Ok(())
        }
        .await;

        if let Err(err) = moved {
            s.locos.release_quietly(loco).await;
            return Err(err);
        }

        // Station work starts now, while the locomotive heads home.
        for wagon in batch {
            let process = station_process(
                self.services.clone(),
                self.workshop.clone(),
                wagon.clone(),
                self.completed.clone(),
            );
            s.engine.schedule(format!("station:{wagon}"), process);
        }

        s.locos.return_home(&loco).await?;
        s.locos.release(loco).await?;
        Ok(())
    }
}

/// One wagon's retrofit: station in, convert the coupler, station out.
async fn station_process(
    s: YardServices,
    workshop: Workshop,
    wagon: WagonId,
    completed: Store<WagonId>,
) -> Result<(), ProcessError> {
    let station = s.stations.acquire(&workshop.id, &wagon).await.map_err(fault)?;
    s.state.begin_retrofit(&wagon).map_err(fault)?;
    tracing::info!(
        wagon = %wagon,
        workshop = %workshop.id,
        station,
        sim_min = s.engine.now(),
        "retrofit started"
    );
    s.engine.delay(s.times.wagon_retrofit_min).await?;
    s.state.finish_retrofit(&wagon, &workshop.id).map_err(fault)?;
    s.stations.release(&workshop.id, station).map_err(fault)?;
    completed.put(wagon).await;
    Ok(())
}
