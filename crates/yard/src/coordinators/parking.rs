// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parking: drains the retrofitted-ready queue into parking tracks with a
//! sequential-fill cursor.

use crate::coordinators::{CAPACITY_POLL_MIN, PARKING_BATCH_MAX, PARKING_FULL_THRESHOLD_M};
use crate::fault;
use crate::services::{partition_by_capacity, YardServices};
use ys_core::coupler::CouplerType;
use ys_core::ids::{TrackId, WagonId};
use ys_core::wagon::WagonStatus;
use ys_engine::{ProcessError, Store};

pub struct ParkingCoordinator {
    services: YardServices,
    retrofitted_ready: Store<WagonId>,
    retrofitted_track: TrackId,
}

impl ParkingCoordinator {
    pub fn new(
        services: YardServices,
        retrofitted_ready: Store<WagonId>,
        retrofitted_track: TrackId,
    ) -> Self {
        Self { services, retrofitted_ready, retrofitted_track }
    }

    pub async fn run(self) -> Result<(), ProcessError> {
        let s = &self.services;
        loop {
            let first = self.retrofitted_ready.get().await;
            let mut batch = vec![first];
            while batch.len() < PARKING_BATCH_MAX {
                match self.retrofitted_ready.try_get() {
                    Some(wagon) => batch.push(wagon),
                    None => break,
                }
            }

            let mut lengths = Vec::with_capacity(batch.len());
            for wagon in &batch {
                lengths.push((wagon.clone(), s.wagons.length_m(wagon).map_err(fault)?));
            }
            let smallest = lengths.iter().map(|(_, l)| *l).fold(f64::MAX, f64::min);

            // A parking track must take at least the smallest wagon.
            let Some(parking) = s.tracks.select_parking_track(smallest) else {
                for wagon in batch {
                    self.retrofitted_ready.put(wagon).await;
                }
                s.tracks.advance_parking();
                s.engine.delay(CAPACITY_POLL_MIN).await?;
                continue;
            };

            let available = s.tracks.available_m(&parking).map_err(fault)?;
            let (fit, requeue) = partition_by_capacity(&lengths, available);
            for wagon in requeue {
                self.retrofitted_ready.put(wagon).await;
            }
            if fit.is_empty() {
                s.tracks.advance_parking();
                s.engine.delay(CAPACITY_POLL_MIN).await?;
                continue;
            }

            let total_len: f64 = {
                let mut sum = 0.0;
                for wagon in &fit {
                    sum += s.wagons.length_m(wagon).map_err(fault)?;
                }
                sum
            };

            // Re-validate and reserve before the transport starts.
            if !s.tracks.can_fit(&parking, total_len).map_err(fault)? {
                for wagon in fit {
                    self.retrofitted_ready.put(wagon).await;
                }
                s.tracks.advance_parking();
                s.engine.delay(CAPACITY_POLL_MIN).await?;
                continue;
            }
            s.tracks.occupy(&parking, total_len).map_err(fault)?;
            tracing::info!(
                wagons = fit.len(),
                track = %parking,
                sim_min = s.engine.now(),
                "moving wagons to parking"
            );
            self.transport(&fit, total_len, &parking).await?;

            // Move the cursor once the track cannot take a typical wagon.
            if !s.tracks.can_fit(&parking, PARKING_FULL_THRESHOLD_M).map_err(fault)? {
                s.tracks.advance_parking();
            }
        }
    }

    async fn transport(
        &self,
        batch: &[WagonId],
        total_len: f64,
        parking: &TrackId,
    ) -> Result<(), ProcessError> {
        let s = &self.services;
        let loco = s.locos.allocate("parking_move").await?;
        let moved = async {
            let loco_track = s.locos.track_of(&loco)?;
            s.locos.travel(&loco, &loco_track, &self.retrofitted_track).await?;

            let coupler = s
                .wagons
                .get(&batch[0])
                .map(|w| w.coupler)
                .unwrap_or(CouplerType::Dac);
            s.locos.couple(&loco, batch.len(), coupler).await?;

            s.tracks.vacate(&self.retrofitted_track, total_len).map_err(fault)?;
            for wagon in batch {
                s.state.start_movement(wagon, &self.retrofitted_track).map_err(fault)?;
            }

            s.locos.travel(&loco, &self.retrofitted_track, parking).await?;
            s.locos.decouple(&loco, batch.len(), Some(coupler)).await?;

            // Capacity reserved before the trip; arrival flips state only.
            for wagon in batch {
                s.state.complete_arrival(wagon, parking, WagonStatus::Parking).map_err(fault)?;
            }
            Ok(())
        }
        .await;

        match moved {
            Ok(()) => {
                s.locos.return_home(&loco).await?;
                s.locos.release(loco).await?;
                Ok(())
            }
            Err(err) => {
                s.locos.release_quietly(loco).await;
                Err(err)
            }
        }
    }
}
