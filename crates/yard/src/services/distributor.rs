// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workshop load balancing.
//!
//! Picks the workshop with the greatest effective availability (free
//! stations minus stations already claimed in this distribution round).
//! Claims are tracked only locally: the heuristic looks at current
//! availability without modeling future station turnover, so 7 wagons over
//! two 2-station workshops split 5/2, not 4/3. That behavior is part of the
//! reference metrics and is kept as-is.

use crate::resources::StationPool;
use indexmap::IndexMap;
use ys_core::error::DomainError;
use ys_core::ids::{WagonId, WorkshopId};

#[derive(Clone)]
pub struct WorkshopDistributor {
    stations: StationPool,
}

impl WorkshopDistributor {
    pub fn new(stations: StationPool) -> Self {
        Self { stations }
    }

    /// Assign `wagons` to workshops. Returns `(workshop, batch)` pairs in
    /// assignment order; every wagon is assigned.
    pub fn distribute(
        &self,
        wagons: Vec<WagonId>,
    ) -> Result<Vec<(WorkshopId, Vec<WagonId>)>, DomainError> {
        let workshops = self.stations.workshop_ids();
        let Some(first_workshop) = workshops.first().cloned() else {
            return Ok(Vec::new());
        };
        let mut claims: IndexMap<WorkshopId, usize> =
            workshops.iter().map(|w| (w.clone(), 0)).collect();
        let mut remaining = wagons;
        let mut out: Vec<(WorkshopId, Vec<WagonId>)> = Vec::new();

        while !remaining.is_empty() {
            let mut best = first_workshop.clone();
            let mut best_avail = isize::MIN;
            for workshop in &workshops {
                let avail = self.stations.available(workshop)? as isize
                    - claims.get(workshop).copied().unwrap_or(0) as isize;
                if avail > best_avail {
                    best_avail = avail;
                    best = workshop.clone();
                }
            }

            let (target, batch) = if best_avail <= 0 {
                // Nothing effectively free anywhere: dump the remainder on
                // the first workshop rather than stall the pipeline.
                (first_workshop.clone(), std::mem::take(&mut remaining))
            } else {
                let take = (best_avail as usize).min(remaining.len());
                let batch: Vec<WagonId> = remaining.drain(..take).collect();
                *claims.entry(best.clone()).or_insert(0) += batch.len();
                (best, batch)
            };
            tracing::info!(
                workshop = %target,
                wagons = batch.len(),
                "assigned wagon batch to workshop"
            );
            match out.last_mut() {
                Some((last, existing)) if *last == target => existing.extend(batch),
                _ => out.push((target, batch)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "distributor_tests.rs"]
mod tests;
