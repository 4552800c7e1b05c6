// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized wagon status transitions. Each transition validates the
//! status machine, stamps timestamps, and emits the matching event.

use crate::events::EventHub;
use crate::registry::WagonRegistry;
use ys_core::coupler::CouplerType;
use ys_core::error::DomainError;
use ys_core::event::EventKind;
use ys_core::ids::{TrackId, WagonId, WorkshopId};
use ys_core::wagon::{RejectReason, WagonStatus};
use ys_engine::SimClock;

#[derive(Clone)]
pub struct WagonStateManager {
    wagons: WagonRegistry,
    events: EventHub,
    clock: SimClock,
}

impl WagonStateManager {
    pub fn new(wagons: WagonRegistry, events: EventHub, clock: SimClock) -> Self {
        Self { wagons, events, clock }
    }

    /// Record physical arrival at the collection track (status stays
    /// ARRIVED; the wagon now occupies the track).
    pub fn mark_arrived(&self, id: &WagonId, track: &TrackId) -> Result<(), DomainError> {
        let now = self.clock.now();
        self.wagons.modify(id, |w| {
            w.arrived_at = Some(now);
            w.track = Some(track.clone());
            Ok(())
        })?;
        self.events.emit(
            "arrival",
            EventKind::WagonArrived {
                wagon: id.clone(),
                track: track.clone(),
                status: WagonStatus::Arrived,
            },
        );
        Ok(())
    }

    /// Reject at the hump. Terminal.
    pub fn reject(&self, id: &WagonId, reason: RejectReason) -> Result<(), DomainError> {
        self.wagons.modify(id, |w| {
            w.advance(WagonStatus::Rejected)?;
            w.track = None;
            Ok(())
        })?;
        self.events.emit("arrival", EventKind::WagonRejected { wagon: id.clone(), reason });
        Ok(())
    }

    /// Placement on a retrofit track after the collection transport.
    pub fn mark_on_retrofit_track(&self, id: &WagonId, track: &TrackId) -> Result<(), DomainError> {
        self.wagons.modify(id, |w| {
            w.advance(WagonStatus::OnRetrofitTrack)?;
            w.track = Some(track.clone());
            Ok(())
        })?;
        self.events.emit(
            "yard",
            EventKind::WagonArrived {
                wagon: id.clone(),
                track: track.clone(),
                status: WagonStatus::OnRetrofitTrack,
            },
        );
        Ok(())
    }

    /// Begin a transport leg: the wagon leaves `from` and is in motion.
    pub fn start_movement(&self, id: &WagonId, from: &TrackId) -> Result<(), DomainError> {
        self.wagons.modify(id, |w| {
            w.advance(WagonStatus::Moving)?;
            w.track = None;
            Ok(())
        })?;
        self.events.emit(
            "yard",
            EventKind::WagonLocationChanged {
                wagon: id.clone(),
                from: Some(from.clone()),
                to: None,
            },
        );
        Ok(())
    }

    /// Finish a transport leg: the wagon stands on `to` with `status`.
    pub fn complete_arrival(
        &self,
        id: &WagonId,
        to: &TrackId,
        status: WagonStatus,
    ) -> Result<(), DomainError> {
        self.wagons.modify(id, |w| {
            w.advance(status)?;
            w.track = Some(to.clone());
            Ok(())
        })?;
        self.events.emit(
            "yard",
            EventKind::WagonArrived { wagon: id.clone(), track: to.clone(), status },
        );
        Ok(())
    }

    /// Station work starts.
    pub fn begin_retrofit(&self, id: &WagonId) -> Result<(), DomainError> {
        let now = self.clock.now();
        self.wagons.modify(id, |w| {
            w.advance(WagonStatus::Retrofitting)?;
            w.retrofit_started_at = Some(now);
            Ok(())
        })
    }

    /// Station work done: the wagon now carries a DAC coupler.
    pub fn finish_retrofit(&self, id: &WagonId, workshop: &WorkshopId) -> Result<(), DomainError> {
        let now = self.clock.now();
        let duration = self.wagons.modify(id, |w| {
            w.advance(WagonStatus::Retrofitted)?;
            w.retrofit_ended_at = Some(now);
            w.coupler = CouplerType::Dac;
            Ok(now - w.retrofit_started_at.unwrap_or(now))
        })?;
        let coupler = self.wagons.get(id).map(|w| w.coupler).unwrap_or(CouplerType::Dac);
        self.events.emit(
            "workshop",
            EventKind::WagonRetrofitted {
                wagon: id.clone(),
                workshop: workshop.clone(),
                duration_min: duration,
                coupler,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "wagon_state_tests.rs"]
mod tests;
