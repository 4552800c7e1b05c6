// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds a yard from a scenario, runs the coordinator ring on the engine,
//! and collects the result.

use crate::coordinators::{
    ParkingCoordinator, PickupCoordinator, RetrofittedPickupCoordinator, TrainArrivalCoordinator,
    WorkshopFeedCoordinator,
};
use crate::events::EventHub;
use crate::registry::WagonRegistry;
use crate::resources::{LocoPool, StationPool, TrackSpace};
use crate::services::{LocoService, WagonStateManager, WorkshopDistributor, YardServices};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use ys_core::error::ConfigError;
use ys_core::event::{DomainEvent, EventKind};
use ys_core::ids::{WagonId, WorkshopId};
use ys_core::locomotive::{LocoStatus, Locomotive};
use ys_core::route::{Route, RouteTable};
use ys_core::scenario::Scenario;
use ys_core::track::{Track, TrackKind};
use ys_core::train::Train;
use ys_core::wagon::{Wagon, WagonStatus};
use ys_core::workshop::Workshop;
use ys_engine::{SimEngine, Store};
use ys_metrics::{BottleneckThresholds, MetricsPipeline, MetricsReport};

/// A process fault surfaced in the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultRecord {
    pub process: String,
    pub minute: f64,
    pub message: String,
}

/// Result record of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub scenario_id: String,
    pub success: bool,
    /// Simulated minutes covered by the run.
    pub duration_min: f64,
    /// True when the engine ran out of work before the deadline.
    pub quiescent_early: bool,
    pub faults: Vec<FaultRecord>,
    pub wagon_status_counts: IndexMap<WagonStatus, usize>,
    pub metrics: MetricsReport,
    /// The authoritative ordered event stream.
    pub events: Vec<DomainEvent>,
}

/// Wires scenario → engine → coordinators and runs the simulation.
pub struct YardOrchestrator {
    scenario: Scenario,
    engine: SimEngine,
    services: YardServices,
    pipeline: Rc<RefCell<MetricsPipeline>>,
    trains: Vec<Train>,
    inbound: Store<WagonId>,
    ready: IndexMap<WorkshopId, Store<WagonId>>,
    completed: IndexMap<WorkshopId, Store<WagonId>>,
    retrofitted_ready: Store<WagonId>,
}

impl YardOrchestrator {
    pub fn new(scenario: Scenario) -> Result<Self, ConfigError> {
        scenario.validate()?;

        let engine = SimEngine::new();
        let events = EventHub::new(engine.clock());

        let tracks: Vec<Track> = scenario
            .tracks
            .iter()
            .map(|spec| Track::new(spec.id.clone(), spec.kind, spec.length, spec.edges.clone()))
            .collect::<Result<_, _>>()?;
        let track_space = TrackSpace::new(
            tracks,
            scenario.track_selection_strategy,
            scenario.retrofit_selection_strategy,
            scenario.parking_selection_strategy,
            scenario.random_seed,
            events.clone(),
        );

        let fleet: Vec<Locomotive> = scenario
            .locomotives
            .iter()
            .map(|spec| Locomotive::new(spec.id.clone(), spec.track.clone(), spec.max_capacity))
            .collect();
        let pool = LocoPool::new(&engine, fleet, events.clone());

        let workshops: Vec<Workshop> = scenario
            .workshops
            .iter()
            .map(|spec| Workshop::new(spec.id.clone(), spec.track.clone(), spec.retrofit_stations))
            .collect::<Result<_, _>>()?;
        let stations = StationPool::new(&engine, workshops.clone(), events.clone());

        let routes = Rc::new(RouteTable::new(
            scenario
                .routes
                .iter()
                .map(|spec| Route {
                    id: spec.id.clone(),
                    sequence: spec.track_sequence.clone(),
                    duration_min: spec.duration_minutes,
                })
                .collect(),
        )?);
        let times = Rc::new(scenario.process_times.clone());

        // Locomotives rest on the first parking track between trips.
        let loco_parking = track_space
            .tracks_of_kind(TrackKind::Parking)
            .into_iter()
            .next()
            .ok_or(ConfigError::MissingTrackKind(TrackKind::Parking))?;

        let locos = LocoService::new(
            engine.clone(),
            pool,
            Rc::clone(&routes),
            Rc::clone(&times),
            events.clone(),
            scenario.loco_delivery_strategy,
            loco_parking,
        );

        let wagons = WagonRegistry::new();
        let state = WagonStateManager::new(wagons.clone(), events.clone(), engine.clock());

        let trains: Vec<Train> = scenario
            .trains
            .iter()
            .map(|spec| {
                let cars: Result<Vec<Wagon>, _> = spec
                    .wagons
                    .iter()
                    .map(|w| {
                        Wagon::new(
                            w.id.clone(),
                            w.length,
                            w.coupler_type,
                            w.needs_retrofit,
                            w.is_loaded,
                        )
                    })
                    .collect();
                Ok(Train::new(
                    spec.id.clone(),
                    scenario.minutes_from_start(spec.arrival_time),
                    cars?,
                ))
            })
            .collect::<Result<_, ConfigError>>()?;

        let pipeline = Rc::new(RefCell::new(MetricsPipeline::standard(
            workshops.iter().map(|w| (w.id.clone(), w.retrofit_stations)).collect::<Vec<_>>(),
            None,
            BottleneckThresholds::default(),
        )));
        {
            let pipeline = Rc::clone(&pipeline);
            events.subscribe(move |event| {
                pipeline.borrow_mut().record(event);
                Ok(())
            });
        }

        let inbound = engine.store(None);
        let ready: IndexMap<WorkshopId, Store<WagonId>> =
            workshops.iter().map(|w| (w.id.clone(), engine.store(None))).collect();
        let completed: IndexMap<WorkshopId, Store<WagonId>> =
            workshops.iter().map(|w| (w.id.clone(), engine.store(None))).collect();
        let retrofitted_ready = engine.store(None);

        let services = YardServices {
            engine: engine.clone(),
            events,
            wagons,
            tracks: track_space,
            stations,
            locos,
            state,
            times,
            routes,
            delivery: scenario.loco_delivery_strategy,
        };

        Ok(Self {
            scenario,
            engine,
            services,
            pipeline,
            trains,
            inbound,
            ready,
            completed,
            retrofitted_ready,
        })
    }

    /// Read-only access to the event hub (subscriptions must be added
    /// before `run`).
    pub fn events(&self) -> &EventHub {
        &self.services.events
    }

    /// Run until `until_min` simulated minutes (default: the scenario
    /// window) and collect the result record.
    pub fn run(mut self, until_min: Option<f64>) -> SimulationReport {
        let until = until_min.unwrap_or_else(|| self.scenario.duration_minutes());
        let trains = std::mem::take(&mut self.trains);
        let s = &self.services;
        tracing::info!(scenario = %self.scenario.id, until, "simulation starting");
        s.events.emit(
            "simulation",
            EventKind::SimulationStarted { scenario: self.scenario.id.clone() },
        );

        // Every locomotive starts the run parked, so utilization intervals
        // cover the whole horizon.
        for loco in s.locos.pool().snapshot() {
            if let Err(err) = s.locos.pool().set_status(&loco.id, 0.0, LocoStatus::Parking) {
                tracing::warn!(%err, "failed to seed locomotive status");
            }
        }

        self.engine.schedule(
            "train_arrival",
            TrainArrivalCoordinator::new(s.clone(), trains, self.inbound.clone()).run(),
        );
        self.engine.schedule(
            "pickup_to_retrofit",
            PickupCoordinator::new(
                s.clone(),
                self.inbound.clone(),
                self.ready.clone(),
                WorkshopDistributor::new(s.stations.clone()),
            )
            .run(),
        );

        let retrofitted_track = s
            .tracks
            .tracks_of_kind(TrackKind::Retrofitted)
            .into_iter()
            .next()
            // Validated at construction; every scenario has one.
            .unwrap_or_else(|| "retrofitted".into());

        for workshop in s.stations.workshops() {
            let ready = self.ready.get(&workshop.id).cloned();
            let completed = self.completed.get(&workshop.id).cloned();
            let (Some(ready), Some(completed)) = (ready, completed) else { continue };
            self.engine.schedule(
                format!("workshop_feed:{}", workshop.id),
                WorkshopFeedCoordinator::new(s.clone(), workshop.clone(), ready, completed.clone())
                    .run(),
            );
            self.engine.schedule(
                format!("retrofitted_pickup:{}", workshop.id),
                RetrofittedPickupCoordinator::new(
                    s.clone(),
                    workshop,
                    completed,
                    self.retrofitted_ready.clone(),
                    retrofitted_track.clone(),
                )
                .run(),
            );
        }
        self.engine.schedule(
            "parking",
            ParkingCoordinator::new(
                s.clone(),
                self.retrofitted_ready.clone(),
                retrofitted_track,
            )
            .run(),
        );

        let outcome = self.engine.run(Some(until));
        let success = outcome.faults.is_empty();
        if outcome.quiescent {
            tracing::warn!(
                end_min = outcome.end_min,
                "engine quiescent before the deadline"
            );
        }

        if success {
            s.events.emit("simulation", EventKind::SimulationEnded { duration_min: outcome.end_min });
        } else {
            let message = outcome
                .faults
                .first()
                .map(|f| format!("{} (process {}, t={:.1})", f.error, f.process, f.minute))
                .unwrap_or_default();
            s.events.emit("simulation", EventKind::SimulationFailed { message });
        }

        let metrics = self.pipeline.borrow().report(outcome.end_min);
        SimulationReport {
            scenario_id: self.scenario.id.clone(),
            success,
            duration_min: outcome.end_min,
            quiescent_early: outcome.quiescent,
            faults: outcome
                .faults
                .into_iter()
                .map(|f| FaultRecord {
                    process: f.process,
                    minute: f.minute,
                    message: f.error.to_string(),
                })
                .collect(),
            wagon_status_counts: s.wagons.status_counts(),
            metrics,
            events: s.events.log(),
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
