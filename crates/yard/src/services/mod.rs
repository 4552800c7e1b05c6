// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain services shared by the coordinators.

pub mod distributor;
pub mod loco_service;
pub mod selector;
pub mod wagon_state;

pub use distributor::WorkshopDistributor;
pub use loco_service::LocoService;
pub use selector::partition_by_capacity;
pub use wagon_state::WagonStateManager;

use crate::events::EventHub;
use crate::registry::WagonRegistry;
use crate::resources::{LocoPool, StationPool, TrackSpace};
use std::rc::Rc;
use ys_core::process_times::ProcessTimes;
use ys_core::route::RouteTable;
use ys_core::scenario::LocoDelivery;
use ys_engine::SimEngine;

/// Everything a coordinator needs, cheap to clone into its process.
#[derive(Clone)]
pub struct YardServices {
    pub engine: SimEngine,
    pub events: EventHub,
    pub wagons: WagonRegistry,
    pub tracks: TrackSpace,
    pub stations: StationPool,
    pub locos: LocoService,
    pub state: WagonStateManager,
    pub times: Rc<ProcessTimes>,
    pub routes: Rc<RouteTable>,
    pub delivery: LocoDelivery,
}

impl YardServices {
    pub fn loco_pool(&self) -> &LocoPool {
        self.locos.pool()
    }
}
