// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ys-core: domain model, events, and configuration for the yardsim workshop
//! yard simulator.

pub mod macros;

pub mod bus;
pub mod coupler;
pub mod error;
pub mod event;
pub mod ids;
pub mod locomotive;
pub mod process_times;
pub mod route;
pub mod scenario;
pub mod track;
pub mod train;
pub mod wagon;
pub mod workshop;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bus::{EventBus, HandlerError};
pub use coupler::CouplerType;
pub use error::{ConfigError, DomainError};
pub use event::{DomainEvent, EventKind, EventTag};
pub use ids::{EventId, LocomotiveId, TrackId, TrainId, WagonId, WorkshopId};
pub use locomotive::{LocoStatus, Locomotive, StatusHistory};
pub use process_times::ProcessTimes;
pub use route::{Route, RouteTable, DEFAULT_TRANSIT_MIN};
#[cfg(any(test, feature = "test-support"))]
pub use scenario::ScenarioBuilder;
pub use scenario::{
    LocoDelivery, LocoPriority, LocomotiveSpec, RouteSpec, Scenario, TrackSelection, TrackSpec,
    TrainSpec, WagonSpec, WorkshopSpec,
};
pub use track::{Track, TrackKind};
pub use train::Train;
pub use wagon::{RejectReason, Wagon, WagonStatus};
pub use workshop::Workshop;
