// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ys-yard: the retrofit yard itself — resource pools, the locomotive
//! service, the coordinator ring, and the orchestrator that wires a scenario
//! into the simulation engine.

pub mod coordinators;
pub mod events;
pub mod orchestrator;
pub mod registry;
pub mod resources;
pub mod services;

pub use events::EventHub;
pub use orchestrator::{FaultRecord, SimulationReport, YardOrchestrator};
pub use registry::WagonRegistry;

use ys_engine::ProcessError;

/// Map a domain error onto a process fault at a coordinator boundary.
pub(crate) fn fault(err: impl std::fmt::Display) -> ProcessError {
    ProcessError::new(err)
}
