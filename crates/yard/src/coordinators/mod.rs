// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator ring: five cooperative processes that move wagons from
//! train arrival to parking. Coordinators communicate only through stores
//! and shared resources, never directly with each other.

pub mod arrival;
pub mod outbound;
pub mod parking;
pub mod pickup;
pub mod workshop;

pub use arrival::TrainArrivalCoordinator;
pub use outbound::RetrofittedPickupCoordinator;
pub use parking::ParkingCoordinator;
pub use pickup::PickupCoordinator;
pub use workshop::WorkshopFeedCoordinator;

/// Poll interval while waiting for track capacity to free up.
pub(crate) const CAPACITY_POLL_MIN: f64 = 1.0;
/// Poll interval while waiting for a workshop to clear.
pub(crate) const WORKSHOP_READY_POLL_MIN: f64 = 0.1;
/// Bounded wait for batch stragglers at the completion queue.
pub(crate) const STRAGGLER_WAIT_MIN: f64 = 5.0;
/// Upper bound on a parking transport batch.
pub(crate) const PARKING_BATCH_MAX: usize = 10;
/// A parking track that cannot take this much is treated as full.
pub(crate) const PARKING_FULL_THRESHOLD_M: f64 = 10.0;
