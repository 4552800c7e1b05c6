// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for yard entities.

crate::entity_id! {
    /// Identifier of a single wagon, unique within a scenario.
    pub struct WagonId;
}

crate::entity_id! {
    /// Identifier of an inbound train.
    pub struct TrainId;
}

crate::entity_id! {
    /// Identifier of a shunting locomotive.
    pub struct LocomotiveId;
}

crate::entity_id! {
    /// Identifier of a yard track.
    pub struct TrackId;
}

crate::entity_id! {
    /// Identifier of a retrofit workshop.
    pub struct WorkshopId;
}

/// Identifier of a domain event.
///
/// Assigned as a monotonically increasing sequence in emission order, so two
/// runs of the same scenario produce byte-identical event streams.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt-{}", self.0)
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
