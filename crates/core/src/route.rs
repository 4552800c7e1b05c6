// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route table for transit durations between tracks.

use crate::error::ConfigError;
use crate::ids::TrackId;
use serde::{Deserialize, Serialize};

/// Transit duration applied when no route covers a pair of tracks.
pub const DEFAULT_TRANSIT_MIN: f64 = 1.0;

/// An ordered track sequence with a transit duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub sequence: Vec<TrackId>,
    pub duration_min: f64,
}

impl Route {
    fn endpoints(&self) -> Option<(&TrackId, &TrackId)> {
        match (self.sequence.first(), self.sequence.last()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// Lookup table over routes. Duration lookup is undirected: either endpoint
/// of a route's sequence may be the origin.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, ConfigError> {
        for route in &routes {
            if route.sequence.len() < 2 {
                return Err(ConfigError::ShortRoute { route: route.id.clone() });
            }
        }
        Ok(Self { routes })
    }

    /// Transit minutes between two tracks.
    ///
    /// Same-track moves cost nothing. An uncovered pair falls back to
    /// [`DEFAULT_TRANSIT_MIN`].
    pub fn duration(&self, from: &TrackId, to: &TrackId) -> f64 {
        if from == to {
            return 0.0;
        }
        for route in &self.routes {
            if let Some((a, b)) = route.endpoints() {
                if (a == from && b == to) || (a == to && b == from) {
                    return route.duration_min;
                }
            }
        }
        DEFAULT_TRANSIT_MIN
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
