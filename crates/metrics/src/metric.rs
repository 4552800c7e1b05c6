// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metric values with declared units.

use serde::{Deserialize, Serialize};

/// Unit of a metric value. Declared on every entry; a metric never mixes
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Minutes,
    Percent,
    Count,
    PerHour,
    Meters,
}

ys_core::simple_display! {
    Unit {
        Minutes => "min",
        Percent => "%",
        Count => "count",
        PerHour => "per_hour",
        Meters => "m",
    }
}

/// A named metric produced by a collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    pub unit: Unit,
    pub category: &'static str,
}

impl Metric {
    pub fn new(category: &'static str, name: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self { name: name.into(), value, unit, category }
    }
}

/// A metric entry inside a category of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub name: String,
    pub value: f64,
    pub unit: Unit,
}

impl From<Metric> for MetricEntry {
    fn from(metric: Metric) -> Self {
        Self { name: metric.name, value: metric.value, unit: metric.unit }
    }
}
