// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coupler systems a wagon can carry.

use serde::{Deserialize, Serialize};

/// Mechanical coupler type.
///
/// `Screw` is the manual legacy system, `Dac` the digital automatic coupler a
/// retrofit installs. `Hybrid` wagons carry both ends; for timing purposes
/// they handle like screw-coupled stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CouplerType {
    Screw,
    Dac,
    Hybrid,
}

impl CouplerType {
    /// True for wagons that already carry a digital automatic coupler.
    pub fn is_dac(self) -> bool {
        matches!(self, CouplerType::Dac)
    }
}

crate::simple_display! {
    CouplerType {
        Screw => "SCREW",
        Dac => "DAC",
        Hybrid => "HYBRID",
    }
}
