// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch formation within a destination's free length.

use ys_core::ids::WagonId;

/// Split wagons into those that fit within `max_len_m` (greedy, in order)
/// and those to requeue. A wagon that does not fit is skipped, not a
/// barrier: later shorter wagons may still fit.
pub fn partition_by_capacity(
    wagons: &[(WagonId, f64)],
    max_len_m: f64,
) -> (Vec<WagonId>, Vec<WagonId>) {
    let mut fit = Vec::new();
    let mut requeue = Vec::new();
    let mut used = 0.0;
    for (id, length) in wagons {
        if used + length <= max_len_m {
            used += length;
            fit.push(id.clone());
        } else {
            requeue.push(id.clone());
        }
    }
    (fit, requeue)
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
