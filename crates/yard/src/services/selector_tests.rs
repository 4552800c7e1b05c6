// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn wagons(lengths: &[f64]) -> Vec<(WagonId, f64)> {
    lengths
        .iter()
        .enumerate()
        .map(|(i, len)| (WagonId::new(format!("w{i}")), *len))
        .collect()
}

#[parameterized(
    all_fit = { &[10.0, 10.0, 10.0], 100.0, 3, 0 },
    none_fit = { &[50.0, 60.0], 40.0, 0, 2 },
    prefix_fits = { &[30.0, 30.0, 30.0], 70.0, 2, 1 },
    exact_fit = { &[25.0, 25.0], 50.0, 2, 0 },
    empty_input = { &[], 100.0, 0, 0 },
)]
fn partitions(lengths: &[f64], max: f64, fit: usize, requeue: usize) {
    let (fitting, rest) = partition_by_capacity(&wagons(lengths), max);
    assert_eq!(fitting.len(), fit);
    assert_eq!(rest.len(), requeue);
}

#[test]
fn later_shorter_wagons_still_fit() {
    let (fit, requeue) = partition_by_capacity(&wagons(&[30.0, 80.0, 20.0]), 60.0);
    assert_eq!(fit, vec![WagonId::new("w0"), WagonId::new("w2")]);
    assert_eq!(requeue, vec![WagonId::new("w1")]);
}

#[test]
fn order_is_preserved_within_each_partition() {
    let (fit, _) = partition_by_capacity(&wagons(&[10.0, 10.0, 10.0]), 100.0);
    assert_eq!(fit, vec![WagonId::new("w0"), WagonId::new("w1"), WagonId::new("w2")]);
}
