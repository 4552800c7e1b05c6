// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::events::EventHub;
use indexmap::IndexMap;
use ys_core::ids::WorkshopId;
use ys_core::workshop::Workshop;
use ys_engine::SimEngine;

fn distributor(stations_per_shop: &[usize]) -> WorkshopDistributor {
    let engine = SimEngine::new();
    let events = EventHub::new(engine.clock());
    let workshops: Vec<Workshop> = stations_per_shop
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            Workshop::new(format!("ws{}", i + 1).into(), format!("track{}", i + 1).into(), n)
                .unwrap()
        })
        .collect();
    WorkshopDistributor::new(StationPool::new(&engine, workshops, events))
}

fn wagons(n: usize) -> Vec<WagonId> {
    (0..n).map(|i| WagonId::new(format!("w{i}"))).collect()
}

fn totals(assignments: Vec<(WorkshopId, Vec<WagonId>)>) -> IndexMap<WorkshopId, usize> {
    let mut map: IndexMap<WorkshopId, usize> = IndexMap::new();
    for (workshop, batch) in assignments {
        *map.entry(workshop).or_insert(0) += batch.len();
    }
    map
}

#[test]
fn six_wagons_over_two_double_workshops_split_four_two() {
    let d = distributor(&[2, 2]);
    let map = totals(d.distribute(wagons(6)).unwrap());
    assert_eq!(map.get(&WorkshopId::new("ws1")).copied(), Some(4));
    assert_eq!(map.get(&WorkshopId::new("ws2")).copied(), Some(2));
}

#[test]
fn seven_wagons_keep_the_known_five_two_split() {
    // The heuristic only sees current availability, so the optimal 4/3 is
    // deliberately not produced.
    let d = distributor(&[2, 2]);
    let map = totals(d.distribute(wagons(7)).unwrap());
    assert_eq!(map.get(&WorkshopId::new("ws1")).copied(), Some(5));
    assert_eq!(map.get(&WorkshopId::new("ws2")).copied(), Some(2));
}

#[test]
fn second_workshop_is_never_starved() {
    let d = distributor(&[2, 2]);
    let map = totals(d.distribute(wagons(6)).unwrap());
    assert!(map.get(&WorkshopId::new("ws2")).copied().unwrap_or(0) > 0);
}

#[test]
fn small_batches_fill_the_widest_workshop_first() {
    let d = distributor(&[1, 3]);
    let map = totals(d.distribute(wagons(3)).unwrap());
    assert_eq!(map.get(&WorkshopId::new("ws2")).copied(), Some(3));
    assert_eq!(map.get(&WorkshopId::new("ws1")).copied(), None);
}

#[test]
fn single_workshop_takes_everything() {
    let d = distributor(&[2]);
    let map = totals(d.distribute(wagons(5)).unwrap());
    assert_eq!(map.get(&WorkshopId::new("ws1")).copied(), Some(5));
}

#[test]
fn empty_input_distributes_nothing() {
    let d = distributor(&[2, 2]);
    assert!(d.distribute(Vec::new()).unwrap().is_empty());
}
