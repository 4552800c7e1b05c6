// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn ids_compare_with_strings() {
    let id = TrackId::new("retrofit_1");
    assert_eq!(id, "retrofit_1");
    assert_eq!(id.as_str(), "retrofit_1");
    assert_eq!(id.to_string(), "retrofit_1");
}

#[test]
fn ids_serialize_transparently() {
    let id = WagonId::new("w42");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"w42\"");
    let back: WagonId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn ids_order_lexicographically() {
    let mut ids = vec![TrackId::new("ws2"), TrackId::new("collection"), TrackId::new("ws1")];
    ids.sort();
    assert_eq!(
        ids,
        vec![TrackId::new("collection"), TrackId::new("ws1"), TrackId::new("ws2")]
    );
}

#[test]
fn event_ids_are_sequence_numbers() {
    let id = EventId(7);
    assert_eq!(id.to_string(), "evt-7");
    assert!(EventId(7) < EventId(8));
    assert_eq!(serde_json::to_string(&id).unwrap(), "7");
}
