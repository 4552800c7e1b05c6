// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event emission: stamps ids and simulated timestamps, feeds the bus, and
//! keeps the replay log.

use std::cell::RefCell;
use std::rc::Rc;
use ys_core::bus::{EventBus, HandlerError};
use ys_core::event::{DomainEvent, EventKind, EventTag};
use ys_core::ids::EventId;
use ys_engine::SimClock;

struct HubInner {
    bus: EventBus,
    log: Vec<DomainEvent>,
    next_id: u64,
}

/// Shared handle for emitting domain events.
///
/// Every emitted event carries the current virtual clock and a sequential
/// id, is delivered synchronously through the bus, and is appended to the
/// replay log.
#[derive(Clone)]
pub struct EventHub {
    clock: SimClock,
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            inner: Rc::new(RefCell::new(HubInner {
                bus: EventBus::new(),
                log: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn emit(&self, context: &'static str, kind: EventKind) {
        let minute = self.clock.now();
        let mut inner = self.inner.borrow_mut();
        let id = EventId(inner.next_id);
        inner.next_id += 1;
        let event = DomainEvent { id, minute, context: context.into(), kind };
        tracing::debug!(event = event.kind.name(), sim_min = minute, "emit");
        inner.bus.publish(&event);
        inner.log.push(event);
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: FnMut(&DomainEvent) -> Result<(), HandlerError> + 'static,
    {
        self.inner.borrow_mut().bus.subscribe(handler);
    }

    pub fn subscribe_tags<F>(&self, tags: Vec<EventTag>, handler: F)
    where
        F: FnMut(&DomainEvent) -> Result<(), HandlerError> + 'static,
    {
        self.inner.borrow_mut().bus.subscribe_tags(tags, handler);
    }

    /// The full ordered event log so far.
    pub fn log(&self) -> Vec<DomainEvent> {
        self.inner.borrow().log.clone()
    }

    pub fn published(&self, tag: EventTag) -> u64 {
        self.inner.borrow().bus.published(tag)
    }

    pub fn handler_error_count(&self) -> u64 {
        self.inner.borrow().bus.handler_error_count()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}
