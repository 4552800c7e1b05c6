// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process publish/subscribe for domain events.
//!
//! Delivery is synchronous and in registration order. A failing handler
//! never prevents later subscribers from seeing the event: errors are
//! counted and forwarded to registered error handlers.

use crate::event::{DomainEvent, EventTag};
use indexmap::IndexMap;
use thiserror::Error;

/// Error returned by a subscriber handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

type Handler = Box<dyn FnMut(&DomainEvent) -> Result<(), HandlerError>>;
type Hook = Box<dyn FnMut(&DomainEvent)>;
type ErrorHandler = Box<dyn FnMut(&DomainEvent, &HandlerError)>;

struct Subscription {
    /// `None` subscribes to every event kind.
    tags: Option<Vec<EventTag>>,
    handler: Handler,
}

/// Synchronous event bus.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    error_handlers: Vec<ErrorHandler>,
    pre_publish: Vec<Hook>,
    post_publish: Vec<Hook>,
    published_by_tag: IndexMap<EventTag, u64>,
    handler_errors: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event kind.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&DomainEvent) -> Result<(), HandlerError> + 'static,
    {
        self.subscriptions.push(Subscription { tags: None, handler: Box::new(handler) });
    }

    /// Subscribe to a fixed set of event kinds.
    pub fn subscribe_tags<F>(&mut self, tags: Vec<EventTag>, handler: F)
    where
        F: FnMut(&DomainEvent) -> Result<(), HandlerError> + 'static,
    {
        self.subscriptions.push(Subscription { tags: Some(tags), handler: Box::new(handler) });
    }

    pub fn add_error_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&DomainEvent, &HandlerError) + 'static,
    {
        self.error_handlers.push(Box::new(handler));
    }

    pub fn add_pre_publish_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&DomainEvent) + 'static,
    {
        self.pre_publish.push(Box::new(hook));
    }

    pub fn add_post_publish_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&DomainEvent) + 'static,
    {
        self.post_publish.push(Box::new(hook));
    }

    /// Deliver an event to all matching subscribers in registration order.
    pub fn publish(&mut self, event: &DomainEvent) {
        let tag = event.tag();
        *self.published_by_tag.entry(tag).or_insert(0) += 1;

        for hook in &mut self.pre_publish {
            hook(event);
        }
        for sub in &mut self.subscriptions {
            let interested = match &sub.tags {
                None => true,
                Some(tags) => tags.contains(&tag),
            };
            if !interested {
                continue;
            }
            if let Err(err) = (sub.handler)(event) {
                self.handler_errors += 1;
                tracing::warn!(event = event.kind.name(), error = %err, "event handler failed");
                for on_error in &mut self.error_handlers {
                    on_error(event, &err);
                }
            }
        }
        for hook in &mut self.post_publish {
            hook(event);
        }
    }

    pub fn published(&self, tag: EventTag) -> u64 {
        self.published_by_tag.get(&tag).copied().unwrap_or(0)
    }

    pub fn total_published(&self) -> u64 {
        self.published_by_tag.values().sum()
    }

    pub fn handler_error_count(&self) -> u64 {
        self.handler_errors
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
