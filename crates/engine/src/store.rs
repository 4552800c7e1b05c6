// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded FIFO stores — the hand-off primitive between coordinators.
//!
//! `put` blocks when full, `get` blocks when empty, and both preserve FIFO
//! order among items and among blocked processes. `get_or_timeout` composes
//! a get with a delay and yields whichever fires first; coordinators use it
//! to close partial batches after a bounded straggler wait.

use crate::delay::Delay;
use crate::executor::Core;
use crate::waiters::{WaiterId, WaiterQueue};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

struct StoreInner<T> {
    capacity: Option<usize>,
    items: VecDeque<T>,
    getters: WaiterQueue,
    putters: WaiterQueue,
}

impl<T> StoreInner<T> {
    fn has_space(&self) -> bool {
        match self.capacity {
            None => true,
            Some(cap) => self.items.len() < cap,
        }
    }
}

/// A FIFO store shared between producers and consumers. Clones share state.
pub struct Store<T> {
    core: Rc<RefCell<Core>>,
    inner: Rc<RefCell<StoreInner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self { core: Rc::clone(&self.core), inner: Rc::clone(&self.inner) }
    }
}

impl<T> Store<T> {
    pub(crate) fn new(core: Rc<RefCell<Core>>, capacity: Option<usize>) -> Self {
        Self {
            core,
            inner: Rc::new(RefCell::new(StoreInner {
                capacity,
                items: VecDeque::new(),
                getters: WaiterQueue::default(),
                putters: WaiterQueue::default(),
            })),
        }
    }

    /// Blocking put; suspends while the store is full.
    pub fn put(&self, item: T) -> Put<T> {
        Put { store: self.clone(), item: Some(item), waiter: None }
    }

    /// Blocking get; suspends while the store is empty.
    pub fn get(&self) -> Get<T> {
        Get { store: self.clone(), waiter: None }
    }

    /// Get with a bounded wait: resolves to `None` once `timeout_min`
    /// simulated minutes pass without an item.
    pub fn get_or_timeout(&self, timeout_min: f64) -> GetOrTimeout<T> {
        GetOrTimeout {
            get: self.get(),
            delay: Delay::new(Rc::clone(&self.core), timeout_min.max(0.0)),
        }
    }

    /// Non-blocking put. Fails (returning the item) when the store is full
    /// or when producers are already queued ahead.
    pub fn try_put(&self, item: T) -> Result<(), T> {
        let mut inner = self.inner.borrow_mut();
        if !inner.putters.is_empty() || !inner.has_space() {
            return Err(item);
        }
        inner.items.push_back(item);
        inner.getters.wake_front();
        Ok(())
    }

    /// Non-blocking pop. Skips the queue only when no consumer is already
    /// waiting, keeping FIFO fairness.
    pub fn try_get(&self) -> Option<T> {
        let mut inner = self.inner.borrow_mut();
        if !inner.getters.is_empty() {
            return None;
        }
        let item = inner.items.pop_front();
        if item.is_some() {
            inner.putters.wake_front();
        }
        item
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.borrow().capacity
    }
}

impl<T: Clone> Store<T> {
    /// Snapshot of queued items, front first. Batchers use this to size a
    /// batch without committing to a take.
    pub fn items(&self) -> Vec<T> {
        self.inner.borrow().items.iter().cloned().collect()
    }
}

/// Future returned by [`Store::put`].
pub struct Put<T> {
    store: Store<T>,
    item: Option<T>,
    waiter: Option<WaiterId>,
}

impl<T: Unpin> Future for Put<T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut inner = this.store.inner.borrow_mut();
        let at_front = match this.waiter {
            None => inner.putters.is_empty(),
            Some(id) => inner.putters.is_front(id),
        };
        if at_front && inner.has_space() {
            if let Some(id) = this.waiter.take() {
                inner.putters.remove(id);
            }
            if let Some(item) = this.item.take() {
                inner.items.push_back(item);
            }
            inner.getters.wake_front();
            if inner.has_space() {
                inner.putters.wake_front();
            }
            Poll::Ready(())
        } else {
            this.waiter = Some(inner.putters.register(this.waiter, cx.waker()));
            Poll::Pending
        }
    }
}

impl<T> Drop for Put<T> {
    fn drop(&mut self) {
        if let Some(id) = self.waiter {
            let mut inner = self.store.inner.borrow_mut();
            inner.putters.remove(id);
            if inner.has_space() {
                inner.putters.wake_front();
            }
        }
    }
}

/// Future returned by [`Store::get`].
pub struct Get<T> {
    store: Store<T>,
    waiter: Option<WaiterId>,
}

impl<T> Future for Get<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut inner = this.store.inner.borrow_mut();
        let at_front = match this.waiter {
            None => inner.getters.is_empty(),
            Some(id) => inner.getters.is_front(id),
        };
        if at_front {
            if let Some(item) = inner.items.pop_front() {
                if let Some(id) = this.waiter.take() {
                    inner.getters.remove(id);
                }
                inner.putters.wake_front();
                if !inner.items.is_empty() {
                    inner.getters.wake_front();
                }
                return Poll::Ready(item);
            }
        }
        this.waiter = Some(inner.getters.register(this.waiter, cx.waker()));
        Poll::Pending
    }
}

impl<T> Drop for Get<T> {
    fn drop(&mut self) {
        if let Some(id) = self.waiter {
            let mut inner = self.store.inner.borrow_mut();
            inner.getters.remove(id);
            if !inner.items.is_empty() {
                inner.getters.wake_front();
            }
        }
    }
}

/// Future returned by [`Store::get_or_timeout`].
pub struct GetOrTimeout<T> {
    get: Get<T>,
    delay: Delay,
}

impl<T> Future for GetOrTimeout<T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Poll::Ready(item) = Pin::new(&mut this.get).poll(cx) {
            return Poll::Ready(Some(item));
        }
        match Pin::new(&mut this.delay).poll(cx) {
            // The get side deregisters via its Drop when this future drops.
            Poll::Ready(_) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
