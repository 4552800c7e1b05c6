// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counted resources (semaphores) with FIFO waiters.

use crate::waiters::{WaiterId, WaiterQueue};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("release without a matching acquire")]
    ReleaseUnderflow,
}

struct ResourceInner {
    capacity: usize,
    in_use: usize,
    waiters: WaiterQueue,
}

/// A counted resource. `acquire().await` blocks while all permits are in
/// use; `release()` is synchronous. Clones share state.
pub struct SimResource {
    inner: Rc<RefCell<ResourceInner>>,
}

impl Clone for SimResource {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl SimResource {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ResourceInner {
                capacity,
                in_use: 0,
                waiters: WaiterQueue::default(),
            })),
        }
    }

    pub fn acquire(&self) -> Acquire {
        Acquire { resource: self.clone(), waiter: None }
    }

    pub fn release(&self) -> Result<(), ResourceError> {
        let mut inner = self.inner.borrow_mut();
        if inner.in_use == 0 {
            return Err(ResourceError::ReleaseUnderflow);
        }
        inner.in_use -= 1;
        inner.waiters.wake_front();
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.inner.borrow().capacity
    }

    pub fn in_use(&self) -> usize {
        self.inner.borrow().in_use
    }

    pub fn available(&self) -> usize {
        let inner = self.inner.borrow();
        inner.capacity - inner.in_use
    }
}

/// Future returned by [`SimResource::acquire`].
pub struct Acquire {
    resource: SimResource,
    waiter: Option<WaiterId>,
}

impl Future for Acquire {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut inner = this.resource.inner.borrow_mut();
        let at_front = match this.waiter {
            None => inner.waiters.is_empty(),
            Some(id) => inner.waiters.is_front(id),
        };
        if at_front && inner.in_use < inner.capacity {
            if let Some(id) = this.waiter.take() {
                inner.waiters.remove(id);
            }
            inner.in_use += 1;
            if inner.in_use < inner.capacity {
                inner.waiters.wake_front();
            }
            Poll::Ready(())
        } else {
            this.waiter = Some(inner.waiters.register(this.waiter, cx.waker()));
            Poll::Pending
        }
    }
}

impl Drop for Acquire {
    fn drop(&mut self) {
        if let Some(id) = self.waiter {
            let mut inner = self.resource.inner.borrow_mut();
            inner.waiters.remove(id);
            if inner.in_use < inner.capacity {
                inner.waiters.wake_front();
            }
        }
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
