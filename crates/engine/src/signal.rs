// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot signals.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct SignalInner {
    triggered: bool,
    waiters: Vec<Waker>,
}

/// A one-shot signal: awaited by any number of processes, triggered at most
/// once. Clones share state.
pub struct SimSignal {
    inner: Rc<RefCell<SignalInner>>,
}

impl Clone for SimSignal {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl SimSignal {
    pub(crate) fn new() -> Self {
        Self { inner: Rc::new(RefCell::new(SignalInner { triggered: false, waiters: Vec::new() })) }
    }

    /// Fire the signal. Returns false if it had already fired.
    pub fn trigger(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.triggered {
            return false;
        }
        inner.triggered = true;
        for waker in inner.waiters.drain(..) {
            waker.wake();
        }
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.borrow().triggered
    }

    pub fn wait(&self) -> Wait {
        Wait { signal: self.clone() }
    }
}

/// Future returned by [`SimSignal::wait`].
pub struct Wait {
    signal: SimSignal,
}

impl Future for Wait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.signal.inner.borrow_mut();
        if inner.triggered {
            Poll::Ready(())
        } else {
            inner.waiters.push(cx.waker().clone());
            Poll::Pending
        }
    }
}
