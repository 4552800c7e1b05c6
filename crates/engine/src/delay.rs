// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timed suspension.

use crate::executor::{Core, ProcessError};
use crate::TIME_EPS;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

enum DelayState {
    Init { minutes: f64 },
    Scheduled { at: f64 },
    Done,
}

/// Future returned by `SimEngine::delay`.
///
/// A zero delay still suspends once, yielding to other processes ready at
/// the same timestamp. A negative duration resolves to a process error.
pub struct Delay {
    core: Rc<RefCell<Core>>,
    state: DelayState,
}

impl Delay {
    pub(crate) fn new(core: Rc<RefCell<Core>>, minutes: f64) -> Self {
        Self { core, state: DelayState::Init { minutes } }
    }
}

impl Future for Delay {
    type Output = Result<(), ProcessError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.state {
            DelayState::Init { minutes } => {
                if !minutes.is_finite() || minutes < 0.0 {
                    self.state = DelayState::Done;
                    return Poll::Ready(Err(ProcessError::new(format!(
                        "delay duration must be non-negative, got {minutes}"
                    ))));
                }
                let mut core = self.core.borrow_mut();
                let at = core.now() + minutes;
                core.register_timer(at, cx.waker().clone());
                drop(core);
                self.state = DelayState::Scheduled { at };
                Poll::Pending
            }
            DelayState::Scheduled { at } => {
                if self.core.borrow().now() + TIME_EPS >= at {
                    self.state = DelayState::Done;
                    Poll::Ready(Ok(()))
                } else {
                    // Spurious wake; the registered timer still holds a
                    // waker for this task.
                    Poll::Pending
                }
            }
            DelayState::Done => Poll::Pending,
        }
    }
}
