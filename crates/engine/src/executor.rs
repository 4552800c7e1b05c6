// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine core: task table, timer wheel, ready queue, and run loop.

use crate::clock::SimClock;
use crate::delay::Delay;
use crate::resource::SimResource;
use crate::signal::SimSignal;
use crate::store::Store;
use crate::TIME_EPS;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use thiserror::Error;

/// Error carried out of a failed simulation process.
///
/// Coordinators convert their domain errors into this at the process
/// boundary; the engine records the fault and keeps running.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProcessError(pub String);

impl ProcessError {
    pub fn new(msg: impl std::fmt::Display) -> Self {
        Self(msg.to_string())
    }
}

impl From<&str> for ProcessError {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProcessError {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A recorded process failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessFault {
    pub process: String,
    pub minute: f64,
    pub error: ProcessError,
}

/// Why and where a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Clock value when the run stopped.
    pub end_min: f64,
    /// True when the run stopped at the `until` deadline.
    pub hit_deadline: bool,
    /// True when no process was runnable and no timer pending before the
    /// deadline (engine quiescence).
    pub quiescent: bool,
    pub faults: Vec<ProcessFault>,
}

/// Counters mirrored out for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub processes_scheduled: u64,
    pub stores_created: u64,
    pub resources_created: u64,
    pub signals_created: u64,
    pub faults: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TaskId(u64);

/// Handle returned by [`SimEngine::schedule`].
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    id: u64,
    name: String,
}

impl ProcessHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

type ProcessFuture = Pin<Box<dyn Future<Output = Result<(), ProcessError>>>>;

struct Task {
    name: String,
    future: ProcessFuture,
}

/// Ready-to-poll task ids, FIFO. Shared with wakers, hence `Arc<Mutex<_>>`
/// even though the engine itself is single-threaded.
#[derive(Default)]
pub(crate) struct ReadyQueue {
    queue: Mutex<VecDeque<TaskId>>,
}

impl ReadyQueue {
    fn push(&self, id: TaskId) {
        self.queue.lock().push_back(id);
    }

    fn pop(&self) -> Option<TaskId> {
        self.queue.lock().pop_front()
    }
}

struct TaskWaker {
    id: TaskId,
    ready: Arc<ReadyQueue>,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.ready.push(self.id);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.ready.push(self.id);
    }
}

/// A pending timer. Ordering is by `(at, seq)` so same-minute timers fire in
/// registration order; the heap is a max-heap, hence the reversed compare.
struct TimerEntry {
    at: f64,
    seq: u64,
    waker: Waker,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub(crate) struct Core {
    now: f64,
    timer_seq: u64,
    timers: BinaryHeap<TimerEntry>,
    tasks: HashMap<TaskId, Task>,
    next_task: u64,
    faults: Vec<ProcessFault>,
    stats: EngineStats,
}

impl Core {
    pub(crate) fn now(&self) -> f64 {
        self.now
    }

    /// Register a timer at absolute minute `at`, waking `waker` when due.
    pub(crate) fn register_timer(&mut self, at: f64, waker: Waker) {
        let seq = self.timer_seq;
        self.timer_seq += 1;
        self.timers.push(TimerEntry { at, seq, waker });
    }

    pub(crate) fn bump_stores(&mut self) {
        self.stats.stores_created += 1;
    }

    pub(crate) fn bump_resources(&mut self) {
        self.stats.resources_created += 1;
    }

    pub(crate) fn bump_signals(&mut self) {
        self.stats.signals_created += 1;
    }
}

type Hook = Box<dyn FnMut()>;

/// The discrete-event simulation engine. Cheap to clone; clones share one
/// virtual clock and task table.
#[derive(Clone)]
pub struct SimEngine {
    core: Rc<RefCell<Core>>,
    ready: Arc<ReadyQueue>,
    hooks: Rc<RefCell<Hooks>>,
}

#[derive(Default)]
struct Hooks {
    pre_run: Vec<Hook>,
    post_run: Vec<Hook>,
}

impl Default for SimEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimEngine {
    pub fn new() -> Self {
        Self {
            core: Rc::new(RefCell::new(Core {
                now: 0.0,
                timer_seq: 0,
                timers: BinaryHeap::new(),
                tasks: HashMap::new(),
                next_task: 0,
                faults: Vec::new(),
                stats: EngineStats::default(),
            })),
            ready: Arc::new(ReadyQueue::default()),
            hooks: Rc::new(RefCell::new(Hooks::default())),
        }
    }

    /// Current simulated time in minutes since the scenario origin.
    pub fn now(&self) -> f64 {
        self.core.borrow().now
    }

    /// A cheap cloneable handle exposing only the clock.
    pub fn clock(&self) -> SimClock {
        SimClock::new(Rc::clone(&self.core))
    }

    /// Admit a cooperative process. The process is runnable immediately (at
    /// the current timestamp, after already-ready tasks).
    pub fn schedule<F>(&self, name: impl Into<String>, future: F) -> ProcessHandle
    where
        F: Future<Output = Result<(), ProcessError>> + 'static,
    {
        let name = name.into();
        let mut core = self.core.borrow_mut();
        let id = TaskId(core.next_task);
        core.next_task += 1;
        core.stats.processes_scheduled += 1;
        core.tasks.insert(id, Task { name: name.clone(), future: Box::pin(future) });
        drop(core);
        self.ready.push(id);
        tracing::debug!(process = %name, "scheduled process");
        ProcessHandle { id: id.0, name }
    }

    /// Suspend the calling process for `minutes` of simulated time.
    ///
    /// `delay(0.0)` yields to other processes ready at the same timestamp.
    /// Negative durations resolve to a process error.
    pub fn delay(&self, minutes: f64) -> Delay {
        Delay::new(Rc::clone(&self.core), minutes)
    }

    /// Create a bounded FIFO store; `None` means unbounded.
    pub fn store<T>(&self, capacity: Option<usize>) -> Store<T> {
        self.core.borrow_mut().bump_stores();
        Store::new(Rc::clone(&self.core), capacity)
    }

    /// Create a counted resource with FIFO waiters.
    pub fn resource(&self, capacity: usize) -> SimResource {
        self.core.borrow_mut().bump_resources();
        SimResource::new(capacity)
    }

    /// Create a one-shot signal.
    pub fn signal(&self) -> SimSignal {
        self.core.borrow_mut().bump_signals();
        SimSignal::new()
    }

    pub fn add_pre_run_hook(&self, hook: impl FnMut() + 'static) {
        self.hooks.borrow_mut().pre_run.push(Box::new(hook));
    }

    pub fn add_post_run_hook(&self, hook: impl FnMut() + 'static) {
        self.hooks.borrow_mut().post_run.push(Box::new(hook));
    }

    pub fn stats(&self) -> EngineStats {
        self.core.borrow().stats
    }

    pub fn faults(&self) -> Vec<ProcessFault> {
        self.core.borrow().faults.clone()
    }

    /// Advance the clock by dispatching ready processes and due timers until
    /// the deadline, quiescence, or both.
    pub fn run(&self, until: Option<f64>) -> RunOutcome {
        for hook in &mut self.hooks.borrow_mut().pre_run {
            hook();
        }

        let mut hit_deadline = false;
        let mut quiescent = false;

        loop {
            self.drain_ready();

            let mut core = self.core.borrow_mut();
            let next_due = core.timers.peek().map(|t| t.at);
            match next_due {
                None => {
                    // Nothing runnable and nothing pending.
                    if let Some(limit) = until {
                        if core.now < limit {
                            quiescent = true;
                            core.now = limit;
                        }
                        hit_deadline = !quiescent;
                    } else {
                        quiescent = true;
                    }
                    break;
                }
                Some(at) => {
                    if let Some(limit) = until {
                        if at > limit + TIME_EPS {
                            core.now = limit;
                            hit_deadline = true;
                            break;
                        }
                    }
                    core.now = core.now.max(at);
                    let now = core.now;
                    // Fire every timer due at this instant, in (at, seq)
                    // order. Waking only touches the ready queue, which is
                    // not behind the core borrow.
                    while core.timers.peek().is_some_and(|t| t.at <= now + TIME_EPS) {
                        if let Some(entry) = core.timers.pop() {
                            entry.waker.wake();
                        }
                    }
                }
            }
        }

        let outcome = {
            let core = self.core.borrow();
            RunOutcome {
                end_min: core.now,
                hit_deadline,
                quiescent,
                faults: core.faults.clone(),
            }
        };

        for hook in &mut self.hooks.borrow_mut().post_run {
            hook();
        }

        tracing::debug!(
            end_min = outcome.end_min,
            quiescent = outcome.quiescent,
            faults = outcome.faults.len(),
            "run finished"
        );
        outcome
    }

    /// Poll every ready task until the ready queue empties.
    fn drain_ready(&self) {
        while let Some(id) = self.ready.pop() {
            // Remove the task so its poll can re-borrow the core.
            let Some(mut task) = self.core.borrow_mut().tasks.remove(&id) else {
                // Stale wake for a finished task.
                continue;
            };
            let waker = Waker::from(Arc::new(TaskWaker { id, ready: Arc::clone(&self.ready) }));
            let mut cx = Context::from_waker(&waker);
            match task.future.as_mut().poll(&mut cx) {
                Poll::Pending => {
                    self.core.borrow_mut().tasks.insert(id, task);
                }
                Poll::Ready(Ok(())) => {
                    tracing::debug!(process = %task.name, "process finished");
                }
                Poll::Ready(Err(error)) => {
                    let mut core = self.core.borrow_mut();
                    let minute = core.now;
                    core.stats.faults += 1;
                    tracing::warn!(process = %task.name, %error, minute, "process faulted");
                    core.faults.push(ProcessFault { process: task.name, minute, error });
                }
            }
        }
    }

}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
