// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Bounded asynchronous task executor
//!
//! Decouples touch-rate event production from command execution. Submission
//! never blocks: the intake queue has a fixed capacity and evicts its oldest
//! undispatched entry when full, so the newest request always wins over a
//! stale one. The single consumer paces dispatch decisions and tracks the
//! number of in-flight tasks; once that cap is reached further items are
//! dropped rather than queued behind a slow command.
//!
//! Queue capacity and the in-flight cap deliberately share one configured
//! number. A dispatched task owns its own failure handling; the executor
//! neither observes nor retries task errors, so one failing button press
//! cannot affect the executor's liveness.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::Notify;
use tokio::task::JoinSet;

type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// One queued unit of work: a label for the logs and the future to run.
struct ScheduledTask {
    label: &'static str,
    future: TaskFuture,
}

/// Throttled task runner with overload shedding.
pub struct BoundedExecutor {
    queue: Mutex<VecDeque<ScheduledTask>>,
    wakeup: Notify,
    closed: AtomicBool,
    max_concurrency: usize,
    execute_interval: Duration,
}

impl BoundedExecutor {
    /// Create an executor with the given queue capacity (shared with the
    /// in-flight cap) and dispatch pacing interval.
    pub fn new(max_concurrency: usize, execute_interval: Duration) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(max_concurrency)),
            wakeup: Notify::new(),
            closed: AtomicBool::new(false),
            max_concurrency,
            execute_interval,
        }
    }

    /// Enqueue a task without blocking.
    ///
    /// If the queue is full the oldest undispatched entry is evicted
    /// (logged) to make room. Submissions after [`stop`](Self::stop) are
    /// discarded.
    pub fn submit<F>(&self, label: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            debug!("Executor closed, discarding task '{}'", label);
            return;
        }

        {
            let mut queue = self.queue.lock().unwrap();

            // if queue's full then drop the oldest item and add the new one
            if queue.len() >= self.max_concurrency {
                if let Some(evicted) = queue.pop_front() {
                    debug!("Queue full, dropped task '{}'", evicted.label);
                }
            }

            queue.push_back(ScheduledTask {
                label,
                future: Box::pin(future),
            });
        }

        self.wakeup.notify_one();
    }

    /// Drain the queue and dispatch tasks until stopped.
    ///
    /// The single consumer. Each drained item is dispatched into the
    /// executor's own task group when fewer than `max_concurrency` children
    /// are in flight, and dropped (logged) otherwise. A fixed pacing sleep
    /// separates dispatch decisions. After [`stop`](Self::stop) the
    /// remaining queue is drained and any children still outstanding are
    /// force-cancelled.
    pub async fn run(&self) {
        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            let task = loop {
                if let Some(task) = self.queue.lock().unwrap().pop_front() {
                    break Some(task);
                }
                if self.closed.load(Ordering::SeqCst) {
                    break None;
                }
                self.wakeup.notified().await;
            };

            let Some(task) = task else { break };

            // reap finished children before the admission check
            while in_flight.try_join_next().is_some() {}

            if in_flight.len() < self.max_concurrency {
                debug!("Dispatching task '{}'", task.label);
                in_flight.spawn(task.future);
            } else {
                warn!("Executor saturated, dropping task '{}'", task.label);
            }

            tokio::time::sleep(self.execute_interval).await;
        }

        if !in_flight.is_empty() {
            debug!("Cancelling {} outstanding task(s)", in_flight.len());
            in_flight.shutdown().await;
        }

        debug!("Executor stopped");
    }

    /// Close the intake side so the consumer terminates once drained.
    pub fn stop(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.wakeup.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn labels(executor: &BoundedExecutor) -> Vec<&'static str> {
        executor
            .queue
            .lock()
            .unwrap()
            .iter()
            .map(|task| task.label)
            .collect()
    }

    #[tokio::test]
    async fn executes_submitted_tasks() {
        let executor = Arc::new(BoundedExecutor::new(4, Duration::from_millis(1)));
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            executor.submit("count", async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        let runner = executor.clone();
        let handle = tokio::spawn(async move { runner.run().await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        executor.stop();
        handle.await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn full_queue_evicts_the_oldest_undispatched_entry() {
        // no consumer running: everything stays queued
        let executor = BoundedExecutor::new(2, Duration::from_millis(1));

        executor.submit("first", async {});
        executor.submit("second", async {});
        executor.submit("third", async {});

        assert_eq!(labels(&executor), vec!["second", "third"]);
    }

    #[tokio::test]
    async fn saturated_executor_drops_instead_of_queueing() {
        let executor = Arc::new(BoundedExecutor::new(2, Duration::from_millis(1)));

        // two children that never complete on their own
        executor.submit("slow-1", std::future::pending());
        executor.submit("slow-2", std::future::pending());

        let runner = executor.clone();
        let handle = tokio::spawn(async move { runner.run().await });

        // both slow tasks get dispatched and pin the in-flight cap
        tokio::time::sleep(Duration::from_millis(50)).await;

        let flag = Arc::new(AtomicBool::new(false));
        let observer = flag.clone();
        executor.submit("dropped", async move {
            observer.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!flag.load(Ordering::SeqCst), "task should have been dropped");

        // stop force-cancels the two pending children
        executor.stop();
        handle.await.unwrap();
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stop_drains_the_queue_before_terminating() {
        let executor = Arc::new(BoundedExecutor::new(4, Duration::from_millis(1)));
        let flag = Arc::new(AtomicBool::new(false));

        let observer = flag.clone();
        executor.submit("late", async move {
            observer.store(true, Ordering::SeqCst);
        });
        executor.stop();

        executor.run().await;
        // the dispatched child may still be settling
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(flag.load(Ordering::SeqCst));
    }
}
