// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Supervised task group for the controller's long-running loops.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio::task::JoinHandle;

use crate::remote::PanelSession;
use crate::scheduler::BoundedExecutor;
use crate::ui::ControlPanel;

/// Owns the background loops and their lifetimes.
///
/// The loops sleep for up to twenty minutes at a time, so cancellation is an
/// abort rather than a cooperative flag; call
/// [`BoundedExecutor::stop`] first to let the command queue drain.
pub struct Daemon {
    tasks: Vec<(&'static str, JoinHandle<Result<()>>)>,
}

impl Daemon {
    /// Create a new daemon instance
    pub fn new() -> Self {
        Daemon { tasks: Vec::new() }
    }

    /// Launch all background loops.
    pub fn launch(
        &mut self,
        session: Arc<PanelSession>,
        executor: Arc<BoundedExecutor>,
        panel: Arc<ControlPanel>,
    ) {
        self.start_keep_alive_state(session.clone());
        self.start_keep_alive_power(session);
        self.start_executor(executor);
        self.start_touch_poll(panel.clone());
        self.start_screen_refresh(panel);
    }

    /// Keep the observed unit state fresh between re-auth cycles.
    fn start_keep_alive_state(&mut self, session: Arc<PanelSession>) {
        info!("Starting state keep-alive task");

        let task = tokio::spawn(async move { session.keep_alive_state().await.map_err(Into::into) });
        self.tasks.push(("keep-alive-state", task));
    }

    /// Re-login on a coarse interval, preempting the server's session expiry.
    fn start_keep_alive_power(&mut self, session: Arc<PanelSession>) {
        info!("Starting power keep-alive task");

        let task = tokio::spawn(async move { session.keep_alive_power().await.map_err(Into::into) });
        self.tasks.push(("keep-alive-power", task));
    }

    /// Drain and dispatch the command queue.
    fn start_executor(&mut self, executor: Arc<BoundedExecutor>) {
        info!("Starting command executor task");

        let task = tokio::spawn(async move {
            executor.run().await;
            Ok(())
        });
        self.tasks.push(("executor", task));
    }

    /// Poll the touch sensor and dispatch hits.
    fn start_touch_poll(&mut self, panel: Arc<ControlPanel>) {
        info!("Starting touch poll task");

        let task = tokio::spawn(panel.poll_touch());
        self.tasks.push(("touch-poll", task));
    }

    /// Refresh the on-screen temperatures periodically.
    fn start_screen_refresh(&mut self, panel: Arc<ControlPanel>) {
        info!("Starting screen refresh task");

        let task = tokio::spawn(panel.update_temp_loop());
        self.tasks.push(("screen-refresh", task));
    }

    /// Cancel all outstanding loops.
    pub fn shutdown(&self) {
        info!("Shutting down daemon tasks");
        for (_, task) in &self.tasks {
            task.abort();
        }
    }

    /// Wait for all tasks to settle and surface the first real failure.
    ///
    /// Cancellations are expected after [`shutdown`](Self::shutdown) and are
    /// not errors.
    pub async fn join(self) -> Result<()> {
        let mut first_failure = None;

        for (name, task) in self.tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!("Task {} failed: {:#}", name, err);
                    first_failure.get_or_insert(err);
                }
                Err(err) if err.is_cancelled() => {}
                Err(err) => error!("Task {} panicked: {}", name, err),
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}
