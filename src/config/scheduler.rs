// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration for the bounded command executor

use serde::{Deserialize, Serialize};

/// Settings for the task executor that decouples touch input from command
/// execution. Queue capacity and the in-flight dispatch cap share the same
/// number.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Queue capacity and concurrent dispatch limit
    pub queue_size: usize,
    /// Pacing delay between dispatch decisions, milliseconds
    pub execute_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            queue_size: 4,
            execute_interval_ms: 100,
        }
    }
}
