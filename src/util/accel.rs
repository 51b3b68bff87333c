// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hold-to-accelerate stepping for numeric fields.
//!
//! Every arrow key-down on any numeric field bumps a shared counter; any
//! key-up resets it. Past a threshold the step grows quadratically with the
//! counter, so holding a key speeds up without timers.

const THRESHOLD: u32 = 5;

/// Direction of a keyboard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

#[derive(Debug, Default, Clone)]
pub struct KeyAccelerator {
    key_downs: u32,
}

impl KeyAccelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step size for the next key-down.
    pub fn increment(&self) -> i32 {
        if self.key_downs < THRESHOLD {
            1
        } else {
            (self.key_downs as f64 / THRESHOLD as f64).powi(2).floor() as i32
        }
    }

    /// Apply one key-down to `value` and advance the counter.
    pub fn apply(&mut self, value: i32, step: Step) -> i32 {
        let inc = self.increment();
        self.key_downs = self.key_downs.saturating_add(1);
        match step {
            Step::Up => value.saturating_add(inc),
            Step::Down => value.saturating_sub(inc),
        }
    }

    pub fn key_up(&mut self) {
        self.key_downs = 0;
    }
}
