// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Fixed-timestep accumulator
//!
//! Variable frame times are converted into a whole number of fixed
//! sub-steps. Leftover time carries into the next frame. The number of
//! sub-steps per frame is capped; when the cap is hit the surplus time is
//! dropped rather than replayed, which keeps a slow frame from snowballing.

use crate::config::PhysicsConfig;

/// Fixed-step clock driving the physics pipeline
///
/// # Examples
///
/// ```
/// use physics_core::timer::FixedTimestep;
///
/// let mut timer = FixedTimestep::new(0.25, 8);
/// assert_eq!(timer.advance(0.625), 2);
/// assert_eq!(timer.advance(0.125), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    fixed_delta_time: f64,
    max_substeps: u32,
    accumulator: f64,
    accumulated_time: f64,
    substeps: u32,
}

impl FixedTimestep {
    /// Create a timer with the given sub-step length and per-frame cap
    ///
    /// # Panics
    ///
    /// Panics if `fixed_delta_time` is non-positive, NaN, or infinite, or if
    /// `max_substeps` is zero.
    pub fn new(fixed_delta_time: f64, max_substeps: u32) -> Self {
        assert!(
            fixed_delta_time > 0.0 && fixed_delta_time.is_finite(),
            "Timestep must be positive and finite"
        );
        assert!(max_substeps > 0, "Max substeps must be at least 1");
        FixedTimestep {
            fixed_delta_time,
            max_substeps,
            accumulator: 0.0,
            accumulated_time: 0.0,
            substeps: 0,
        }
    }

    /// Create a timer from a validated configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.fixed_delta_time, config.max_substeps)
    }

    /// Feed a frame's elapsed time and compute this frame's sub-step count
    ///
    /// Negative or non-finite frame times count as zero.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let due = (self.accumulator / self.fixed_delta_time).floor();
        let steps = if due > f64::from(self.max_substeps) {
            log::warn!(
                "{} sub-steps due, clamping to {} and dropping {:.4}s",
                due,
                self.max_substeps,
                self.accumulator - f64::from(self.max_substeps) * self.fixed_delta_time
            );
            self.accumulator %= self.fixed_delta_time;
            self.max_substeps
        } else {
            let steps = due as u32;
            self.accumulator -= f64::from(steps) * self.fixed_delta_time;
            steps
        };

        self.substeps = steps;
        steps
    }

    /// Record that one sub-step of simulated time has elapsed
    pub fn complete_substep(&mut self) {
        self.accumulated_time += self.fixed_delta_time;
    }

    /// Sub-steps scheduled by the last `advance`
    pub fn current_substeps(&self) -> u32 {
        self.substeps
    }

    /// Length of one sub-step in seconds
    pub fn fixed_delta_time(&self) -> f64 {
        self.fixed_delta_time
    }

    /// Total simulated time of all completed sub-steps
    pub fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }

    /// Fraction of a sub-step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.fixed_delta_time
    }

    /// Reset all timing state
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.accumulated_time = 0.0;
        self.substeps = 0;
    }
}
