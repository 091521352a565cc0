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
//! Staged fixed-step scheduler
//!
//! Systems are organized into stages that execute in ascending order every
//! fixed sub-step. Within a stage, systems run in registration order, so the
//! whole pipeline is an explicit, inspectable list.

use crate::ecs::{StepContext, System, World};

/// Stage identifier for grouping systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageId(pub usize);

impl StageId {
    /// Create a new stage ID
    pub fn new(id: usize) -> Self {
        StageId(id)
    }
}

/// Pre-defined stages of the physics step
pub mod stages {
    use super::StageId;

    /// Gravity force accumulation
    pub const GRAVITY: StageId = StageId(0);

    /// Force resolution and semi-implicit Euler integration
    pub const INTEGRATION: StageId = StageId(1);

    /// Collision detection, contact tracking and response
    pub const COLLISION: StageId = StageId(2);

    /// User systems that observe the settled state
    pub const POST_PROCESS: StageId = StageId(3);
}

struct ScheduledSystem {
    system: Box<dyn System>,
    stage: StageId,
}

/// Runs registered systems once per fixed sub-step in stage order
///
/// # Examples
///
/// ```
/// use physics_core::ecs::scheduler::{Scheduler, stages};
/// use physics_core::ecs::{StepContext, System, World};
///
/// struct Noop;
/// impl System for Noop {
///     fn run(&mut self, _world: &mut World, _ctx: &mut StepContext<'_>) {}
///     fn name(&self) -> &str { "noop" }
/// }
///
/// let mut scheduler = Scheduler::new();
/// scheduler.add_system(Noop, stages::POST_PROCESS);
/// assert_eq!(scheduler.system_names(), vec!["noop"]);
/// ```
pub struct Scheduler {
    systems: Vec<ScheduledSystem>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Scheduler {
            systems: Vec::new(),
        }
    }

    /// Add a system to a stage
    ///
    /// Systems within a stage keep their registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S, stage: StageId) {
        self.systems.push(ScheduledSystem {
            system: Box::new(system),
            stage,
        });
        // stable: equal stages keep insertion order
        self.systems.sort_by_key(|s| s.stage);
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Names of the registered systems in execution order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system.name()).collect()
    }

    /// Get the number of stages in use
    pub fn stage_count(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.stage.0 + 1)
            .max()
            .unwrap_or(0)
    }

    /// Run every system once for a single fixed sub-step
    pub fn run_fixed_step(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        for scheduled in &mut self.systems {
            log::trace!(
                "running {} (stage {}) at t={:.4}",
                scheduled.system.name(),
                scheduled.stage.0,
                ctx.time()
            );
            scheduled.system.run(world, ctx);
        }
    }

    /// Clear all systems from the scheduler
    pub fn clear(&mut self) {
        self.systems.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
