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
//! Gravity step
//!
//! Adds a constant downward gravitational force to every active,
//! gravity-enabled body once per fixed sub-step, before integration:
//!
//! **F = (0, g · gravity_scale · m)**
//!
//! `g` is injected through `GravityConfig` at construction. The force goes
//! into the body's per-step accumulator, which the integrator consumes.
//!
//! ## Parallel Computation
//!
//! With the `parallel` feature the per-body forces are computed with Rayon
//! over a snapshot of the eligible bodies and then applied in entity order,
//! so results are identical to the sequential path.

use crate::ecs::{ComponentStorage, Entity, StepContext, System, World};
use crate::math::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gravity step configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityConfig {
    /// Gravitational acceleration along y (negative is down)
    pub base_gravity: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        GravityConfig {
            base_gravity: crate::config::DEFAULT_BASE_GRAVITY,
        }
    }
}

/// Gravitational force for a body with the given scale and mass
pub fn gravity_force(base_gravity: f64, gravity_scale: f64, mass: f64) -> Vec2 {
    Vec2::new(0.0, base_gravity * gravity_scale * mass)
}

/// System applying uniform gravity to every gravity-enabled body
///
/// # Example
///
/// ```
/// use physics_core::dynamics::{GravityConfig, GravitySystem};
///
/// let gravity = GravitySystem::new(GravityConfig { base_gravity: -9.81 });
/// assert_eq!(gravity.config().base_gravity, -9.81);
/// ```
pub struct GravitySystem {
    config: GravityConfig,
}

impl GravitySystem {
    /// Create a gravity step with the given configuration
    pub fn new(config: GravityConfig) -> Self {
        GravitySystem { config }
    }

    /// Current configuration
    pub fn config(&self) -> GravityConfig {
        self.config
    }

    /// Accumulate gravity on every eligible body
    ///
    /// Returns the number of bodies that received a gravity force.
    pub fn apply(&self, world: &mut World) -> usize {
        let targets: Vec<(Entity, f64, f64)> = world
            .body_entities()
            .into_iter()
            .filter_map(|entity| {
                let body = world.bodies().get(entity)?;
                body.use_gravity
                    .then_some((entity, body.gravity_scale, body.mass))
            })
            .collect();

        let forces = self.compute_forces(&targets);
        let bodies = world.bodies_mut();
        for (entity, force) in &forces {
            if let Some(body) = bodies.get_mut(*entity) {
                body.apply_force(*force);
            }
        }
        forces.len()
    }

    #[cfg(feature = "parallel")]
    fn compute_forces(&self, targets: &[(Entity, f64, f64)]) -> Vec<(Entity, Vec2)> {
        let g = self.config.base_gravity;
        targets
            .par_iter()
            .map(|&(entity, scale, mass)| (entity, gravity_force(g, scale, mass)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_forces(&self, targets: &[(Entity, f64, f64)]) -> Vec<(Entity, Vec2)> {
        let g = self.config.base_gravity;
        targets
            .iter()
            .map(|&(entity, scale, mass)| (entity, gravity_force(g, scale, mass)))
            .collect()
    }
}

impl Default for GravitySystem {
    fn default() -> Self {
        GravitySystem::new(GravityConfig::default())
    }
}

impl System for GravitySystem {
    fn run(&mut self, world: &mut World, _ctx: &mut StepContext<'_>) {
        self.apply(world);
    }

    fn name(&self) -> &str {
        "gravity"
    }
}
