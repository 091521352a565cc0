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
//! Movement step (semi-implicit Euler)
//!
//! Per active body with positive mass, per fixed sub-step:
//!
//! 1. advance the force model's ages by `dt`
//! 2. resultant = accumulated force + force model resultant
//! 3. for gravity-enabled bodies, add drag `-c·v` (only when |v|² exceeds
//!    the threshold) and the integrator's own gravity term `-scale · 500`
//! 4. `a = F / m`, `v' = v + a·dt`, `p' = p + v'·dt`
//! 5. zero the per-step accumulated force
//!
//! The gravity step has already added `g · scale · m` to the accumulated
//! force, so gravity-enabled bodies receive two downward terms per step.
//! Both are intentional and tuned together; changing either alters every
//! existing scene's feel.

use crate::ecs::components::{RigidBody, Transform};
use crate::ecs::{ComponentStorage, StepContext, System, World};
use crate::math::Vec2;

/// Integrator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    /// Magnitude of the integrator's downward gravity term, scaled per body
    pub gravity: f64,
    /// Squared speed that must be exceeded before drag applies
    pub drag_velocity_threshold_sq: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig {
            gravity: crate::config::DEFAULT_INTEGRATOR_GRAVITY,
            drag_velocity_threshold_sq: crate::config::DEFAULT_DRAG_THRESHOLD_SQ,
        }
    }
}

/// Linear drag opposing `velocity`
///
/// Zero whenever `|velocity|² <= threshold_sq`.
pub fn drag_force(drag_coefficient: f64, velocity: Vec2, threshold_sq: f64) -> Vec2 {
    if velocity.length_squared() > threshold_sq {
        -velocity * drag_coefficient
    } else {
        Vec2::ZERO
    }
}

/// Advance one body by `dt`
///
/// Returns `false` without touching anything for bodies that cannot be
/// integrated (inactive or mass <= 0). A step producing a non-finite state
/// is discarded; the accumulated force is still cleared.
pub fn integrate_body(
    body: &mut RigidBody,
    transform: &mut Transform,
    dt: f64,
    config: &IntegratorConfig,
) -> bool {
    if !body.can_integrate() {
        return false;
    }

    body.forces.update(dt);
    let mut resultant = body.force + body.forces.resultant();

    if body.use_gravity {
        resultant += drag_force(
            body.drag_coefficient,
            body.velocity,
            config.drag_velocity_threshold_sq,
        );
        resultant.y -= body.gravity_scale * config.gravity;
    }

    let acceleration = resultant / body.mass;
    let velocity = body.velocity + acceleration * dt;
    let position = transform.position + velocity * dt;
    body.force = Vec2::ZERO;

    if !(acceleration.is_finite() && velocity.is_finite() && position.is_finite()) {
        log::warn!("integration produced a non-finite state, step discarded");
        return false;
    }

    body.acceleration = acceleration;
    body.velocity = velocity;
    transform.position = position;
    true
}

/// System integrating every active body
pub struct MovementSystem {
    config: IntegratorConfig,
}

impl MovementSystem {
    /// Create a movement step with the given configuration
    pub fn new(config: IntegratorConfig) -> Self {
        MovementSystem { config }
    }

    /// Current configuration
    pub fn config(&self) -> IntegratorConfig {
        self.config
    }

    /// Integrate all eligible bodies by `dt`
    ///
    /// Returns the number of bodies that moved.
    pub fn integrate(&self, world: &mut World, dt: f64) -> usize {
        let entities = world.body_entities();
        let components = world.components_mut();
        let mut updated = 0;

        for entity in entities {
            let (Some(body), Some(transform)) = (
                components.bodies.get_mut(entity),
                components.transforms.get_mut(entity),
            ) else {
                continue;
            };

            if integrate_body(body, transform, dt, &self.config) {
                updated += 1;
            } else {
                log::trace!("{} skipped by integrator", entity);
            }
        }

        updated
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        MovementSystem::new(IntegratorConfig::default())
    }
}

impl System for MovementSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        self.integrate(world, ctx.delta_time());
    }

    fn name(&self) -> &str {
        "movement"
    }
}
