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
//! Simulation driver
//!
//! Owns the world, the staged scheduler, the fixed-step timer and the two
//! collaborators the systems consult (layers and the event bus). Each frame
//! is converted into whole sub-steps; every sub-step runs
//! gravity → movement → collision plus any user systems.

use crate::collision::CollisionSystem;
use crate::config::{ConfigError, PhysicsConfig};
use crate::dynamics::{GravitySystem, MovementSystem};
use crate::ecs::scheduler::{stages, Scheduler, StageId};
use crate::ecs::{Entity, StepContext, System, World};
use crate::events::EventBus;
use crate::layers::LayerMatrix;
use crate::timer::FixedTimestep;

/// A world stepped by the standard physics pipeline
///
/// # Examples
///
/// ```
/// use physics_core::{PhysicsConfig, Simulation};
/// use physics_core::ecs::components::{RigidBody, Transform};
/// use physics_core::ecs::ComponentStorage;
/// use physics_core::math::Vec2;
///
/// let mut sim = Simulation::new(PhysicsConfig::default()).unwrap();
/// let ball = sim.world_mut().create_entity();
/// sim.world_mut().transforms_mut().insert(ball, Transform::at(Vec2::new(0.0, 10.0)));
/// sim.world_mut().bodies_mut().insert(ball, RigidBody::new(1.0));
///
/// sim.step();
/// assert!(sim.world().transforms().get(ball).unwrap().position.y < 10.0);
/// ```
pub struct Simulation {
    config: PhysicsConfig,
    world: World,
    scheduler: Scheduler,
    timer: FixedTimestep,
    layers: LayerMatrix,
    events: EventBus,
}

impl Simulation {
    /// Validate `config` and build the standard pipeline
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut scheduler = Scheduler::new();
        scheduler.add_system(GravitySystem::new(config.gravity()), stages::GRAVITY);
        scheduler.add_system(MovementSystem::new(config.integrator()), stages::INTEGRATION);
        scheduler.add_system(CollisionSystem::new(), stages::COLLISION);

        log::debug!(
            "simulation ready: dt={}s, max {} sub-steps, pipeline {:?}",
            config.fixed_delta_time,
            config.max_substeps,
            scheduler.system_names()
        );

        Ok(Simulation {
            timer: FixedTimestep::from_config(&config),
            config,
            world: World::new(),
            scheduler,
            layers: LayerMatrix::new(),
            events: EventBus::new(),
        })
    }

    /// Register an additional system, usually in `stages::POST_PROCESS`
    pub fn add_system<S: System + 'static>(&mut self, system: S, stage: StageId) {
        self.scheduler.add_system(system, stage);
    }

    /// Advance by a frame's elapsed time
    ///
    /// Runs as many fixed sub-steps as the timer schedules and returns that
    /// count.
    pub fn update(&mut self, frame_dt: f64) -> u32 {
        let substeps = self.timer.advance(frame_dt);
        if substeps > 0 {
            log::debug!("frame of {:.4}s: {} sub-steps", frame_dt, substeps);
        }
        for _ in 0..substeps {
            self.run_substep();
        }
        substeps
    }

    /// Run exactly one fixed sub-step regardless of the accumulator
    pub fn step(&mut self) {
        self.run_substep();
    }

    fn run_substep(&mut self) {
        let mut ctx = StepContext::new(
            self.timer.fixed_delta_time(),
            self.timer.accumulated_time(),
            &self.layers,
            &mut self.events,
        );
        self.scheduler.run_fixed_step(&mut self.world, &mut ctx);
        self.timer.complete_substep();
    }

    /// Configuration the simulation was built with
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Simulated time of all completed sub-steps
    pub fn time(&self) -> f64 {
        self.timer.accumulated_time()
    }

    /// The world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Destroy `entity` and drop its layer assignment
    ///
    /// Returns `false` if the entity was not alive. Contacts involving it
    /// exit on the next collision step.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.layers.unassign(entity);
        let destroyed = self.world.destroy_entity(entity);
        if destroyed {
            log::debug!("destroyed {}", entity);
        }
        destroyed
    }

    /// Layer table
    pub fn layers(&self) -> &LayerMatrix {
        &self.layers
    }

    /// Layer table, mutably
    pub fn layers_mut(&mut self) -> &mut LayerMatrix {
        &mut self.layers
    }

    /// Event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Event bus, mutably (subscribe, drain history)
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Fixed-step timer
    pub fn timer(&self) -> &FixedTimestep {
        &self.timer
    }

    /// System scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
