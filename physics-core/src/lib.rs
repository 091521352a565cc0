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
//! # Physics Core
//!
//! The physics and collision core of a real-time 2D simulation loop, built
//! on a small ECS.
//!
//! ## Features
//!
//! - **ECS Arena**: components indexed by stable, generational entity handles
//! - **Force Accumulation**: per-body typed forces with lifetimes
//! - **Semi-implicit Euler**: gravity, drag and integration per fixed sub-step
//! - **Continuous Collision**: swept AABB tests so fast boxes cannot tunnel
//! - **Contact Events**: ENTER/STAY/EXIT per pair for collisions and triggers
//! - **Parallelization**: optional Rayon gravity step (`parallel` feature)
//!
//! ## Example
//!
//! ```rust
//! use physics_core::{PhysicsConfig, Simulation};
//! use physics_core::ecs::components::{BoxCollider, RigidBody, Transform};
//! use physics_core::ecs::ComponentStorage;
//! use physics_core::math::Vec2;
//!
//! let mut sim = Simulation::new(PhysicsConfig::default()).unwrap();
//! let ground = sim.world_mut().create_entity();
//! sim.world_mut().transforms_mut().insert(ground, Transform::default());
//! sim.world_mut().bodies_mut().insert(ground, RigidBody::fixed(100.0));
//! sim.world_mut()
//!     .box_colliders_mut()
//!     .insert(ground, BoxCollider::new(Vec2::new(20.0, 1.0)));
//!
//! sim.events_mut().subscribe(|event| println!("{:?}", event));
//! sim.update(1.0 / 30.0);
//! ```

#![warn(missing_docs)]

/// 2D vector math
pub mod math;

/// Entity Component System implementation
pub mod ecs;

/// Forces, gravity and integration
pub mod dynamics;

/// Collision detection, contact tracking and response
pub mod collision;

/// Layer classification for the broad phase
pub mod layers;

/// Contact events and the event bus
pub mod events;

/// Fixed-timestep accumulator
pub mod timer;

/// Tunable constants and validated configuration
pub mod config;

/// Pipeline driver
pub mod simulation;

pub use config::{ConfigError, PhysicsConfig};
pub use ecs::{Entity, World};
pub use simulation::Simulation;
