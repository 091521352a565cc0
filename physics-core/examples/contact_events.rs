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
//! Contact events example
//!
//! A crate slides into a wall after passing through a trigger zone. Every
//! contact transition is printed as it is emitted.

use physics_core::ecs::components::{BoxCollider, RigidBody, Transform};
use physics_core::ecs::{ComponentStorage, Entity, World};
use physics_core::events::PhysicsEvent;
use physics_core::math::Vec2;
use physics_core::{PhysicsConfig, Simulation};

fn spawn(world: &mut World, position: Vec2, body: RigidBody, collider: BoxCollider) -> Entity {
    let entity = world.create_entity();
    world.transforms_mut().insert(entity, Transform::at(position));
    world.bodies_mut().insert(entity, body);
    world.box_colliders_mut().insert(entity, collider);
    entity
}

fn main() {
    println!("Physics Core - Contact Events Example");
    println!("=====================================\n");

    // no gravity so the crate slides along x
    let config = PhysicsConfig::default()
        .with_base_gravity(0.0)
        .with_integrator_gravity(0.0);
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("invalid configuration: {}", err);
            return;
        }
    };

    let world = sim.world_mut();
    let crate_box = spawn(
        world,
        Vec2::ZERO,
        RigidBody::new(1.0).with_velocity(Vec2::new(6.0, 0.0)),
        BoxCollider::new(Vec2::splat(1.0)),
    );
    let zone = spawn(
        world,
        Vec2::new(2.0, 0.0),
        RigidBody::fixed(1.0),
        BoxCollider::new(Vec2::new(0.5, 3.0)).trigger(),
    );
    let wall = spawn(
        world,
        Vec2::new(5.0, 0.0),
        RigidBody::fixed(100.0),
        BoxCollider::new(Vec2::new(1.0, 4.0)),
    );
    println!("crate {}, trigger zone {}, wall {}\n", crate_box, zone, wall);

    sim.events_mut().subscribe(|event| {
        let (kind, contact) = match event {
            PhysicsEvent::Collision(c) => ("collision", c),
            PhysicsEvent::Trigger(c) => ("trigger", c),
        };
        println!(
            "  t={:.3}s {:<9} {:?} {} / {}",
            contact.time, kind, contact.phase, contact.first, contact.second
        );
    });

    // one second at 30 fps
    for _ in 0..30 {
        sim.update(1.0 / 30.0);
    }

    let position = sim
        .world()
        .transforms()
        .get(crate_box)
        .map(|t| t.position)
        .unwrap_or(Vec2::ZERO);
    println!("\ncrate came to rest at x = {:.3}", position.x);
}
