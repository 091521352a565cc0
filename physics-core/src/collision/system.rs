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
//! Collision step
//!
//! Visits every pair of collidable bodies in ascending handle order, filters
//! pairs through the layer manager, runs the narrow-phase test for the
//! pair's collider combination and turns the result into contact events.
//! Physical contacts are resolved immediately, so later pairs in the same
//! step see the corrected velocities.

use super::contact::{Channel, ContactTracker, PairKey};
use super::geometry::{aabb_circle_overlap, circles_overlap, swept_aabb, Aabb, Circle};
use super::response::{resolve_collision, resolve_collision_scaled, Participant};
use crate::ecs::{ComponentStorage, Entity, StepContext, System, World};
use crate::events::{ContactEvent, ContactPhase, PhysicsEvent};
use crate::math::Vec2;
use std::collections::HashMap;

/// World-space collision shape of a body for the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box
    Box(Aabb),
    /// Circle
    Circle(Circle),
}

/// Narrow-phase test for any collider combination
///
/// Box pairs use the swept test over `[0, dt]`; every combination involving
/// a circle is a static test and ignores the velocities.
pub fn shapes_overlap(a: &Shape, velocity_a: Vec2, b: &Shape, velocity_b: Vec2, dt: f64) -> bool {
    match (a, b) {
        (Shape::Box(x), Shape::Box(y)) => swept_aabb(x, velocity_a, y, velocity_b, dt).is_some(),
        (Shape::Circle(x), Shape::Circle(y)) => circles_overlap(x, y),
        (Shape::Box(aabb), Shape::Circle(circle)) | (Shape::Circle(circle), Shape::Box(aabb)) => {
            aabb_circle_overlap(aabb, circle)
        }
    }
}

/// Snapshot of a collidable body taken at the start of the step
#[derive(Debug, Clone, Copy)]
struct Candidate {
    entity: Entity,
    shape: Shape,
    center: Vec2,
    box_half_extents: Option<Vec2>,
    is_trigger: bool,
}

impl Candidate {
    /// Box colliders take priority over circle colliders on the same body
    fn capture(world: &World, entity: Entity) -> Option<Self> {
        let transform = world.transforms().get(entity)?;

        if let Some(collider) = world.box_colliders().get(entity).filter(|c| c.enabled) {
            let half = collider.half_extents();
            let center = transform.position + collider.offset;
            return Some(Candidate {
                entity,
                shape: Shape::Box(Aabb::from_center(center, half)),
                center,
                box_half_extents: Some(half),
                is_trigger: collider.is_trigger,
            });
        }

        let collider = world.circle_colliders().get(entity).filter(|c| c.enabled)?;
        let center = transform.position + collider.offset;
        Some(Candidate {
            entity,
            shape: Shape::Circle(Circle::new(center, collider.radius)),
            center,
            box_half_extents: None,
            is_trigger: collider.is_trigger,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ContactCounts {
    collisions: u32,
    triggers: u32,
}

impl ContactCounts {
    fn add(&mut self, channel: Channel) {
        match channel {
            Channel::Collision => self.collisions += 1,
            Channel::Trigger => self.triggers += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ContactFlags {
    colliding: bool,
    triggering: bool,
}

/// Collision detection, contact tracking and response
///
/// Owns the contact-pair records; nothing else reads or writes them.
#[derive(Debug, Default)]
pub struct CollisionSystem {
    tracker: ContactTracker,
}

impl CollisionSystem {
    /// Create a collision step with no contacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Contact records of the last step
    pub fn contacts(&self) -> &ContactTracker {
        &self.tracker
    }

    /// Whether `a` and `b` are in contact on `channel`
    pub fn is_touching(&self, a: Entity, b: Entity, channel: Channel) -> bool {
        self.tracker.is_touching(PairKey::new(a, b), channel)
    }

    /// Forget every contact without emitting EXIT
    pub fn reset(&mut self) {
        self.tracker.clear();
    }

    /// Run one collision step
    ///
    /// Returns the number of overlapping pairs.
    pub fn detect(&mut self, world: &mut World, ctx: &mut StepContext<'_>) -> usize {
        let dt = ctx.delta_time();
        let previous = log::log_enabled!(log::Level::Trace).then(|| snapshot_flags(world));
        let candidates: Vec<Candidate> = world
            .collidable_entities()
            .into_iter()
            .filter_map(|entity| Candidate::capture(world, entity))
            .collect();

        let mut counts: HashMap<Entity, ContactCounts> = HashMap::new();
        let mut overlapping = 0;
        self.tracker.begin_step();

        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if !ctx.layers().allows_pair(a.entity, b.entity) {
                    log::trace!("{} / {} filtered by layer", a.entity, b.entity);
                    continue;
                }
                let (Some(velocity_a), Some(velocity_b)) = (
                    world.bodies().get(a.entity).map(|body| body.velocity),
                    world.bodies().get(b.entity).map(|body| body.velocity),
                ) else {
                    continue;
                };

                let key = PairKey::new(a.entity, b.entity);

                if !shapes_overlap(&a.shape, velocity_a, &b.shape, velocity_b, dt) {
                    for channel in Channel::ALL {
                        if let Some(phase) = self.tracker.report_separation(key, channel) {
                            emit(ctx, key, channel, phase);
                        }
                    }
                    continue;
                }

                overlapping += 1;
                let channel = Channel::classify(a.is_trigger || b.is_trigger);
                let phase = self.tracker.report_overlap(key, channel);
                if let Some(exit) = self.tracker.report_separation(key, channel.other()) {
                    emit(ctx, key, channel.other(), exit);
                }
                counts.entry(a.entity).or_default().add(channel);
                counts.entry(b.entity).or_default().add(channel);
                emit(ctx, key, channel, phase);

                if channel == Channel::Collision {
                    respond(world, a, b);
                }
            }
        }

        for (key, channel) in self.tracker.end_step() {
            emit(ctx, key, channel, ContactPhase::Exit);
        }

        update_flags(world, previous.as_ref(), &counts);
        overlapping
    }
}

impl System for CollisionSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        self.detect(world, ctx);
    }

    fn name(&self) -> &str {
        "collision"
    }
}

fn emit(ctx: &mut StepContext<'_>, key: PairKey, channel: Channel, phase: ContactPhase) {
    if phase != ContactPhase::Stay {
        log::debug!(
            "{:?} {:?}: {} / {}",
            channel,
            phase,
            key.first(),
            key.second()
        );
    }
    let contact = ContactEvent {
        first: key.first(),
        second: key.second(),
        time: ctx.time(),
        phase,
    };
    let event = match channel {
        Channel::Collision => PhysicsEvent::Collision(contact),
        Channel::Trigger => PhysicsEvent::Trigger(contact),
    };
    ctx.events().emit(event);
}

fn respond(world: &mut World, a: &Candidate, b: &Candidate) {
    let components = world.components_mut();
    let (Some(transform_a), Some(transform_b)) = (
        components.transforms.get(a.entity),
        components.transforms.get(b.entity),
    ) else {
        return;
    };
    components.bodies.with_pair_mut(a.entity, b.entity, |body_a, body_b| {
        let first = Participant::new(transform_a, body_a)
            .with_center(a.center)
            .with_trigger(a.is_trigger);
        let second = Participant::new(transform_b, body_b)
            .with_center(b.center)
            .with_trigger(b.is_trigger);
        match (a.box_half_extents, b.box_half_extents) {
            (Some(half_a), Some(half_b)) => resolve_collision(first, half_a, second, half_b),
            _ => resolve_collision_scaled(first, second),
        }
    });
}

/// Runtime flags of every body before the step writes any of them
///
/// Only taken for the trace-level flag diff.
fn snapshot_flags(world: &World) -> HashMap<Entity, ContactFlags> {
    let mut flags: HashMap<Entity, ContactFlags> = HashMap::new();
    for (entity, collider) in world.box_colliders().iter() {
        let entry = flags.entry(entity).or_default();
        entry.colliding |= collider.colliding;
        entry.triggering |= collider.triggering;
    }
    for (entity, collider) in world.circle_colliders().iter() {
        let entry = flags.entry(entity).or_default();
        entry.colliding |= collider.colliding;
        entry.triggering |= collider.triggering;
    }
    flags
}

/// Set each body's flags from its partner counts; a zero count clears the flag
fn update_flags(
    world: &mut World,
    previous: Option<&HashMap<Entity, ContactFlags>>,
    counts: &HashMap<Entity, ContactCounts>,
) {
    let current = |entity: Entity| {
        let count = counts.get(&entity).copied().unwrap_or_default();
        ContactFlags {
            colliding: count.collisions > 0,
            triggering: count.triggers > 0,
        }
    };

    for (entity, was) in previous.into_iter().flatten() {
        let now = current(*entity);
        if *was != now {
            log::trace!("{} contact flags {:?} -> {:?}", entity, was, now);
        }
    }

    let components = world.components_mut();
    for (entity, collider) in components.boxes.iter_mut() {
        let now = current(entity);
        collider.colliding = now.colliding;
        collider.triggering = now.triggering;
    }
    for (entity, collider) in components.circles.iter_mut() {
        let now = current(entity);
        collider.colliding = now.colliding;
        collider.triggering = now.triggering;
    }
}
