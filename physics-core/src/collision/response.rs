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
//! Discrete collision response
//!
//! Stops dynamic bodies along the dominant axis of a physical contact.
//! Bodies are never pushed apart; response only removes the velocity
//! component that would deepen the contact.

use crate::ecs::components::{RigidBody, Transform};
use crate::math::Vec2;

/// One side of a contact handed to the response functions
pub struct Participant<'a> {
    /// Transform of the body
    pub transform: &'a Transform,
    /// World-space centre of the collider
    pub center: Vec2,
    /// Motion state, modified in place
    pub body: &'a mut RigidBody,
    /// Whether the body's collider is a trigger
    pub is_trigger: bool,
}

impl<'a> Participant<'a> {
    /// Solid participant centred on the transform position
    pub fn new(transform: &'a Transform, body: &'a mut RigidBody) -> Self {
        Participant {
            transform,
            center: transform.position,
            body,
            is_trigger: false,
        }
    }

    /// Use a collider centre that differs from the transform position
    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    /// Set the trigger flag
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }
}

/// Axis along which a contact was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionAxis {
    /// Side contact; x-velocities were stopped
    Horizontal,
    /// Top/bottom contact; y motion was stopped
    Vertical,
}

fn approaching(velocity: f64, towards: f64) -> bool {
    velocity * towards > 0.0
}

fn stop_horizontal(body: &mut RigidBody, towards: f64) {
    if body.is_dynamic() && approaching(body.velocity.x, towards) {
        body.velocity.x = 0.0;
    }
}

fn stop_vertical(body: &mut RigidBody, towards: f64) {
    if body.is_dynamic() && approaching(body.velocity.y, towards) {
        body.velocity.y = 0.0;
        body.force.y = 0.0;
        body.acceleration.y = 0.0;
    }
}

/// Resolve a contact using explicit half-extents
///
/// Returns the axis the contact was resolved on, or `None` when either
/// participant is a trigger or the boxes do not overlap on the chosen
/// axis. Whenever neither side is a trigger, x force and x acceleration of
/// both bodies are cleared.
///
/// # Examples
///
/// ```
/// use physics_core::collision::response::{resolve_collision, CollisionAxis, Participant};
/// use physics_core::ecs::components::{RigidBody, Transform};
/// use physics_core::math::Vec2;
///
/// let ta = Transform::at(Vec2::new(0.0, 0.0));
/// let tb = Transform::at(Vec2::new(1.5, 0.0));
/// let mut a = RigidBody::new(1.0).with_velocity(Vec2::new(2.0, 0.0));
/// let mut b = RigidBody::fixed(1.0);
///
/// let axis = resolve_collision(
///     Participant::new(&ta, &mut a),
///     Vec2::new(1.0, 1.0),
///     Participant::new(&tb, &mut b),
///     Vec2::new(1.0, 1.0),
/// );
/// assert_eq!(axis, Some(CollisionAxis::Horizontal));
/// assert_eq!(a.velocity.x, 0.0);
/// ```
pub fn resolve_collision(
    a: Participant<'_>,
    half_a: Vec2,
    b: Participant<'_>,
    half_b: Vec2,
) -> Option<CollisionAxis> {
    if a.is_trigger || b.is_trigger {
        return None;
    }

    let delta = b.center - a.center;
    let overlap = half_a + half_b - delta.abs();

    let axis = if overlap.x < overlap.y && overlap.x > 0.0 {
        stop_horizontal(a.body, delta.x);
        stop_horizontal(b.body, -delta.x);
        Some(CollisionAxis::Horizontal)
    } else if overlap.y > 0.0 {
        stop_vertical(a.body, delta.y);
        stop_vertical(b.body, -delta.y);
        Some(CollisionAxis::Vertical)
    } else {
        None
    };

    for body in [a.body, b.body] {
        body.force.x = 0.0;
        body.acceleration.x = 0.0;
    }
    axis
}

/// Resolve a contact using each transform's scale as the body size
pub fn resolve_collision_scaled(a: Participant<'_>, b: Participant<'_>) -> Option<CollisionAxis> {
    let half_a = a.transform.scale * 0.5;
    let half_b = b.transform.scale * 0.5;
    resolve_collision(a, half_a, b, half_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    #[test]
    fn test_horizontal_stops_approaching_dynamic_bodies() {
        let ta = Transform::at(Vec2::new(0.0, 0.0));
        let tb = Transform::at(Vec2::new(1.8, 0.2));
        let mut a = RigidBody::new(1.0).with_velocity(Vec2::new(3.0, -1.0));
        let mut b = RigidBody::new(1.0).with_velocity(Vec2::new(-2.0, 4.0));

        let axis = resolve_collision(
            Participant::new(&ta, &mut a),
            HALF,
            Participant::new(&tb, &mut b),
            HALF,
        );

        assert_eq!(axis, Some(CollisionAxis::Horizontal));
        assert_eq!(a.velocity, Vec2::new(0.0, -1.0));
        assert_eq!(b.velocity, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_horizontal_leaves_static_and_receding_bodies() {
        let ta = Transform::at(Vec2::new(0.0, 0.0));
        let tb = Transform::at(Vec2::new(1.8, 0.0));
        let mut a = RigidBody::new(1.0).with_velocity(Vec2::new(-3.0, 0.0));
        let mut b = RigidBody::fixed(1.0).with_velocity(Vec2::new(-2.0, 0.0));

        resolve_collision(
            Participant::new(&ta, &mut a),
            HALF,
            Participant::new(&tb, &mut b),
            HALF,
        );

        assert_eq!(a.velocity.x, -3.0);
        assert_eq!(b.velocity.x, -2.0);
    }

    #[test]
    fn test_vertical_landing_clears_y_motion() {
        let ground = Transform::at(Vec2::new(0.0, 0.0));
        let falling = Transform::at(Vec2::new(0.3, 1.9));
        let mut g = RigidBody::fixed(100.0);
        let mut f = RigidBody::new(1.0).with_velocity(Vec2::new(1.0, -5.0));
        f.force = Vec2::new(2.0, -9.81);
        f.acceleration = Vec2::new(2.0, -509.81);

        let axis = resolve_collision(
            Participant::new(&ground, &mut g),
            HALF,
            Participant::new(&falling, &mut f),
            HALF,
        );

        assert_eq!(axis, Some(CollisionAxis::Vertical));
        assert_eq!(f.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(f.force, Vec2::ZERO);
        assert_eq!(f.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_rising_body_keeps_y_velocity() {
        let ground = Transform::at(Vec2::new(0.0, 0.0));
        let body = Transform::at(Vec2::new(0.0, 1.9));
        let mut g = RigidBody::fixed(100.0);
        let mut b = RigidBody::new(1.0).with_velocity(Vec2::new(0.0, 5.0));

        resolve_collision(
            Participant::new(&ground, &mut g),
            HALF,
            Participant::new(&body, &mut b),
            HALF,
        );

        assert_eq!(b.velocity.y, 5.0);
    }

    #[test]
    fn test_trigger_changes_nothing() {
        let ta = Transform::at(Vec2::new(0.0, 0.0));
        let tb = Transform::at(Vec2::new(1.0, 0.0));
        let mut a = RigidBody::new(1.0).with_velocity(Vec2::new(3.0, 0.0));
        a.force = Vec2::new(1.0, 1.0);
        let mut b = RigidBody::new(1.0);
        let before = a.clone();

        let axis = resolve_collision(
            Participant::new(&ta, &mut a),
            HALF,
            Participant::new(&tb, &mut b).with_trigger(true),
            HALF,
        );

        assert_eq!(axis, None);
        assert_eq!(a, before);
    }

    #[test]
    fn test_x_force_cleared_without_overlap() {
        let ta = Transform::at(Vec2::new(0.0, 0.0));
        let tb = Transform::at(Vec2::new(5.0, 5.0));
        let mut a = RigidBody::new(1.0);
        a.force = Vec2::new(4.0, 3.0);
        a.acceleration = Vec2::new(4.0, 3.0);
        let mut b = RigidBody::fixed(1.0);

        let axis = resolve_collision(
            Participant::new(&ta, &mut a),
            HALF,
            Participant::new(&tb, &mut b),
            HALF,
        );

        assert_eq!(axis, None);
        assert_eq!(a.force, Vec2::new(0.0, 3.0));
        assert_eq!(a.acceleration, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_scaled_uses_transform_size() {
        let ta = Transform::at(Vec2::new(0.0, 0.0)).with_scale(Vec2::new(2.0, 2.0));
        let tb = Transform::at(Vec2::new(1.9, 0.0)).with_scale(Vec2::new(2.0, 2.0));
        let mut a = RigidBody::new(1.0).with_velocity(Vec2::new(1.0, 0.0));
        let mut b = RigidBody::fixed(1.0);

        let axis = resolve_collision_scaled(Participant::new(&ta, &mut a), Participant::new(&tb, &mut b));
        assert_eq!(axis, Some(CollisionAxis::Horizontal));
        assert_eq!(a.velocity.x, 0.0);

        // unit scale leaves a horizontal gap between the same centres
        let tc = Transform::at(Vec2::new(1.9, 0.0));
        let td = Transform::at(Vec2::new(0.0, 0.0));
        let mut c = RigidBody::new(1.0).with_velocity(Vec2::new(-1.0, 0.0));
        let mut d = RigidBody::fixed(1.0);
        let axis = resolve_collision_scaled(Participant::new(&tc, &mut c), Participant::new(&td, &mut d));
        assert_ne!(axis, Some(CollisionAxis::Horizontal));
        assert_eq!(c.velocity.x, -1.0);
    }

    #[test]
    fn test_offset_center_drives_the_axis() {
        let ground = Transform::at(Vec2::new(0.0, 0.0));
        // the collider sits well below its transform
        let body = Transform::at(Vec2::new(0.0, 5.0));
        let mut g = RigidBody::fixed(1.0);
        let mut b = RigidBody::new(1.0).with_velocity(Vec2::new(0.0, -5.0));

        let axis = resolve_collision(
            Participant::new(&ground, &mut g),
            Vec2::new(5.0, 0.5),
            Participant::new(&body, &mut b).with_center(Vec2::new(0.0, 0.9)),
            Vec2::new(0.5, 0.5),
        );

        assert_eq!(axis, Some(CollisionAxis::Vertical));
        assert_eq!(b.velocity.y, 0.0);
    }
}
