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
//! Rigid body and collider components
//!
//! This module provides the data the physics core reads and writes each
//! fixed step: the spatial `Transform`, the `RigidBody` carrying motion
//! state and forces, and the two collider shapes.

use crate::dynamics::ForceModel;
use crate::ecs::Component;
use crate::math::Vec2;

/// Position, scale and rotation of an entity
///
/// Mutated by the integrator; read by the collision step. Rotation is
/// carried for completeness but never integrated.
///
/// # Examples
///
/// ```
/// use physics_core::ecs::components::Transform;
/// use physics_core::math::Vec2;
///
/// let t = Transform::at(Vec2::new(1.0, 2.0));
/// assert_eq!(t.scale, Vec2::new(1.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// World position
    pub position: Vec2,
    /// Scale, also used as the collision size of bodies without a box collider
    pub scale: Vec2,
    /// Rotation in radians
    pub rotation: f64,
}

impl Transform {
    /// Create a transform with explicit position, scale and rotation
    pub fn new(position: Vec2, scale: Vec2, rotation: f64) -> Self {
        Transform {
            position,
            scale,
            rotation,
        }
    }

    /// Create a unit-scale, unrotated transform at `position`
    pub fn at(position: Vec2) -> Self {
        Transform::new(position, Vec2::splat(1.0), 0.0)
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Transform::at(Vec2::ZERO)
    }
}

/// Motion state of a simulated body
///
/// `force` is the transient per-step accumulator: the gravity step adds to
/// it and the integrator consumes and zeroes it every step. Long-lived,
/// named forces live in the owned `ForceModel` instead.
///
/// Bodies with `use_gravity` unset are treated as static by collision
/// response.
///
/// # Examples
///
/// ```
/// use physics_core::ecs::components::RigidBody;
/// use physics_core::math::Vec2;
///
/// let body = RigidBody::new(2.0).with_velocity(Vec2::new(1.0, 0.0));
/// assert!(body.use_gravity);
/// assert!(body.is_dynamic());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidBody {
    /// Linear velocity
    pub velocity: Vec2,
    /// Acceleration computed by the last integration step
    pub acceleration: Vec2,
    /// Force accumulated for the current step
    pub force: Vec2,
    /// Mass; bodies with mass <= 0 are never integrated
    pub mass: f64,
    /// Multiplier applied to both gravity terms
    pub gravity_scale: f64,
    /// Linear drag coefficient
    pub drag_coefficient: f64,
    /// Whether gravity and drag apply; also marks the body as dynamic
    pub use_gravity: bool,
    /// Inactive bodies are skipped by every system
    pub active: bool,
    /// Named, typed forces owned by this body
    pub forces: ForceModel,
}

impl RigidBody {
    /// Create an active, gravity-enabled body at rest with the given mass
    pub fn new(mass: f64) -> Self {
        RigidBody {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            gravity_scale: 1.0,
            drag_coefficient: 0.0,
            use_gravity: true,
            active: true,
            forces: ForceModel::new(),
        }
    }

    /// Create a body that ignores gravity and is treated as static by response
    pub fn fixed(mass: f64) -> Self {
        RigidBody::new(mass).with_gravity(false)
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Enable or disable gravity
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Set the gravity scale
    pub fn with_gravity_scale(mut self, scale: f64) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set the drag coefficient
    pub fn with_drag(mut self, drag_coefficient: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    /// Add a force to this step's accumulator
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Change velocity instantly by `impulse / mass`
    ///
    /// Ignored for bodies with non-positive mass.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    /// Whether collision response may change this body's motion
    pub fn is_dynamic(&self) -> bool {
        self.use_gravity
    }

    /// Whether the integrator will process this body
    pub fn can_integrate(&self) -> bool {
        self.active && self.mass > 0.0
    }
}

impl Component for RigidBody {}

impl Default for RigidBody {
    fn default() -> Self {
        RigidBody::new(1.0)
    }
}

/// Axis-aligned box collider
///
/// `size` is the full width and height; the box spans `size / 2` on either
/// side of its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxCollider {
    /// Full extent on each axis
    pub size: Vec2,
    /// Offset of the box centre from the transform position
    pub offset: Vec2,
    /// Trigger colliders report overlap but never affect motion
    pub is_trigger: bool,
    /// Disabled colliders are ignored by the broad phase
    pub enabled: bool,
    /// Set while the body has at least one physical contact
    #[cfg_attr(feature = "serde", serde(skip))]
    pub colliding: bool,
    /// Set while the body has at least one trigger contact
    #[cfg_attr(feature = "serde", serde(skip))]
    pub triggering: bool,
}

impl BoxCollider {
    /// Create an enabled, solid box with the given width and height
    pub fn new(size: Vec2) -> Self {
        BoxCollider {
            size,
            offset: Vec2::ZERO,
            is_trigger: false,
            enabled: true,
            colliding: false,
            triggering: false,
        }
    }

    /// Mark the collider as a trigger
    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Offset the box from the transform position
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Half of `size`
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

impl Component for BoxCollider {}

/// Circle collider
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleCollider {
    /// Circle radius
    pub radius: f64,
    /// Offset of the circle centre from the transform position
    pub offset: Vec2,
    /// Trigger colliders report overlap but never affect motion
    pub is_trigger: bool,
    /// Disabled colliders are ignored by the broad phase
    pub enabled: bool,
    /// Set while the body has at least one physical contact
    #[cfg_attr(feature = "serde", serde(skip))]
    pub colliding: bool,
    /// Set while the body has at least one trigger contact
    #[cfg_attr(feature = "serde", serde(skip))]
    pub triggering: bool,
}

impl CircleCollider {
    /// Create an enabled, solid circle with the given radius
    pub fn new(radius: f64) -> Self {
        CircleCollider {
            radius,
            offset: Vec2::ZERO,
            is_trigger: false,
            enabled: true,
            colliding: false,
            triggering: false,
        }
    }

    /// Mark the collider as a trigger
    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Offset the circle from the transform position
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

impl Component for CircleCollider {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults() {
        let t = Transform::default();
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.scale, Vec2::new(1.0, 1.0));
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn test_rigid_body_builders() {
        let body = RigidBody::new(3.0)
            .with_velocity(Vec2::new(1.0, 2.0))
            .with_gravity_scale(0.5)
            .with_drag(0.1);
        assert_eq!(body.mass, 3.0);
        assert_eq!(body.velocity, Vec2::new(1.0, 2.0));
        assert_eq!(body.gravity_scale, 0.5);
        assert_eq!(body.drag_coefficient, 0.1);
        assert!(body.forces.is_empty());
    }

    #[test]
    fn test_fixed_body_is_static() {
        let body = RigidBody::fixed(10.0);
        assert!(!body.use_gravity);
        assert!(!body.is_dynamic());
    }

    #[test]
    fn test_apply_force_accumulates() {
        let mut body = RigidBody::new(1.0);
        body.apply_force(Vec2::new(1.0, 0.0));
        body.apply_force(Vec2::new(0.0, 2.0));
        assert_eq!(body.force, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_apply_impulse() {
        let mut body = RigidBody::new(2.0);
        body.apply_impulse(Vec2::new(4.0, 0.0));
        assert_eq!(body.velocity, Vec2::new(2.0, 0.0));

        let mut massless = RigidBody::new(0.0);
        massless.apply_impulse(Vec2::new(4.0, 0.0));
        assert_eq!(massless.velocity, Vec2::ZERO);
        assert!(!massless.can_integrate());
    }

    #[test]
    fn test_collider_runtime_flags_start_clear() {
        let b = BoxCollider::new(Vec2::splat(1.0)).trigger();
        assert!(b.is_trigger && b.enabled);
        assert!(!b.colliding && !b.triggering);

        let c = CircleCollider::new(0.5).with_offset(Vec2::new(0.0, 1.0));
        assert!(!c.is_trigger);
        assert_eq!(c.offset, Vec2::new(0.0, 1.0));
    }
}
