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
//! Per-body force model
//!
//! A body owns a list of named, typed forces. Each force has a direction,
//! a magnitude and an optional lifetime; the model sums the active ones
//! into a single resultant every step.
//!
//! None of the operations fail. Operations naming a kind that is not
//! present are no-ops.

use crate::math::Vec2;

/// Classification tag of a force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForceKind {
    /// Gravitational pull
    Gravity,
    /// Velocity-opposing resistance
    Drag,
    /// Contact friction
    Friction,
    /// Surface normal support
    Normal,
    /// Spring or elastic force
    Spring,
    /// Thrust or other externally applied push
    Applied,
    /// Application-defined tag
    Custom(u32),
}

/// A single force acting on a body
///
/// # Examples
///
/// ```
/// use physics_core::dynamics::{Force, ForceKind};
/// use physics_core::math::Vec2;
///
/// let mut wind = Force::new(Vec2::new(1.0, 0.0), 5.0, ForceKind::Applied).with_lifetime(0.5);
/// wind.update(0.25);
/// assert!(wind.is_active());
/// wind.update(0.25);
/// assert!(!wind.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Force {
    direction: Vec2,
    magnitude: f64,
    kind: ForceKind,
    lifetime: f64,
    age: f64,
    active: bool,
}

impl Force {
    /// Create an active force with infinite lifetime
    pub fn new(direction: Vec2, magnitude: f64, kind: ForceKind) -> Self {
        Force {
            direction,
            magnitude,
            kind,
            lifetime: 0.0,
            age: 0.0,
            active: true,
        }
    }

    /// Limit how long the force stays active (0 = infinite)
    pub fn with_lifetime(mut self, lifetime: f64) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Direction of the force
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Scalar magnitude
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Set the scalar magnitude
    pub fn set_magnitude(&mut self, magnitude: f64) {
        self.magnitude = magnitude;
    }

    /// Type tag
    pub fn kind(&self) -> ForceKind {
        self.kind
    }

    /// Lifetime in seconds, 0 meaning infinite
    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Seconds spent active since the last activation
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Whether the force currently contributes to the resultant
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate the force
    ///
    /// Age restarts from zero on every inactive -> active transition.
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.age = 0.0;
        }
        self.active = active;
    }

    /// The force vector `direction * magnitude`
    pub fn vector(&self) -> Vec2 {
        self.direction * self.magnitude
    }

    /// Advance the age by `dt`, expiring the force once its lifetime is reached
    pub fn update(&mut self, dt: f64) {
        if !self.active {
            return;
        }
        self.age += dt;
        if self.lifetime > 0.0 && self.age >= self.lifetime {
            self.active = false;
        }
    }
}

/// Ordered collection of forces owned by one body
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceModel {
    forces: Vec<Force>,
}

impl ForceModel {
    /// Create an empty force model
    pub fn new() -> Self {
        ForceModel { forces: Vec::new() }
    }

    /// Add a force
    pub fn add(&mut self, force: Force) {
        self.forces.push(force);
    }

    /// Activate the first force of `kind`
    pub fn activate(&mut self, kind: ForceKind) {
        if let Some(force) = self.first_mut(kind) {
            force.set_active(true);
        }
    }

    /// Deactivate the first force of `kind`
    pub fn deactivate(&mut self, kind: ForceKind) {
        if let Some(force) = self.first_mut(kind) {
            force.set_active(false);
        }
    }

    /// Remove every force of `kind`
    pub fn remove(&mut self, kind: ForceKind) {
        self.forces.retain(|f| f.kind != kind);
    }

    /// Advance every force's age by `dt`
    pub fn update(&mut self, dt: f64) {
        for force in &mut self.forces {
            force.update(dt);
        }
    }

    /// Sum of `direction * magnitude` over the active forces
    pub fn resultant(&self) -> Vec2 {
        self.forces
            .iter()
            .filter(|f| f.active)
            .fold(Vec2::ZERO, |acc, f| acc + f.vector())
    }

    /// Remove all forces
    pub fn clear(&mut self) {
        self.forces.clear();
    }

    /// First force of `kind`, if any
    pub fn get(&self, kind: ForceKind) -> Option<&Force> {
        self.forces.iter().find(|f| f.kind == kind)
    }

    /// Iterate over all forces in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Force> {
        self.forces.iter()
    }

    /// Number of forces, active or not
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Check if the model holds no forces
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    fn first_mut(&mut self, kind: ForceKind) -> Option<&mut Force> {
        self.forces.iter_mut().find(|f| f.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(x: f64, y: f64, magnitude: f64, kind: ForceKind) -> Force {
        Force::new(Vec2::new(x, y), magnitude, kind)
    }

    #[test]
    fn test_resultant_sums_active_forces() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 10.0, ForceKind::Applied));
        model.add(push(0.0, 1.0, 4.0, ForceKind::Spring));
        model.add(push(-1.0, 0.0, 3.0, ForceKind::Friction));

        assert_eq!(model.resultant(), Vec2::new(7.0, 4.0));
    }

    #[test]
    fn test_inactive_forces_do_not_contribute() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 10.0, ForceKind::Applied));
        model.add(push(0.0, 1.0, 4.0, ForceKind::Spring));
        model.deactivate(ForceKind::Spring);

        assert_eq!(model.resultant(), Vec2::new(10.0, 0.0));

        model.activate(ForceKind::Spring);
        assert_eq!(model.resultant(), Vec2::new(10.0, 4.0));
    }

    #[test]
    fn test_empty_model_resultant_is_zero() {
        assert_eq!(ForceModel::new().resultant(), Vec2::ZERO);
    }

    #[test]
    fn test_activate_targets_first_of_kind() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 1.0, ForceKind::Custom(7)));
        model.add(push(1.0, 0.0, 2.0, ForceKind::Custom(7)));
        model.deactivate(ForceKind::Custom(7));

        let states: Vec<bool> = model.iter().map(|f| f.is_active()).collect();
        assert_eq!(states, vec![false, true]);
        assert_eq!(model.resultant(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_remove_all_of_kind() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 1.0, ForceKind::Drag));
        model.add(push(1.0, 0.0, 1.0, ForceKind::Applied));
        model.add(push(1.0, 0.0, 1.0, ForceKind::Drag));

        model.remove(ForceKind::Drag);
        assert_eq!(model.len(), 1);
        assert!(model.get(ForceKind::Drag).is_none());
    }

    #[test]
    fn test_missing_kind_is_noop() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 1.0, ForceKind::Applied));
        model.activate(ForceKind::Normal);
        model.deactivate(ForceKind::Normal);
        model.remove(ForceKind::Normal);
        assert_eq!(model.len(), 1);
        assert_eq!(model.resultant(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut force = push(1.0, 0.0, 1.0, ForceKind::Applied).with_lifetime(1.0);
        force.update(0.5);
        assert!(force.is_active());
        assert_eq!(force.age(), 0.5);
        force.update(0.5);
        assert!(!force.is_active());
    }

    #[test]
    fn test_infinite_lifetime_never_expires() {
        let mut force = push(1.0, 0.0, 1.0, ForceKind::Applied);
        for _ in 0..1000 {
            force.update(1.0);
        }
        assert!(force.is_active());
    }

    #[test]
    fn test_age_frozen_while_inactive() {
        let mut force = push(1.0, 0.0, 1.0, ForceKind::Applied).with_lifetime(10.0);
        force.update(2.0);
        force.set_active(false);
        force.update(5.0);
        assert_eq!(force.age(), 2.0);
    }

    #[test]
    fn test_reactivation_resets_age() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 1.0, ForceKind::Applied).with_lifetime(1.0));
        model.update(1.0);
        assert!(!model.get(ForceKind::Applied).unwrap().is_active());

        model.activate(ForceKind::Applied);
        let force = model.get(ForceKind::Applied).unwrap();
        assert!(force.is_active());
        assert_eq!(force.age(), 0.0);

        model.update(0.5);
        assert!(model.get(ForceKind::Applied).unwrap().is_active());
    }

    #[test]
    fn test_activating_active_force_keeps_age() {
        let mut force = push(1.0, 0.0, 1.0, ForceKind::Applied).with_lifetime(5.0);
        force.update(1.0);
        force.set_active(true);
        assert_eq!(force.age(), 1.0);
    }

    #[test]
    fn test_clear() {
        let mut model = ForceModel::new();
        model.add(push(1.0, 0.0, 1.0, ForceKind::Applied));
        model.clear();
        assert!(model.is_empty());
    }
}
