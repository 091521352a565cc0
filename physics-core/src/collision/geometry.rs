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
//! Narrow-phase geometry
//!
//! Shape primitives and the exact overlap tests used by the collision
//! step. Boxes are tested with a swept (continuous) algorithm so that fast
//! bodies cannot tunnel through each other within a step; circle tests are
//! static. Boundary contact counts as overlap in every test.

use crate::math::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb { min, max }
    }

    /// Create a box from its centre and half-extent
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half-extent on each axis
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive static overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Point of the box closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Circle primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre point
    pub center: Vec2,
    /// Radius
    pub radius: f64,
}

impl Circle {
    /// Create a circle
    pub fn new(center: Vec2, radius: f64) -> Self {
        Circle { center, radius }
    }
}

/// Entry/exit times of the moving interval `[a_min, a_max]` against the
/// fixed interval `[b_min, b_max]` along one axis
///
/// `None` when the intervals never overlap on this axis.
fn axis_window(a_min: f64, a_max: f64, b_min: f64, b_max: f64, velocity: f64) -> Option<(f64, f64)> {
    if velocity == 0.0 {
        if a_max < b_min || a_min > b_max {
            return None;
        }
        return Some((f64::NEG_INFINITY, f64::INFINITY));
    }
    let t1 = (b_min - a_max) / velocity;
    let t2 = (b_max - a_min) / velocity;
    Some((t1.min(t2), t1.max(t2)))
}

/// Swept AABB time of impact
///
/// Tests box `a` moving at `velocity_a` against box `b` moving at
/// `velocity_b` over `[0, dt]`. Returns the first time of contact in
/// seconds: `0.0` when the boxes already overlap, otherwise the moment the
/// per-axis entry windows first coincide. Returns `None` when the windows
/// are disjoint or fall outside the step.
///
/// # Examples
///
/// ```
/// use physics_core::collision::geometry::{swept_aabb, Aabb};
/// use physics_core::math::Vec2;
///
/// let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
/// let b = Aabb::from_center(Vec2::new(3.0, 0.0), Vec2::new(1.0, 1.0));
/// let toi = swept_aabb(&a, Vec2::new(1.0, 0.0), &b, Vec2::new(-1.0, 0.0), 1.0);
/// assert_eq!(toi, Some(0.5));
/// ```
pub fn swept_aabb(a: &Aabb, velocity_a: Vec2, b: &Aabb, velocity_b: Vec2, dt: f64) -> Option<f64> {
    if a.overlaps(b) {
        return Some(0.0);
    }

    // move a relative to a stationary b
    let v = velocity_a - velocity_b;
    let (entry_x, exit_x) = axis_window(a.min.x, a.max.x, b.min.x, b.max.x, v.x)?;
    let (entry_y, exit_y) = axis_window(a.min.y, a.max.y, b.min.y, b.max.y, v.y)?;

    let entry = entry_x.max(entry_y);
    let exit = exit_x.min(exit_y);

    if entry > exit || exit < 0.0 || entry > dt {
        return None;
    }
    Some(entry.max(0.0))
}

/// Circle–circle overlap; touching circles overlap
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    (a.center - b.center).length_squared() <= reach * reach
}

/// Box–circle overlap via the box point closest to the circle centre
pub fn aabb_circle_overlap(aabb: &Aabb, circle: &Circle) -> bool {
    let closest = aabb.closest_point(circle.center);
    (closest - circle.center).length_squared() <= circle.radius * circle.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(x: f64, y: f64) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_aabb_construction() {
        let b = Aabb::from_center(Vec2::new(2.0, 3.0), Vec2::new(1.0, 0.5));
        assert_eq!(b.min, Vec2::new(1.0, 2.5));
        assert_eq!(b.max, Vec2::new(3.0, 3.5));
        assert_eq!(b.center(), Vec2::new(2.0, 3.0));
        assert_eq!(b.half_extents(), Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_static_overlap_reports_zero() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(1.5, 0.5);
        assert_eq!(swept_aabb(&a, Vec2::ZERO, &b, Vec2::ZERO, 1.0), Some(0.0));
        assert_eq!(
            swept_aabb(&a, Vec2::new(-5.0, 0.0), &b, Vec2::new(5.0, 0.0), 1.0),
            Some(0.0)
        );
    }

    #[test]
    fn test_touching_boxes_overlap() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(2.0, 0.0);
        assert!(a.overlaps(&b));
        assert_eq!(swept_aabb(&a, Vec2::ZERO, &b, Vec2::ZERO, 1.0), Some(0.0));
    }

    #[test]
    fn test_closing_boxes_time_of_impact() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(3.0, 0.0);
        let toi = swept_aabb(&a, Vec2::new(1.0, 0.0), &b, Vec2::new(-1.0, 0.0), 1.0).unwrap();
        assert!((toi - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_one_moving_box() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(0.0, 4.0);
        // gap of 2 closed at speed 4
        let toi = swept_aabb(&a, Vec2::new(0.0, 4.0), &b, Vec2::ZERO, 1.0).unwrap();
        assert!((toi - 0.5).abs() < 1e-12);
        assert!(toi > 0.0 && toi <= 1.0);
    }

    #[test]
    fn test_impact_at_end_of_step_counts() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(3.0, 0.0);
        let toi = swept_aabb(&a, Vec2::new(1.0, 0.0), &b, Vec2::ZERO, 1.0).unwrap();
        assert!((toi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_impact_after_step_is_miss() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(5.0, 0.0);
        assert_eq!(swept_aabb(&a, Vec2::new(1.0, 0.0), &b, Vec2::ZERO, 1.0), None);
    }

    #[test]
    fn test_receding_boxes_miss() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(3.0, 0.0);
        assert_eq!(
            swept_aabb(&a, Vec2::new(-1.0, 0.0), &b, Vec2::new(1.0, 0.0), 1.0),
            None
        );
    }

    #[test]
    fn test_parallel_offset_motion_misses() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(3.0, 5.0);
        assert_eq!(swept_aabb(&a, Vec2::new(10.0, 0.0), &b, Vec2::ZERO, 1.0), None);
    }

    #[test]
    fn test_diagonal_windows_must_intersect() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(4.0, 4.0);
        // x overlaps during [1, 3], y during [0.5, 1.5]
        let toi = swept_aabb(&a, Vec2::new(2.0, 4.0), &b, Vec2::ZERO, 2.0).unwrap();
        assert!((toi - 1.0).abs() < 1e-12);
        // x overlaps during [2, 6], y during [0.5, 1.5]: never together
        assert_eq!(swept_aabb(&a, Vec2::new(1.0, 4.0), &b, Vec2::ZERO, 10.0), None);
    }

    #[test]
    fn test_tunnelling_is_caught() {
        let bullet = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::new(0.1, 0.1));
        let wall = Aabb::from_center(Vec2::new(5.0, 0.0), Vec2::new(0.1, 2.0));
        let toi = swept_aabb(&bullet, Vec2::new(600.0, 0.0), &wall, Vec2::ZERO, 1.0 / 60.0);
        assert!(toi.is_some());
    }

    #[test]
    fn test_circle_circle_boundary_counts() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 1.0);
        let touching = Circle::new(Vec2::new(3.0, 0.0), 2.0);
        let apart = Circle::new(Vec2::new(3.0, 0.0), 1.999);
        assert!(circles_overlap(&a, &touching));
        assert!(!circles_overlap(&a, &apart));
        assert!(circles_overlap(&a, &Circle::new(Vec2::new(0.5, 0.5), 0.1)));
    }

    #[test]
    fn test_box_circle_side_and_corner() {
        let b = unit_box(0.0, 0.0);
        assert!(aabb_circle_overlap(&b, &Circle::new(Vec2::new(1.5, 0.0), 0.5)));
        assert!(!aabb_circle_overlap(&b, &Circle::new(Vec2::new(1.6, 0.0), 0.5)));
        // corner at (1,1): distance to (2,2) is sqrt(2)
        assert!(!aabb_circle_overlap(&b, &Circle::new(Vec2::new(2.0, 2.0), 1.4)));
        assert!(aabb_circle_overlap(&b, &Circle::new(Vec2::new(2.0, 2.0), 1.5)));
        // centre inside the box
        assert!(aabb_circle_overlap(&b, &Circle::new(Vec2::new(0.2, -0.3), 0.01)));
    }

    #[test]
    fn test_closest_point_clamps() {
        let b = unit_box(0.0, 0.0);
        assert_eq!(b.closest_point(Vec2::new(3.0, 0.5)), Vec2::new(1.0, 0.5));
        assert_eq!(b.closest_point(Vec2::new(0.5, 0.5)), Vec2::new(0.5, 0.5));
    }
}
