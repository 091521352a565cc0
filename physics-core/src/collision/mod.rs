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
//! Collision detection and response
//!
//! - `geometry`: shape primitives and narrow-phase tests (swept AABB,
//!   circle–circle, box–circle)
//! - `contact`: per-pair contact records driving ENTER/STAY/EXIT
//! - `response`: velocity correction for physical contacts
//! - `system`: the collision step tying the three together

pub mod contact;
pub mod geometry;
pub mod response;
pub mod system;

pub use contact::{Channel, ContactTracker, PairKey};
pub use geometry::{aabb_circle_overlap, circles_overlap, swept_aabb, Aabb, Circle};
pub use response::{resolve_collision, resolve_collision_scaled, CollisionAxis, Participant};
pub use system::{shapes_overlap, CollisionSystem, Shape};
