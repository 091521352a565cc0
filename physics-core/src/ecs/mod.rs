//! Entity Component System (ECS) core
//!
//! This module provides the component arena the physics core runs against:
//! - Generational entity handles
//! - Per-type component storage indexed by entity
//! - The fixed-step `System` trait and the staged `Scheduler`

mod entity;
mod component;
mod system;
mod world;

pub mod components;
pub mod scheduler;

pub use entity::{Entity, EntityId};
pub use component::{Component, ComponentStorage, HashMapStorage};
pub use system::{StepContext, System};
pub use world::{ComponentsMut, World};
