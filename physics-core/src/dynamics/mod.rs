//! Force accumulation and numerical integration
//!
//! - [`forces`]: per-body typed force model
//! - [`gravity`]: the gravity step
//! - [`integrator`]: the semi-implicit Euler movement step

pub mod forces;
pub mod gravity;
pub mod integrator;

pub use forces::{Force, ForceKind, ForceModel};
pub use gravity::{gravity_force, GravityConfig, GravitySystem};
pub use integrator::{drag_force, integrate_body, IntegratorConfig, MovementSystem};
