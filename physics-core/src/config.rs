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
//! Simulation configuration
//!
//! Every tunable constant of the physics step lives here and is injected
//! into the systems when they are constructed.

use crate::dynamics::{GravityConfig, IntegratorConfig};
use thiserror::Error;

/// Default downward gravitational acceleration applied by the gravity step
pub const DEFAULT_BASE_GRAVITY: f64 = -9.81;

/// Default magnitude of the integrator's own gravity term
pub const DEFAULT_INTEGRATOR_GRAVITY: f64 = 500.0;

/// Squared speed at or below which drag is not applied
pub const DEFAULT_DRAG_THRESHOLD_SQ: f64 = 0.01;

/// Default fixed sub-step length (60 Hz)
pub const DEFAULT_FIXED_DELTA_TIME: f64 = 1.0 / 60.0;

/// Default cap on sub-steps per frame
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Errors produced when validating a `PhysicsConfig`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The fixed timestep is zero, negative, NaN or infinite
    #[error("fixed delta time must be positive and finite, got {0}")]
    InvalidTimestep(f64),
    /// The sub-step cap is zero
    #[error("max substeps must be at least 1")]
    ZeroSubsteps,
    /// A gravity constant is NaN or infinite
    #[error("{name} must be finite, got {value}")]
    NonFiniteGravity {
        /// Which constant failed
        name: &'static str,
        /// The offending value
        value: f64,
    },
    /// The drag threshold is negative or not finite
    #[error("drag velocity threshold must be non-negative and finite, got {0}")]
    InvalidDragThreshold(f64),
}

/// Configuration of the fixed-step physics pipeline
///
/// # Examples
///
/// ```
/// use physics_core::config::PhysicsConfig;
///
/// let config = PhysicsConfig::default().with_fixed_delta_time(0.01);
/// assert!(config.validate().is_ok());
///
/// let broken = PhysicsConfig::default().with_fixed_delta_time(0.0);
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    /// Length of one fixed sub-step in seconds
    pub fixed_delta_time: f64,
    /// Maximum sub-steps run per frame; excess accumulated time is dropped
    pub max_substeps: u32,
    /// Gravity step acceleration (negative is down)
    pub base_gravity: f64,
    /// Magnitude of the integrator's additional downward term
    pub integrator_gravity: f64,
    /// Squared speed that must be exceeded before drag applies
    pub drag_velocity_threshold_sq: f64,
}

impl PhysicsConfig {
    /// Set the fixed sub-step length
    pub fn with_fixed_delta_time(mut self, dt: f64) -> Self {
        self.fixed_delta_time = dt;
        self
    }

    /// Set the per-frame sub-step cap
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Set the gravity step acceleration
    pub fn with_base_gravity(mut self, gravity: f64) -> Self {
        self.base_gravity = gravity;
        self
    }

    /// Set the integrator's own gravity magnitude
    pub fn with_integrator_gravity(mut self, gravity: f64) -> Self {
        self.integrator_gravity = gravity;
        self
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_delta_time > 0.0 && self.fixed_delta_time.is_finite()) {
            return Err(ConfigError::InvalidTimestep(self.fixed_delta_time));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        if !self.base_gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity {
                name: "base gravity",
                value: self.base_gravity,
            });
        }
        if !self.integrator_gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity {
                name: "integrator gravity",
                value: self.integrator_gravity,
            });
        }
        if !(self.drag_velocity_threshold_sq >= 0.0 && self.drag_velocity_threshold_sq.is_finite())
        {
            return Err(ConfigError::InvalidDragThreshold(
                self.drag_velocity_threshold_sq,
            ));
        }
        Ok(())
    }

    /// Settings for the gravity step
    pub fn gravity(&self) -> GravityConfig {
        GravityConfig {
            base_gravity: self.base_gravity,
        }
    }

    /// Settings for the integrator
    pub fn integrator(&self) -> IntegratorConfig {
        IntegratorConfig {
            gravity: self.integrator_gravity,
            drag_velocity_threshold_sq: self.drag_velocity_threshold_sq,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            base_gravity: DEFAULT_BASE_GRAVITY,
            integrator_gravity: DEFAULT_INTEGRATOR_GRAVITY,
            drag_velocity_threshold_sq: DEFAULT_DRAG_THRESHOLD_SQ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.base_gravity < 0.0);
    }

    #[test]
    fn test_invalid_timestep() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let config = PhysicsConfig::default().with_fixed_delta_time(dt);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTimestep(_))
            ));
        }
    }

    #[test]
    fn test_zero_substeps() {
        let config = PhysicsConfig::default().with_max_substeps(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSubsteps));
    }

    #[test]
    fn test_non_finite_gravity() {
        let config = PhysicsConfig::default().with_base_gravity(f64::NAN);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base gravity"));

        let config = PhysicsConfig::default().with_integrator_gravity(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteGravity { name: "integrator gravity", .. })
        ));
    }

    #[test]
    fn test_negative_drag_threshold() {
        let config = PhysicsConfig {
            drag_velocity_threshold_sq: -1.0,
            ..PhysicsConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDragThreshold(-1.0))
        );
    }

    #[test]
    fn test_derived_system_configs() {
        let config = PhysicsConfig::default()
            .with_base_gravity(-20.0)
            .with_integrator_gravity(100.0);
        assert_eq!(config.gravity().base_gravity, -20.0);
        assert_eq!(config.integrator().gravity, 100.0);
        assert_eq!(
            config.integrator().drag_velocity_threshold_sq,
            DEFAULT_DRAG_THRESHOLD_SQ
        );
    }
}
