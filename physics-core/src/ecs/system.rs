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
//! Fixed-step system interface
//!
//! Systems contain the logic that operates on entities and components.
//! Each system is invoked once per fixed sub-step with exclusive access to
//! the world and a `StepContext` describing the step.

use crate::ecs::World;
use crate::events::EventSink;
use crate::layers::LayerManager;

/// Per-step view of the collaborators a system may use
///
/// The context is rebuilt for every sub-step; systems must not retain it.
pub struct StepContext<'a> {
    delta_time: f64,
    time: f64,
    layers: &'a dyn LayerManager,
    events: &'a mut dyn EventSink,
}

impl<'a> StepContext<'a> {
    /// Create a context for one fixed sub-step
    ///
    /// `time` is the accumulated simulation time stamped onto emitted events.
    pub fn new(
        delta_time: f64,
        time: f64,
        layers: &'a dyn LayerManager,
        events: &'a mut dyn EventSink,
    ) -> Self {
        StepContext {
            delta_time,
            time,
            layers,
            events,
        }
    }

    /// Fixed sub-step length in seconds
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Accumulated simulation time
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Read-only layer classification
    pub fn layers(&self) -> &dyn LayerManager {
        self.layers
    }

    /// Event sink for this step
    pub fn events(&mut self) -> &mut dyn EventSink {
        &mut *self.events
    }
}

/// Trait for systems that run once per fixed sub-step
pub trait System: Send + Sync {
    /// Execute the system for one fixed sub-step
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
