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
//! Collision layers
//!
//! Layers classify bodies into named groups. The collision step consults a
//! `LayerManager` during the broad phase and never writes to it.

use crate::ecs::Entity;
use std::collections::{HashMap, HashSet};

/// Read-only layer classification used by the broad phase
pub trait LayerManager {
    /// Layer of `entity`, or `None` when it is unclassified
    fn layer_of(&self, entity: Entity) -> Option<&str>;

    /// Whether bodies on layers `a` and `b` may be tested against each other
    fn should_interact(&self, a: &str, b: &str) -> bool;

    /// Broad-phase layer filter for a pair of bodies
    ///
    /// A pair is only rejected when both bodies are classified and their
    /// layers must not interact.
    fn allows_pair(&self, a: Entity, b: Entity) -> bool {
        match (self.layer_of(a), self.layer_of(b)) {
            (Some(la), Some(lb)) => self.should_interact(la, lb),
            _ => true,
        }
    }
}

/// Layer table backed by an entity map and a symmetric deny-list
///
/// Layers interact unless the pair was explicitly disabled.
///
/// # Examples
///
/// ```
/// use physics_core::layers::{LayerManager, LayerMatrix};
///
/// let mut layers = LayerMatrix::new();
/// layers.set_interaction("player", "pickup", false);
/// assert!(!layers.should_interact("pickup", "player"));
/// assert!(layers.should_interact("player", "wall"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerMatrix {
    ids: HashMap<String, LayerId>,
    names: Vec<String>,
    assignments: HashMap<Entity, LayerId>,
    disabled: HashSet<(LayerId, LayerId)>,
}

/// Index of an interned layer name
type LayerId = usize;

impl LayerMatrix {
    /// Create an empty table: no assignments, every pair interacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `entity` on `layer`; an empty name clears the assignment
    pub fn assign(&mut self, entity: Entity, layer: &str) {
        if layer.is_empty() {
            self.assignments.remove(&entity);
        } else {
            let id = self.intern(layer);
            self.assignments.insert(entity, id);
        }
    }

    /// Remove the layer assignment of `entity`
    pub fn unassign(&mut self, entity: Entity) {
        self.assignments.remove(&entity);
    }

    /// Number of entities currently on a layer
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Enable or disable interaction between two layers (order-independent)
    pub fn set_interaction(&mut self, a: &str, b: &str, interact: bool) {
        if interact {
            if let (Some(&x), Some(&y)) = (self.ids.get(a), self.ids.get(b)) {
                self.disabled.remove(&ordered(x, y));
            }
        } else {
            let x = self.intern(a);
            let y = self.intern(b);
            self.disabled.insert(ordered(x, y));
        }
    }

    fn intern(&mut self, name: &str) -> LayerId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    fn interacts(&self, a: LayerId, b: LayerId) -> bool {
        !self.disabled.contains(&ordered(a, b))
    }
}

fn ordered(a: LayerId, b: LayerId) -> (LayerId, LayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl LayerManager for LayerMatrix {
    fn layer_of(&self, entity: Entity) -> Option<&str> {
        self.assignments
            .get(&entity)
            .and_then(|&id| self.names.get(id))
            .map(String::as_str)
    }

    fn should_interact(&self, a: &str, b: &str) -> bool {
        match (self.ids.get(a), self.ids.get(b)) {
            (Some(&x), Some(&y)) => self.interacts(x, y),
            // a name never disabled against anything
            _ => true,
        }
    }

    fn allows_pair(&self, a: Entity, b: Entity) -> bool {
        match (self.assignments.get(&a), self.assignments.get(&b)) {
            (Some(&x), Some(&y)) => self.interacts(x, y),
            _ => true,
        }
    }
}
