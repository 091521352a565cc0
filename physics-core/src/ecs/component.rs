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
//! Component storage
//!
//! Components are plain data attached to entities. Each component type
//! lives in its own storage, indexed by the owning entity's stable handle.

use crate::ecs::Entity;
use std::any::TypeId;
use std::collections::HashMap;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
pub trait Component: 'static + Send + Sync {
    /// Get the type ID of this component
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Storage interface for components
pub trait ComponentStorage: Send + Sync {
    /// The component type this storage manages
    type Component: Component;

    /// Insert a component for the given entity, replacing any previous one
    fn insert(&mut self, entity: Entity, component: Self::Component);

    /// Remove a component for the given entity
    fn remove(&mut self, entity: Entity) -> Option<Self::Component>;

    /// Get a reference to a component for the given entity
    fn get(&self, entity: Entity) -> Option<&Self::Component>;

    /// Get a mutable reference to a component for the given entity
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component>;

    /// Check if an entity has this component
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored components
    fn len(&self) -> usize;

    /// Check if the storage holds no components
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all components
    fn clear(&mut self);
}

/// HashMap-backed component storage
pub struct HashMapStorage<T: Component> {
    components: HashMap<Entity, T>,
}

impl<T: Component> HashMapStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        HashMapStorage {
            components: HashMap::new(),
        }
    }

    /// Iterate over `(entity, component)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.components.iter().map(|(e, c)| (*e, c))
    }

    /// Iterate mutably over `(entity, component)` pairs in unspecified order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.components.iter_mut().map(|(e, c)| (*e, c))
    }

    /// Run `f` with mutable access to the components of two distinct entities
    ///
    /// `b`'s component is lifted out of the map for the call and put back
    /// afterwards, so both lookups are hashed. Returns `None` without calling
    /// `f` if the entities are equal or either one is missing.
    pub fn with_pair_mut<R>(
        &mut self,
        a: Entity,
        b: Entity,
        f: impl FnOnce(&mut T, &mut T) -> R,
    ) -> Option<R> {
        if a == b {
            return None;
        }
        let mut second = self.components.remove(&b)?;
        let result = self.components.get_mut(&a).map(|first| f(first, &mut second));
        self.components.insert(b, second);
        result
    }
}

impl<T: Component> Default for HashMapStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for HashMapStorage<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: Self::Component) {
        self.components.insert(entity, component);
    }

    fn remove(&mut self, entity: Entity) -> Option<Self::Component> {
        self.components.remove(&entity)
    }

    fn get(&self, entity: Entity) -> Option<&Self::Component> {
        self.components.get(&entity)
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component> {
        self.components.get_mut(&entity)
    }

    fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        self.components.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Transform;
    use crate::math::Vec2;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Marker(u32);

    impl Component for Marker {}

    #[test]
    fn test_hashmap_storage() {
        let mut storage = HashMapStorage::<Marker>::new();
        let entity = Entity::new(1, 0);

        storage.insert(entity, Marker(7));
        assert!(storage.contains(entity));
        assert_eq!(storage.get(entity), Some(&Marker(7)));
        assert_eq!(storage.len(), 1);

        assert_eq!(storage.remove(entity), Some(Marker(7)));
        assert!(!storage.contains(entity));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut storage = HashMapStorage::<Marker>::new();
        let entity = Entity::new(1, 0);
        storage.insert(entity, Marker(1));
        storage.insert(entity, Marker(2));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(entity), Some(&Marker(2)));
    }

    #[test]
    fn test_generations_are_distinct_keys() {
        let mut storage = HashMapStorage::<Marker>::new();
        storage.insert(Entity::new(1, 0), Marker(1));
        assert!(!storage.contains(Entity::new(1, 1)));
    }

    #[test]
    fn test_with_pair_mut() {
        let mut storage = HashMapStorage::<Transform>::new();
        let a = Entity::new(1, 0);
        let b = Entity::new(2, 0);
        storage.insert(a, Transform::at(Vec2::new(0.0, 0.0)));
        storage.insert(b, Transform::at(Vec2::new(5.0, 0.0)));

        let sum = storage.with_pair_mut(a, b, |ta, tb| {
            ta.position.x = 1.0;
            tb.position.x = 4.0;
            ta.position.x + tb.position.x
        });
        assert_eq!(sum, Some(5.0));
        assert_eq!(storage.get(a).unwrap().position.x, 1.0);
        assert_eq!(storage.get(b).unwrap().position.x, 4.0);

        assert!(storage.with_pair_mut(a, a, |_, _| ()).is_none());
        assert!(storage.with_pair_mut(a, Entity::new(9, 0), |_, _| ()).is_none());
        // a missing first entity leaves the second in place
        assert!(storage.with_pair_mut(Entity::new(9, 0), b, |_, _| ()).is_none());
        assert_eq!(storage.get(b).unwrap().position.x, 4.0);
        assert_eq!(storage.len(), 2);
    }
}
