//! World management
//!
//! The World is the component arena: it owns entity lifecycles and one
//! storage per component type, all indexed by stable entity handles.

use crate::ecs::components::{BoxCollider, CircleCollider, RigidBody, Transform};
use crate::ecs::{ComponentStorage, Entity, HashMapStorage};
use std::collections::HashSet;

/// Simultaneous mutable access to every component storage
///
/// Systems borrow this for the duration of one call; the borrow ends when
/// the system returns control to the scheduler.
pub struct ComponentsMut<'w> {
    /// Transform storage
    pub transforms: &'w mut HashMapStorage<Transform>,
    /// Rigid body storage
    pub bodies: &'w mut HashMapStorage<RigidBody>,
    /// Box collider storage
    pub boxes: &'w mut HashMapStorage<BoxCollider>,
    /// Circle collider storage
    pub circles: &'w mut HashMapStorage<CircleCollider>,
}

/// The main ECS world container
pub struct World {
    next_entity_id: u64,
    entity_generations: Vec<u32>,
    free_ids: Vec<u64>,
    alive_entities: HashSet<Entity>,
    inactive_entities: HashSet<Entity>,
    transforms: HashMapStorage<Transform>,
    bodies: HashMapStorage<RigidBody>,
    boxes: HashMapStorage<BoxCollider>,
    circles: HashMapStorage<CircleCollider>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            next_entity_id: 0,
            entity_generations: Vec::new(),
            free_ids: Vec::new(),
            alive_entities: HashSet::new(),
            inactive_entities: HashSet::new(),
            transforms: HashMapStorage::new(),
            bodies: HashMapStorage::new(),
            boxes: HashMapStorage::new(),
            circles: HashMapStorage::new(),
        }
    }

    /// Create a new entity
    ///
    /// Ids of destroyed entities are reused with a bumped generation.
    pub fn create_entity(&mut self) -> Entity {
        let id = match self.free_ids.pop() {
            Some(id) => id,
            None => {
                let id = self.next_entity_id;
                self.next_entity_id += 1;
                id
            }
        };

        if id as usize >= self.entity_generations.len() {
            self.entity_generations.resize(id as usize + 1, 0);
        }

        let entity = Entity::new(id, self.entity_generations[id as usize]);
        self.alive_entities.insert(entity);
        entity
    }

    /// Destroy an entity and drop all of its components
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.alive_entities.remove(&entity) {
            return false;
        }
        self.inactive_entities.remove(&entity);
        self.transforms.remove(entity);
        self.bodies.remove(entity);
        self.boxes.remove(entity);
        self.circles.remove(entity);

        let id = entity.id().raw();
        if let Some(generation) = self.entity_generations.get_mut(id as usize) {
            *generation = generation.wrapping_add(1);
        }
        self.free_ids.push(id);
        true
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.alive_entities.contains(&entity)
    }

    /// Activate or deactivate an entity
    ///
    /// Inactive entities keep their components but are skipped by all systems.
    pub fn set_entity_active(&mut self, entity: Entity, active: bool) {
        if !self.is_entity_alive(entity) {
            return;
        }
        if active {
            self.inactive_entities.remove(&entity);
        } else {
            self.inactive_entities.insert(entity);
        }
    }

    /// Check if an entity is alive and active
    pub fn is_entity_active(&self, entity: Entity) -> bool {
        self.is_entity_alive(entity) && !self.inactive_entities.contains(&entity)
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.alive_entities.len()
    }

    /// Remove every entity and component
    pub fn clear(&mut self) {
        self.alive_entities.clear();
        self.inactive_entities.clear();
        self.entity_generations.clear();
        self.free_ids.clear();
        self.next_entity_id = 0;
        self.transforms.clear();
        self.bodies.clear();
        self.boxes.clear();
        self.circles.clear();
    }

    /// Get an iterator over all alive entities in unspecified order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.alive_entities.iter()
    }

    /// Active entities carrying both a `Transform` and an active `RigidBody`,
    /// sorted by handle
    pub fn body_entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .alive_entities
            .iter()
            .copied()
            .filter(|e| !self.inactive_entities.contains(e))
            .filter(|e| self.transforms.contains(*e))
            .filter(|e| self.bodies.get(*e).map_or(false, |b| b.active))
            .collect();
        entities.sort_unstable();
        entities
    }

    /// Bodies that also carry at least one enabled collider, sorted by handle
    pub fn collidable_entities(&self) -> Vec<Entity> {
        self.body_entities()
            .into_iter()
            .filter(|e| {
                self.boxes.get(*e).map_or(false, |c| c.enabled)
                    || self.circles.get(*e).map_or(false, |c| c.enabled)
            })
            .collect()
    }

    /// Transform storage
    pub fn transforms(&self) -> &HashMapStorage<Transform> {
        &self.transforms
    }

    /// Mutable transform storage
    pub fn transforms_mut(&mut self) -> &mut HashMapStorage<Transform> {
        &mut self.transforms
    }

    /// Rigid body storage
    pub fn bodies(&self) -> &HashMapStorage<RigidBody> {
        &self.bodies
    }

    /// Mutable rigid body storage
    pub fn bodies_mut(&mut self) -> &mut HashMapStorage<RigidBody> {
        &mut self.bodies
    }

    /// Box collider storage
    pub fn box_colliders(&self) -> &HashMapStorage<BoxCollider> {
        &self.boxes
    }

    /// Mutable box collider storage
    pub fn box_colliders_mut(&mut self) -> &mut HashMapStorage<BoxCollider> {
        &mut self.boxes
    }

    /// Circle collider storage
    pub fn circle_colliders(&self) -> &HashMapStorage<CircleCollider> {
        &self.circles
    }

    /// Mutable circle collider storage
    pub fn circle_colliders_mut(&mut self) -> &mut HashMapStorage<CircleCollider> {
        &mut self.circles
    }

    /// Borrow every storage mutably at once
    pub fn components_mut(&mut self) -> ComponentsMut<'_> {
        ComponentsMut {
            transforms: &mut self.transforms,
            bodies: &mut self.bodies,
            boxes: &mut self.boxes,
            circles: &mut self.circles,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn spawn_body(world: &mut World) -> Entity {
        let e = world.create_entity();
        world.transforms_mut().insert(e, Transform::default());
        world.bodies_mut().insert(e, RigidBody::new(1.0));
        e
    }

    #[test]
    fn test_world_entity_lifecycle() {
        let mut world = World::new();

        let e1 = world.create_entity();
        let e2 = world.create_entity();
        assert_eq!(world.entity_count(), 2);

        assert!(world.destroy_entity(e1));
        assert!(!world.destroy_entity(e1));
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_entity_alive(e1));
        assert!(world.is_entity_alive(e2));
    }

    #[test]
    fn test_reused_id_gets_new_generation() {
        let mut world = World::new();
        let e1 = world.create_entity();
        world.destroy_entity(e1);
        let e2 = world.create_entity();

        assert_eq!(e2.id(), e1.id());
        assert_ne!(e2.generation(), e1.generation());
        assert!(!world.is_entity_alive(e1));
    }

    #[test]
    fn test_destroy_drops_components() {
        let mut world = World::new();
        let e = spawn_body(&mut world);
        world.box_colliders_mut().insert(e, BoxCollider::new(Vec2::splat(1.0)));

        world.destroy_entity(e);
        assert!(!world.transforms().contains(e));
        assert!(!world.bodies().contains(e));
        assert!(!world.box_colliders().contains(e));
    }

    #[test]
    fn test_body_query_is_sorted_and_filtered() {
        let mut world = World::new();
        let a = spawn_body(&mut world);
        let b = spawn_body(&mut world);
        let c = spawn_body(&mut world);
        let bare = world.create_entity();

        world.set_entity_active(b, false);
        assert_eq!(world.body_entities(), vec![a, c]);
        assert!(!world.body_entities().contains(&bare));

        world.bodies_mut().get_mut(c).unwrap().active = false;
        assert_eq!(world.body_entities(), vec![a]);

        world.set_entity_active(b, true);
        assert_eq!(world.body_entities(), vec![a, b]);
    }

    #[test]
    fn test_collidable_requires_enabled_collider() {
        let mut world = World::new();
        let a = spawn_body(&mut world);
        let b = spawn_body(&mut world);
        let c = spawn_body(&mut world);
        world.box_colliders_mut().insert(a, BoxCollider::new(Vec2::splat(1.0)));
        world.circle_colliders_mut().insert(b, CircleCollider::new(1.0));
        let mut disabled = CircleCollider::new(1.0);
        disabled.enabled = false;
        world.circle_colliders_mut().insert(c, disabled);

        assert_eq!(world.collidable_entities(), vec![a, b]);
    }

    #[test]
    fn test_world_clear() {
        let mut world = World::new();
        spawn_body(&mut world);
        spawn_body(&mut world);
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.bodies().is_empty());
    }
}
