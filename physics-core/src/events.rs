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
//! Contact events
//!
//! The collision step reports contact transitions through an `EventSink`.
//! Collision and trigger contacts are distinct event variants; both carry
//! the two bodies, the accumulated simulation time and the phase.

use crate::ecs::Entity;
use std::collections::VecDeque;
use std::fmt;

/// Phase of a contact between two bodies
///
/// The discriminants are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ContactPhase {
    /// First step of overlap
    Enter = -1,
    /// Overlap continues from the previous step
    Stay = 0,
    /// Overlap ended this step
    Exit = 1,
}

impl ContactPhase {
    /// Numeric code of the phase (-1, 0 or 1)
    pub fn code(self) -> i8 {
        self as i8
    }
}

/// A contact transition between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// Lower-ordered body of the pair
    pub first: Entity,
    /// Higher-ordered body of the pair
    pub second: Entity,
    /// Accumulated simulation time of the step
    pub time: f64,
    /// Transition kind
    pub phase: ContactPhase,
}

impl ContactEvent {
    /// Whether `entity` is one of the two participants
    pub fn involves(&self, entity: Entity) -> bool {
        self.first == entity || self.second == entity
    }
}

/// Event emitted by the physics core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Physical (non-trigger) contact
    Collision(ContactEvent),
    /// Contact involving at least one trigger collider
    Trigger(ContactEvent),
}

impl PhysicsEvent {
    /// The contact payload regardless of variant
    pub fn contact(&self) -> &ContactEvent {
        match self {
            PhysicsEvent::Collision(c) | PhysicsEvent::Trigger(c) => c,
        }
    }

    /// Phase of the contact
    pub fn phase(&self) -> ContactPhase {
        self.contact().phase
    }

    /// Whether this is a trigger event
    pub fn is_trigger(&self) -> bool {
        matches!(self, PhysicsEvent::Trigger(_))
    }
}

/// Destination for events emitted during a step
pub trait EventSink {
    /// Deliver `event` synchronously
    fn emit(&mut self, event: PhysicsEvent);
}

impl EventSink for Vec<PhysicsEvent> {
    fn emit(&mut self, event: PhysicsEvent) {
        self.push(event);
    }
}

/// Handle returned by `EventBus::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(&PhysicsEvent) + Send>;

/// Synchronous publish/subscribe bus
///
/// `emit` calls every current subscriber in subscription order before it
/// returns. An optional bounded history keeps the most recent events.
///
/// # Examples
///
/// ```
/// use physics_core::events::{EventBus, EventSink, PhysicsEvent, ContactEvent, ContactPhase};
/// use physics_core::ecs::Entity;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(0));
/// let counter = Arc::clone(&seen);
/// let mut bus = EventBus::new();
/// bus.subscribe(move |_| *counter.lock().unwrap() += 1);
///
/// bus.emit(PhysicsEvent::Collision(ContactEvent {
///     first: Entity::new(0, 0),
///     second: Entity::new(1, 0),
///     time: 0.0,
///     phase: ContactPhase::Enter,
/// }));
/// assert_eq!(*seen.lock().unwrap(), 1);
/// ```
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Handler)>,
    next_id: u64,
    history: VecDeque<PhysicsEvent>,
    history_capacity: usize,
}

impl EventBus {
    /// Create a bus without history
    pub fn new() -> Self {
        Self::with_history(0)
    }

    /// Create a bus retaining up to `capacity` most recent events
    pub fn with_history(capacity: usize) -> Self {
        EventBus {
            subscribers: Vec::new(),
            next_id: 0,
            history: VecDeque::with_capacity(capacity),
            history_capacity: capacity,
        }
    }

    /// Register a handler
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&PhysicsEvent) + Send + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Number of registered handlers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Retained events, oldest first
    pub fn history(&self) -> impl Iterator<Item = &PhysicsEvent> {
        self.history.iter()
    }

    /// Take and clear the retained events
    pub fn drain_history(&mut self) -> Vec<PhysicsEvent> {
        self.history.drain(..).collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: PhysicsEvent) {
        for (_, handler) in &mut self.subscribers {
            handler(&event);
        }
        if self.history_capacity > 0 {
            if self.history.len() == self.history_capacity {
                self.history.pop_front();
            }
            self.history.push_back(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("history", &self.history.len())
            .field("history_capacity", &self.history_capacity)
            .finish()
    }
}
