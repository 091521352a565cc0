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
//! Persistent contact state
//!
//! The tracker keeps one record per unordered pair of bodies that are (or
//! just were) overlapping. Each record remembers, per channel, whether ENTER
//! has already been reported, which is what turns raw per-step overlap
//! results into ENTER/STAY/EXIT transitions.

use crate::ecs::Entity;
use crate::events::ContactPhase;
use std::collections::BTreeMap;

/// Contact channel of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Physical collision
    Collision,
    /// Trigger overlap
    Trigger,
}

impl Channel {
    /// Both channels in reporting order
    pub const ALL: [Channel; 2] = [Channel::Collision, Channel::Trigger];

    /// Channel for a pair where `is_trigger` is true if either collider is a trigger
    pub fn classify(is_trigger: bool) -> Self {
        if is_trigger {
            Channel::Trigger
        } else {
            Channel::Collision
        }
    }

    /// The other channel
    pub fn other(self) -> Self {
        match self {
            Channel::Collision => Channel::Trigger,
            Channel::Trigger => Channel::Collision,
        }
    }
}

/// Order-independent key of a body pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: Entity,
    second: Entity,
}

impl PairKey {
    /// Create a key; `PairKey::new(a, b) == PairKey::new(b, a)`
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            PairKey { first: a, second: b }
        } else {
            PairKey { first: b, second: a }
        }
    }

    /// Lower-ordered entity
    pub fn first(&self) -> Entity {
        self.first
    }

    /// Higher-ordered entity
    pub fn second(&self) -> Entity {
        self.second
    }

    /// Whether `entity` belongs to the pair
    pub fn contains(&self, entity: Entity) -> bool {
        self.first == entity || self.second == entity
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PairState {
    collision_entered: bool,
    trigger_entered: bool,
    evaluated: bool,
}

impl PairState {
    fn entered(&self, channel: Channel) -> bool {
        match channel {
            Channel::Collision => self.collision_entered,
            Channel::Trigger => self.trigger_entered,
        }
    }

    fn set_entered(&mut self, channel: Channel, value: bool) {
        match channel {
            Channel::Collision => self.collision_entered = value,
            Channel::Trigger => self.trigger_entered = value,
        }
    }

    fn is_empty(&self) -> bool {
        !self.collision_entered && !self.trigger_entered
    }
}

/// Contact-pair bookkeeping owned by the collision step
///
/// Call `begin_step` before the pair loop, report every evaluated pair with
/// `report_overlap` or `report_separation`, then collect the EXITs of pairs
/// that were never evaluated with `end_step`.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    pairs: BTreeMap<PairKey, PairState>,
}

impl ContactTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-step evaluation marks
    pub fn begin_step(&mut self) {
        for state in self.pairs.values_mut() {
            state.evaluated = false;
        }
    }

    /// Record an overlap in `channel`
    ///
    /// Returns `Enter` the first time the pair overlaps in that channel and
    /// `Stay` afterwards.
    pub fn report_overlap(&mut self, key: PairKey, channel: Channel) -> ContactPhase {
        let state = self.pairs.entry(key).or_default();
        state.evaluated = true;
        if state.entered(channel) {
            ContactPhase::Stay
        } else {
            state.set_entered(channel, true);
            ContactPhase::Enter
        }
    }

    /// Record that an evaluated pair does not overlap in `channel`
    ///
    /// Returns `Some(Exit)` when the pair had entered that channel; the
    /// record is dropped once neither channel is live.
    pub fn report_separation(&mut self, key: PairKey, channel: Channel) -> Option<ContactPhase> {
        let state = self.pairs.get_mut(&key)?;
        state.evaluated = true;
        if !state.entered(channel) {
            return None;
        }
        state.set_entered(channel, false);
        if state.is_empty() {
            self.pairs.remove(&key);
        }
        Some(ContactPhase::Exit)
    }

    /// Close every live channel of the pairs not evaluated since `begin_step`
    ///
    /// The returned list is in pair order and each entry needs an EXIT event.
    pub fn end_step(&mut self) -> Vec<(PairKey, Channel)> {
        let mut exits = Vec::new();
        self.pairs.retain(|key, state| {
            if state.evaluated {
                return true;
            }
            for channel in Channel::ALL {
                if state.entered(channel) {
                    exits.push((*key, channel));
                }
            }
            false
        });
        exits
    }

    /// Whether the pair currently has a live record in `channel`
    pub fn is_touching(&self, key: PairKey, channel: Channel) -> bool {
        self.pairs
            .get(&key)
            .map(|state| state.entered(channel))
            .unwrap_or(false)
    }

    /// Live pairs with their channels, in pair order
    pub fn contacts(&self) -> impl Iterator<Item = (PairKey, Channel)> + '_ {
        self.pairs.iter().flat_map(|(key, state)| {
            Channel::ALL
                .into_iter()
                .filter(move |channel| state.entered(*channel))
                .map(move |channel| (*key, channel))
        })
    }

    /// Number of pair records
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair is in contact
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Forget every pair without reporting EXIT
    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    fn pair() -> (Entity, Entity) {
        let mut world = World::new();
        (world.create_entity(), world.create_entity())
    }

    #[test]
    fn test_pair_key_is_order_independent() {
        let (a, b) = pair();
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        assert_eq!(PairKey::new(b, a).first(), a);
        assert!(PairKey::new(a, b).contains(b));
    }

    #[test]
    fn test_enter_then_stay() {
        let (a, b) = pair();
        let key = PairKey::new(a, b);
        let mut tracker = ContactTracker::new();

        tracker.begin_step();
        assert_eq!(tracker.report_overlap(key, Channel::Collision), ContactPhase::Enter);
        assert!(tracker.end_step().is_empty());

        tracker.begin_step();
        assert_eq!(tracker.report_overlap(key, Channel::Collision), ContactPhase::Stay);
        assert!(tracker.is_touching(key, Channel::Collision));
        assert!(!tracker.is_touching(key, Channel::Trigger));
    }

    #[test]
    fn test_separation_exits_once() {
        let (a, b) = pair();
        let key = PairKey::new(a, b);
        let mut tracker = ContactTracker::new();

        tracker.report_overlap(key, Channel::Collision);
        assert_eq!(
            tracker.report_separation(key, Channel::Collision),
            Some(ContactPhase::Exit)
        );
        assert!(tracker.is_empty());
        assert_eq!(tracker.report_separation(key, Channel::Collision), None);
    }

    #[test]
    fn test_separation_without_record_is_silent() {
        let (a, b) = pair();
        let mut tracker = ContactTracker::new();
        assert_eq!(tracker.report_separation(PairKey::new(a, b), Channel::Trigger), None);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_channels_are_independent() {
        let (a, b) = pair();
        let key = PairKey::new(a, b);
        let mut tracker = ContactTracker::new();

        tracker.report_overlap(key, Channel::Trigger);
        assert_eq!(tracker.report_overlap(key, Channel::Collision), ContactPhase::Enter);
        tracker.report_separation(key, Channel::Trigger);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.is_touching(key, Channel::Collision));
    }

    #[test]
    fn test_unevaluated_pairs_exit_at_end_of_step() {
        let (a, b) = pair();
        let key = PairKey::new(a, b);
        let mut tracker = ContactTracker::new();

        tracker.begin_step();
        tracker.report_overlap(key, Channel::Collision);
        tracker.report_overlap(key, Channel::Trigger);
        tracker.end_step();

        tracker.begin_step();
        let exits = tracker.end_step();
        assert_eq!(exits, vec![(key, Channel::Collision), (key, Channel::Trigger)]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_contacts_listing() {
        let (a, b) = pair();
        let key = PairKey::new(a, b);
        let mut tracker = ContactTracker::new();
        tracker.report_overlap(key, Channel::Trigger);
        let live: Vec<_> = tracker.contacts().collect();
        assert_eq!(live, vec![(key, Channel::Trigger)]);
        tracker.clear();
        assert_eq!(tracker.contacts().count(), 0);
    }
}
