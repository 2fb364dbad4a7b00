//! The world store.
//!
//! Owns the ordered entity sequence, the id→index map, simulated time,
//! the seeded PRNG, and the scripted event list. Entities are appended
//! during construction and never removed; the id→index map and the entity
//! sequence stay in bijection for the world's lifetime.

use std::collections::HashMap;

use crate::entity::Entity;
use crate::error::WorldError;
use crate::events::ScriptedEvent;
use crate::rng::SeededRng;

pub struct World {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    /// Simulated time (seconds). Advances at the end of each tick.
    pub t: f64,
    pub rng: SeededRng,
    pub events: Vec<ScriptedEvent>,
}

impl World {
    pub fn new(seed: u32) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            t: 0.0,
            rng: SeededRng::new(seed),
            events: Vec::new(),
        }
    }

    /// Take ownership of an entity, assign it the next index, and record
    /// its id. Fails without mutating the world if the id already exists.
    pub fn add_entity(&mut self, entity: Entity) -> Result<usize, WorldError> {
        if self.index.contains_key(&entity.id) {
            return Err(WorldError::DuplicateId(entity.id));
        }
        let idx = self.entities.len();
        self.index.insert(entity.id.clone(), idx);
        self.entities.push(entity);
        Ok(idx)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Resolve an id to its index.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn entity(&self, idx: usize) -> &Entity {
        &self.entities[idx]
    }

    pub fn entity_mut(&mut self, idx: usize) -> &mut Entity {
        &mut self.entities[idx]
    }

    pub fn entity_by_id(&self, id: &str) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn entity_by_id_mut(&mut self, id: &str) -> Option<&mut Entity> {
        let idx = self.index_of(id)?;
        Some(&mut self.entities[idx])
    }

    /// Stable insertion-order iteration.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Mutable access to two distinct entities at once (weapon → target
    /// writes). Panics if the indices are equal or out of bounds.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Entity, &mut Entity) {
        assert_ne!(a, b, "pair_mut requires distinct indices");
        if a < b {
            let (lo, hi) = self.entities.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.entities.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        }
    }
}
