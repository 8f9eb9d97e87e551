//! Item entities: single units of an item travelling between grid cells.

use crate::fixed::Fixed64;
use crate::id::GridPosition;
use crate::registry::ItemType;
use crate::rng::SimRng;
use serde::{Deserialize, Serialize};

/// Movement speed used when nothing else sets one, in cells per tick.
pub fn default_speed() -> Fixed64 {
    Fixed64::from_num(0.1)
}

/// Largest cosmetic offset from the cell centre, in cells.
fn jitter_amplitude() -> Fixed64 {
    Fixed64::from_num(0.125)
}

/// One physical item in the world.
///
/// Positions are whole cells; `progress` is how far along the hop from
/// `position` to `target` the item is. An item with zero progress is at rest
/// and gets a new routing decision on the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntity {
    pub item_type: ItemType,
    pub position: GridPosition,
    pub target: GridPosition,
    pub progress: Fixed64,
    /// Cells per tick for the current hop, fixed when the hop starts.
    pub speed: Fixed64,
    /// Render-only offset, set once at creation.
    pub jitter: (Fixed64, Fixed64),
}

impl ItemEntity {
    pub fn new(item_type: ItemType, position: GridPosition) -> Self {
        Self {
            item_type,
            position,
            target: position,
            progress: Fixed64::ZERO,
            speed: default_speed(),
            jitter: (Fixed64::ZERO, Fixed64::ZERO),
        }
    }

    pub fn is_at_rest(&self) -> bool {
        self.progress == Fixed64::ZERO
    }

    pub fn is_in_transit(&self) -> bool {
        self.position != self.target
    }

    /// Advance along the current hop by `speed`. On reaching the target the
    /// position snaps to it and progress resets. Returns whether the entity
    /// was in transit this step.
    pub fn update(&mut self, speed: Fixed64) -> bool {
        if !self.is_in_transit() {
            return false;
        }
        self.progress += speed;
        if self.progress >= Fixed64::ONE {
            self.progress = Fixed64::ZERO;
            self.position = self.target;
        }
        true
    }

    /// Interpolated cell-space position without jitter.
    pub fn interpolated(&self) -> (Fixed64, Fixed64) {
        let lerp = |from: i32, to: i32| {
            Fixed64::from_num(from) + Fixed64::from_num(to - from) * self.progress
        };
        (
            lerp(self.position.x, self.target.x),
            lerp(self.position.y, self.target.y),
        )
    }

    /// Cell-space position for drawing: interpolated plus jitter.
    pub fn render_position(&self) -> (Fixed64, Fixed64) {
        let (x, y) = self.interpolated();
        (x + self.jitter.0, y + self.jitter.1)
    }
}

/// All live item entities, with a hard cap on how many may exist at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemField {
    entities: Vec<ItemEntity>,
    capacity: usize,
    rng: SimRng,
}

impl ItemField {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            capacity,
            rng: SimRng::new(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    /// Add an entity. Rejected once the cap is reached.
    pub fn insert(&mut self, mut entity: ItemEntity) -> bool {
        if self.is_full() {
            return false;
        }
        if entity.jitter == (Fixed64::ZERO, Fixed64::ZERO) {
            let amp = jitter_amplitude();
            entity.jitter = (self.rng.jitter(amp), self.rng.jitter(amp));
        }
        self.entities.push(entity);
        true
    }

    /// Create an entity of `item_type` resting at `position`.
    pub fn spawn(&mut self, item_type: ItemType, position: GridPosition) -> bool {
        self.insert(ItemEntity::new(item_type, position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemEntity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[ItemEntity] {
        &self.entities
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [ItemEntity] {
        &mut self.entities
    }

    /// Remove the entities at the given indices (any order, duplicates ok).
    pub(crate) fn remove_indices(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        let mut doomed = vec![false; self.entities.len()];
        for &i in indices {
            if let Some(flag) = doomed.get_mut(i) {
                *flag = true;
            }
        }
        let mut i = 0;
        self.entities.retain(|_| {
            let keep = !doomed[i];
            i += 1;
            keep
        });
    }

    pub(crate) fn rng_state(&self) -> u64 {
        self.rng.state()
    }
}
