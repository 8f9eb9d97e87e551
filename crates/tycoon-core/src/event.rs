//! Typed simulation events.
//!
//! Events are recorded while actions and ticks run, and delivered in one
//! batch when the collaborator calls [`EventBus::deliver`]. Storage is a
//! fixed-capacity ring buffer: when it is full the oldest event is dropped.
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventBus::suppress`]. Suppressed
//! events are never buffered.

use crate::fixed::Ticks;
use crate::grid::Region;
use crate::id::{BuildingId, GridPosition};
use crate::registry::{BuildingType, ItemType, MissionId, TechId};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Buildings --
    BuildingPlaced {
        building: BuildingId,
        kind: BuildingType,
        origin: GridPosition,
        tick: Ticks,
    },
    BuildingRemoved {
        building: BuildingId,
        kind: BuildingType,
        origin: GridPosition,
        tick: Ticks,
    },

    // -- Items --
    ItemSpawned {
        item_type: ItemType,
        position: GridPosition,
        tick: Ticks,
    },
    /// A producer hit the entity cap and dropped its output.
    SpawnRejected {
        item_type: ItemType,
        position: GridPosition,
        tick: Ticks,
    },
    ItemConsumed {
        building: BuildingId,
        item_type: ItemType,
        tick: Ticks,
    },
    ItemProduced {
        building: BuildingId,
        item_type: ItemType,
        tick: Ticks,
    },
    ItemSold {
        item_type: ItemType,
        quantity: u32,
        tick: Ticks,
    },

    // -- Progression --
    ResearchStarted {
        tech: TechId,
        tick: Ticks,
    },
    ResearchCompleted {
        tech: TechId,
        tick: Ticks,
    },
    MissionReady {
        mission: MissionId,
        tick: Ticks,
    },
    MissionCompleted {
        mission: MissionId,
        tick: Ticks,
    },
    RegionExpanded {
        region: Region,
        tick: Ticks,
    },
    UpgradePurchased {
        item_type: ItemType,
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for suppression and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BuildingPlaced,
    BuildingRemoved,
    ItemSpawned,
    SpawnRejected,
    ItemConsumed,
    ItemProduced,
    ItemSold,
    ResearchStarted,
    ResearchCompleted,
    MissionReady,
    MissionCompleted,
    RegionExpanded,
    UpgradePurchased,
}

const EVENT_KIND_COUNT: usize = 13;

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BuildingPlaced { .. } => EventKind::BuildingPlaced,
            Event::BuildingRemoved { .. } => EventKind::BuildingRemoved,
            Event::ItemSpawned { .. } => EventKind::ItemSpawned,
            Event::SpawnRejected { .. } => EventKind::SpawnRejected,
            Event::ItemConsumed { .. } => EventKind::ItemConsumed,
            Event::ItemProduced { .. } => EventKind::ItemProduced,
            Event::ItemSold { .. } => EventKind::ItemSold,
            Event::ResearchStarted { .. } => EventKind::ResearchStarted,
            Event::ResearchCompleted { .. } => EventKind::ResearchCompleted,
            Event::MissionReady { .. } => EventKind::MissionReady,
            Event::MissionCompleted { .. } => EventKind::MissionCompleted,
            Event::RegionExpanded { .. } => EventKind::RegionExpanded,
            Event::UpgradePurchased { .. } => EventKind::UpgradePurchased,
        }
    }

    pub fn tick(&self) -> Ticks {
        match self {
            Event::BuildingPlaced { tick, .. }
            | Event::BuildingRemoved { tick, .. }
            | Event::ItemSpawned { tick, .. }
            | Event::SpawnRejected { tick, .. }
            | Event::ItemConsumed { tick, .. }
            | Event::ItemProduced { tick, .. }
            | Event::ItemSold { tick, .. }
            | Event::ResearchStarted { tick, .. }
            | Event::ResearchCompleted { tick, .. }
            | Event::MissionReady { tick, .. }
            | Event::MissionCompleted { tick, .. }
            | Event::RegionExpanded { tick, .. }
            | Event::UpgradePurchased { tick, .. } => *tick,
        }
    }
}

impl EventKind {
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

/// Buffers events between deliveries and fans them out to listeners.
pub struct EventBus {
    /// Ring storage; `head` is the next write position.
    events: Vec<Option<Event>>,
    head: usize,
    len: usize,
    total_written: u64,
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: Vec<(Option<EventKind>, PassiveListener)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("len", &self.len)
            .field("capacity", &self.events.len())
            .field("suppressed", &self.suppressed)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: Vec::new(),
        }
    }

    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
    }

    pub fn unsuppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = false;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Register a listener for one kind, or for every kind with `None`.
    pub fn on(&mut self, kind: Option<EventKind>, listener: PassiveListener) {
        self.listeners.push((kind, listener));
    }

    /// Record an event unless its kind is suppressed.
    pub fn emit(&mut self, event: Event) {
        if self.is_suppressed(event.kind()) {
            return;
        }
        let capacity = self.events.len();
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
        self.total_written += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Events written since creation, including dropped ones.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Buffered events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        let capacity = self.events.len();
        let start = if self.len < capacity { 0 } else { self.head };
        (0..self.len).filter_map(move |i| self.events[(start + i) % capacity].as_ref())
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        let capacity = self.events.len();
        let start = if self.len < capacity { 0 } else { self.head };
        let out = (0..self.len)
            .filter_map(|i| self.events[(start + i) % capacity].take())
            .collect();
        self.head = 0;
        self.len = 0;
        out
    }

    /// Hand every buffered event to the matching listeners, then clear the
    /// buffer. Returns how many events were delivered.
    pub fn deliver(&mut self) -> usize {
        let events = self.drain();
        for event in &events {
            for (kind, listener) in &mut self.listeners {
                if kind.is_none_or(|k| k == event.kind()) {
                    listener(event);
                }
            }
        }
        events.len()
    }
}
