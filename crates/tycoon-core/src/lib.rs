//! Tycoon Core -- the simulation engine for a tile-grid factory game.
//!
//! The crate owns every piece of game state that has rules: the resource
//! grid, placed buildings and their state machines, item entities moving
//! between cells, inventories, research, missions and money. Rendering and
//! input live elsewhere; they call the action API on [`world::World`],
//! drive [`world::World::tick`] (or [`world::World::advance`]) at a fixed
//! rate, and read state back through [`query`] snapshots and drained
//! [`event::Event`]s.
//!
//! # Five-Stage Tick Pipeline
//!
//! Each call to [`world::World::tick`] runs:
//!
//! 1. **Missions** -- pending missions the player can now satisfy turn ready.
//! 2. **Income** -- purchased upgrades pay `per_sec / tick_rate`.
//! 3. **Buildings** -- every building ticks once: miners extract, smelters
//!    burn and smelt, assemblers craft, labs consume science packs.
//! 4. **Routing** -- each resting item asks the building under it for a
//!    target cell and is offered to it (sell, store, feed a port).
//! 5. **Movement** -- items still on the ground advance along their hop.
//!
//! # Key Types
//!
//! - [`world::World`] -- owner of all state and the action API.
//! - [`building::Building`] -- a placed building with its per-kind state.
//! - [`entity::ItemEntity`] -- one unit of an item moving on the grid.
//! - [`inventory::Inventory`] -- fixed-size slot storage, 64 per stack.
//! - [`registry::Registry`] -- immutable game tables (frozen at startup).
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`event::EventBus`] -- buffered event log with per-kind suppression.

pub mod building;
pub mod config;
pub mod cursor;
pub mod entity;
pub mod error;
pub mod event;
pub mod fixed;
pub mod grid;
pub mod id;
pub mod inventory;
pub mod item;
pub mod mapgen;
pub mod mission;
pub mod query;
pub mod registry;
pub mod research;
pub mod rng;
pub mod shop;
pub mod sim;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
