//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::WorldConfig;
use crate::fixed::Fixed64;
use crate::id::{BuildingId, Direction, GridPosition};
use crate::item::{ItemStack, MAX_STACK};
use crate::registry::{BuildingType, ItemType};
use crate::world::World;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// World builders
// ===========================================================================

/// Default config with an empty resource map.
pub fn test_config() -> WorldConfig {
    WorldConfig {
        generate_resources: false,
        ..WorldConfig::default()
    }
}

/// Default starting inventory (1 miner, 10 conveyors), no resources.
pub fn empty_world() -> World {
    build(test_config())
}

/// Starting inventory replaced by `items`, no resources.
pub fn world_with(items: &[(ItemType, u32)]) -> World {
    build(WorldConfig {
        starting_items: items.to_vec(),
        ..test_config()
    })
}

/// Like [`world_with`] with a custom entity cap.
pub fn world_with_cap(items: &[(ItemType, u32)], max_items: usize) -> World {
    build(WorldConfig {
        starting_items: items.to_vec(),
        max_items,
        ..test_config()
    })
}

pub fn build(config: WorldConfig) -> World {
    World::new(config).expect("test config is valid")
}

// ===========================================================================
// Region helpers
// ===========================================================================

/// Top-left cell of the unlocked region.
pub fn region_origin(world: &World) -> (i32, i32) {
    let r = world.region();
    (r.min_x, r.min_y)
}

/// Bottom-right cell of the unlocked region (inclusive).
pub fn region_corner(world: &World) -> (i32, i32) {
    let r = world.region();
    (r.max_x - 1, r.max_y - 1)
}

// ===========================================================================
// Placement and items
// ===========================================================================

pub fn place(world: &mut World, kind: BuildingType, x: i32, y: i32, dir: Direction) -> BuildingId {
    world
        .place_building(kind, x, y, dir)
        .unwrap_or_else(|e| panic!("placing {kind:?} at ({x}, {y}): {e}"))
}

/// A straight belt of `len` conveyors starting at `(x, y)`.
pub fn belt_line(world: &mut World, x: i32, y: i32, dir: Direction, len: i32) -> Vec<BuildingId> {
    let (dx, dy) = dir.offset();
    (0..len)
        .map(|i| place(world, BuildingType::Conveyor, x + dx * i, y + dy * i, dir))
        .collect()
}

pub fn spawn(world: &mut World, item_type: ItemType, x: i32, y: i32) -> bool {
    world.items.spawn(item_type, GridPosition::new(x, y))
}

/// Put `count` units directly into one slot of a building's inventory.
pub fn stock(world: &mut World, id: BuildingId, slot: usize, item_type: ItemType, count: u32) -> bool {
    world
        .building_mut(id)
        .and_then(|b| b.inventory_mut())
        .is_some_and(|inv| inv.add_item_to_slot(slot, item_type, count))
}

pub fn building_count(world: &World, id: BuildingId, item_type: ItemType) -> u32 {
    world
        .building(id)
        .and_then(|b| b.inventory())
        .map_or(0, |inv| inv.count_items(item_type))
}

pub fn give(world: &mut World, item_type: ItemType, count: u32) {
    assert!(world.player_inventory_mut().add_item(item_type, count));
}

/// First player slot holding `item_type`.
pub fn player_slot_of(world: &World, item_type: ItemType) -> usize {
    world
        .player_inventory()
        .slots()
        .iter()
        .position(|s| s.as_ref().is_some_and(|s| s.item_type == item_type))
        .unwrap_or_else(|| panic!("player holds no {item_type:?}"))
}

/// Fill every player slot with a full stack of `item_type`.
pub fn fill_player(world: &mut World, item_type: ItemType) {
    let inv = world.player_inventory_mut();
    for i in 0..inv.len() {
        inv.replace_slot(i, Some(ItemStack::new(item_type, MAX_STACK)));
    }
}

// ===========================================================================
// Running
// ===========================================================================

pub fn run(world: &mut World, ticks: u32) {
    for _ in 0..ticks {
        world.tick();
    }
}

/// Units of `item_type` held by the player, in building inventories, on the
/// cursor and in flight.
pub fn total_items(world: &World, item_type: ItemType) -> u64 {
    let player = u64::from(world.player_inventory().count_items(item_type));
    let buildings: u64 = world
        .buildings()
        .filter_map(|(_, b)| b.inventory())
        .map(|inv| u64::from(inv.count_items(item_type)))
        .sum();
    let held = world
        .held_stack()
        .filter(|s| s.item_type == item_type)
        .map_or(0, |s| u64::from(s.count));
    let flying = world.items().iter().filter(|e| e.item_type == item_type).count() as u64;
    player + buildings + held + flying
}
