//! Read-only snapshots for rendering and UI.
//!
//! All types are owned copies; nothing here borrows world storage, so a
//! renderer can hold them across ticks.

use crate::building::{Building, BuildingState, LAB_PORT, SMELTER_INPUT, find_resource};
use crate::fixed::{Fixed64, ratio};
use crate::id::{BuildingId, Direction, GridPosition};
use crate::item::ItemStack;
use crate::mission::MissionStatus;
use crate::registry::{BuildingType, ItemType, MissionId, TechId, registry};
use crate::world::World;

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// What a smelter is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmelterPhase {
    /// No fuel burning.
    Idle,
    /// Fuel burning but nothing smelting.
    Burning,
    Working,
}

/// Per-kind inspection state. Fractions are in `0..=1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildingStatus {
    Miner {
        /// Resource under the drill, if any.
        resource: Option<ItemType>,
        progress: Fixed64,
    },
    Smelter {
        phase: SmelterPhase,
        fuel: Fixed64,
        progress: Fixed64,
    },
    Assembler {
        recipe: Option<ItemType>,
        progress: Fixed64,
    },
    StorageBox {
        occupied: usize,
        capacity: usize,
    },
    Lab {
        packs: u32,
        active: bool,
    },
    Splitter {
        next: Direction,
    },
    Passive,
}

#[derive(Debug, Clone)]
pub struct BuildingSnapshot {
    pub id: BuildingId,
    pub kind: BuildingType,
    pub name: &'static str,
    pub origin: GridPosition,
    pub direction: Direction,
    pub width: u32,
    pub height: u32,
    pub status: BuildingStatus,
    /// Slot contents, empty slots included. Empty for buildings without an
    /// inventory.
    pub slots: Vec<Option<ItemStack>>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One item entity as drawn: interpolated cell-space position plus jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub item_type: ItemType,
    pub x: Fixed64,
    pub y: Fixed64,
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MissionSnapshot {
    pub id: MissionId,
    pub name: &'static str,
    pub description: &'static str,
    pub status: MissionStatus,
    /// Per requirement: item, held by the player (capped at required), required.
    pub requirements: Vec<(ItemType, u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct TechSnapshot {
    pub id: TechId,
    pub name: &'static str,
    pub cost: u32,
    pub unlocked: bool,
    pub researching: bool,
    /// Packs consumed so far; zero unless researching.
    pub progress: u32,
    /// Prerequisite satisfied (or none).
    pub available: bool,
}

// ---------------------------------------------------------------------------
// World queries
// ---------------------------------------------------------------------------

impl World {
    pub fn snapshot_building(&self, id: BuildingId) -> Option<BuildingSnapshot> {
        let building = self.buildings.get(id)?;
        let def = building.def();
        Some(BuildingSnapshot {
            id,
            kind: building.kind,
            name: def.name,
            origin: building.origin,
            direction: building.direction,
            width: def.width,
            height: def.height,
            status: self.building_status(building),
            slots: building
                .inventory()
                .map(|inv| inv.slots().to_vec())
                .unwrap_or_default(),
        })
    }

    pub fn snapshot_all_buildings(&self) -> Vec<BuildingSnapshot> {
        self.buildings
            .keys()
            .filter_map(|id| self.snapshot_building(id))
            .collect()
    }

    fn building_status(&self, building: &Building) -> BuildingStatus {
        let def = building.def();
        match &building.state {
            BuildingState::Miner { timer } => BuildingStatus::Miner {
                resource: find_resource(def, building.origin, &self.tiles),
                progress: ratio(*timer, def.mining_rate.unwrap_or(0)),
            },
            BuildingState::Smelter {
                fuel_left,
                max_fuel_time,
                progress,
                ..
            } => {
                let phase = match (*fuel_left, *progress) {
                    (0, _) => SmelterPhase::Idle,
                    (_, 0) => SmelterPhase::Burning,
                    _ => SmelterPhase::Working,
                };
                let time = building
                    .inventory()
                    .and_then(|inv| inv.slot(SMELTER_INPUT))
                    .and_then(|s| registry().smelting(s.item_type))
                    .map_or(0, |r| r.time);
                BuildingStatus::Smelter {
                    phase,
                    fuel: ratio(*fuel_left, *max_fuel_time),
                    progress: ratio(*progress, time).min(Fixed64::ONE),
                }
            }
            BuildingState::Assembler {
                recipe, progress, ..
            } => BuildingStatus::Assembler {
                recipe: *recipe,
                progress: recipe
                    .and_then(|r| registry().assembler_recipe(r))
                    .map_or(Fixed64::ZERO, |r| ratio(*progress, r.time)),
            },
            BuildingState::StorageBox { inventory } => BuildingStatus::StorageBox {
                occupied: inventory.occupied(),
                capacity: inventory.len(),
            },
            BuildingState::Lab {
                inventory, active, ..
            } => BuildingStatus::Lab {
                packs: inventory.slot(LAB_PORT).map_or(0, |s| s.count),
                active: *active,
            },
            BuildingState::Splitter { out_index } => BuildingStatus::Splitter {
                next: if *out_index == 0 {
                    building.direction.rotate_ccw()
                } else {
                    building.direction.rotate_cw()
                },
            },
            BuildingState::Passive => BuildingStatus::Passive,
        }
    }

    pub fn snapshot_items(&self) -> Vec<ItemSnapshot> {
        self.items
            .iter()
            .map(|e| {
                let (x, y) = e.render_position();
                ItemSnapshot {
                    item_type: e.item_type,
                    x,
                    y,
                }
            })
            .collect()
    }

    /// Available missions in display order.
    pub fn snapshot_missions(&self) -> Vec<MissionSnapshot> {
        self.missions
            .available()
            .iter()
            .filter_map(|&id| {
                let status = self.missions.status(id)?;
                let def = registry().mission(id);
                Some(MissionSnapshot {
                    id,
                    name: def.name,
                    description: def.description,
                    status,
                    requirements: def
                        .requirements
                        .iter()
                        .map(|&(ty, n)| (ty, self.player.count_items(ty).min(n), n))
                        .collect(),
                })
            })
            .collect()
    }

    pub fn snapshot_techs(&self) -> Vec<TechSnapshot> {
        registry()
            .techs()
            .iter()
            .map(|t| {
                let researching = self.research.current() == Some(t.id);
                TechSnapshot {
                    id: t.id,
                    name: t.name,
                    cost: t.cost,
                    unlocked: self.research.is_unlocked(t.id),
                    researching,
                    progress: if researching { self.research.progress() } else { 0 },
                    available: t
                        .prerequisite
                        .is_none_or(|p| self.research.is_unlocked(p)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::SMELTER_FUEL;
    use crate::test_utils::*;

    #[test]
    fn miner_status_reports_progress() {
        let mut world = empty_world();
        let (x, y) = region_origin(&world);
        world.set_tile_resource(x, y, Some(ItemType::IronOre)).unwrap();
        let id = world
            .place_building(BuildingType::Miner, x, y, Direction::Right)
            .unwrap();
        run(&mut world, 30);
        let snap = world.snapshot_building(id).unwrap();
        assert_eq!(
            snap.status,
            BuildingStatus::Miner {
                resource: Some(ItemType::IronOre),
                progress: Fixed64::from_num(0.5),
            }
        );
        assert!(snap.slots.is_empty());
    }

    #[test]
    fn snapshot_all_covers_every_building() {
        let mut world = empty_world();
        let (x, y) = region_origin(&world);
        let belt = world
            .place_building(BuildingType::Conveyor, x, y, Direction::Right)
            .unwrap();
        let lab = world
            .place_building(BuildingType::Lab, x + 1, y, Direction::Right)
            .unwrap();
        world
            .place_building(BuildingType::StorageBox, x, y + 2, Direction::Right)
            .unwrap();
        world.remove_building(x, y + 2).unwrap();

        let snaps = world.snapshot_all_buildings();
        assert_eq!(snaps.len(), world.building_count());
        assert_eq!(snaps.len(), 2);
        let lab_snap = snaps.iter().find(|s| s.id == lab).unwrap();
        assert_eq!((lab_snap.kind, lab_snap.width, lab_snap.height), (BuildingType::Lab, 2, 2));
        assert_eq!(lab_snap.slots.len(), 1);
        assert!(snaps.iter().any(|s| s.id == belt && s.origin == GridPosition::new(x, y)));
    }

    #[test]
    fn smelter_phases() {
        let mut world = empty_world();
        let (x, y) = region_origin(&world);
        let id = world
            .place_building(BuildingType::Smelter, x, y, Direction::Right)
            .unwrap();
        let phase = |w: &World| match w.snapshot_building(id).unwrap().status {
            BuildingStatus::Smelter { phase, .. } => phase,
            other => panic!("unexpected status {other:?}"),
        };
        assert_eq!(phase(&world), SmelterPhase::Idle);

        let inv = world.building_mut(id).and_then(|b| b.inventory_mut()).unwrap();
        inv.add_item_to_slot(SMELTER_INPUT, ItemType::IronOre, 2);
        inv.add_item_to_slot(SMELTER_FUEL, ItemType::CoalOre, 1);
        world.tick();
        assert_eq!(phase(&world), SmelterPhase::Working);
    }

    #[test]
    fn mission_snapshot_caps_held_counts() {
        let world = world_with(&[(ItemType::Wood, 40)]);
        let missions = world.snapshot_missions();
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].requirements[0], (ItemType::Wood, 10, 10));
        assert_eq!(missions[0].requirements[1], (ItemType::IronOre, 0, 5));
    }

    #[test]
    fn tech_snapshot_marks_availability() {
        let mut world = empty_world();
        world.start_research(TechId::Logistics).unwrap();
        let techs = world.snapshot_techs();
        assert!(techs[0].researching && techs[0].available);
        assert!(!techs[1].available);
    }

    #[test]
    fn item_snapshot_stays_near_cell() {
        let mut world = empty_world();
        let (x, y) = region_origin(&world);
        spawn(&mut world, ItemType::Wood, x, y);
        let snap = world.snapshot_items()[0];
        assert!((snap.x - Fixed64::from_num(x)).abs() <= Fixed64::from_num(0.125));
        assert!((snap.y - Fixed64::from_num(y)).abs() <= Fixed64::from_num(0.125));
    }
}
