//! Placed buildings and their per-tick behaviour.
//!
//! A building's mutable state is a tagged variant. Only the variants that
//! own storage carry an [`Inventory`], so "does this building have an
//! inventory" is answered by [`Building::inventory`] rather than by kind.
//!
//! Conveyors, splitters, boxes and sell nodes have no per-tick behaviour;
//! items on them are handled by the world's routing step via
//! [`Building::route`] and [`Building::accept_item`].

use crate::entity::{ItemField, default_speed};
use crate::event::{Event, EventBus};
use crate::fixed::{Fixed64, Ticks};
use crate::grid::{Footprint, Region, TileGrid};
use crate::id::{BuildingId, Direction, GridPosition};
use crate::inventory::Inventory;
use crate::registry::{BuildingDef, BuildingType, ItemType, registry};
use crate::research::ResearchState;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Smelter ports.
pub const SMELTER_INPUT: usize = 0;
pub const SMELTER_FUEL: usize = 1;
pub const SMELTER_OUTPUT: usize = 2;
/// Assembler ports: four inputs, then the output.
pub const ASSEMBLER_INPUTS: Range<usize> = 0..4;
pub const ASSEMBLER_OUTPUT: usize = 4;
/// The lab's single science pack port.
pub const LAB_PORT: usize = 0;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingState {
    Miner {
        /// Ticks spent toward the next extraction.
        timer: Ticks,
    },
    Smelter {
        inventory: Inventory,
        fuel_left: Ticks,
        /// Burn time of the fuel unit currently burning.
        max_fuel_time: Ticks,
        progress: Ticks,
    },
    Assembler {
        inventory: Inventory,
        /// Output item of the selected recipe.
        recipe: Option<ItemType>,
        progress: Ticks,
    },
    Lab {
        inventory: Inventory,
        progress: Ticks,
        /// Consuming a pack this tick.
        active: bool,
    },
    Splitter {
        /// 0 sends the next item to the left of the facing, 1 to the right.
        out_index: u8,
    },
    StorageBox {
        inventory: Inventory,
    },
    /// Conveyors and sell nodes.
    Passive,
}

impl BuildingState {
    fn initial(kind: BuildingType, def: &BuildingDef) -> Self {
        let inventory = || Inventory::new(def.slots);
        match kind {
            BuildingType::Miner | BuildingType::HeavyMiner => BuildingState::Miner { timer: 0 },
            BuildingType::Smelter => BuildingState::Smelter {
                inventory: inventory(),
                fuel_left: 0,
                max_fuel_time: 1,
                progress: 0,
            },
            BuildingType::Assembler => BuildingState::Assembler {
                inventory: inventory(),
                recipe: None,
                progress: 0,
            },
            BuildingType::Lab => BuildingState::Lab {
                inventory: inventory(),
                progress: 0,
                active: false,
            },
            BuildingType::Splitter => BuildingState::Splitter { out_index: 0 },
            BuildingType::StorageBox => BuildingState::StorageBox {
                inventory: inventory(),
            },
            BuildingType::Conveyor | BuildingType::FastConveyor | BuildingType::SellNode => {
                BuildingState::Passive
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingType,
    /// Top-left cell of the footprint.
    pub origin: GridPosition,
    pub direction: Direction,
    pub state: BuildingState,
}

impl Building {
    pub fn new(kind: BuildingType, origin: GridPosition, direction: Direction) -> Self {
        Self {
            kind,
            origin,
            direction,
            state: BuildingState::initial(kind, kind.def()),
        }
    }

    pub fn def(&self) -> &'static BuildingDef {
        self.kind.def()
    }

    pub fn footprint(&self) -> Footprint {
        let def = self.def();
        Footprint::new(def.width, def.height)
    }

    pub fn cells(&self) -> impl Iterator<Item = GridPosition> + use<> {
        self.footprint().tiles(self.origin)
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        match &self.state {
            BuildingState::Smelter { inventory, .. }
            | BuildingState::Assembler { inventory, .. }
            | BuildingState::Lab { inventory, .. }
            | BuildingState::StorageBox { inventory } => Some(inventory),
            _ => None,
        }
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        match &mut self.state {
            BuildingState::Smelter { inventory, .. }
            | BuildingState::Assembler { inventory, .. }
            | BuildingState::Lab { inventory, .. }
            | BuildingState::StorageBox { inventory } => Some(inventory),
            _ => None,
        }
    }

    /// Slots a player quick-transfer may fill.
    pub fn input_ports(&self) -> Option<Range<usize>> {
        match &self.state {
            BuildingState::Smelter { .. } => Some(SMELTER_INPUT..SMELTER_OUTPUT),
            BuildingState::Assembler { .. } => Some(ASSEMBLER_INPUTS),
            BuildingState::Lab { .. } => Some(LAB_PORT..LAB_PORT + 1),
            BuildingState::StorageBox { inventory } => Some(0..inventory.len()),
            _ => None,
        }
    }

    /// Cell that outputs are pushed to.
    ///
    /// 1x1 buildings push to the facing neighbour. 2x2 buildings push to a
    /// fixed cell just outside the footprint on the facing side.
    pub fn output_cell(&self) -> GridPosition {
        let footprint = self.footprint();
        if footprint.width == 2 {
            let offset = match self.direction {
                Direction::Up => (0, -1),
                Direction::Down => (1, 2),
                Direction::Left => (-1, 1),
                Direction::Right => (2, 0),
            };
            self.origin.offset(offset)
        } else {
            self.origin.step(self.direction)
        }
    }

    /// Select an assembler recipe by its output. Resets progress.
    pub(crate) fn set_recipe(&mut self, output: Option<ItemType>) -> bool {
        match &mut self.state {
            BuildingState::Assembler {
                recipe, progress, ..
            } => {
                *recipe = output;
                *progress = 0;
                true
            }
            _ => false,
        }
    }

    // -- Item routing --

    /// Where an at-rest item on `cell` should head next. Splitters advance
    /// their round-robin whether or not the destination takes the item.
    pub(crate) fn route(&mut self, cell: GridPosition) -> GridPosition {
        match (&mut self.state, self.kind) {
            (_, BuildingType::Conveyor | BuildingType::FastConveyor) => cell.step(self.direction),
            (BuildingState::Splitter { out_index }, _) => {
                let side = if *out_index == 0 {
                    self.direction.rotate_ccw()
                } else {
                    self.direction.rotate_cw()
                };
                *out_index = (*out_index + 1) % 2;
                cell.step(side)
            }
            _ => cell,
        }
    }

    /// Movement speed for items leaving this building.
    pub fn item_speed(&self) -> Fixed64 {
        self.def().belt_speed.unwrap_or_else(default_speed)
    }

    /// Offer one unit of `item_type` arriving on this building.
    pub(crate) fn accept_item(&mut self, item_type: ItemType) -> Intake {
        let def = item_type.def();
        match &mut self.state {
            BuildingState::Passive if self.kind == BuildingType::SellNode => Intake::Sold(def.value),
            BuildingState::StorageBox { inventory } => Intake::stored(inventory.add_item(item_type, 1)),
            BuildingState::Smelter { inventory, .. } => {
                let port = if def.fuel_value > 0 {
                    SMELTER_FUEL
                } else {
                    SMELTER_INPUT
                };
                Intake::stored(inventory.add_item_to_slot(port, item_type, 1))
            }
            BuildingState::Assembler {
                inventory,
                recipe: Some(output),
                ..
            } => {
                let wanted = registry()
                    .assembler_recipe(*output)
                    .is_some_and(|r| r.inputs.iter().any(|(ty, _)| *ty == item_type));
                let stored = wanted
                    && ASSEMBLER_INPUTS
                        .into_iter()
                        .any(|i| inventory.add_item_to_slot(i, item_type, 1));
                Intake::stored(stored)
            }
            BuildingState::Lab { inventory, .. } if item_type == registry().science_pack() => {
                Intake::stored(inventory.add_item_to_slot(LAB_PORT, item_type, 1))
            }
            _ => Intake::Rejected,
        }
    }

    // -- Tick --

    /// Advance this building by one tick.
    pub(crate) fn tick(&mut self, id: BuildingId, ctx: &mut TickContext<'_>) {
        let output_cell = self.output_cell();
        let origin = self.origin;
        let def = self.def();
        match &mut self.state {
            BuildingState::Miner { timer } => {
                tick_miner(def, origin, self.direction, timer, ctx);
            }
            BuildingState::Smelter {
                inventory,
                fuel_left,
                max_fuel_time,
                progress,
            } => {
                if let Some(produced) = tick_smelter(inventory, fuel_left, max_fuel_time, progress) {
                    ctx.produced(id, produced);
                }
                push_output(inventory, SMELTER_OUTPUT, output_cell, ctx);
            }
            BuildingState::Assembler {
                inventory,
                recipe,
                progress,
            } => {
                let Some(output) = *recipe else {
                    return;
                };
                if tick_assembler(inventory, output, progress) {
                    ctx.produced(id, output);
                }
                push_output(inventory, ASSEMBLER_OUTPUT, output_cell, ctx);
            }
            BuildingState::Lab {
                inventory,
                progress,
                active,
            } => tick_lab(inventory, progress, active, ctx),
            BuildingState::Splitter { .. } | BuildingState::StorageBox { .. } | BuildingState::Passive => {}
        }
    }
}

/// Outcome of offering an item to a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intake {
    /// Taken into an inventory.
    Stored,
    /// Sold for the given value.
    Sold(u32),
    Rejected,
}

impl Intake {
    fn stored(ok: bool) -> Self {
        if ok { Intake::Stored } else { Intake::Rejected }
    }
}

// ---------------------------------------------------------------------------
// Tick context
// ---------------------------------------------------------------------------

/// The parts of the world a building may touch while ticking.
pub(crate) struct TickContext<'a> {
    pub tiles: &'a TileGrid,
    pub region: Region,
    pub items: &'a mut ItemField,
    pub research: &'a mut ResearchState,
    pub events: &'a mut EventBus,
    pub tick: Ticks,
}

impl TickContext<'_> {
    /// Spawn an item entity at `cell`. Fails outside the unlocked region or
    /// when the entity cap is reached.
    pub fn spawn(&mut self, item_type: ItemType, cell: GridPosition) -> bool {
        if !self.region.contains(cell) {
            return false;
        }
        if !self.items.spawn(item_type, cell) {
            tracing::trace!(?item_type, ?cell, "spawn rejected: entity cap reached");
            self.events.emit(Event::SpawnRejected {
                item_type,
                position: cell,
                tick: self.tick,
            });
            return false;
        }
        self.events.emit(Event::ItemSpawned {
            item_type,
            position: cell,
            tick: self.tick,
        });
        true
    }

    fn produced(&mut self, building: BuildingId, item_type: ItemType) {
        self.events.emit(Event::ItemProduced {
            building,
            item_type,
            tick: self.tick,
        });
    }
}

// ---------------------------------------------------------------------------
// Per-kind ticks
// ---------------------------------------------------------------------------

/// First resource found scanning the footprint grown by the mining radius,
/// row by row.
pub(crate) fn find_resource(def: &BuildingDef, origin: GridPosition, tiles: &TileGrid) -> Option<ItemType> {
    let r = def.mining_radius;
    let (w, h) = (def.width as i32, def.height as i32);
    (-r..h + r)
        .flat_map(|dy| (-r..w + r).map(move |dx| (dx, dy)))
        .find_map(|d| tiles.resource(origin.offset(d)))
}

fn tick_miner(
    def: &BuildingDef,
    origin: GridPosition,
    direction: Direction,
    timer: &mut Ticks,
    ctx: &mut TickContext<'_>,
) {
    let Some(rate) = def.mining_rate else {
        return;
    };
    let Some(resource) = find_resource(def, origin, ctx.tiles) else {
        return;
    };
    *timer += 1;
    if *timer >= rate {
        // The extraction is spent even if the spawn is dropped.
        *timer = 0;
        ctx.spawn(resource, origin.step(direction));
    }
}

/// Returns the produced item, if a unit finished this tick.
fn tick_smelter(
    inventory: &mut Inventory,
    fuel_left: &mut Ticks,
    max_fuel_time: &mut Ticks,
    progress: &mut Ticks,
) -> Option<ItemType> {
    let reg = registry();
    let recipe = inventory
        .slot(SMELTER_INPUT)
        .and_then(|s| reg.smelting(s.item_type));

    if *fuel_left == 0
        && let Some(fuel) = inventory.slot(SMELTER_FUEL).map(|s| s.item_type)
        && let Some(recipe) = recipe
    {
        let burn = fuel.def().fuel_value;
        let output_free = inventory
            .slot(SMELTER_OUTPUT)
            .is_none_or(|s| s.accepts(recipe.output, 1));
        if burn > 0 && output_free {
            *max_fuel_time = burn;
            *fuel_left = burn;
            inventory.remove_from_slot(SMELTER_FUEL, 1);
        }
    }

    if *fuel_left == 0 {
        *progress = 0;
        return None;
    }
    *fuel_left -= 1;

    let Some(recipe) = recipe else {
        *progress = 0;
        return None;
    };
    *progress += 1;
    if *progress < recipe.time {
        return None;
    }
    if inventory.add_item_to_slot(SMELTER_OUTPUT, recipe.output, 1) {
        *progress = 0;
        inventory.remove_from_slot(SMELTER_INPUT, 1);
        Some(recipe.output)
    } else {
        // Output blocked: hold the finished unit until there is room.
        *progress = recipe.time;
        None
    }
}

/// Returns whether a unit finished this tick.
fn tick_assembler(inventory: &mut Inventory, output: ItemType, progress: &mut Ticks) -> bool {
    let Some(recipe) = registry().assembler_recipe(output) else {
        *progress = 0;
        return false;
    };
    if inventory
        .slot(ASSEMBLER_OUTPUT)
        .is_some_and(|s| !s.accepts(output, 1))
    {
        *progress = 0;
        return false;
    }

    let available = |ty: ItemType| -> u32 {
        ASSEMBLER_INPUTS
            .filter_map(|i| inventory.slot(i))
            .filter(|s| s.item_type == ty)
            .map(|s| s.count)
            .sum()
    };
    if !recipe.inputs.iter().all(|&(ty, n)| available(ty) >= n) {
        *progress = 0;
        return false;
    }

    *progress += 1;
    if *progress < recipe.time {
        return false;
    }
    *progress = 0;
    inventory.remove_items(&recipe.inputs);
    inventory.add_item_to_slot(ASSEMBLER_OUTPUT, output, 1)
}

fn tick_lab(inventory: &mut Inventory, progress: &mut Ticks, active: &mut bool, ctx: &mut TickContext<'_>) {
    *active = false;
    if ctx.research.current().is_none() {
        return;
    }
    if ctx.research.is_finished() {
        ctx.research.finish(ctx.events, ctx.tick);
        return;
    }

    let reg = registry();
    if inventory
        .slot(LAB_PORT)
        .is_some_and(|s| s.item_type == reg.science_pack())
    {
        *active = true;
        *progress += 1;
        if *progress >= reg.lab_period() {
            *progress = 0;
            inventory.remove_from_slot(LAB_PORT, 1);
            ctx.research.add_point();
        }
    }
}

/// Push one unit from `slot` onto the floor at `cell`. The unit stays in
/// the slot if the spawn fails.
fn push_output(inventory: &mut Inventory, slot: usize, cell: GridPosition, ctx: &mut TickContext<'_>) {
    let Some(item_type) = inventory.slot(slot).map(|s| s.item_type) else {
        return;
    };
    if ctx.spawn(item_type, cell) {
        inventory.remove_from_slot(slot, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStack;
    use crate::registry::TechId;

    struct Harness {
        tiles: TileGrid,
        region: Region,
        items: ItemField,
        research: ResearchState,
        events: EventBus,
    }

    impl Harness {
        fn new() -> Self {
            let tiles = TileGrid::new(16, 16);
            Self {
                region: tiles.bounds(),
                tiles,
                items: ItemField::new(100, 1),
                research: ResearchState::new(),
                events: EventBus::default(),
            }
        }

        fn tick(&mut self, building: &mut Building, n: u32) {
            let id = BuildingId::default();
            for t in 0..n {
                let mut ctx = TickContext {
                    tiles: &self.tiles,
                    region: self.region,
                    items: &mut self.items,
                    research: &mut self.research,
                    events: &mut self.events,
                    tick: t as Ticks,
                };
                building.tick(id, &mut ctx);
            }
        }
    }

    #[test]
    fn output_cells() {
        let at = |kind, dir| Building::new(kind, GridPosition::new(5, 5), dir).output_cell();
        assert_eq!(at(BuildingType::Smelter, Direction::Left), GridPosition::new(4, 5));
        assert_eq!(at(BuildingType::Assembler, Direction::Up), GridPosition::new(5, 4));
        assert_eq!(at(BuildingType::Assembler, Direction::Down), GridPosition::new(6, 7));
        assert_eq!(at(BuildingType::Assembler, Direction::Left), GridPosition::new(4, 6));
        assert_eq!(at(BuildingType::Assembler, Direction::Right), GridPosition::new(7, 5));
    }

    #[test]
    fn inventory_capability_follows_kind() {
        let at = |kind| Building::new(kind, GridPosition::new(0, 0), Direction::Right);
        assert_eq!(at(BuildingType::StorageBox).inventory().map(Inventory::len), Some(27));
        assert_eq!(at(BuildingType::Smelter).inventory().map(Inventory::len), Some(3));
        assert_eq!(at(BuildingType::Assembler).inventory().map(Inventory::len), Some(5));
        assert_eq!(at(BuildingType::Lab).inventory().map(Inventory::len), Some(1));
        assert!(at(BuildingType::Conveyor).inventory().is_none());
        assert!(at(BuildingType::Miner).inventory().is_none());
    }

    #[test]
    fn miner_spawns_in_front_after_rate() {
        let mut h = Harness::new();
        h.tiles.set_resource(GridPosition::new(4, 4), Some(ItemType::IronOre));
        let mut miner = Building::new(BuildingType::Miner, GridPosition::new(4, 4), Direction::Down);

        h.tick(&mut miner, 59);
        assert!(h.items.is_empty());
        h.tick(&mut miner, 1);
        assert_eq!(h.items.len(), 1);
        let e = &h.items.as_slice()[0];
        assert_eq!(e.item_type, ItemType::IronOre);
        assert_eq!(e.position, GridPosition::new(4, 5));
    }

    #[test]
    fn miner_without_resource_idles() {
        let mut h = Harness::new();
        let mut miner = Building::new(BuildingType::Miner, GridPosition::new(4, 4), Direction::Down);
        h.tick(&mut miner, 200);
        assert!(h.items.is_empty());
        assert_eq!(miner.state, BuildingState::Miner { timer: 0 });
    }

    #[test]
    fn heavy_miner_scans_radius_row_major() {
        let mut h = Harness::new();
        h.tiles.set_resource(GridPosition::new(5, 4), Some(ItemType::CopperOre));
        h.tiles.set_resource(GridPosition::new(3, 5), Some(ItemType::CoalOre));
        let mut miner = Building::new(BuildingType::HeavyMiner, GridPosition::new(4, 5), Direction::Right);
        h.tick(&mut miner, 24);
        assert_eq!(h.items.as_slice()[0].item_type, ItemType::CopperOre);
    }

    #[test]
    fn miner_outside_region_spends_the_extraction() {
        let mut h = Harness::new();
        h.region = Region::new(0, 0, 5, 5);
        h.tiles.set_resource(GridPosition::new(4, 4), Some(ItemType::Wood));
        let mut miner = Building::new(BuildingType::Miner, GridPosition::new(4, 4), Direction::Right);
        h.tick(&mut miner, 60);
        assert!(h.items.is_empty());
        assert_eq!(miner.state, BuildingState::Miner { timer: 0 });
    }

    #[test]
    fn smelter_burns_and_produces() {
        let mut h = Harness::new();
        // Facing out of the region so the ingot stays in the output port.
        h.region = Region::new(0, 0, 5, 5);
        let mut smelter = Building::new(BuildingType::Smelter, GridPosition::new(4, 4), Direction::Right);
        let inv = smelter.inventory_mut().unwrap();
        inv.add_item_to_slot(SMELTER_INPUT, ItemType::IronOre, 1);
        inv.add_item_to_slot(SMELTER_FUEL, ItemType::CoalOre, 1);

        h.tick(&mut smelter, 59);
        assert!(smelter.inventory().unwrap().slot(SMELTER_OUTPUT).is_none());
        h.tick(&mut smelter, 1);
        let inv = smelter.inventory().unwrap();
        assert_eq!(inv.slot(SMELTER_OUTPUT), Some(&ItemStack::new(ItemType::IronIngot, 1)));
        assert!(inv.slot(SMELTER_INPUT).is_none());
        assert!(inv.slot(SMELTER_FUEL).is_none());
        match smelter.state {
            BuildingState::Smelter { fuel_left, .. } => assert_eq!(fuel_left, 240),
            _ => unreachable!(),
        }
    }

    #[test]
    fn smelter_without_ore_keeps_fuel() {
        let mut h = Harness::new();
        let mut smelter = Building::new(BuildingType::Smelter, GridPosition::new(4, 4), Direction::Right);
        smelter
            .inventory_mut()
            .unwrap()
            .add_item_to_slot(SMELTER_FUEL, ItemType::Wood, 3);
        h.tick(&mut smelter, 10);
        assert_eq!(smelter.inventory().unwrap().count_items(ItemType::Wood), 3);
    }

    #[test]
    fn smelter_pushes_output_in_front() {
        let mut h = Harness::new();
        let mut smelter = Building::new(BuildingType::Smelter, GridPosition::new(4, 4), Direction::Up);
        smelter.inventory_mut().unwrap().add_item_to_slot(SMELTER_OUTPUT, ItemType::CopperIngot, 2);
        h.tick(&mut smelter, 1);
        assert_eq!(h.items.len(), 1);
        assert_eq!(h.items.as_slice()[0].position, GridPosition::new(4, 3));
        assert_eq!(smelter.inventory().unwrap().count_items(ItemType::CopperIngot), 1);
    }

    #[test]
    fn assembler_gated_on_full_requirements() {
        let mut h = Harness::new();
        let mut asm = Building::new(BuildingType::Assembler, GridPosition::new(4, 4), Direction::Right);
        asm.set_recipe(Some(ItemType::IronGear));
        asm.inventory_mut().unwrap().add_item_to_slot(0, ItemType::IronIngot, 1);
        h.tick(&mut asm, 100);
        match &asm.state {
            BuildingState::Assembler { progress, .. } => assert_eq!(*progress, 0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn assembler_consumes_exact_inputs() {
        let mut h = Harness::new();
        h.region = Region::new(0, 0, 6, 6);
        let mut asm = Building::new(BuildingType::Assembler, GridPosition::new(4, 4), Direction::Right);
        asm.set_recipe(Some(ItemType::IronGear));
        asm.inventory_mut().unwrap().add_item_to_slot(0, ItemType::IronIngot, 5);
        h.tick(&mut asm, 30);
        let inv = asm.inventory().unwrap();
        assert_eq!(inv.count_items(ItemType::IronIngot), 3);
        assert_eq!(inv.slot(ASSEMBLER_OUTPUT), Some(&ItemStack::new(ItemType::IronGear, 1)));
    }

    #[test]
    fn assembler_blocked_output_resets_progress() {
        let mut h = Harness::new();
        let mut asm = Building::new(BuildingType::Assembler, GridPosition::new(4, 4), Direction::Right);
        asm.set_recipe(Some(ItemType::IronGear));
        let inv = asm.inventory_mut().unwrap();
        inv.add_item_to_slot(0, ItemType::IronIngot, 2);
        inv.add_item_to_slot(ASSEMBLER_OUTPUT, ItemType::Circuit, 1);
        h.region = Region::new(0, 0, 6, 6);
        h.tick(&mut asm, 40);
        match &asm.state {
            BuildingState::Assembler { progress, .. } => assert_eq!(*progress, 0),
            _ => unreachable!(),
        }
        assert_eq!(asm.inventory().unwrap().count_items(ItemType::IronIngot), 2);
    }

    #[test]
    fn assembler_accepts_only_recipe_inputs() {
        let mut asm = Building::new(BuildingType::Assembler, GridPosition::new(0, 0), Direction::Right);
        assert_eq!(asm.accept_item(ItemType::IronIngot), Intake::Rejected);
        asm.set_recipe(Some(ItemType::Circuit));
        assert_eq!(asm.accept_item(ItemType::CopperWire), Intake::Stored);
        assert_eq!(asm.accept_item(ItemType::Wood), Intake::Rejected);
    }

    #[test]
    fn smelter_routes_fuel_and_ore_to_ports() {
        let mut smelter = Building::new(BuildingType::Smelter, GridPosition::new(0, 0), Direction::Right);
        assert_eq!(smelter.accept_item(ItemType::CoalOre), Intake::Stored);
        assert_eq!(smelter.accept_item(ItemType::CopperOre), Intake::Stored);
        assert_eq!(smelter.accept_item(ItemType::IronOre), Intake::Rejected);
        let inv = smelter.inventory().unwrap();
        assert_eq!(inv.slot(SMELTER_FUEL).unwrap().item_type, ItemType::CoalOre);
        assert_eq!(inv.slot(SMELTER_INPUT).unwrap().item_type, ItemType::CopperOre);
    }

    #[test]
    fn sell_node_prices_items() {
        let mut node = Building::new(BuildingType::SellNode, GridPosition::new(0, 0), Direction::Right);
        assert_eq!(node.accept_item(ItemType::Circuit), Intake::Sold(100));
        let mut belt = Building::new(BuildingType::Conveyor, GridPosition::new(0, 0), Direction::Right);
        assert_eq!(belt.accept_item(ItemType::Circuit), Intake::Rejected);
    }

    #[test]
    fn splitter_alternates_sides() {
        let mut splitter = Building::new(BuildingType::Splitter, GridPosition::new(5, 5), Direction::Right);
        let cell = GridPosition::new(5, 5);
        assert_eq!(splitter.route(cell), GridPosition::new(5, 4));
        assert_eq!(splitter.route(cell), GridPosition::new(5, 6));
        assert_eq!(splitter.route(cell), GridPosition::new(5, 4));
    }

    #[test]
    fn conveyor_speeds() {
        let belt = Building::new(BuildingType::Conveyor, GridPosition::new(0, 0), Direction::Up);
        let fast = Building::new(BuildingType::FastConveyor, GridPosition::new(0, 0), Direction::Up);
        assert!(fast.item_speed() > belt.item_speed());
        let boxed = Building::new(BuildingType::StorageBox, GridPosition::new(0, 0), Direction::Up);
        assert_eq!(boxed.item_speed(), default_speed());
    }

    #[test]
    fn lab_idle_without_research() {
        let mut h = Harness::new();
        let mut lab = Building::new(BuildingType::Lab, GridPosition::new(2, 2), Direction::Right);
        lab.inventory_mut().unwrap().add_item_to_slot(LAB_PORT, ItemType::SciencePack, 2);
        h.tick(&mut lab, 120);
        assert_eq!(lab.inventory().unwrap().count_items(ItemType::SciencePack), 2);
        assert!(matches!(lab.state, BuildingState::Lab { active: false, .. }));
    }

    #[test]
    fn lab_consumes_pack_per_period() {
        let mut h = Harness::new();
        h.research.start(TechId::Logistics).unwrap();
        let mut lab = Building::new(BuildingType::Lab, GridPosition::new(2, 2), Direction::Right);
        lab.inventory_mut().unwrap().add_item_to_slot(LAB_PORT, ItemType::SciencePack, 2);
        h.tick(&mut lab, 60);
        assert_eq!(h.research.progress(), 1);
        assert_eq!(lab.inventory().unwrap().count_items(ItemType::SciencePack), 1);
        assert!(matches!(lab.state, BuildingState::Lab { active: true, .. }));
    }
}
