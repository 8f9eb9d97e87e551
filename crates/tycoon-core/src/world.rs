//! The simulation world and its per-tick pipeline.
//!
//! # Tick order
//!
//! 1. **Missions** -- promote missions the player inventory now satisfies.
//! 2. **Income** -- accrue purchased passive income (`per_sec / tick_rate`).
//! 3. **Buildings** -- tick every building exactly once, by arena id.
//! 4. **Routing** -- every at-rest item picks a target from the building
//!    under it and is offered to that building for consumption.
//! 5. **Movement** -- every item not consumed advances along its hop.
//!
//! Player actions (placement, research, missions, shop, cursor) run between
//! ticks and either fully apply or return an [`ActionError`].

use crate::building::{Building, Intake, TickContext};
use crate::config::WorldConfig;
use crate::entity::{ItemEntity, ItemField, default_speed};
use crate::error::{ActionError, ConfigError};
use crate::event::{Event, EventBus};
use crate::fixed::{Fixed64, Ticks, ratio};
use crate::grid::{Footprint, PlacementIndex, Region, TileGrid};
use crate::id::{BuildingId, Direction, GridPosition};
use crate::inventory::Inventory;
use crate::item::ItemStack;
use crate::mapgen;
use crate::mission::MissionBook;
use crate::registry::{BuildingType, ItemType, MissionId, TechId, registry, validate_standard};
use crate::research::ResearchState;
use crate::sim::{AdvanceResult, SimState, StateHash, step_duration};
use slotmap::SlotMap;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

/// Salt separating the cosmetic jitter stream from map generation.
const JITTER_SALT: u64 = 0x6A09_E667_F3BC_C908;

#[derive(Debug)]
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) tiles: TileGrid,
    pub(crate) region: Region,
    pub(crate) buildings: SlotMap<BuildingId, Building>,
    pub(crate) placement: PlacementIndex,
    pub(crate) items: ItemField,
    pub(crate) player: Inventory,
    /// Stack on the player's cursor, outside any inventory.
    pub(crate) held: Option<ItemStack>,
    pub(crate) money: Fixed64,
    pub(crate) passive_income_per_sec: u32,
    pub(crate) purchased_upgrades: BTreeSet<ItemType>,
    pub(crate) missions: MissionBook,
    pub(crate) research: ResearchState,
    pub(crate) sim: SimState,
    pub(crate) events: EventBus,
}

impl World {
    /// Build a world from `config`: resource map, centred starting region,
    /// starting money and items.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_standard().map_err(ConfigError::Registry)?;

        let mut tiles = TileGrid::new(config.grid_width, config.grid_height);
        let region = Region::centered(config.grid_width, config.grid_height, config.start_size);
        if config.generate_resources {
            mapgen::generate(&mut tiles, region, config.seed);
        }

        let mut player = Inventory::player();
        for &(item, count) in &config.starting_items {
            if !player.add_item(item, count) {
                return Err(ConfigError::Invalid(format!(
                    "starting items do not fit: {item:?} x{count}"
                )));
            }
        }

        info!(
            width = config.grid_width,
            height = config.grid_height,
            seed = config.seed,
            "world created"
        );

        Ok(Self {
            tiles,
            region,
            buildings: SlotMap::with_key(),
            placement: PlacementIndex::new(),
            items: ItemField::new(config.max_items, config.seed ^ JITTER_SALT),
            player,
            held: None,
            money: Fixed64::saturating_from_num(config.starting_money),
            passive_income_per_sec: 0,
            purchased_upgrades: BTreeSet::new(),
            missions: MissionBook::new(),
            research: ResearchState::new(),
            sim: SimState::new(),
            events: EventBus::default(),
            config,
        })
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid_width(&self) -> u32 {
        self.tiles.width()
    }

    pub fn grid_height(&self) -> u32 {
        self.tiles.height()
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    /// The unlocked region.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn money(&self) -> Fixed64 {
        self.money
    }

    pub fn passive_income_per_sec(&self) -> u32 {
        self.passive_income_per_sec
    }

    pub fn purchased_upgrades(&self) -> &BTreeSet<ItemType> {
        &self.purchased_upgrades
    }

    pub fn player_inventory(&self) -> &Inventory {
        &self.player
    }

    /// Direct access for the transfer primitives of [`Inventory`].
    pub fn player_inventory_mut(&mut self) -> &mut Inventory {
        &mut self.player
    }

    pub fn items(&self) -> &ItemField {
        &self.items
    }

    pub fn missions(&self) -> &MissionBook {
        &self.missions
    }

    pub fn research(&self) -> &ResearchState {
        &self.research
    }

    pub fn tick_count(&self) -> Ticks {
        self.sim.tick
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id)
    }

    /// Every building once, in arena order.
    pub fn buildings(&self) -> impl Iterator<Item = (BuildingId, &Building)> {
        self.buildings.iter()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    // -----------------------------------------------------------------------
    // Tiles
    // -----------------------------------------------------------------------

    pub fn get_tile_resource(&self, x: i32, y: i32) -> Option<ItemType> {
        self.tiles.resource(GridPosition::new(x, y))
    }

    pub fn set_tile_resource(
        &mut self,
        x: i32,
        y: i32,
        resource: Option<ItemType>,
    ) -> Result<(), ActionError> {
        if resource.is_some_and(|r| !r.def().is_raw) {
            return Err(ActionError::NotRawResource);
        }
        if self.tiles.set_resource(GridPosition::new(x, y), resource) {
            Ok(())
        } else {
            Err(ActionError::OutOfBounds)
        }
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Whether a `width x height` footprint at `(x, y)` lies inside the
    /// unlocked region and overlaps nothing.
    pub fn can_place_building(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        self.check_footprint(Footprint::new(width, height), GridPosition::new(x, y))
            .is_ok()
    }

    fn check_footprint(&self, footprint: Footprint, origin: GridPosition) -> Result<(), ActionError> {
        for cell in footprint.tiles(origin) {
            if !self.tiles.in_bounds(cell) {
                return Err(ActionError::OutOfBounds);
            }
            if !self.region.contains(cell) {
                return Err(ActionError::Locked);
            }
            if self.placement.is_occupied(cell) {
                return Err(ActionError::Occupied);
            }
        }
        Ok(())
    }

    /// Place a building with its top-left corner at `(x, y)`. Does not touch
    /// the player inventory; see [`World::place_from_slot`].
    pub fn place_building(
        &mut self,
        kind: BuildingType,
        x: i32,
        y: i32,
        direction: Direction,
    ) -> Result<BuildingId, ActionError> {
        let building = Building::new(kind, GridPosition::new(x, y), direction);
        let footprint = building.footprint();
        let origin = building.origin;
        self.check_footprint(footprint, origin).inspect_err(|err| {
            debug!(?kind, x, y, %err, "placement rejected");
        })?;

        let id = self.buildings.insert(building);
        self.placement.insert(footprint, origin, id);
        debug!(?kind, x, y, ?direction, "building placed");
        self.events.emit(Event::BuildingPlaced {
            building: id,
            kind,
            origin,
            tick: self.sim.tick,
        });
        Ok(id)
    }

    /// Place the building item held in player slot `slot`, consuming one.
    pub fn place_from_slot(
        &mut self,
        slot: usize,
        x: i32,
        y: i32,
        direction: Direction,
    ) -> Result<BuildingId, ActionError> {
        let item = self
            .player
            .slot(slot)
            .map(|s| s.item_type)
            .ok_or(ActionError::MissingItems)?;
        let kind = registry()
            .building_for_item(item)
            .ok_or(ActionError::NotPlaceable)?;
        let def = kind.def();
        self.check_footprint(Footprint::new(def.width, def.height), GridPosition::new(x, y))?;

        self.player.remove_from_slot(slot, 1);
        self.place_building(kind, x, y, direction)
    }

    /// Remove the building covering `(x, y)`, refunding its item and
    /// inventory to the player. Rejected without change if the refund does
    /// not fit.
    pub fn remove_building(&mut self, x: i32, y: i32) -> Result<BuildingType, ActionError> {
        let cell = GridPosition::new(x, y);
        let id = self.placement.get(cell).ok_or(ActionError::NoBuilding)?;
        if !self.region.contains(cell) {
            return Err(ActionError::Locked);
        }
        let building = self.buildings.get(id).ok_or(ActionError::NoBuilding)?;

        let mut refund = self.player.clone();
        let mut fits = refund.add_item(building.def().item, 1);
        if let Some(inventory) = building.inventory() {
            for stack in inventory.slots().iter().flatten() {
                fits &= refund.add_item(stack.item_type, stack.count);
            }
        }
        if !fits {
            debug!(x, y, "removal rejected: refund does not fit");
            return Err(ActionError::InventoryFull);
        }
        self.player = refund;

        let building = self.buildings.remove(id).ok_or(ActionError::NoBuilding)?;
        self.placement.remove(building.footprint(), building.origin);
        debug!(kind = ?building.kind, x, y, "building removed");
        self.events.emit(Event::BuildingRemoved {
            building: id,
            kind: building.kind,
            origin: building.origin,
            tick: self.sim.tick,
        });
        Ok(building.kind)
    }

    pub fn get_building_at(&self, x: i32, y: i32) -> Option<&Building> {
        self.building_id_at(x, y).and_then(|id| self.buildings.get(id))
    }

    pub fn building_id_at(&self, x: i32, y: i32) -> Option<BuildingId> {
        self.placement.get(GridPosition::new(x, y))
    }

    pub(crate) fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(id)
    }

    /// Choose the assembler recipe by output item, or clear it with `None`.
    pub fn set_recipe(&mut self, id: BuildingId, recipe: Option<ItemType>) -> Result<(), ActionError> {
        if let Some(output) = recipe
            && registry().assembler_recipe(output).is_none()
        {
            return Err(ActionError::InvalidRecipe);
        }
        let building = self.buildings.get_mut(id).ok_or(ActionError::NoBuilding)?;
        if building.set_recipe(recipe) {
            Ok(())
        } else {
            Err(ActionError::NoRecipeSlot)
        }
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// Add an item entity at rest on its position. `false` when the position
    /// is outside the unlocked region or the entity cap is reached.
    ///
    /// Any in-transit state on `entity` is discarded; only its type,
    /// position and jitter are kept.
    pub fn add_item(&mut self, entity: ItemEntity) -> bool {
        if !self.region.contains(entity.position) {
            debug!(position = ?entity.position, "item rejected outside unlocked region");
            return false;
        }
        self.items.insert(ItemEntity {
            jitter: entity.jitter,
            ..ItemEntity::new(entity.item_type, entity.position)
        })
    }

    // -----------------------------------------------------------------------
    // Research and missions
    // -----------------------------------------------------------------------

    /// Make `tech` the active research. Prerequisites are the caller's
    /// concern; [`World::request_research`] checks them.
    pub fn start_research(&mut self, tech: TechId) -> Result<(), ActionError> {
        self.research.start(tech)?;
        info!(?tech, "research started");
        self.events.emit(Event::ResearchStarted {
            tech,
            tick: self.sim.tick,
        });
        Ok(())
    }

    /// Start `tech` if its prerequisite is unlocked.
    pub fn request_research(&mut self, tech: TechId) -> Result<(), ActionError> {
        if let Some(required) = registry().tech(tech).prerequisite
            && !self.research.is_unlocked(required)
        {
            debug!(?tech, ?required, "research rejected: prerequisite missing");
            return Err(ActionError::PrerequisiteMissing);
        }
        self.start_research(tech)
    }

    /// Unlock the active research immediately.
    pub fn complete_research(&mut self) -> Option<TechId> {
        self.research.finish(&mut self.events, self.sim.tick)
    }

    /// Hand in a ready mission and apply its rewards.
    pub fn complete_mission(&mut self, mission: MissionId) -> Result<(), ActionError> {
        let def = self.missions.complete(mission, &mut self.player)?;
        let tick = self.sim.tick;

        if let Some(money) = def.rewards.money {
            self.credit(money);
        }
        if let Some(by) = def.rewards.expand {
            self.region.expand(by, self.tiles.bounds());
            info!(region = ?self.region, "region expanded");
            self.events.emit(Event::RegionExpanded {
                region: self.region,
                tick,
            });
        }

        info!(?mission, "mission completed");
        self.events.emit(Event::MissionCompleted { mission, tick });
        self.refresh_missions();
        Ok(())
    }

    fn refresh_missions(&mut self) {
        for mission in self.missions.update(&self.player) {
            self.events.emit(Event::MissionReady {
                mission,
                tick: self.sim.tick,
            });
        }
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(Fixed64::saturating_from_num(amount));
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the simulation by one fixed step.
    pub fn tick(&mut self) {
        let tick = self.sim.tick;

        self.refresh_missions();

        if self.passive_income_per_sec > 0 {
            let income = ratio(
                u64::from(self.passive_income_per_sec),
                u64::from(self.config.tick_rate),
            );
            self.money = self.money.saturating_add(income);
        }

        let mut ctx = TickContext {
            tiles: &self.tiles,
            region: self.region,
            items: &mut self.items,
            research: &mut self.research,
            events: &mut self.events,
            tick,
        };
        for (id, building) in self.buildings.iter_mut() {
            building.tick(id, &mut ctx);
        }

        self.route_items(tick);
        self.sim.tick += 1;
    }

    /// Steps 4 and 5: route at-rest items, hand them to buildings, move the
    /// rest.
    fn route_items(&mut self, tick: Ticks) {
        let region = self.region;
        let mut consumed = Vec::new();

        for (index, entity) in self.items.as_mut_slice().iter_mut().enumerate() {
            if entity.is_at_rest() {
                entity.speed = default_speed();
                if let Some(id) = self.placement.get(entity.position)
                    && let Some(building) = self.buildings.get_mut(id)
                {
                    let cell = entity.position;
                    let target = building.route(cell);
                    entity.target = if region.contains(target) { target } else { cell };
                    entity.speed = building.item_speed();

                    match building.accept_item(entity.item_type) {
                        Intake::Sold(value) => {
                            self.money = self.money.saturating_add(Fixed64::saturating_from_num(value));
                            self.events.emit(Event::ItemSold {
                                item_type: entity.item_type,
                                quantity: 1,
                                tick,
                            });
                            consumed.push(index);
                            continue;
                        }
                        Intake::Stored => {
                            self.events.emit(Event::ItemConsumed {
                                building: id,
                                item_type: entity.item_type,
                                tick,
                            });
                            consumed.push(index);
                            continue;
                        }
                        Intake::Rejected => {}
                    }
                }
            }
            let speed = entity.speed;
            entity.update(speed);
        }

        self.items.remove_indices(&consumed);
    }

    /// Feed elapsed wall time and run every whole step that fits.
    pub fn advance(&mut self, elapsed: Duration) -> AdvanceResult {
        let steps = self
            .sim
            .accumulate(elapsed, step_duration(self.config.tick_rate));
        for _ in 0..steps {
            self.tick();
        }
        AdvanceResult { steps_run: steps }
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    /// Hash of all simulation state. Equal seeds and equal action sequences
    /// give equal hashes.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.sim.tick);
        h.write_fixed64(self.money);
        h.write_u32(self.passive_income_per_sec);
        for item in &self.purchased_upgrades {
            h.write_u32(item.index() as u32);
        }
        for v in [self.region.min_x, self.region.min_y, self.region.max_x, self.region.max_y] {
            h.write_i32(v);
        }

        for y in 0..self.tiles.height() as i32 {
            for x in 0..self.tiles.width() as i32 {
                let tile = self.tiles.resource(GridPosition::new(x, y));
                h.write_u32(tile.map_or(u32::MAX, |r| r.index() as u32));
            }
        }

        hash_inventory(&mut h, &self.player);
        match &self.held {
            Some(stack) => {
                h.write_u32(stack.item_type.index() as u32);
                h.write_u32(stack.count);
            }
            None => h.write_u32(u32::MAX),
        }
        for (_, building) in &self.buildings {
            hash_building(&mut h, building);
        }

        h.write_u64(self.items.len() as u64);
        for e in self.items.iter() {
            h.write_u32(e.item_type.index() as u32);
            h.write_i32(e.position.x);
            h.write_i32(e.position.y);
            h.write_i32(e.target.x);
            h.write_i32(e.target.y);
            h.write_fixed64(e.progress);
            h.write_fixed64(e.speed);
        }
        h.write_u64(self.items.rng_state());

        for tech in self.research.unlocked() {
            h.write_u32(tech.index() as u32);
        }
        h.write_u32(self.research.current().map_or(u32::MAX, |t| t.index() as u32));
        h.write_u32(self.research.progress());

        for (mission, status) in self.missions.iter() {
            h.write_u32(mission.index() as u32);
            h.write_u32(status as u32);
        }
        h.finish()
    }
}

fn hash_inventory(h: &mut StateHash, inventory: &Inventory) {
    for slot in inventory.slots() {
        match slot {
            Some(stack) => {
                h.write_u32(stack.item_type.index() as u32);
                h.write_u32(stack.count);
            }
            None => h.write_u32(u32::MAX),
        }
    }
}

fn hash_building(h: &mut StateHash, building: &Building) {
    use crate::building::BuildingState as S;

    h.write_u32(building.kind.index() as u32);
    h.write_i32(building.origin.x);
    h.write_i32(building.origin.y);
    h.write(&[building.direction.index()]);
    match &building.state {
        S::Miner { timer } => h.write_u64(*timer),
        S::Smelter {
            fuel_left,
            max_fuel_time,
            progress,
            ..
        } => {
            h.write_u64(*fuel_left);
            h.write_u64(*max_fuel_time);
            h.write_u64(*progress);
        }
        S::Assembler {
            recipe, progress, ..
        } => {
            h.write_u32(recipe.map_or(u32::MAX, |r| r.index() as u32));
            h.write_u64(*progress);
        }
        S::Lab {
            progress, active, ..
        } => {
            h.write_u64(*progress);
            h.write(&[*active as u8]);
        }
        S::Splitter { out_index } => h.write(&[*out_index]),
        S::StorageBox { .. } | S::Passive => {}
    }
    if let Some(inventory) = building.inventory() {
        hash_inventory(h, inventory);
    }
}
