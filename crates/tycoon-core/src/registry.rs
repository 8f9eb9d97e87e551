//! Static game tables: items, buildings, recipes, techs, missions, shop.
//!
//! Every table is keyed by a closed enum. Tables are assembled through a
//! [`RegistryBuilder`], validated once, and frozen into an immutable
//! [`Registry`]. The standard tables live in a process-wide instance reached
//! through [`registry()`].

use crate::fixed::{Fixed64, Ticks};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Every item the game knows about: raw resources, intermediates, placeable
/// building items and economy upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    IronOre,
    CopperOre,
    CoalOre,
    Wood,
    IronIngot,
    CopperIngot,
    IronGear,
    CopperWire,
    Circuit,
    SciencePack,
    Conveyor,
    Miner,
    Smelter,
    StorageBox,
    SellNode,
    Splitter,
    Assembler,
    Lab,
    FastConveyor,
    HeavyMiner,
    Sponsorship,
    Partnership,
    Subsidiary,
    Conglomerate,
    Monopoly,
}

impl ItemType {
    pub const ALL: [ItemType; 25] = [
        ItemType::IronOre,
        ItemType::CopperOre,
        ItemType::CoalOre,
        ItemType::Wood,
        ItemType::IronIngot,
        ItemType::CopperIngot,
        ItemType::IronGear,
        ItemType::CopperWire,
        ItemType::Circuit,
        ItemType::SciencePack,
        ItemType::Conveyor,
        ItemType::Miner,
        ItemType::Smelter,
        ItemType::StorageBox,
        ItemType::SellNode,
        ItemType::Splitter,
        ItemType::Assembler,
        ItemType::Lab,
        ItemType::FastConveyor,
        ItemType::HeavyMiner,
        ItemType::Sponsorship,
        ItemType::Partnership,
        ItemType::Subsidiary,
        ItemType::Conglomerate,
        ItemType::Monopoly,
    ];

    /// Stable table index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Static metadata from the standard registry.
    pub fn def(self) -> &'static ItemDef {
        registry().item(self)
    }
}

/// Every placeable building kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Conveyor,
    FastConveyor,
    Miner,
    HeavyMiner,
    Smelter,
    StorageBox,
    SellNode,
    Splitter,
    Assembler,
    Lab,
}

impl BuildingType {
    pub const ALL: [BuildingType; 10] = [
        BuildingType::Conveyor,
        BuildingType::FastConveyor,
        BuildingType::Miner,
        BuildingType::HeavyMiner,
        BuildingType::Smelter,
        BuildingType::StorageBox,
        BuildingType::SellNode,
        BuildingType::Splitter,
        BuildingType::Assembler,
        BuildingType::Lab,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn def(self) -> &'static BuildingDef {
        registry().building(self)
    }
}

/// Researchable technologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechId {
    Logistics,
    Mining,
}

impl TechId {
    pub const ALL: [TechId; 2] = [TechId::Logistics, TechId::Mining];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Progression missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionId {
    StartUp,
    Expand1,
    Automation1,
    Expand2,
    Circuits,
}

impl MissionId {
    pub const ALL: [MissionId; 5] = [
        MissionId::StartUp,
        MissionId::Expand1,
        MissionId::Automation1,
        MissionId::Expand2,
        MissionId::Circuits,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Static metadata for an item type.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: &'static str,
    pub description: &'static str,
    pub color: (u8, u8, u8),
    /// Money credited when sold.
    pub value: u32,
    /// Burn time in ticks when used as smelter fuel. Zero means not a fuel.
    pub fuel_value: Ticks,
    /// Shop price. Zero for items that are not sold in the shop.
    pub cost: u32,
    pub is_building: bool,
    pub is_upgrade: bool,
    /// Raw resource: may lie on a tile and be extracted by miners.
    pub is_raw: bool,
    /// Money per second granted once purchased (upgrades only).
    pub passive_income: u32,
}

impl ItemDef {
    fn material(name: &'static str, description: &'static str, color: (u8, u8, u8), value: u32) -> Self {
        Self {
            name,
            description,
            color,
            value,
            fuel_value: 0,
            cost: 0,
            is_building: false,
            is_upgrade: false,
            is_raw: false,
            passive_income: 0,
        }
    }

    fn raw(mut self) -> Self {
        self.is_raw = true;
        self
    }

    fn fuel(mut self, ticks: Ticks) -> Self {
        self.fuel_value = ticks;
        self
    }

    fn building(name: &'static str, description: &'static str, color: (u8, u8, u8), cost: u32) -> Self {
        Self {
            cost,
            is_building: true,
            ..Self::material(name, description, color, 0)
        }
    }

    fn upgrade(name: &'static str, color: (u8, u8, u8), cost: u32, passive_income: u32) -> Self {
        Self {
            cost,
            is_upgrade: true,
            passive_income,
            ..Self::material(name, "passive income upgrade", color, 0)
        }
    }
}

/// Behavioural parameters of a building kind.
#[derive(Debug, Clone)]
pub struct BuildingDef {
    pub name: &'static str,
    /// The inventory item that places (and is refunded by) this building.
    pub item: ItemType,
    pub width: u32,
    pub height: u32,
    /// Whether facing affects behaviour.
    pub directional: bool,
    /// Cell fraction moved per tick by items leaving this conveyor.
    pub belt_speed: Option<Fixed64>,
    /// Ticks per extraction (miners).
    pub mining_rate: Option<Ticks>,
    /// Extra cells scanned around the footprint (miners).
    pub mining_radius: i32,
    /// Number of inventory slots, zero for storage-less buildings.
    pub slots: usize,
}

impl BuildingDef {
    fn new(name: &'static str, item: ItemType, size: (u32, u32), directional: bool) -> Self {
        Self {
            name,
            item,
            width: size.0,
            height: size.1,
            directional,
            belt_speed: None,
            mining_rate: None,
            mining_radius: 0,
            slots: 0,
        }
    }

    fn belt(mut self, speed: f64) -> Self {
        self.belt_speed = Some(Fixed64::from_num(speed));
        self
    }

    fn mining(mut self, rate: Ticks, radius: i32) -> Self {
        self.mining_rate = Some(rate);
        self.mining_radius = radius;
        self
    }

    fn storage(mut self, slots: usize) -> Self {
        self.slots = slots;
        self
    }
}

/// Ore -> ingot recipe.
#[derive(Debug, Clone)]
pub struct SmeltRecipe {
    pub input: ItemType,
    pub output: ItemType,
    pub time: Ticks,
}

/// Assembler recipe, keyed by its single output item.
#[derive(Debug, Clone)]
pub struct AssemblerRecipe {
    pub output: ItemType,
    pub name: &'static str,
    pub inputs: Vec<(ItemType, u32)>,
    pub time: Ticks,
}

/// A researchable technology.
#[derive(Debug, Clone)]
pub struct TechDef {
    pub id: TechId,
    pub name: &'static str,
    pub description: &'static str,
    /// Science points (consumed packs) needed to finish.
    pub cost: u32,
    /// Shop items gated behind this technology.
    pub unlocks: Vec<ItemType>,
    /// Must be unlocked first. Enforced by the caller, see
    /// [`World::request_research`](crate::world::World::request_research).
    pub prerequisite: Option<TechId>,
}

/// Rewards granted when a mission completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionRewards {
    pub money: Option<u32>,
    /// Cells added to the unlocked region on each axis.
    pub expand: Option<i32>,
}

/// A progression mission.
#[derive(Debug, Clone)]
pub struct MissionDef {
    pub id: MissionId,
    pub name: &'static str,
    pub description: &'static str,
    pub requirements: Vec<(ItemType, u32)>,
    pub rewards: MissionRewards,
    pub unlocks: Vec<MissionId>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects table entries, then validates and freezes them.
#[derive(Debug)]
pub struct RegistryBuilder {
    items: Vec<Option<ItemDef>>,
    buildings: Vec<Option<BuildingDef>>,
    smelting: Vec<SmeltRecipe>,
    assembling: Vec<AssemblerRecipe>,
    techs: Vec<Option<TechDef>>,
    missions: Vec<Option<MissionDef>>,
    shop: Vec<ItemType>,
    lab_period: Ticks,
    science_pack: ItemType,
    duplicate: Option<String>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            items: vec![None; ItemType::ALL.len()],
            buildings: vec![None; BuildingType::ALL.len()],
            smelting: Vec::new(),
            assembling: Vec::new(),
            techs: vec![None; TechId::ALL.len()],
            missions: vec![None; MissionId::ALL.len()],
            shop: Vec::new(),
            lab_period: 60,
            science_pack: ItemType::SciencePack,
            duplicate: None,
        }
    }

    fn note_duplicate(&mut self, what: String) {
        if self.duplicate.is_none() {
            self.duplicate = Some(what);
        }
    }

    pub fn item(&mut self, ty: ItemType, def: ItemDef) -> &mut Self {
        if self.items[ty.index()].replace(def).is_some() {
            self.note_duplicate(format!("{ty:?}"));
        }
        self
    }

    pub fn building(&mut self, ty: BuildingType, def: BuildingDef) -> &mut Self {
        if self.buildings[ty.index()].replace(def).is_some() {
            self.note_duplicate(format!("{ty:?}"));
        }
        self
    }

    pub fn smelting(&mut self, input: ItemType, output: ItemType, time: Ticks) -> &mut Self {
        self.smelting.push(SmeltRecipe { input, output, time });
        self
    }

    pub fn assembling(
        &mut self,
        output: ItemType,
        name: &'static str,
        inputs: Vec<(ItemType, u32)>,
        time: Ticks,
    ) -> &mut Self {
        self.assembling.push(AssemblerRecipe {
            output,
            name,
            inputs,
            time,
        });
        self
    }

    pub fn tech(&mut self, def: TechDef) -> &mut Self {
        let id = def.id;
        if self.techs[id.index()].replace(def).is_some() {
            self.note_duplicate(format!("{id:?}"));
        }
        self
    }

    pub fn mission(&mut self, def: MissionDef) -> &mut Self {
        let id = def.id;
        if self.missions[id.index()].replace(def).is_some() {
            self.note_duplicate(format!("{id:?}"));
        }
        self
    }

    pub fn shop(&mut self, items: &[ItemType]) -> &mut Self {
        self.shop.extend_from_slice(items);
        self
    }

    pub fn lab(&mut self, science_pack: ItemType, period: Ticks) -> &mut Self {
        self.science_pack = science_pack;
        self.lab_period = period;
        self
    }

    /// Validate cross references and freeze the tables.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(name) = self.duplicate {
            return Err(RegistryError::Duplicate(name));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (ty, def) in ItemType::ALL.iter().zip(self.items) {
            let def = def.ok_or_else(|| RegistryError::Missing(format!("{ty:?}")))?;
            if def.is_raw && (def.is_building || def.is_upgrade) {
                return Err(RegistryError::Invalid(format!("{ty:?} cannot be both raw and placeable")));
            }
            items.push(def);
        }

        let mut buildings = Vec::with_capacity(self.buildings.len());
        for (ty, def) in BuildingType::ALL.iter().zip(self.buildings) {
            let def = def.ok_or_else(|| RegistryError::Missing(format!("{ty:?}")))?;
            if !items[def.item.index()].is_building {
                return Err(RegistryError::NotABuildingItem(def.item));
            }
            if def.width == 0 || def.height == 0 {
                return Err(RegistryError::Invalid(format!("{ty:?} has an empty footprint")));
            }
            buildings.push(def);
        }

        for recipe in &self.smelting {
            if recipe.time == 0 {
                return Err(RegistryError::Invalid(format!("smelting {:?} takes no time", recipe.input)));
            }
        }
        for recipe in &self.assembling {
            if recipe.time == 0 || recipe.inputs.is_empty() {
                return Err(RegistryError::Invalid(format!("assembling {:?} is degenerate", recipe.output)));
            }
        }

        let mut techs = Vec::with_capacity(self.techs.len());
        for (id, def) in TechId::ALL.iter().zip(self.techs) {
            techs.push(def.ok_or_else(|| RegistryError::Missing(format!("{id:?}")))?);
        }
        for tech in &techs {
            if tech.cost == 0 {
                return Err(RegistryError::Invalid(format!("{:?} costs nothing", tech.id)));
            }
            if tech.prerequisite == Some(tech.id) {
                return Err(RegistryError::Invalid(format!("{:?} requires itself", tech.id)));
            }
        }

        let mut missions = Vec::with_capacity(self.missions.len());
        for (id, def) in MissionId::ALL.iter().zip(self.missions) {
            missions.push(def.ok_or_else(|| RegistryError::Missing(format!("{id:?}")))?);
        }

        for item in &self.shop {
            if items[item.index()].cost == 0 {
                return Err(RegistryError::Invalid(format!("{item:?} is in the shop without a price")));
            }
        }

        if self.lab_period == 0 {
            return Err(RegistryError::Invalid("lab period is zero".to_string()));
        }

        Ok(Registry {
            items,
            buildings,
            smelting: self.smelting,
            assembling: self.assembling,
            techs,
            missions,
            shop: self.shop,
            lab_period: self.lab_period,
            science_pack: self.science_pack,
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable game tables. Frozen after `build()`; safe to share.
#[derive(Debug)]
pub struct Registry {
    items: Vec<ItemDef>,
    buildings: Vec<BuildingDef>,
    smelting: Vec<SmeltRecipe>,
    assembling: Vec<AssemblerRecipe>,
    techs: Vec<TechDef>,
    missions: Vec<MissionDef>,
    shop: Vec<ItemType>,
    lab_period: Ticks,
    science_pack: ItemType,
}

impl Registry {
    pub fn item(&self, ty: ItemType) -> &ItemDef {
        &self.items[ty.index()]
    }

    pub fn building(&self, ty: BuildingType) -> &BuildingDef {
        &self.buildings[ty.index()]
    }

    /// The building placed by an inventory item, if any.
    pub fn building_for_item(&self, item: ItemType) -> Option<BuildingType> {
        BuildingType::ALL
            .iter()
            .copied()
            .find(|b| self.buildings[b.index()].item == item)
    }

    pub fn smelting(&self, input: ItemType) -> Option<&SmeltRecipe> {
        self.smelting.iter().find(|r| r.input == input)
    }

    pub fn assembler_recipe(&self, output: ItemType) -> Option<&AssemblerRecipe> {
        self.assembling.iter().find(|r| r.output == output)
    }

    pub fn assembler_recipes(&self) -> &[AssemblerRecipe] {
        &self.assembling
    }

    pub fn tech(&self, id: TechId) -> &TechDef {
        &self.techs[id.index()]
    }

    pub fn techs(&self) -> &[TechDef] {
        &self.techs
    }

    /// The technology that gates an item in the shop, if any.
    pub fn tech_gate(&self, item: ItemType) -> Option<TechId> {
        self.techs
            .iter()
            .find(|t| t.unlocks.contains(&item))
            .map(|t| t.id)
    }

    pub fn mission(&self, id: MissionId) -> &MissionDef {
        &self.missions[id.index()]
    }

    pub fn shop(&self) -> &[ItemType] {
        &self.shop
    }

    /// Ticks a lab spends on one science pack.
    pub fn lab_period(&self) -> Ticks {
        self.lab_period
    }

    pub fn science_pack(&self) -> ItemType {
        self.science_pack
    }

    /// The game's standard tables.
    pub fn standard() -> RegistryBuilder {
        use ItemType as I;

        let mut b = RegistryBuilder::new();

        b.item(I::IronOre, ItemDef::material("Iron Ore", "basic ore", (160, 160, 170), 2).raw())
            .item(I::CopperOre, ItemDef::material("Copper Ore", "conductive ore", (200, 110, 60), 2).raw())
            .item(I::CoalOre, ItemDef::material("Coal", "fuel", (10, 10, 10), 5).raw().fuel(300))
            .item(I::Wood, ItemDef::material("Wood", "fuel", (120, 80, 40), 1).raw().fuel(60))
            .item(I::IronIngot, ItemDef::material("Iron Ingot", "refined iron", (200, 200, 200), 15))
            .item(I::CopperIngot, ItemDef::material("Copper Ingot", "refined copper", (205, 127, 50), 15))
            .item(I::IronGear, ItemDef::material("Iron Gear", "machine part", (150, 150, 170), 35))
            .item(I::CopperWire, ItemDef::material("Copper Wire", "electrical part", (255, 150, 100), 20))
            .item(I::Circuit, ItemDef::material("Circuit", "advanced part", (50, 200, 50), 100))
            .item(
                I::SciencePack,
                ItemDef::material("Science Pack", "consumed by labs to research", (255, 50, 50), 200),
            )
            .item(I::Conveyor, ItemDef::building("Conveyor", "speed 1x", (100, 100, 255), 5))
            .item(I::Miner, ItemDef::building("Miner", "1.0/s, 1x1 area", (150, 150, 150), 100))
            .item(I::Smelter, ItemDef::building("Smelter", "smelts ore", (80, 80, 80), 200))
            .item(I::StorageBox, ItemDef::building("Box", "stores items", (139, 105, 20), 50))
            .item(I::SellNode, ItemDef::building("Sell Node", "sells items", (255, 215, 0), 500))
            .item(I::Splitter, ItemDef::building("Splitter", "distributes items", (100, 200, 255), 150))
            .item(I::Assembler, ItemDef::building("Assembler", "assembles parts", (100, 150, 100), 500))
            .item(I::Lab, ItemDef::building("Lab", "consumes science packs", (50, 50, 200), 1000))
            .item(I::FastConveyor, ItemDef::building("Fast Conveyor", "speed 2.5x", (255, 50, 255), 20))
            .item(I::HeavyMiner, ItemDef::building("Heavy Miner", "2.5/s, 3x3 area", (200, 50, 50), 500))
            .item(I::Sponsorship, ItemDef::upgrade("Sponsorship", (255, 100, 100), 500, 1))
            .item(I::Partnership, ItemDef::upgrade("Partnership", (100, 100, 255), 10_000, 20))
            .item(I::Subsidiary, ItemDef::upgrade("Subsidiary", (100, 255, 100), 200_000, 500))
            .item(I::Conglomerate, ItemDef::upgrade("Conglomerate", (255, 215, 0), 1_000_000, 3_000))
            .item(I::Monopoly, ItemDef::upgrade("Monopoly", (200, 0, 255), 10_000_000, 20_000));

        use BuildingType as B;
        b.building(B::Conveyor, BuildingDef::new("Conveyor", I::Conveyor, (1, 1), true).belt(0.1))
            .building(
                B::FastConveyor,
                BuildingDef::new("Fast Conveyor", I::FastConveyor, (1, 1), true).belt(0.25),
            )
            .building(B::Miner, BuildingDef::new("Miner", I::Miner, (1, 1), true).mining(60, 0))
            .building(
                B::HeavyMiner,
                BuildingDef::new("Heavy Miner", I::HeavyMiner, (1, 1), true).mining(24, 1),
            )
            .building(B::Smelter, BuildingDef::new("Smelter", I::Smelter, (1, 1), true).storage(3))
            .building(B::StorageBox, BuildingDef::new("Box", I::StorageBox, (1, 1), false).storage(27))
            .building(B::SellNode, BuildingDef::new("Sell Node", I::SellNode, (1, 1), false))
            .building(B::Splitter, BuildingDef::new("Splitter", I::Splitter, (1, 1), true))
            .building(B::Assembler, BuildingDef::new("Assembler", I::Assembler, (2, 2), true).storage(5))
            .building(B::Lab, BuildingDef::new("Lab", I::Lab, (2, 2), false).storage(1));

        b.smelting(I::IronOre, I::IronIngot, 60)
            .smelting(I::CopperOre, I::CopperIngot, 60);

        b.assembling(I::IronGear, "Iron Gear", vec![(I::IronIngot, 2)], 30)
            .assembling(I::CopperWire, "Copper Wire", vec![(I::CopperIngot, 1)], 30)
            .assembling(I::Circuit, "Circuit", vec![(I::IronIngot, 1), (I::CopperWire, 3)], 90)
            .assembling(
                I::SciencePack,
                "Science Pack",
                vec![(I::IronGear, 1), (I::CopperIngot, 1)],
                150,
            );

        b.tech(TechDef {
            id: TechId::Logistics,
            name: "Fast Logistics",
            description: "Unlocks conveyors that move items faster.",
            cost: 10,
            unlocks: vec![I::FastConveyor],
            prerequisite: None,
        })
        .tech(TechDef {
            id: TechId::Mining,
            name: "Industrial Mining",
            description: "Unlocks a fast drill that mines a 3x3 area.",
            cost: 20,
            unlocks: vec![I::HeavyMiner],
            prerequisite: Some(TechId::Logistics),
        });

        b.mission(MissionDef {
            id: MissionId::StartUp,
            name: "First Steps",
            description: "Gather basic resources to prepare the factory.",
            requirements: vec![(I::Wood, 10), (I::IronOre, 5), (I::CoalOre, 5)],
            rewards: MissionRewards {
                money: Some(1000),
                expand: None,
            },
            unlocks: vec![MissionId::Expand1, MissionId::Automation1],
        })
        .mission(MissionDef {
            id: MissionId::Expand1,
            name: "Expansion I",
            description: "Expand the territory for more room.",
            requirements: vec![(I::Wood, 50)],
            rewards: MissionRewards {
                money: None,
                expand: Some(3),
            },
            unlocks: vec![MissionId::Expand2],
        })
        .mission(MissionDef {
            id: MissionId::Automation1,
            name: "Iron Automation",
            description: "Automate iron ingot production.",
            requirements: vec![(I::IronIngot, 50), (I::IronGear, 20)],
            rewards: MissionRewards {
                money: Some(5000),
                expand: None,
            },
            unlocks: vec![MissionId::Circuits],
        })
        .mission(MissionDef {
            id: MissionId::Expand2,
            name: "Expansion II",
            description: "Expand further for larger factories.",
            requirements: vec![(I::IronGear, 50), (I::CopperIngot, 50)],
            rewards: MissionRewards {
                money: None,
                expand: Some(3),
            },
            unlocks: vec![],
        })
        .mission(MissionDef {
            id: MissionId::Circuits,
            name: "Electronics",
            description: "Start producing copper wire and circuits.",
            requirements: vec![(I::CopperWire, 100), (I::Circuit, 50)],
            rewards: MissionRewards {
                money: Some(10_000),
                expand: None,
            },
            unlocks: vec![],
        });

        b.shop(&[
            I::Conveyor,
            I::Miner,
            I::Smelter,
            I::Splitter,
            I::Assembler,
            I::StorageBox,
            I::SellNode,
            I::Lab,
            I::FastConveyor,
            I::HeavyMiner,
            I::Sponsorship,
            I::Partnership,
            I::Subsidiary,
            I::Conglomerate,
            I::Monopoly,
        ]);

        b.lab(I::SciencePack, 60);
        b
    }
}

static STANDARD: OnceLock<Result<Registry, RegistryError>> = OnceLock::new();

/// Validate the standard tables, building them on first use.
pub fn validate_standard() -> Result<(), &'static RegistryError> {
    STANDARD
        .get_or_init(|| Registry::standard().build())
        .as_ref()
        .map(|_| ())
}

/// The process-wide standard registry.
///
/// The standard tables are checked by [`validate_standard`], which
/// [`World::new`](crate::world::World::new) calls before any lookup.
pub fn registry() -> &'static Registry {
    match STANDARD.get_or_init(|| Registry::standard().build()) {
        Ok(registry) => registry,
        Err(err) => panic!("standard registry is invalid: {err}"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("missing definition: {0}")]
    Missing(String),
    #[error("duplicate definition: {0}")]
    Duplicate(String),
    #[error("building item {0:?} is not flagged as a building")]
    NotABuildingItem(ItemType),
    #[error("invalid table entry: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_validate() {
        assert!(validate_standard().is_ok());
    }

    #[test]
    fn item_order_matches_index() {
        for (i, ty) in ItemType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
        }
        for (i, ty) in BuildingType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
        }
    }

    #[test]
    fn building_items_round_trip() {
        let reg = registry();
        for ty in BuildingType::ALL {
            let item = reg.building(ty).item;
            assert_eq!(reg.building_for_item(item), Some(ty));
        }
        assert_eq!(reg.building_for_item(ItemType::IronOre), None);
    }

    #[test]
    fn fuel_values() {
        assert_eq!(ItemType::CoalOre.def().fuel_value, 300);
        assert_eq!(ItemType::Wood.def().fuel_value, 60);
        assert_eq!(ItemType::IronOre.def().fuel_value, 0);
    }

    #[test]
    fn raw_resources_are_the_tile_items() {
        let raw: Vec<_> = ItemType::ALL.iter().copied().filter(|t| t.def().is_raw).collect();
        assert_eq!(
            raw,
            vec![ItemType::IronOre, ItemType::CopperOre, ItemType::CoalOre, ItemType::Wood]
        );
    }

    #[test]
    fn assembler_recipe_listing() {
        let outputs: Vec<_> = registry().assembler_recipes().iter().map(|r| r.output).collect();
        assert_eq!(
            outputs,
            vec![ItemType::IronGear, ItemType::CopperWire, ItemType::Circuit, ItemType::SciencePack]
        );
        for output in outputs {
            assert!(registry().assembler_recipe(output).is_some());
        }
    }

    #[test]
    fn tech_gates() {
        let reg = registry();
        assert_eq!(reg.tech_gate(ItemType::FastConveyor), Some(TechId::Logistics));
        assert_eq!(reg.tech_gate(ItemType::HeavyMiner), Some(TechId::Mining));
        assert_eq!(reg.tech_gate(ItemType::Conveyor), None);
        assert_eq!(reg.tech(TechId::Mining).prerequisite, Some(TechId::Logistics));
    }

    #[test]
    fn multi_cell_buildings() {
        assert_eq!(BuildingType::Assembler.def().width, 2);
        assert_eq!(BuildingType::Lab.def().height, 2);
        assert_eq!(BuildingType::Miner.def().width, 1);
    }

    #[test]
    fn missing_item_fails() {
        let b = RegistryBuilder::new();
        match b.build() {
            Err(RegistryError::Missing(name)) => assert_eq!(name, "IronOre"),
            other => panic!("expected Missing, got: {other:?}"),
        }
    }

    #[test]
    fn duplicate_item_fails() {
        let mut b = Registry::standard();
        b.item(ItemType::Wood, ItemDef::material("Wood", "again", (0, 0, 0), 1));
        assert!(matches!(b.build(), Err(RegistryError::Duplicate(_))));
    }

    #[test]
    fn zero_time_recipe_fails() {
        let mut b = Registry::standard();
        b.smelting(ItemType::Wood, ItemType::CoalOre, 0);
        let err = b.build().unwrap_err();
        assert!(format!("{err}").contains("invalid table entry"), "got: {err}");
    }
}
