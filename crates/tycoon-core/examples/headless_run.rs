//! Headless run: build a small mining line and let it sell ore for a minute
//! of simulated time.
//!
//! Optionally takes a TOML config path. Log level follows `RUST_LOG`
//! (default `info`).
//!
//! Run with: `cargo run -p tycoon-core --example headless_run -- [config.toml]`

use std::collections::BTreeMap;
use std::time::Duration;

use tycoon_core::config::WorldConfig;
use tycoon_core::event::Event;
use tycoon_core::fixed::fixed64_to_f64;
use tycoon_core::id::{Direction, GridPosition};
use tycoon_core::registry::ItemType;
use tycoon_core::world::World;

const FRAME: Duration = Duration::from_millis(16);
const SECONDS: u32 = 60;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => WorldConfig::default(),
    };
    let mut world = World::new(config)?;

    // Find an iron tile in the start region with room for a line to the right.
    let region = world.region();
    let line = 4;
    let origin = (region.min_y..region.max_y)
        .flat_map(|y| (region.min_x..region.max_x - line).map(move |x| GridPosition::new(x, y)))
        .find(|p| world.get_tile_resource(p.x, p.y) == Some(ItemType::IronOre))
        .ok_or("no iron ore in the start region")?;

    world.buy_item(ItemType::SellNode)?;
    world.place_from_slot(slot_of(&world, ItemType::Miner)?, origin.x, origin.y, Direction::Right)?;
    for dx in 1..line {
        world.place_from_slot(
            slot_of(&world, ItemType::Conveyor)?,
            origin.x + dx,
            origin.y,
            Direction::Right,
        )?;
    }
    let node = slot_of(&world, ItemType::SellNode)?;
    world.place_from_slot(node, origin.x + line, origin.y, Direction::Right)?;
    tracing::info!(x = origin.x, y = origin.y, "mining line built");

    let frames = SECONDS * 1000 / FRAME.as_millis() as u32;
    let mut ticks = 0;
    let mut tally: BTreeMap<&'static str, u64> = BTreeMap::new();
    for _ in 0..frames {
        ticks += world.advance(FRAME).steps_run;
        for event in world.drain_events() {
            let name = match event {
                Event::ItemSpawned { .. } => "spawned",
                Event::ItemSold { .. } => "sold",
                Event::SpawnRejected { .. } => "rejected",
                _ => "other",
            };
            *tally.entry(name).or_default() += 1;
        }
    }

    tracing::info!(
        ticks,
        money = fixed64_to_f64(world.money()),
        items_in_flight = world.items().len(),
        hash = world.state_hash(),
        ?tally,
        "run finished"
    );
    Ok(())
}

fn slot_of(world: &World, item: ItemType) -> Result<usize, String> {
    world
        .player_inventory()
        .slots()
        .iter()
        .position(|s| s.as_ref().is_some_and(|s| s.item_type == item))
        .ok_or_else(|| format!("no {item:?} in the player inventory"))
}
