//! Criterion benchmarks for the tycoon simulation.
//!
//! Two benchmark groups:
//! - `belt_heavy`: a full start region of looping conveyors carrying items
//! - `production`: miners feeding smelters feeding a sell node

use criterion::{Criterion, criterion_group, criterion_main};
use tycoon_core::config::WorldConfig;
use tycoon_core::id::Direction;
use tycoon_core::registry::{BuildingType, ItemType};
use tycoon_core::test_utils::*;
use tycoon_core::world::World;

// ===========================================================================
// World builders
// ===========================================================================

/// Concentric conveyor rings over a 33x33 start region, one item per belt
/// on every other cell.
fn build_belt_world() -> World {
    let mut world = build(WorldConfig {
        start_size: 33,
        max_items: 5000,
        ..test_config()
    });
    let (ox, oy) = region_origin(&world);
    let size = world.region().width();

    for ring in 0..size / 2 {
        let (lo, hi) = (ring, size - 1 - ring);
        for i in lo..hi {
            place(&mut world, BuildingType::Conveyor, ox + i, oy + lo, Direction::Right);
            place(&mut world, BuildingType::Conveyor, ox + hi, oy + i, Direction::Down);
            place(&mut world, BuildingType::Conveyor, ox + hi - (i - lo), oy + hi, Direction::Left);
            place(&mut world, BuildingType::Conveyor, ox + lo, oy + hi - (i - lo), Direction::Up);
        }
    }
    for y in 0..size {
        for x in (0..size).step_by(2) {
            spawn(&mut world, ItemType::IronOre, ox + x, oy + y);
        }
    }
    world
}

/// Rows of miner -> belt -> smelter -> belt -> sell node.
fn build_production_world() -> World {
    let mut world = build(WorldConfig {
        start_size: 21,
        ..test_config()
    });
    let (ox, oy) = region_origin(&world);
    for row in 0..20 {
        let y = oy + row;
        world.set_tile_resource(ox, y, Some(ItemType::IronOre)).unwrap();
        place(&mut world, BuildingType::Miner, ox, y, Direction::Right);
        belt_line(&mut world, ox + 1, y, Direction::Right, 3);
        let smelter = place(&mut world, BuildingType::Smelter, ox + 4, y, Direction::Right);
        stock(&mut world, smelter, 1, ItemType::CoalOre, 64);
        belt_line(&mut world, ox + 5, y, Direction::Right, 3);
        place(&mut world, BuildingType::SellNode, ox + 8, y, Direction::Right);
    }
    world
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_belt_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("belt_heavy");
    let mut world = build_belt_world();
    group.bench_function("tick_33x33_rings", |b| b.iter(|| world.tick()));
    group.finish();
}

fn bench_production(c: &mut Criterion) {
    let mut group = c.benchmark_group("production");
    let mut world = build_production_world();
    // Warm the lines so every stage is busy.
    run(&mut world, 600);
    group.bench_function("tick_20_lines", |b| b.iter(|| world.tick()));
    group.bench_function("state_hash", |b| b.iter(|| world.state_hash()));
    group.finish();
}

criterion_group!(benches, bench_belt_heavy, bench_production);
criterion_main!(benches);
