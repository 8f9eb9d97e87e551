//! Seeded resource placement.
//!
//! The starting region always receives a few single-tile patches so a new
//! game can begin mining immediately. The rest of the map gets random square
//! clusters that never intrude into the starting region.

use crate::fixed::Fixed64;
use crate::grid::{Region, TileGrid};
use crate::id::GridPosition;
use crate::registry::ItemType;
use crate::rng::SimRng;

/// Single tiles guaranteed inside the starting region.
const STARTER_PATCHES: [(ItemType, u32); 4] = [
    (ItemType::IronOre, 3),
    (ItemType::CopperOre, 3),
    (ItemType::CoalOre, 1),
    (ItemType::Wood, 3),
];

/// Cluster count and per-cell fill probability outside the start.
const CLUSTERS: [(ItemType, u32, f64); 4] = [
    (ItemType::IronOre, 6, 0.7),
    (ItemType::CopperOre, 4, 0.6),
    (ItemType::CoalOre, 5, 0.65),
    (ItemType::Wood, 8, 0.8),
];

/// Cluster centres keep this distance from the grid edge.
const CLUSTER_PADDING: i32 = 3;
/// Clusters cover `[c - HALF, c + HALF)` on each axis.
const CLUSTER_HALF: i32 = 3;

/// Fill `tiles` for a new world. Only empty cells are written.
pub fn generate(tiles: &mut TileGrid, start: Region, seed: u64) {
    let mut rng = SimRng::new(seed);

    for (resource, count) in STARTER_PATCHES {
        for _ in 0..count {
            place_patch(tiles, start, resource, &mut rng);
        }
    }

    for (resource, count, probability) in CLUSTERS {
        let probability = Fixed64::from_num(probability);
        for _ in 0..count {
            place_cluster(tiles, start, resource, probability, &mut rng);
        }
    }
}

/// Put one tile of `resource` on a random empty cell of `area`. Returns
/// `false` if the area has no empty cell.
fn place_patch(tiles: &mut TileGrid, area: Region, resource: ItemType, rng: &mut SimRng) -> bool {
    let free: Vec<GridPosition> = (area.min_y..area.max_y)
        .flat_map(|y| (area.min_x..area.max_x).map(move |x| GridPosition::new(x, y)))
        .filter(|&p| tiles.in_bounds(p) && tiles.resource(p).is_none())
        .collect();
    if free.is_empty() {
        return false;
    }
    let pick = free[rng.below(free.len() as u64) as usize];
    tiles.set_resource(pick, Some(resource))
}

fn place_cluster(
    tiles: &mut TileGrid,
    exclude: Region,
    resource: ItemType,
    probability: Fixed64,
    rng: &mut SimRng,
) {
    let cx = rng.range_inclusive(CLUSTER_PADDING, tiles.width() as i32 - CLUSTER_PADDING - 1);
    let cy = rng.range_inclusive(CLUSTER_PADDING, tiles.height() as i32 - CLUSTER_PADDING - 1);

    for y in cy - CLUSTER_HALF..cy + CLUSTER_HALF {
        for x in cx - CLUSTER_HALF..cx + CLUSTER_HALF {
            let pos = GridPosition::new(x, y);
            if exclude.contains(pos) || !tiles.in_bounds(pos) || tiles.resource(pos).is_some() {
                continue;
            }
            if rng.chance(probability) {
                tiles.set_resource(pos, Some(resource));
            }
        }
    }
}
