//! Tile grid, unlocked region, and the cell -> building placement index.
//!
//! Multi-cell buildings register every covered cell in the
//! [`PlacementIndex`], all pointing at the same [`BuildingId`].

use crate::id::{BuildingId, GridPosition};
use crate::registry::ItemType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Footprint
// ---------------------------------------------------------------------------

/// The size of a building on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A 1x1 building.
    pub fn single() -> Self {
        Self::new(1, 1)
    }

    /// Iterate over all cells covered by this footprint at `origin`
    /// (top-left corner), row by row.
    pub fn tiles(&self, origin: GridPosition) -> impl Iterator<Item = GridPosition> + use<> {
        let w = self.width as i32;
        let h = self.height as i32;
        let (ox, oy) = (origin.x, origin.y);
        (0..h).flat_map(move |dy| (0..w).map(move |dx| GridPosition::new(ox + dx, oy + dy)))
    }

    pub fn covers(&self, origin: GridPosition, cell: GridPosition) -> bool {
        cell.x >= origin.x
            && cell.y >= origin.y
            && cell.x < origin.x + self.width as i32
            && cell.y < origin.y + self.height as i32
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Half-open rectangle `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Region {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A `size x size` square centred in a `width x height` grid.
    pub fn centered(width: u32, height: u32, size: u32) -> Self {
        let min_x = (width as i32 - size as i32) / 2;
        let min_y = (height as i32 - size as i32) / 2;
        Self::new(min_x, min_y, min_x + size as i32, min_y + size as i32)
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        self.min_x <= pos.x && pos.x < self.max_x && self.min_y <= pos.y && pos.y < self.max_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Integer centre cell.
    pub fn center(&self) -> GridPosition {
        GridPosition::new((self.min_x + self.max_x) / 2, (self.min_y + self.max_y) / 2)
    }

    /// Grow by `by` cells per axis: half on the low side, the remainder on
    /// the high side, clamped to `bounds`.
    pub fn expand(&mut self, by: i32, bounds: Region) {
        let low = by / 2;
        let high = by - low;
        self.min_x = (self.min_x - low).max(bounds.min_x);
        self.min_y = (self.min_y - low).max(bounds.min_y);
        self.max_x = (self.max_x + high).min(bounds.max_x);
        self.max_y = (self.max_y + high).min(bounds.max_y);
    }
}

// ---------------------------------------------------------------------------
// Tile grid
// ---------------------------------------------------------------------------

/// The resource layer. Each cell optionally holds an inexhaustible raw
/// resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Option<ItemType>>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole grid as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        self.bounds().contains(pos)
    }

    fn index(&self, pos: GridPosition) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Resource at `pos`; `None` for empty or out-of-bounds cells.
    pub fn resource(&self, pos: GridPosition) -> Option<ItemType> {
        self.index(pos).and_then(|i| self.tiles[i])
    }

    /// Set or clear a resource. Returns `false` for out-of-bounds cells.
    pub fn set_resource(&mut self, pos: GridPosition, resource: Option<ItemType>) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.tiles[i] = resource;
                true
            }
            None => false,
        }
    }

    /// Number of cells holding `resource`.
    pub fn count(&self, resource: ItemType) -> usize {
        self.tiles.iter().filter(|t| **t == Some(resource)).count()
    }
}

// ---------------------------------------------------------------------------
// Placement index
// ---------------------------------------------------------------------------

/// Maps every occupied cell to the building covering it.
#[derive(Debug, Clone, Default)]
pub struct PlacementIndex {
    cells: BTreeMap<GridPosition, BuildingId>,
}

impl PlacementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: GridPosition) -> Option<BuildingId> {
        self.cells.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: GridPosition) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Whether any cell of the footprint is taken.
    pub fn overlaps(&self, footprint: Footprint, origin: GridPosition) -> bool {
        footprint.tiles(origin).any(|p| self.is_occupied(p))
    }

    pub fn insert(&mut self, footprint: Footprint, origin: GridPosition, id: BuildingId) {
        for pos in footprint.tiles(origin) {
            self.cells.insert(pos, id);
        }
    }

    pub fn remove(&mut self, footprint: Footprint, origin: GridPosition) {
        for pos in footprint.tiles(origin) {
            self.cells.remove(&pos);
        }
    }

    /// Number of occupied cells (not buildings).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, BuildingId)> + '_ {
        self.cells.iter().map(|(p, id)| (*p, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn footprint_tiles_row_major() {
        let tiles: Vec<_> = Footprint::new(2, 2).tiles(GridPosition::new(5, 7)).collect();
        assert_eq!(
            tiles,
            vec![
                GridPosition::new(5, 7),
                GridPosition::new(6, 7),
                GridPosition::new(5, 8),
                GridPosition::new(6, 8),
            ]
        );
        assert!(Footprint::new(2, 2).covers(GridPosition::new(5, 7), GridPosition::new(6, 8)));
        assert!(!Footprint::new(2, 2).covers(GridPosition::new(5, 7), GridPosition::new(7, 8)));
    }

    #[test]
    fn centered_region() {
        let r = Region::centered(64, 64, 9);
        assert_eq!(r, Region::new(27, 27, 36, 36));
        assert_eq!(r.width(), 9);
        assert!(r.contains(GridPosition::new(27, 35)));
        assert!(!r.contains(GridPosition::new(36, 30)));
    }

    #[test]
    fn expand_splits_odd_growth() {
        let bounds = Region::new(0, 0, 64, 64);
        let mut r = Region::new(27, 27, 36, 36);
        r.expand(3, bounds);
        assert_eq!(r, Region::new(26, 26, 38, 38));
    }

    #[test]
    fn expand_clamps_to_bounds() {
        let bounds = Region::new(0, 0, 10, 10);
        let mut r = Region::new(1, 1, 9, 9);
        r.expand(6, bounds);
        assert_eq!(r, bounds);
    }

    #[test]
    fn tile_grid_bounds() {
        let mut grid = TileGrid::new(4, 3);
        assert!(grid.set_resource(GridPosition::new(3, 2), Some(ItemType::Wood)));
        assert!(!grid.set_resource(GridPosition::new(4, 0), Some(ItemType::Wood)));
        assert_eq!(grid.resource(GridPosition::new(3, 2)), Some(ItemType::Wood));
        assert_eq!(grid.resource(GridPosition::new(-1, 0)), None);
        assert_eq!(grid.count(ItemType::Wood), 1);
    }

    #[test]
    fn placement_index_shares_id_across_cells() {
        let mut arena: SlotMap<BuildingId, ()> = SlotMap::with_key();
        let id = arena.insert(());
        let mut index = PlacementIndex::new();
        let origin = GridPosition::new(2, 2);
        index.insert(Footprint::new(2, 2), origin, id);

        assert_eq!(index.len(), 4);
        assert_eq!(index.get(GridPosition::new(3, 3)), Some(id));
        assert!(index.overlaps(Footprint::single(), GridPosition::new(3, 2)));
        assert!(!index.overlaps(Footprint::single(), GridPosition::new(4, 2)));

        index.remove(Footprint::new(2, 2), origin);
        assert!(index.is_empty());
    }
}
