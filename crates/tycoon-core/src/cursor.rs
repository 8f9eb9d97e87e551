//! Player-driven slot interactions: the held cursor stack, quick transfer
//! between inventories, and picking items up off the ground.
//!
//! All moves here only relocate units. Nothing is created or destroyed, so
//! the total across cursor, inventories and entities stays constant.

use crate::error::ActionError;
use crate::fixed::Fixed64;
use crate::id::{BuildingId, GridPosition};
use crate::inventory::{HOTBAR_SLOTS, Inventory, MAIN_SLOTS};
use crate::item::ItemStack;
use crate::world::World;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An inventory slot the player can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotRef {
    Player(usize),
    Building(BuildingId, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Click {
    /// Pick up, place, merge or swap whole stacks.
    Primary,
    /// Split a stack in half, or place a single unit.
    Secondary,
}

// ---------------------------------------------------------------------------
// Slot/cursor rules
// ---------------------------------------------------------------------------

fn primary(slot: &mut Option<ItemStack>, held: &mut Option<ItemStack>) {
    if let (Some(stack), Some(cursor)) = (slot.as_mut(), held.as_mut())
        && stack.item_type == cursor.item_type
    {
        stack.absorb(cursor);
        if cursor.count == 0 {
            *held = None;
        }
        return;
    }
    // Pick up, put down, or exchange.
    std::mem::swap(slot, held);
}

fn secondary(slot: &mut Option<ItemStack>, held: &mut Option<ItemStack>) {
    match (slot.as_mut(), held.as_mut()) {
        (None, None) => {}
        (Some(stack), None) => {
            let half = stack.count / 2;
            if half > 0 {
                *held = Some(ItemStack::new(stack.item_type, stack.count - half));
                stack.count = half;
            }
        }
        (None, Some(cursor)) => {
            *slot = Some(ItemStack::new(cursor.item_type, 1));
            cursor.count -= 1;
        }
        (Some(stack), Some(cursor)) => {
            if stack.accepts(cursor.item_type, 1) {
                stack.count += 1;
                cursor.count -= 1;
            }
        }
    }
    if held.as_ref().is_some_and(|c| c.count == 0) {
        *held = None;
    }
}

// ---------------------------------------------------------------------------
// World actions
// ---------------------------------------------------------------------------

impl World {
    /// The stack on the cursor.
    pub fn held_stack(&self) -> Option<&ItemStack> {
        self.held.as_ref()
    }

    fn slot_inventory(&mut self, slot: SlotRef) -> Result<(&mut Inventory, usize), ActionError> {
        match slot {
            SlotRef::Player(index) => Ok((&mut self.player, index)),
            SlotRef::Building(id, index) => {
                let inventory = self
                    .buildings
                    .get_mut(id)
                    .and_then(|b| b.inventory_mut())
                    .ok_or(ActionError::NoBuilding)?;
                Ok((inventory, index))
            }
        }
    }

    /// Click an inventory slot with the cursor.
    pub fn click_slot(&mut self, slot: SlotRef, click: Click) -> Result<(), ActionError> {
        let mut held = self.held.take();
        let result = self.slot_inventory(slot).and_then(|(inventory, index)| {
            let cell = inventory.slot_mut(index).ok_or(ActionError::OutOfBounds)?;
            match click {
                Click::Primary => primary(cell, &mut held),
                Click::Secondary => secondary(cell, &mut held),
            }
            Ok(())
        });
        self.held = held;
        result
    }

    /// Move a whole slot to the other side in one action.
    ///
    /// With a building open, player stacks go into the building's input
    /// ports and building stacks go anywhere in the player inventory.
    /// Without one, stacks move between main storage and the hotbar. Whatever
    /// does not fit stays in the source slot. Returns the units moved.
    pub fn quick_transfer(&mut self, slot: SlotRef, open: Option<BuildingId>) -> Result<u32, ActionError> {
        let (source, index) = self.slot_inventory(slot)?;
        let Some(mut stack) = source.take_slot(index) else {
            return Ok(0);
        };
        let before = stack.count;

        match (slot, open) {
            (SlotRef::Player(_), Some(id)) => {
                let building = self.buildings.get_mut(id);
                if let Some(building) = building
                    && let Some(ports) = building.input_ports()
                    && let Some(inventory) = building.inventory_mut()
                {
                    inventory.add_stack(&mut stack, Some(ports));
                }
            }
            (SlotRef::Building(..), _) => {
                self.player.add_stack(&mut stack, None);
            }
            (SlotRef::Player(i), None) => {
                let range = if MAIN_SLOTS.contains(&i) {
                    Some(HOTBAR_SLOTS)
                } else if HOTBAR_SLOTS.contains(&i) {
                    Some(MAIN_SLOTS)
                } else {
                    None
                };
                if let Some(range) = range {
                    self.player.add_stack(&mut stack, Some(range));
                }
            }
        }

        let moved = before - stack.count;
        if stack.count > 0 {
            let (source, index) = self.slot_inventory(slot)?;
            source.replace_slot(index, Some(stack));
        }
        Ok(moved)
    }

    /// Put the cursor stack back into the player inventory. Overflow is
    /// dropped as item entities at the centre of the unlocked region; what
    /// the entity cap refuses stays on the cursor. Returns the units dropped.
    pub fn return_held(&mut self) -> u32 {
        let Some(mut stack) = self.held.take() else {
            return 0;
        };
        if self.player.add_stack(&mut stack, None) {
            return 0;
        }

        let center = self.region.center();
        let mut dropped = 0;
        while stack.count > 0 && self.items.spawn(stack.item_type, center) {
            stack.count -= 1;
            dropped += 1;
        }
        if stack.count > 0 {
            debug!(left = stack.count, "entity cap reached while dropping held stack");
            self.held = Some(stack);
        }
        dropped
    }

    /// Collect every item entity within `radius` cells of the point
    /// `(x, y)` into the player inventory. The point must lie in the
    /// unlocked region. Returns the units collected.
    pub fn pickup_items(&mut self, x: Fixed64, y: Fixed64, radius: Fixed64) -> u32 {
        let cell = GridPosition::new(x.saturating_to_num(), y.saturating_to_num());
        if !self.region.contains(cell) {
            return 0;
        }

        let half = Fixed64::from_num(0.5);
        let reach = radius.saturating_mul(radius);
        let mut taken = Vec::new();
        for (index, entity) in self.items.iter().enumerate() {
            let (ex, ey) = entity.render_position();
            let dx = ex + half - x;
            let dy = ey + half - y;
            if dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)) > reach {
                continue;
            }
            if self.player.add_item(entity.item_type, 1) {
                taken.push(index);
            }
        }
        self.items.remove_indices(&taken);
        taken.len() as u32
    }
}
