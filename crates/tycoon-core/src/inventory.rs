//! Fixed-size slot inventories.
//!
//! The player inventory has 36 slots: 0..27 are main storage and 27..36 are
//! the hotbar, which is always preferred when depositing. Machine inventories
//! are small and positional (smelter `[input, fuel, output]`, assembler
//! `[in, in, in, in, out]`, lab `[pack]`).

use crate::item::{ItemStack, MAX_STACK};
use crate::registry::ItemType;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of slots in the player inventory.
pub const PLAYER_SLOTS: usize = 36;
/// Main storage slots of the player inventory.
pub const MAIN_SLOTS: Range<usize> = 0..27;
/// Hotbar slots of the player inventory.
pub const HOTBAR_SLOTS: Range<usize> = 27..36;

/// Fill policy of an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryLayout {
    /// Hotbar first, then main storage.
    Player,
    /// Plain slot order.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    layout: InventoryLayout,
}

impl Inventory {
    /// A generic inventory with `size` empty slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            layout: InventoryLayout::Generic,
        }
    }

    /// The 36-slot player inventory.
    pub fn player() -> Self {
        Self {
            slots: vec![None; PLAYER_SLOTS],
            layout: InventoryLayout::Player,
        }
    }

    pub fn layout(&self) -> InventoryLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Remove and return the whole stack in `index`.
    pub fn take_slot(&mut self, index: usize) -> Option<ItemStack> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Put `stack` into `index`, returning whatever was there. Empty stacks
    /// clear the slot. Out-of-range indices hand the stack straight back.
    pub fn replace_slot(&mut self, index: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        let stack = stack.filter(|s| s.count > 0);
        match self.slots.get_mut(index) {
            Some(slot) => std::mem::replace(slot, stack),
            None => stack,
        }
    }

    /// Raw slot access for cursor moves. Callers must not leave a
    /// zero-count stack behind.
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Option<ItemStack>> {
        self.slots.get_mut(index)
    }

    fn fill_groups(&self) -> Vec<Range<usize>> {
        match self.layout {
            InventoryLayout::Player => vec![HOTBAR_SLOTS, MAIN_SLOTS],
            InventoryLayout::Generic => vec![0..self.slots.len()],
        }
    }

    /// Deposit `count` units of `item_type`.
    ///
    /// Existing stacks of the same type are topped up first (hotbar before
    /// main storage for the player), then empty slots are filled in the same
    /// preference order, at most [`MAX_STACK`] per slot.
    ///
    /// Returns `false` when the remainder does not fit into empty slots. The
    /// top-ups made before that point are kept.
    pub fn add_item(&mut self, item_type: ItemType, mut count: u32) -> bool {
        if count == 0 {
            return true;
        }
        let groups = self.fill_groups();

        for range in &groups {
            for slot in &mut self.slots[range.clone()] {
                if let Some(stack) = slot.as_mut().filter(|s| s.item_type == item_type) {
                    let added = stack.room().min(count);
                    stack.count += added;
                    count -= added;
                    if count == 0 {
                        return true;
                    }
                }
            }
        }

        let empties: Vec<usize> = groups
            .iter()
            .flat_map(|r| r.clone())
            .filter(|&i| self.slots[i].is_none())
            .collect();
        if (empties.len() as u64) * (MAX_STACK as u64) < count as u64 {
            return false;
        }
        for i in empties {
            let placed = count.min(MAX_STACK);
            self.slots[i] = Some(ItemStack::new(item_type, placed));
            count -= placed;
            if count == 0 {
                break;
            }
        }
        true
    }

    /// Merge `stack` into `range`, topping up matching stacks first, then
    /// using empty slots. Without a range the fill order of
    /// [`Inventory::add_item`] applies. Drains `stack.count` in place;
    /// returns `true` once it reaches zero.
    pub fn add_stack(&mut self, stack: &mut ItemStack, range: Option<Range<usize>>) -> bool {
        let len = self.slots.len();
        let groups = match range {
            Some(r) => vec![r.start.min(len)..r.end.min(len)],
            None => self.fill_groups(),
        };
        if stack.count == 0 {
            return true;
        }

        for range in &groups {
            for existing in self.slots[range.clone()].iter_mut().flatten() {
                existing.absorb(stack);
                if stack.count == 0 {
                    return true;
                }
            }
        }

        for range in groups {
            for slot in &mut self.slots[range] {
                if slot.is_none() {
                    let placed = stack.count.min(MAX_STACK);
                    *slot = Some(ItemStack::new(stack.item_type, placed));
                    stack.count -= placed;
                    if stack.count == 0 {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Deposit into one specific slot only: it must be empty or hold the same
    /// type with room for all of `count`.
    pub fn add_item_to_slot(&mut self, index: usize, item_type: ItemType, count: u32) -> bool {
        if count == 0 || count > MAX_STACK {
            return false;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        match slot {
            None => {
                *slot = Some(ItemStack::new(item_type, count));
                true
            }
            Some(stack) if stack.accepts(item_type, count) => {
                stack.count += count;
                true
            }
            _ => false,
        }
    }

    /// Total units of `item_type` across all slots.
    pub fn count_items(&self, item_type: ItemType) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item_type == item_type)
            .map(|s| s.count)
            .sum()
    }

    pub fn has_items(&self, requirements: &[(ItemType, u32)]) -> bool {
        requirements
            .iter()
            .all(|&(ty, n)| self.count_items(ty) >= n)
    }

    /// Remove every requirement, or nothing at all.
    pub fn remove_items(&mut self, requirements: &[(ItemType, u32)]) -> bool {
        if !self.has_items(requirements) {
            return false;
        }
        for &(ty, n) in requirements {
            self.remove_item(ty, n);
        }
        true
    }

    /// Remove `count` units of `item_type` across slots in slot order. Removes
    /// nothing if fewer are available.
    pub fn remove_item(&mut self, item_type: ItemType, count: u32) -> bool {
        if self.count_items(item_type) < count {
            return false;
        }
        let mut remaining = count;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = slot.as_mut().filter(|s| s.item_type == item_type) {
                let take = remaining.min(stack.count);
                stack.count -= take;
                remaining -= take;
                if stack.count == 0 {
                    *slot = None;
                }
            }
        }
        true
    }

    /// Remove `count` units from one slot. Fails if the slot holds fewer.
    pub fn remove_from_slot(&mut self, index: usize, count: u32) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        let Some(stack) = slot.as_mut() else {
            return false;
        };
        if stack.count < count {
            return false;
        }
        stack.count -= count;
        if stack.count == 0 {
            *slot = None;
        }
        true
    }

    /// Empty the inventory, returning every stack in slot order.
    pub fn drain(&mut self) -> Vec<ItemStack> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}
