use crate::registry::ItemType;
use serde::{Deserialize, Serialize};

/// Maximum number of units in one inventory slot.
pub const MAX_STACK: u32 = 64;

/// A quantity of one item type held in an inventory slot.
///
/// A stack with a zero count never sits in a slot; inventories clear the slot
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_type: ItemType,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item_type: ItemType, count: u32) -> Self {
        Self { item_type, count }
    }

    /// Units that can still be stacked on top.
    pub fn room(&self) -> u32 {
        MAX_STACK.saturating_sub(self.count)
    }

    pub fn is_full(&self) -> bool {
        self.count >= MAX_STACK
    }

    /// Whether `count` more units of `item_type` fit on this stack.
    pub fn accepts(&self, item_type: ItemType, count: u32) -> bool {
        self.item_type == item_type && self.count + count <= MAX_STACK
    }

    /// Move as many units as fit from `other` onto this stack. Returns the
    /// number moved.
    pub fn absorb(&mut self, other: &mut ItemStack) -> u32 {
        if other.item_type != self.item_type {
            return 0;
        }
        let moved = self.room().min(other.count);
        self.count += moved;
        other.count -= moved;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_and_full() {
        let mut stack = ItemStack::new(ItemType::IronOre, 60);
        assert_eq!(stack.room(), 4);
        assert!(!stack.is_full());
        stack.count = MAX_STACK;
        assert!(stack.is_full());
        assert_eq!(stack.room(), 0);
    }

    #[test]
    fn accepts_same_type_with_room() {
        let stack = ItemStack::new(ItemType::Wood, 63);
        assert!(stack.accepts(ItemType::Wood, 1));
        assert!(!stack.accepts(ItemType::Wood, 2));
        assert!(!stack.accepts(ItemType::CoalOre, 1));
    }

    #[test]
    fn absorb_moves_up_to_cap() {
        let mut a = ItemStack::new(ItemType::IronIngot, 50);
        let mut b = ItemStack::new(ItemType::IronIngot, 20);
        assert_eq!(a.absorb(&mut b), 14);
        assert_eq!(a.count, 64);
        assert_eq!(b.count, 6);

        let mut c = ItemStack::new(ItemType::CopperIngot, 5);
        assert_eq!(b.absorb(&mut c), 0);
    }
}
