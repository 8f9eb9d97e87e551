//! Economy actions: buying from the shop, upgrades, selling from the player
//! inventory.

use crate::error::ActionError;
use crate::event::Event;
use crate::fixed::Fixed64;
use crate::registry::{ItemType, registry};
use crate::world::World;
use tracing::{debug, info};

impl World {
    fn can_afford(&self, cost: u32) -> bool {
        self.money >= Fixed64::saturating_from_num(cost)
    }

    /// Buy one unit of a shop item into the player inventory. Upgrades are
    /// forwarded to [`World::buy_upgrade`].
    pub fn buy_item(&mut self, item: ItemType) -> Result<(), ActionError> {
        let reg = registry();
        if !reg.shop().contains(&item) {
            return Err(ActionError::NotInShop);
        }
        if let Some(tech) = reg.tech_gate(item)
            && !self.research.is_unlocked(tech)
        {
            debug!(?item, ?tech, "purchase rejected: locked");
            return Err(ActionError::TechLocked(tech));
        }
        let def = item.def();
        if def.is_upgrade {
            return self.buy_upgrade(item);
        }
        if !self.can_afford(def.cost) {
            return Err(ActionError::InsufficientFunds);
        }
        if !self.player.add_item(item, 1) {
            return Err(ActionError::InventoryFull);
        }
        self.money -= Fixed64::saturating_from_num(def.cost);
        debug!(?item, cost = def.cost, "item bought");
        Ok(())
    }

    /// Buy a passive-income upgrade. Each upgrade can be bought once.
    pub fn buy_upgrade(&mut self, item: ItemType) -> Result<(), ActionError> {
        let def = item.def();
        if !def.is_upgrade {
            return Err(ActionError::NotUpgrade);
        }
        if self.purchased_upgrades.contains(&item) {
            return Err(ActionError::AlreadyPurchased);
        }
        if !self.can_afford(def.cost) {
            return Err(ActionError::InsufficientFunds);
        }

        self.money -= Fixed64::saturating_from_num(def.cost);
        self.purchased_upgrades.insert(item);
        self.passive_income_per_sec = self.passive_income_per_sec.saturating_add(def.passive_income);
        info!(?item, income = self.passive_income_per_sec, "upgrade purchased");
        self.events.emit(Event::UpgradePurchased {
            item_type: item,
            tick: self.sim.tick,
        });
        Ok(())
    }

    /// Sell one unit from the player inventory at its item value.
    pub fn sell_item(&mut self, item: ItemType) -> Result<(), ActionError> {
        let def = item.def();
        if def.is_building || def.is_upgrade {
            return Err(ActionError::NotSellable);
        }
        if !self.player.remove_item(item, 1) {
            return Err(ActionError::MissingItems);
        }
        self.credit(def.value);
        self.events.emit(Event::ItemSold {
            item_type: item,
            quantity: 1,
            tick: self.sim.tick,
        });
        Ok(())
    }

    /// Sell every non-building stack in the player inventory. Returns the
    /// total credited.
    pub fn sell_all(&mut self) -> u64 {
        let tick = self.sim.tick;
        let mut total = 0u64;
        for index in 0..self.player.len() {
            let Some(stack) = self.player.slot(index) else {
                continue;
            };
            let def = stack.item_type.def();
            if def.is_building || def.is_upgrade {
                continue;
            }
            let Some(stack) = self.player.take_slot(index) else {
                continue;
            };
            let value = def.value.saturating_mul(stack.count);
            self.credit(value);
            total += u64::from(value);
            self.events.emit(Event::ItemSold {
                item_type: stack.item_type,
                quantity: stack.count,
                tick,
            });
        }
        if total > 0 {
            debug!(total, "inventory sold");
        }
        total
    }
}
