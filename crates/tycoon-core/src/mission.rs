//! Mission progression.
//!
//! Missions move `Pending -> Ready -> Completed` and never back. Readiness is
//! re-checked every tick against the player inventory and stays set once
//! reached; completion is a player action that pays the requirements.

use crate::error::ActionError;
use crate::inventory::Inventory;
use crate::registry::{MissionDef, MissionId, registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Pending,
    Ready,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionBook {
    status: BTreeMap<MissionId, MissionStatus>,
    /// Missions shown to the player, in unlock order. Completed ones leave.
    available: Vec<MissionId>,
    /// Set while any available mission is ready to hand in.
    alert: bool,
}

impl Default for MissionBook {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionBook {
    /// A fresh book with only the first mission available.
    pub fn new() -> Self {
        Self {
            status: BTreeMap::from([(MissionId::StartUp, MissionStatus::Pending)]),
            available: vec![MissionId::StartUp],
            alert: false,
        }
    }

    /// `None` for missions not yet unlocked.
    pub fn status(&self, id: MissionId) -> Option<MissionStatus> {
        self.status.get(&id).copied()
    }

    pub fn available(&self) -> &[MissionId] {
        &self.available
    }

    pub fn alert(&self) -> bool {
        self.alert
    }

    /// Promote pending missions the inventory now satisfies and recompute
    /// the alert flag. Returns the missions that became ready.
    pub fn update(&mut self, inventory: &Inventory) -> Vec<MissionId> {
        let mut newly_ready = Vec::new();
        let mut alert = false;
        for &id in &self.available {
            let status = self.status.entry(id).or_insert(MissionStatus::Pending);
            match status {
                MissionStatus::Completed => {}
                MissionStatus::Ready => alert = true,
                MissionStatus::Pending => {
                    if inventory.has_items(&registry().mission(id).requirements) {
                        *status = MissionStatus::Ready;
                        newly_ready.push(id);
                        alert = true;
                    }
                }
            }
        }
        self.alert = alert;
        newly_ready
    }

    /// Hand in a ready mission: take its requirements from `inventory`, mark
    /// it completed and unlock its successors. Rewards are applied by the
    /// caller from the returned definition.
    pub fn complete(
        &mut self,
        id: MissionId,
        inventory: &mut Inventory,
    ) -> Result<&'static MissionDef, ActionError> {
        if self.status(id) != Some(MissionStatus::Ready) {
            return Err(ActionError::MissionNotReady);
        }
        let def = registry().mission(id);
        if !inventory.remove_items(&def.requirements) {
            return Err(ActionError::MissingItems);
        }

        self.status.insert(id, MissionStatus::Completed);
        self.available.retain(|m| *m != id);
        for &next in &def.unlocks {
            if !self.status.contains_key(&next) {
                self.status.insert(next, MissionStatus::Pending);
                self.available.push(next);
            }
        }
        Ok(def)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MissionId, MissionStatus)> + '_ {
        self.status.iter().map(|(id, s)| (*id, *s))
    }
}
