//! Global research slot.
//!
//! One technology is researched at a time. Labs feed
//! [`ResearchState::progress`]; the world calls [`ResearchState::complete`]
//! once progress reaches the tech's cost.

use crate::error::ActionError;
use crate::event::{Event, EventBus};
use crate::fixed::Ticks;
use crate::registry::{TechId, registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchState {
    unlocked: BTreeSet<TechId>,
    current: Option<TechId>,
    /// Science packs consumed toward `current`.
    progress: u32,
}

impl ResearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, tech: TechId) -> bool {
        self.unlocked.contains(&tech)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = TechId> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn current(&self) -> Option<TechId> {
        self.current
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Cost of the active tech, if any.
    pub fn target(&self) -> Option<u32> {
        self.current.map(|t| registry().tech(t).cost)
    }

    /// Whether the active tech has accumulated its full cost.
    pub fn is_finished(&self) -> bool {
        self.target().is_some_and(|cost| self.progress >= cost)
    }

    /// Make `tech` the active research. Prerequisites are not checked here.
    pub fn start(&mut self, tech: TechId) -> Result<(), ActionError> {
        if self.is_unlocked(tech) {
            return Err(ActionError::AlreadyUnlocked);
        }
        if self.current == Some(tech) {
            return Err(ActionError::AlreadyResearching);
        }
        self.current = Some(tech);
        self.progress = 0;
        Ok(())
    }

    /// One science pack consumed.
    pub(crate) fn add_point(&mut self) {
        if self.current.is_some() {
            self.progress += 1;
        }
    }

    /// Move the active tech into the unlocked set.
    pub fn complete(&mut self) -> Option<TechId> {
        let tech = self.current.take()?;
        self.unlocked.insert(tech);
        self.progress = 0;
        Some(tech)
    }

    /// [`complete`](Self::complete), announcing the result.
    pub(crate) fn finish(&mut self, events: &mut EventBus, tick: Ticks) -> Option<TechId> {
        let tech = self.complete()?;
        tracing::info!(?tech, tick, "research completed");
        events.emit(Event::ResearchCompleted { tech, tick });
        Some(tech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_rejects_unlocked_and_active() {
        let mut r = ResearchState::new();
        r.start(TechId::Logistics).unwrap();
        assert_eq!(r.start(TechId::Logistics), Err(ActionError::AlreadyResearching));
        r.complete();
        assert_eq!(r.start(TechId::Logistics), Err(ActionError::AlreadyUnlocked));
    }

    #[test]
    fn switching_tech_resets_progress() {
        let mut r = ResearchState::new();
        r.start(TechId::Logistics).unwrap();
        r.add_point();
        r.add_point();
        r.start(TechId::Mining).unwrap();
        assert_eq!(r.progress(), 0);
        assert_eq!(r.current(), Some(TechId::Mining));
    }

    #[test]
    fn finishes_at_cost() {
        let mut r = ResearchState::new();
        r.start(TechId::Logistics).unwrap();
        for _ in 0..9 {
            r.add_point();
        }
        assert!(!r.is_finished());
        r.add_point();
        assert!(r.is_finished());
        assert_eq!(r.complete(), Some(TechId::Logistics));
        assert!(r.is_unlocked(TechId::Logistics));
        assert_eq!(r.current(), None);
        assert_eq!(r.progress(), 0);
    }

    #[test]
    fn points_without_research_are_ignored() {
        let mut r = ResearchState::new();
        r.add_point();
        assert_eq!(r.progress(), 0);
        assert_eq!(r.complete(), None);
    }
}
