use crate::registry::{RegistryError, TechId};

/// Why a player or collaborator action was rejected.
///
/// A rejected action leaves the world unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("position is outside the world")]
    OutOfBounds,
    #[error("position is outside the unlocked region")]
    Locked,
    #[error("cell is already occupied")]
    Occupied,
    #[error("no building at position")]
    NoBuilding,
    #[error("item cannot be placed as a building")]
    NotPlaceable,
    #[error("not enough money")]
    InsufficientFunds,
    #[error("inventory is full")]
    InventoryFull,
    #[error("required items are missing")]
    MissingItems,
    #[error("item is not sold in the shop")]
    NotInShop,
    #[error("item requires research {0:?}")]
    TechLocked(TechId),
    #[error("upgrade already purchased")]
    AlreadyPurchased,
    #[error("item is not an upgrade")]
    NotUpgrade,
    #[error("technology already unlocked")]
    AlreadyUnlocked,
    #[error("research already in progress")]
    AlreadyResearching,
    #[error("prerequisite technology is not unlocked")]
    PrerequisiteMissing,
    #[error("mission is not ready")]
    MissionNotReady,
    #[error("building has no recipe slot")]
    NoRecipeSlot,
    #[error("not an assembler recipe")]
    InvalidRecipe,
    #[error("item cannot be sold")]
    NotSellable,
    #[error("item is not a raw resource")]
    NotRawResource,
}

/// Errors raised while building a world from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("game tables are invalid: {0}")]
    Registry(&'static RegistryError),
}
