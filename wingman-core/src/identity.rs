//! Identity types for Wingman entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable string identifier of an item. Links store these, never references.
pub type ItemId = String;

/// Generate a new random item identifier.
pub fn new_item_id() -> ItemId {
    Uuid::new_v4().to_string()
}

/// Entity type discriminator used in errors and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Pilot,
    Crew,
    Plane,
    Flight,
    Location,
}

impl EntityType {
    /// Lowercase plural name, used for data file names.
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityType::Pilot => "pilots",
            EntityType::Crew => "crew",
            EntityType::Plane => "planes",
            EntityType::Flight => "flights",
            EntityType::Location => "locations",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Anything that can occupy a link slot or live in a registry.
pub trait Item {
    /// Entity type of this item.
    const ENTITY_TYPE: EntityType;

    /// Stable unique identifier.
    fn id(&self) -> &str;

    /// Human-readable label for display.
    fn label(&self) -> String;
}

/// Targets that carry an availability flag toggled by link commands.
pub trait Assignable: Item {
    fn is_available(&self) -> bool;

    fn set_available(&mut self, available: bool);
}
