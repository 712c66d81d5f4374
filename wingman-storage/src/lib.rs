//! Wingman Storage - Registries and JSON Persistence
//!
//! [`ItemManager`] is the in-memory registry links resolve against,
//! [`Model`] groups one registry per entity type, and [`JsonStorage`] saves
//! and loads a model as one JSON file per registry.

mod json;
mod manager;
mod model;

pub use json::{FlightRecord, JsonStorage, LocationRecord, RegistryFile};
pub use manager::ItemManager;
pub use model::{Model, ModelHandle};
