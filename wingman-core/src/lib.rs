//! Wingman Core - Bounded Relation Links
//!
//! Role tags, capacity shapes, the [`Link`] relation, the deferred
//! [`Resolver`], and the entity types that own or occupy links. This crate
//! holds no I/O and never logs. Registries and persistence live in
//! `wingman-storage`; commands live in `wingman-logic`.

mod config;
mod entities;
mod error;
mod identity;
mod link;
mod resolver;
mod role;
mod shape;

pub use config::{WingmanConfig, ENV_DATA_DIR, ENV_LOG_FILTER, ENV_LOG_JSON, ENV_PRETTY_JSON};
pub use entities::{Crew, Flight, Location, Pilot, Plane, Resolvers};
pub use error::{
    ConfigError, LinkError, StorageError, ValidationError, WingmanError, WingmanResult,
};
pub use identity::{new_item_id, Assignable, EntityType, Item, ItemId};
pub use link::{Link, LinkEntry, LinkSnapshot, ResolvedContents};
pub use resolver::{ItemLookup, Resolver};
pub use role::{
    CrewLocationRole, FlightCrewRole, FlightLocationRole, FlightPilotRole, FlightPlaneRole,
    PilotLocationRole, PlaneLocationRole, RoleParseError, RoleTag,
};
pub use shape::{
    Shape, CREW_FLIGHT_SHAPE, CREW_LOCATION_SHAPE, LOCATION_FLIGHT_SHAPE, PILOT_FLIGHT_SHAPE,
    PILOT_LOCATION_SHAPE, PLANE_FLIGHT_SHAPE, PLANE_LOCATION_SHAPE, RESIDENCY_CAPACITY,
};
