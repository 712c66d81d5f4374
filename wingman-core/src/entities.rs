//! Entity types
//!
//! Targets (`Pilot`, `Crew`, `Plane`) are plain records with an availability
//! flag. Owners (`Flight`, `Location`) hold one [`Link`] per relation they
//! take part in. A `Location` is both an owner (residents) and a target
//! (flight endpoints).

use crate::{
    new_item_id, Assignable, CrewLocationRole, EntityType, FlightCrewRole, FlightLocationRole,
    FlightPilotRole, FlightPlaneRole, Item, ItemId, Link, PilotLocationRole, PlaneLocationRole,
    Resolver, CREW_FLIGHT_SHAPE, CREW_LOCATION_SHAPE, LOCATION_FLIGHT_SHAPE, PILOT_FLIGHT_SHAPE,
    PILOT_LOCATION_SHAPE, PLANE_FLIGHT_SHAPE, PLANE_LOCATION_SHAPE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// TARGETS
// ============================================================================

/// A pilot that can be seated on flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pilot {
    pub id: ItemId,
    pub name: String,
    pub available: bool,
}

impl Pilot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            available: true,
        }
    }
}

/// A cabin crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: ItemId,
    pub name: String,
    pub available: bool,
}

impl Crew {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            available: true,
        }
    }
}

/// An aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plane {
    pub id: ItemId,
    pub model: String,
    pub available: bool,
}

impl Plane {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            model: model.into(),
            available: true,
        }
    }
}

macro_rules! assignable_item {
    ($ty:ident, $entity:expr, $label:ident) => {
        impl Item for $ty {
            const ENTITY_TYPE: EntityType = $entity;

            fn id(&self) -> &str {
                &self.id
            }

            fn label(&self) -> String {
                self.$label.clone()
            }
        }

        impl Assignable for $ty {
            fn is_available(&self) -> bool {
                self.available
            }

            fn set_available(&mut self, available: bool) {
                self.available = available;
            }
        }
    };
}

assignable_item!(Pilot, EntityType::Pilot, name);
assignable_item!(Crew, EntityType::Crew, name);
assignable_item!(Plane, EntityType::Plane, model);

// ============================================================================
// RESOLVERS
// ============================================================================

/// One deferred resolver per target registry.
///
/// Owners receive this when they are created or rebuilt, so every link they
/// hold resolves against the same registries.
#[derive(Debug, Clone)]
pub struct Resolvers {
    pub pilots: Resolver<Pilot>,
    pub crew: Resolver<Crew>,
    pub planes: Resolver<Plane>,
    pub locations: Resolver<Location>,
}

impl Resolvers {
    /// Resolvers that never resolve anything.
    pub fn detached() -> Self {
        Self {
            pilots: Resolver::detached(),
            crew: Resolver::detached(),
            planes: Resolver::detached(),
            locations: Resolver::detached(),
        }
    }
}

// ============================================================================
// OWNERS
// ============================================================================

/// A scheduled flight and everything assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub id: ItemId,
    pub code: String,
    pub pilot_link: Link<FlightPilotRole, Pilot>,
    pub crew_link: Link<FlightCrewRole, Crew>,
    pub plane_link: Link<FlightPlaneRole, Plane>,
    pub location_link: Link<FlightLocationRole, Location>,
}

impl Flight {
    /// A new flight with a fresh id and empty links.
    pub fn new(code: impl Into<String>, resolvers: &Resolvers) -> Self {
        Self::with_id(new_item_id(), code, resolvers)
    }

    pub fn with_id(id: impl Into<ItemId>, code: impl Into<String>, resolvers: &Resolvers) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            pilot_link: Link::new(&PILOT_FLIGHT_SHAPE, resolvers.pilots.clone()),
            crew_link: Link::new(&CREW_FLIGHT_SHAPE, resolvers.crew.clone()),
            plane_link: Link::new(&PLANE_FLIGHT_SHAPE, resolvers.planes.clone()),
            location_link: Link::new(&LOCATION_FLIGHT_SHAPE, resolvers.locations.clone()),
        }
    }

    pub fn plane(&self) -> Option<Arc<Plane>> {
        self.plane_link.resolve_first(FlightPlaneRole::PlaneUsing)
    }

    pub fn departure(&self) -> Option<Arc<Location>> {
        self.location_link
            .resolve_first(FlightLocationRole::LocationDeparture)
    }

    pub fn arrival(&self) -> Option<Arc<Location>> {
        self.location_link
            .resolve_first(FlightLocationRole::LocationArrival)
    }

    /// Whether `id` occupies any slot of any link on this flight.
    pub fn holds(&self, id: &str) -> bool {
        !self.pilot_link.roles_of(id).is_empty()
            || !self.crew_link.roles_of(id).is_empty()
            || !self.plane_link.roles_of(id).is_empty()
            || !self.location_link.roles_of(id).is_empty()
    }

    /// Remove `id` from every link this flight holds.
    pub fn purge(&mut self, id: &str) -> usize {
        self.pilot_link.purge(id)
            + self.crew_link.purge(id)
            + self.plane_link.purge(id)
            + self.location_link.purge(id)
    }
}

impl Item for Flight {
    const ENTITY_TYPE: EntityType = EntityType::Flight;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.code.clone()
    }
}

/// An airport or base. Residents are linked here; flights link to it as an
/// endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: ItemId,
    pub name: String,
    pub crew_link: Link<CrewLocationRole, Crew>,
    pub pilot_link: Link<PilotLocationRole, Pilot>,
    pub plane_link: Link<PlaneLocationRole, Plane>,
}

impl Location {
    pub fn new(name: impl Into<String>, resolvers: &Resolvers) -> Self {
        Self::with_id(new_item_id(), name, resolvers)
    }

    pub fn with_id(id: impl Into<ItemId>, name: impl Into<String>, resolvers: &Resolvers) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            crew_link: Link::new(&CREW_LOCATION_SHAPE, resolvers.crew.clone()),
            pilot_link: Link::new(&PILOT_LOCATION_SHAPE, resolvers.pilots.clone()),
            plane_link: Link::new(&PLANE_LOCATION_SHAPE, resolvers.planes.clone()),
        }
    }

    pub fn holds(&self, id: &str) -> bool {
        !self.crew_link.roles_of(id).is_empty()
            || !self.pilot_link.roles_of(id).is_empty()
            || !self.plane_link.roles_of(id).is_empty()
    }

    pub fn purge(&mut self, id: &str) -> usize {
        self.crew_link.purge(id) + self.pilot_link.purge(id) + self.plane_link.purge(id)
    }
}

impl Item for Location {
    const ENTITY_TYPE: EntityType = EntityType::Location;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
