//! The set of registries that make up one Wingman data set.

use crate::ItemManager;
use std::sync::{Arc, OnceLock};
use tracing::debug;
use wingman_core::{
    Crew, Flight, Item, ItemLookup, Location, Pilot, Plane, Resolver, Resolvers, StorageError,
};

/// One registry per entity type.
#[derive(Debug, Default)]
pub struct Model {
    pilots: Arc<ItemManager<Pilot>>,
    crew: Arc<ItemManager<Crew>>,
    planes: Arc<ItemManager<Plane>>,
    flights: Arc<ItemManager<Flight>>,
    locations: Arc<ItemManager<Location>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pilots(&self) -> &Arc<ItemManager<Pilot>> {
        &self.pilots
    }

    pub fn crew(&self) -> &Arc<ItemManager<Crew>> {
        &self.crew
    }

    pub fn planes(&self) -> &Arc<ItemManager<Plane>> {
        &self.planes
    }

    pub fn flights(&self) -> &Arc<ItemManager<Flight>> {
        &self.flights
    }

    pub fn locations(&self) -> &Arc<ItemManager<Location>> {
        &self.locations
    }

    /// Resolvers bound directly to this model's registries.
    pub fn resolvers(&self) -> Resolvers {
        Resolvers {
            pilots: ready(&self.pilots),
            crew: ready(&self.crew),
            planes: ready(&self.planes),
            locations: ready(&self.locations),
        }
    }

    // ========================================================================
    // DELETION
    // ========================================================================
    //
    // Deleting a target also purges its id from every owner link so no
    // dangling id survives in the model.

    pub fn delete_pilot(&self, id: &str) -> Result<Arc<Pilot>, StorageError> {
        let removed = self.pilots.remove(id)?;
        self.purge_from_owners(id);
        Ok(removed)
    }

    pub fn delete_crew(&self, id: &str) -> Result<Arc<Crew>, StorageError> {
        let removed = self.crew.remove(id)?;
        self.purge_from_owners(id);
        Ok(removed)
    }

    pub fn delete_plane(&self, id: &str) -> Result<Arc<Plane>, StorageError> {
        let removed = self.planes.remove(id)?;
        self.purge_from_owners(id);
        Ok(removed)
    }

    pub fn delete_location(&self, id: &str) -> Result<Arc<Location>, StorageError> {
        let removed = self.locations.remove(id)?;
        self.purge_from_owners(id);
        Ok(removed)
    }

    pub fn delete_flight(&self, id: &str) -> Result<Arc<Flight>, StorageError> {
        self.flights.remove(id)
    }

    /// Remove `id` from every flight and location link. Returns the number of
    /// slots cleared.
    pub fn purge_from_owners(&self, id: &str) -> usize {
        let mut cleared = 0;
        for flight in self.flights.items() {
            if flight.holds(id) {
                cleared += self.flights.update(flight.id(), |f| f.purge(id)).unwrap_or(0);
            }
        }
        for location in self.locations.items() {
            if location.holds(id) {
                cleared += self
                    .locations
                    .update(location.id(), |l| l.purge(id))
                    .unwrap_or(0);
            }
        }
        debug!(id, cleared, "purged id from owner links");
        cleared
    }
}

fn ready<T>(registry: &Arc<ItemManager<T>>) -> Resolver<T>
where
    T: Item + Clone + Send + Sync + 'static,
{
    let lookup: Arc<dyn ItemLookup<T>> = registry.clone();
    Resolver::ready(lookup)
}

// ============================================================================
// MODEL HANDLE
// ============================================================================

/// Shared slot for a [`Model`] that may not exist yet.
///
/// Owners loaded from disk are rebuilt with [`ModelHandle::resolvers`], which
/// look the model up only when first asked to resolve an id. The model is
/// installed once every registry is populated.
#[derive(Debug, Clone, Default)]
pub struct ModelHandle {
    cell: Arc<OnceLock<Arc<Model>>>,
}

impl ModelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the model. Only the first call succeeds.
    pub fn install(&self, model: Arc<Model>) -> Result<(), StorageError> {
        self.cell
            .set(model)
            .map_err(|_| StorageError::ModelAlreadyInstalled)
    }

    pub fn get(&self) -> Option<&Arc<Model>> {
        self.cell.get()
    }

    pub fn model(&self) -> Result<&Arc<Model>, StorageError> {
        self.get().ok_or(StorageError::ModelNotReady)
    }

    pub fn is_installed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Deferred resolvers reaching the registries through this handle.
    pub fn resolvers(&self) -> Resolvers {
        Resolvers {
            pilots: self.deferred(|model| model.pilots.clone()),
            crew: self.deferred(|model| model.crew.clone()),
            planes: self.deferred(|model| model.planes.clone()),
            locations: self.deferred(|model| model.locations.clone()),
        }
    }

    fn deferred<T, L>(&self, select: fn(&Model) -> Arc<L>) -> Resolver<T>
    where
        T: 'static,
        L: ItemLookup<T> + 'static,
    {
        let cell = Arc::clone(&self.cell);
        Resolver::deferred(move || {
            cell.get()
                .map(|model| select(model) as Arc<dyn ItemLookup<T>>)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_core::{FlightCrewRole, FlightLocationRole, FlightPilotRole, PilotLocationRole};

    fn populated() -> Model {
        let model = Model::new();
        model
            .pilots()
            .insert(Pilot {
                id: "p1".to_string(),
                name: "Amelia".to_string(),
                available: true,
            })
            .unwrap();
        model
            .crew()
            .insert(Crew {
                id: "c1".to_string(),
                name: "Jo".to_string(),
                available: true,
            })
            .unwrap();
        model
    }

    #[test]
    fn test_model_resolvers_resolve_live_items() {
        let model = populated();
        let resolvers = model.resolvers();
        assert_eq!(resolvers.pilots.resolve("p1").unwrap().name, "Amelia");
        assert!(resolvers.planes.resolve("p1").is_none());
    }

    #[test]
    fn test_delete_pilot_purges_owner_links() {
        let model = populated();
        let resolvers = model.resolvers();
        let pilot = model.pilots().require("p1").unwrap();

        let mut flight = Flight::with_id("f1", "WM1", &resolvers);
        flight
            .pilot_link
            .assign_or_replace(FlightPilotRole::PilotFlying, &pilot)
            .unwrap();
        model.flights().insert(flight).unwrap();

        let mut base = Location::with_id("l1", "Base", &resolvers);
        base.pilot_link
            .assign_or_replace(PilotLocationRole::LocationUsing, &pilot)
            .unwrap();
        model.locations().insert(base).unwrap();

        model.delete_pilot("p1").unwrap();

        assert!(model.pilots().get("p1").is_none());
        assert!(model.flights().require("f1").unwrap().pilot_link.is_empty());
        assert!(model.locations().require("l1").unwrap().pilot_link.is_empty());
    }

    #[test]
    fn test_delete_location_purges_flight_endpoints() {
        let model = Model::new();
        let resolvers = model.resolvers();
        let base = model
            .locations()
            .insert(Location::with_id("l1", "Base", &resolvers))
            .unwrap();
        let mut flight = Flight::with_id("f1", "WM1", &resolvers);
        flight
            .location_link
            .assign_or_replace(FlightLocationRole::LocationDeparture, &base)
            .unwrap();
        model.flights().insert(flight).unwrap();
        assert_eq!(
            model.flights().require("f1").unwrap().departure().unwrap().name,
            "Base"
        );

        model.delete_location("l1").unwrap();
        let flight = model.flights().require("f1").unwrap();
        assert!(flight.departure().is_none());
        assert!(flight.location_link.is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let model = Model::new();
        assert!(matches!(
            model.delete_crew("nope"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_handle_resolvers_wait_for_install() {
        let handle = ModelHandle::new();
        let resolvers = handle.resolvers();
        let mut flight = Flight::with_id("f1", "WM1", &resolvers);
        let crew = Crew {
            id: "c1".to_string(),
            name: "Jo".to_string(),
            available: true,
        };
        flight
            .crew_link
            .assign_or_replace(FlightCrewRole::Trainee, &crew)
            .unwrap();

        assert!(flight.crew_link.resolved_contents().all(|e| e.target.is_none()));
        assert!(matches!(handle.model(), Err(StorageError::ModelNotReady)));

        let model = Arc::new(populated());
        handle.install(Arc::clone(&model)).unwrap();
        assert!(handle.is_installed());
        assert!(flight.crew_link.resolved_contents().all(|e| e.is_resolved()));
        assert_eq!(
            handle.install(model),
            Err(StorageError::ModelAlreadyInstalled)
        );
    }
}
