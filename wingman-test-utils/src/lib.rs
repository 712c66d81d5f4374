//! Wingman Test Utilities
//!
//! Shared test infrastructure for the Wingman workspace:
//! - Proptest generators for role tags, ids and link snapshots
//! - Fixtures with a populated model
//! - Assertions for link invariants and registry state

pub use wingman_core::{
    Crew, CrewLocationRole, EntityType, Flight, FlightCrewRole, FlightLocationRole,
    FlightPilotRole, FlightPlaneRole, ItemId, Link, LinkSnapshot, Location, Pilot,
    PilotLocationRole, Plane, PlaneLocationRole, RoleTag, StorageError,
};
pub use wingman_storage::Model;

pub use fixtures::{fixture_model, sample_crew, sample_pilot, sample_plane, Fixture};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Wingman link data.

    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use wingman_core::Shape;

    /// Any variant of a role enum.
    pub fn arb_role<R: RoleTag>() -> impl Strategy<Value = R> {
        proptest::sample::select(R::ALL)
    }

    /// Ids drawn from a small pool, so collisions and repeats are common.
    pub fn arb_item_id() -> impl Strategy<Value = ItemId> {
        (0u8..24).prop_map(|n| format!("id-{n:02}"))
    }

    /// A sequence of (role, id) assignments.
    pub fn arb_assignments<R: RoleTag>(
        max_len: usize,
    ) -> impl Strategy<Value = Vec<(R, ItemId)>> {
        prop::collection::vec((arb_role::<R>(), arb_item_id()), 0..max_len)
    }

    /// A snapshot that satisfies `shape`: every role within capacity and no
    /// id repeated under a role.
    pub fn arb_valid_snapshot<R: RoleTag>(
        shape: &'static Shape<R>,
    ) -> impl Strategy<Value = LinkSnapshot<R>> {
        prop::collection::btree_map(
            arb_role::<R>(),
            prop::collection::btree_set(arb_item_id(), 1..4),
            0..R::ALL.len() + 1,
        )
        .prop_map(move |roles| {
            roles
                .into_iter()
                .filter_map(|(role, ids): (R, BTreeSet<ItemId>)| {
                    let capacity = shape.capacity_of(role).ok()?;
                    Some((role, ids.into_iter().take(capacity).collect()))
                })
                .collect()
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built models for command and storage tests.

    use super::*;

    pub fn sample_pilot(name: &str) -> Pilot {
        Pilot::new(name)
    }

    pub fn sample_crew(name: &str) -> Crew {
        Crew::new(name)
    }

    pub fn sample_plane(model: &str) -> Plane {
        Plane::new(model)
    }

    /// A populated model and the ids of everything in it.
    ///
    /// Nothing is linked. Every target starts available.
    #[derive(Debug)]
    pub struct Fixture {
        pub model: Model,
        /// Flight `WM101`.
        pub flight_id: ItemId,
        /// "Pilot 0" to "Pilot 2".
        pub pilot_ids: Vec<ItemId>,
        /// "Crew 0" to "Crew 5".
        pub crew_ids: Vec<ItemId>,
        /// An A320 and a B737.
        pub plane_ids: Vec<ItemId>,
        /// Singapore, then Tokyo.
        pub location_ids: Vec<ItemId>,
    }

    /// Build a fresh [`Fixture`].
    ///
    /// # Panics
    ///
    /// Panics if an insert fails, which only happens on an id collision.
    pub fn fixture_model() -> Fixture {
        let model = Model::new();
        let resolvers = model.resolvers();

        let pilot_ids = (0..3)
            .map(|n| insert(model.pilots().insert(sample_pilot(&format!("Pilot {n}")))))
            .collect();
        let crew_ids = (0..6)
            .map(|n| insert(model.crew().insert(sample_crew(&format!("Crew {n}")))))
            .collect();
        let plane_ids = ["A320", "B737"]
            .iter()
            .map(|m| insert(model.planes().insert(sample_plane(m))))
            .collect();
        let location_ids = ["Singapore", "Tokyo"]
            .iter()
            .map(|name| insert(model.locations().insert(Location::new(*name, &resolvers))))
            .collect();
        let flight_id = insert(model.flights().insert(Flight::new("WM101", &resolvers)));

        Fixture {
            model,
            flight_id,
            pilot_ids,
            crew_ids,
            plane_ids,
            location_ids,
        }
    }

    fn insert<T: wingman_core::Item>(
        result: Result<std::sync::Arc<T>, StorageError>,
    ) -> ItemId {
        match result {
            Ok(item) => item.id().to_string(),
            Err(err) => panic!("fixture insert failed: {err}"),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for link invariants and registry state.

    use super::*;
    use std::collections::HashSet;
    use wingman_core::Assignable;
    use wingman_storage::ItemManager;

    /// Assert every role of `link` is within capacity and holds no id twice.
    #[track_caller]
    pub fn assert_link_invariants<R: RoleTag, T: wingman_core::Item + 'static>(
        link: &Link<R, T>,
    ) {
        for (role, ids) in link.snapshot() {
            let capacity = link
                .shape()
                .capacity_of(role)
                .unwrap_or_else(|e| panic!("role {role} outside shape: {e}"));
            assert!(
                ids.len() <= capacity,
                "{role} holds {} ids, capacity {capacity}",
                ids.len()
            );
            assert!(!ids.is_empty(), "{role} kept as an empty slot");
            let unique: HashSet<&ItemId> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len(), "{role} holds a duplicate id");
        }
    }

    /// Assert the target with `id` exists and has the given availability.
    #[track_caller]
    pub fn assert_availability<T>(registry: &ItemManager<T>, id: &str, expected: bool)
    where
        T: Assignable + Clone + Send + Sync + 'static,
    {
        match registry.get(id) {
            Some(target) => assert_eq!(
                target.is_available(),
                expected,
                "{} {id} availability",
                T::ENTITY_TYPE
            ),
            None => panic!("{} {id} is not registered", T::ENTITY_TYPE),
        }
    }

    /// Assert a storage result is a NotFound error for `entity_type`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(
        result: &Result<T, StorageError>,
        entity_type: EntityType,
    ) {
        match result {
            Err(StorageError::NotFound {
                entity_type: et, ..
            }) => {
                assert_eq!(*et, entity_type, "Wrong entity type in NotFound error");
            }
            other => panic!("Expected NotFound error for {entity_type:?}, got: {other:?}"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
