//! Capacity tables for relation types.

use crate::{
    CrewLocationRole, FlightCrewRole, FlightLocationRole, FlightPilotRole, FlightPlaneRole,
    LinkError, PilotLocationRole, PlaneLocationRole, RoleTag, ValidationError,
};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Capacity used for residency relations, which are effectively unbounded.
pub const RESIDENCY_CAPACITY: usize = 1_000_000;

/// Immutable mapping from role tag to maximum occupancy for one relation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape<R: RoleTag> {
    relation: &'static str,
    capacities: BTreeMap<R, usize>,
}

impl<R: RoleTag> Shape<R> {
    /// Build a shape from explicit entries.
    ///
    /// Roles left out of `entries` are outside the shape's domain and any
    /// link operation naming them fails with [`LinkError::UnknownRole`].
    ///
    /// # Errors
    ///
    /// Returns `Err` on a zero capacity or a role listed twice.
    pub fn new(
        relation: &'static str,
        entries: impl IntoIterator<Item = (R, usize)>,
    ) -> Result<Self, ValidationError> {
        let mut capacities = BTreeMap::new();
        for (role, capacity) in entries {
            if capacity == 0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("{relation}.{role:?}"),
                    reason: "capacity must be positive".to_string(),
                });
            }
            if capacities.insert(role, capacity).is_some() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{relation}.{role:?}"),
                    reason: "role listed more than once".to_string(),
                });
            }
        }
        Ok(Self {
            relation,
            capacities,
        })
    }

    /// Build a shape covering every variant of `R`.
    ///
    /// Write `capacity` as an exhaustive `match` so adding a variant without a
    /// capacity fails to compile.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `capacity` yields zero for any role.
    pub fn exhaustive(
        relation: &'static str,
        capacity: impl Fn(R) -> usize,
    ) -> Result<Self, ValidationError> {
        Self::new(relation, R::ALL.iter().map(|role| (*role, capacity(*role))))
    }

    /// Name of the relation this shape governs.
    pub fn relation(&self) -> &'static str {
        self.relation
    }

    /// Maximum occupancy of `role`.
    pub fn capacity_of(&self, role: R) -> Result<usize, LinkError> {
        self.capacities
            .get(&role)
            .copied()
            .ok_or_else(|| LinkError::UnknownRole {
                relation: self.relation,
                role: role.to_string(),
            })
    }

    /// Whether `role` belongs to this shape's domain.
    pub fn contains(&self, role: R) -> bool {
        self.capacities.contains_key(&role)
    }

    /// Roles in the domain, in tag order.
    pub fn roles(&self) -> impl Iterator<Item = R> + '_ {
        self.capacities.keys().copied()
    }

    /// Sum of all role capacities.
    pub fn total_capacity(&self) -> usize {
        self.capacities.values().sum()
    }
}

// ============================================================================
// STATIC SHAPES
// ============================================================================

/// Built-in tables are literals; a zero in one is a bug and panics on first use.
/// `test_builtin_shapes_initialize` forces every static.
fn build<R: RoleTag>(relation: &'static str, capacity: impl Fn(R) -> usize) -> Shape<R> {
    match Shape::exhaustive(relation, capacity) {
        Ok(shape) => shape,
        Err(e) => panic!("built-in shape {relation} is invalid: {e}"),
    }
}

/// Pilots assigned to a flight.
pub static PILOT_FLIGHT_SHAPE: LazyLock<Shape<FlightPilotRole>> = LazyLock::new(|| {
    build("flight-pilot", |role| match role {
        FlightPilotRole::PilotFlying => 1,
        FlightPilotRole::PilotMonitoring => 1,
    })
});

/// Cabin crew assigned to a flight.
pub static CREW_FLIGHT_SHAPE: LazyLock<Shape<FlightCrewRole>> = LazyLock::new(|| {
    build("flight-crew", |role| match role {
        FlightCrewRole::CabinServiceDirector => 1,
        FlightCrewRole::SeniorFlightAttendant => 1,
        FlightCrewRole::FlightAttendant => 12,
        FlightCrewRole::Trainee => 4,
    })
});

/// Aircraft operating a flight.
pub static PLANE_FLIGHT_SHAPE: LazyLock<Shape<FlightPlaneRole>> = LazyLock::new(|| {
    build("flight-plane", |role| match role {
        FlightPlaneRole::PlaneUsing => 1,
    })
});

/// Departure and arrival of a flight.
pub static LOCATION_FLIGHT_SHAPE: LazyLock<Shape<FlightLocationRole>> = LazyLock::new(|| {
    build("flight-location", |role| match role {
        FlightLocationRole::LocationDeparture => 1,
        FlightLocationRole::LocationArrival => 1,
    })
});

/// Pilots resident at a location.
pub static PILOT_LOCATION_SHAPE: LazyLock<Shape<PilotLocationRole>> = LazyLock::new(|| {
    build("pilot-location", |role| match role {
        PilotLocationRole::LocationUsing => RESIDENCY_CAPACITY,
    })
});

/// Crew resident at a location.
pub static CREW_LOCATION_SHAPE: LazyLock<Shape<CrewLocationRole>> = LazyLock::new(|| {
    build("crew-location", |role| match role {
        CrewLocationRole::LocationUsing => RESIDENCY_CAPACITY,
    })
});

/// Planes resident at a location.
pub static PLANE_LOCATION_SHAPE: LazyLock<Shape<PlaneLocationRole>> = LazyLock::new(|| {
    build("plane-location", |role| match role {
        PlaneLocationRole::LocationUsing => RESIDENCY_CAPACITY,
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_flight_capacities() {
        let shape = &*CREW_FLIGHT_SHAPE;
        assert_eq!(shape.capacity_of(FlightCrewRole::CabinServiceDirector), Ok(1));
        assert_eq!(shape.capacity_of(FlightCrewRole::SeniorFlightAttendant), Ok(1));
        assert_eq!(shape.capacity_of(FlightCrewRole::FlightAttendant), Ok(12));
        assert_eq!(shape.capacity_of(FlightCrewRole::Trainee), Ok(4));
        assert_eq!(shape.total_capacity(), 18);
        assert_eq!(shape.relation(), "flight-crew");
    }

    #[test]
    fn test_builtin_shapes_cover_all_roles() {
        assert_eq!(PILOT_FLIGHT_SHAPE.roles().count(), FlightPilotRole::ALL.len());
        assert_eq!(LOCATION_FLIGHT_SHAPE.roles().count(), FlightLocationRole::ALL.len());
        assert_eq!(
            PILOT_LOCATION_SHAPE.capacity_of(PilotLocationRole::LocationUsing),
            Ok(RESIDENCY_CAPACITY)
        );
    }

    #[test]
    fn test_builtin_capacities_positive() {
        fn check<R: RoleTag>(shape: &Shape<R>) {
            for role in shape.roles() {
                assert!(shape.capacity_of(role).unwrap() > 0, "{}: {role:?}", shape.relation());
            }
        }
        check(&*PILOT_FLIGHT_SHAPE);
        check(&*CREW_FLIGHT_SHAPE);
        check(&*PLANE_FLIGHT_SHAPE);
        check(&*LOCATION_FLIGHT_SHAPE);
        check(&*PILOT_LOCATION_SHAPE);
        check(&*CREW_LOCATION_SHAPE);
        check(&*PLANE_LOCATION_SHAPE);
    }

    #[test]
    fn test_builtin_shapes_initialize() {
        assert_eq!(PILOT_FLIGHT_SHAPE.total_capacity(), 2);
        assert_eq!(CREW_FLIGHT_SHAPE.total_capacity(), 18);
        assert_eq!(PLANE_FLIGHT_SHAPE.total_capacity(), 1);
        assert_eq!(LOCATION_FLIGHT_SHAPE.total_capacity(), 2);
        assert_eq!(PILOT_LOCATION_SHAPE.total_capacity(), RESIDENCY_CAPACITY);
        assert_eq!(CREW_LOCATION_SHAPE.total_capacity(), RESIDENCY_CAPACITY);
        assert_eq!(PLANE_LOCATION_SHAPE.total_capacity(), RESIDENCY_CAPACITY);
    }

    #[test]
    fn test_exhaustive_covers_every_variant() {
        let shape = Shape::exhaustive("flight-crew", |role| match role {
            FlightCrewRole::CabinServiceDirector => 2,
            FlightCrewRole::SeniorFlightAttendant => 3,
            FlightCrewRole::FlightAttendant => 5,
            FlightCrewRole::Trainee => 7,
        })
        .unwrap();
        assert_eq!(shape.roles().collect::<Vec<_>>(), FlightCrewRole::ALL.to_vec());
        for role in FlightCrewRole::ALL {
            assert!(shape.contains(*role));
        }
        assert_eq!(shape.capacity_of(FlightCrewRole::Trainee), Ok(7));
        assert_eq!(shape.total_capacity(), 17);
    }

    #[test]
    fn test_exhaustive_rejects_zero_capacity() {
        let result = Shape::exhaustive("flight-pilot", |role| match role {
            FlightPilotRole::PilotFlying => 1,
            FlightPilotRole::PilotMonitoring => 0,
        });
        match result {
            Err(ValidationError::InvalidValue { field, reason }) => {
                assert_eq!(field, "flight-pilot.PilotMonitoring");
                assert_eq!(reason, "capacity must be positive");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_partial_shape_rejects_unknown_role() {
        let shape = Shape::new("directors-only", [(FlightCrewRole::CabinServiceDirector, 1)])
            .unwrap();
        assert!(shape.contains(FlightCrewRole::CabinServiceDirector));
        assert!(!shape.contains(FlightCrewRole::Trainee));
        assert!(matches!(
            shape.capacity_of(FlightCrewRole::Trainee),
            Err(LinkError::UnknownRole { relation: "directors-only", .. })
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = Shape::new("bad", [(FlightPilotRole::PilotFlying, 0)]);
        assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let result = Shape::new(
            "bad",
            [(FlightPilotRole::PilotFlying, 1), (FlightPilotRole::PilotFlying, 2)],
        );
        assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
    }
}
