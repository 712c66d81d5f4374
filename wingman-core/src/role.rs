//! Role tags for every relation type.
//!
//! Each relation gets its own closed enum so a [`Shape`](crate::Shape) built
//! with [`Shape::exhaustive`](crate::Shape::exhaustive) is checked for
//! coverage by the compiler.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// A closed set of slots within one relation type.
pub trait RoleTag:
    Copy + Ord + Hash + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every variant, in declaration order.
    const ALL: &'static [Self];
}

/// Error when parsing an invalid role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleParseError {
    pub relation: &'static str,
    pub value: String,
}

impl fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} role: {}", self.relation, self.value)
    }
}

impl std::error::Error for RoleParseError {}

/// Declares a role enum with its db string, display label and parsing.
macro_rules! role_tag {
    (
        $(#[$meta:meta])*
        $name:ident, $relation:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $db:literal, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Convert to the persisted string representation.
            pub fn as_db_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $db, )+
                }
            }

            /// Parse from the persisted string representation (case-insensitive).
            pub fn from_db_str(s: &str) -> Result<Self, RoleParseError> {
                $(
                    if s.eq_ignore_ascii_case($db) {
                        return Ok($name::$variant);
                    }
                )+
                Err(RoleParseError {
                    relation: $relation,
                    value: s.to_string(),
                })
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl RoleTag for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant, )+ ];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = RoleParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_db_str(s)
            }
        }
    };
}

role_tag! {
    /// Pilot seats on a flight.
    FlightPilotRole, "flight-pilot" {
        PilotFlying => "PILOT_FLYING", "Pilot Flying";
        PilotMonitoring => "PILOT_MONITORING", "Pilot Monitoring";
    }
}

role_tag! {
    /// Cabin crew positions on a flight.
    FlightCrewRole, "flight-crew" {
        CabinServiceDirector => "CABIN_SERVICE_DIRECTOR", "Cabin Service Director";
        SeniorFlightAttendant => "SENIOR_FLIGHT_ATTENDANT", "Senior Flight Attendant";
        FlightAttendant => "FLIGHT_ATTENDANT", "Flight Attendant";
        Trainee => "TRAINEE", "Trainee";
    }
}

role_tag! {
    /// The aircraft operating a flight.
    FlightPlaneRole, "flight-plane" {
        PlaneUsing => "PLANE_USING", "Plane";
    }
}

role_tag! {
    /// Endpoints of a flight.
    FlightLocationRole, "flight-location" {
        LocationDeparture => "LOCATION_DEPARTURE", "Departure";
        LocationArrival => "LOCATION_ARRIVAL", "Arrival";
    }
}

role_tag! {
    /// Pilots based at a location.
    PilotLocationRole, "pilot-location" {
        LocationUsing => "LOCATION_USING", "Resident Pilot";
    }
}

role_tag! {
    /// Crew based at a location.
    CrewLocationRole, "crew-location" {
        LocationUsing => "LOCATION_USING", "Resident Crew";
    }
}

role_tag! {
    /// Planes based at a location.
    PlaneLocationRole, "plane-location" {
        LocationUsing => "LOCATION_USING", "Resident Plane";
    }
}
