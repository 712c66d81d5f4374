//! Commands that change what is assigned to a flight.
//!
//! Linking a pilot, crew member or plane marks it unavailable; unlinking
//! marks it available again. Locations carry no availability flag.

use wingman_core::{FlightCrewRole, FlightLocationRole, FlightPilotRole, FlightPlaneRole, ItemId};

link_command! {
    /// Seat pilots on a flight. A taken seat is handed to the new pilot.
    LinkPilotsToFlight {
        flight_id: flights,
        pilots: FlightPilotRole => pilots,
        link: pilot_link,
        run: link_and_reserve,
    }
}

link_command! {
    UnlinkPilotsFromFlight {
        flight_id: flights,
        pilots: FlightPilotRole => pilots,
        link: pilot_link,
        run: unlink_and_release,
    }
}

link_command! {
    /// Assign cabin crew to a flight. A full position drops its longest-serving
    /// member.
    LinkCrewToFlight {
        flight_id: flights,
        crew: FlightCrewRole => crew,
        link: crew_link,
        run: link_and_reserve,
    }
}

link_command! {
    UnlinkCrewFromFlight {
        flight_id: flights,
        crew: FlightCrewRole => crew,
        link: crew_link,
        run: unlink_and_release,
    }
}

link_command! {
    /// Assign the aircraft operating a flight, replacing any current one.
    LinkPlaneToFlight {
        flight_id: flights,
        planes: FlightPlaneRole => planes,
        link: plane_link,
        run: link_and_reserve,
    }
}

link_command! {
    UnlinkPlaneFromFlight {
        flight_id: flights,
        planes: FlightPlaneRole => planes,
        link: plane_link,
        run: unlink_and_release,
    }
}

link_command! {
    /// Set a flight's departure and/or arrival.
    LinkFlightToLocations {
        flight_id: flights,
        locations: FlightLocationRole => locations,
        link: location_link,
        run: link_only,
    }
}

link_command! {
    UnlinkFlightFromLocations {
        flight_id: flights,
        locations: FlightLocationRole => locations,
        link: location_link,
        run: unlink_only,
    }
}

impl LinkPlaneToFlight {
    pub fn single(flight_id: impl Into<ItemId>, plane_id: impl Into<ItemId>) -> Self {
        Self::new(flight_id).with(FlightPlaneRole::PlaneUsing, plane_id)
    }
}

impl LinkFlightToLocations {
    pub fn between(
        flight_id: impl Into<ItemId>,
        departure_id: impl Into<ItemId>,
        arrival_id: impl Into<ItemId>,
    ) -> Self {
        Self::new(flight_id)
            .with(FlightLocationRole::LocationDeparture, departure_id)
            .with(FlightLocationRole::LocationArrival, arrival_id)
    }
}
