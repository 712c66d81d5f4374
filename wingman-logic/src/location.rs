//! Commands that change who or what is based at a location.
//!
//! Residency does not touch availability: a resident pilot can still be
//! seated on a flight.

use wingman_core::{CrewLocationRole, ItemId, PilotLocationRole, PlaneLocationRole};

link_command! {
    /// Base crew members at a location.
    LinkCrewToLocation {
        location_id: locations,
        crew: CrewLocationRole => crew,
        link: crew_link,
        run: link_only,
    }
}

link_command! {
    UnlinkCrewFromLocation {
        location_id: locations,
        crew: CrewLocationRole => crew,
        link: crew_link,
        run: unlink_only,
    }
}

link_command! {
    /// Base pilots at a location.
    LinkPilotToLocation {
        location_id: locations,
        pilots: PilotLocationRole => pilots,
        link: pilot_link,
        run: link_only,
    }
}

link_command! {
    UnlinkPilotFromLocation {
        location_id: locations,
        pilots: PilotLocationRole => pilots,
        link: pilot_link,
        run: unlink_only,
    }
}

link_command! {
    /// Base planes at a location.
    LinkPlaneToLocation {
        location_id: locations,
        planes: PlaneLocationRole => planes,
        link: plane_link,
        run: link_only,
    }
}

link_command! {
    UnlinkPlaneFromLocation {
        location_id: locations,
        planes: PlaneLocationRole => planes,
        link: plane_link,
        run: unlink_only,
    }
}

/// Shorthands for the single residency role each relation has.
macro_rules! resident_shorthand {
    ($($command:ident => $role:expr;)+) => {
        $(
            impl $command {
                pub fn resident(
                    location_id: impl Into<ItemId>,
                    id: impl Into<ItemId>,
                ) -> Self {
                    Self::new(location_id).with($role, id)
                }
            }
        )+
    };
}

resident_shorthand! {
    LinkCrewToLocation => CrewLocationRole::LocationUsing;
    UnlinkCrewFromLocation => CrewLocationRole::LocationUsing;
    LinkPilotToLocation => PilotLocationRole::LocationUsing;
    UnlinkPilotFromLocation => PilotLocationRole::LocationUsing;
    LinkPlaneToLocation => PlaneLocationRole::LocationUsing;
    UnlinkPlaneFromLocation => PlaneLocationRole::LocationUsing;
}
