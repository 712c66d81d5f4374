//! Wingman Logic - Link Commands
//!
//! Commands that link and unlink pilots, crew, planes and locations to
//! flights and locations, keeping each target's availability flag in step
//! with its flight assignments. Every command implements [`Command`] and runs
//! against a [`Model`](wingman_storage::Model).

#[macro_use]
mod command;
mod check;
mod error;
mod flight;
mod location;
mod telemetry;

pub use check::CheckAvailability;
pub use command::{Command, CommandResult, Displaced};
pub use error::{CommandError, LogicResult};
pub use flight::{
    LinkCrewToFlight, LinkFlightToLocations, LinkPilotsToFlight, LinkPlaneToFlight,
    UnlinkCrewFromFlight, UnlinkFlightFromLocations, UnlinkPilotsFromFlight,
    UnlinkPlaneFromFlight,
};
pub use location::{
    LinkCrewToLocation, LinkPilotToLocation, LinkPlaneToLocation, UnlinkCrewFromLocation,
    UnlinkPilotFromLocation, UnlinkPlaneFromLocation,
};
pub use telemetry::{env_filter, init_tracing};
