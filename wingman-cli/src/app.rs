//! Dispatch a parsed [`Action`] against the data directory.

use crate::cli::{Action, FlightArgs, FlightTarget, LocationArgs, TargetKind};
use crate::error::CliError;
use crate::report;
use tracing::info;
use wingman_logic::{
    CheckAvailability, Command, CommandError, LinkCrewToFlight, LinkCrewToLocation,
    LinkFlightToLocations, LinkPilotToLocation, LinkPilotsToFlight, LinkPlaneToFlight,
    LinkPlaneToLocation, UnlinkCrewFromFlight, UnlinkCrewFromLocation,
    UnlinkFlightFromLocations, UnlinkPilotFromLocation, UnlinkPilotsFromFlight,
    UnlinkPlaneFromFlight, UnlinkPlaneFromLocation,
};
use wingman_storage::JsonStorage;

/// Load the model, run `action`, and save again if it changed anything.
///
/// Returns the text to print.
pub fn run(action: &Action, storage: &JsonStorage) -> Result<String, CliError> {
    let model = storage.load_model()?;

    let (command, mutates): (Box<dyn Command>, bool) = match action {
        Action::Show => return Ok(report::render_model(&model)),
        Action::Check { kind, id } => (Box::new(check_command(*kind, id)), false),
        Action::LinkFlight(args) => (flight_command(args, true)?, true),
        Action::UnlinkFlight(args) => (flight_command(args, false)?, true),
        Action::LinkLocation(args) => (location_command(args, true), true),
        Action::UnlinkLocation(args) => (location_command(args, false), true),
    };

    match command.execute(&model) {
        Ok(result) => {
            if mutates {
                storage.save(&model)?;
            }
            Ok(report::render_result(&result))
        }
        // The link change stands even though availability lagged behind.
        Err(err @ CommandError::PartiallyApplied { .. }) => {
            storage.save(&model)?;
            info!("saved partially applied command");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn check_command(kind: TargetKind, id: &str) -> CheckAvailability {
    let id = id.to_string();
    match kind {
        TargetKind::Pilot => CheckAvailability::Pilot(id),
        TargetKind::Crew => CheckAvailability::Crew(id),
        TargetKind::Plane => CheckAvailability::Plane(id),
    }
}

fn flight_command(args: &FlightArgs, link: bool) -> Result<Box<dyn Command>, CliError> {
    let FlightArgs {
        flight,
        kind,
        role,
        id,
    } = args;
    let command: Box<dyn Command> = match (kind, link) {
        (FlightTarget::Pilot, true) => {
            Box::new(LinkPilotsToFlight::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Pilot, false) => {
            Box::new(UnlinkPilotsFromFlight::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Crew, true) => {
            Box::new(LinkCrewToFlight::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Crew, false) => {
            Box::new(UnlinkCrewFromFlight::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Plane, true) => {
            Box::new(LinkPlaneToFlight::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Plane, false) => {
            Box::new(UnlinkPlaneFromFlight::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Location, true) => {
            Box::new(LinkFlightToLocations::new(flight).with(role.parse()?, id))
        }
        (FlightTarget::Location, false) => {
            Box::new(UnlinkFlightFromLocations::new(flight).with(role.parse()?, id))
        }
    };
    Ok(command)
}

fn location_command(args: &LocationArgs, link: bool) -> Box<dyn Command> {
    let LocationArgs { location, kind, id } = args;
    match (kind, link) {
        (TargetKind::Pilot, true) => Box::new(LinkPilotToLocation::resident(location, id)),
        (TargetKind::Pilot, false) => Box::new(UnlinkPilotFromLocation::resident(location, id)),
        (TargetKind::Crew, true) => Box::new(LinkCrewToLocation::resident(location, id)),
        (TargetKind::Crew, false) => Box::new(UnlinkCrewFromLocation::resident(location, id)),
        (TargetKind::Plane, true) => Box::new(LinkPlaneToLocation::resident(location, id)),
        (TargetKind::Plane, false) => Box::new(UnlinkPlaneFromLocation::resident(location, id)),
    }
}
