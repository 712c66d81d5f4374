//! Plain-text rendering of a model and of command results.

use std::fmt;
use wingman_core::{Assignable, ItemLookup};
use wingman_logic::CommandResult;
use wingman_storage::Model;

/// Every flight, then every location, with their links.
pub fn render_model(model: &Model) -> String {
    ModelReport(model).to_string()
}

struct ModelReport<'a>(&'a Model);

impl fmt::Display for ModelReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_model(out, self.0)
    }
}

fn write_model(out: &mut fmt::Formatter<'_>, model: &Model) -> fmt::Result {
    writeln!(out, "Flights:")?;
    let flights = model.flights().items();
    if flights.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for flight in flights {
        writeln!(out, "  {} [{}]", flight.code, flight.id)?;
        writeln!(out, "    Pilots: {}", flight.pilot_link)?;
        writeln!(out, "    Crew: {}", flight.crew_link)?;
        writeln!(out, "    Plane: {}", flight.plane_link)?;
        writeln!(out, "    Route: {}", flight.location_link)?;
    }

    writeln!(out, "Locations:")?;
    let locations = model.locations().items();
    if locations.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for location in locations {
        writeln!(out, "  {} [{}]", location.name, location.id)?;
        writeln!(out, "    Pilots: {}", location.pilot_link)?;
        writeln!(out, "    Crew: {}", location.crew_link)?;
        writeln!(out, "    Planes: {}", location.plane_link)?;
    }

    writeln!(
        out,
        "Available: {} pilots, {} crew, {} planes",
        count_available(&model.pilots().items()),
        count_available(&model.crew().items()),
        count_available(&model.planes().items()),
    )
}

fn count_available<T: Assignable>(items: &[std::sync::Arc<T>]) -> usize {
    items.iter().filter(|item| item.is_available()).count()
}

/// The command message followed by one line per displaced target.
pub fn render_result(result: &CommandResult) -> String {
    let mut lines = vec![result.message.clone()];
    lines.extend(
        result
            .displaced
            .iter()
            .map(|displaced| format!("Displaced {} from {}.", displaced.id, displaced.role)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_core::FlightPilotRole;
    use wingman_logic::{Command, LinkPilotsToFlight};
    use wingman_test_utils::fixture_model;

    #[test]
    fn test_empty_links_render_as_none() {
        let fx = fixture_model();
        let text = render_model(&fx.model);
        assert!(text.contains("  WM101 ["));
        assert!(text.contains("    Pilots: None"));
        assert!(text.contains("  Singapore ["));
        assert!(text.contains("Available: 3 pilots, 6 crew, 2 planes"));
    }

    #[test]
    fn test_linked_pilot_is_rendered_by_name() {
        let fx = fixture_model();
        LinkPilotsToFlight::new(&fx.flight_id)
            .with(FlightPilotRole::PilotMonitoring, &fx.pilot_ids[2])
            .execute(&fx.model)
            .unwrap();
        let text = render_model(&fx.model);
        assert!(text.contains("    Pilots: Pilot Monitoring: Pilot 2"));
        assert!(text.contains("Available: 2 pilots"));
    }

    #[test]
    fn test_displaced_lines() {
        let fx = fixture_model();
        let link = |id: &String| {
            LinkPilotsToFlight::new(&fx.flight_id)
                .with(FlightPilotRole::PilotFlying, id)
                .execute(&fx.model)
                .unwrap()
        };
        link(&fx.pilot_ids[0]);
        let result = link(&fx.pilot_ids[1]);
        let text = render_result(&result);
        assert!(text.starts_with("Linked Pilot Flying: Pilot 1 to flight WM101."));
        assert!(text.ends_with(&format!("Displaced {} from Pilot Flying.", fx.pilot_ids[0])));
    }
}
