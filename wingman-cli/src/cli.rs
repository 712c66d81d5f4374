//! CLI schema for the wingman binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wingman")]
#[command(about = "Assign pilots, crew, planes and locations to flights")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "WINGMAN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the configuration
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Action,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// List flights and locations with everything linked to them
    Show,

    /// Report whether a pilot, crew member or plane is available
    Check {
        kind: TargetKind,
        id: String,
    },

    /// Link a pilot, crew member, plane or location to a flight
    LinkFlight(FlightArgs),

    /// Remove a pilot, crew member, plane or location from a flight
    UnlinkFlight(FlightArgs),

    /// Base a pilot, crew member or plane at a location
    LinkLocation(LocationArgs),

    /// Remove a resident from a location
    UnlinkLocation(LocationArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FlightArgs {
    /// Flight id
    pub flight: String,

    pub kind: FlightTarget,

    /// Role as stored on disk, e.g. PILOT_FLYING or LOCATION_ARRIVAL
    pub role: String,

    /// Id of the pilot, crew member, plane or location
    pub id: String,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LocationArgs {
    /// Location id
    pub location: String,

    pub kind: TargetKind,

    /// Id of the resident
    pub id: String,
}

/// Targets with an availability flag.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Pilot,
    Crew,
    Plane,
}

/// Anything a flight links to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightTarget {
    Pilot,
    Crew,
    Plane,
    Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_schema_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_link_flight() {
        let cli = Cli::try_parse_from([
            "wingman",
            "--data-dir",
            "/tmp/wm",
            "link-flight",
            "f1",
            "crew",
            "TRAINEE",
            "c1",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/wm")));
        assert_eq!(
            cli.action,
            Action::LinkFlight(FlightArgs {
                flight: "f1".to_string(),
                kind: FlightTarget::Crew,
                role: "TRAINEE".to_string(),
                id: "c1".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["wingman", "check", "captain", "p1"]).is_err());
    }
}
