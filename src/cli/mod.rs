//! Define the application's command line interface
use crate::config::Config;
use simplelog::LevelFilter;
use structopt::StructOpt;
use std::path::PathBuf;

mod delete_track;
use delete_track::{delete_track_command, DeleteTrackOpts};
mod export_gpx;
use export_gpx::{export_gpx_command, ExportGpxOpts};
mod list_tracks;
use list_tracks::{list_tracks_command, ListTracksOpts};
mod plan;
use plan::{plan_command, PlanOpts};
mod profiles;
use profiles::{profiles_command, ProfilesOpts};
mod search;
use search::{search_command, SearchOpts};

/// Plan gravel cycling routes and manage the saved track collection
#[derive(Debug, StructOpt)]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Location of the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Track and route commands
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose == 2 {
            LevelFilter::Trace
        } else if self.verbose > 2 {
            LevelFilter::Off
        } else {
            default
        }
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Compute candidate routes between waypoints and keep them as temporary tracks
    #[structopt(name = "plan")]
    Plan(PlanOpts),
    /// List tracks saved in the local database
    #[structopt(name = "list-tracks")]
    ListTracks(ListTracksOpts),
    /// Export a saved track as a GPX file
    #[structopt(name = "export-gpx")]
    ExportGpx(ExportGpxOpts),
    /// Delete a saved track
    #[structopt(name = "delete-track")]
    DeleteTrack(DeleteTrackOpts),
    /// Search for a place by name
    #[structopt(name = "search")]
    Search(SearchOpts),
    /// List the available routing profiles
    #[structopt(name = "profiles")]
    Profiles(ProfilesOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Plan(opts) => plan_command(config, opts),
            Command::ListTracks(opts) => list_tracks_command(opts),
            Command::ExportGpx(opts) => export_gpx_command(opts),
            Command::DeleteTrack(opts) => delete_track_command(opts),
            Command::Search(opts) => search_command(config, opts),
            Command::Profiles(opts) => profiles_command(opts),
        }
    }
}

/// Parse a "lat,lon" argument into a coordinate pair
fn parse_lat_lon(src: &str) -> Result<(f64, f64), crate::Error> {
    let mut parts = src.splitn(2, ',');
    let lat = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    let lon = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(crate::Error::Other(format!(
            "invalid waypoint '{}', expected 'lat,lon'",
            src
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoint_arguments_parse() {
        assert_eq!(parse_lat_lon("50.08, 14.42").unwrap(), (50.08, 14.42));
        assert!(parse_lat_lon("50.08").is_err());
        assert!(parse_lat_lon("north,south").is_err());
    }
}
