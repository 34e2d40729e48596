//! Compute routes between waypoints and materialize them as tracks
use super::parse_lat_lon;
use crate::config::Config;
use crate::planner::RoutePlanner;
use crate::profiles::ProfileManager;
use crate::storage::{SqliteStore, TrackRepository};
use crate::surface::{MemorySurface, ANCHOR_LAYER};
use crate::track::{StyleMode, TrackManager};
use crate::waypoints::WaypointManager;
use crate::Error;
use log::{info, warn};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct PlanOpts {
    /// Waypoints as "lat,lon" pairs; the first is the origin, the last the
    /// destination, anything between a via point
    #[structopt(name = "WAYPOINT", required = true, min_values = 2)]
    waypoints: Vec<String>,
    /// Routing profile to use, by name or id
    #[structopt(short, long)]
    profile: Option<String>,
    /// Save the first candidate as a permanent track with this name
    #[structopt(short, long)]
    save: Option<String>,
    /// Write the first candidate as a GPX file into this directory
    #[structopt(long, parse(from_os_str))]
    gpx: Option<PathBuf>,
    /// Color the rendered line by surface quality instead of the track color
    #[structopt(long)]
    surface_quality: bool,
}

pub fn plan_command(config: Config, opts: PlanOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut waypoint_manager = WaypointManager::new();
    for raw in &opts.waypoints {
        let (lat, lon) = parse_lat_lon(raw)?;
        waypoint_manager.add_waypoint(lon, lat);
    }

    let profile_manager = ProfileManager::new(Box::new(SqliteStore::open_default()?));
    let profile = match &opts.profile {
        Some(requested) => profile_manager.find_profile(requested).ok_or_else(|| {
            Error::Other(format!("no routing profile named '{}'", requested))
        })?,
        None => profile_manager
            .find_profile(config.default_profile())
            .unwrap_or_else(|| profile_manager.default_profile()),
    };
    info!("planning with profile '{}'", profile.name);

    let style_mode = if opts.surface_quality {
        StyleMode::SurfaceQuality
    } else {
        StyleMode::TrackColor
    };

    let mut manager = TrackManager::new(TrackRepository::new(Box::new(
        SqliteStore::open_default()?,
    )));
    manager.load_from_storage();
    let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);

    let mut planner = RoutePlanner::new(config.get_routing_handler()?);
    let routes = planner.compute_routes(waypoint_manager.waypoints(), &profile.settings)?;
    if routes.is_empty() {
        warn!("the routing service returned no usable candidates");
        return Ok(());
    }

    let ids = planner.materialize_temporary_tracks(
        &routes,
        waypoint_manager.waypoints(),
        &mut manager,
        &mut surface,
        style_mode,
    );

    for id in &ids {
        let track = match manager.get_track(id) {
            Some(track) => track,
            None => continue,
        };
        let route = track.route();
        match route.stats {
            Some(stats) => println!(
                "{}: {:.1} km, {:.0} min, +{:.0} m / -{:.0} m",
                track.name(),
                stats.distance_meters / 1000.0,
                stats.duration_seconds / 60.0,
                stats.elevation_gain_meters,
                stats.elevation_drop_meters,
            ),
            None => println!("{}: no aggregate statistics", track.name()),
        }
    }

    // the first candidate is the one follow-up actions operate on
    let mut first_id = ids[0].clone();
    if let Some(name) = &opts.save {
        match manager.save_temporary_track_as_permanent(&first_id, name, &mut surface, style_mode)
        {
            Some(new_id) => {
                println!("saved '{}' ({})", name, new_id);
                first_id = new_id;
            }
            None => warn!("could not save track '{}'", first_id),
        }
    }

    if let Some(directory) = &opts.gpx {
        let track = manager
            .get_track(&first_id)
            .ok_or_else(|| Error::TrackNotFound(first_id.clone()))?;
        let path = track.export_gpx_to(directory)?;
        println!("wrote {:?}", path);
    }

    Ok(())
}
