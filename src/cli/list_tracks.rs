//! List the permanent tracks stored in the local database
use crate::storage::{SqliteStore, TrackRepository};
use crate::track::TrackManager;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ListTracksOpts {}

pub fn list_tracks_command(_opts: ListTracksOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = TrackManager::new(TrackRepository::new(Box::new(
        SqliteStore::open_default()?,
    )));
    manager.load_from_storage();

    let tracks = manager.permanent_tracks();
    if tracks.is_empty() {
        println!("No saved tracks.");
        return Ok(());
    }

    println!(
        "{:<24} {:<28} {:>9} {:<10} {:<25}",
        "ID", "NAME", "KM", "COLOR", "CREATED"
    );
    for track in tracks {
        let distance = track
            .route()
            .stats
            .map(|s| format!("{:.1}", s.distance_meters / 1000.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<28} {:>9} {:<10} {:<25}",
            track.id(),
            track.name(),
            distance,
            track.color(),
            track.created_at(),
        );
    }
    Ok(())
}
