//! Delete a saved track from the registry and local storage
use crate::storage::{SqliteStore, TrackRepository};
use crate::surface::{MemorySurface, ANCHOR_LAYER};
use crate::track::TrackManager;
use crate::Error;
use std::io::{self, BufRead, Write};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct DeleteTrackOpts {
    /// Track to delete, by id or name
    #[structopt(name = "TRACK")]
    track: String,
    /// Skip the confirmation prompt
    #[structopt(short, long)]
    yes: bool,
}

pub fn delete_track_command(opts: DeleteTrackOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = TrackManager::new(TrackRepository::new(Box::new(
        SqliteStore::open_default()?,
    )));
    manager.load_from_storage();

    let (id, name) = manager
        .all_tracks()
        .iter()
        .find(|t| t.id() == opts.track || t.name() == opts.track)
        .map(|t| (t.id().to_string(), t.name().to_string()))
        .ok_or_else(|| Error::TrackNotFound(opts.track.clone()))?;

    if !opts.yes && !confirm_deletion(&name)? {
        println!("Aborted.");
        return Ok(());
    }

    let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
    manager.delete_track(&id, &mut surface);
    println!("Deleted '{}'.", name);
    Ok(())
}

fn confirm_deletion(name: &str) -> Result<bool, io::Error> {
    print!(
        "Are you sure you want to delete \"{}\"? This action cannot be undone. [y/N] ",
        name
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
