//! Export a saved track as a GPX file
use crate::storage::{SqliteStore, TrackRepository};
use crate::track::TrackManager;
use crate::Error;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ExportGpxOpts {
    /// Track to export, by id or name
    #[structopt(name = "TRACK")]
    track: String,
    /// Directory the GPX file is written into
    #[structopt(short, long, parse(from_os_str), default_value = ".")]
    output: PathBuf,
}

pub fn export_gpx_command(opts: ExportGpxOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = TrackManager::new(TrackRepository::new(Box::new(
        SqliteStore::open_default()?,
    )));
    manager.load_from_storage();

    let track = manager
        .all_tracks()
        .iter()
        .find(|t| t.id() == opts.track || t.name() == opts.track)
        .ok_or_else(|| Error::TrackNotFound(opts.track.clone()))?;

    let path = track.export_gpx_to(&opts.output)?;
    println!("wrote {:?}", path);
    Ok(())
}
