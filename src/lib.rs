//! Core of the Ibex gravel cycling route planner
//!
//! Waypoints go in, candidate routes come back from a routing API, and a
//! collection of named, colored tracks (temporary or saved) is kept in sync
//! with an injected map rendering surface, persisted to local storage and
//! exportable as GPX.

pub mod cli;
pub mod config;
mod db;
mod error;
pub mod gps;
pub mod planner;
pub mod profiles;
pub mod route;
pub mod services;
pub mod storage;
pub mod surface;
pub mod track;
pub mod waypoints;

pub use db::{create_database, db_path, open_db_connection};
pub use error::Error;
pub use planner::RoutePlanner;
pub use profiles::{predefined_profiles, ProfileManager, RoutingProfile};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, TrackRepository};
pub use surface::{MapSurface, MemorySurface};
pub use track::{StyleMode, Track, TrackData, TrackManager};
pub use waypoints::{Waypoint, WaypointManager};
