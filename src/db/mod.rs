//! Database utility functions and the schema definition
use log::debug;
use rusqlite::{Connection, Result};
use std::path::PathBuf;

mod schema;
pub use schema::create_database;

static DATABASE_NAME: &str = "ibex-route-planner.db";

/// Open a connection to the local database and make sure the schema exists
pub fn open_db_connection() -> Result<Connection> {
    let db = db_path();
    debug!("Connected to local database located at: {:?}", db);
    let mut conn = Connection::open(&db)?;
    create_database(&mut conn)?;
    Ok(conn)
}

pub fn db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_default()
        .join(DATABASE_NAME)
}
