use rusqlite::{params, Connection, Result};

/// Create the required tables if they are missing
pub fn create_database(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "create table if not exists storage (
            key    text primary key,
            value  text not null
        )",
        params![],
    )?;
    tx.commit()?;
    Ok(())
}
