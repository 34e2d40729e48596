//! List the available routing profiles
use crate::profiles::ProfileManager;
use crate::storage::SqliteStore;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ProfilesOpts {}

pub fn profiles_command(_opts: ProfilesOpts) -> Result<(), Box<dyn std::error::Error>> {
    let manager = ProfileManager::new(Box::new(SqliteStore::open_default()?));

    println!(
        "{:<24} {:<16} {:<26} {:<20} {:<8}",
        "NAME", "BIKE", "SURFACE", "TRAFFIC", "KIND"
    );
    for profile in manager.profiles() {
        let kind = if profile.is_custom {
            "custom"
        } else if profile.is_default {
            "default"
        } else {
            "built-in"
        };
        println!(
            "{:<24} {:<16} {:<26} {:<20} {:<8}",
            profile.name,
            format!("{:?}", profile.settings.bike_type),
            format!("{:?}", profile.settings.surface),
            format!("{:?}", profile.settings.traffic),
            kind,
        );
    }
    Ok(())
}
