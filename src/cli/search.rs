//! Forward geocoding search from the command line
use crate::config::Config;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct SearchOpts {
    /// Place name to look up
    #[structopt(name = "QUERY", required = true)]
    query: Vec<String>,
}

pub fn search_command(config: Config, opts: SearchOpts) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = config.get_geocoding_handler()?;
    let query = opts.query.join(" ");
    let places = geocoder.forward(&query)?;

    if places.is_empty() {
        println!("No places found for '{}'.", query);
        return Ok(());
    }

    for place in places {
        println!(
            "{} ({:.5}, {:.5})",
            place.place_name, place.center[1], place.center[0]
        );
    }
    Ok(())
}
