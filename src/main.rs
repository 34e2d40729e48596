use ibex_route_planner::cli::Cli;
use ibex_route_planner::config::Config;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::fs::File;
use structopt::StructOpt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();

    // read the application config, falling back to defaults when no file
    // exists at the default location
    let config = match opt.config_path() {
        Some(path) => {
            let mut fp = File::open(path)?;
            Config::load(&mut fp)?
        }
        None => match default_config_path().and_then(|p| File::open(p).ok()) {
            Some(mut fp) => Config::load(&mut fp)?,
            None => Config::default(),
        },
    };

    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(
        level_filter,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    // execute the requested subcommand
    opt.execute_subcommand(config)
}

fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ibex-route-planner.yml"))
}
