use log::debug;
use moto_track::cli::Cli;
use moto_track::config::Config;
use moto_track::{create_database, data_dir};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::fs::{create_dir_all, File};
use std::path::PathBuf;
use structopt::StructOpt;

static CONFIG_FILE_NAME: &str = "config.yml";

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("moto-track")
        .join(CONFIG_FILE_NAME)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();

    // every key is optional so a missing file means running with the defaults
    let config_file = config_path();
    let config = if config_file.exists() {
        let mut fp = File::open(&config_file)?;
        Config::load(&mut fp)?
    } else {
        Config::default()
    };

    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(
        level_filter,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    debug!("Using configuration file: {:?}", config_file);

    // create data_dir if needed
    if !data_dir().exists() {
        create_dir_all(data_dir())?;
    }

    // create database if needed
    create_database()?;

    // execute any subcommands
    opt.execute_subcommand(config)
}
