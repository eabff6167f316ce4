// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod server;

use anyhow::Error;
use clap::{App, Arg, ArgMatches};
use config::Config;
use controller::{MemoryStore, RatingTransactionHandler};
use ratings_pg::PgStore;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::collections::HashMap;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn log_level(matches: &ArgMatches) -> LevelFilter {
    if matches.is_present("quiet") {
        return LevelFilter::Error;
    }

    match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn load_config(matches: &ArgMatches) -> Result<Config, Error> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let vars: HashMap<String, String> = dotenv::vars().collect();
    config.apply_env(&vars)?;

    if let Some(port) = matches.value_of("port") {
        config.server.port = port.parse()?;
    }

    Ok(config)
}

fn main() -> Result<(), Error> {
    let matches = App::new("rating-service")
        .version(VERSION)
        .about("Create, update, get and delete music ratings over HTTP")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .takes_value(true)
                .help("Port to listen on, overrides config and environment"),
        )
        .arg(
            Arg::with_name("in-memory")
                .long("in-memory")
                .help("Keep ratings in process memory instead of PostgreSQL"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("More logging, repeat for trace output"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .get_matches();

    TermLogger::init(
        log_level(&matches),
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config = load_config(&matches)?;
    let runtime = tokio::runtime::Runtime::new()?;

    if matches.is_present("in-memory") {
        log::warn!("Ratings are kept in memory, they'll be lost on exit");
        let handler = RatingTransactionHandler::new(MemoryStore::new());
        runtime.block_on(server::run(handler, &config.server))
    } else {
        let handler = RatingTransactionHandler::new(PgStore::from_config(&config.database));
        runtime.block_on(server::run(handler, &config.server))
    }
}
