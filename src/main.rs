// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

#![deny(warnings)]

use clap::{App, Arg, ArgMatches};
use quick_geocode_client::{Config, GeocodeResult, IpLookupResult};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, self};
use std::fs::File;
use std::io;
use std::num::{ParseFloatError, ParseIntError};
use std::path::Path;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

fn app() -> App<'static, 'static> {
    App::new(APP_NAME)
        .version(APP_VERSION)
        .author(APP_AUTHORS)
        .about("quick-geocode command-line client")
        .after_help("EXAMPLES:\n    \
            quick-geocode \"Sydney, Australia\"\n    \
            quick-geocode --reverse --lat 48.8584 --lon 2.2945\n    \
            quick-geocode --ip 8.8.8.8\n    \
            quick-geocode --server http://api.example.com \"Paris, France\"")
        .arg(
            Arg::with_name("QUERY")
                .help("Place name to geocode")
        )
        .arg(
            Arg::with_name("SERVER")
                .short("s")
                .long("server")
                .takes_value(true)
                .help("API server URL (default: http://localhost:3000)")
        )
        .arg(
            Arg::with_name("CONFIG")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Path to JSON client configuration file")
        )
        .arg(
            Arg::with_name("SEARCH")
                .long("search")
                .requires("QUERY")
                .help("Search for multiple results")
        )
        .arg(
            Arg::with_name("LIMIT")
                .long("limit")
                .takes_value(true)
                .requires("SEARCH")
                .help("Limit number of search results")
        )
        .arg(
            Arg::with_name("REVERSE")
                .long("reverse")
                .conflicts_with_all(&["QUERY", "IP", "INFO"])
                .help("Reverse geocode coordinates")
        )
        .arg(
            Arg::with_name("LAT")
                .long("lat")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Latitude for reverse geocoding")
        )
        .arg(
            Arg::with_name("LON")
                .long("lon")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Longitude for reverse geocoding")
        )
        .arg(
            Arg::with_name("ZOOM")
                .long("zoom")
                .takes_value(true)
                .help("Zoom level for reverse geocoding (0-18)")
        )
        .arg(
            Arg::with_name("IP")
                .long("ip")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .conflicts_with_all(&["QUERY", "INFO"])
                .help("IP address to look up (omit the value for current IP)")
        )
        .arg(
            Arg::with_name("INFO")
                .long("info")
                .conflicts_with("QUERY")
                .help("Show server information")
        )
        .arg(
            Arg::with_name("FORMAT")
                .short("f")
                .long("format")
                .takes_value(true)
                .possible_values(&["json", "simple"])
                .default_value("json")
                .help("Output format")
        )
        .arg(
            Arg::with_name("QUIET")
                .short("q")
                .long("quiet")
                .help("Suppress error messages")
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase log verbosity")
        )
}

fn run(matches: &ArgMatches) -> Result<(), AppError> {
    init_logging(matches.occurrences_of("VERBOSE"))?;
    let mut config = match matches.value_of("CONFIG") {
        Some(path) => {
            let file = File::open(Path::new(path))
                .map_err(AppError::FailedToOpenConfigFile)?;
            Config::from_config(file).map_err(AppError::BadConfigFile)?
        }
        None => Config::default(),
    };
    if let Some(server) = matches.value_of("SERVER") {
        config = config.base_url(server);
    }
    let client = config.build().map_err(AppError::Client)?;
    if !client.health_check() {
        return Err(AppError::Unreachable(client.base_url().to_string()));
    }
    let simple = matches.value_of("FORMAT") == Some("simple");
    if matches.is_present("REVERSE") {
        let lat = required_f64(matches, "LAT")?;
        let lon = required_f64(matches, "LON")?;
        let zoom = matches.value_of("ZOOM")
            .map(|z| z.parse::<u8>())
            .transpose()
            .map_err(AppError::BadZoom)?;
        let result = client.reverse_geocode(lat, lon, zoom)
            .map_err(AppError::Client)?
            .ok_or(AppError::NotFound)?;
        print_place(&result, simple)
    } else if matches.is_present("IP") {
        let result = client.lookup_ip(matches.value_of("IP"))
            .map_err(AppError::Client)?
            .ok_or(AppError::IpLookupFailed)?;
        print_ip(&result, simple)
    } else if matches.is_present("INFO") {
        let info = client.api_info()
            .map_err(AppError::Client)?
            .ok_or(AppError::NotFound)?;
        print_json(&info)
    } else if let Some(query) = matches.value_of("QUERY") {
        if matches.is_present("SEARCH") {
            let limit = matches.value_of("LIMIT")
                .map(|l| l.parse::<u32>())
                .transpose()
                .map_err(AppError::BadLimit)?;
            let results = client.geocode_search(query, limit)
                .map_err(AppError::Client)?;
            if results.is_empty() {
                return Err(AppError::NotFound);
            }
            if simple {
                results.iter().for_each(print_simple_place);
                Ok(())
            } else {
                print_json(&results)
            }
        } else {
            let result = client.geocode(query)
                .map_err(AppError::Client)?
                .ok_or(AppError::NotFound)?;
            print_place(&result, simple)
        }
    } else {
        Err(AppError::NothingToDo)
    }
}

fn init_logging(verbosity: u64) -> Result<(), AppError> {
    let level = match verbosity {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).map_err(AppError::Logger)
}

fn required_f64(matches: &ArgMatches, name: &'static str)
    -> Result<f64, AppError>
{
    matches.value_of(name)
        .ok_or(AppError::MissingCoordinates)?
        .parse()
        .map_err(|e| AppError::BadCoordinate(name, e))
}

fn print_place(place: &GeocodeResult, simple: bool) -> Result<(), AppError> {
    if simple {
        print_simple_place(place);
        Ok(())
    } else {
        print_json(place)
    }
}

fn print_simple_place(place: &GeocodeResult) {
    println!("{},{},{}", place.coordinates.latitude,
        place.coordinates.longitude, place.label);
}

fn print_ip(result: &IpLookupResult, simple: bool) -> Result<(), AppError> {
    if simple {
        println!("{},{},{},{}", result.coordinates.latitude,
            result.coordinates.longitude,
            result.city.as_deref().unwrap_or_default(),
            result.country.as_deref().unwrap_or_default());
        Ok(())
    } else {
        print_json(result)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(AppError::Output)?;
    println!("{}", json);
    Ok(())
}

fn main() {
    let matches = app().get_matches();
    let quiet = matches.is_present("QUIET");
    let json = matches.value_of("FORMAT") == Some("json");
    let code = if let Err(e) = run(&matches) {
        if !quiet {
            print_error(e, json);
        }
        1
    } else {
        0
    };
    std::process::exit(code)
}

fn print_error(e: AppError, json: bool) {
    if let AppError::NothingToDo = e {
        let _ = app().print_help();
        eprintln!();
        return;
    }
    if json {
        if let Some(report) = error_json(&e) {
            eprintln!("{}", report);
            return;
        }
    }
    eprintln!("Error: {}", e);
    let mut e: &dyn Error = &e;
    while let Some(cause) = e.source() {
        eprintln!("Because: {}", cause);
        e = cause;
    }
}

#[derive(serde_derive::Serialize)]
struct ErrorReport<'a> {
    error: String,
    detail: &'a quick_geocode_client::Error,
}

/// JSON form of errors raised by the client library.
fn error_json(e: &AppError) -> Option<String> {
    let detail = match e {
        AppError::BadConfigFile(detail) | AppError::Client(detail) => detail,
        _ => return None,
    };
    serde_json::to_string(&ErrorReport {error: e.to_string(), detail}).ok()
}

#[derive(Debug)]
enum AppError {
    BadConfigFile(quick_geocode_client::Error),
    BadCoordinate(&'static str, ParseFloatError),
    BadLimit(ParseIntError),
    BadZoom(ParseIntError),
    Client(quick_geocode_client::Error),
    FailedToOpenConfigFile(io::Error),
    IpLookupFailed,
    Logger(log::SetLoggerError),
    MissingCoordinates,
    NotFound,
    NothingToDo,
    Output(serde_json::Error),
    Unreachable(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadConfigFile(_) => f.write_str("Bad configuration file"),
            AppError::BadCoordinate(name, _) =>
                write!(f, "Bad value for --{}", name.to_lowercase()),
            AppError::BadLimit(_) => f.write_str("Bad limit"),
            AppError::BadZoom(_) => f.write_str("Bad zoom level"),
            AppError::Client(e) => Display::fmt(e, f),
            AppError::FailedToOpenConfigFile(_) =>
                f.write_str("Failed to open configuration file"),
            AppError::IpLookupFailed => f.write_str("IP lookup failed"),
            AppError::Logger(_) => f.write_str("Failed to initialize logging"),
            AppError::MissingCoordinates =>
                f.write_str("--lat and --lon are required for reverse geocoding"),
            AppError::NotFound => f.write_str("No results found"),
            AppError::NothingToDo => f.write_str("Nothing to do"),
            AppError::Output(_) => f.write_str("Failed to format output"),
            AppError::Unreachable(url) =>
                write!(f, "Cannot connect to server at {}", url),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::BadConfigFile(e) => Some(e),
            AppError::BadCoordinate(_, e) => Some(e),
            AppError::BadLimit(e) => Some(e),
            AppError::BadZoom(e) => Some(e),
            AppError::Client(e) => e.source(),
            AppError::FailedToOpenConfigFile(e) => Some(e),
            AppError::Logger(e) => Some(e),
            AppError::Output(e) => Some(e),
            AppError::IpLookupFailed
            | AppError::MissingCoordinates
            | AppError::NotFound
            | AppError::NothingToDo
            | AppError::Unreachable(_) => None,
        }
    }
}
