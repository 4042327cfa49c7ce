//! Command-line host for the osmap fetch workflow.
//!
//! Each subcommand drives one workflow run against the live services and
//! prints what a map screen would draw: route points as `lat,lon` lines on
//! stdout, the stored map-data path for overlays, and notifications on
//! stderr.
#![forbid(unsafe_code)]

use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use osmap_core::{FetchMode, LatLon, NetworkMonitor, is_internet_available};
use osmap_data::SystemNetworkMonitor;
use serde::{Deserialize, Serialize};

mod error;
mod host;
mod map_data;
mod route;

pub use error::CliError;

use map_data::{MapDataArgs, run_map_data};
use route::{RouteArgs, run_route};

const ARG_START: &str = "start";
const ARG_END: &str = "end";
const ARG_ALGORITHM: &str = "algorithm";
const ARG_ROUTE_BASE_URL: &str = "route-base-url";
const ARG_OVERPASS_BASE_URL: &str = "overpass-base-url";
const ARG_DATA_DIR: &str = "data-dir";
const ARG_CENTRE: &str = "centre";
const ARG_RADIUS_M: &str = "radius-m";
const ARG_MODE: &str = "mode";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_ROUTE_START: &str = "OSMAP_CMDS_ROUTE_START";
const ENV_ROUTE_END: &str = "OSMAP_CMDS_ROUTE_END";
const ENV_ROUTE_ALGORITHM: &str = "OSMAP_CMDS_ROUTE_ALGORITHM";

/// Run the osmap CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Route(args) => run_route(args),
        Command::MapData(args) => run_map_data(args),
        Command::Connectivity => {
            let mut stdout = std::io::stdout().lock();
            run_connectivity_with(&SystemNetworkMonitor::new(), &mut stdout)
        }
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    // A logger may already be installed when embedded in tests.
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osmap",
    about = "Fetch routes and offline map data the way the map screen does",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a route between two points and print it.
    Route(RouteArgs),
    /// Download map data around a centre and store it for offline use.
    MapData(MapDataArgs),
    /// Report whether the active network reaches the internet.
    Connectivity,
}

/// How a command treats connectivity before issuing its request.
///
/// `map-data` defaults to offline-first and `route` to always-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ModeArg {
    /// Skip the request when offline and use stored data instead.
    OfflineFirst,
    /// Always issue the request.
    AlwaysFetch,
}

impl From<ModeArg> for FetchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::OfflineFirst => Self::OfflineFirst,
            ModeArg::AlwaysFetch => Self::AlwaysFetch,
        }
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<LatLon, CliError> {
    value
        .parse::<LatLon>()
        .map_err(|source| CliError::InvalidCoordinate {
            field,
            value: value.to_owned(),
            source,
        })
}

fn request_timeout(secs: Option<u64>) -> Result<Option<Duration>, CliError> {
    match secs {
        Some(0) => Err(CliError::ZeroTimeout),
        other => Ok(other.map(Duration::from_secs)),
    }
}

fn run_connectivity_with(
    network: &dyn NetworkMonitor,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let label = if is_internet_available(network) {
        "online"
    } else {
        "offline"
    };
    writeln!(out, "{label}").map_err(CliError::WriteOutput)?;
    out.flush().map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
