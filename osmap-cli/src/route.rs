//! `route` command: fetch a route and print it in display order.

use std::io::Write;

use camino::Utf8Path;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmap_core::{Algorithm, FetchPlan, FetchWorkflow, MapService, NetworkMonitor, RouteRequest};
use osmap_data::{FileMapStore, HttpMapService, MapServiceConfig, SystemNetworkMonitor};
use serde::{Deserialize, Serialize};

use crate::host::{Services, drive, finish};
use crate::{
    ARG_ALGORITHM, ARG_END, ARG_MODE, ARG_ROUTE_BASE_URL, ARG_START, ARG_TIMEOUT_SECS, CliError,
    ENV_ROUTE_ALGORITHM, ENV_ROUTE_END, ENV_ROUTE_START, ModeArg, parse_coordinate,
    request_timeout,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ask the route service for a path between two points and \
                 print it one lat,lon pair per line. Endpoints and the \
                 service URL can come from CLI flags, configuration files, \
                 or environment variables.",
    about = "Fetch a route between two points"
)]
#[ortho_config(prefix = "OSMAP")]
pub(crate) struct RouteArgs {
    /// Start point as `lat,lon`.
    #[arg(long = ARG_START, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// End point as `lat,lon`.
    #[arg(long = ARG_END, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) end: Option<String>,
    /// Name of the routing algorithm the service should run.
    #[arg(long = ARG_ALGORITHM, value_name = "name")]
    #[serde(default)]
    pub(crate) algorithm: Option<String>,
    /// Base URL for the route service (e.g. "http://localhost:5000").
    #[arg(long = ARG_ROUTE_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) route_base_url: Option<String>,
    /// Whether connectivity gates the request (default: always-fetch).
    #[arg(long = ARG_MODE, value_enum)]
    #[serde(default)]
    pub(crate) mode: Option<ModeArg>,
    /// Give up on the request after this many seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    pub(crate) request: RouteRequest,
    pub(crate) service: MapServiceConfig,
    pub(crate) mode: ModeArg,
}

impl RouteConfig {
    pub(crate) fn workflow(&self) -> FetchWorkflow {
        FetchWorkflow::new(
            self.mode.into(),
            FetchPlan::RoutePolyline {
                request: self.request.clone(),
            },
        )
    }
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let start = args.start.ok_or(CliError::MissingArgument {
            field: ARG_START,
            env: ENV_ROUTE_START,
        })?;
        let end = args.end.ok_or(CliError::MissingArgument {
            field: ARG_END,
            env: ENV_ROUTE_END,
        })?;
        let algorithm = args.algorithm.ok_or(CliError::MissingArgument {
            field: ARG_ALGORITHM,
            env: ENV_ROUTE_ALGORITHM,
        })?;

        let request = RouteRequest::new(
            parse_coordinate(ARG_START, &start)?,
            parse_coordinate(ARG_END, &end)?,
            Algorithm::new(algorithm).map_err(CliError::InvalidAlgorithm)?,
        );

        let mut service = MapServiceConfig::new();
        if let Some(base_url) = args.route_base_url {
            service = service.with_route_base_url(base_url);
        }
        if let Some(timeout) = request_timeout(args.timeout_secs)? {
            service = service.with_timeout(timeout);
        }

        Ok(Self {
            request,
            service,
            mode: args.mode.unwrap_or(ModeArg::AlwaysFetch),
        })
    }
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let service = HttpMapService::with_config(config.service.clone())?;
    let network = SystemNetworkMonitor::new();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    run_route_with(&config, &service, &network, &mut stdout, &mut stderr)
}

pub(crate) fn run_route_with(
    config: &RouteConfig,
    service: &dyn MapService,
    network: &dyn NetworkMonitor,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    // Route plans never touch the store.
    let store = FileMapStore::in_dir(Utf8Path::new("."));
    let services = Services {
        network,
        service,
        store: &store,
    };
    let workflow = config.workflow();
    let kind = workflow.plan().kind();
    let outcome = drive(workflow, &services, out, err)?;
    out.flush().map_err(CliError::WriteOutput)?;
    finish(kind, &outcome)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
