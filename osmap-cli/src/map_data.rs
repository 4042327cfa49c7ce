//! `map-data` command: download map data around a centre for offline use.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmap_core::{
    DEFAULT_QUERY_RADIUS_M, FetchPlan, FetchWorkflow, LatLon, MapDataQuery, MapService, MapView,
    NetworkMonitor, OfflineStore,
};
use osmap_data::{FileMapStore, HttpMapService, MapServiceConfig, SystemNetworkMonitor};
use serde::{Deserialize, Serialize};

use crate::host::{Services, drive, finish};
use crate::{
    ARG_CENTRE, ARG_DATA_DIR, ARG_MODE, ARG_OVERPASS_BASE_URL, ARG_RADIUS_M, ARG_TIMEOUT_SECS,
    CliError, ModeArg, parse_coordinate, request_timeout,
};

/// CLI arguments for the `map-data` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Download highways and buildings around a centre from an \
                 Overpass instance and store the document for offline \
                 display. When offline, the previously stored document is \
                 shown instead.",
    about = "Download map data for offline use"
)]
#[ortho_config(prefix = "OSMAP")]
pub(crate) struct MapDataArgs {
    /// Base URL for the Overpass instance (e.g. "https://overpass-api.de").
    #[arg(long = ARG_OVERPASS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_base_url: Option<String>,
    /// Directory holding `map_data.xml`.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Centre of the requested area as `lat,lon`.
    #[arg(long = ARG_CENTRE, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) centre: Option<String>,
    /// Radius of the requested area in metres.
    #[arg(long = ARG_RADIUS_M, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_m: Option<u32>,
    /// Whether connectivity gates the request (default: offline-first).
    #[arg(long = ARG_MODE, value_enum)]
    #[serde(default)]
    pub(crate) mode: Option<ModeArg>,
    /// Give up on the request after this many seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl MapDataArgs {
    pub(crate) fn into_config(self) -> Result<MapDataConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MapDataConfig::try_from(merged)
    }
}

/// Resolved `map-data` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MapDataConfig {
    pub(crate) data_dir: Utf8PathBuf,
    pub(crate) centre: LatLon,
    pub(crate) radius_m: u32,
    pub(crate) service: MapServiceConfig,
    pub(crate) mode: ModeArg,
}

impl MapDataConfig {
    pub(crate) fn query(&self) -> MapDataQuery {
        MapDataQuery::highways_and_buildings(self.centre, self.radius_m)
    }

    pub(crate) fn workflow(&self) -> FetchWorkflow {
        FetchWorkflow::new(
            self.mode.into(),
            FetchPlan::TileDocument {
                query: self.query(),
            },
        )
        .with_view(MapView::centred_on(self.centre))
    }

    pub(crate) fn store(&self) -> FileMapStore {
        FileMapStore::in_dir(&self.data_dir)
    }
}

impl TryFrom<MapDataArgs> for MapDataConfig {
    type Error = CliError;

    fn try_from(args: MapDataArgs) -> Result<Self, Self::Error> {
        let centre = match args.centre {
            Some(text) => parse_coordinate(ARG_CENTRE, &text)?,
            None => MapView::DEFAULT_CENTRE,
        };
        let radius_m = args.radius_m.unwrap_or(DEFAULT_QUERY_RADIUS_M);
        if radius_m == 0 {
            return Err(CliError::ZeroRadius);
        }

        let mut service = MapServiceConfig::new();
        if let Some(base_url) = args.overpass_base_url {
            service = service.with_overpass_base_url(base_url);
        }
        if let Some(timeout) = request_timeout(args.timeout_secs)? {
            service = service.with_timeout(timeout);
        }

        Ok(Self {
            data_dir: args.data_dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
            centre,
            radius_m,
            service,
            mode: args.mode.unwrap_or(ModeArg::OfflineFirst),
        })
    }
}

pub(crate) fn run_map_data(args: MapDataArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let service = HttpMapService::with_config(config.service.clone())?;
    let network = SystemNetworkMonitor::new();
    let store = config.store();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    run_map_data_with(&config, &service, &network, &store, &mut stdout, &mut stderr)
}

pub(crate) fn run_map_data_with(
    config: &MapDataConfig,
    service: &dyn MapService,
    network: &dyn NetworkMonitor,
    store: &dyn OfflineStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let services = Services {
        network,
        service,
        store,
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
) -> Result<MapDataConfig, CliError> {
    let merged = MapDataArgs::merge_from_layers(layers).map_err(CliError::from)?;
    MapDataConfig::try_from(merged)
}
