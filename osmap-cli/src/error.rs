//! Error types emitted by the osmap CLI.

use std::sync::Arc;

use osmap_core::{CoordinateError, ResponseKind, RouteRequestError};
use osmap_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the osmap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate option could not be parsed or was out of range.
    #[error("invalid {field} {value:?}: {source}")]
    InvalidCoordinate {
        field: &'static str,
        value: String,
        #[source]
        source: CoordinateError,
    },
    /// The algorithm option was blank.
    #[error("invalid algorithm: {0}")]
    InvalidAlgorithm(#[source] RouteRequestError),
    /// The query radius was zero.
    #[error("radius-m must be greater than zero")]
    ZeroRadius,
    /// The request timeout was zero.
    #[error("timeout-secs must be greater than zero")]
    ZeroTimeout,
    /// Constructing the HTTP client failed.
    #[error(transparent)]
    BuildClient(#[from] ClientBuildError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// The workflow ran but did not deliver what was asked for.
    #[error("{kind} request did not complete")]
    Unsuccessful { kind: ResponseKind },
}
