//! HTTP access to the route service and the Overpass interpreter.
//!
//! [`HttpMapService`] implements [`osmap_core::MapService`] with a single
//! `reqwest` client:
//!
//! - routes are requested with `POST {route_base_url}/map_route` and a JSON
//!   body, and decoded from JSON;
//! - map data is requested with `GET {overpass_base_url}/api/interpreter`
//!   carrying the query in the `data` parameter, and checked to be an OSM
//!   XML document before being handed back.
//!
//! # Example
//!
//! ```no_run
//! use osmap_core::{Algorithm, LatLon, MapService, RouteRequest};
//! use osmap_data::http::{HttpMapService, MapServiceConfig};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpMapService::with_config(
//!     MapServiceConfig::new()
//!         .with_route_base_url("http://localhost:5000")
//!         .with_timeout(Duration::from_secs(30)),
//! )?;
//! let request = RouteRequest::new(
//!     LatLon::new(17.7491299, -97.76906)?,
//!     LatLon::new(17.8771799, -97.7329293)?,
//!     Algorithm::new("busqueda_bidireccional")?,
//! );
//! let response = service.fetch_route(&request).await?;
//! println!("{} points", response.ruta.map_or(0, |ruta| ruta.len()));
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod overpass;

pub use client::{ClientBuildError, HttpMapService};
pub use config::{
    DEFAULT_OVERPASS_BASE_URL, DEFAULT_ROUTE_BASE_URL, DEFAULT_USER_AGENT, MapServiceConfig,
};
pub use overpass::{DocumentError, inspect_document};
