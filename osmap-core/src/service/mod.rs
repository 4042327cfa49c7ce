//! Fetch routes and map data from a remote service.
//!
//! The `MapService` trait abstracts the two requests the map screen can make:
//! a route between two points and an Overpass map-data document. HTTP
//! implementations live outside this crate so the workflow can be driven by
//! stubs in tests.

mod error;
mod provider;

pub use error::FetchError;
pub use provider::MapService;
