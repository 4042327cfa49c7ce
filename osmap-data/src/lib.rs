//! Platform adapters for the osmap workflow.
//!
//! - [`http`]: the `reqwest` client for the route service and Overpass.
//! - [`connectivity`]: a network monitor reading the Linux routing table.
//! - [`offline`]: the file-backed store for the downloaded document.
#![forbid(unsafe_code)]

pub mod connectivity;
pub mod http;
pub mod offline;

pub use connectivity::SystemNetworkMonitor;
pub use http::{ClientBuildError, HttpMapService, MapServiceConfig};
pub use offline::FileMapStore;
