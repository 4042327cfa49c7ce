//! Endpoint and transport settings for [`super::HttpMapService`].

use std::time::Duration;

/// Route service used when none is configured.
pub const DEFAULT_ROUTE_BASE_URL: &str = "http://localhost:5000";

/// Public Overpass instance used when none is configured.
pub const DEFAULT_OVERPASS_BASE_URL: &str = "https://overpass-api.de";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("osmap/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`super::HttpMapService`].
///
/// Requests carry no timeout unless [`MapServiceConfig::with_timeout`] sets
/// one; the transport's own limits apply otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapServiceConfig {
    /// Base URL of the route service; `/map_route` is appended.
    pub route_base_url: String,
    /// Base URL of the Overpass instance; `/api/interpreter` is appended.
    pub overpass_base_url: String,
    /// User agent string for requests.
    pub user_agent: String,
    /// Overall request timeout.
    pub timeout: Option<Duration>,
    /// Whether proxy settings from the environment apply.
    pub system_proxy: bool,
}

impl Default for MapServiceConfig {
    fn default() -> Self {
        Self {
            route_base_url: DEFAULT_ROUTE_BASE_URL.to_owned(),
            overpass_base_url: DEFAULT_OVERPASS_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: None,
            system_proxy: true,
        }
    }
}

impl MapServiceConfig {
    /// Configuration pointing at the default endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route service base URL.
    #[must_use]
    pub fn with_route_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.route_base_url = base_url.into();
        self
    }

    /// Set the Overpass base URL.
    #[must_use]
    pub fn with_overpass_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.overpass_base_url = base_url.into();
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Connect directly, ignoring `HTTP_PROXY` and friends.
    #[must_use]
    pub const fn without_system_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }
}
