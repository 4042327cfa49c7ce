//! Decide whether outbound internet connectivity is available.
//!
//! Platforms describe the active network in one of two ways: newer ones
//! expose a capability set, older ones only report whether the interface is
//! connected. [`is_internet_available`] accepts either report.

/// Capabilities declared by the active network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCapabilities {
    /// Interface carrying the default route, when known.
    pub interface: Option<String>,
    /// Whether the network declares that it reaches the internet.
    pub internet: bool,
}

/// Description of the current default network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkStatus {
    /// Capability-based report.
    Capabilities(NetworkCapabilities),
    /// Connection state only, as reported by older platforms.
    Legacy {
        /// Whether the active interface is connected.
        connected: bool,
    },
}

impl NetworkStatus {
    /// Whether this report counts as internet access.
    #[must_use]
    pub fn has_internet(&self) -> bool {
        match self {
            Self::Capabilities(capabilities) => capabilities.internet,
            Self::Legacy { connected } => *connected,
        }
    }
}

/// Source of network state, usually backed by the operating system.
///
/// Implementations must not fail: an unreadable or absent network is
/// reported as `None`.
pub trait NetworkMonitor {
    /// Report the current default network, or `None` when there is none.
    fn active_network(&self) -> Option<NetworkStatus>;
}

/// Return `true` only when the active network reaches the internet.
///
/// # Examples
/// ```
/// use osmap_core::{NetworkMonitor, NetworkStatus, is_internet_available};
///
/// struct Offline;
///
/// impl NetworkMonitor for Offline {
///     fn active_network(&self) -> Option<NetworkStatus> {
///         None
///     }
/// }
///
/// assert!(!is_internet_available(&Offline));
/// ```
pub fn is_internet_available<M: NetworkMonitor + ?Sized>(monitor: &M) -> bool {
    let status = monitor.active_network();
    log::debug!("active network: {status:?}");
    status.is_some_and(|found| found.has_internet())
}
