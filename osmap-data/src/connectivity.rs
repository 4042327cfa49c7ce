//! Connectivity as reported by the Linux kernel.
//!
//! The routing table is the primary source: the default route names the
//! active interface, and a gateway on that route means packets can leave the
//! local network. When the table is unreadable the monitor falls back to
//! interface operational state, which only says whether a link is up.

use camino::{Utf8Path, Utf8PathBuf};
use osmap_core::{NetworkCapabilities, NetworkMonitor, NetworkStatus};

/// Kernel IPv4 routing table.
pub const PROC_NET_ROUTE: &str = "/proc/net/route";

/// Directory listing one entry per network interface.
pub const SYS_CLASS_NET: &str = "/sys/class/net";

const RTF_UP: u32 = 0x0001;
const RTF_GATEWAY: u32 = 0x0002;
const DEFAULT_DESTINATION: &str = "00000000";
const LOOPBACK: &str = "lo";

/// [`NetworkMonitor`] backed by `/proc` and `/sys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNetworkMonitor {
    route_table: Utf8PathBuf,
    interfaces_dir: Utf8PathBuf,
}

impl Default for SystemNetworkMonitor {
    fn default() -> Self {
        Self::with_paths(PROC_NET_ROUTE, SYS_CLASS_NET)
    }
}

impl SystemNetworkMonitor {
    /// Monitor reading the standard kernel locations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor reading an alternative routing table and interface directory.
    #[must_use]
    pub fn with_paths(
        route_table: impl Into<Utf8PathBuf>,
        interfaces_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            route_table: route_table.into(),
            interfaces_dir: interfaces_dir.into(),
        }
    }

    fn legacy_status(&self) -> Option<NetworkStatus> {
        let names = match osmap_fs::list_dir_names(&self.interfaces_dir) {
            Ok(names) => names,
            Err(err) => {
                log::debug!("cannot list {}: {err}", self.interfaces_dir);
                return None;
            }
        };
        let connected = names
            .iter()
            .filter(|name| name.as_str() != LOOPBACK)
            .any(|name| interface_is_up(&self.interfaces_dir.join(name)));
        Some(NetworkStatus::Legacy { connected })
    }
}

impl NetworkMonitor for SystemNetworkMonitor {
    fn active_network(&self) -> Option<NetworkStatus> {
        match osmap_fs::read_utf8_to_string(&self.route_table) {
            Ok(table) => default_route(&table).map(NetworkStatus::Capabilities),
            Err(err) => {
                log::debug!(
                    "cannot read {}: {err}; using interface state",
                    self.route_table
                );
                self.legacy_status()
            }
        }
    }
}

fn interface_is_up(interface: &Utf8Path) -> bool {
    osmap_fs::read_utf8_to_string(&interface.join("operstate"))
        .is_ok_and(|state| state.trim() == "up")
}

/// Find the lowest-metric default route in a `/proc/net/route` listing.
fn default_route(table: &str) -> Option<NetworkCapabilities> {
    table
        .lines()
        .skip(1)
        .filter_map(parse_route_line)
        .filter(|route| route.destination == DEFAULT_DESTINATION && route.flags & RTF_UP != 0)
        .min_by_key(|route| route.metric)
        .map(|route| NetworkCapabilities {
            interface: Some(route.interface.to_owned()),
            internet: route.flags & RTF_GATEWAY != 0,
        })
}

struct RouteEntry<'a> {
    interface: &'a str,
    destination: &'a str,
    flags: u32,
    metric: u32,
}

fn parse_route_line(line: &str) -> Option<RouteEntry<'_>> {
    let mut fields = line.split_whitespace();
    let interface = fields.next()?;
    let destination = fields.next()?;
    let _gateway = fields.next()?;
    let flags = u32::from_str_radix(fields.next()?, 16).ok()?;
    let _refcnt = fields.next()?;
    let _use = fields.next()?;
    let metric = fields.next()?.parse().ok()?;
    Some(RouteEntry {
        interface,
        destination,
        flags,
        metric,
    })
}
