//! iproute2 JSON output (`ip -j ...`) and route arguments.

use std::net::{IpAddr, Ipv4Addr};

use ipnet::{IpNet, Ipv4Net};
use nrf_core::{InterfaceInfo, Route, RouteScope};
use serde::Deserialize;

/// One entry of `ip -j addr show`.
#[derive(Debug, Deserialize)]
struct LinkEntry {
    #[serde(default)]
    ifindex: u32,
    #[serde(default)]
    ifname: String,
    #[serde(default)]
    addr_info: Vec<AddrEntry>,
}

#[derive(Debug, Deserialize)]
struct AddrEntry {
    local: Option<IpAddr>,
    prefixlen: Option<u8>,
}

/// One entry of `ip -j -4 route show`.
#[derive(Debug, Deserialize)]
struct RouteEntry {
    dst: Option<String>,
    gateway: Option<Ipv4Addr>,
    dev: Option<String>,
    scope: Option<String>,
}

/// Parse `ip -j addr show` into interfaces, keeping each interface's
/// address order.
pub fn parse_interfaces(json: &str) -> Result<Vec<InterfaceInfo>, serde_json::Error> {
    let entries: Vec<LinkEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .filter(|e| !e.ifname.is_empty())
        .map(|e| InterfaceInfo {
            name: e.ifname,
            index: e.ifindex,
            addresses: e
                .addr_info
                .into_iter()
                .filter_map(|a| IpNet::new(a.local?, a.prefixlen?).ok())
                .collect(),
        })
        .collect())
}

/// Parse `ip -j -4 route show [dev X]`.
///
/// When the listing was filtered by device, iproute2 omits `dev` from each
/// entry; `device` fills it back in.
pub fn parse_routes(json: &str, device: Option<&str>) -> Result<Vec<Route>, serde_json::Error> {
    let entries: Vec<RouteEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .filter_map(|e| {
            let destination = match e.dst.as_deref() {
                Some("default") => None,
                Some(dst) => Some(parse_destination(dst)?),
                None => return None,
            };
            Some(Route {
                destination,
                gateway: e.gateway,
                device: e.dev.or_else(|| device.map(String::from)),
                scope: e.scope.as_deref().map_or(RouteScope::Universe, RouteScope::from),
            })
        })
        .collect())
}

/// `10.0.0.0/24` or a bare host address (`10.0.0.1` → `/32`).
fn parse_destination(dst: &str) -> Option<Ipv4Net> {
    if dst.contains('/') {
        dst.parse().ok()
    } else {
        dst.parse::<Ipv4Addr>().ok().map(Ipv4Net::from)
    }
}

/// Arguments after `ip -4 route add|del` identifying `route`.
pub fn route_args(route: &Route) -> Vec<String> {
    let mut args = vec![match &route.destination {
        Some(dst) => dst.to_string(),
        None => "default".to_string(),
    }];
    if let Some(gw) = route.gateway {
        args.push("via".into());
        args.push(gw.to_string());
    }
    if let Some(dev) = &route.device {
        args.push("dev".into());
        args.push(dev.clone());
    }
    args.push("scope".into());
    args.push(route.scope.as_str().to_string());
    args
}
