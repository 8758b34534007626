use std::fmt;
use std::net::Ipv4Addr;

use ipnet::{IpNet, Ipv4Net};

/// One OS network interface as reported by the enumeration collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub index: u32,
    /// Configured addresses in the order the OS reports them.
    pub addresses: Vec<IpNet>,
}

/// A classified interface, paired with its synthetic peer address once allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub interface: String,
    pub peer: Option<Ipv4Addr>,
}

impl Member {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            peer: None,
        }
    }
}

/// How a bounce removes reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceMode {
    /// Bring the link itself down, then back up.
    Link,
    /// Keep the link up; delete its routes, then reinstall the host route to the peer.
    Route,
}

impl fmt::Display for BounceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BounceMode::Link => f.write_str("link"),
            BounceMode::Route => f.write_str("route"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteScope {
    Universe,
    Link,
    Host,
    Other(String),
}

impl RouteScope {
    pub fn as_str(&self) -> &str {
        match self {
            RouteScope::Universe => "global",
            RouteScope::Link => "link",
            RouteScope::Host => "host",
            RouteScope::Other(s) => s,
        }
    }
}

impl From<&str> for RouteScope {
    fn from(s: &str) -> Self {
        match s {
            "global" | "universe" => RouteScope::Universe,
            "link" => RouteScope::Link,
            "host" => RouteScope::Host,
            other => RouteScope::Other(other.to_string()),
        }
    }
}

/// An IPv4 routing table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// `None` is the default route.
    pub destination: Option<Ipv4Net>,
    pub gateway: Option<Ipv4Addr>,
    pub device: Option<String>,
    pub scope: RouteScope,
}

impl Route {
    /// Link-scoped `/32` route toward a peer through `device`.
    pub fn host(peer: Ipv4Addr, device: &str) -> Self {
        Self {
            destination: Some(Ipv4Net::from(peer)),
            gateway: None,
            device: Some(device.to_string()),
            scope: RouteScope::Link,
        }
    }

    /// Default route via `gateway`.
    pub fn default_via(gateway: Ipv4Addr) -> Self {
        Self {
            destination: None,
            gateway: Some(gateway),
            device: None,
            scope: RouteScope::Universe,
        }
    }

    pub fn is_default(&self) -> bool {
        self.destination.is_none()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Some(dst) => write!(f, "{dst}")?,
            None => f.write_str("default")?,
        }
        if let Some(gw) = &self.gateway {
            write!(f, " via {gw}")?;
        }
        if let Some(dev) = &self.device {
            write!(f, " dev {dev}")?;
        }
        write!(f, " scope {}", self.scope.as_str())
    }
}
