use async_trait::async_trait;
use nrf_core::{InterfaceInfo, NetworkBackend, Route};
use tracing::{debug, warn};

use crate::command::{Privilege, ip};
use crate::parse::{parse_interfaces, parse_routes, route_args};

/// [`NetworkBackend`] that shells out to the iproute2 `ip` binary.
#[derive(Debug, Clone)]
pub struct IpRouteBackend {
    privilege: Privilege,
}

impl IpRouteBackend {
    pub fn new(privilege: Privilege) -> Self {
        Self { privilege }
    }

    async fn ip(&self, args: &[&str]) -> nrf_core::Result<String> {
        ip(args, self.privilege).await
    }

    async fn set_link(&self, name: &str, state: &str) -> nrf_core::Result<()> {
        self.ip(&["link", "set", "dev", name, state]).await?;
        debug!(interface = %name, state, "link state set");
        Ok(())
    }

    async fn route(&self, verb: &str, route: &Route) -> nrf_core::Result<()> {
        let route_argv = route_args(route);
        let mut args = vec!["-4", "route", verb];
        args.extend(route_argv.iter().map(String::as_str));
        self.ip(&args).await?;
        debug!(route = %route, verb, "route updated");
        Ok(())
    }
}

#[async_trait]
impl NetworkBackend for IpRouteBackend {
    fn name(&self) -> &str {
        "iproute2"
    }

    async fn interfaces(&self) -> Vec<InterfaceInfo> {
        let output = match self.ip(&["-j", "addr", "show"]).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "failed to list interfaces");
                return Vec::new();
            }
        };
        parse_interfaces(&output).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable interface listing");
            Vec::new()
        })
    }

    async fn routes(&self, device: Option<&str>) -> Vec<Route> {
        let mut args = vec!["-j", "-4", "route", "show"];
        if let Some(dev) = device {
            args.extend(["dev", dev]);
        }
        let output = match self.ip(&args).await {
            Ok(output) => output,
            Err(e) => {
                debug!(device = ?device, error = %e, "failed to list routes");
                return Vec::new();
            }
        };
        parse_routes(&output, device).unwrap_or_else(|e| {
            warn!(device = ?device, error = %e, "unreadable route listing");
            Vec::new()
        })
    }

    async fn set_link_up(&self, name: &str) -> nrf_core::Result<()> {
        self.set_link(name, "up").await
    }

    async fn set_link_down(&self, name: &str) -> nrf_core::Result<()> {
        self.set_link(name, "down").await
    }

    async fn add_route(&self, route: &Route) -> nrf_core::Result<()> {
        self.route("add", route).await
    }

    async fn delete_route(&self, route: &Route) -> nrf_core::Result<()> {
        self.route("del", route).await
    }
}
