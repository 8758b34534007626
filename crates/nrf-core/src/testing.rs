//! In-memory `NetworkBackend` that records every mutation with its
//! (virtual) timestamp.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ipnet::IpNet;
use tokio::time::Instant;

use crate::backend::NetworkBackend;
use crate::error::{NetError, Result};
use crate::types::{InterfaceInfo, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LinkUp(String),
    LinkDown(String),
    AddRoute(Route),
    DeleteRoute(Route),
}

impl Call {
    pub fn is_disable(&self) -> bool {
        matches!(self, Call::LinkDown(_) | Call::DeleteRoute(_))
    }

    pub fn is_enable(&self) -> bool {
        matches!(self, Call::LinkUp(_) | Call::AddRoute(_))
    }
}

pub fn iface(name: &str, index: u32, addrs: &[&str]) -> InterfaceInfo {
    InterfaceInfo {
        name: name.to_string(),
        index,
        addresses: addrs.iter().map(|a| a.parse::<IpNet>().unwrap()).collect(),
    }
}

pub struct FakeBackend {
    interfaces: Vec<InterfaceInfo>,
    table: Mutex<Vec<Route>>,
    calls: Mutex<Vec<(Duration, Call)>>,
    denied: Mutex<HashSet<String>>,
    latency: Duration,
    start: Instant,
}

impl FakeBackend {
    pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
        Self {
            interfaces,
            table: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            denied: Mutex::new(HashSet::new()),
            latency: Duration::ZERO,
            start: Instant::now(),
        }
    }

    pub fn with_routes(self, routes: Vec<Route>) -> Self {
        *self.table.lock().unwrap() = routes;
        self
    }

    /// Each `set_link_down` takes `latency` before it lands.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every mutation touching `name` fails with `PermissionDenied`.
    pub fn deny(&self, name: &str) {
        self.denied.lock().unwrap().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<(Duration, Call)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn table(&self) -> Vec<Route> {
        self.table.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        let at = self.start.elapsed();
        self.calls.lock().unwrap().push((at, call));
    }

    fn check(&self, name: &str) -> Result<()> {
        if self.denied.lock().unwrap().contains(name) {
            return Err(NetError::PermissionDenied(format!("{name}: Operation not permitted")));
        }
        if !self.interfaces.iter().any(|i| i.name == name) {
            return Err(NetError::NotFound(format!("Cannot find device \"{name}\"")));
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn interfaces(&self) -> Vec<InterfaceInfo> {
        self.interfaces.clone()
    }

    async fn routes(&self, device: Option<&str>) -> Vec<Route> {
        self.table
            .lock()
            .unwrap()
            .iter()
            .filter(|r| device.is_none() || r.device.as_deref() == device)
            .cloned()
            .collect()
    }

    async fn set_link_up(&self, name: &str) -> Result<()> {
        self.check(name)?;
        self.record(Call::LinkUp(name.to_string()));
        Ok(())
    }

    async fn set_link_down(&self, name: &str) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.check(name)?;
        self.record(Call::LinkDown(name.to_string()));
        Ok(())
    }

    async fn add_route(&self, route: &Route) -> Result<()> {
        if let Some(dev) = &route.device {
            self.check(dev)?;
        }
        self.record(Call::AddRoute(route.clone()));
        let mut table = self.table.lock().unwrap();
        if table.contains(route) {
            return Err(NetError::Failed("RTNETLINK answers: File exists".into()));
        }
        table.push(route.clone());
        Ok(())
    }

    async fn delete_route(&self, route: &Route) -> Result<()> {
        if let Some(dev) = &route.device {
            self.check(dev)?;
        }
        self.record(Call::DeleteRoute(route.clone()));
        let mut table = self.table.lock().unwrap();
        match table.iter().position(|r| r == route) {
            Some(pos) => {
                table.remove(pos);
                Ok(())
            }
            None => Err(NetError::Failed("RTNETLINK answers: No such process".into())),
        }
    }
}
