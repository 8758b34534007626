use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InterfaceInfo, Route};

/// The OS networking collaborators the scheduler drives.
///
/// Enumeration calls never fail: an unreadable table is reported as empty.
/// Mutations return [`NetError`](crate::NetError) so callers can tell a
/// missing privilege apart from a missing interface.
#[async_trait]
pub trait NetworkBackend: Send + Sync {
    /// Human-readable name for this backend (e.g. "iproute2").
    fn name(&self) -> &str;

    // -- enumeration --
    async fn interfaces(&self) -> Vec<InterfaceInfo>;
    /// IPv4 routes bound to `device`, or the whole table when `None`.
    async fn routes(&self, device: Option<&str>) -> Vec<Route>;

    // -- link state --
    async fn set_link_up(&self, name: &str) -> Result<()>;
    async fn set_link_down(&self, name: &str) -> Result<()>;

    // -- routing table --
    async fn add_route(&self, route: &Route) -> Result<()>;
    async fn delete_route(&self, route: &Route) -> Result<()>;
}
