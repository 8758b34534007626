use ipnet::IpNet;
use tracing::{debug, info};

use crate::backend::NetworkBackend;
use crate::inventory::Inventory;
use crate::types::{InterfaceInfo, Member};

/// Interfaces whose name starts with this are never touched.
pub const LOOPBACK_PREFIX: &str = "lo";

/// Group interfaces by the IPv4 network of their first configured address.
///
/// Only the first address is inspected: an interface with no addresses, or
/// whose first address is IPv6, is left out even if a later entry is IPv4.
pub fn classify(interfaces: &[InterfaceInfo]) -> Inventory {
    let mut inventory = Inventory::new();
    for iface in interfaces {
        if iface.name.starts_with(LOOPBACK_PREFIX) {
            continue;
        }
        match iface.addresses.first() {
            Some(IpNet::V4(addr)) => inventory.insert(addr.trunc(), Member::new(&iface.name)),
            Some(IpNet::V6(_)) => {
                debug!(interface = %iface.name, "first address is IPv6, skipping");
            }
            None => {
                debug!(interface = %iface.name, "no addresses, skipping");
            }
        }
    }
    inventory
}

/// Read the live interface table and classify it.
pub async fn discover(backend: &dyn NetworkBackend) -> Inventory {
    let interfaces = backend.interfaces().await;
    let inventory = classify(&interfaces);
    info!(
        backend = backend.name(),
        found = interfaces.len(),
        subnets = inventory.len(),
        interfaces = inventory.interface_count(),
        "classified interfaces"
    );
    inventory
}
