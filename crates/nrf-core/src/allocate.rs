//! Synthetic peer addresses.
//!
//! Each interface in a subnet gets a distinct address standing in for the
//! far-end device reachable through it: `network + 1`, `network + 2`, ... in
//! member order. Nothing stops the sequence from reaching the broadcast
//! address, leaving the subnet, or colliding with a real host.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

/// Peer addresses for `count` interfaces in `subnet`, in assignment order.
pub fn allocate(subnet: Ipv4Net, count: usize) -> Vec<Ipv4Addr> {
    let network = u32::from(subnet.network());
    (1..=count as u32)
        .map(|offset| Ipv4Addr::from(network.wrapping_add(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    #[test]
    fn starts_right_after_network_address() {
        let peers = allocate(net("10.0.0.0/24"), 2);
        assert_eq!(
            peers,
            [Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
        );
    }

    #[test]
    fn uses_network_address_not_interface_address() {
        // An un-truncated subnet still counts from its network address.
        let peers = allocate(net("10.0.0.37/24"), 1);
        assert_eq!(peers, [Ipv4Addr::new(10, 0, 0, 1)]);
    }

    #[test]
    fn distinct_and_strictly_increasing() {
        let peers = allocate(net("172.16.0.0/16"), 300);
        assert_eq!(peers.len(), 300);
        for pair in peers.windows(2) {
            assert_eq!(u32::from(pair[1]), u32::from(pair[0]) + 1);
        }
    }

    #[test]
    fn zero_interfaces_allocates_nothing() {
        assert!(allocate(net("10.0.0.0/24"), 0).is_empty());
    }

    #[test]
    fn small_subnet_runs_into_broadcast_and_beyond() {
        // Known gap: a /30 has two usable hosts, yet four peers are handed out.
        let subnet = net("192.168.1.0/30");
        let peers = allocate(subnet, 4);
        assert_eq!(peers[2], subnet.broadcast());
        assert!(!subnet.contains(&peers[3]));
    }
}
