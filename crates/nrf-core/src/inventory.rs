//! Subnet membership table.
//!
//! Built once at startup by [`classify`](crate::classify) and then shared
//! read-only (behind an `Arc`) by the scheduler and the shutdown handler.
//! Subnets are kept in a `BTreeMap` so iteration order is explicit; any
//! randomization of the visit order happens in [`crate::select`].

use std::collections::BTreeMap;

use ipnet::Ipv4Net;

use crate::allocate::allocate;
use crate::types::Member;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    subnets: BTreeMap<Ipv4Net, Vec<Member>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `member` to `subnet`, keeping insertion order within the subnet.
    pub fn insert(&mut self, subnet: Ipv4Net, member: Member) {
        self.subnets.entry(subnet).or_default().push(member);
    }

    /// Assign peer addresses to every member, subnet by subnet, in member order.
    #[must_use]
    pub fn with_peers(mut self) -> Self {
        for (subnet, members) in &mut self.subnets {
            let peers = allocate(*subnet, members.len());
            for (member, peer) in members.iter_mut().zip(peers) {
                member.peer = Some(peer);
            }
        }
        self
    }

    pub fn subnets(&self) -> impl Iterator<Item = &Ipv4Net> {
        self.subnets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Net, &[Member])> {
        self.subnets.iter().map(|(s, m)| (s, m.as_slice()))
    }

    /// Members of `subnet`; empty when the subnet is unknown.
    pub fn members(&self, subnet: &Ipv4Net) -> &[Member] {
        self.subnets.get(subnet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every classified interface across all subnets.
    pub fn all_members(&self) -> Vec<Member> {
        self.subnets.values().flatten().cloned().collect()
    }

    /// Number of subnets.
    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    pub fn interface_count(&self) -> usize {
        self.subnets.values().map(Vec::len).sum()
    }
}

impl FromIterator<(Ipv4Net, Member)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (Ipv4Net, Member)>>(iter: T) -> Self {
        let mut inventory = Inventory::new();
        for (subnet, member) in iter {
            inventory.insert(subnet, member);
        }
        inventory
    }
}
