//! Random choices made by the scheduler.
//!
//! All randomness comes from one caller-owned RNG applied to explicitly
//! ordered inputs, so a fixed seed replays the same run.

use ipnet::Ipv4Net;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::inventory::Inventory;
use crate::types::Member;

/// Chance that the rest of a cycle is skipped after each subnet.
const ABANDON_NUMERATOR: u32 = 1;
const ABANDON_DENOMINATOR: u32 = 4;

/// Pick the members to bounce this cycle.
///
/// Each member is drawn independently with probability 1/2. If no member is
/// drawn, one is picked uniformly so a visited subnet is never skipped.
pub fn pick_targets<R: Rng + ?Sized>(members: &[Member], rng: &mut R) -> Vec<Member> {
    let mut picked: Vec<Member> = members
        .iter()
        .filter(|_| rng.gen_bool(0.5))
        .cloned()
        .collect();
    if picked.is_empty()
        && let Some(member) = members.choose(rng)
    {
        picked.push(member.clone());
    }
    picked
}

/// Subnet visit order for one cycle.
pub fn visit_order<R: Rng + ?Sized>(inventory: &Inventory, rng: &mut R) -> Vec<Ipv4Net> {
    let mut order: Vec<Ipv4Net> = inventory.subnets().copied().collect();
    order.shuffle(rng);
    order
}

/// Whether to drop the remaining subnets of this cycle and start over.
pub fn abandon_cycle<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_ratio(ABANDON_NUMERATOR, ABANDON_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn members(n: usize) -> Vec<Member> {
        (0..n).map(|i| Member::new(format!("eth{i}"))).collect()
    }

    #[test]
    fn never_empty_for_non_empty_subnet() {
        for n in 1..=4 {
            let group = members(n);
            for seed in 0..500 {
                let mut rng = StdRng::seed_from_u64(seed);
                let picked = pick_targets(&group, &mut rng);
                assert!(!picked.is_empty(), "n={n} seed={seed}");
                assert!(picked.len() <= n);
                assert!(picked.iter().all(|m| group.contains(m)));
            }
        }
    }

    #[test]
    fn single_member_always_picked() {
        let group = members(1);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(pick_targets(&group, &mut rng), group);
        }
    }

    #[test]
    fn empty_subnet_picks_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_targets(&[], &mut rng).is_empty());
    }

    #[test]
    fn picks_preserve_member_order_and_have_no_duplicates() {
        let group = members(6);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_targets(&group, &mut rng);
            let positions: Vec<_> = picked
                .iter()
                .map(|p| group.iter().position(|m| m == p).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn every_member_gets_picked_eventually() {
        let group = members(5);
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = vec![0usize; group.len()];
        for _ in 0..400 {
            for p in pick_targets(&group, &mut rng) {
                let i = group.iter().position(|m| *m == p).unwrap();
                hits[i] += 1;
            }
        }
        assert!(hits.iter().all(|&h| h > 100), "hits: {hits:?}");
    }

    #[test]
    fn same_seed_same_choices() {
        let group = members(8);
        let a = pick_targets(&group, &mut StdRng::seed_from_u64(9));
        let b = pick_targets(&group, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn visit_order_is_a_permutation() {
        let inv: Inventory = ["10.0.0.0/24", "10.1.0.0/24", "10.2.0.0/24"]
            .iter()
            .map(|s| (s.parse().unwrap(), Member::new("eth0")))
            .collect();
        let mut rng = StdRng::seed_from_u64(3);
        let mut order = visit_order(&inv, &mut rng);
        order.sort();
        assert_eq!(order, inv.subnets().copied().collect::<Vec<_>>());
    }

    #[test]
    fn abandon_rate_is_about_a_quarter() {
        let mut rng = StdRng::seed_from_u64(1);
        let hits = (0..4000).filter(|_| abandon_cycle(&mut rng)).count();
        assert!((800..1200).contains(&hits), "hits: {hits}");
    }
}
