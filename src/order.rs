//! Ordering of SRV records by priority and weight per RFC 2782.

use crate::SrvRecord;
use rand::Rng;
use std::collections::BTreeMap;

/// Orders SRV records for connection attempts per RFC 2782.
///
/// Records are grouped by priority, lowest first. Within a group, records are
/// drawn one at a time with probability proportional to their weight until
/// the group is exhausted. Zero-weight records are placed at the front of
/// their group before drawing, which leaves them a small chance of being
/// selected first. A group whose remaining weights are all zero is drawn
/// uniformly.
///
/// Every record is returned exactly once. Randomness is only consumed when a
/// choice remains, so a group with a single record never touches `rng`.
pub fn order_srv_records<R, G>(records: impl IntoIterator<Item = R>, rng: &mut G) -> Vec<R>
where
    R: SrvRecord,
    G: Rng + ?Sized,
{
    let mut groups = BTreeMap::<u16, Vec<R>>::new();
    let mut len = 0;
    for record in records {
        groups.entry(record.priority()).or_default().push(record);
        len += 1;
    }

    let mut ordered = Vec::with_capacity(len);
    for (priority, group) in groups {
        #[cfg(feature = "log")]
        let start = ordered.len();
        #[cfg(feature = "log")]
        let size = group.len();

        order_group(group, rng, &mut ordered);

        #[cfg(feature = "log")]
        tracing::trace!(
            priority,
            size,
            order = ?ordered[start..].iter().map(|r| r.target().to_string()).collect::<Vec<_>>(),
            "ordered SRV priority group"
        );
    }
    ordered
}

fn order_group<R, G>(mut pool: Vec<R>, rng: &mut G, ordered: &mut Vec<R>)
where
    R: SrvRecord,
    G: Rng + ?Sized,
{
    // Stable, so records keep their relative order within each class.
    pool.sort_by_key(|record| record.weight() != 0);

    while !pool.is_empty() {
        let index = match pool.len() {
            1 => 0,
            _ => select_weighted(&pool, rng),
        };
        ordered.push(pool.remove(index));
    }
}

/// Picks the index of the next record from a pool of at least two.
fn select_weighted<R, G>(pool: &[R], rng: &mut G) -> usize
where
    R: SrvRecord,
    G: Rng + ?Sized,
{
    let total: u32 = pool.iter().map(|record| u32::from(record.weight())).sum();
    if total == 0 {
        return rng.random_range(0..pool.len());
    }

    let target = rng.random_range(0..=total);
    let mut running = 0;
    for (index, record) in pool.iter().enumerate() {
        running += u32::from(record.weight());
        if running >= target {
            return index;
        }
    }
    pool.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OwnedSrvRecord;
    use rand::{rngs::StdRng, RngCore, SeedableRng};
    use std::collections::HashMap;

    fn record(target: &str, priority: u16, weight: u16) -> OwnedSrvRecord {
        OwnedSrvRecord::new(target, 443, priority, weight)
    }

    /// Fails the test if any randomness is requested.
    struct NoRandomness;

    impl RngCore for NoRandomness {
        fn next_u32(&mut self) -> u32 {
            panic!("randomness consumed")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("randomness consumed")
        }

        fn fill_bytes(&mut self, _dst: &mut [u8]) {
            panic!("randomness consumed")
        }
    }

    #[test]
    fn empty_input() {
        let ordered = order_srv_records(Vec::<OwnedSrvRecord>::new(), &mut NoRandomness);
        assert!(ordered.is_empty());
    }

    #[test]
    fn singleton_groups_consume_no_randomness() {
        let records = vec![record("c", 30, 1), record("a", 10, 0), record("b", 20, 65535)];
        let ordered = order_srv_records(records, &mut NoRandomness);
        let targets: Vec<_> = ordered.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["a", "b", "c"]);
    }

    #[test]
    fn priorities_ascend_and_nothing_is_lost() {
        let mut rng = StdRng::seed_from_u64(2782);
        for round in 0..200 {
            let records: Vec<_> = (0..(round % 17))
                .map(|i| {
                    record(
                        &format!("host{i}"),
                        rng.random_range(0..4),
                        rng.random_range(0..3) * 50,
                    )
                })
                .collect();

            let ordered = order_srv_records(records.clone(), &mut rng);

            assert_eq!(ordered.len(), records.len());
            assert!(ordered
                .windows(2)
                .all(|w| w[0].priority() <= w[1].priority()));
            let mut expected: Vec<_> = records.iter().map(|r| &r.target).collect();
            let mut actual: Vec<_> = ordered.iter().map(|r| &r.target).collect();
            expected.sort();
            actual.sort();
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn heavier_records_come_first_more_often() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = vec![record("light", 0, 10), record("heavy", 0, 90)];

        let heavy_first = (0..10_000)
            .filter(|_| order_srv_records(records.clone(), &mut rng)[0].target == "heavy")
            .count();

        // Expected share is 90/101.
        assert!(
            (8_600..=9_200).contains(&heavy_first),
            "heavy record first in {heavy_first} of 10000 orderings"
        );
    }

    #[test]
    fn zero_weights_order_uniformly() {
        let mut rng = StdRng::seed_from_u64(42);
        let records = vec![record("a", 5, 0), record("b", 5, 0), record("c", 5, 0)];

        let mut seen = HashMap::<String, usize>::new();
        for _ in 0..60_000 {
            let order: String = order_srv_records(records.clone(), &mut rng)
                .iter()
                .map(|r| r.target.as_str())
                .collect();
            *seen.entry(order).or_default() += 1;
        }

        assert_eq!(seen.len(), 6);
        for (order, count) in seen {
            assert!(
                (9_400..=10_600).contains(&count),
                "ordering {order} seen {count} times"
            );
        }
    }

    #[test]
    fn zero_weight_rarely_leads_weighted_peer() {
        let mut rng = StdRng::seed_from_u64(1);
        let records = vec![record("weighted", 0, 100), record("zero", 0, 0)];

        let zero_first = (0..10_000)
            .filter(|_| order_srv_records(records.clone(), &mut rng)[0].target == "zero")
            .count();

        // Only a draw of exactly 0 out of [0, 100] selects it.
        assert!(
            (1..=300).contains(&zero_first),
            "zero-weight record first in {zero_first} of 10000 orderings"
        );
    }

    #[test]
    fn randomization_stays_within_priority_group() {
        let mut rng = StdRng::seed_from_u64(99);
        let records = vec![
            record("backup-1", 2, 50),
            record("primary-1", 1, 50),
            record("backup-2", 2, 50),
            record("primary-2", 1, 50),
        ];

        for _ in 0..100 {
            let ordered = order_srv_records(records.clone(), &mut rng);
            assert!(ordered[..2].iter().all(|r| r.target.starts_with("primary")));
            assert!(ordered[2..].iter().all(|r| r.target.starts_with("backup")));
        }
    }
}
