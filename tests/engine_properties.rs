// tests/engine_properties.rs

use std::collections::BTreeMap;

use proptest::prelude::*;
use rota::engine::AssignmentEngine;
use rota::roster::Roster;

fn roster_of(len: usize) -> Roster {
    Roster::from_names((0..len).map(|i| format!("p{i}")))
}

// Split `total` into a list of positive counts.
fn partition_strategy(total: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1..=total, 1..=total).prop_map(move |raw| {
        let mut parts = Vec::new();
        let mut left = total;
        for r in raw {
            if left == 0 {
                break;
            }
            let take = r.min(left);
            parts.push(take);
            left -= take;
        }
        if left > 0 {
            parts.push(left);
        }
        parts
    })
}

proptest! {
    #[test]
    fn counts_summing_to_len_cover_everyone_once(
        (len, parts) in (1..20usize).prop_flat_map(|len| (Just(len), partition_strategy(len)))
    ) {
        let mut engine = AssignmentEngine::new();
        engine.load(roster_of(len), 0);

        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        for count in parts {
            let a = engine.assign(count).unwrap();
            for name in a.batch.names() {
                *seen.entry(name.to_string()).or_default() += 1;
            }
        }

        prop_assert_eq!(seen.len(), len);
        prop_assert!(seen.values().all(|&n| n == 1));
        prop_assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn batch_position_i_is_start_plus_i_mod_len(
        len in 1..12usize,
        start in 0..50u64,
        count in 1..40usize,
    ) {
        let mut engine = AssignmentEngine::new();
        let roster = roster_of(len);
        engine.load(roster.clone(), start);

        let a = engine.assign(count).unwrap();
        let start = (start as usize) % len;

        prop_assert_eq!(a.batch.len(), count);
        for (i, entry) in a.batch.entries().iter().enumerate() {
            let expected = roster.get((start + i) % len).unwrap();
            prop_assert_eq!(&entry.name, &expected.name);
            prop_assert_eq!(entry.rank, (start + i) % len + 1);
        }
        prop_assert_eq!(engine.cursor(), (start + count) % len);
    }

    #[test]
    fn assign_then_undo_restores_the_cursor(
        len in 1..12usize,
        warmup in proptest::collection::vec(1..30usize, 0..4),
        count in 1..30usize,
    ) {
        let mut engine = AssignmentEngine::new();
        engine.load(roster_of(len), 0);
        for c in warmup {
            engine.assign(c).unwrap();
        }

        let before = engine.cursor();
        engine.assign(count).unwrap();
        prop_assert_eq!(engine.undo().unwrap(), before);
        prop_assert_eq!(engine.cursor(), before);
        prop_assert!(engine.last_batch().is_empty());
        prop_assert!(engine.undo().is_err());
        prop_assert_eq!(engine.cursor(), before);
    }
}
