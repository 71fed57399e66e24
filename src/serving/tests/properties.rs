//! Property tests for composition, annotation and the serving invariants

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use crate::serving::api::{
        annotate, compose, Entry, EntryEdit, EntryId, EntryKind, EntryStatus, NewEntry,
        QueueError, QueueSnapshot, SlotPolicy, DEFAULT_SERVICE_MINUTES,
    };
    use crate::serving::tests::support::Harness;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn arb_kind() -> impl Strategy<Value = EntryKind> {
        prop_oneof![Just(EntryKind::Booked), Just(EntryKind::WalkIn)]
    }

    fn arb_status() -> impl Strategy<Value = EntryStatus> {
        prop_oneof![
            4 => Just(EntryStatus::Waiting),
            1 => Just(EntryStatus::InProgress),
            1 => Just(EntryStatus::Done),
        ]
    }

    /// Entries with unique sequence numbers, shuffled into store order
    fn arb_entries() -> impl Strategy<Value = Vec<Entry>> {
        prop::collection::vec((arb_kind(), 0i64..20, arb_status()), 0..30)
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(index, (kind, minute, status))| {
                        let sequence_number = index as u64 + 1;
                        Entry {
                            id: EntryId::new(sequence_number),
                            name: format!("client-{sequence_number}"),
                            contact: "5550100".to_string(),
                            sequence_number,
                            kind,
                            status,
                            arrival_time: base_time() + Duration::minutes(minute),
                            started_at: None,
                            completed_at: None,
                            category: "general".to_string(),
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }

    /// Active entries of one kind in (arrival, sequence) order
    fn expected_kind_order(entries: &[Entry], kind: EntryKind) -> Vec<u64> {
        let mut keys: Vec<_> = entries
            .iter()
            .filter(|e| e.is_active() && e.kind == kind)
            .map(|e| (e.arrival_time, e.sequence_number))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, sequence)| sequence).collect()
    }

    fn kind_order(entries: &[Entry], kind: EntryKind) -> Vec<u64> {
        entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.sequence_number)
            .collect()
    }

    /// Every walk-in follows a full run of booked entries unless booked ran out
    fn slot_ratio_holds<'a>(kinds: impl Iterator<Item = &'a EntryKind>, per_walk_in: usize) -> bool {
        let kinds: Vec<_> = kinds.collect();
        let total_booked = kinds.iter().filter(|k| ***k == EntryKind::Booked).count();
        let mut booked_seen = 0;
        let mut walk_ins_seen = 0;
        for kind in kinds {
            match kind {
                EntryKind::Booked => booked_seen += 1,
                EntryKind::WalkIn => {
                    walk_ins_seen += 1;
                    if booked_seen != (per_walk_in * walk_ins_seen).min(total_booked) {
                        return false;
                    }
                }
            }
        }
        true
    }

    proptest! {
        #[test]
        fn prop_compose_keeps_every_active_entry(entries in arb_entries(), run in 1usize..5) {
            let active = entries.iter().filter(|e| e.is_active()).count();
            let ordered = compose(entries, SlotPolicy::new(run).unwrap());

            prop_assert_eq!(ordered.len(), active);
            prop_assert!(ordered.iter().all(Entry::is_active));
        }

        #[test]
        fn prop_compose_preserves_order_within_kind(entries in arb_entries(), run in 1usize..5) {
            let ordered = compose(entries.clone(), SlotPolicy::new(run).unwrap());

            for kind in [EntryKind::Booked, EntryKind::WalkIn] {
                prop_assert_eq!(kind_order(&ordered, kind), expected_kind_order(&entries, kind));
            }
        }

        #[test]
        fn prop_compose_holds_slot_ratio(entries in arb_entries(), run in 1usize..5) {
            let ordered = compose(entries, SlotPolicy::new(run).unwrap());
            prop_assert!(slot_ratio_holds(ordered.iter().map(|e| &e.kind), run));
        }

        #[test]
        fn prop_compose_is_idempotent(entries in arb_entries()) {
            let policy = SlotPolicy::default();
            let once = compose(entries.clone(), policy);
            let mut reversed = entries;
            reversed.reverse();

            prop_assert_eq!(compose(once.clone(), policy), once.clone());
            prop_assert_eq!(compose(reversed, policy), once);
        }

        #[test]
        fn prop_annotation_pins_in_progress(
            entries in arb_entries(),
            minutes in 1u64..120,
        ) {
            let mut seen_in_progress = false;
            let entries: Vec<Entry> = entries
                .into_iter()
                .map(|mut entry| {
                    if entry.is_in_progress() {
                        if seen_in_progress {
                            entry.status = EntryStatus::Waiting;
                        }
                        seen_in_progress = true;
                    }
                    entry
                })
                .collect();
            let ordered = compose(entries, SlotPolicy::default());
            let views = annotate(ordered, minutes).unwrap();

            for (index, view) in views.iter().enumerate() {
                let expected = if view.entry.is_in_progress() { 0 } else { index };
                prop_assert_eq!(view.position, expected);
                prop_assert_eq!(view.estimated_wait_minutes, expected as u64 * minutes);
            }
        }
    }

    /// Front desk actions; indices pick from the active queue at the time
    #[derive(Debug, Clone)]
    enum Op {
        Register { kind: EntryKind, gap_secs: i64 },
        Advance,
        Delete(usize),
        Rename(usize),
        SetStatus(usize, EntryStatus),
        Reset,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (arb_kind(), 0i64..180).prop_map(|(kind, gap_secs)| Op::Register { kind, gap_secs }),
            5 => Just(Op::Advance),
            2 => any::<usize>().prop_map(Op::Delete),
            1 => any::<usize>().prop_map(Op::Rename),
            3 => (any::<usize>(), arb_status()).prop_map(|(pick, status)| Op::SetStatus(pick, status)),
            1 => Just(Op::Reset),
        ]
    }

    fn assert_snapshot_invariants(snapshot: &QueueSnapshot) {
        let in_progress = snapshot
            .entries
            .iter()
            .filter(|v| v.entry.is_in_progress())
            .count();
        assert!(in_progress <= 1, "{in_progress} entries in progress");

        for (index, view) in snapshot.entries.iter().enumerate() {
            let expected = if view.entry.is_in_progress() { 0 } else { index };
            assert_eq!(view.position, expected);
            assert_eq!(
                view.estimated_wait_minutes,
                expected as u64 * DEFAULT_SERVICE_MINUTES
            );
        }

        assert!(slot_ratio_holds(
            snapshot.entries.iter().map(|v| &v.entry.kind),
            SlotPolicy::DEFAULT_BOOKED_PER_WALK_IN
        ));
    }

    async fn run_operations(ops: Vec<Op>) {
        let mut harness = Harness::new().await;
        let mut last_sequence = 0;
        let mut mutations = 0u64;

        for op in ops {
            let active = harness.service.snapshot().await.unwrap();
            let pick = |index: usize| active.entries[index % active.len()].entry.id;

            match op {
                Op::Register { kind, gap_secs } => {
                    harness.clock.advance(Duration::seconds(gap_secs));
                    let name = format!("client-{}", last_sequence + 1);
                    let registration = harness
                        .service
                        .register(NewEntry::new(name, "5550100").with_kind(kind))
                        .await
                        .unwrap();
                    assert!(registration.entry.sequence_number > last_sequence);
                    last_sequence = registration.entry.sequence_number;
                    mutations += 1;
                }
                Op::Advance => {
                    harness.clock.advance(Duration::minutes(5));
                    harness.service.advance_service().await.unwrap();
                    mutations += 1;
                }
                Op::Delete(index) if !active.is_empty() => {
                    harness.service.delete_entry(pick(index)).await.unwrap();
                    mutations += 1;
                }
                Op::Rename(index) if !active.is_empty() => {
                    let edit = EntryEdit {
                        name: Some(format!("renamed-{mutations}")),
                        ..EntryEdit::default()
                    };
                    harness.service.edit_entry(pick(index), edit).await.unwrap();
                    mutations += 1;
                }
                Op::SetStatus(index, status) if !active.is_empty() => {
                    let id = pick(index);
                    let other_serving = active
                        .entries
                        .iter()
                        .any(|v| v.entry.is_in_progress() && v.entry.id != id);
                    let result = harness
                        .service
                        .edit_entry(id, EntryEdit::status(status))
                        .await;

                    if status == EntryStatus::InProgress && other_serving {
                        assert!(matches!(result, Err(QueueError::Validation(_))));
                    } else {
                        assert_eq!(result.unwrap().status, status);
                        mutations += 1;
                    }
                }
                Op::Reset => {
                    harness.service.reset().await.unwrap();
                    mutations += 1;
                }
                _ => {}
            }

            let stored = harness.all_entries().await;
            let in_progress = stored.iter().filter(|e| e.is_in_progress()).count();
            assert!(in_progress <= 1, "{in_progress} stored entries in progress");
            for entry in &stored {
                if let (Some(started), Some(completed)) = (entry.started_at, entry.completed_at) {
                    assert!(started <= completed);
                }
            }

            let snapshot = harness.service.snapshot().await.unwrap();
            assert_eq!(snapshot, harness.service.snapshot().await.unwrap());
            assert_eq!(snapshot.len(), stored.iter().filter(|e| e.is_active()).count());
            assert_snapshot_invariants(&snapshot);
        }

        let revisions: Vec<u64> = harness
            .published()
            .iter()
            .map(|(_, snapshot)| {
                assert_snapshot_invariants(snapshot);
                snapshot.revision
            })
            .collect();
        assert_eq!(revisions, (1..=mutations).collect::<Vec<u64>>());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_operation_sequences_preserve_invariants(
            ops in prop::collection::vec(arb_op(), 1..60)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            runtime.block_on(run_operations(ops));
        }
    }

    #[tokio::test]
    async fn test_sequence_numbers_never_reused() {
        let harness = Harness::new().await;
        let mut issued = Vec::new();

        for round in 0..4 {
            let first = harness.booked(&format!("B{round}")).await;
            let second = harness.walk_in(&format!("W{round}")).await;
            issued.push(first.entry.sequence_number);
            issued.push(second.entry.sequence_number);

            // Deleting the newest entry must not hand its number out again
            harness.service.delete_entry(second.entry.id).await.unwrap();
            if round % 2 == 1 {
                harness.service.reset().await.unwrap();
            }
        }

        let expected: Vec<u64> = (1..=8).collect();
        assert_eq!(issued, expected);
    }

    #[tokio::test]
    async fn test_snapshot_does_not_publish() {
        let mut harness = Harness::new().await;
        harness.booked("B1").await;
        harness.published();

        let first = harness.service.snapshot().await.unwrap();
        let second = harness.service.snapshot().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.revision, 1);
        assert!(harness.published().is_empty());
    }
}
