use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DiffError;
use crate::models::{ProcessRecord, ProcessUpdateEvent};

pub type ProcessMap = HashMap<u32, ProcessRecord>;

/// Current Unix time in milliseconds.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Canonical pid → record map for one monitoring session.
///
/// Every write builds a new map and swaps the `Arc`, so a `snapshot()` taken
/// earlier is never mutated underneath its holder and `Arc::ptr_eq` tells
/// whether anything changed.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: Arc<ProcessMap>,
    last_updated: u64,
    revision: u64,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<ProcessMap> {
        Arc::clone(&self.processes)
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.processes.get(&pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Unix ms of the last snapshot load, or the timestamp of the last diff.
    pub fn last_updated(&self) -> u64 {
        self.last_updated
    }

    /// Incremented on every accepted write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Materializes the current records. Order is whatever the map yields;
    /// this store never sorts.
    pub fn list(&self) -> Vec<ProcessRecord> {
        self.processes.values().cloned().collect()
    }

    /// Replaces the whole map from a fresh snapshot. Duplicate pids: last wins.
    pub fn set_all(&mut self, records: impl IntoIterator<Item = ProcessRecord>) {
        let map: ProcessMap = records.into_iter().map(|p| (p.pid, p)).collect();
        log::debug!("Loaded snapshot with {} processes", map.len());
        self.processes = Arc::new(map);
        self.last_updated = epoch_millis();
        self.revision += 1;
    }

    /// Merges one diff event: insert `added`, overwrite `updated` (unknown
    /// pids become inserts), then delete `removed` (unknown pids are ignored).
    ///
    /// An event naming the same pid in two of its sets is refused as a whole
    /// and leaves the table untouched. Events must be applied once each, in
    /// the order the source delivered them.
    pub fn apply_diff(&mut self, event: &ProcessUpdateEvent) -> Result<(), DiffError> {
        validate_event(event)?;

        let mut map = ProcessMap::clone(&self.processes);
        for p in event.added.iter().chain(event.updated.iter()) {
            map.insert(p.pid, p.clone());
        }
        for pid in &event.removed {
            map.remove(pid);
        }

        log::debug!(
            "Applied diff: +{} ~{} -{} ({} processes)",
            event.added.len(),
            event.updated.len(),
            event.removed.len(),
            map.len()
        );

        self.processes = Arc::new(map);
        self.last_updated = event.timestamp_ms;
        self.revision += 1;
        Ok(())
    }
}

fn validate_event(event: &ProcessUpdateEvent) -> Result<(), DiffError> {
    let added: HashSet<u32> = event.added.iter().map(|p| p.pid).collect();
    let updated: HashSet<u32> = event.updated.iter().map(|p| p.pid).collect();

    if let Some(p) = event.updated.iter().find(|p| added.contains(&p.pid)) {
        return Err(DiffError::OverlappingPid {
            pid: p.pid,
            first: "added",
            second: "updated",
        });
    }
    for &pid in &event.removed {
        if added.contains(&pid) {
            return Err(DiffError::OverlappingPid {
                pid,
                first: "added",
                second: "removed",
            });
        }
        if updated.contains(&pid) {
            return Err(DiffError::OverlappingPid {
                pid,
                first: "updated",
                second: "removed",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessStatus;
    use proptest::prelude::*;

    fn rec(pid: u32, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            status: ProcessStatus::Running,
            cpu_percent: 0.0,
            memory_bytes: 0,
            user: None,
            path: None,
            parent_pid: None,
            start_time: None,
            needs_elevation: false,
            cmd: vec![],
        }
    }

    fn names(table: &ProcessTable) -> Vec<(u32, String)> {
        let mut v: Vec<(u32, String)> = table
            .list()
            .into_iter()
            .map(|p| (p.pid, p.name))
            .collect();
        v.sort();
        v
    }

    #[test]
    fn test_set_all_last_write_wins() {
        let mut table = ProcessTable::new();
        table.set_all(vec![rec(1, "a"), rec(2, "b"), rec(1, "a-again")]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).map(|p| p.name.as_str()), Some("a-again"));
        assert!(table.last_updated() > 0);
        assert_eq!(table.revision(), 1);
    }

    #[test]
    fn test_set_all_replaces_previous_contents() {
        let mut table = ProcessTable::new();
        table.set_all(vec![rec(1, "a"), rec(2, "b")]);
        table.set_all(vec![rec(3, "c")]);
        assert_eq!(names(&table), vec![(3, "c".to_string())]);
    }

    #[test]
    fn test_apply_diff_scenario() {
        let mut table = ProcessTable::new();
        table.set_all(vec![rec(1, "a"), rec(2, "b")]);

        let event = ProcessUpdateEvent {
            added: vec![rec(3, "c")],
            updated: vec![rec(1, "a2")],
            removed: vec![2],
            timestamp_ms: 1_700_000_000_000,
        };
        table.apply_diff(&event).unwrap();

        assert_eq!(
            names(&table),
            vec![(1, "a2".to_string()), (3, "c".to_string())]
        );
        assert!(!table.contains(2));
        assert_eq!(table.last_updated(), 1_700_000_000_000);
    }

    #[test]
    fn test_remove_everything_empties_table() {
        let mut table = ProcessTable::new();
        table.set_all(vec![rec(1, "a"), rec(2, "b"), rec(3, "c")]);
        let event = ProcessUpdateEvent {
            removed: table.snapshot().keys().copied().collect(),
            timestamp_ms: 5,
            ..Default::default()
        };
        table.apply_diff(&event).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_update_of_unknown_pid_is_an_insert() {
        let mut table = ProcessTable::new();
        let event = ProcessUpdateEvent {
            updated: vec![rec(7, "late")],
            removed: vec![99],
            timestamp_ms: 1,
            ..Default::default()
        };
        table.apply_diff(&event).unwrap();
        assert_eq!(names(&table), vec![(7, "late".to_string())]);
    }

    #[test]
    fn test_overlapping_event_is_rejected_untouched() {
        let mut table = ProcessTable::new();
        table.set_all(vec![rec(1, "a")]);
        let before = table.snapshot();
        let stamp = table.last_updated();

        let event = ProcessUpdateEvent {
            added: vec![rec(2, "b")],
            updated: vec![rec(1, "a2")],
            removed: vec![1],
            timestamp_ms: stamp + 1000,
        };
        let err = table.apply_diff(&event).unwrap_err();
        assert_eq!(
            err,
            DiffError::OverlappingPid {
                pid: 1,
                first: "updated",
                second: "removed",
            }
        );
        assert!(Arc::ptr_eq(&before, &table.snapshot()));
        assert_eq!(table.last_updated(), stamp);
        assert_eq!(table.revision(), 1);
    }

    #[test]
    fn test_added_and_updated_overlap_is_rejected() {
        let mut table = ProcessTable::new();
        let event = ProcessUpdateEvent {
            added: vec![rec(4, "x")],
            updated: vec![rec(4, "y")],
            ..Default::default()
        };
        assert!(matches!(
            table.apply_diff(&event),
            Err(DiffError::OverlappingPid { pid: 4, first: "added", second: "updated" })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_snapshot_is_not_mutated_by_later_writes() {
        let mut table = ProcessTable::new();
        table.set_all(vec![rec(1, "a")]);
        let held = table.snapshot();

        table
            .apply_diff(&ProcessUpdateEvent {
                removed: vec![1],
                ..Default::default()
            })
            .unwrap();

        assert!(held.contains_key(&1));
        assert!(!Arc::ptr_eq(&held, &table.snapshot()));
        assert!(table.is_empty());
    }

    fn arb_event() -> impl Strategy<Value = ProcessUpdateEvent> {
        // Disjoint pid ranges keep the generated events well-formed.
        (
            prop::collection::vec((0u32..20, "[a-z]{1,4}"), 0..6),
            prop::collection::vec((20u32..40, "[a-z]{1,4}"), 0..6),
            prop::collection::vec(40u32..60, 0..6),
            any::<u64>(),
        )
            .prop_map(|(added, updated, removed, timestamp_ms)| ProcessUpdateEvent {
                added: added.into_iter().map(|(pid, n)| rec(pid, &n)).collect(),
                updated: updated.into_iter().map(|(pid, n)| rec(pid, &n)).collect(),
                removed,
                timestamp_ms,
            })
    }

    proptest! {
        #[test]
        fn prop_apply_diff_matches_fold(
            initial in prop::collection::vec((0u32..60, "[a-z]{1,4}"), 0..20),
            events in prop::collection::vec(arb_event(), 0..8),
        ) {
            let initial: Vec<ProcessRecord> =
                initial.into_iter().map(|(pid, n)| rec(pid, &n)).collect();

            let mut table = ProcessTable::new();
            table.set_all(initial.clone());

            let mut expected: ProcessMap = initial.into_iter().map(|p| (p.pid, p)).collect();
            for event in &events {
                table.apply_diff(event).unwrap();
                for p in event.added.iter().chain(&event.updated) {
                    expected.insert(p.pid, p.clone());
                }
                for pid in &event.removed {
                    expected.remove(pid);
                }
                prop_assert_eq!(table.last_updated(), event.timestamp_ms);
            }

            prop_assert_eq!(&*table.snapshot(), &expected);
        }
    }
}
