use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::contract::EventBus;
use crate::metrics::METRICS;
use crate::models::{ProcessRecord, ProcessUpdateEvent};
use crate::services::collector::SysinfoCollector;
use crate::state::SamplerState;
use crate::stores::epoch_millis;

/// CPU changes at or below this many percentage points are not reported.
const CPU_EPSILON: f32 = 0.1;

pub type SharedCollector = Arc<Mutex<SysinfoCollector>>;

/// Takes the first sample so queries have something to answer before the
/// first tick.
pub fn prime(state: &SamplerState, collector: &SharedCollector) -> usize {
    let snapshot = collector
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .collect();
    let count = snapshot.len();
    METRICS.sampler_tracked_processes.set(count as i64);
    state.lock().unwrap_or_else(PoisonError::into_inner).snapshot = snapshot;
    count
}

/// Runs the sampling loop: sleep, sample, diff, publish.
///
/// Interval and pause flag are re-read from the shared state on every pass,
/// so changes apply from the next tick.
pub fn start_updater(state: SamplerState, collector: SharedCollector, bus: EventBus) -> JoinHandle<()> {
    tokio::spawn(async move {
        log::info!("Updater started");

        loop {
            let (interval_ms, paused) = {
                let s = state.lock().unwrap_or_else(PoisonError::into_inner);
                (s.refresh_interval_ms, s.paused)
            };

            time::sleep(Duration::from_millis(interval_ms)).await;

            if paused {
                continue;
            }

            let collector = Arc::clone(&collector);
            let sampled = tokio::task::spawn_blocking(move || {
                collector
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .collect()
            })
            .await;

            let new_snapshot = match sampled {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::error!("Sampling task failed: {}", e);
                    continue;
                }
            };

            METRICS.sampler_ticks_total.inc();
            METRICS.sampler_tracked_processes.set(new_snapshot.len() as i64);

            let event = {
                let mut s = state.lock().unwrap_or_else(PoisonError::into_inner);
                let event = diff_snapshots(&s.snapshot, &new_snapshot, epoch_millis());
                s.snapshot = new_snapshot;
                event
            };

            if !event.is_empty() {
                let delivered = bus.publish(&event);
                METRICS.sampler_events_total.inc();
                log::debug!(
                    "Published {} changes to {} subscriber(s)",
                    event.change_count(),
                    delivered
                );
            }
        }
    })
}

/// Diff between two samples. Records in `added`/`updated` are the new ones.
pub fn diff_snapshots(
    old: &HashMap<u32, ProcessRecord>,
    new: &HashMap<u32, ProcessRecord>,
    timestamp_ms: u64,
) -> ProcessUpdateEvent {
    let mut added = Vec::new();
    let mut updated = Vec::new();

    for (pid, new_proc) in new {
        match old.get(pid) {
            None => added.push(new_proc.clone()),
            Some(old_proc) if is_changed(old_proc, new_proc) => updated.push(new_proc.clone()),
            Some(_) => {}
        }
    }

    let removed = old.keys().filter(|pid| !new.contains_key(pid)).copied().collect();

    ProcessUpdateEvent {
        added,
        updated,
        removed,
        timestamp_ms,
    }
}

fn is_changed(old: &ProcessRecord, new: &ProcessRecord) -> bool {
    (old.cpu_percent - new.cpu_percent).abs() > CPU_EPSILON
        || old.memory_bytes != new.memory_bytes
        || old.status != new.status
}
