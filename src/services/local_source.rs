use std::sync::PoisonError;

use crate::contract::{EventBus, EventHandler, ProcessSource, Subscription};
use crate::error::AppError;
use crate::models::{apply_sort, ProcessDetails, ProcessFilter, ProcessRecord, SortSpec};
use crate::services::updater::SharedCollector;
use crate::state::{clamp_interval, SamplerState};

/// In-process sampling source: answers queries from the sampler's latest
/// snapshot and hands out subscriptions on its event bus.
pub struct LocalSource {
    state: SamplerState,
    collector: Option<SharedCollector>,
    bus: EventBus,
}

impl LocalSource {
    pub fn new(state: SamplerState, collector: SharedCollector, bus: EventBus) -> Self {
        Self {
            state,
            collector: Some(collector),
            bus,
        }
    }

    /// A source without a live collector; `details` falls back to the bare
    /// record from the snapshot.
    pub fn detached(state: SamplerState, bus: EventBus) -> Self {
        Self {
            state,
            collector: None,
            bus,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

impl ProcessSource for LocalSource {
    fn list(
        &self,
        filter: Option<&ProcessFilter>,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<ProcessRecord>, AppError> {
        let s = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let filter = filter.map(ProcessFilter::normalized).unwrap_or_default();

        let mut result: Vec<ProcessRecord> = s
            .snapshot
            .values()
            .filter(|p| filter.matches(p, &s.current_user))
            .cloned()
            .collect();
        drop(s);

        apply_sort(&mut result, &sort.copied().unwrap_or_default());

        log::debug!("list: returning {} entries", result.len());
        Ok(result)
    }

    fn details(&self, pid: u32) -> Result<ProcessDetails, AppError> {
        let record = {
            let s = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            s.snapshot
                .get(&pid)
                .cloned()
                .ok_or(AppError::NotFound { pid })?
        };

        match &self.collector {
            Some(collector) => collector
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .details(pid),
            None => Ok(ProcessDetails::bare(record)),
        }
    }

    fn set_refresh_interval(&self, ms: u64) -> Result<(), AppError> {
        let ms = clamp_interval(ms);
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .refresh_interval_ms = ms;
        log::debug!("Refresh interval set to {}ms", ms);
        Ok(())
    }

    fn set_paused(&self, paused: bool) -> Result<(), AppError> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).paused = paused;
        log::debug!("Auto-refresh paused: {}", paused);
        Ok(())
    }

    fn subscribe(&self, handler: EventHandler) -> Subscription {
        self.bus.subscribe(handler)
    }
}
