//! Console session: the stores wired to a process source and an action
//! gateway.
//!
//! Query edits go through [`Console::update_filter`] or the sort helpers and
//! end in a fresh snapshot. Pushed diff events go through
//! [`Console::handle_event`], one at a time and in delivery order.

use serde::Serialize;
use std::sync::Arc;

use crate::contract::{ActionGateway, ProcessSource};
use crate::error::AppError;
use crate::metrics::METRICS;
use crate::models::{apply_sort, KillMode, ProcessRecord, ProcessUpdateEvent, SortField};
use crate::state::clamp_interval;
use crate::stores::{ColumnDef, ColumnId, FilterStore, ProcessTable, SelectionStore, SettingsStore};

/// One table row projected on the visible columns, values unformatted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsoleRow {
    pub pid: u32,
    pub selected: bool,
    pub cells: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsoleView {
    pub revision: u64,
    pub last_updated: u64,
    pub process_count: usize,
    pub selected_pid: Option<u32>,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<ConsoleRow>,
}

pub struct Console {
    source: Arc<dyn ProcessSource>,
    gateway: ActionGateway,
    filter: FilterStore,
    table: ProcessTable,
    selection: SelectionStore,
    settings: SettingsStore,
}

impl Console {
    pub fn new(source: Arc<dyn ProcessSource>, gateway: ActionGateway) -> Self {
        Self {
            source,
            gateway,
            filter: FilterStore::new(),
            table: ProcessTable::new(),
            selection: SelectionStore::new(),
            settings: SettingsStore::new(),
        }
    }

    pub fn filter(&self) -> &FilterStore {
        &self.filter
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Column visibility and theme are local; they need no round trip.
    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    /// Queries the source with the current criteria and replaces the table.
    pub fn refresh(&mut self) -> Result<usize, AppError> {
        let filter = self.filter.to_filter();
        let sort = self.filter.to_sort();
        let records = self.source.list(Some(&filter), Some(&sort))?;
        let count = records.len();

        self.table.set_all(records);
        METRICS.snapshots_total.inc();
        METRICS.table_processes.set(count as i64);
        Ok(count)
    }

    /// Merges a pushed diff. A malformed event is dropped and the table is
    /// resynchronized from a fresh snapshot instead.
    pub fn handle_event(&mut self, event: &ProcessUpdateEvent) -> Result<(), AppError> {
        match self.table.apply_diff(event) {
            Ok(()) => {
                METRICS.diffs_applied_total.inc();
                METRICS.table_processes.set(self.table.len() as i64);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected diff event ({}), resynchronizing", e);
                METRICS.diffs_rejected_total.inc();
                self.refresh().map(|_| ())
            }
        }
    }

    /// Edits the filter criteria, then reloads.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut FilterStore)) -> Result<usize, AppError> {
        edit(&mut self.filter);
        self.refresh()
    }

    pub fn reset_filter(&mut self) -> Result<usize, AppError> {
        self.update_filter(FilterStore::reset)
    }

    pub fn toggle_sort(&mut self, field: SortField) -> Result<usize, AppError> {
        self.update_filter(|f| f.toggle_sort(field))
    }

    /// Column-header click. Returns `Ok(None)` for unsortable columns.
    pub fn sort_by_column(&mut self, column: ColumnId) -> Result<Option<usize>, AppError> {
        match column.sort_field() {
            Some(field) => self.toggle_sort(field).map(Some),
            None => Ok(None),
        }
    }

    /// Local settings change only once the source acknowledged. The stored
    /// value is the clamped one the sampler runs at.
    pub fn set_refresh_interval(&mut self, ms: u64) -> Result<u64, AppError> {
        let effective = clamp_interval(ms);
        self.source.set_refresh_interval(effective)?;
        self.settings.set_refresh_interval_ms(effective);
        Ok(effective)
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<(), AppError> {
        self.source.set_paused(paused)?;
        self.settings.set_paused(paused);
        Ok(())
    }

    pub fn select(&mut self, pid: Option<u32>) {
        self.selection.select(pid);
    }

    /// The selected record, if it is still in the table.
    pub fn selected_record(&self) -> Option<&ProcessRecord> {
        self.selection.selected_pid().and_then(|pid| self.table.get(pid))
    }

    /// Sends the request and reports the outcome; the row stays until a
    /// later snapshot or diff drops it.
    pub fn kill(&self, pid: u32, mode: KillMode) -> Result<(), AppError> {
        self.gateway.kill_process(pid, mode)
    }

    /// `None` when nothing is selected.
    pub fn kill_selected(&self, mode: KillMode) -> Option<Result<(), AppError>> {
        self.selection
            .selected_pid()
            .map(|pid| self.gateway.kill_process(pid, mode))
    }

    pub fn open_selected(&self) -> Option<Result<(), AppError>> {
        self.selection.selected_pid().map(|pid| self.gateway.open_path(pid))
    }

    /// Copies the executable path of the selected process, when known.
    pub fn copy_selected_path(&self) -> Option<Result<(), AppError>> {
        let path = self.selected_record()?.path.as_deref()?;
        Some(self.gateway.copy_to_clipboard(path))
    }

    pub fn copy_text(&self, text: &str) -> Result<(), AppError> {
        self.gateway.copy_to_clipboard(text)
    }

    /// Table rows in the current sort order, projected on visible columns.
    pub fn rows(&self) -> Vec<ConsoleRow> {
        let columns = self.settings.visible_columns();
        let selected = self.selection.selected_pid();

        let mut records = self.table.list();
        apply_sort(&mut records, &self.filter.to_sort());

        records
            .iter()
            .map(|p| ConsoleRow {
                pid: p.pid,
                selected: selected == Some(p.pid),
                cells: columns.iter().map(|c| c.id.value(p)).collect(),
            })
            .collect()
    }

    pub fn view(&self) -> ConsoleView {
        ConsoleView {
            revision: self.table.revision(),
            last_updated: self.table.last_updated(),
            process_count: self.table.len(),
            selected_pid: self.selection.selected_pid(),
            columns: self.settings.visible_columns(),
            rows: self.rows(),
        }
    }
}
