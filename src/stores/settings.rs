use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{ProcessRecord, SortField};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Pid,
    Name,
    User,
    Cpu,
    Memory,
    Status,
    Path,
    Parent,
}

impl ColumnId {
    /// Sort field behind a column; `None` for columns that cannot be sorted.
    pub fn sort_field(&self) -> Option<SortField> {
        match self {
            ColumnId::Pid => Some(SortField::Pid),
            ColumnId::Name => Some(SortField::Name),
            ColumnId::User => Some(SortField::User),
            ColumnId::Cpu => Some(SortField::CpuPercent),
            ColumnId::Memory => Some(SortField::MemoryBytes),
            ColumnId::Status => Some(SortField::Status),
            ColumnId::Path | ColumnId::Parent => None,
        }
    }

    /// Raw cell value for this column, unformatted.
    pub fn value(&self, p: &ProcessRecord) -> serde_json::Value {
        use serde_json::json;
        match self {
            ColumnId::Pid => json!(p.pid),
            ColumnId::Name => json!(p.name),
            ColumnId::User => json!(p.user),
            ColumnId::Cpu => json!(p.cpu_percent),
            ColumnId::Memory => json!(p.memory_bytes),
            ColumnId::Status => json!(p.status),
            ColumnId::Path => json!(p.path),
            ColumnId::Parent => json!(p.parent_pid),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: ColumnId,
    pub label: String,
    pub width: String,
    pub visible: bool,
}

impl ColumnDef {
    fn new(id: ColumnId, label: &str, width: &str, visible: bool) -> Self {
        Self {
            id,
            label: label.to_string(),
            width: width.to_string(),
            visible,
        }
    }
}

pub fn default_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(ColumnId::Pid, "PID", "70px", true),
        ColumnDef::new(ColumnId::Name, "Name", "200px", true),
        ColumnDef::new(ColumnId::User, "User", "100px", true),
        ColumnDef::new(ColumnId::Cpu, "CPU%", "80px", true),
        ColumnDef::new(ColumnId::Memory, "RAM", "90px", true),
        ColumnDef::new(ColumnId::Status, "Status", "90px", true),
        ColumnDef::new(ColumnId::Path, "Path", "1fr", false),
        ColumnDef::new(ColumnId::Parent, "PPID", "70px", false),
    ]
}

/// Refresh cadence, pause flag, theme and the ordered column list.
///
/// The column list is swapped as a whole on every toggle. Its order is the
/// display order.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    refresh_interval_ms: u64,
    paused: bool,
    theme: Theme,
    columns: Arc<Vec<ColumnDef>>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            paused: false,
            theme: Theme::Dark,
            columns: Arc::new(default_columns()),
        }
    }
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_interval_ms(&self) -> u64 {
        self.refresh_interval_ms
    }

    /// Stored as given; range checks belong to the caller.
    pub fn set_refresh_interval_ms(&mut self, ms: u64) {
        self.refresh_interval_ms = ms;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn columns(&self) -> Arc<Vec<ColumnDef>> {
        Arc::clone(&self.columns)
    }

    /// Flips the visibility of one column. Unknown ids leave the list as is.
    pub fn toggle_column(&mut self, id: ColumnId) {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                if c.id == id {
                    ColumnDef {
                        visible: !c.visible,
                        ..c.clone()
                    }
                } else {
                    c.clone()
                }
            })
            .collect();
        self.columns = Arc::new(columns);
    }

    pub fn visible_columns(&self) -> Vec<ColumnDef> {
        self.columns.iter().filter(|c| c.visible).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cols: &[ColumnDef]) -> Vec<ColumnId> {
        cols.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_defaults() {
        let s = SettingsStore::new();
        assert_eq!(s.refresh_interval_ms(), 1000);
        assert!(!s.paused());
        assert_eq!(s.theme(), Theme::Dark);
        assert_eq!(
            ids(&s.visible_columns()),
            vec![
                ColumnId::Pid,
                ColumnId::Name,
                ColumnId::User,
                ColumnId::Cpu,
                ColumnId::Memory,
                ColumnId::Status,
            ]
        );
    }

    #[test]
    fn test_toggle_column_shows_hidden_in_declaration_order() {
        let mut s = SettingsStore::new();
        s.toggle_column(ColumnId::Parent);
        s.toggle_column(ColumnId::Name);
        assert_eq!(
            ids(&s.visible_columns()),
            vec![
                ColumnId::Pid,
                ColumnId::User,
                ColumnId::Cpu,
                ColumnId::Memory,
                ColumnId::Status,
                ColumnId::Parent,
            ]
        );
    }

    #[test]
    fn test_toggle_column_twice_is_noop() {
        let mut s = SettingsStore::new();
        let before = s.columns();
        s.toggle_column(ColumnId::Path);
        s.toggle_column(ColumnId::Path);
        assert_eq!(*s.columns(), *before);
        assert!(!Arc::ptr_eq(&s.columns(), &before));
    }

    #[test]
    fn test_toggle_column_touches_only_one() {
        let mut s = SettingsStore::new();
        let before = s.columns();
        s.toggle_column(ColumnId::Cpu);
        let after = s.columns();
        for (old, new) in before.iter().zip(after.iter()) {
            assert_eq!(old.id, new.id);
            if old.id == ColumnId::Cpu {
                assert_eq!(new.visible, !old.visible);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_column_sort_fields() {
        assert_eq!(ColumnId::Cpu.sort_field(), Some(SortField::CpuPercent));
        assert_eq!(ColumnId::Memory.sort_field(), Some(SortField::MemoryBytes));
        assert_eq!(ColumnId::Status.sort_field(), Some(SortField::Status));
        assert_eq!(ColumnId::Path.sort_field(), None);
        assert_eq!(ColumnId::Parent.sort_field(), None);
    }

    #[test]
    fn test_settings_setters() {
        let mut s = SettingsStore::new();
        s.set_refresh_interval_ms(250);
        s.set_paused(true);
        s.set_theme(Theme::Light);
        assert_eq!(s.refresh_interval_ms(), 250);
        assert!(s.paused());
        assert_eq!(s.theme(), Theme::Light);
    }
}
