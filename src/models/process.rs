use serde::{Deserialize, Serialize};

/// Process lifecycle status, mirrored from the sampler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Unknown,
}

impl ProcessStatus {
    /// Wire name, also used as the sort key for the status column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Running => "running",
            ProcessStatus::Sleeping => "sleeping",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Zombie => "zombie",
            ProcessStatus::Unknown => "unknown",
        }
    }
}

/// One row of the process table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessRecord {
    /// Unique key, stable for the lifetime of the process
    pub pid: u32,
    pub name: String,
    pub status: ProcessStatus,
    /// CPU usage percentage as reported by the sampler
    pub cpu_percent: f32,
    /// Resident set size in bytes
    pub memory_bytes: u64,
    /// Owning user, if it could be resolved
    pub user: Option<String>,
    /// Executable path (absent for kernel threads or restricted processes)
    pub path: Option<String>,
    /// Parent pid; may point at a process that is no longer in the table
    pub parent_pid: Option<u32>,
    /// Unix start timestamp in seconds
    pub start_time: Option<u64>,
    /// Owned by another user, so actions on it likely need elevation
    pub needs_elevation: bool,
    pub cmd: Vec<String>,
}

/// Richer, lazily fetched view of a single process.
///
/// Every extra field is optional because availability depends on the platform
/// and on the privileges of the sampler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessDetails {
    pub record: ProcessRecord,
    pub threads: Option<u32>,
    pub virtual_memory_bytes: Option<u64>,
    pub disk_read_bytes: Option<u64>,
    pub disk_written_bytes: Option<u64>,
    pub open_files_count: Option<usize>,
    pub environment: Option<Vec<String>>,
}

impl ProcessDetails {
    pub fn bare(record: ProcessRecord) -> Self {
        Self {
            record,
            threads: None,
            virtual_memory_bytes: None,
            disk_read_bytes: None,
            disk_written_bytes: None,
            open_files_count: None,
            environment: None,
        }
    }
}

/// Incremental change set pushed by the sampler.
///
/// `added` and `updated` carry full records. A pid is expected in at most one
/// of the three sets; removing an unknown pid is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessUpdateEvent {
    pub added: Vec<ProcessRecord>,
    pub updated: Vec<ProcessRecord>,
    pub removed: Vec<u32>,
    /// When the sampler produced the event (Unix epoch, milliseconds)
    pub timestamp_ms: u64,
}

impl ProcessUpdateEvent {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// How a process should be signalled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KillMode {
    /// Graceful termination (SIGTERM on Unix)
    Terminate,
    /// Forceful kill (SIGKILL on Unix)
    Kill,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ProcessStatus::Sleeping).unwrap();
        assert_eq!(json, "\"sleeping\"");
        assert_eq!(ProcessStatus::Zombie.as_str(), "zombie");
    }

    #[test]
    fn test_event_change_count() {
        let event = ProcessUpdateEvent {
            removed: vec![1, 2, 3],
            timestamp_ms: 10,
            ..Default::default()
        };
        assert!(!event.is_empty());
        assert_eq!(event.change_count(), 3);
        assert!(ProcessUpdateEvent::default().is_empty());
    }

    #[test]
    fn test_kill_mode_wire_names() {
        let mode: KillMode = serde_json::from_str("\"terminate\"").unwrap();
        assert_eq!(mode, KillMode::Terminate);
        assert_eq!(serde_json::to_string(&KillMode::Kill).unwrap(), "\"kill\"");
    }
}
