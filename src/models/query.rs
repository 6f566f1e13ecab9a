use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::process::{ProcessRecord, ProcessStatus};

/// Sparse predicate sent along with a list query.
///
/// A `None` field means "no constraint". Unset fields are left out of the
/// serialized form so the query stays minimal.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessFilter {
    /// Case-insensitive substring match against name, path or pid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact owner match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mine_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_system_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessStatus>,
    /// Exclusive CPU lower bound, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_gt: Option<f32>,
    /// Exclusive resident memory lower bound, in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gt_bytes: Option<u64>,
}

/// Sortable columns, named after the record fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Pid,
    Name,
    CpuPercent,
    MemoryBytes,
    User,
    Status,
    StartTime,
}

impl SortField {
    /// Resource columns read naturally biggest first.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortField::CpuPercent | SortField::MemoryBytes => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CpuPercent,
            direction: SortDirection::Desc,
        }
    }
}

// ---------------------------------------------------------------------------
// Source-side evaluation
// ---------------------------------------------------------------------------

impl ProcessFilter {
    /// True when both scope flags are set, which no process can satisfy.
    pub fn has_conflicting_scope(&self) -> bool {
        self.system_only == Some(true) && self.non_system_only == Some(true)
    }

    /// Resolves the contradictory `system_only` + `non_system_only` pair:
    /// the two flags cancel and neither applies.
    pub fn normalized(&self) -> ProcessFilter {
        if !self.has_conflicting_scope() {
            return self.clone();
        }
        log::warn!("Filter sets both system_only and non_system_only; ignoring both");
        ProcessFilter {
            system_only: None,
            non_system_only: None,
            ..self.clone()
        }
    }

    pub fn matches(&self, p: &ProcessRecord, current_user: &str) -> bool {
        if let Some(ref q) = self.search {
            let q_lower = q.to_lowercase();
            let name_match = p.name.to_lowercase().contains(&q_lower);
            let path_match = p
                .path
                .as_deref()
                .map(|pa| pa.to_lowercase().contains(&q_lower))
                .unwrap_or(false);
            let pid_match = p.pid.to_string().contains(&q_lower);
            if !name_match && !path_match && !pid_match {
                return false;
            }
        }

        if let Some(ref u) = self.user {
            if p.user.as_deref() != Some(u.as_str()) {
                return false;
            }
        }

        if self.mine_only == Some(true) && p.user.as_deref() != Some(current_user) {
            return false;
        }

        if !self.has_conflicting_scope() {
            if self.system_only == Some(true) && !is_system(p) {
                return false;
            }
            if self.non_system_only == Some(true) && is_system(p) {
                return false;
            }
        }

        if let Some(st) = self.status {
            if p.status != st {
                return false;
            }
        }

        if let Some(cpu_gt) = self.cpu_gt {
            if p.cpu_percent <= cpu_gt {
                return false;
            }
        }

        if let Some(mem_gt) = self.memory_gt_bytes {
            if p.memory_bytes <= mem_gt {
                return false;
            }
        }

        true
    }
}

/// Low pids and root/SYSTEM-owned processes count as system processes.
pub fn is_system(p: &ProcessRecord) -> bool {
    p.pid < 500
        || p.user
            .as_deref()
            .map(|u| matches!(u, "root" | "SYSTEM" | "NT AUTHORITY\\SYSTEM"))
            .unwrap_or(false)
}

pub fn apply_sort(processes: &mut [ProcessRecord], sort: &SortSpec) {
    processes.sort_by(|a, b| {
        let ord = match sort.field {
            SortField::Pid => a.pid.cmp(&b.pid),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::CpuPercent => a
                .cpu_percent
                .partial_cmp(&b.cpu_percent)
                .unwrap_or(Ordering::Equal),
            SortField::MemoryBytes => a.memory_bytes.cmp(&b.memory_bytes),
            SortField::User => a
                .user
                .as_deref()
                .unwrap_or("")
                .cmp(b.user.as_deref().unwrap_or("")),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::StartTime => a.start_time.unwrap_or(0).cmp(&b.start_time.unwrap_or(0)),
        };
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_proc(pid: u32, name: &str, cpu: f32, mem: u64, user: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            status: ProcessStatus::Running,
            cpu_percent: cpu,
            memory_bytes: mem,
            user: Some(user.to_string()),
            path: Some(format!("/usr/bin/{}", name)),
            parent_pid: None,
            start_time: None,
            needs_elevation: false,
            cmd: vec![],
        }
    }

    #[test]
    fn test_filter_search_by_name_and_pid() {
        let p = make_proc(1234, "Chrome", 5.0, 1024, "alice");
        let by_name = ProcessFilter {
            search: Some("chro".to_string()),
            ..Default::default()
        };
        let by_pid = ProcessFilter {
            search: Some("123".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&p, "alice"));
        assert!(by_pid.matches(&p, "alice"));
    }

    #[test]
    fn test_filter_mine_only() {
        let root = make_proc(1, "init", 0.0, 100, "root");
        let mine = make_proc(2000, "bash", 0.0, 50, "alice");
        let f = ProcessFilter {
            mine_only: Some(true),
            ..Default::default()
        };
        assert!(!f.matches(&root, "alice"));
        assert!(f.matches(&mine, "alice"));
    }

    #[test]
    fn test_filter_thresholds_are_exclusive() {
        let idle = make_proc(1000, "idle", 0.0, 0, "alice");
        let busy = make_proc(1001, "compile", 90.0, 500, "alice");
        let f = ProcessFilter {
            cpu_gt: Some(0.0),
            memory_gt_bytes: Some(0),
            ..Default::default()
        };
        assert!(!f.matches(&idle, "alice"));
        assert!(f.matches(&busy, "alice"));

        let at_bound = ProcessFilter {
            cpu_gt: Some(90.0),
            ..Default::default()
        };
        assert!(!at_bound.matches(&busy, "alice"));
    }

    #[test]
    fn test_conflicting_scope_cancels_out() {
        let system = make_proc(1, "init", 0.0, 100, "root");
        let user = make_proc(4000, "vim", 0.0, 100, "alice");
        let f = ProcessFilter {
            system_only: Some(true),
            non_system_only: Some(true),
            ..Default::default()
        };
        assert!(f.has_conflicting_scope());
        assert!(f.matches(&system, "alice"));
        assert!(f.matches(&user, "alice"));

        let normalized = f.normalized();
        assert_eq!(normalized.system_only, None);
        assert_eq!(normalized.non_system_only, None);
    }

    #[test]
    fn test_system_scope() {
        let low_pid = make_proc(42, "kthreadd", 0.0, 0, "alice");
        let root_owned = make_proc(9000, "sshd", 0.0, 0, "root");
        let user = make_proc(9001, "vim", 0.0, 0, "alice");
        assert!(is_system(&low_pid));
        assert!(is_system(&root_owned));
        assert!(!is_system(&user));

        let non_system = ProcessFilter {
            non_system_only: Some(true),
            ..Default::default()
        };
        assert!(!non_system.matches(&root_owned, "alice"));
        assert!(non_system.matches(&user, "alice"));
    }

    #[test]
    fn test_empty_filter_serializes_to_empty_object() {
        let json = serde_json::to_value(ProcessFilter::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_sort_by_cpu_desc() {
        let mut procs = vec![
            make_proc(1, "a", 10.0, 100, "u"),
            make_proc(2, "b", 80.0, 100, "u"),
            make_proc(3, "c", 40.0, 100, "u"),
        ];
        apply_sort(&mut procs, &SortSpec::default());
        let pids: Vec<u32> = procs.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive() {
        let mut procs = vec![
            make_proc(1, "zsh", 0.0, 0, "u"),
            make_proc(2, "Bash", 0.0, 0, "u"),
            make_proc(3, "ash", 0.0, 0, "u"),
        ];
        apply_sort(
            &mut procs,
            &SortSpec {
                field: SortField::Name,
                direction: SortDirection::Asc,
            },
        );
        let names: Vec<&str> = procs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ash", "Bash", "zsh"]);
    }

    #[test]
    fn test_sort_field_wire_names() {
        let spec: SortSpec =
            serde_json::from_str(r#"{"field":"memory_bytes","direction":"asc"}"#).unwrap();
        assert_eq!(spec.field, SortField::MemoryBytes);
        assert_eq!(spec.direction, SortDirection::Asc);
    }
}
