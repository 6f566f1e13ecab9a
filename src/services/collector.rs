use std::collections::HashMap;
use sysinfo::{
    Pid, Process, ProcessRefreshKind, ProcessesToUpdate, Signal, System, UpdateKind, Users,
};

use crate::error::AppError;
use crate::models::{KillMode, ProcessDetails, ProcessRecord, ProcessStatus};

/// Wraps `sysinfo::System` and turns its process table into records.
pub struct SysinfoCollector {
    system: System,
    users: Users,
    current_user: String,
}

impl SysinfoCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );
        Self {
            system,
            users: Users::new_with_refreshed_list(),
            current_user: current_username(),
        }
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// Refreshes every process and returns pid → record.
    pub fn collect(&mut self) -> HashMap<u32, ProcessRecord> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );
        self.users.refresh();

        let result: HashMap<u32, ProcessRecord> = self
            .system
            .processes()
            .iter()
            .map(|(pid, process)| (pid.as_u32(), self.map_process(pid.as_u32(), process)))
            .collect();

        log::trace!("Collected {} processes", result.len());
        result
    }

    /// Extra per-process data, refreshed for that pid only.
    pub fn details(&mut self, pid: u32) -> Result<ProcessDetails, AppError> {
        let sys_pid = Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            details_refresh_kind(),
        );
        let process = self
            .system
            .process(sys_pid)
            .ok_or(AppError::NotFound { pid })?;

        let disk = process.disk_usage();
        let environment: Vec<String> = process
            .environ()
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect();

        Ok(ProcessDetails {
            record: self.map_process(pid, process),
            threads: process.tasks().map(|t| t.len() as u32),
            virtual_memory_bytes: Some(process.virtual_memory()),
            disk_read_bytes: Some(disk.total_read_bytes),
            disk_written_bytes: Some(disk.total_written_bytes),
            open_files_count: open_files_count(pid),
            // An empty list usually means we could not read it.
            environment: (!environment.is_empty()).then_some(environment),
        })
    }

    /// Sends the signal matching `mode` to `pid`.
    pub fn signal(&mut self, pid: u32, mode: KillMode) -> Result<(), AppError> {
        let sys_pid = Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        let process = self
            .system
            .process(sys_pid)
            .ok_or(AppError::NotFound { pid })?;

        let delivered = match mode {
            KillMode::Terminate => process
                .kill_with(Signal::Term)
                .ok_or_else(|| AppError::unsupported("terminate"))?,
            KillMode::Kill => process.kill(),
        };

        if delivered {
            Ok(())
        } else {
            Err(AppError::PermissionDenied {
                pid,
                message: "Insufficient permissions to signal this process".to_string(),
            })
        }
    }

    fn map_process(&self, pid: u32, p: &Process) -> ProcessRecord {
        let user = p
            .user_id()
            .and_then(|uid| self.users.get_user_by_id(uid))
            .map(|u| u.name().to_string());

        let needs_elevation = user
            .as_deref()
            .map(|u| !u.is_empty() && u != self.current_user)
            .unwrap_or(false);

        ProcessRecord {
            pid,
            name: p.name().to_string_lossy().to_string(),
            status: map_status(p.status()),
            cpu_percent: p.cpu_usage(),
            memory_bytes: p.memory(),
            user,
            path: p.exe().map(|e| e.to_string_lossy().to_string()),
            parent_pid: p.parent().map(|pp| pp.as_u32()),
            start_time: Some(p.start_time()),
            needs_elevation,
            cmd: p.cmd().iter().map(|s| s.to_string_lossy().to_string()).collect(),
        }
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-pid refresh for the details view. CPU is left out so the next full
/// sample still measures usage over a whole interval.
fn details_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_memory()
        .with_disk_usage()
        .with_tasks()
        .with_environ(UpdateKind::OnlyIfNotSet)
}

fn map_status(s: sysinfo::ProcessStatus) -> ProcessStatus {
    match s {
        sysinfo::ProcessStatus::Run => ProcessStatus::Running,
        sysinfo::ProcessStatus::Sleep => ProcessStatus::Sleeping,
        sysinfo::ProcessStatus::Stop => ProcessStatus::Stopped,
        sysinfo::ProcessStatus::Zombie => ProcessStatus::Zombie,
        _ => ProcessStatus::Unknown,
    }
}

#[cfg(target_os = "linux")]
fn open_files_count(pid: u32) -> Option<usize> {
    std::fs::read_dir(format!("/proc/{}/fd", pid))
        .ok()
        .map(|entries| entries.count())
}

#[cfg(not(target_os = "linux"))]
fn open_files_count(_pid: u32) -> Option<usize> {
    None
}

pub fn current_username() -> String {
    #[cfg(windows)]
    {
        std::env::var("USERNAME").unwrap_or_else(|_| "unknown".to_string())
    }
    #[cfg(not(windows))]
    {
        std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
