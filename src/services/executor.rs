use arboard::Clipboard;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::contract::ActionExecutor;
use crate::error::AppError;
use crate::models::KillMode;
use crate::services::updater::SharedCollector;
use crate::state::SamplerState;

/// Executes actions against the local machine.
pub struct SystemExecutor {
    state: SamplerState,
    collector: SharedCollector,
    // Opened on first copy and kept, so the copied text outlives the call on X11.
    clipboard: Mutex<Option<Clipboard>>,
}

impl SystemExecutor {
    pub fn new(state: SamplerState, collector: SharedCollector) -> Self {
        Self {
            state,
            collector,
            clipboard: Mutex::new(None),
        }
    }

    fn known_path(&self, pid: u32) -> Result<Option<String>, AppError> {
        let s = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        s.snapshot
            .get(&pid)
            .map(|p| p.path.clone())
            .ok_or(AppError::NotFound { pid })
    }
}

impl ActionExecutor for SystemExecutor {
    fn kill_process(&self, pid: u32, mode: KillMode) -> Result<(), AppError> {
        // pid 0 addresses the caller's whole process group on Unix.
        if pid == 0 {
            return Err(AppError::InvalidPid { pid });
        }
        self.known_path(pid)?;

        self.collector
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .signal(pid, mode)
    }

    fn open_path(&self, pid: u32) -> Result<(), AppError> {
        let path = self.known_path(pid)?.ok_or(AppError::NotFound { pid })?;
        let target = containing_dir(&path);
        log::debug!("Opening {} for pid {}", target, pid);

        open::that(&target).map_err(AppError::os)
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<(), AppError> {
        let mut guard = self.clipboard.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(Clipboard::new().map_err(clipboard_unavailable)?);
        }

        match guard.as_mut() {
            Some(clipboard) => clipboard.set_text(text).map_err(AppError::os),
            None => Err(AppError::unsupported("clipboard")),
        }
    }
}

fn clipboard_unavailable(err: arboard::Error) -> AppError {
    log::debug!("Clipboard unavailable: {}", err);
    AppError::unsupported("clipboard")
}

/// Directory holding `path`, or `path` itself when it has no parent.
pub fn containing_dir(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| path.to_string())
}
