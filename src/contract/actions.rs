use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::METRICS;
use crate::models::KillMode;

/// Performs the side effects the console can request.
pub trait ActionExecutor: Send + Sync {
    fn kill_process(&self, pid: u32, mode: KillMode) -> Result<(), AppError>;
    fn open_path(&self, pid: u32) -> Result<(), AppError>;
    fn copy_to_clipboard(&self, text: &str) -> Result<(), AppError>;
}

/// Thin request issuer in front of an [`ActionExecutor`].
///
/// Requests go through unchanged and errors come back unchanged: no retry,
/// no escalation from terminate to kill, and no effect on table state.
#[derive(Clone)]
pub struct ActionGateway {
    executor: Arc<dyn ActionExecutor>,
}

impl ActionGateway {
    pub fn new(executor: Arc<dyn ActionExecutor>) -> Self {
        Self { executor }
    }

    pub fn kill_process(&self, pid: u32, mode: KillMode) -> Result<(), AppError> {
        log::info!("kill_process: pid={} mode={:?}", pid, mode);
        record("kill", self.executor.kill_process(pid, mode))
    }

    pub fn open_path(&self, pid: u32) -> Result<(), AppError> {
        log::info!("open_path: pid={}", pid);
        record("open_path", self.executor.open_path(pid))
    }

    pub fn copy_to_clipboard(&self, text: &str) -> Result<(), AppError> {
        log::info!("copy_to_clipboard: {} bytes", text.len());
        record("copy", self.executor.copy_to_clipboard(text))
    }
}

fn record(action: &str, result: Result<(), AppError>) -> Result<(), AppError> {
    match &result {
        Ok(()) => METRICS.record_action(action, "ok"),
        Err(e) => {
            log::warn!("{} failed: {}", action, e);
            METRICS.record_action(action, e.kind());
        }
    }
    result
}
