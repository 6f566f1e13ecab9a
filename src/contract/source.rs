use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::error::AppError;
use crate::models::{ProcessDetails, ProcessFilter, ProcessRecord, ProcessUpdateEvent, SortSpec};

/// Name of the push channel carrying [`ProcessUpdateEvent`]s.
pub const EVENT_PROCESSES_UPDATE: &str = "processes:update";

pub type EventHandler = Box<dyn Fn(&ProcessUpdateEvent) + Send + Sync>;

/// Query side of the sampling source.
pub trait ProcessSource: Send + Sync {
    /// Filtered and sorted snapshot.
    fn list(
        &self,
        filter: Option<&ProcessFilter>,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<ProcessRecord>, AppError>;

    fn details(&self, pid: u32) -> Result<ProcessDetails, AppError>;

    fn set_refresh_interval(&self, ms: u64) -> Result<(), AppError>;

    fn set_paused(&self, paused: bool) -> Result<(), AppError>;

    /// Registers a handler for diff events. Delivery stops once the returned
    /// handle is dropped.
    fn subscribe(&self, handler: EventHandler) -> Subscription;
}

struct Registry {
    next_id: u64,
    handlers: Vec<(u64, EventHandler)>,
}

/// Fan-out of diff events to subscribed handlers.
///
/// Handlers run while the registry lock is held, which is what lets
/// [`Subscription`]'s drop promise no further calls. A handler must not
/// subscribe or unsubscribe from inside its own call.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, handler: EventHandler) -> Subscription {
        let mut reg = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.push((id, handler));
        log::debug!("Subscriber {} attached to {}", id, EVENT_PROCESSES_UPDATE);
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every live handler, in subscription order.
    /// Returns how many handlers were called.
    pub fn publish(&self, event: &ProcessUpdateEvent) -> usize {
        let reg = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, handler) in reg.handlers.iter() {
            handler(event);
        }
        reg.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }
}

/// Handle returned by `subscribe`; dropping it detaches the handler.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = registry.lock().unwrap_or_else(PoisonError::into_inner);
            reg.handlers.retain(|(id, _)| *id != self.id);
            log::debug!("Subscriber {} detached", self.id);
        }
    }
}
