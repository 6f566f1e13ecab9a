pub mod actions;
pub mod source;

pub use actions::{ActionExecutor, ActionGateway};
pub use source::{EventBus, EventHandler, ProcessSource, Subscription, EVENT_PROCESSES_UPDATE};
